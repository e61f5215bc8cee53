use bevy::prelude::*;

use super::corridor::{Corridor, Obstacle};
use super::session::{RaceEnded, RaceEndCause, Session};
use super::settings::{CollisionTuning, LaneTuning, SimSettings};
use super::vehicle::VehiclePose;

/// What one sweep over the obstacle lane found.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    pub points: u32,
    pub passed: u32,
    pub crashed: bool,
}

/// Box test between the car and one obstacle; strict on both axes.
pub fn hits(obstacle: &Obstacle, pose: &VehiclePose, tuning: &CollisionTuning) -> bool {
    (obstacle.x - pose.x).abs() < tuning.lateral_tolerance
        && (obstacle.z - pose.z).abs() < tuning.longitudinal_tolerance
}

/// Retires, collides and scores in a single pass so nothing that should
/// already be gone can still crash or score.
pub fn sweep(
    obstacles: &mut Vec<Obstacle>,
    pose: &VehiclePose,
    lane: &LaneTuning,
    tuning: &CollisionTuning,
) -> SweepOutcome {
    let mut outcome = SweepOutcome::default();
    let cutoff = pose.z + lane.retire_margin;

    obstacles.retain_mut(|obs| {
        if obs.z > cutoff {
            return false;
        }
        if hits(obs, pose, tuning) {
            outcome.crashed = true;
        }
        if !obs.passed && obs.z > pose.z + tuning.pass_margin {
            obs.passed = true;
            outcome.passed += 1;
            outcome.points = outcome.points.saturating_add(tuning.points_per_obstacle);
        }
        true
    });

    outcome
}

pub(super) fn collide_and_score(
    settings: Res<SimSettings>,
    pose: Res<VehiclePose>,
    mut corridor: ResMut<Corridor>,
    mut session: ResMut<Session>,
    mut ended: EventWriter<RaceEnded>,
) {
    let outcome = sweep(
        &mut corridor.obstacles,
        &pose,
        &settings.obstacles,
        &settings.collision,
    );
    if outcome.points > 0 {
        session.add_points(outcome.points);
    }
    if outcome.crashed {
        ended.send(RaceEnded {
            cause: RaceEndCause::Crash,
        });
    }
}
