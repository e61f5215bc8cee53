use std::time::Duration;

use bevy::prelude::*;

use super::session::{RaceEndCause, RaceEnded, Session};

/// One-second repeating timer that only exists while a race is on. It is
/// inserted when `Playing` is entered and removed when it is left, so a
/// finished race can never tick the next one.
#[derive(Resource, Debug)]
pub struct Countdown(Timer);

impl Default for Countdown {
    fn default() -> Self {
        Self(Timer::from_seconds(1.0, TimerMode::Repeating))
    }
}

impl Countdown {
    /// Whole seconds that elapsed during `delta`.
    pub fn tick(&mut self, delta: Duration) -> u32 {
        self.0.tick(delta).times_finished_this_tick()
    }
}

pub(super) fn arm_countdown(mut commands: Commands) {
    commands.insert_resource(Countdown::default());
}

pub(super) fn cancel_countdown(mut commands: Commands) {
    commands.remove_resource::<Countdown>();
}

pub(super) fn run_countdown(
    time: Res<Time>,
    countdown: Option<ResMut<Countdown>>,
    mut session: ResMut<Session>,
    mut ended: EventWriter<RaceEnded>,
) {
    let Some(mut countdown) = countdown else {
        return;
    };
    for _ in 0..countdown.tick(time.delta()) {
        if session.tick_second() {
            ended.send(RaceEnded {
                cause: RaceEndCause::TimeUp,
            });
            break;
        }
    }
}
