use bevy::prelude::*;
use rand::Rng;

use super::settings::{LaneTuning, SceneryBands, SimSettings, VehicleTuning};
use super::vehicle::VehiclePose;

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub id: u64,
    pub x: f64,
    pub z: f64,
    pub passed: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SceneryKind {
    Tree,
    Building,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneryItem {
    pub id: u64,
    pub x: f64,
    pub z: f64,
    pub kind: SceneryKind,
    pub height: f64,
    pub color: Color,
}

const MIN_STEP: f64 = 0.5;

/// Where content has been generated up to in one lane. Starts at the origin
/// so the first fill populates everything up to the lookahead.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Frontier(pub f64);

impl Frontier {
    /// Steps the frontier forward until it is at least `lookahead` ahead of
    /// the vehicle, returning the z of every row that needs content.
    fn fill<R: Rng>(&mut self, vehicle_z: f64, lane: &LaneTuning, rng: &mut R) -> Vec<f64> {
        let mut rows = Vec::new();
        let step_floor = lane.base_step.max(MIN_STEP);
        while self.0 > vehicle_z - lane.lookahead {
            let jitter = if lane.step_jitter > 0.0 {
                rng.gen_range(0.0..lane.step_jitter)
            } else {
                0.0
            };
            self.0 -= step_floor + jitter;
            rows.push(self.0);
        }
        rows
    }
}

const TREE_GREENS: [(f32, f32, f32); 3] = [
    (0.10, 0.35, 0.10),
    (0.13, 0.42, 0.16),
    (0.08, 0.28, 0.12),
];
const FACADES: [(f32, f32, f32); 4] = [
    (0.55, 0.57, 0.62),
    (0.42, 0.45, 0.52),
    (0.66, 0.60, 0.52),
    (0.30, 0.33, 0.40),
];

impl SceneryKind {
    /// Near the origin the road runs through woods, then suburbs, then city.
    pub fn for_distance<R: Rng>(distance: f64, bands: &SceneryBands, rng: &mut R) -> Self {
        if distance < bands.suburbs_from {
            SceneryKind::Tree
        } else if distance < bands.city_from {
            if rng.gen_bool(0.5) {
                SceneryKind::Tree
            } else {
                SceneryKind::Building
            }
        } else {
            SceneryKind::Building
        }
    }

    fn height<R: Rng>(&self, rng: &mut R) -> f64 {
        match *self {
            SceneryKind::Tree => rng.gen_range(3.0..5.0),
            SceneryKind::Building => rng.gen_range(10.0..40.0),
        }
    }

    fn color<R: Rng>(&self, rng: &mut R) -> Color {
        let (r, g, b) = match *self {
            SceneryKind::Tree => TREE_GREENS[rng.gen_range(0..TREE_GREENS.len())],
            SceneryKind::Building => FACADES[rng.gen_range(0..FACADES.len())],
        };
        Color::srgb(r, g, b)
    }
}

/// Everything generated along the corridor.
#[derive(Resource, Default, Debug)]
pub struct Corridor {
    pub obstacles: Vec<Obstacle>,
    pub scenery: Vec<SceneryItem>,
    pub obstacle_frontier: Frontier,
    pub scenery_frontier: Frontier,
    next_id: u64,
}

impl Corridor {
    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Clears both lanes and puts the frontiers right at the lookahead edge.
    /// Ids keep counting so nothing from a previous session is ever reused.
    pub fn reset(&mut self, vehicle_z: f64, settings: &SimSettings) {
        self.obstacles.clear();
        self.scenery.clear();
        self.obstacle_frontier = Frontier(vehicle_z - settings.obstacles.lookahead);
        self.scenery_frontier = Frontier(vehicle_z - settings.scenery.lookahead);
    }

    pub fn spawn_obstacles<R: Rng>(
        &mut self,
        vehicle_z: f64,
        lane: &LaneTuning,
        vehicle: &VehicleTuning,
        rng: &mut R,
    ) {
        let half = vehicle.half_road_width;
        for z in self.obstacle_frontier.fill(vehicle_z, lane, rng) {
            let id = self.alloc_id();
            let x = rng.gen_range(-half..half);
            self.obstacles.push(Obstacle {
                id,
                x,
                z,
                passed: false,
            });
        }
    }

    pub fn spawn_scenery<R: Rng>(
        &mut self,
        vehicle_z: f64,
        lane: &LaneTuning,
        bands: &SceneryBands,
        rng: &mut R,
    ) {
        for z in self.scenery_frontier.fill(vehicle_z, lane, rng) {
            let kind = SceneryKind::for_distance(z.abs(), bands, rng);
            for side in [-1.0, 1.0] {
                let id = self.alloc_id();
                let x = side * rng.gen_range(bands.inner_offset..bands.outer_offset);
                let height = kind.height(rng);
                let color = kind.color(rng);
                self.scenery.push(SceneryItem {
                    id,
                    x,
                    z,
                    kind,
                    height,
                    color,
                });
            }
        }
    }

    /// Drops scenery that fell `retire_margin` behind the vehicle. Obstacles
    /// are retired by the collision sweep.
    pub fn retire_scenery(&mut self, vehicle_z: f64, lane: &LaneTuning) {
        let cutoff = vehicle_z + lane.retire_margin;
        self.scenery.retain(|item| item.z <= cutoff);
    }
}

pub(super) fn advance_corridor(
    settings: Res<SimSettings>,
    pose: Res<VehiclePose>,
    mut corridor: ResMut<Corridor>,
) {
    let mut rng = rand::thread_rng();
    corridor.spawn_obstacles(pose.z, &settings.obstacles, &settings.vehicle, &mut rng);
    corridor.spawn_scenery(pose.z, &settings.scenery, &settings.bands, &mut rng);
    corridor.retire_scenery(pose.z, &settings.scenery);
}

/// Keeps the roadside dressed behind the menu.
pub(super) fn dress_roadside(
    settings: Res<SimSettings>,
    pose: Res<VehiclePose>,
    mut corridor: ResMut<Corridor>,
) {
    let mut rng = rand::thread_rng();
    corridor.spawn_scenery(pose.z, &settings.scenery, &settings.bands, &mut rng);
    corridor.retire_scenery(pose.z, &settings.scenery);
}
