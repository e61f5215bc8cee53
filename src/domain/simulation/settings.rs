use bevy::prelude::*;

/// Longitudinal and lateral handling of the car.
#[derive(Clone, Debug)]
pub struct VehicleTuning {
    pub accel: f64,
    pub friction: f64,
    pub brake_decel: f64,
    pub max_speed: f64,
    pub lateral_speed: f64,
    pub yaw_lean: f64,
    pub roll_lean: f64,
    /// Exponential smoothing rate for yaw/roll, per second.
    pub lean_rate: f64,
    pub half_road_width: f64,
    pub edge_margin: f64,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            accel: 20.0,
            friction: 10.0,
            brake_decel: 30.0,
            max_speed: 100.0,
            lateral_speed: 15.0,
            yaw_lean: 0.3,
            roll_lean: 0.1,
            // 10% per frame at 60 fps
            lean_rate: 6.32,
            half_road_width: 5.0,
            edge_margin: 0.5,
        }
    }
}

impl VehicleTuning {
    pub fn lateral_limit(&self) -> f64 {
        self.half_road_width - self.edge_margin
    }
}

/// Spawn window of one entity lane.
#[derive(Clone, Debug)]
pub struct LaneTuning {
    pub lookahead: f64,
    pub base_step: f64,
    pub step_jitter: f64,
    pub retire_margin: f64,
}

/// Distance bands that decide what kind of scenery lines the road.
#[derive(Clone, Debug)]
pub struct SceneryBands {
    /// Below this distance from the origin only trees spawn.
    pub suburbs_from: f64,
    /// At or beyond this distance only buildings spawn.
    pub city_from: f64,
    pub inner_offset: f64,
    pub outer_offset: f64,
}

impl Default for SceneryBands {
    fn default() -> Self {
        Self {
            suburbs_from: 500.0,
            city_from: 1500.0,
            inner_offset: 20.0,
            outer_offset: 50.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CollisionTuning {
    pub lateral_tolerance: f64,
    pub longitudinal_tolerance: f64,
    pub pass_margin: f64,
    pub points_per_obstacle: u32,
}

impl Default for CollisionTuning {
    fn default() -> Self {
        Self {
            lateral_tolerance: 1.0,
            longitudinal_tolerance: 1.5,
            pass_margin: 2.0,
            points_per_obstacle: 10,
        }
    }
}

#[derive(Resource, Clone, Debug)]
pub struct SimSettings {
    pub vehicle: VehicleTuning,
    pub obstacles: LaneTuning,
    pub scenery: LaneTuning,
    pub bands: SceneryBands,
    pub collision: CollisionTuning,
    pub default_race_seconds: u32,
    pub min_race_seconds: u32,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            vehicle: VehicleTuning::default(),
            obstacles: LaneTuning {
                lookahead: 120.0,
                base_step: 20.0,
                step_jitter: 30.0,
                retire_margin: 10.0,
            },
            scenery: LaneTuning {
                lookahead: 150.0,
                base_step: 12.0,
                step_jitter: 8.0,
                retire_margin: 50.0,
            },
            bands: SceneryBands::default(),
            collision: CollisionTuning::default(),
            default_race_seconds: 300,
            min_race_seconds: 60,
        }
    }
}

impl SimSettings {
    /// Converts a race length picked in minutes into seconds, falling back to
    /// the minimum for anything non-finite or too short.
    pub fn race_seconds_from_minutes(&self, minutes: f64) -> u32 {
        if !minutes.is_finite() || minutes <= 0.0 {
            return self.min_race_seconds;
        }
        let seconds = (minutes * 60.0).round().min(u32::MAX as f64) as u32;
        seconds.max(self.min_race_seconds)
    }
}
