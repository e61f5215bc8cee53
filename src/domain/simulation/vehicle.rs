use bevy::prelude::*;

use super::input::InputIntent;
use super::settings::{SimSettings, VehicleTuning};

/// The car. Forward is -z.
#[derive(Resource, Default, Clone, Copy, Debug, PartialEq)]
pub struct VehiclePose {
    pub x: f64,
    pub z: f64,
    pub rot_y: f64,
    pub rot_z: f64,
    pub speed: f64,
}

/// Advances the pose by one tick of `dt` seconds.
pub fn drive(pose: &mut VehiclePose, intent: InputIntent, dt: f64, tuning: &VehicleTuning) {
    let dt = dt.max(0.0);

    let mut speed = pose.speed;
    if intent.throttle {
        speed += tuning.accel * dt;
    } else {
        speed -= tuning.friction * dt;
    }
    if intent.brake {
        speed -= tuning.brake_decel * dt;
    }
    pose.speed = speed.clamp(0.0, tuning.max_speed);
    pose.z -= pose.speed * dt;

    // left wins when both are held
    let (target_yaw, target_roll) = if intent.steer_left {
        pose.x -= tuning.lateral_speed * dt;
        (tuning.yaw_lean, tuning.roll_lean)
    } else if intent.steer_right {
        pose.x += tuning.lateral_speed * dt;
        (-tuning.yaw_lean, -tuning.roll_lean)
    } else {
        (0.0, 0.0)
    };

    let k = (1.0 - (-tuning.lean_rate * dt).exp()).clamp(0.0, 1.0);
    pose.rot_y += (target_yaw - pose.rot_y) * k;
    pose.rot_z += (target_roll - pose.rot_z) * k;

    let limit = tuning.lateral_limit();
    pose.x = pose.x.clamp(-limit, limit);
}

pub(super) fn drive_vehicle(
    time: Res<Time>,
    settings: Res<SimSettings>,
    intent: Res<InputIntent>,
    mut pose: ResMut<VehiclePose>,
) {
    drive(&mut pose, *intent, time.delta_seconds_f64(), &settings.vehicle);
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;

    fn throttle() -> InputIntent {
        InputIntent {
            throttle: true,
            ..default()
        }
    }

    #[test]
    fn three_seconds_of_throttle_integrates_distance() {
        let tuning = VehicleTuning::default();
        let mut pose = VehiclePose::default();
        let mut expected = 0.0;
        for _ in 0..180 {
            drive(&mut pose, throttle(), DT, &tuning);
            expected += pose.speed * DT;
        }

        let uncapped = tuning.accel * 3.0;
        assert!((pose.speed - uncapped.min(tuning.max_speed)).abs() < 1e-6);
        // analytic ∫ a·t dt over 3 s, within Euler error
        let analytic = 0.5 * tuning.accel * 9.0;
        assert!((-pose.z - expected).abs() < 1e-9);
        assert!((-pose.z - analytic).abs() < 1.0, "z = {}", pose.z);
    }

    #[test]
    fn speed_caps_at_max() {
        let tuning = VehicleTuning {
            accel: 80.0,
            ..default()
        };
        let mut pose = VehiclePose::default();
        for _ in 0..180 {
            drive(&mut pose, throttle(), DT, &tuning);
        }
        assert_eq!(pose.speed, tuning.max_speed);
    }

    #[test]
    fn brake_stacks_with_friction_and_stops_at_zero() {
        let tuning = VehicleTuning::default();
        let mut pose = VehiclePose {
            speed: 50.0,
            ..default()
        };
        let brake = InputIntent {
            brake: true,
            ..default()
        };
        drive(&mut pose, brake, 1.0, &tuning);
        assert!((pose.speed - 10.0).abs() < 1e-9);
        drive(&mut pose, brake, 1.0, &tuning);
        assert_eq!(pose.speed, 0.0);
    }

    #[test]
    fn coasting_never_goes_backwards() {
        let tuning = VehicleTuning::default();
        let mut pose = VehiclePose::default();
        for _ in 0..60 {
            drive(&mut pose, InputIntent::default(), DT, &tuning);
        }
        assert_eq!(pose.speed, 0.0);
        assert_eq!(pose.z, 0.0);
    }

    #[test]
    fn sustained_steering_stays_on_the_road() {
        let tuning = VehicleTuning::default();
        let mut pose = VehiclePose::default();
        let left = InputIntent {
            steer_left: true,
            throttle: true,
            ..default()
        };
        for _ in 0..1_000 {
            drive(&mut pose, left, DT, &tuning);
            assert!(pose.x >= -tuning.half_road_width);
        }
        assert_eq!(pose.x, -tuning.lateral_limit());

        let right = InputIntent {
            steer_right: true,
            ..default()
        };
        // one huge tick must clamp too
        drive(&mut pose, right, 10.0, &tuning);
        assert_eq!(pose.x, tuning.lateral_limit());
    }

    #[test]
    fn lean_settles_on_target_regardless_of_tick_rate() {
        let tuning = VehicleTuning::default();
        let left = InputIntent {
            steer_left: true,
            ..default()
        };

        let mut fine = VehiclePose::default();
        for _ in 0..120 {
            drive(&mut fine, left, 1.0 / 120.0, &tuning);
        }
        let mut coarse = VehiclePose::default();
        for _ in 0..30 {
            drive(&mut coarse, left, 1.0 / 30.0, &tuning);
        }

        assert!((fine.rot_y - coarse.rot_y).abs() < 1e-9);
        assert!(fine.rot_y > 0.0 && fine.rot_y <= tuning.yaw_lean);

        let mut wild = VehiclePose::default();
        drive(&mut wild, left, 5.0, &tuning);
        assert!(wild.rot_y <= tuning.yaw_lean + 1e-12);

        for _ in 0..600 {
            drive(&mut fine, InputIntent::default(), DT, &tuning);
        }
        assert!(fine.rot_y.abs() < 1e-6);
        assert!(fine.rot_z.abs() < 1e-6);
    }

    #[test]
    fn left_wins_when_both_held() {
        let tuning = VehicleTuning::default();
        let mut pose = VehiclePose::default();
        let both = InputIntent {
            steer_left: true,
            steer_right: true,
            ..default()
        };
        drive(&mut pose, both, 0.1, &tuning);
        assert!(pose.x < 0.0);
        assert!(pose.rot_y > 0.0);
    }
}
