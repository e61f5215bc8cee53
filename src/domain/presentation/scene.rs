use std::collections::HashSet;
use std::f32::consts::FRAC_PI_2;

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::pbr::{FogFalloff, FogSettings};
use bevy::prelude::*;

use crate::domain::simulation::{Corridor, DayNight, SceneryKind, Session, VehiclePose};

const CAMERA_HEIGHT: f32 = 4.0;
const CAMERA_TRAIL: f32 = 8.0;
const CAMERA_LOOK_AHEAD: f32 = 10.0;
/// How quickly the camera swings sideways after the car.
const CAMERA_FOLLOW_RATE: f32 = 4.0;

const ROAD_WIDTH: f32 = 10.0;
const GROUND_LENGTH: f32 = 400.0;

#[derive(Component)]
pub struct ChaseCamera;

#[derive(Component)]
struct CarModel;

#[derive(Component)]
struct Ground;

#[derive(Component)]
struct Sun;

#[derive(Component)]
struct ObstacleModel(u64);

#[derive(Component)]
struct SceneryModel(u64);

#[derive(Resource)]
struct SceneAssets {
    cone: Handle<Mesh>,
    cone_material: Handle<StandardMaterial>,
    trunk: Handle<Mesh>,
    trunk_material: Handle<StandardMaterial>,
    foliage: Handle<Mesh>,
    block: Handle<Mesh>,
}

pub struct ScenePlugin;
impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(lighting_for(DayNight::Day).sky))
            .add_systems(Startup, build_scene)
            .add_systems(
                Update,
                (
                    place_car,
                    follow_car,
                    follow_ground,
                    sync_obstacles,
                    sync_scenery,
                    apply_day_night.run_if(resource_changed::<Session>),
                ),
            );
    }
}

/// Where the chase camera sits and what it looks at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChaseView {
    pub eye: Vec3,
    pub target: Vec3,
}

/// The camera rides behind and above the car. Its sideways position eases
/// toward half the car's offset so steering reads on screen.
pub fn chase_view(pose: &VehiclePose, previous_eye_x: f32, dt: f32) -> ChaseView {
    let x = pose.x as f32;
    let z = pose.z as f32;
    let k = (1.0 - (-CAMERA_FOLLOW_RATE * dt).exp()).clamp(0.0, 1.0);
    let eye_x = previous_eye_x + (x * 0.5 - previous_eye_x) * k;
    ChaseView {
        eye: Vec3::new(eye_x, CAMERA_HEIGHT, z + CAMERA_TRAIL),
        target: Vec3::new(x, 0.0, z - CAMERA_LOOK_AHEAD),
    }
}

/// Sky, fog and light levels for one half of the day.
#[derive(Clone, Copy, Debug)]
pub struct Lighting {
    pub sky: Color,
    pub ambient_brightness: f32,
    pub sun_illuminance: f32,
    pub fog_start: f32,
    pub fog_end: f32,
}

pub fn lighting_for(day_night: DayNight) -> Lighting {
    match day_night {
        DayNight::Day => Lighting {
            sky: Color::srgb(0.53, 0.81, 0.92),
            ambient_brightness: 400.0,
            sun_illuminance: 10_000.0,
            fog_start: 20.0,
            fog_end: 150.0,
        },
        DayNight::Night => Lighting {
            sky: Color::srgb(0.07, 0.07, 0.07),
            ambient_brightness: 80.0,
            sun_illuminance: 1_500.0,
            fog_start: 10.0,
            fog_end: 90.0,
        },
    }
}

/// Ids whose model should be despawned and ids that still need one, both
/// sorted.
fn stale_and_missing(
    shown: impl IntoIterator<Item = u64>,
    live: impl IntoIterator<Item = u64>,
) -> (Vec<u64>, Vec<u64>) {
    let shown: HashSet<u64> = shown.into_iter().collect();
    let live: HashSet<u64> = live.into_iter().collect();
    let mut stale: Vec<u64> = shown.difference(&live).copied().collect();
    let mut missing: Vec<u64> = live.difference(&shown).copied().collect();
    stale.sort_unstable();
    missing.sort_unstable();
    (stale, missing)
}

fn build_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let day = lighting_for(DayNight::Day);

    commands.spawn((
        Camera3dBundle {
            camera: Camera {
                hdr: true,
                ..default()
            },
            tonemapping: Tonemapping::TonyMcMapface,
            transform: Transform::from_xyz(0.0, CAMERA_HEIGHT, CAMERA_TRAIL)
                .looking_at(Vec3::new(0.0, 0.0, -CAMERA_LOOK_AHEAD), Vec3::Y),
            ..default()
        },
        FogSettings {
            color: day.sky,
            falloff: FogFalloff::Linear {
                start: day.fog_start,
                end: day.fog_end,
            },
            ..default()
        },
        ChaseCamera,
    ));

    commands.spawn((
        DirectionalLightBundle {
            directional_light: DirectionalLight {
                illuminance: day.sun_illuminance,
                ..default()
            },
            transform: Transform::from_xyz(10.0, 20.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
            ..default()
        },
        Sun,
    ));

    commands
        .spawn((SpatialBundle::default(), Ground))
        .with_children(|ground| {
            ground.spawn(PbrBundle {
                mesh: meshes.add(Plane3d::default().mesh().size(1_000.0, GROUND_LENGTH)),
                material: materials.add(Color::srgb(0.18, 0.45, 0.2)),
                ..default()
            });
            ground.spawn(PbrBundle {
                mesh: meshes.add(Plane3d::default().mesh().size(ROAD_WIDTH, GROUND_LENGTH)),
                material: materials.add(Color::srgb(0.2, 0.2, 0.22)),
                transform: Transform::from_xyz(0.0, 0.01, 0.0),
                ..default()
            });
            ground.spawn(PbrBundle {
                mesh: meshes.add(Plane3d::default().mesh().size(0.2, GROUND_LENGTH)),
                material: materials.add(Color::WHITE),
                transform: Transform::from_xyz(0.0, 0.02, 0.0),
                ..default()
            });
        });

    let paint = materials.add(Color::srgb(1.0, 0.75, 0.1));
    let glass = materials.add(Color::srgb(0.1, 0.1, 0.15));
    let tyre = materials.add(Color::srgb(0.05, 0.05, 0.05));
    let wheel = meshes.add(Cylinder::new(0.35, 0.3));
    commands
        .spawn((SpatialBundle::default(), CarModel))
        .with_children(|car| {
            car.spawn(PbrBundle {
                mesh: meshes.add(Cuboid::new(1.8, 0.5, 4.0)),
                material: paint.clone(),
                transform: Transform::from_xyz(0.0, 0.55, 0.0),
                ..default()
            });
            car.spawn(PbrBundle {
                mesh: meshes.add(Cuboid::new(1.4, 0.45, 1.6)),
                material: glass,
                transform: Transform::from_xyz(0.0, 1.0, 0.3),
                ..default()
            });
            car.spawn(PbrBundle {
                mesh: meshes.add(Cuboid::new(1.8, 0.08, 0.4)),
                material: paint,
                transform: Transform::from_xyz(0.0, 1.0, 1.8),
                ..default()
            });
            for (x, z) in [(-0.95, -1.3), (0.95, -1.3), (-0.95, 1.3), (0.95, 1.3)] {
                car.spawn(PbrBundle {
                    mesh: wheel.clone(),
                    material: tyre.clone(),
                    transform: Transform::from_xyz(x, 0.35, z)
                        .with_rotation(Quat::from_rotation_z(FRAC_PI_2)),
                    ..default()
                });
            }
        });

    commands.insert_resource(SceneAssets {
        cone: meshes.add(Cone {
            radius: 0.4,
            height: 1.0,
        }),
        cone_material: materials.add(Color::srgb(1.0, 0.4, 0.0)),
        trunk: meshes.add(Cylinder::new(0.5, 1.0)),
        trunk_material: materials.add(Color::srgb(0.4, 0.26, 0.13)),
        foliage: meshes.add(Cone {
            radius: 1.0,
            height: 1.0,
        }),
        block: meshes.add(Cuboid::new(1.0, 1.0, 1.0)),
    });
}

fn place_car(pose: Res<VehiclePose>, mut car: Query<&mut Transform, With<CarModel>>) {
    let Ok(mut transform) = car.get_single_mut() else {
        return;
    };
    transform.translation = Vec3::new(pose.x as f32, 0.0, pose.z as f32);
    transform.rotation =
        Quat::from_rotation_y(pose.rot_y as f32) * Quat::from_rotation_z(pose.rot_z as f32);
}

fn follow_car(
    time: Res<Time>,
    pose: Res<VehiclePose>,
    mut camera: Query<&mut Transform, With<ChaseCamera>>,
) {
    let Ok(mut transform) = camera.get_single_mut() else {
        return;
    };
    let view = chase_view(&pose, transform.translation.x, time.delta_seconds());
    *transform = Transform::from_translation(view.eye).looking_at(view.target, Vec3::Y);
}

/// The ground is a finite strip that slides along under the car.
fn follow_ground(pose: Res<VehiclePose>, mut ground: Query<&mut Transform, With<Ground>>) {
    if let Ok(mut transform) = ground.get_single_mut() {
        transform.translation.z = pose.z as f32;
    }
}

fn sync_obstacles(
    mut commands: Commands,
    corridor: Res<Corridor>,
    assets: Option<Res<SceneAssets>>,
    shown: Query<(Entity, &ObstacleModel)>,
) {
    let Some(assets) = assets else {
        return;
    };
    let (stale, missing) = stale_and_missing(
        shown.iter().map(|(_, model)| model.0),
        corridor.obstacles.iter().map(|o| o.id),
    );
    for (entity, model) in &shown {
        if stale.binary_search(&model.0).is_ok() {
            commands.entity(entity).despawn_recursive();
        }
    }
    for obstacle in corridor
        .obstacles
        .iter()
        .filter(|o| missing.binary_search(&o.id).is_ok())
    {
        commands.spawn((
            PbrBundle {
                mesh: assets.cone.clone(),
                material: assets.cone_material.clone(),
                transform: Transform::from_xyz(obstacle.x as f32, 0.5, obstacle.z as f32),
                ..default()
            },
            ObstacleModel(obstacle.id),
        ));
    }
}

fn sync_scenery(
    mut commands: Commands,
    corridor: Res<Corridor>,
    assets: Option<Res<SceneAssets>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    shown: Query<(Entity, &SceneryModel)>,
) {
    let Some(assets) = assets else {
        return;
    };
    let (stale, missing) = stale_and_missing(
        shown.iter().map(|(_, model)| model.0),
        corridor.scenery.iter().map(|s| s.id),
    );
    for (entity, model) in &shown {
        if stale.binary_search(&model.0).is_ok() {
            commands.entity(entity).despawn_recursive();
        }
    }
    for item in corridor
        .scenery
        .iter()
        .filter(|s| missing.binary_search(&s.id).is_ok())
    {
        let height = item.height as f32;
        let material = materials.add(item.color);
        let root = Transform::from_xyz(item.x as f32, 0.0, item.z as f32);
        let mut entity = commands.spawn((SpatialBundle::from_transform(root), SceneryModel(item.id)));
        match item.kind {
            SceneryKind::Tree => {
                let trunk = height * 0.35;
                let crown = height - trunk;
                entity.with_children(|tree| {
                    tree.spawn(PbrBundle {
                        mesh: assets.trunk.clone(),
                        material: assets.trunk_material.clone(),
                        transform: Transform::from_xyz(0.0, trunk / 2.0, 0.0)
                            .with_scale(Vec3::new(0.6, trunk, 0.6)),
                        ..default()
                    });
                    tree.spawn(PbrBundle {
                        mesh: assets.foliage.clone(),
                        material,
                        transform: Transform::from_xyz(0.0, trunk + crown / 2.0, 0.0)
                            .with_scale(Vec3::new(height * 0.25, crown, height * 0.25)),
                        ..default()
                    });
                });
            }
            SceneryKind::Building => {
                entity.with_children(|building| {
                    building.spawn(PbrBundle {
                        mesh: assets.block.clone(),
                        material,
                        transform: Transform::from_xyz(0.0, height / 2.0, 0.0)
                            .with_scale(Vec3::new(8.0, height, 8.0)),
                        ..default()
                    });
                });
            }
        }
    }
}

fn apply_day_night(
    session: Res<Session>,
    mut clear: ResMut<ClearColor>,
    mut ambient: ResMut<AmbientLight>,
    mut sun: Query<&mut DirectionalLight, With<Sun>>,
    mut fog: Query<&mut FogSettings, With<ChaseCamera>>,
    mut shown: Local<Option<DayNight>>,
) {
    if *shown == Some(session.day_night) {
        return;
    }
    let lighting = lighting_for(session.day_night);
    clear.0 = lighting.sky;
    ambient.brightness = lighting.ambient_brightness;
    for mut light in &mut sun {
        light.illuminance = lighting.sun_illuminance;
    }
    for mut settings in &mut fog {
        settings.color = lighting.sky;
        settings.falloff = FogFalloff::Linear {
            start: lighting.fog_start,
            end: lighting.fog_end,
        };
    }
    *shown = Some(session.day_night);
    debug!("lighting set to {:?}", session.day_night);
}
