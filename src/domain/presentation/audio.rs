use bevy::audio::Volume;
use bevy::prelude::*;

use crate::domain::simulation::AppState;

const MUSIC_PATH: &str = "bgm.ogg";

#[derive(Component)]
struct Music;

/// Loops the soundtrack for the length of a race. Leaving the race despawns
/// the player, so the next one starts from the top. A missing file only
/// costs the music.
pub struct MusicPlugin;
impl Plugin for MusicPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Playing), start_music)
            .add_systems(OnExit(AppState::Playing), stop_music);
    }
}

fn start_music(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.spawn((
        AudioBundle {
            source: asset_server.load(MUSIC_PATH),
            settings: PlaybackSettings::LOOP.with_volume(Volume::new(0.5)),
        },
        Music,
    ));
}

fn stop_music(mut commands: Commands, music: Query<Entity, With<Music>>) {
    for entity in &music {
        commands.entity(entity).despawn_recursive();
    }
}
