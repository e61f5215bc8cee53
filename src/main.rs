mod domain;
mod storage;

use bevy::prelude::*;
use domain::{HighScoreBook, InputPlugin, MusicPlugin, ScenePlugin, SimPlugin, UiPlugin};
use storage::JsonFileStore;

const SCORE_FILE: &str = "turbo_racer_scores.json";

fn main() {
    App::new()
        .insert_resource(Msaa::Sample4)
        .insert_resource(HighScoreBook::new(JsonFileStore::new(SCORE_FILE)))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Turbo Racer".into(),
                resolution: (1280., 720.).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins((SimPlugin, InputPlugin, UiPlugin, ScenePlugin, MusicPlugin))
        .run();
}
