//! Domain modules split by discipline.
//! - `controls`: keyboard and gamepad mapping onto drive actions.
//! - `presentation`: 3D scene, HUD, menus, touch pad and music.
//! - `simulation`: vehicle physics, the road corridor and the race session.

pub mod controls;
pub mod presentation;
pub mod simulation;

pub use controls::InputPlugin;
pub use presentation::{MusicPlugin, ScenePlugin, UiPlugin};
pub use simulation::{HighScoreBook, SimPlugin};
