use bevy::input::touch::TouchInput;
use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin};

use crate::domain::simulation::{
    AppState, ControlEvent, ReturnToMenu, Session, SimSettings, StartRace, ToggleDayNight,
    VehiclePose,
};

mod audio;
mod panels;
mod scene;

pub use audio::MusicPlugin;
pub use scene::ScenePlugin;

use panels::game_over_panel::show_game_over_panel;
use panels::hud_panel::show_hud_panel;
use panels::menu_panel::{show_menu_panel, MenuForm};
use panels::touch_controls::{show_touch_controls, TouchButtons};

pub struct UiPlugin;
impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .add_systems(Update, menu_ui.run_if(in_state(AppState::Menu)))
            .add_systems(Update, hud_ui.run_if(in_state(AppState::Playing)))
            .add_systems(Update, game_over_ui.run_if(in_state(AppState::GameOver)))
            .add_systems(Update, touch_ui);
    }
}

fn menu_ui(
    mut contexts: EguiContexts,
    settings: Res<SimSettings>,
    session: Res<Session>,
    mut form: Local<Option<MenuForm>>,
    mut starts: EventWriter<StartRace>,
) {
    let form = form.get_or_insert_with(|| MenuForm::new(&settings));
    show_menu_panel(contexts.ctx_mut(), form, &settings, &session, &mut starts);
}

fn hud_ui(
    mut contexts: EguiContexts,
    session: Res<Session>,
    pose: Res<VehiclePose>,
    mut toggles: EventWriter<ToggleDayNight>,
) {
    show_hud_panel(contexts.ctx_mut(), &session, &pose, &mut toggles);
}

fn game_over_ui(
    mut contexts: EguiContexts,
    session: Res<Session>,
    mut starts: EventWriter<StartRace>,
    mut to_menu: EventWriter<ReturnToMenu>,
) {
    show_game_over_panel(contexts.ctx_mut(), &session, &mut starts, &mut to_menu);
}

/// On-screen pedals, shown once a touch has been seen and only mid-race.
/// Anything still held when the pad disappears is released.
fn touch_ui(
    mut contexts: EguiContexts,
    mut touches: EventReader<TouchInput>,
    state: Res<State<AppState>>,
    mut touch_seen: Local<bool>,
    mut previous: Local<TouchButtons>,
    mut controls: EventWriter<ControlEvent>,
) {
    if touches.read().next().is_some() {
        *touch_seen = true;
    }
    let held = if *touch_seen && *state.get() == AppState::Playing {
        show_touch_controls(contexts.ctx_mut())
    } else {
        TouchButtons::default()
    };
    controls.send_batch(previous.edges(held));
    *previous = held;
}
