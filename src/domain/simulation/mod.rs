//! Authoritative race state. Everything here is mutated only by the systems
//! in this plugin, once per frame, in a fixed order:
//! controls → intent → vehicle → corridor → collision/score → clock → finish.

use bevy::prelude::*;

mod clock;
mod collision;
mod corridor;
mod input;
mod records;
mod session;
mod settings;
mod vehicle;

pub use corridor::{Corridor, SceneryKind};
pub use input::{ControlEvent, DriveAction, HeldControls};
pub use records::HighScoreBook;
pub use session::{AppState, DayNight, ReturnToMenu, Session, StartRace, ToggleDayNight};
pub use settings::SimSettings;
pub use vehicle::VehiclePose;

use input::InputIntent;
use session::RaceEnded;

pub struct SimPlugin;
impl Plugin for SimPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppState>()
            .init_resource::<SimSettings>()
            .init_resource::<HighScoreBook>()
            .init_resource::<Session>()
            .init_resource::<VehiclePose>()
            .init_resource::<Corridor>()
            .init_resource::<HeldControls>()
            .init_resource::<InputIntent>()
            .add_event::<ControlEvent>()
            .add_event::<StartRace>()
            .add_event::<ReturnToMenu>()
            .add_event::<ToggleDayNight>()
            .add_event::<RaceEnded>()
            .add_systems(Startup, records::load_high_score)
            .add_systems(OnEnter(AppState::Playing), clock::arm_countdown)
            .add_systems(OnExit(AppState::Playing), clock::cancel_countdown)
            .add_systems(
                Update,
                (
                    input::buffer_controls,
                    (
                        input::sample_intent,
                        vehicle::drive_vehicle,
                        corridor::advance_corridor,
                        collision::collide_and_score,
                        clock::run_countdown,
                        session::finish_race,
                    )
                        .chain()
                        .run_if(in_state(AppState::Playing)),
                    corridor::dress_roadside.run_if(in_state(AppState::Menu)),
                    (session::start_race, session::return_to_menu)
                        .run_if(not(in_state(AppState::Playing))),
                    session::toggle_day_night,
                    session::sync_app_state,
                )
                    .chain(),
            );
    }
}
