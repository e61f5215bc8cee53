use bevy::prelude::*;
use bevy_egui::egui;

use crate::domain::simulation::{DayNight, Session, ToggleDayNight, VehiclePose};

/// Below this many seconds the clock turns red.
const LOW_TIME_SECONDS: u32 = 10;

pub fn clock_text(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

pub fn show_hud_panel(
    ctx: &mut egui::Context,
    session: &Session,
    pose: &VehiclePose,
    toggles: &mut EventWriter<ToggleDayNight>,
) {
    egui::Area::new("hud_panel".into())
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(12.0, 12.0))
        .show(ctx, |ui| {
            let mut time = egui::RichText::new(format!(
                "Time: {}",
                clock_text(session.time_remaining_seconds)
            ))
            .size(22.0)
            .strong();
            if session.time_remaining_seconds < LOW_TIME_SECONDS {
                time = time.color(egui::Color32::RED);
            }
            ui.label(time);
            ui.label(egui::RichText::new(format!("Score: {}", session.score)).size(22.0));
            ui.label(format!("Best: {}", session.high_score));
            ui.label(format!("{:.0} km/h", pose.speed));
        });

    egui::Area::new("day_night_toggle".into())
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
        .show(ctx, |ui| {
            let label = match session.day_night {
                DayNight::Day => "Night",
                DayNight::Night => "Day",
            };
            if ui.button(label).clicked() {
                toggles.send(ToggleDayNight);
            }
        });
}
