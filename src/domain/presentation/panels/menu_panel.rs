use bevy::prelude::*;
use bevy_egui::egui;

use crate::domain::simulation::{Session, SimSettings, StartRace};

/// Minutes picked on the menu, kept between visits.
pub struct MenuForm {
    pub minutes: f64,
}

impl MenuForm {
    pub fn new(settings: &SimSettings) -> Self {
        Self {
            minutes: f64::from(settings.default_race_seconds) / 60.0,
        }
    }
}

pub fn show_menu_panel(
    ctx: &mut egui::Context,
    form: &mut MenuForm,
    settings: &SimSettings,
    session: &Session,
    starts: &mut EventWriter<StartRace>,
) {
    egui::Area::new("menu_panel".into())
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading(egui::RichText::new("TURBO RACER").size(48.0).strong());
                    ui.label(format!("Best: {}", session.high_score));
                    ui.add_space(8.0);
                    ui.add(egui::Slider::new(&mut form.minutes, 1.0..=30.0).text("Minutes"));
                    ui.add_space(8.0);
                    if ui.button("Start").clicked() {
                        starts.send(StartRace {
                            duration_seconds: settings.race_seconds_from_minutes(form.minutes),
                        });
                    }
                    ui.small("Arrows / WASD to drive");
                });
            });
        });
}
