use bevy::prelude::*;
use bevy_egui::egui;

use crate::domain::simulation::{ReturnToMenu, Session, StartRace};

pub fn show_game_over_panel(
    ctx: &mut egui::Context,
    session: &Session,
    starts: &mut EventWriter<StartRace>,
    to_menu: &mut EventWriter<ReturnToMenu>,
) {
    egui::Area::new("game_over_panel".into())
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading(egui::RichText::new("GAME OVER").size(36.0).strong());
                    ui.label(format!("Score: {}", session.score));
                    ui.label(format!("Best: {}", session.high_score));
                    ui.add_space(8.0);
                    if ui.button("Try again").clicked() {
                        starts.send(StartRace {
                            duration_seconds: session.initial_duration_seconds,
                        });
                    }
                    if ui.button("Menu").clicked() {
                        to_menu.send(ReturnToMenu);
                    }
                });
            });
        });
}
