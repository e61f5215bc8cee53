use bevy_egui::egui;

use crate::domain::simulation::{ControlEvent, DriveAction};

pub const TOUCH_ACTIONS: [DriveAction; 4] = [
    DriveAction::Left,
    DriveAction::Right,
    DriveAction::Brake,
    DriveAction::Accelerate,
];

/// Which on-screen buttons were held last frame, in `TOUCH_ACTIONS` order.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub struct TouchButtons(pub [bool; 4]);

impl TouchButtons {
    /// Control events for every button whose held state changed.
    pub fn edges(self, now: TouchButtons) -> Vec<ControlEvent> {
        TOUCH_ACTIONS
            .iter()
            .zip(self.0.iter().zip(now.0.iter()))
            .filter(|(_, (was, is))| was != is)
            .map(|(&action, (_, &is))| ControlEvent {
                action,
                pressed: is,
            })
            .collect()
    }
}

fn hold_button(ui: &mut egui::Ui, label: &str) -> bool {
    let response = ui.add_sized(
        [72.0, 72.0],
        egui::Button::new(egui::RichText::new(label).size(22.0))
            .sense(egui::Sense::click_and_drag()),
    );
    // Sliding a finger off the button lets go of it.
    response.is_pointer_button_down_on() && response.contains_pointer()
}

/// Draws the touch pad and returns what is held this frame.
pub fn show_touch_controls(ctx: &mut egui::Context) -> TouchButtons {
    let mut held = TouchButtons::default();
    egui::Area::new("touch_steer".into())
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(16.0, -16.0))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                held.0[0] = hold_button(ui, "◀");
                held.0[1] = hold_button(ui, "▶");
            });
        });
    egui::Area::new("touch_pedals".into())
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                held.0[2] = hold_button(ui, "Brake");
                held.0[3] = hold_button(ui, "Gas");
            });
        });
    held
}
