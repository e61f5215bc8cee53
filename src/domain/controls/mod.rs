use bevy::input::gamepad::{GamepadConnection, GamepadEvent};
use bevy::input::keyboard::KeyboardInput;
use bevy::input::ButtonState;
use bevy::prelude::*;

use crate::domain::simulation::{ControlEvent, DriveAction, HeldControls};

/// Keyboard layout. Each action has a primary key and an alternate.
#[derive(Resource)]
pub struct Keybinds {
    pub left: [KeyCode; 2],
    pub right: [KeyCode; 2],
    pub accelerate: [KeyCode; 2],
    pub brake: [KeyCode; 2],
}

impl Default for Keybinds {
    fn default() -> Self {
        Self {
            left: [KeyCode::ArrowLeft, KeyCode::KeyA],
            right: [KeyCode::ArrowRight, KeyCode::KeyD],
            accelerate: [KeyCode::ArrowUp, KeyCode::KeyW],
            brake: [KeyCode::ArrowDown, KeyCode::KeyS],
        }
    }
}

impl Keybinds {
    pub fn action_for(&self, key: KeyCode) -> Option<DriveAction> {
        if self.left.contains(&key) {
            Some(DriveAction::Left)
        } else if self.right.contains(&key) {
            Some(DriveAction::Right)
        } else if self.accelerate.contains(&key) {
            Some(DriveAction::Accelerate)
        } else if self.brake.contains(&key) {
            Some(DriveAction::Brake)
        } else {
            None
        }
    }
}

#[derive(Resource)]
struct MyGamepad(Gamepad);

/// Stick deflection that counts as a steering press.
const STICK_THRESHOLD: f32 = 0.4;

pub struct InputPlugin;
impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Keybinds>().add_systems(
            Update,
            (
                gamepad_connections,
                keyboard_controls,
                gamepad_controls,
                release_on_focus_loss,
            ),
        );
    }
}

fn keyboard_controls(
    mut keys: EventReader<KeyboardInput>,
    keybinds: Res<Keybinds>,
    mut controls: EventWriter<ControlEvent>,
) {
    for ev in keys.read() {
        let Some(action) = keybinds.action_for(ev.key_code) else {
            continue;
        };
        controls.send(ControlEvent {
            action,
            pressed: ev.state == ButtonState::Pressed,
        });
    }
}

/// Which way the d-pad and the stick point: -1, 0 or 1 each.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
struct SteerSources {
    dpad: i8,
    stick: i8,
}

impl SteerSources {
    /// The d-pad overrides the stick while it is held.
    fn direction(self) -> i8 {
        if self.dpad != 0 {
            self.dpad
        } else {
            self.stick
        }
    }
}

fn stick_direction(x: f32) -> i8 {
    if x <= -STICK_THRESHOLD {
        -1
    } else if x >= STICK_THRESHOLD {
        1
    } else {
        0
    }
}

fn steer_action(dir: i8) -> Option<DriveAction> {
    match dir {
        -1 => Some(DriveAction::Left),
        1 => Some(DriveAction::Right),
        _ => None,
    }
}

/// Events that move the held steering from `before` to `after`. Nothing is
/// released while another source still points the same way.
fn steer_edges(before: SteerSources, after: SteerSources) -> Vec<ControlEvent> {
    let (was, now) = (before.direction(), after.direction());
    if was == now {
        return Vec::new();
    }
    steer_action(was)
        .map(ControlEvent::up)
        .into_iter()
        .chain(steer_action(now).map(ControlEvent::down))
        .collect()
}

fn gamepad_controls(
    my_gamepad: Option<Res<MyGamepad>>,
    axes: Res<Axis<GamepadAxis>>,
    buttons: Res<ButtonInput<GamepadButton>>,
    mut steer: Local<SteerSources>,
    mut controls: EventWriter<ControlEvent>,
) {
    let Some(MyGamepad(gamepad)) = my_gamepad.as_deref() else {
        return;
    };
    let button = |button_type| GamepadButton {
        gamepad: *gamepad,
        button_type,
    };

    let pedals = [
        (GamepadButtonType::South, DriveAction::Accelerate),
        (GamepadButtonType::East, DriveAction::Brake),
    ];
    for (button_type, action) in pedals {
        if buttons.just_pressed(button(button_type)) {
            controls.send(ControlEvent::down(action));
        }
        if buttons.just_released(button(button_type)) {
            controls.send(ControlEvent::up(action));
        }
    }

    let dpad = if buttons.pressed(button(GamepadButtonType::DPadLeft)) {
        -1
    } else if buttons.pressed(button(GamepadButtonType::DPadRight)) {
        1
    } else {
        0
    };
    let axis_lx = GamepadAxis {
        gamepad: *gamepad,
        axis_type: GamepadAxisType::LeftStickX,
    };
    let now = SteerSources {
        dpad,
        stick: stick_direction(axes.get(axis_lx).unwrap_or(0.0)),
    };
    controls.send_batch(steer_edges(*steer, now));
    *steer = now;
}

/// Key-up events never arrive for keys released while unfocused.
fn release_on_focus_loss(
    mut focus: EventReader<bevy::window::WindowFocused>,
    mut held: ResMut<HeldControls>,
) {
    if focus.read().any(|ev| !ev.focused) {
        held.release_all();
    }
}

fn gamepad_connections(
    mut commands: Commands,
    my_gamepad: Option<Res<MyGamepad>>,
    mut evr_gamepad: EventReader<GamepadEvent>,
) {
    for ev in evr_gamepad.read() {
        let GamepadEvent::Connection(ev_conn) = ev else {
            continue;
        };
        match &ev_conn.connection {
            GamepadConnection::Connected(info) => {
                debug!(
                    "New gamepad connected: {:?}, name: {}",
                    ev_conn.gamepad, info.name,
                );
                if my_gamepad.is_none() {
                    commands.insert_resource(MyGamepad(ev_conn.gamepad));
                }
            }
            GamepadConnection::Disconnected => {
                debug!("Lost connection with gamepad: {:?}", ev_conn.gamepad);
                if let Some(MyGamepad(old_id)) = my_gamepad.as_deref() {
                    if *old_id == ev_conn.gamepad {
                        commands.remove_resource::<MyGamepad>();
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_map_to_the_same_actions() {
        let keybinds = Keybinds::default();
        assert_eq!(keybinds.action_for(KeyCode::ArrowLeft), Some(DriveAction::Left));
        assert_eq!(keybinds.action_for(KeyCode::KeyA), Some(DriveAction::Left));
        assert_eq!(keybinds.action_for(KeyCode::KeyW), Some(DriveAction::Accelerate));
        assert_eq!(keybinds.action_for(KeyCode::ArrowDown), Some(DriveAction::Brake));
        assert_eq!(keybinds.action_for(KeyCode::KeyD), Some(DriveAction::Right));
        assert_eq!(keybinds.action_for(KeyCode::Space), None);
    }

    #[test]
    fn stick_needs_a_firm_push() {
        assert_eq!(stick_direction(0.1), 0);
        assert_eq!(stick_direction(-0.1), 0);
        assert_eq!(stick_direction(-0.9), -1);
        assert_eq!(stick_direction(STICK_THRESHOLD), 1);
    }

    #[test]
    fn letting_go_of_the_stick_keeps_dpad_steering() {
        let both = SteerSources { dpad: -1, stick: -1 };
        let dpad_only = SteerSources { dpad: -1, stick: 0 };
        assert!(steer_edges(both, dpad_only).is_empty());
        assert!(steer_edges(dpad_only, both).is_empty());
        assert_eq!(
            steer_edges(dpad_only, SteerSources::default()),
            vec![ControlEvent::up(DriveAction::Left)]
        );
    }

    #[test]
    fn dpad_overrides_the_stick() {
        let stick_right = SteerSources { dpad: 0, stick: 1 };
        let dpad_left = SteerSources { dpad: -1, stick: 1 };
        assert_eq!(
            steer_edges(stick_right, dpad_left),
            vec![
                ControlEvent::up(DriveAction::Right),
                ControlEvent::down(DriveAction::Left),
            ]
        );
        assert_eq!(
            steer_edges(dpad_left, stick_right),
            vec![
                ControlEvent::up(DriveAction::Left),
                ControlEvent::down(DriveAction::Right),
            ]
        );
    }
}
