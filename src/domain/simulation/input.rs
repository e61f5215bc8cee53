use bevy::prelude::*;

/// The four logical controls every input device maps onto.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum DriveAction {
    Left,
    Right,
    Accelerate,
    Brake,
}

/// A logical control going down or up. Keyboard, touch buttons and gamepads
/// all speak this, so the sampler never sees a device.
#[derive(Event, Clone, Copy, PartialEq, Eq, Debug)]
pub struct ControlEvent {
    pub action: DriveAction,
    pub pressed: bool,
}

impl ControlEvent {
    pub fn down(action: DriveAction) -> Self {
        Self {
            action,
            pressed: true,
        }
    }

    pub fn up(action: DriveAction) -> Self {
        Self {
            action,
            pressed: false,
        }
    }
}

/// Which controls are currently held, as of the last event seen.
#[derive(Resource, Default, Clone, Copy, Debug)]
pub struct HeldControls {
    pub left: bool,
    pub right: bool,
    pub accelerate: bool,
    pub brake: bool,
}

impl HeldControls {
    pub fn apply(&mut self, ev: ControlEvent) {
        let slot = match ev.action {
            DriveAction::Left => &mut self.left,
            DriveAction::Right => &mut self.right,
            DriveAction::Accelerate => &mut self.accelerate,
            DriveAction::Brake => &mut self.brake,
        };
        *slot = ev.pressed;
    }

    pub fn release_all(&mut self) {
        *self = Self::default();
    }
}

/// What the driver wants this tick.
#[derive(Resource, Default, Clone, Copy, PartialEq, Eq, Debug)]
pub struct InputIntent {
    pub steer_left: bool,
    pub steer_right: bool,
    pub throttle: bool,
    pub brake: bool,
}

impl From<HeldControls> for InputIntent {
    fn from(held: HeldControls) -> Self {
        Self {
            steer_left: held.left,
            steer_right: held.right,
            throttle: held.accelerate,
            brake: held.brake,
        }
    }
}

pub(super) fn buffer_controls(mut events: EventReader<ControlEvent>, mut held: ResMut<HeldControls>) {
    for ev in events.read() {
        held.apply(*ev);
    }
}

pub(super) fn sample_intent(held: Res<HeldControls>, mut intent: ResMut<InputIntent>) {
    *intent = InputIntent::from(*held);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_track_latest_state() {
        let mut held = HeldControls::default();
        held.apply(ControlEvent::down(DriveAction::Accelerate));
        held.apply(ControlEvent::down(DriveAction::Left));
        held.apply(ControlEvent::up(DriveAction::Left));

        let intent = InputIntent::from(held);
        assert!(intent.throttle);
        assert!(!intent.steer_left);
        assert!(!intent.steer_right);
        assert!(!intent.brake);
    }

    #[test]
    fn repeated_presses_are_harmless() {
        let mut held = HeldControls::default();
        for _ in 0..5 {
            held.apply(ControlEvent::down(DriveAction::Brake));
        }
        held.apply(ControlEvent::up(DriveAction::Brake));
        assert!(!InputIntent::from(held).brake);
    }
}
