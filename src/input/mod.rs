//! Directional input: the four held flags and the systems that feed them.
//!
//! Raw bevy input (keyboard events, UI button interactions, touches, window
//! resizes) is translated into [`GameEvent`]s here. Nothing in this module
//! mutates game state directly; the dispatcher applies the events in order.

use bevy::input::keyboard::KeyboardInput;
use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::window::WindowResized;

use crate::context::GameEvent;
use crate::settings::Settings;

/// One of the four steering directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Back,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Forward, Direction::Back, Direction::Left, Direction::Right];

    /// Name used in the keybinds map.
    #[must_use]
    pub fn action(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Back => "back",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    #[must_use]
    pub fn default_key(self) -> KeyCode {
        match self {
            Direction::Forward => KeyCode::ArrowUp,
            Direction::Back => KeyCode::ArrowDown,
            Direction::Left => KeyCode::ArrowLeft,
            Direction::Right => KeyCode::ArrowRight,
        }
    }
}

/// Where an input change came from. Keyboard presses are only honoured while
/// a round is active; touch buttons always are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Keyboard,
    Touch,
}

/// The four held flags. Set on press, cleared on release, read once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    pub fn set(&mut self, direction: Direction, pressed: bool) {
        match direction {
            Direction::Forward => self.forward = pressed,
            Direction::Back => self.back = pressed,
            Direction::Left => self.left = pressed,
            Direction::Right => self.right = pressed,
        }
    }

    /// Moving means translating; turning on the spot does not count.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.forward || self.back
    }
}

/// Map a key to a steering direction using the configured bindings.
#[must_use]
pub fn direction_for_key(settings: &Settings, key: KeyCode) -> Option<Direction> {
    Direction::ALL
        .into_iter()
        .find(|d| settings.controls.key_for(d.action(), d.default_key()) == key)
}

/// Marks an on-screen directional button.
#[derive(Component, Debug, Clone, Copy)]
pub struct TouchControl(pub Direction);

/// Marks the start / play-again button.
#[derive(Component, Debug, Clone, Copy)]
pub struct StartButton;

/// Turn bound key presses and releases into input events.
#[allow(clippy::needless_pass_by_value)]
pub fn capture_keyboard(
    mut keys: EventReader<KeyboardInput>,
    settings: Res<Settings>,
    mut events: EventWriter<GameEvent>,
) {
    for ev in keys.read() {
        let Some(direction) = direction_for_key(&settings, ev.key_code) else { continue };
        events.send(GameEvent::InputChanged {
            direction,
            pressed: ev.state == ButtonState::Pressed,
            source: InputSource::Keyboard,
        });
    }
}

/// On-screen arrows: held while the button is pressed, released otherwise.
pub fn capture_touch_controls(
    buttons: Query<(&Interaction, &TouchControl), Changed<Interaction>>,
    mut events: EventWriter<GameEvent>,
) {
    for (interaction, control) in &buttons {
        events.send(GameEvent::InputChanged {
            direction: control.0,
            pressed: *interaction == Interaction::Pressed,
            source: InputSource::Touch,
        });
    }
}

pub fn capture_start_button(
    buttons: Query<&Interaction, (Changed<Interaction>, With<StartButton>)>,
    mut events: EventWriter<GameEvent>,
) {
    if buttons.iter().any(|i| *i == Interaction::Pressed) {
        events.send(GameEvent::StartRequested);
    }
}

/// The first touch anywhere marks the device as touch-capable.
pub fn capture_first_touch(
    mut touches: EventReader<TouchInput>,
    mut seen: Local<bool>,
    mut events: EventWriter<GameEvent>,
) {
    if *seen {
        touches.clear();
        return;
    }
    if touches.read().any(|t| t.phase == TouchPhase::Started) {
        *seen = true;
        events.send(GameEvent::TouchDetected);
    }
}

pub fn capture_resize(mut resized: EventReader<WindowResized>, mut events: EventWriter<GameEvent>) {
    // Only the latest size matters within a frame.
    if let Some(last) = resized.read().last() {
        events.send(GameEvent::Resized { width: last.width, height: last.height });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut s = InputState::default();
        s.set(Direction::Forward, true);
        s.set(Direction::Forward, true);
        s.set(Direction::Forward, false);
        assert!(!s.forward);
        s.set(Direction::Left, true);
        assert!(s.left);
        assert!(!s.is_moving());
        s.set(Direction::Back, true);
        assert!(s.is_moving());
    }

    #[test]
    fn arrow_keys_by_default() {
        let settings = Settings::default();
        assert_eq!(direction_for_key(&settings, KeyCode::ArrowUp), Some(Direction::Forward));
        assert_eq!(direction_for_key(&settings, KeyCode::ArrowRight), Some(Direction::Right));
        assert_eq!(direction_for_key(&settings, KeyCode::KeyW), None);
    }

    #[test]
    fn rebinding_replaces_default() {
        let mut settings = Settings::default();
        settings.controls.keybinds.insert("forward".into(), "W".into());
        assert_eq!(direction_for_key(&settings, KeyCode::KeyW), Some(Direction::Forward));
        assert_eq!(direction_for_key(&settings, KeyCode::ArrowUp), None);
    }
}
