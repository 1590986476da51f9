//! Platform-agnostic input: key/pointer events, held-key state and bindings.

use std::collections::HashSet;

use crate::controller::movement::Movement;
use crate::model::KeyAction;

/// Keys the viewer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    O,
    P,
    Space,
    Escape,
    F1,
}

/// Platform-independent input events
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    // Keyboard events; `repeat` marks OS auto-repeat while held
    KeyDown { key: Key, repeat: bool },
    KeyUp(Key),

    // Relative pointer motion while the cursor is grabbed
    PointerMoved { dx: f64, dy: f64 },

    // Window events
    FocusLost,
}

/// Latest key and pointer state, fed one event at a time
#[derive(Debug, Default)]
pub struct InputState {
    pub pressed_keys: HashSet<Key>,
    /// Virtual pointer position: the running sum of all motion deltas
    pub pointer: (f64, f64),
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an event. Returns the key when this event is a fresh press,
    /// so discrete actions fire once per physical key-down.
    pub fn process_event(&mut self, event: &InputEvent) -> Option<Key> {
        match event {
            InputEvent::KeyDown { key, repeat } => {
                let fresh = self.pressed_keys.insert(*key);
                (fresh && !repeat).then_some(*key)
            }
            InputEvent::KeyUp(key) => {
                self.pressed_keys.remove(key);
                None
            }
            InputEvent::PointerMoved { dx, dy } => {
                self.pointer.0 += dx;
                self.pointer.1 += dy;
                None
            }
            InputEvent::FocusLost => {
                self.clear_keys();
                None
            }
        }
    }

    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.pressed_keys.contains(&key)
    }

    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
    }
}

/// Key mapping configuration
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub left: Key,
    pub right: Key,
    pub forward: Key,
    pub back: Key,
    pub rise: Key,
    pub toggle_wireframe: Key,
    pub shrink: Key,
    pub grow: Key,
    pub exit: Key,
    pub toggle_overlay: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: Key::A,
            right: Key::D,
            forward: Key::W,
            back: Key::S,
            rise: Key::Q,
            toggle_wireframe: Key::Space,
            shrink: Key::O,
            grow: Key::P,
            exit: Key::Escape,
            toggle_overlay: Key::F1,
        }
    }
}

impl KeyBindings {
    /// Movement directions whose keys are currently held
    pub fn held_movements(&self, input: &InputState) -> HashSet<Movement> {
        [
            (self.left, Movement::Left),
            (self.right, Movement::Right),
            (self.forward, Movement::Forward),
            (self.back, Movement::Back),
            (self.rise, Movement::Rise),
        ]
        .into_iter()
        .filter(|(key, _)| input.is_key_pressed(*key))
        .map(|(_, movement)| movement)
        .collect()
    }

    pub fn action_for(&self, key: Key) -> Option<KeyAction> {
        if key == self.toggle_wireframe {
            Some(KeyAction::ToggleWireframe)
        } else if key == self.exit {
            Some(KeyAction::Exit)
        } else if key == self.shrink {
            Some(KeyAction::Shrink)
        } else if key == self.grow {
            Some(KeyAction::Grow)
        } else if key == self.toggle_overlay {
            Some(KeyAction::ToggleOverlay)
        } else {
            None
        }
    }
}

pub mod native {
    use super::*;
    use winit::event::{ElementState, KeyEvent};
    use winit::keyboard::{KeyCode, PhysicalKey};

    pub fn key_from_code(code: KeyCode) -> Option<Key> {
        match code {
            KeyCode::KeyW => Some(Key::W),
            KeyCode::KeyA => Some(Key::A),
            KeyCode::KeyS => Some(Key::S),
            KeyCode::KeyD => Some(Key::D),
            KeyCode::KeyQ => Some(Key::Q),
            KeyCode::KeyO => Some(Key::O),
            KeyCode::KeyP => Some(Key::P),
            KeyCode::Space => Some(Key::Space),
            KeyCode::Escape => Some(Key::Escape),
            KeyCode::F1 => Some(Key::F1),
            _ => None,
        }
    }

    pub fn keyboard_event_to_input(event: &KeyEvent) -> Option<InputEvent> {
        let PhysicalKey::Code(code) = event.physical_key else {
            return None;
        };
        let key = key_from_code(code)?;
        Some(match event.state {
            ElementState::Pressed => InputEvent::KeyDown { key, repeat: event.repeat },
            ElementState::Released => InputEvent::KeyUp(key),
        })
    }

    pub fn mouse_motion_to_input(delta: (f64, f64)) -> InputEvent {
        InputEvent::PointerMoved { dx: delta.0, dy: delta.1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(key: Key) -> InputEvent {
        InputEvent::KeyDown { key, repeat: false }
    }

    #[test]
    fn test_press_fires_once_until_release() {
        let mut input = InputState::new();
        assert_eq!(input.process_event(&down(Key::Space)), Some(Key::Space));
        assert_eq!(input.process_event(&InputEvent::KeyDown { key: Key::Space, repeat: true }), None);
        assert_eq!(input.process_event(&down(Key::Space)), None);
        assert!(input.is_key_pressed(Key::Space));

        assert_eq!(input.process_event(&InputEvent::KeyUp(Key::Space)), None);
        assert!(!input.is_key_pressed(Key::Space));
        assert_eq!(input.process_event(&down(Key::Space)), Some(Key::Space));
    }

    #[test]
    fn test_pointer_accumulates() {
        let mut input = InputState::new();
        input.process_event(&InputEvent::PointerMoved { dx: 3.0, dy: -1.0 });
        input.process_event(&InputEvent::PointerMoved { dx: 2.0, dy: 4.0 });
        assert_eq!(input.pointer, (5.0, 3.0));
    }

    #[test]
    fn test_focus_lost_releases_keys() {
        let mut input = InputState::new();
        input.process_event(&down(Key::W));
        input.process_event(&down(Key::A));
        input.process_event(&InputEvent::FocusLost);
        assert!(input.pressed_keys.is_empty());
    }

    #[test]
    fn test_bindings_map_held_keys() {
        let bindings = KeyBindings::default();
        let mut input = InputState::new();
        input.process_event(&down(Key::W));
        input.process_event(&down(Key::Q));
        input.process_event(&down(Key::P));
        let held = bindings.held_movements(&input);
        assert_eq!(held, HashSet::from([Movement::Forward, Movement::Rise]));
    }

    #[test]
    fn test_bindings_map_actions() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.action_for(Key::Space), Some(KeyAction::ToggleWireframe));
        assert_eq!(bindings.action_for(Key::Escape), Some(KeyAction::Exit));
        assert_eq!(bindings.action_for(Key::O), Some(KeyAction::Shrink));
        assert_eq!(bindings.action_for(Key::P), Some(KeyAction::Grow));
        assert_eq!(bindings.action_for(Key::F1), Some(KeyAction::ToggleOverlay));
        assert_eq!(bindings.action_for(Key::W), None);
    }
}
