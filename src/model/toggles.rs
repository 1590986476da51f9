use tracing::debug;

use crate::config::{INITIAL_OBJECT_SCALE, SCALE_STEP};

/// Discrete actions fired once per key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    ToggleWireframe,
    Exit,
    Shrink,
    Grow,
    ToggleOverlay,
}

/// What the main loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResponse {
    Continue,
    Exit,
}

/// Edge-triggered viewer switches.
///
/// `object_scale` has no bounds; zero and negative scales are valid states.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleState {
    pub wireframe: bool,
    pub object_scale: f32,
    pub show_overlay: bool,
}

impl ToggleState {
    pub fn new() -> Self {
        Self {
            wireframe: false,
            object_scale: INITIAL_OBJECT_SCALE,
            show_overlay: true,
        }
    }

    pub fn on_key_press(&mut self, action: KeyAction) -> KeyResponse {
        match action {
            KeyAction::ToggleWireframe => {
                self.wireframe = !self.wireframe;
                debug!(wireframe = self.wireframe, "Polygon mode toggled");
            }
            KeyAction::Exit => return KeyResponse::Exit,
            KeyAction::Shrink => {
                self.object_scale -= SCALE_STEP;
                debug!(scale = self.object_scale, "Object scale decreased");
            }
            KeyAction::Grow => {
                self.object_scale += SCALE_STEP;
                debug!(scale = self.object_scale, "Object scale increased");
            }
            KeyAction::ToggleOverlay => {
                self.show_overlay = !self.show_overlay;
            }
        }
        KeyResponse::Continue
    }
}

impl Default for ToggleState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(toggles: &mut ToggleState, action: KeyAction, times: usize) {
        for _ in 0..times {
            assert_eq!(toggles.on_key_press(action), KeyResponse::Continue);
        }
    }

    #[test]
    fn test_wireframe_parity() {
        let mut toggles = ToggleState::new();
        press(&mut toggles, KeyAction::ToggleWireframe, 3);
        assert!(toggles.wireframe);
        press(&mut toggles, KeyAction::ToggleWireframe, 1);
        assert!(!toggles.wireframe);
        press(&mut toggles, KeyAction::ToggleWireframe, 10);
        assert!(!toggles.wireframe);
    }

    #[test]
    fn test_scale_steps() {
        let mut toggles = ToggleState::new();
        press(&mut toggles, KeyAction::Shrink, 50);
        press(&mut toggles, KeyAction::Grow, 10);
        assert!((toggles.object_scale - 0.6).abs() < 1e-4, "got {}", toggles.object_scale);
    }

    #[test]
    fn test_scale_may_go_negative() {
        let mut toggles = ToggleState::new();
        press(&mut toggles, KeyAction::Shrink, 150);
        assert!((toggles.object_scale + 0.5).abs() < 1e-4, "got {}", toggles.object_scale);
    }

    #[test]
    fn test_exit_leaves_state_untouched() {
        let mut toggles = ToggleState::new();
        assert_eq!(toggles.on_key_press(KeyAction::Exit), KeyResponse::Exit);
        assert_eq!(toggles, ToggleState::new());
    }

    #[test]
    fn test_overlay_toggle() {
        let mut toggles = ToggleState::new();
        assert!(toggles.show_overlay);
        press(&mut toggles, KeyAction::ToggleOverlay, 1);
        assert!(!toggles.show_overlay);
    }
}
