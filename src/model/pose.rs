use glam::Vec3;

use crate::config::{EYE_HEIGHT, INITIAL_EYE};

/// Where the viewer stands.
///
/// `eye` feeds the view matrix. `position` is a slower logical accumulator
/// advanced by the same movement keys; only the debug overlay reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerPose {
    pub eye: Vec3,
    pub position: Vec3,
}

impl ViewerPose {
    pub fn new() -> Self {
        Self {
            eye: Vec3::from_array(INITIAL_EYE),
            position: Vec3::ZERO,
        }
    }

    /// Reset the eye to standing height, discarding vertical drift from the
    /// previous frame's look-directed movement.
    pub fn pin_eye_height(&mut self) {
        self.eye.z = EYE_HEIGHT;
    }
}

impl Default for ViewerPose {
    fn default() -> Self {
        Self::new()
    }
}
