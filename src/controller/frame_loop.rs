use std::time::Instant;

use glam::Mat4;
use tracing::info;

use crate::controller::camera_controller::CameraController;
use crate::controller::input::{InputEvent, InputState, KeyBindings};
use crate::controller::movement::MovementController;
use crate::model::{Camera, KeyResponse, ToggleState, ViewerPose};
use crate::view::RenderFrame;

/// Elapsed time between frames plus a smoothed FPS for display
pub struct FrameTiming {
    last_frame: Instant,
    smoothed_fps: f32,
    smoothing: f32,
}

impl FrameTiming {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Seconds since the previous call
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.record(dt);
        dt
    }

    /// Restart the clock so the next `tick` measures from now
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
    }

    fn record(&mut self, dt: f32) {
        if dt > 0.0 {
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing) + (1.0 / dt) * self.smoothing;
        }
    }

    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

/// All mutable viewer state, owned by the main loop
pub struct FrameLoop {
    pub camera: Camera,
    pub pose: ViewerPose,
    pub toggles: ToggleState,
    pub input: InputState,
    pub timing: FrameTiming,
    bindings: KeyBindings,
    camera_controller: CameraController,
    movement: MovementController,
    projection: Mat4,
}

impl FrameLoop {
    pub fn new(width: u32, height: u32) -> Self {
        let camera = Camera::new(width, height);
        // Fixed window, so the projection never changes
        let projection = camera.projection();
        Self {
            camera,
            pose: ViewerPose::new(),
            toggles: ToggleState::new(),
            input: InputState::new(),
            timing: FrameTiming::new(),
            bindings: KeyBindings::default(),
            camera_controller: CameraController::new(),
            movement: MovementController::new(),
            projection,
        }
    }

    /// Feed one input event. Discrete actions fire on fresh key presses only.
    pub fn handle_event(&mut self, event: &InputEvent) -> KeyResponse {
        let Some(key) = self.input.process_event(event) else {
            return KeyResponse::Continue;
        };
        match self.bindings.action_for(key) {
            Some(action) => {
                let response = self.toggles.on_key_press(action);
                if response == KeyResponse::Exit {
                    info!("Exit requested from keyboard");
                }
                response
            }
            None => KeyResponse::Continue,
        }
    }

    /// Whether the debug overlay is drawn and receives window events
    pub fn overlay_visible(&self) -> bool {
        self.toggles.show_overlay
    }

    /// Advance by the wall-clock time since the previous frame
    pub fn tick(&mut self) -> RenderFrame {
        let dt = self.timing.tick();
        self.update(dt)
    }

    /// Camera, then movement, then the render parameters for this frame
    pub fn update(&mut self, dt: f32) -> RenderFrame {
        let (dx, dz) = self.camera_controller.pointer_delta(self.input.pointer);
        self.camera_controller.update_angles(&mut self.camera, dx, dz, dt);

        let forward = self.camera.look_dir();
        let side = self.camera.side_dir();

        self.pose.pin_eye_height();
        let held = self.bindings.held_movements(&self.input);
        let eye = self.movement.move_viewer(&held, &mut self.pose, forward, side, dt);

        RenderFrame::compose(
            self.projection,
            self.camera.view(eye),
            eye,
            self.toggles.object_scale,
            self.toggles.wireframe,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EYE_HEIGHT, POLAR_FLOOR};
    use crate::controller::input::Key;
    use glam::Vec3;

    fn down(key: Key) -> InputEvent {
        InputEvent::KeyDown { key, repeat: false }
    }

    #[test]
    fn test_first_frame_pins_eye_height() {
        let mut fl = FrameLoop::new(1200, 800);
        assert_eq!(fl.pose.eye.z, 2.0);
        fl.update(0.016);
        assert_eq!(fl.pose.eye, Vec3::new(0.0, 0.0, EYE_HEIGHT));
    }

    #[test]
    fn test_forward_walk_along_initial_look() {
        let mut fl = FrameLoop::new(1200, 800);
        fl.handle_event(&down(Key::W));
        fl.update(0.1);
        assert!((fl.pose.eye - Vec3::new(1.0, 0.0, EYE_HEIGHT)).length() < 1e-5, "got {:?}", fl.pose.eye);
        assert!((fl.pose.position.y - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_rise_only_lasts_one_frame() {
        let mut fl = FrameLoop::new(1200, 800);
        fl.handle_event(&down(Key::Q));
        fl.update(0.1);
        assert!((fl.pose.eye.z - (EYE_HEIGHT + 0.2)).abs() < 1e-6);
        fl.handle_event(&InputEvent::KeyUp(Key::Q));
        fl.update(0.1);
        assert_eq!(fl.pose.eye.z, EYE_HEIGHT);
    }

    #[test]
    fn test_pointer_drives_angles() {
        let mut fl = FrameLoop::new(1200, 800);
        fl.update(0.016);
        fl.handle_event(&InputEvent::PointerMoved { dx: 0.0, dy: -10.0 });
        fl.update(1.0);
        assert_eq!(fl.camera.polar, POLAR_FLOOR);
    }

    #[test]
    fn test_toggle_keys_and_exit() {
        let mut fl = FrameLoop::new(1200, 800);
        assert_eq!(fl.handle_event(&down(Key::Space)), KeyResponse::Continue);
        // held key repeating does not toggle again
        fl.handle_event(&InputEvent::KeyDown { key: Key::Space, repeat: true });
        assert!(fl.toggles.wireframe);
        assert!(fl.update(0.016).wireframe);

        for _ in 0..150 {
            fl.handle_event(&down(Key::O));
            fl.handle_event(&InputEvent::KeyUp(Key::O));
        }
        let frame = fl.update(0.016);
        assert!((fl.toggles.object_scale + 0.5).abs() < 1e-4);
        assert!(frame.model.to_cols_array().iter().all(|x| x.is_finite()));

        assert_eq!(fl.handle_event(&down(Key::Escape)), KeyResponse::Exit);
    }

    #[test]
    fn test_projection_is_fixed() {
        let mut fl = FrameLoop::new(1200, 800);
        let a = fl.update(0.016).projection;
        fl.handle_event(&InputEvent::PointerMoved { dx: 50.0, dy: 20.0 });
        let b = fl.update(0.016).projection;
        assert_eq!(a, b);
        assert_eq!(a, Mat4::perspective_rh(60f32.to_radians(), 1.5, 0.1, 100.0));
    }

    #[test]
    fn test_overlay_visibility_follows_f1() {
        let mut fl = FrameLoop::new(1200, 800);
        assert!(fl.overlay_visible());
        fl.handle_event(&down(Key::F1));
        assert!(!fl.overlay_visible());
        fl.handle_event(&InputEvent::KeyUp(Key::F1));
        fl.handle_event(&down(Key::F1));
        assert!(fl.overlay_visible());
    }

    #[test]
    fn test_reset_drops_startup_latency() {
        let mut timing = FrameTiming::new();
        std::thread::sleep(std::time::Duration::from_millis(200));
        timing.reset();
        let dt = timing.tick();
        assert!(dt < 0.1, "dt {dt} still includes time before reset");
    }

    #[test]
    fn test_fps_smoothing_moves_toward_rate() {
        let mut timing = FrameTiming::new();
        for _ in 0..500 {
            timing.record(1.0 / 30.0);
        }
        assert!((timing.fps() - 30.0).abs() < 0.5);
    }
}
