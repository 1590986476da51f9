use crate::config::{POLAR_CEILING, POLAR_FLOOR};
use crate::model::Camera;
use std::f32::consts::PI;

/// Turns pointer motion into look angles
#[derive(Debug, Default)]
pub struct CameraController {
    last_pointer: Option<(f64, f64)>,
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer movement since the previous sample. The first sample only
    /// sets the reference point, so the view never jumps on startup.
    pub fn pointer_delta(&mut self, pointer: (f64, f64)) -> (f32, f32) {
        let delta = match self.last_pointer {
            Some((x0, z0)) => ((pointer.0 - x0) as f32, (pointer.1 - z0) as f32),
            None => (0.0, 0.0),
        };
        self.last_pointer = Some(pointer);
        delta
    }

    /// Apply a pointer delta scaled by elapsed time and sensitivity.
    ///
    /// Moving right turns toward negative azimuth; moving down tilts the
    /// view toward the floor. Polar is clamped just inside (0, π).
    pub fn update_angles(&self, camera: &mut Camera, dx: f32, dz: f32, dt: f32) -> (f32, f32) {
        camera.azimuth -= dx * dt * camera.sensitivity;
        camera.polar += dz * dt * camera.sensitivity;

        // The poles themselves are excluded: look would be parallel to up
        if camera.polar <= 0.0 {
            camera.polar = POLAR_FLOOR;
        } else if camera.polar >= PI {
            camera.polar = POLAR_CEILING;
        }

        (camera.azimuth, camera.polar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::f32::consts::FRAC_PI_2;

    fn camera() -> Camera {
        Camera::new(1200, 800)
    }

    #[test]
    fn test_zero_delta_is_noop() {
        let ctl = CameraController::new();
        let mut cam = camera();
        cam.azimuth = 2.5;
        cam.polar = 1.2;
        for dt in [0.0, 0.016, 1.0, 1000.0] {
            assert_eq!(ctl.update_angles(&mut cam, 0.0, 0.0, dt), (2.5, 1.2));
        }
    }

    #[test]
    fn test_polar_clamps_to_floor() {
        let ctl = CameraController::new();
        let mut cam = camera();
        assert_eq!(cam.polar, FRAC_PI_2);
        let (az, polar) = ctl.update_angles(&mut cam, 0.0, -10.0, 1.0);
        assert_eq!(az, 0.0);
        assert_eq!(polar, POLAR_FLOOR);
    }

    #[test]
    fn test_polar_clamps_to_ceiling() {
        let ctl = CameraController::new();
        let mut cam = camera();
        let (_, polar) = ctl.update_angles(&mut cam, 0.0, 500.0, 0.5);
        assert_eq!(polar, POLAR_CEILING);
        assert!(polar < PI);
    }

    #[test]
    fn test_landing_exactly_on_floor_pole_is_clamped() {
        let ctl = CameraController::new();
        let mut cam = camera();
        cam.sensitivity = 1.0;
        cam.polar = POLAR_FLOOR;
        // one pixel up at 100 fps subtracts exactly the floor
        let (_, polar) = ctl.update_angles(&mut cam, 0.0, -1.0, 0.01);
        assert_eq!(polar, POLAR_FLOOR);
        assert!(cam.side_dir().length() > 0.0);
        assert!(cam.view(Vec3::ZERO).to_cols_array().iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_landing_exactly_on_ceiling_pole_is_clamped() {
        let ctl = CameraController::new();
        let mut cam = camera();
        cam.sensitivity = 1.0;
        cam.polar = POLAR_CEILING;
        let (_, polar) = ctl.update_angles(&mut cam, 0.0, PI - POLAR_CEILING, 1.0);
        assert_eq!(polar, POLAR_CEILING);
        assert!(polar < PI);
        assert!(cam.view(Vec3::ZERO).to_cols_array().iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_polar_stays_inside_open_interval_under_adversarial_input() {
        let ctl = CameraController::new();
        let mut cam = camera();
        let deltas = [1e6, -1e6, 3.0, -0.5, 1e-3, -7e4, 2.9e2, f32::MAX / 4.0, -f32::MAX / 4.0];
        for (i, dz) in deltas.iter().cycle().take(200).enumerate() {
            let dt = (i % 7) as f32 * 0.1;
            let (_, polar) = ctl.update_angles(&mut cam, (i as f32) * 13.0, *dz, dt);
            assert!(polar > 0.0 && polar < PI, "polar {polar} escaped after step {i}");
        }
    }

    #[test]
    fn test_azimuth_sign_and_scaling() {
        let ctl = CameraController::new();
        let mut cam = camera();
        cam.sensitivity = 0.5;
        let (az, _) = ctl.update_angles(&mut cam, 4.0, 0.0, 0.25);
        assert!((az + 0.5).abs() < 1e-6);
        // unbounded
        for _ in 0..100 {
            ctl.update_angles(&mut cam, -100.0, 0.0, 1.0);
        }
        assert!(cam.azimuth > 4000.0);
    }

    #[test]
    fn test_first_pointer_sample_is_reference() {
        let mut ctl = CameraController::new();
        assert_eq!(ctl.pointer_delta((640.0, 400.0)), (0.0, 0.0));
        assert_eq!(ctl.pointer_delta((650.0, 390.0)), (10.0, -10.0));
        assert_eq!(ctl.pointer_delta((650.0, 390.0)), (0.0, 0.0));
    }
}
