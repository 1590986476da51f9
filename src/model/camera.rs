use glam::{Mat4, Vec3};
use std::f32::consts::FRAC_PI_2;

use crate::config::{FOV_Y_DEGREES, INITIAL_AZIMUTH, INITIAL_POLAR, MOUSE_SENSITIVITY, Z_FAR, Z_NEAR};

/// First-person camera in spherical coordinates around the +Z axis.
///
/// `polar` is measured from +Z (0 looks straight up, π straight down).
/// `azimuth` is unbounded and only ever fed to sin/cos.
#[derive(Debug, Clone)]
pub struct Camera {
    pub azimuth: f32,
    pub polar: f32,
    pub sensitivity: f32,
    pub up: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            azimuth: INITIAL_AZIMUTH,
            polar: INITIAL_POLAR,
            sensitivity: MOUSE_SENSITIVITY,
            up: Vec3::Z,
            fov_y: FOV_Y_DEGREES.to_radians(),
            aspect: width as f32 / height as f32,
            z_near: Z_NEAR,
            z_far: Z_FAR,
        }
    }

    /// Unit look direction
    pub fn look_dir(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_p, cos_p) = self.polar.sin_cos();
        Vec3::new(cos_az * sin_p, sin_az * sin_p, cos_p)
    }

    /// Strafe direction, a quarter turn counter-clockwise from the look azimuth.
    /// Always horizontal: z is exactly zero.
    pub fn side_dir(&self) -> Vec3 {
        let (sin_az, cos_az) = (self.azimuth + FRAC_PI_2).sin_cos();
        let sin_p = self.polar.sin();
        Vec3::new(cos_az * sin_p, sin_az * sin_p, 0.0)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far)
    }

    pub fn view(&self, eye: Vec3) -> Mat4 {
        Mat4::look_at_rh(eye, eye + self.look_dir(), self.up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_initial_look_is_horizontal_along_x() {
        let cam = Camera::new(1200, 800);
        let at = cam.look_dir();
        assert!((at - Vec3::X).length() < EPS, "got {at:?}");
        assert!((cam.side_dir() - Vec3::Y).length() < EPS);
    }

    #[test]
    fn test_look_dir_is_unit_length() {
        let mut cam = Camera::new(1200, 800);
        for (az, p) in [(0.3, 0.2), (-7.0, 1.0), (42.0, 3.0), (1.0, 0.01)] {
            cam.azimuth = az;
            cam.polar = p;
            assert!((cam.look_dir().length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_side_dir_stays_horizontal() {
        let mut cam = Camera::new(1200, 800);
        let mut az = -20.0;
        while az < 20.0 {
            let mut p = 0.0;
            while p <= std::f32::consts::PI {
                cam.azimuth = az;
                cam.polar = p;
                assert_eq!(cam.side_dir().z, 0.0);
                p += 0.05;
            }
            az += 0.37;
        }
    }

    #[test]
    fn test_side_is_perpendicular_to_look() {
        let mut cam = Camera::new(1200, 800);
        cam.azimuth = 1.1;
        cam.polar = 0.7;
        assert!(cam.look_dir().dot(cam.side_dir()).abs() < EPS);
    }

    #[test]
    fn test_view_maps_eye_to_origin() {
        let cam = Camera::new(1200, 800);
        let eye = Vec3::new(3.0, -2.0, 0.8);
        let v = cam.view(eye).transform_point3(eye);
        assert!(v.length() < EPS);
    }
}
