//! Per-frame render parameters: transforms plus the fixed Gouraud lighting setup.

use glam::{Mat4, Vec3};
use std::f32::consts::FRAC_PI_2;

use crate::config::{
    CONSTANT_ATTENUATION, LIGHT_AMBIENT, LIGHT_DIFFUSE, LIGHT_SPECULAR, LINEAR_ATTENUATION,
    MATERIAL_AMBIENT, MATERIAL_DIFFUSE, MATERIAL_SPECULAR, MODEL_OFFSET, QUADRATIC_ATTENUATION,
    SHININESS,
};

/// Light intensities and placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingParams {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub light_position: Vec3,
    pub view_position: Vec3,
    pub constant_attenuation: f32,
    pub linear_attenuation: f32,
    pub quadratic_attenuation: f32,
}

impl LightingParams {
    /// Head-mounted light: both the light and the viewer sit at `eye`
    pub fn at_eye(eye: Vec3) -> Self {
        Self {
            ambient: Vec3::from_array(LIGHT_AMBIENT),
            diffuse: Vec3::from_array(LIGHT_DIFFUSE),
            specular: Vec3::from_array(LIGHT_SPECULAR),
            light_position: eye,
            view_position: eye,
            constant_attenuation: CONSTANT_ATTENUATION,
            linear_attenuation: LINEAR_ATTENUATION,
            quadratic_attenuation: QUADRATIC_ATTENUATION,
        }
    }
}

/// Surface reflectances
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialParams {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            ambient: Vec3::from_array(MATERIAL_AMBIENT),
            diffuse: Vec3::from_array(MATERIAL_DIFFUSE),
            specular: Vec3::from_array(MATERIAL_SPECULAR),
            shininess: SHININESS,
        }
    }
}

/// Everything the renderer needs for one frame. Rebuilt every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderFrame {
    pub projection: Mat4,
    pub view: Mat4,
    pub model: Mat4,
    pub lighting: LightingParams,
    pub material: MaterialParams,
    pub wireframe: bool,
}

impl RenderFrame {
    pub fn compose(projection: Mat4, view: Mat4, eye: Vec3, object_scale: f32, wireframe: bool) -> Self {
        Self {
            projection,
            view,
            model: model_matrix(object_scale),
            lighting: LightingParams::at_eye(eye),
            material: MaterialParams::default(),
            wireframe,
        }
    }

    pub fn transform_uniform(&self) -> TransformUniform {
        TransformUniform {
            projection: self.projection.to_cols_array_2d(),
            view: self.view.to_cols_array_2d(),
            model: self.model.to_cols_array_2d(),
            normal_matrix: normal_matrix(self.model).to_cols_array_2d(),
        }
    }

    pub fn lighting_uniform(&self) -> LightingUniform {
        let l = &self.lighting;
        let m = &self.material;
        LightingUniform {
            la: l.ambient.to_array(),
            shininess: m.shininess,
            ld: l.diffuse.to_array(),
            constant_attenuation: l.constant_attenuation,
            ls: l.specular.to_array(),
            linear_attenuation: l.linear_attenuation,
            ka: m.ambient.to_array(),
            quadratic_attenuation: l.quadratic_attenuation,
            kd: m.diffuse.to_array(),
            _pad0: 0.0,
            ks: m.specular.to_array(),
            _pad1: 0.0,
            light_position: l.light_position.to_array(),
            _pad2: 0.0,
            view_position: l.view_position.to_array(),
            _pad3: 0.0,
        }
    }
}

/// Stand the mesh up (its Y-up becomes our Z-up), move it to its spot, then scale.
/// The product is `Rx · T · S`, so the scale acts on the raw vertices first.
pub fn model_matrix(object_scale: f32) -> Mat4 {
    Mat4::from_rotation_x(FRAC_PI_2)
        * Mat4::from_translation(Vec3::from_array(MODEL_OFFSET))
        * Mat4::from_scale(Vec3::splat(object_scale))
}

/// Inverse-transpose of the model matrix for normals.
/// Degenerate (zero-scale) models fall back to the model matrix itself.
pub fn normal_matrix(model: Mat4) -> Mat4 {
    if model.determinant().abs() <= f32::EPSILON {
        model
    } else {
        model.inverse().transpose()
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
}

/// Mirrors `Lighting` in gouraud.wgsl; each vec3 shares a 16-byte slot with a scalar.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    pub la: [f32; 3],
    pub shininess: f32,
    pub ld: [f32; 3],
    pub constant_attenuation: f32,
    pub ls: [f32; 3],
    pub linear_attenuation: f32,
    pub ka: [f32; 3],
    pub quadratic_attenuation: f32,
    pub kd: [f32; 3],
    pub _pad0: f32,
    pub ks: [f32; 3],
    pub _pad1: f32,
    pub light_position: [f32; 3],
    pub _pad2: f32,
    pub view_position: [f32; 3],
    pub _pad3: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPS
    }

    #[test]
    fn test_model_matrix_composition_order() {
        // Origin only sees the translation, rotated about X: (1.5, -0.25, 0) -> (1.5, 0, -0.25)
        let m = model_matrix(1.0);
        assert!(close(m.transform_point3(Vec3::ZERO), Vec3::new(1.5, 0.0, -0.25)));

        // Mesh +Y becomes world +Z
        let up = m.transform_vector3(Vec3::Y);
        assert!(close(up, Vec3::Z), "got {up:?}");

        // Scale applies before the translation
        let m2 = model_matrix(2.0);
        let p = m2.transform_point3(Vec3::X);
        assert!(close(p, Vec3::new(3.5, 0.0, -0.25)), "got {p:?}");
    }

    #[test]
    fn test_degenerate_scales_stay_finite() {
        for scale in [0.0, -0.5, -3.0] {
            let frame = RenderFrame::compose(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ZERO, scale, false);
            let u = frame.transform_uniform();
            assert!(u.model.iter().flatten().all(|x| x.is_finite()));
            assert!(u.normal_matrix.iter().flatten().all(|x| x.is_finite()), "scale {scale}");
        }
    }

    #[test]
    fn test_lighting_follows_eye() {
        let eye = Vec3::new(4.0, -1.0, 0.8);
        let frame = RenderFrame::compose(Mat4::IDENTITY, Mat4::IDENTITY, eye, 1.0, true);
        let u = frame.lighting_uniform();
        assert_eq!(u.light_position, eye.to_array());
        assert_eq!(u.view_position, eye.to_array());
        assert_eq!(u.shininess, 1000.0);
        assert_eq!(u.quadratic_attenuation, 0.0011);
        assert!(frame.wireframe);
    }

    #[test]
    fn test_uniform_sizes_match_shader() {
        assert_eq!(std::mem::size_of::<TransformUniform>(), 256);
        assert_eq!(std::mem::size_of::<LightingUniform>(), 128);
    }
}
