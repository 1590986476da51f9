// Re-export all public modules so they can be used from main.rs
pub mod config;
pub mod error;
pub mod logging;
pub mod utils;
pub mod ui;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

use tracing::info;

use config::{ViewerConfig, FLAT_MESH_COLOR};
use error::ViewerError;
use utils::Mesh;
use view::TextureImage;

/// CPU-side data loaded once before the window opens
pub struct SceneAssets {
    pub mesh: Mesh,
    pub texture: TextureImage,
    pub textured: bool,
}

impl SceneAssets {
    /// Read the mesh and optional texture. Any failure here is fatal.
    pub fn load(config: &ViewerConfig) -> Result<Self, ViewerError> {
        let (color, texture) = match &config.texture_path {
            // White vertices let the texture show through unchanged
            Some(path) => ([1.0, 1.0, 1.0], Some(TextureImage::load(path)?)),
            None => (FLAT_MESH_COLOR, None),
        };
        let mesh = model::load_obj(&config.mesh_path, color)?;

        let textured = texture.is_some();
        info!(textured, triangles = mesh.triangle_count(), "Scene assets ready");
        Ok(Self {
            mesh,
            texture: texture.unwrap_or_else(TextureImage::white),
            textured,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_mesh_is_fatal() {
        let config = ViewerConfig { mesh_path: PathBuf::from("missing/building.obj"), texture_path: None };
        let err = SceneAssets::load(&config).err().unwrap();
        assert!(matches!(err, ViewerError::Mesh(error::MeshError::NotFound { .. })));
    }

    #[test]
    fn test_missing_texture_is_fatal_before_mesh() {
        let config = ViewerConfig {
            mesh_path: PathBuf::from("missing/building.obj"),
            texture_path: Some(PathBuf::from("missing/wall.png")),
        };
        let err = SceneAssets::load(&config).err().unwrap();
        assert!(matches!(err, ViewerError::Texture(error::TextureError::NotFound { .. })));
    }
}
