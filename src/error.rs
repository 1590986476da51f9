use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures while reading an OBJ file
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("mesh file not found: {} (current directory: {})", path.display(), cwd.display())]
    NotFound { path: PathBuf, cwd: PathBuf },

    #[error("failed to read mesh file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("mesh {} contains no triangles", path.display())]
    Empty { path: PathBuf },
}

/// Failures while decoding a texture image
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("texture file not found: {} (current directory: {})", path.display(), cwd.display())]
    NotFound { path: PathBuf, cwd: PathBuf },

    #[error("failed to decode texture {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Failures while bringing up the GPU
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// Top-level error; every variant is fatal at startup
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error(transparent)]
    Gpu(#[from] GpuError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("prompt I/O failed: {0}")]
    Prompt(#[from] std::io::Error),

    #[error("standard input closed before all questions were answered")]
    PromptClosed,
}

/// Current directory for "not found" diagnostics; falls back to "."
pub(crate) fn current_dir_or_dot() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf())
}
