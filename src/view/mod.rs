// VIEW: Rendering and graphics
pub mod frame;
pub mod render;
pub mod gpu_init;
pub mod texture;

pub use frame::{LightingParams, MaterialParams, RenderFrame};
pub use render::Renderer;
pub use gpu_init::GpuContext;
pub use texture::TextureImage;
