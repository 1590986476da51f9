// MODEL: Viewer state and mesh data
pub mod camera;
pub mod obj;
pub mod pose;
pub mod toggles;

pub use camera::Camera;
pub use obj::load_obj;
pub use pose::ViewerPose;
pub use toggles::{KeyAction, KeyResponse, ToggleState};
