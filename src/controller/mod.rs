// CONTROLLER: Input, camera/movement logic, and the per-frame update
pub mod input;
pub mod movement;
pub mod camera_controller;
pub mod frame_loop;

pub use input::{InputEvent, InputState, Key, KeyBindings};
pub use movement::{Movement, MovementController};
pub use camera_controller::CameraController;
pub use frame_loop::{FrameLoop, FrameTiming};
