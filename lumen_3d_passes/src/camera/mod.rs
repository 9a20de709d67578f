//! Camera module - eye/view/projection providers.
//!
//! The passes only need the three quantities a shader consumes. Cameras
//! are owned and driven by the caller; light cameras are built on demand
//! by the lights themselves.

mod camera;

pub use camera::{Camera, CameraMatrices};
