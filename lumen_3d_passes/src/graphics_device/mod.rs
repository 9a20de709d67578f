/// Graphics device module - the low-level graphics API seam and binding context

// Module declarations
pub mod graphics_device;
pub mod texture;
pub mod buffer;
pub mod frame_buffer;
pub mod shader;
pub mod render_context;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use texture::*;
pub use buffer::*;
pub use frame_buffer::*;
pub use shader::*;
pub use render_context::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
