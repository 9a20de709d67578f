//! Off-screen render targets
//!
//! A render target pairs a framebuffer with one color and one depth
//! texture. Passes draw into it, then sample its attachments.

mod render_target;

pub use render_target::RenderTarget;
