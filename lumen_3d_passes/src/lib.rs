/*!
# Lumen 3D Passes

Multi-pass rendering pipeline over a pluggable graphics device.

The crate is backend-agnostic: every GPU call goes through the
`GraphicsDevice` trait, and a `RenderContext` tracks the bound draw target,
sampler units and program explicitly. Backends (OpenGL ES 3 / WebGL2 via
glow) live in their own crates.

## Architecture

- **RenderTarget**: framebuffer with one color and one depth attachment
- **ScreenQuad**: full-screen resolve applying a post filter
- **PassOrchestrator**: direct, pixel-filter and shadow-map passes
- **Scene / Camera / Light / Shader**: collaborator traits the passes drive
*/

// Internal modules
mod error;
mod config;
pub mod log;
pub mod graphics_device;
pub mod camera;
pub mod light;
pub mod scene;
pub mod target;
pub mod passes;

// Main lumen3d namespace module
pub mod lumen3d {
    // Error types
    pub use crate::error::{Error, IncompleteReason, Result};

    // Pipeline settings
    pub use crate::config::{PipelineConfig, QuadSettings};

    // Logging sub-module (types and routing, macros are exported at the crate root)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, log, log_detailed,
        };
    }

    // Graphics device seam, binding context and shaders
    pub mod render {
        pub use crate::graphics_device::*;
    }

    // Render targets
    pub mod target {
        pub use crate::target::*;
    }

    // Passes
    pub mod passes {
        pub use crate::passes::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // Cameras
    pub mod camera {
        pub use crate::camera::*;
    }

    // Lights
    pub mod light {
        pub use crate::light::*;
    }
}

// Re-export math library at crate root
pub use glam;
