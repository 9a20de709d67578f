/// GL enum mappings for engine types.
///
/// Pure functions, no context needed.

use lumen_3d_passes::lumen3d::render::{
    Attachment, BufferKind, ClearFlags, FramebufferStatus, PrimitiveTopology, TextureFormat,
};

/// GL storage description of a texture format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GlTextureFormat {
    pub internal_format: u32,
    pub format: u32,
    pub data_type: u32,
}

pub(crate) fn texture_format_to_gl(format: TextureFormat) -> GlTextureFormat {
    match format {
        TextureFormat::Rgba8Unorm => GlTextureFormat {
            internal_format: glow::RGBA8,
            format: glow::RGBA,
            data_type: glow::UNSIGNED_BYTE,
        },
        TextureFormat::Depth32Float => GlTextureFormat {
            internal_format: glow::DEPTH_COMPONENT32F,
            format: glow::DEPTH_COMPONENT,
            data_type: glow::FLOAT,
        },
    }
}

pub(crate) fn attachment_to_gl(attachment: Attachment) -> u32 {
    match attachment {
        Attachment::Color0 => glow::COLOR_ATTACHMENT0,
        Attachment::Depth => glow::DEPTH_ATTACHMENT,
    }
}

/// Map a `glCheckFramebufferStatus` result
///
/// Codes without an engine counterpart are reported as `Unsupported`.
pub(crate) fn framebuffer_status_from_gl(status: u32) -> FramebufferStatus {
    match status {
        glow::FRAMEBUFFER_COMPLETE => FramebufferStatus::Complete,
        glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => FramebufferStatus::IncompleteAttachment,
        glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => FramebufferStatus::MissingAttachment,
        glow::FRAMEBUFFER_INCOMPLETE_DIMENSIONS => FramebufferStatus::IncompleteDimensions,
        glow::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => FramebufferStatus::IncompleteMultisample,
        _ => FramebufferStatus::Unsupported,
    }
}

pub(crate) fn topology_to_gl(topology: PrimitiveTopology) -> u32 {
    match topology {
        PrimitiveTopology::Triangles => glow::TRIANGLES,
        PrimitiveTopology::Lines => glow::LINES,
    }
}

pub(crate) fn buffer_kind_to_gl(kind: BufferKind) -> u32 {
    match kind {
        BufferKind::Vertex => glow::ARRAY_BUFFER,
        BufferKind::Index => glow::ELEMENT_ARRAY_BUFFER,
    }
}

pub(crate) fn clear_mask(flags: ClearFlags) -> u32 {
    let mut mask = 0;
    if flags.contains(ClearFlags::COLOR) {
        mask |= glow::COLOR_BUFFER_BIT;
    }
    if flags.contains(ClearFlags::DEPTH) {
        mask |= glow::DEPTH_BUFFER_BIT;
    }
    mask
}

#[cfg(test)]
#[path = "gl_format_tests.rs"]
mod tests;
