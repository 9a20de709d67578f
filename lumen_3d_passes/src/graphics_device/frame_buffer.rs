//! Framebuffer attachment slots, completeness status, and clear flags

use bitflags::bitflags;
use crate::error::{Error, IncompleteReason, Result};

/// Attachment slot of a framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attachment {
    /// First color attachment (`COLOR_ATTACHMENT0`)
    Color0,
    /// Depth attachment
    Depth,
}

/// Result of a framebuffer completeness check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramebufferStatus {
    Complete,
    IncompleteAttachment,
    MissingAttachment,
    IncompleteDimensions,
    Unsupported,
    IncompleteMultisample,
}

impl FramebufferStatus {
    /// Failure reason for this status, `None` when complete
    pub fn reason(&self) -> Option<IncompleteReason> {
        match self {
            FramebufferStatus::Complete => None,
            FramebufferStatus::IncompleteAttachment => Some(IncompleteReason::BadAttachment),
            FramebufferStatus::MissingAttachment => Some(IncompleteReason::MissingAttachment),
            FramebufferStatus::IncompleteDimensions => Some(IncompleteReason::DimensionMismatch),
            FramebufferStatus::Unsupported => Some(IncompleteReason::Unsupported),
            FramebufferStatus::IncompleteMultisample => Some(IncompleteReason::BadMultisample),
        }
    }

    /// Convert into `Ok(())` or `Error::FramebufferIncomplete`
    pub fn into_result(self) -> Result<()> {
        match self.reason() {
            None => Ok(()),
            Some(reason) => Err(Error::FramebufferIncomplete(reason)),
        }
    }
}

bitflags! {
    /// Buffers cleared by `GraphicsDevice::clear()`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearFlags: u8 {
        const COLOR = 0b01;
        const DEPTH = 0b10;
    }
}

/// Viewport rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Viewport covering `width` x `height` from the origin
    pub fn from_size(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }
}
