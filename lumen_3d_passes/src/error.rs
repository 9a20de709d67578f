//! Error types for the Lumen3D pass pipeline
//!
//! This module defines the error type used throughout the crate,
//! including framebuffer completeness failures, binding discipline
//! violations, and backend errors.

use std::fmt;

/// Result type for Lumen3D operations
pub type Result<T> = std::result::Result<T, Error>;

/// Reason reported by a failed framebuffer completeness check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncompleteReason {
    /// An attachment is not attachment-complete (wrong format, deleted texture, ...)
    BadAttachment,
    /// No image is attached at all
    MissingAttachment,
    /// Attachments do not share the same width and height
    DimensionMismatch,
    /// The combination of attachment formats is not supported
    Unsupported,
    /// Attachments disagree on their sample count
    BadMultisample,
}

impl fmt::Display for IncompleteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IncompleteReason::BadAttachment => "FRAMEBUFFER_INCOMPLETE_ATTACHMENT",
            IncompleteReason::MissingAttachment => "FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT",
            IncompleteReason::DimensionMismatch => "FRAMEBUFFER_INCOMPLETE_DIMENSIONS",
            IncompleteReason::Unsupported => "FRAMEBUFFER_UNSUPPORTED",
            IncompleteReason::BadMultisample => "FRAMEBUFFER_INCOMPLETE_MULTISAMPLE",
        };
        f.write_str(name)
    }
}

/// Lumen3D errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (OpenGL, mock device, etc.)
    BackendError(String),

    /// Invalid resource (texture, framebuffer, program, etc.)
    InvalidResource(String),

    /// A device object (texture, framebuffer, buffer, program) could not be created
    InitializationFailed(String),

    /// Binding discipline violated (e.g. sampling a target that is still bound)
    InvalidState(String),

    /// Framebuffer completeness check failed after a resize
    FramebufferIncomplete(IncompleteReason),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Error::FramebufferIncomplete(reason) => {
                write!(f, "framebuffer object incomplete, {}", reason)
            }
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR and build an `Error::BackendError` from the same message
///
/// # Example
///
/// ```no_run
/// # use lumen_3d_passes::engine_err;
/// let err = engine_err!("lumen3d::DrawList", "Drawable {} not found", 3);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::lumen3d::Error::BackendError(message)
    }};
}

/// Log an ERROR and return early with an `Error::BackendError`
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

/// Log an ERROR and build an `Error::InitializationFailed` from the same message
#[macro_export]
macro_rules! engine_init_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::lumen3d::Error::InitializationFailed(message)
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
