//! Error types for the Galaxy3D post-process crate
//!
//! Errors raised by the GPU backend are propagated to the caller unchanged.
//! Errors raised by this crate go through the `engine_bail!` / `engine_err!`
//! macros so they are logged before being returned.

use std::fmt;

/// Result type for Galaxy3D post-process operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D post-process errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Error reported by the graphics device backend
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (unknown post process, missing render target, etc.)
    InvalidResource(String),

    /// A render target was requested with a zero width or height
    InvalidSize {
        width: u32,
        height: u32,
    },

    /// The GPU backend refused to allocate a render target
    ResourceCreationFailure(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InvalidSize { width, height } => {
                write!(f, "Invalid render target size: {}x{}", width, height)
            }
            Error::ResourceCreationFailure(msg) => {
                write!(f, "Render target creation failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR and build a `BackendError` from the message
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_post_process::engine_err;
/// let err = engine_err!("galaxy3d::vulkan", "Failed to bind framebuffer: {}", 7);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::BackendError(message)
    }};
}

/// Log a WARN and build a `BackendError` from the message
#[macro_export]
macro_rules! engine_warn_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_warn!($source, "{}", message);
        $crate::galaxy3d::Error::BackendError(message)
    }};
}

/// Log an ERROR and return `Err(BackendError)` from the enclosing function
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

/// Log a WARN and return `Err(BackendError)` from the enclosing function
#[macro_export]
macro_rules! engine_bail_warn {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_warn_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
