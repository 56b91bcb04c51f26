//! Unified error types for artifact emission.
//!
//! Emission draws a hard line between two failure classes:
//!
//! ```text
//! EmitError (top-level wrapper)
//! ├── EmitIoError   - Fatal I/O failure while materializing output.
//! │                   Propagated with `?`; aborts the whole emission.
//! └── SigningError  - Completion-time signing fault. Returned by value,
//!                     downgraded to a diagnostic plus a `false` result so
//!                     the surrounding pipeline keeps aggregating errors.
//! ```
//!
//! Only the inability to produce output at all is worth unwinding for;
//! everything discovered at completion time is ordinary pipeline data.

use std::path::{Path, PathBuf};

use thiserror::Error;

// ============================================================================
// Emission I/O Errors
// ============================================================================

/// A fatal I/O failure while creating or reading emission output.
///
/// Raised when the temp file backing a signed emission cannot be created,
/// or when an overridden filesystem read fails. Carries the offending path
/// and the rendered OS error so the message survives cloning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("I/O error on '{}': {message}", .path.display())]
pub struct EmitIoError {
    /// The file the operation was targeting.
    pub path: PathBuf,
    /// The underlying OS error message.
    pub message: String,
}

impl EmitIoError {
    /// Wrap an [`std::io::Error`] for the given path.
    pub fn new(path: impl Into<PathBuf>, source: &std::io::Error) -> Self {
        Self {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create an error from a path and a plain message.
    pub fn with_message(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The path the failed operation was targeting.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

// ============================================================================
// Signing Errors
// ============================================================================

/// A failure reported by the strong-name signing collaborator.
///
/// Signing never unwinds the emission: both variants are recorded as
/// diagnostics by the stream manager and turned into a failed completion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    /// The signing toolchain is not available on this host.
    #[error("strong-name signing is not supported on this platform")]
    ToolUnavailable,

    /// Signing failed with an I/O fault; carries the underlying message.
    #[error("{0}")]
    Io(String),
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// The unified error type for emission operations.
///
/// Each variant uses `#[from]` to enable automatic conversion with the `?`
/// operator for callers that want a single error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    /// A fatal emission I/O error.
    #[error(transparent)]
    Io(#[from] EmitIoError),

    /// A signing error.
    #[error(transparent)]
    Signing(#[from] SigningError),
}

impl EmitError {
    /// Check if this is a fatal I/O error.
    pub fn is_io(&self) -> bool {
        matches!(self, EmitError::Io(_))
    }

    /// Check if this is a signing error.
    pub fn is_signing(&self) -> bool {
        matches!(self, EmitError::Signing(_))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = EmitIoError::with_message("/tmp/abc123", "permission denied");
        assert_eq!(
            format!("{err}"),
            "I/O error on '/tmp/abc123': permission denied"
        );
    }

    #[test]
    fn io_error_from_std() {
        let source = std::io::Error::other("disk full");
        let err = EmitIoError::new("/out/app.dll", &source);
        assert_eq!(err.path(), Path::new("/out/app.dll"));
        assert_eq!(err.message, "disk full");
    }

    #[test]
    fn signing_error_display() {
        assert_eq!(
            format!("{}", SigningError::ToolUnavailable),
            "strong-name signing is not supported on this platform"
        );
        assert_eq!(
            format!("{}", SigningError::Io("key container missing".into())),
            "key container missing"
        );
    }

    #[test]
    fn emit_error_from_io() {
        let err: EmitError = EmitIoError::with_message("/tmp/x", "oops").into();
        assert!(err.is_io());
        assert!(!err.is_signing());
        // #[error(transparent)] means it uses the inner error's Display
        assert_eq!(format!("{err}"), "I/O error on '/tmp/x': oops");
    }

    #[test]
    fn emit_error_from_signing() {
        let err: EmitError = SigningError::ToolUnavailable.into();
        assert!(err.is_signing());
    }
}
