//! Core infrastructure for the Peridot emission pipeline.
//!
//! ## Modules
//!
//! - [`diagnostics`]: Append-only accumulator for emission errors and warnings
//! - [`error`]: Unified error types for artifact emission
//! - [`fs`]: Filesystem capability with a production implementation and
//!   composable test overrides

pub mod diagnostics;
pub mod error;
pub mod fs;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{EmitError, EmitIoError, SigningError};
pub use fs::{FileSystem, HostFileSystem, ReadBytesOverride};
