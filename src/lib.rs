//! Peridot
//!
//! Binary-artifact emission for compiler back ends, built around one legacy
//! constraint: strong-name signing can only be applied to an on-disk file,
//! never to an arbitrary stream. The [`EmitStreamManager`] coordinates the
//! resulting temp-file round trip, from lazy exactly-once stream creation
//! through signing delegation and byte-exact copy-back, with cleanup on
//! every exit path.
//!
//! ## Crates
//!
//! - `peridot-core`: diagnostics sink, error taxonomy, filesystem capability
//! - `peridot-emit`: stream/signing contracts and the emission orchestrator
//!
//! This crate re-exports both for convenience.

pub use peridot_core::{
    Diagnostic, DiagnosticKind, Diagnostics, EmitError, EmitIoError, FileSystem, HostFileSystem,
    ReadBytesOverride, SigningError,
};
pub use peridot_emit::{
    EmitStream, EmitStreamManager, FileStreamProvider, SigningKeys, SigningKind,
    SimpleStreamProvider, StreamProvider, StrongNameProvider,
};

/// The filesystem module from `peridot-core`, for implementors of custom
/// [`FileSystem`] capabilities.
pub use peridot_core::fs;
