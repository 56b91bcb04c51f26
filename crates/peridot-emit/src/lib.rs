//! Artifact emission for the Peridot compiler pipeline.
//!
//! Turning a compiled result into a physical artifact is complicated by a
//! legacy constraint: strong-name signing can only operate on an on-disk
//! file, never an arbitrary stream. The [`EmitStreamManager`] owns that
//! dance: lazy exactly-once stream creation, the temp-file round trip,
//! signing delegation, byte-exact copy-back, and cleanup on every exit path.
//!
//! ## Modules
//!
//! - [`signing`]: Strong-name signing collaborators and key material
//! - [`stream`]: Stream contracts and destination providers
//! - [`stream_manager`]: The emission orchestrator
//!
//! # Example
//!
//! ```no_run
//! use peridot_core::Diagnostics;
//! use peridot_emit::{EmitStreamManager, SigningKind, SimpleStreamProvider};
//! use std::io::Cursor;
//!
//! let mut destination = Cursor::new(Vec::new());
//! let mut provider = SimpleStreamProvider::new(&mut destination);
//! let mut diagnostics = Diagnostics::new();
//!
//! let mut manager = EmitStreamManager::new(&mut provider, SigningKind::None, None);
//! let stream = manager.create_stream(&mut diagnostics)?;
//! // ... serialize the compiled binary into `stream` ...
//! drop(stream);
//! assert!(manager.complete(&Default::default(), &mut diagnostics));
//! # Ok::<(), peridot_core::EmitIoError>(())
//! ```

pub mod signing;
pub mod stream;
pub mod stream_manager;

pub use signing::{SigningKeys, SigningKind, StrongNameProvider};
pub use stream::{EmitStream, FileStreamProvider, SimpleStreamProvider, StreamProvider};
pub use stream_manager::EmitStreamManager;

// Re-export the core types emission callers always need.
pub use peridot_core::{Diagnostic, Diagnostics, EmitError, EmitIoError, SigningError};
