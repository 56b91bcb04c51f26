//! The emission orchestrator.
//!
//! [`EmitStreamManager`] decides where serialized output lands. Without
//! signing, the destination stream is handed out directly. With file-based
//! strong-name signing, output is staged in a freshly named temp file,
//! signed on disk, and copied byte for byte into the real destination. The
//! temp stream is the only resource the manager owns; the destination is
//! borrowed and never closed here.

use std::fs::File;
use std::path::{Path, PathBuf};

use peridot_core::{Diagnostic, Diagnostics, EmitIoError, SigningError};
use uuid::Uuid;

use crate::signing::{SigningKeys, SigningKind, StrongNameProvider};
use crate::stream::{EmitStream, StreamProvider};

/// The temp resource backing a sign-via-file emission.
///
/// Owns the open stream and the path it lives at, so the completion logic
/// can close one and delete the other without null checks.
struct TempFile {
    file: File,
    path: PathBuf,
}

/// Where emission output currently goes.
enum StreamState<'a> {
    /// No stream has been created yet.
    Unstarted,
    /// Output goes straight into the borrowed destination.
    Direct {
        destination: &'a mut dyn EmitStream,
    },
    /// Output goes into an owned temp file; the destination is filled at
    /// completion after signing.
    ViaTempFile {
        destination: &'a mut dyn EmitStream,
        temp: TempFile,
    },
    /// The emission completed or was abandoned; nothing left to release.
    Consumed,
}

impl<'a> StreamState<'a> {
    /// The stream serialized output should currently be written to.
    fn working(&mut self) -> Option<&mut dyn EmitStream> {
        match self {
            StreamState::Direct { destination } => Some(&mut **destination),
            StreamState::ViaTempFile { temp, .. } => Some(&mut temp.file),
            StreamState::Unstarted | StreamState::Consumed => None,
        }
    }
}

/// Manages the output stream for a single emission.
///
/// One emission operation owns one manager: call
/// [`create_stream`](EmitStreamManager::create_stream) (or hand out the
/// [`stream_factory`](EmitStreamManager::stream_factory)) exactly once,
/// write the compiled binary into the returned stream, then finish with
/// exactly one of [`complete`](EmitStreamManager::complete) or
/// [`close`](EmitStreamManager::close). Dropping the manager releases the
/// temp stream the same way `close` does.
///
/// # Example
///
/// ```no_run
/// use peridot_core::Diagnostics;
/// use peridot_emit::{EmitStreamManager, SigningKind, SimpleStreamProvider};
/// use std::io::Cursor;
///
/// let mut destination = Cursor::new(Vec::new());
/// let mut provider = SimpleStreamProvider::new(&mut destination);
/// let mut diagnostics = Diagnostics::new();
/// let mut manager = EmitStreamManager::new(&mut provider, SigningKind::None, None);
///
/// if let Some(stream) = manager.create_stream(&mut diagnostics)? {
///     stream.write_all(b"...compiled binary...")?;
/// }
/// let succeeded = manager.complete(&Default::default(), &mut diagnostics);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct EmitStreamManager<'a> {
    /// Consumed on first use; never consulted again after stream creation.
    provider: Option<&'a mut dyn StreamProvider>,
    signing: SigningKind,
    strong_name: Option<&'a dyn StrongNameProvider>,
    state: StreamState<'a>,
}

impl<'a> EmitStreamManager<'a> {
    /// Create a manager for one emission request.
    ///
    /// # Panics
    ///
    /// Panics if `signing` is [`SigningKind::SignViaFile`] and no
    /// strong-name provider was supplied.
    pub fn new(
        provider: &'a mut dyn StreamProvider,
        signing: SigningKind,
        strong_name: Option<&'a dyn StrongNameProvider>,
    ) -> Self {
        assert!(
            signing != SigningKind::SignViaFile || strong_name.is_some(),
            "sign-via-file emission requires a strong-name provider"
        );
        Self {
            provider: Some(provider),
            signing,
            strong_name,
            state: StreamState::Unstarted,
        }
    }

    /// Returns a lazy stream producer for the serializer to invoke.
    ///
    /// The closure performs [`create_stream`](EmitStreamManager::create_stream)
    /// when called; being `FnOnce`, a second invocation is ruled out at
    /// compile time.
    pub fn stream_factory<'m>(
        &'m mut self,
        diagnostics: &'m mut Diagnostics,
    ) -> impl FnOnce() -> Result<Option<&'m mut dyn EmitStream>, EmitIoError> {
        move || EmitStreamManager::create_stream(self, diagnostics)
    }

    /// Create the working stream for this emission.
    ///
    /// Returns `Ok(None)` without touching anything when `diagnostics`
    /// already holds errors, or when the destination provider cannot supply
    /// a stream (in which case the provider has diagnosed the failure
    /// itself). Otherwise the returned stream is the destination directly,
    /// or a fresh temp file when signing requires an on-disk round trip.
    ///
    /// # Errors
    ///
    /// [`EmitIoError`] if the temp file cannot be created. That failure
    /// aborts the whole emission, not just this stream.
    ///
    /// # Panics
    ///
    /// Panics if a stream was already requested from this manager.
    pub fn create_stream(
        &mut self,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<&mut dyn EmitStream>, EmitIoError> {
        if diagnostics.has_errors() {
            return Ok(None);
        }

        let provider = self
            .provider
            .take()
            .expect("emission output stream already requested");

        let Some(destination) = provider.stream(diagnostics) else {
            debug_assert!(
                diagnostics.has_errors(),
                "stream provider returned no stream without diagnosing why"
            );
            return Ok(None);
        };

        match self.signing {
            SigningKind::None => {
                self.state = StreamState::Direct { destination };
            }
            SigningKind::SignViaFile => {
                let strong_name = self
                    .strong_name
                    .expect("strong-name provider checked at construction");
                let fs = strong_name.file_system();
                // 128-bit random name, rendered as 32 hex chars, no extension.
                let path = fs.temp_dir().join(Uuid::new_v4().simple().to_string());
                let file = fs.create_file_stream(&path)?;
                self.state = StreamState::ViaTempFile {
                    destination,
                    temp: TempFile { file, path },
                };
            }
        }

        Ok(self.state.working())
    }

    /// Finish the emission, signing and copying back if a temp file is in play.
    ///
    /// For a direct emission the destination already holds the output and
    /// this only marks the manager consumed. For a sign-via-file emission
    /// the temp stream is flushed to disk and closed, the strong-name
    /// provider signs the file in place, and the signed bytes are copied
    /// byte for byte into the destination. Every completion-time failure is
    /// recorded as a diagnostic and reported through the return value; the
    /// temp file is deleted best-effort on all of those paths.
    ///
    /// Returns `true` when the destination received a usable artifact.
    ///
    /// # Panics
    ///
    /// Panics if no stream was created first, or if the manager was already
    /// consumed.
    pub fn complete(&mut self, keys: &SigningKeys, diagnostics: &mut Diagnostics) -> bool {
        match std::mem::replace(&mut self.state, StreamState::Consumed) {
            StreamState::Unstarted => {
                panic!("complete called before the emission stream was created")
            }
            StreamState::Consumed => panic!("emission already completed or closed"),
            // The destination was written directly and is not ours to close.
            StreamState::Direct { .. } => true,
            StreamState::ViaTempFile { destination, temp } => {
                let strong_name = self
                    .strong_name
                    .expect("strong-name provider checked at construction");
                let TempFile { file, path } = temp;
                let success =
                    sign_and_copy(strong_name, keys, file, &path, destination, diagnostics);
                // Hygiene only; deletion failure is swallowed.
                let _ = std::fs::remove_file(&path);
                success
            }
        }
    }

    /// Release all resources without completing the emission.
    ///
    /// Idempotent, and safe to call in any state. Drops the temp stream if
    /// one exists and clears every held reference. The destination stream
    /// is never touched.
    pub fn close(&mut self) {
        self.provider = None;
        self.state = StreamState::Consumed;
    }
}

/// The sign-via-file completion protocol, minus temp-file deletion.
///
/// Returns `false` after recording a diagnostic for any failure; never
/// propagates an error.
fn sign_and_copy(
    strong_name: &dyn StrongNameProvider,
    keys: &SigningKeys,
    file: File,
    path: &Path,
    destination: &mut dyn EmitStream,
    diagnostics: &mut Diagnostics,
) -> bool {
    // The signer reopens the file by path, so every byte must be durable
    // and the exclusive handle released before signing starts.
    if let Err(err) = file.sync_all() {
        diagnostics.add(Diagnostic::error_at(path, err.to_string()));
        return false;
    }
    drop(file);

    match strong_name.sign_file(keys, path) {
        Ok(()) => {}
        Err(err @ SigningError::ToolUnavailable) => {
            diagnostics.add(Diagnostic::error_at(path, err.to_string()));
            return false;
        }
        Err(SigningError::Io(message)) => {
            diagnostics.add(Diagnostic::error_at(path, message));
            return false;
        }
    }

    let bytes = match strong_name.file_system().read_all_bytes(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            diagnostics.add(Diagnostic::error_at(path, err.message));
            return false;
        }
    };

    if let Err(err) = destination.write_all(&bytes) {
        diagnostics.add(Diagnostic::error_at(path, err.to_string()));
        return false;
    }
    true
}
