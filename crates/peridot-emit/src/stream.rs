//! Stream contracts for emission destinations.
//!
//! The destination stream is always a borrowed resource: whoever supplied it
//! keeps ownership, and nothing in this crate ever closes it.

use std::fs::File;
use std::io::{Seek, Write};
use std::path::PathBuf;

use peridot_core::{Diagnostic, Diagnostics};

/// The stream shape emission works with.
///
/// The PE writer seeks while laying out sections, so plain `Write` is not
/// enough. Blanket-implemented for anything that can write and seek, which
/// covers `File` and `Cursor<Vec<u8>>` alike.
pub trait EmitStream: Write + Seek {}

impl<T: Write + Seek + ?Sized> EmitStream for T {}

impl std::fmt::Debug for dyn EmitStream + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn EmitStream")
    }
}

/// Supplies the real destination stream for an emission.
///
/// A provider that cannot produce a stream must push a diagnostic explaining
/// why before returning `None`; the emission manager adds nothing on top.
pub trait StreamProvider {
    /// Get or lazily create the destination stream.
    fn stream(&mut self, diagnostics: &mut Diagnostics) -> Option<&mut dyn EmitStream>;
}

/// A [`StreamProvider`] wrapping a stream the caller already holds.
pub struct SimpleStreamProvider<'s> {
    stream: &'s mut dyn EmitStream,
}

impl<'s> SimpleStreamProvider<'s> {
    /// Wrap an existing stream. The caller retains ownership.
    pub fn new(stream: &'s mut dyn EmitStream) -> Self {
        Self { stream }
    }
}

impl StreamProvider for SimpleStreamProvider<'_> {
    fn stream(&mut self, _diagnostics: &mut Diagnostics) -> Option<&mut dyn EmitStream> {
        Some(&mut *self.stream)
    }
}

/// A [`StreamProvider`] that lazily creates the destination file on disk.
///
/// Creation failure is self-diagnosed: the OS error lands in the
/// diagnostics sink against the destination path, and `None` is returned.
pub struct FileStreamProvider {
    path: PathBuf,
    file: Option<File>,
}

impl FileStreamProvider {
    /// Create a provider for the given destination path.
    ///
    /// No file is touched until [`StreamProvider::stream`] is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
        }
    }

    /// The destination path this provider writes to.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl StreamProvider for FileStreamProvider {
    fn stream(&mut self, diagnostics: &mut Diagnostics) -> Option<&mut dyn EmitStream> {
        if self.file.is_none() {
            match File::create(&self.path) {
                Ok(file) => self.file = Some(file),
                Err(err) => {
                    diagnostics.add(Diagnostic::error_at(&self.path, err.to_string()));
                    return None;
                }
            }
        }
        self.file.as_mut().map(|file| file as &mut dyn EmitStream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn simple_provider_hands_back_the_wrapped_stream() {
        let mut destination = Cursor::new(Vec::new());
        let mut provider = SimpleStreamProvider::new(&mut destination);
        let mut diagnostics = Diagnostics::new();

        let stream = provider.stream(&mut diagnostics).unwrap();
        stream.write_all(b"artifact").unwrap();

        assert!(diagnostics.is_empty());
        assert_eq!(destination.into_inner(), b"artifact");
    }

    #[test]
    fn file_provider_creates_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.dll");
        let mut provider = FileStreamProvider::new(&path);
        assert!(!path.exists());

        let mut diagnostics = Diagnostics::new();
        let stream = provider.stream(&mut diagnostics).unwrap();
        stream.write_all(b"bytes").unwrap();
        drop(stream);

        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), b"bytes");
    }

    #[test]
    fn file_provider_diagnoses_its_own_failure() {
        let dir = tempfile::tempdir().unwrap();
        // Parent directory does not exist, so creation must fail.
        let path = dir.path().join("missing").join("out.dll");
        let mut provider = FileStreamProvider::new(&path);

        let mut diagnostics = Diagnostics::new();
        assert!(provider.stream(&mut diagnostics).is_none());
        assert!(diagnostics.has_errors());
        assert_eq!(
            diagnostics.errors().next().unwrap().path.as_deref(),
            Some(path.as_path())
        );
    }
}
