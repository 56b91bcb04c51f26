//! Filesystem capability for emission.
//!
//! Strong-name signing operates on a real on-disk file, so the emission
//! manager has to touch the filesystem. This module keeps that
//! surface behind the [`FileSystem`] trait: production code delegates to OS
//! primitives via [`HostFileSystem`], while tests substitute a single
//! operation through [`ReadBytesOverride`] without reimplementing the rest.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::EmitIoError;

/// Indirection over the OS file primitives emission needs.
pub trait FileSystem {
    /// Read the full contents of a file.
    fn read_all_bytes(&self, path: &Path) -> Result<Vec<u8>, EmitIoError>;

    /// The directory where emission temp files are placed.
    fn temp_dir(&self) -> PathBuf;

    /// Create a new file opened for exclusive read-write.
    ///
    /// The file must not already exist; a collision is an error rather than
    /// a silent truncation.
    ///
    /// # Errors
    ///
    /// Any OS failure is translated into [`EmitIoError`] carrying the path.
    fn create_file_stream(&self, path: &Path) -> Result<File, EmitIoError>;
}

/// The production filesystem, delegating directly to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostFileSystem;

impl FileSystem for HostFileSystem {
    fn read_all_bytes(&self, path: &Path) -> Result<Vec<u8>, EmitIoError> {
        std::fs::read(path).map_err(|err| EmitIoError::new(path, &err))
    }

    fn temp_dir(&self) -> PathBuf {
        std::env::temp_dir()
    }

    fn create_file_stream(&self, path: &Path) -> Result<File, EmitIoError> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|err| EmitIoError::new(path, &err))
    }
}

/// A [`FileSystem`] that overrides byte-reading and delegates everything
/// else to [`HostFileSystem`].
///
/// Composition keeps targeted fault injection cheap: a test swaps out the
/// one primitive it cares about and inherits real behavior for the rest.
///
/// # Examples
///
/// ```
/// use peridot_core::fs::{FileSystem, ReadBytesOverride};
/// use peridot_core::EmitIoError;
///
/// let fs = ReadBytesOverride::new(|path| {
///     Err(EmitIoError::with_message(path, "simulated read failure"))
/// });
/// assert!(fs.read_all_bytes("anything".as_ref()).is_err());
/// ```
pub struct ReadBytesOverride<F> {
    inner: HostFileSystem,
    read: F,
}

impl<F> ReadBytesOverride<F>
where
    F: Fn(&Path) -> Result<Vec<u8>, EmitIoError>,
{
    /// Wrap the production filesystem with a replacement `read_all_bytes`.
    pub fn new(read: F) -> Self {
        Self {
            inner: HostFileSystem,
            read,
        }
    }
}

impl<F> FileSystem for ReadBytesOverride<F>
where
    F: Fn(&Path) -> Result<Vec<u8>, EmitIoError>,
{
    fn read_all_bytes(&self, path: &Path) -> Result<Vec<u8>, EmitIoError> {
        (self.read)(path)
    }

    fn temp_dir(&self) -> PathBuf {
        self.inner.temp_dir()
    }

    fn create_file_stream(&self, path: &Path) -> Result<File, EmitIoError> {
        self.inner.create_file_stream(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Seek, SeekFrom, Write};

    #[test]
    fn host_create_is_exclusive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifact");

        let mut file = HostFileSystem.create_file_stream(&path).unwrap();
        file.write_all(b"payload").unwrap();

        // The file already exists now, so a second create must fail.
        let err = HostFileSystem.create_file_stream(&path).unwrap_err();
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn host_create_is_read_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rw");

        let mut file = HostFileSystem.create_file_stream(&path).unwrap();
        file.write_all(b"abc").unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();

        let mut contents = String::new();
        file.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "abc");
    }

    #[test]
    fn host_read_all_bytes_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bytes");
        std::fs::write(&path, [1u8, 2, 3, 4]).unwrap();

        let bytes = HostFileSystem.read_all_bytes(&path).unwrap();
        assert_eq!(bytes, [1, 2, 3, 4]);
    }

    #[test]
    fn host_read_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing");
        let err = HostFileSystem.read_all_bytes(&path).unwrap_err();
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn override_replaces_only_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("real");
        std::fs::write(&path, b"on disk").unwrap();

        let fs = ReadBytesOverride::new(|path| {
            Err(EmitIoError::with_message(path, "injected fault"))
        });

        // Reading is overridden.
        let err = fs.read_all_bytes(&path).unwrap_err();
        assert_eq!(err.message, "injected fault");

        // Everything else still hits the host filesystem.
        assert_eq!(fs.temp_dir(), std::env::temp_dir());
        let created = dir.path().join("created-through-override");
        fs.create_file_stream(&created).unwrap();
        assert!(created.exists());
    }
}
