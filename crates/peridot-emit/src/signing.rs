//! Strong-name signing collaborators.
//!
//! The signing toolchain operates on files in place, so the provider also
//! exposes the filesystem capability the emission manager uses to stage the
//! temp round trip.

use std::path::Path;

use peridot_core::fs::FileSystem;
use peridot_core::SigningError;

/// How an emitted artifact is to be signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningKind {
    /// The artifact is not signed; the destination stream is written directly.
    None,
    /// The artifact must be written to a temp file, signed on disk, and
    /// copied back into the destination.
    SignViaFile,
}

/// Key material for strong-name signing.
///
/// Either a key file on disk, a named key container managed by the signing
/// toolchain, or both may be present; the provider decides how to use them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SigningKeys {
    /// Path to a key pair file, if one was configured.
    pub key_file: Option<std::path::PathBuf>,
    /// Name of a key container, if one was configured.
    pub key_container: Option<String>,
}

impl SigningKeys {
    /// Keys backed by a key pair file.
    pub fn from_file(path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            key_file: Some(path.into()),
            key_container: None,
        }
    }

    /// Keys backed by a named key container.
    pub fn from_container(name: impl Into<String>) -> Self {
        Self {
            key_file: None,
            key_container: Some(name.into()),
        }
    }
}

/// Performs the physical strong-name signing of a file in place.
pub trait StrongNameProvider {
    /// The filesystem this provider stages its work through.
    ///
    /// The emission manager resolves the temp directory and reads signed
    /// bytes back through this capability, so tests can redirect both.
    fn file_system(&self) -> &dyn FileSystem;

    /// Sign the file at `path` in place with the given keys.
    ///
    /// # Errors
    ///
    /// [`SigningError::ToolUnavailable`] when the host has no signing
    /// toolchain, [`SigningError::Io`] for any other fault. A provider must
    /// never fail by silently doing nothing.
    fn sign_file(&self, keys: &SigningKeys, path: &Path) -> Result<(), SigningError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_from_file() {
        let keys = SigningKeys::from_file("/keys/app.snk");
        assert_eq!(keys.key_file.as_deref(), Some(Path::new("/keys/app.snk")));
        assert!(keys.key_container.is_none());
    }

    #[test]
    fn keys_from_container() {
        let keys = SigningKeys::from_container("VS_KEY_1234");
        assert!(keys.key_file.is_none());
        assert_eq!(keys.key_container.as_deref(), Some("VS_KEY_1234"));
    }

    #[test]
    fn default_keys_are_empty() {
        let keys = SigningKeys::default();
        assert_eq!(keys, SigningKeys { key_file: None, key_container: None });
    }
}
