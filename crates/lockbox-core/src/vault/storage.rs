#![forbid(unsafe_code)]

//! Storage collaborator for the persisted envelope.
//!
//! The envelope layer treats storage as an opaque blob store keyed by a
//! single fixed identifier. [`VaultStore`] is the seam; [`FsVaultStore`] is
//! the filesystem implementation, holding the envelope as one JSON document.
//! Storage errors are surfaced as-is; the envelope layer defines no retry or
//! recovery policy on top of them.

use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::envelope::EncryptedEnvelope;

/// Errors from the storage collaborator.
///
/// Propagated unchanged through the envelope layer; never folded into
/// [`CryptoError`](crate::crypto::CryptoError).
#[derive(Error, Debug)]
pub enum StorageError {
    /// Filesystem I/O failed (permissions, quota, missing directory).
    #[error("Vault storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The envelope could not be encoded for storage.
    #[error("Failed to encode vault envelope: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The stored blob exists but does not parse as an envelope.
    #[error("Stored vault data is corrupted: {0}")]
    Corrupted(#[source] serde_json::Error),
}

/// An opaque blob store holding at most one envelope.
pub trait VaultStore {
    /// Persist the envelope, replacing any previous one.
    fn save(&self, envelope: &EncryptedEnvelope) -> Result<(), StorageError>;

    /// Load the stored envelope, or `None` if no vault exists yet.
    fn load(&self) -> Result<Option<EncryptedEnvelope>, StorageError>;

    /// Whether a stored envelope exists.
    fn exists(&self) -> bool;

    /// Delete the stored envelope. Deleting a non-existent vault is not an
    /// error.
    fn delete(&self) -> Result<(), StorageError>;
}

/// Filesystem-backed vault store: one JSON file at a fixed path.
///
/// Saves are atomic: the envelope is written to a temporary file in the same
/// directory and renamed over the target, so a failed or interrupted save
/// leaves the previous envelope intact. This is what lets a caller roll back
/// a rekey when the commit fails.
#[derive(Debug, Clone)]
pub struct FsVaultStore {
    path: PathBuf,
}

impl FsVaultStore {
    /// Create a store for the vault file at `path`.
    ///
    /// The parent directory must exist; this constructor does not create it.
    pub fn new(path: impl AsRef<Path>) -> Self {
        FsVaultStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The path of the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the stored blob in bytes, or 0 if no vault exists.
    pub fn size(&self) -> Result<u64, StorageError> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }
}

impl VaultStore for FsVaultStore {
    fn save(&self, envelope: &EncryptedEnvelope) -> Result<(), StorageError> {
        let json = serde_json::to_vec(envelope).map_err(StorageError::Serialize)?;

        let mut tmp = tempfile::NamedTempFile::new_in(self.parent_dir())?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| StorageError::Io(e.error))?;

        tracing::debug!(path = %self.path.display(), bytes = json.len(), "vault envelope saved");
        Ok(())
    }

    fn load(&self) -> Result<Option<EncryptedEnvelope>, StorageError> {
        let json = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::Io(e)),
        };
        let envelope = serde_json::from_slice(&json).map_err(StorageError::Corrupted)?;
        Ok(Some(envelope))
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn delete(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::Salt;
    use crate::crypto::keys::MasterKey;
    use crate::vault::cipher;
    use tempfile::TempDir;

    fn sample_envelope() -> EncryptedEnvelope {
        let key = MasterKey::random().unwrap();
        cipher::encrypt(b"[]", &key, &Salt::generate()).unwrap()
    }

    fn store_in(temp: &TempDir) -> FsVaultStore {
        FsVaultStore::new(temp.path().join("vault.json"))
    }

    #[test]
    fn test_save_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        let envelope = sample_envelope();

        store.save(&envelope).unwrap();
        assert_eq!(store.load().unwrap(), Some(envelope));
    }

    #[test]
    fn test_load_absent_vault_is_none() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        assert!(!store.exists());
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(store.size().unwrap(), 0);
    }

    #[test]
    fn test_save_replaces_previous_envelope() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let first = sample_envelope();
        let second = sample_envelope();
        store.save(&first).unwrap();
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap(), Some(second));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        store.save(&sample_envelope()).unwrap();
        assert!(store.exists());

        store.delete().unwrap();
        assert!(!store.exists());
        store.delete().unwrap();
    }

    #[test]
    fn test_corrupted_blob_is_reported() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        fs::write(store.path(), b"not json at all").unwrap();

        assert!(matches!(store.load(), Err(StorageError::Corrupted(_))));
    }

    #[test]
    fn test_failed_save_leaves_previous_envelope_intact() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        let envelope = sample_envelope();
        store.save(&envelope).unwrap();

        // A store pointed at a missing directory cannot commit
        let broken = FsVaultStore::new(temp.path().join("missing").join("vault.json"));
        assert!(broken.save(&sample_envelope()).is_err());

        assert_eq!(store.load().unwrap(), Some(envelope));
    }

    #[test]
    fn test_size_reflects_stored_blob() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        store.save(&sample_envelope()).unwrap();

        let on_disk = fs::metadata(store.path()).unwrap().len();
        assert_eq!(store.size().unwrap(), on_disk);
        assert!(on_disk > 0);
    }
}
