#![forbid(unsafe_code)]

use std::fmt;
use std::sync::RwLock;

use aes_gcm::{Aes256Gcm, Key, KeyInit};
use memsafe::MemSafe;
use thiserror::Error;

/// Error type for key access operations.
///
/// This error can occur when accessing protected key material, either due to
/// memory protection failures or lock poisoning (a thread panicked while holding the lock).
#[derive(Debug, Error)]
pub enum KeyAccessError {
    /// Memory protection operation failed (mlock, mprotect, etc.)
    #[error("Memory protection operation failed: {0}")]
    MemoryProtection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Lock was poisoned (a thread panicked while holding it)
    #[error("Key lock was poisoned")]
    LockPoisoned,
}

impl KeyAccessError {
    /// Create a memory protection error from any error type.
    pub fn memory_protection<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        KeyAccessError::MemoryProtection(Box::new(err))
    }
}

/// The master encryption key for an unlocked vault.
///
/// This is an opaque handle around the 256-bit AES key derived from the
/// master password. It can be used to encrypt and decrypt, and nothing else:
/// it is never serializable, has no byte accessor, and its `Debug` output is
/// redacted.
///
/// # Security
///
/// The key is stored using the `memsafe` crate's `MemSafe` type, which provides:
/// - **Memory locking**: the key is pinned in RAM via `mlock`, preventing swap to disk
/// - **Access control**: memory is protected with `mprotect(PROT_NONE)` when not in use
/// - **Dump exclusion**: on Linux, `MADV_DONTDUMP` excludes the key from core dumps
/// - **Zeroization**: memory is securely zeroed when the key is dropped
///
/// Access to key material goes through the scoped [`with_key`](Self::with_key)
/// method, which temporarily elevates memory permissions to read the key and
/// revokes access as soon as the callback returns.
///
/// # Lifetime
///
/// Exactly one live `MasterKey` exists per unlocked session. Locking the
/// vault means dropping this handle (and any decrypted plaintext), at which
/// point the backing memory is zeroed.
///
/// # Thread Safety
///
/// `MasterKey` is `Send + Sync` and can be shared across threads via
/// `Arc<MasterKey>`. If a thread panics while holding the internal lock, the
/// key becomes inaccessible (lock poisoning) as a safety measure.
pub struct MasterKey {
    key: RwLock<MemSafe<[u8; 32]>>,
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(<redacted>)")
    }
}

impl MasterKey {
    /// Create a master key from raw key material.
    ///
    /// The provided array is copied into a `MemSafe` container; the caller is
    /// responsible for zeroing its own copy if it holds sensitive data
    /// (derivation in [`crate::crypto::kdf`] uses a `Zeroizing` buffer).
    ///
    /// # Errors
    ///
    /// Returns a `KeyAccessError` if memory protection initialization fails.
    /// This can happen if the system's mlock limit is exceeded or if the
    /// memory protection syscalls fail.
    pub fn new(key: [u8; 32]) -> Result<Self, KeyAccessError> {
        Ok(MasterKey {
            key: RwLock::new(MemSafe::new(key).map_err(KeyAccessError::memory_protection)?),
        })
    }

    /// Generate a random master key using a cryptographically secure RNG.
    ///
    /// In production flows keys come from
    /// [`derive_key`](crate::crypto::kdf::derive_key); random keys are useful
    /// for exercising the cipher layer without paying for PBKDF2.
    ///
    /// # Errors
    ///
    /// Returns a `KeyAccessError` if memory protection initialization fails.
    pub fn random() -> Result<Self, KeyAccessError> {
        use rand::RngCore;
        let mut key = [0u8; 32];
        rand::rng().fill_bytes(&mut key);
        Self::new(key)
    }

    /// Try to clone the master key, returning an error on failure.
    ///
    /// There is intentionally no `Clone` impl; duplicating key material is an
    /// explicit, fallible act.
    pub fn try_clone(&self) -> Result<Self, KeyAccessError> {
        let key = {
            let mut lock = self.key.write().map_err(|_| KeyAccessError::LockPoisoned)?;
            let guard = lock.read().map_err(KeyAccessError::memory_protection)?;
            *guard
        };
        Self::new(key)
    }

    /// Execute a function with access to the raw 256-bit key.
    ///
    /// The callback cannot store references to the key; memory permissions
    /// are elevated only for the duration of the call.
    ///
    /// # Errors
    ///
    /// Returns a `KeyAccessError` if the lock is poisoned or if
    /// memory protection operations fail.
    pub fn with_key<F, R>(&self, f: F) -> Result<R, KeyAccessError>
    where
        F: FnOnce(&[u8; 32]) -> R,
    {
        let mut lock = self.key.write().map_err(|_| KeyAccessError::LockPoisoned)?;
        let guard = lock.read().map_err(KeyAccessError::memory_protection)?;
        Ok(f(&guard))
    }

    /// Create an AES-256-GCM cipher instance keyed with this master key.
    ///
    /// The `Aes256Gcm` value holds its own copy of the key schedule; keep it
    /// short-lived and let it drop with the operation that needed it.
    ///
    /// # Errors
    ///
    /// Returns a `KeyAccessError` if the lock is poisoned or if
    /// memory protection operations fail.
    pub fn create_cipher(&self) -> Result<Aes256Gcm, KeyAccessError> {
        self.with_key(|key_bytes| {
            let key: &Key<Aes256Gcm> = key_bytes.into();
            Aes256Gcm::new(key)
        })
    }
}
