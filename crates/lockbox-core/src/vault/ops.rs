#![forbid(unsafe_code)]

//! High-level vault session operations.
//!
//! These compose the key derivation and cipher primitives into the flows an
//! application actually runs: create a vault on first use, unlock it with the
//! master password, and re-seal the payload on every save. The payload itself
//! is opaque bytes; callers serialize their secret collection before sealing.

use zeroize::Zeroizing;

use crate::crypto::CryptoError;
use crate::crypto::kdf::{Salt, derive_key};
use crate::crypto::keys::MasterKey;

use super::cipher;
use super::envelope::EncryptedEnvelope;

/// The serialized form of an empty secret collection.
pub const EMPTY_VAULT_PAYLOAD: &[u8] = b"[]";

/// An unlocked vault session: the master key together with the salt it was
/// derived from.
///
/// The salt is bound 1:1 to the key's derivation, so the pair travels
/// together; [`seal`](Self::seal) re-uses the session salt while generating a
/// fresh nonce for every call. Locking the vault means dropping this value,
/// which zeroes the backing key memory.
#[derive(Debug)]
pub struct UnlockedVault {
    master_key: MasterKey,
    salt: Salt,
}

impl UnlockedVault {
    pub(crate) fn new(master_key: MasterKey, salt: Salt) -> Self {
        UnlockedVault { master_key, salt }
    }

    /// The salt this session's key was derived with.
    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    /// The session's master key handle.
    pub fn master_key(&self) -> &MasterKey {
        &self.master_key
    }

    /// Encrypt the current plaintext payload into a new envelope.
    ///
    /// Called on every save. Produces a wholly new envelope (fresh nonce,
    /// new ciphertext); the previous envelope is untouched until the caller
    /// overwrites storage.
    ///
    /// # Errors
    ///
    /// Propagates [`CryptoError::EncryptionFailed`] and
    /// [`CryptoError::KeyAccess`] from the cipher layer.
    pub fn seal(&self, plaintext: &[u8]) -> Result<EncryptedEnvelope, CryptoError> {
        cipher::encrypt(plaintext, &self.master_key, &self.salt)
    }

    /// Decrypt an envelope under this session's key.
    ///
    /// # Errors
    ///
    /// [`CryptoError::DecryptionFailed`] if the envelope does not
    /// authenticate under this key (it was sealed under another password or
    /// has been tampered with).
    pub fn open(&self, envelope: &EncryptedEnvelope) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        cipher::decrypt(envelope, &self.master_key)
    }
}

/// Create a brand-new vault: fresh salt, derived key, empty payload sealed.
///
/// Returns the unlocked session and the envelope to persist. Nothing is
/// written to storage here; the caller commits the envelope through its
/// [`VaultStore`](super::storage::VaultStore).
///
/// # Errors
///
/// Propagates derivation and encryption failures; never fails on password
/// content (strength policy is the UI's concern).
pub fn create_vault(password: &str) -> Result<(UnlockedVault, EncryptedEnvelope), CryptoError> {
    let salt = Salt::generate();
    let master_key = derive_key(password, &salt)?;
    let envelope = cipher::encrypt(EMPTY_VAULT_PAYLOAD, &master_key, &salt)?;
    tracing::info!("created new vault envelope");
    Ok((UnlockedVault::new(master_key, salt), envelope))
}

/// Unlock a vault from its persisted envelope.
///
/// Derives the key from the embedded salt and decrypts the payload, returning
/// both the session handle and the plaintext so the caller can populate its
/// in-memory state without a second decrypt.
///
/// # Errors
///
/// - [`CryptoError::DecryptionFailed`] on a wrong password or a tampered
///   envelope (indistinguishable by design).
/// - [`CryptoError::InvalidSaltLength`] if the envelope's salt field is
///   malformed.
pub fn unlock_vault(
    password: &str,
    envelope: &EncryptedEnvelope,
) -> Result<(UnlockedVault, Zeroizing<Vec<u8>>), CryptoError> {
    let salt = envelope.salt()?;
    let start = std::time::Instant::now();
    let master_key = derive_key(password, &salt)?;
    let plaintext = cipher::decrypt(envelope, &master_key)?;
    tracing::debug!(elapsed = ?start.elapsed(), "vault unlocked");
    Ok((UnlockedVault::new(master_key, salt), plaintext))
}
