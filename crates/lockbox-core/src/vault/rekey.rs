#![forbid(unsafe_code)]

//! Master-password rotation.
//!
//! Rekeying is a two-phase handoff. This module implements only the pure
//! compute phase: derive a new key from the new password and a brand-new
//! salt, and re-encrypt the full plaintext secret set into a new envelope.
//! Nothing is persisted here. The caller commits the returned envelope to
//! storage and only then adopts the returned session; if the storage write
//! fails, the old envelope and old key remain valid and the caller rolls
//! back by simply keeping them.

use crate::crypto::CryptoError;
use crate::crypto::kdf::{Salt, derive_key};

use super::cipher;
use super::envelope::EncryptedEnvelope;
use super::ops::UnlockedVault;

/// The artifacts of a completed rekey computation.
///
/// Both halves are returned together so the caller can keep the session
/// unlocked under the new credentials without forcing re-authentication.
#[derive(Debug)]
pub struct RekeyOutcome {
    /// The new session: key derived from the new password, with its new salt.
    pub vault: UnlockedVault,
    /// The new envelope to persist, replacing the old one.
    pub envelope: EncryptedEnvelope,
}

/// Re-derive and re-encrypt the vault under a new master password.
///
/// A fresh salt is always generated; the old salt is never reused, so key
/// material captured from the old envelope cannot be correlated with the new
/// one. The operation either yields a complete, valid `(key, envelope)` pair
/// or fails as a unit; there is no partial-commit window visible to the
/// caller.
///
/// Password strength and confirmation-match checks are the UI layer's
/// responsibility, not this function's.
///
/// # Errors
///
/// Propagates derivation and encryption failures from the underlying
/// primitives. Does not touch storage, so no storage error can originate
/// here.
pub fn rekey_vault(plaintext: &[u8], new_password: &str) -> Result<RekeyOutcome, CryptoError> {
    let salt = Salt::generate();
    let master_key = derive_key(new_password, &salt)?;
    let envelope = cipher::encrypt(plaintext, &master_key, &salt)?;
    tracing::info!("vault rekeyed under new master password");
    Ok(RekeyOutcome {
        vault: UnlockedVault::new(master_key, salt),
        envelope,
    })
}
