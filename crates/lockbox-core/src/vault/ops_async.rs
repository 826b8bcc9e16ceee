#![forbid(unsafe_code)]

//! Asynchronous vault operations.
//!
//! PBKDF2 at the configured iteration count takes tens of milliseconds, long
//! enough to stall an async runtime's worker threads. These wrappers move the
//! CPU-bound derivation (and the cheap AEAD work that follows it) onto
//! `tokio::task::spawn_blocking`, mirroring the synchronous API in
//! [`ops`](super::ops), [`verifier`](super::verifier), and
//! [`rekey`](super::rekey).
//!
//! Arguments are taken by value because the work is handed to another thread.
//! Once started, an operation runs to completion or failure; there is no
//! mid-operation cancellation.

use tokio::task::spawn_blocking;
use zeroize::Zeroizing;

use crate::crypto::CryptoError;
use crate::crypto::kdf::{Salt, derive_key};
use crate::crypto::keys::MasterKey;

use super::envelope::EncryptedEnvelope;
use super::ops::{UnlockedVault, create_vault, unlock_vault};
use super::rekey::{RekeyOutcome, rekey_vault};
use super::verifier::verify_password;

fn join_failure(e: &tokio::task::JoinError) -> CryptoError {
    CryptoError::KeyDerivationFailed(format!("key derivation task failed: {e}"))
}

/// Async variant of [`derive_key`](crate::crypto::kdf::derive_key).
pub async fn derive_key_async(password: String, salt: Salt) -> Result<MasterKey, CryptoError> {
    let password = Zeroizing::new(password);
    spawn_blocking(move || derive_key(&password, &salt))
        .await
        .map_err(|e| join_failure(&e))?
}

/// Async variant of [`create_vault`](super::ops::create_vault).
pub async fn create_vault_async(
    password: String,
) -> Result<(UnlockedVault, EncryptedEnvelope), CryptoError> {
    let password = Zeroizing::new(password);
    spawn_blocking(move || create_vault(&password))
        .await
        .map_err(|e| join_failure(&e))?
}

/// Async variant of [`unlock_vault`](super::ops::unlock_vault).
pub async fn unlock_vault_async(
    password: String,
    envelope: EncryptedEnvelope,
) -> Result<(UnlockedVault, Zeroizing<Vec<u8>>), CryptoError> {
    let password = Zeroizing::new(password);
    spawn_blocking(move || unlock_vault(&password, &envelope))
        .await
        .map_err(|e| join_failure(&e))?
}

/// Async variant of [`verify_password`](super::verifier::verify_password).
///
/// A failed worker task degrades to `false`, preserving the boolean
/// contract.
pub async fn verify_password_async(password: String, envelope: EncryptedEnvelope) -> bool {
    let password = Zeroizing::new(password);
    spawn_blocking(move || verify_password(&password, &envelope))
        .await
        .unwrap_or(false)
}

/// Async variant of [`rekey_vault`](super::rekey::rekey_vault).
pub async fn rekey_vault_async(
    plaintext: Zeroizing<Vec<u8>>,
    new_password: String,
) -> Result<RekeyOutcome, CryptoError> {
    let new_password = Zeroizing::new(new_password);
    spawn_blocking(move || rekey_vault(&plaintext, &new_password))
        .await
        .map_err(|e| join_failure(&e))?
}
