//! Cryptographic primitives for the vault envelope layer

pub mod kdf;
pub mod keys;
mod thread_safety; // Send + Sync impls for MasterKey

use thiserror::Error;

use keys::KeyAccessError;

/// Errors that can occur during cryptographic operations.
///
/// # Security Classification
///
/// [`CryptoError::DecryptionFailed`] intentionally covers both wrong-password
/// and corrupted/tampered ciphertext. The two cases are cryptographically
/// indistinguishable (both manifest as an AEAD tag mismatch), and collapsing
/// them into one variant avoids giving an attacker an oracle that separates
/// them. Callers that need "is this the right password?" semantics should use
/// [`crate::vault::verifier::verify_password`] instead of matching on this
/// variant.
///
/// The remaining variants are programming errors (invalid parameters) or
/// environment failures (crypto backend, memory protection) and are never
/// produced by ordinary wrong-password flows.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// AEAD verification failed during decryption.
    ///
    /// Incorrect password or corrupted/tampered envelope. Recoverable: prompt
    /// for the password again or offer a vault reset. Never retried with the
    /// same inputs.
    #[error("Failed to decrypt vault - incorrect password or corrupted data")]
    DecryptionFailed,

    /// A salt had the wrong length.
    ///
    /// **[PROGRAMMING ERROR]** Salts are fixed at
    /// [`kdf::SALT_LENGTH`] bytes; this indicates a corrupted envelope field
    /// or an integration bug, not a user mistake.
    #[error("Invalid salt length: expected {expected}, got {actual}")]
    InvalidSaltLength { expected: usize, actual: usize },

    /// Key derivation could not run to completion.
    ///
    /// **[SYSTEM ERROR]** The PBKDF2 computation itself is infallible; this
    /// surfaces failures around it, such as a panicked worker task on the
    /// async surface. Not caused by password content.
    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    /// The AEAD backend rejected an encryption request.
    ///
    /// **[SYSTEM ERROR]** Treated as environment-fatal ("cryptographic
    /// operation unavailable"); not retried automatically.
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Key access failed due to a memory protection error.
    ///
    /// **[SYSTEM ERROR]** The mlock/mprotect subsystem guarding the master
    /// key failed, or a thread panicked while holding the key lock.
    #[error("Key access failed: {0}")]
    KeyAccess(#[from] KeyAccessError),
}

// Re-export commonly used types
pub use kdf::{Salt, derive_key};
pub use keys::MasterKey;
