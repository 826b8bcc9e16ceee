//! # lockbox-core
//!
//! The cryptographic envelope layer of a client-side secret vault. A master
//! password is stretched into a 256-bit key with PBKDF2-HMAC-SHA256, the
//! serialized secret collection is sealed with AES-256-GCM, and only the
//! resulting [`EncryptedEnvelope`] (salt, nonce, ciphertext+tag, format
//! version) ever reaches storage.
//!
//! The library is deliberately small and layered:
//!
//! - [`crypto::kdf`] turns a password and a [`Salt`] into an opaque
//!   [`MasterKey`] that never exposes raw key bytes.
//! - [`vault::cipher`] is the stateless encrypt/decrypt pair. Any
//!   authentication failure surfaces as the single generic
//!   [`CryptoError::DecryptionFailed`], so a caller cannot tell a wrong
//!   password from tampered ciphertext.
//! - [`vault::verifier`] answers "is this the right password?" as a plain
//!   boolean without revealing plaintext.
//! - [`vault::rekey`] re-encrypts the full plaintext under a fresh salt and
//!   key, returning both so the caller can commit the new envelope and only
//!   then adopt the new key.
//! - [`vault::storage`] is the blob-store seam the envelope is persisted
//!   through.
//!
//! The record structure inside the payload is opaque to this crate; callers
//! serialize their secret collection to bytes before sealing it.
//!
//! # Example
//!
//! ```
//! use lockbox_core::vault::ops::{create_vault, unlock_vault};
//!
//! let (vault, envelope) = create_vault("correct-horse-battery")?;
//! let (reopened, plaintext) = unlock_vault("correct-horse-battery", &envelope)?;
//! assert_eq!(&*plaintext, b"[]");
//! # drop((vault, reopened));
//! # Ok::<(), lockbox_core::CryptoError>(())
//! ```

pub mod crypto;
pub mod vault;

pub use crypto::CryptoError;
pub use crypto::kdf::{Salt, derive_key};
pub use crypto::keys::MasterKey;
pub use vault::envelope::EncryptedEnvelope;
pub use vault::ops::{UnlockedVault, create_vault, unlock_vault};
pub use vault::rekey::{RekeyOutcome, rekey_vault};
pub use vault::storage::{FsVaultStore, StorageError, VaultStore};
pub use vault::verifier::verify_password;

#[cfg(feature = "async")]
pub use vault::ops_async::{
    create_vault_async, derive_key_async, rekey_vault_async, unlock_vault_async,
    verify_password_async,
};
