//! Vault envelope operations: the persisted format, the authenticated
//! cipher pair, password verification, rekeying, and the storage seam.

pub mod cipher;
pub mod envelope;
pub mod ops;
pub mod rekey;
pub mod storage;
pub mod verifier;

#[cfg(feature = "async")]
pub mod ops_async;

pub use cipher::{decrypt, encrypt};
pub use envelope::{ENVELOPE_VERSION, EncryptedEnvelope, IV_LENGTH, TAG_LENGTH};
pub use ops::{UnlockedVault, create_vault, unlock_vault};
pub use rekey::{RekeyOutcome, rekey_vault};
pub use storage::{FsVaultStore, StorageError, VaultStore};
pub use verifier::verify_password;
