#![forbid(unsafe_code)]

//! The persisted vault envelope.
//!
//! An [`EncryptedEnvelope`] is the only unit that ever reaches storage. All
//! binary fields are base64 strings on the wire:
//!
//! ```json
//! {
//!   "salt":    "<base64, 16 raw bytes>",
//!   "iv":      "<base64, 12 raw bytes>",
//!   "data":    "<base64, ciphertext || 16-byte tag>",
//!   "version": 1
//! }
//! ```
//!
//! Envelopes are immutable once written: every save produces a wholly new
//! envelope rather than patching an old one in place.

use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::serde_as;

use crate::crypto::CryptoError;
use crate::crypto::kdf::Salt;

/// Current envelope format version.
pub const ENVELOPE_VERSION: u32 = 1;

/// Length of the AES-GCM nonce, in bytes.
pub const IV_LENGTH: usize = 12;

/// Length of the AEAD authentication tag appended to the ciphertext, in bytes.
pub const TAG_LENGTH: usize = 16;

/// The encrypted vault as persisted to storage.
///
/// Bundles the key-derivation salt, the per-encryption nonce, the ciphertext
/// with its authentication tag, and a format version for future migrations.
/// Salt and nonce are not secret; the envelope leaks nothing about the
/// plaintext beyond its length.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncryptedEnvelope {
    /// Salt the master key was derived with. One envelope, one salt, one key.
    #[serde_as(as = "Base64")]
    pub salt: Vec<u8>,

    /// AES-GCM nonce, generated fresh for this encryption call and never
    /// reused with the same key.
    #[serde_as(as = "Base64")]
    pub iv: Vec<u8>,

    /// Ciphertext followed by the 16-byte AEAD authentication tag.
    #[serde_as(as = "Base64")]
    pub data: Vec<u8>,

    /// Envelope format version.
    pub version: u32,
}

impl EncryptedEnvelope {
    pub(crate) fn new(salt: &Salt, iv: Vec<u8>, data: Vec<u8>) -> Self {
        EncryptedEnvelope {
            salt: salt.as_bytes().to_vec(),
            iv,
            data,
            version: ENVELOPE_VERSION,
        }
    }

    /// Decode the embedded salt.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidSaltLength`] if the stored salt field has
    /// been truncated or padded.
    pub fn salt(&self) -> Result<Salt, CryptoError> {
        Salt::try_from(self.salt.as_slice())
    }
}
