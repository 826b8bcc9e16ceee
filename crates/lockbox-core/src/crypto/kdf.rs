#![forbid(unsafe_code)]

//! Password-based key derivation.
//!
//! A master password plus a random [`Salt`] is stretched into a 256-bit AES
//! key with PBKDF2-HMAC-SHA256 at a fixed high iteration count. Derivation is
//! deterministic: the same `(password, salt)` pair always yields the same key,
//! and different salts yield unrelated keys even for an identical password.

use std::num::NonZeroU32;

use rand::RngCore;
use ring::pbkdf2;
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

use super::CryptoError;
use super::keys::MasterKey;

/// Length of the random salt bound to each key derivation, in bytes.
pub const SALT_LENGTH: usize = 16;

/// PBKDF2 iteration count.
///
/// Fixed high count to impose brute-force cost on captured envelopes. The
/// count is part of the envelope format contract (it is not stored per
/// envelope), so raising it requires a format version bump.
pub const PBKDF2_ITERATIONS: u32 = 150_000;

const ITERATIONS: NonZeroU32 = NonZeroU32::new(PBKDF2_ITERATIONS).unwrap();

/// A salt for password-based key derivation.
///
/// Generated fresh for every vault creation and every rekey, and persisted in
/// the envelope alongside the ciphertext. The salt is not secret, but it must
/// never be reused across different passwords: the password-to-key mapping is
/// only valid for the salt it was derived with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Salt([u8; SALT_LENGTH]);

impl Salt {
    /// Generate a fresh random salt using a cryptographically secure RNG.
    pub fn generate() -> Self {
        let mut salt = [0u8; SALT_LENGTH];
        rand::rng().fill_bytes(&mut salt);
        Salt(salt)
    }

    /// The raw salt bytes.
    pub fn as_bytes(&self) -> &[u8; SALT_LENGTH] {
        &self.0
    }
}

impl From<[u8; SALT_LENGTH]> for Salt {
    fn from(bytes: [u8; SALT_LENGTH]) -> Self {
        Salt(bytes)
    }
}

impl TryFrom<&[u8]> for Salt {
    type Error = CryptoError;

    /// Decode a salt from raw bytes, failing on any length other than
    /// [`SALT_LENGTH`].
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let salt: [u8; SALT_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidSaltLength {
                    expected: SALT_LENGTH,
                    actual: bytes.len(),
                })?;
        Ok(Salt(salt))
    }
}

/// Derive a 256-bit master key from a password and salt.
///
/// The password is NFC-normalized first, so visually identical passwords
/// typed on different platforms derive the same key. Derivation is a pure
/// function of its inputs: it never logs, caches, or persists the password or
/// the derived key material beyond the returned handle.
///
/// Password content is never a failure cause. An empty password derives a
/// valid (if weak) key; minimum-strength policy belongs to the caller's UI
/// layer.
///
/// # Errors
///
/// Returns [`CryptoError::KeyAccess`] if memory protection for the derived
/// key cannot be initialized.
pub fn derive_key(password: &str, salt: &Salt) -> Result<MasterKey, CryptoError> {
    let normalized = Zeroizing::new(password.nfc().collect::<String>());

    let mut key = Zeroizing::new([0u8; 32]);
    let start = std::time::Instant::now();
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        ITERATIONS,
        salt.as_bytes(),
        normalized.as_bytes(),
        &mut key[..],
    );
    tracing::debug!(elapsed = ?start.elapsed(), "PBKDF2 key derivation complete");

    Ok(MasterKey::new(*key)?)
}
