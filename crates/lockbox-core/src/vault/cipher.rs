#![forbid(unsafe_code)]

//! Authenticated encryption and decryption of the vault payload.
//!
//! A stateless AES-256-GCM transform pair keyed by an external
//! [`MasterKey`]. Every call to [`encrypt`] generates a fresh random nonce
//! internally; callers never supply one. Nonce reuse with the same key would
//! break both confidentiality and integrity, so there is deliberately no API
//! that accepts a caller-chosen nonce.
//!
//! [`decrypt`] collapses every authentication failure (wrong key, corrupted
//! ciphertext, tampered nonce or version) into the single
//! [`CryptoError::DecryptionFailed`] variant. Wrong password and tampering
//! are indistinguishable by design; see [`crate::vault::verifier`] for the
//! boolean password check.

use aead::{Aead, AeadCore, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use zeroize::Zeroizing;

use crate::crypto::CryptoError;
use crate::crypto::kdf::Salt;
use crate::crypto::keys::MasterKey;

use super::envelope::{ENVELOPE_VERSION, EncryptedEnvelope, IV_LENGTH};

/// Encrypt a plaintext payload under the given key, producing a new envelope.
///
/// The salt is passed through into the envelope, not regenerated: salt
/// identity belongs to the key's derivation, not to this encryption call.
/// Any plaintext size is accepted; the payload is sealed as a single unit
/// with no truncation.
///
/// # Errors
///
/// - [`CryptoError::EncryptionFailed`] if the AEAD backend rejects the
///   operation (environment-fatal, not caused by plaintext content).
/// - [`CryptoError::KeyAccess`] if the master key cannot be read.
pub fn encrypt(
    plaintext: &[u8],
    key: &MasterKey,
    salt: &Salt,
) -> Result<EncryptedEnvelope, CryptoError> {
    let cipher = key.create_cipher()?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let data = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|_| CryptoError::EncryptionFailed("AES-GCM encryption failed".to_string()))?;

    tracing::trace!(
        plaintext_len = plaintext.len(),
        ciphertext_len = data.len(),
        "sealed vault payload"
    );

    Ok(EncryptedEnvelope::new(salt, nonce.to_vec(), data))
}

/// Decrypt an envelope, returning the exact plaintext originally sealed.
///
/// The returned buffer is wrapped in [`Zeroizing`] so it is scrubbed when the
/// caller drops it. A successful decrypt implies the ciphertext authenticated,
/// i.e. no tampering occurred.
///
/// # Errors
///
/// - [`CryptoError::DecryptionFailed`] for any verification failure: wrong
///   key, corrupted or tampered ciphertext/nonce, or an unsupported envelope
///   version. The variants are intentionally not distinguished.
/// - [`CryptoError::KeyAccess`] if the master key cannot be read.
pub fn decrypt(
    envelope: &EncryptedEnvelope,
    key: &MasterKey,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if envelope.version != ENVELOPE_VERSION {
        return Err(CryptoError::DecryptionFailed);
    }

    let iv: [u8; IV_LENGTH] = envelope
        .iv
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::DecryptionFailed)?;

    let cipher = key.create_cipher()?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&iv), envelope.data.as_slice())
        .map_err(|_| CryptoError::DecryptionFailed)?;

    Ok(Zeroizing::new(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let key = MasterKey::random().unwrap();
        let salt = Salt::generate();
        let plaintext = b"the quick brown fox";

        let envelope = encrypt(plaintext, &key, &salt).unwrap();
        let decrypted = decrypt(&envelope, &key).unwrap();
        assert_eq!(&*decrypted, plaintext);
    }

    #[test]
    fn test_empty_plaintext_roundtrip() {
        let key = MasterKey::random().unwrap();
        let envelope = encrypt(b"", &key, &Salt::generate()).unwrap();

        // Even an empty payload carries a full authentication tag
        assert_eq!(envelope.data.len(), crate::vault::envelope::TAG_LENGTH);
        assert_eq!(&*decrypt(&envelope, &key).unwrap(), b"");
    }

    #[test]
    fn test_fresh_nonce_per_call() {
        let key = MasterKey::random().unwrap();
        let salt = Salt::generate();

        let a = encrypt(b"same plaintext", &key, &salt).unwrap();
        let b = encrypt(b"same plaintext", &key, &salt).unwrap();

        assert_ne!(a.iv, b.iv);
        assert_ne!(a.data, b.data);
    }

    #[test]
    fn test_salt_is_passed_through() {
        let key = MasterKey::random().unwrap();
        let salt = Salt::generate();

        let envelope = encrypt(b"payload", &key, &salt).unwrap();
        assert_eq!(envelope.salt, salt.as_bytes().to_vec());
    }

    #[test]
    fn test_wrong_key_fails() {
        let key = MasterKey::random().unwrap();
        let other = MasterKey::random().unwrap();
        let envelope = encrypt(b"payload", &key, &Salt::generate()).unwrap();

        assert!(matches!(
            decrypt(&envelope, &other),
            Err(CryptoError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = MasterKey::random().unwrap();
        let mut envelope = encrypt(b"payload", &key, &Salt::generate()).unwrap();
        envelope.data[0] ^= 0x01;

        assert!(matches!(
            decrypt(&envelope, &key),
            Err(CryptoError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_tampered_nonce_fails() {
        let key = MasterKey::random().unwrap();
        let mut envelope = encrypt(b"payload", &key, &Salt::generate()).unwrap();
        envelope.iv[3] ^= 0x80;

        assert!(matches!(
            decrypt(&envelope, &key),
            Err(CryptoError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_truncated_nonce_fails() {
        let key = MasterKey::random().unwrap();
        let mut envelope = encrypt(b"payload", &key, &Salt::generate()).unwrap();
        envelope.iv.pop();

        assert!(matches!(
            decrypt(&envelope, &key),
            Err(CryptoError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_unsupported_version_fails() {
        let key = MasterKey::random().unwrap();
        let mut envelope = encrypt(b"payload", &key, &Salt::generate()).unwrap();
        envelope.version = 2;

        assert!(matches!(
            decrypt(&envelope, &key),
            Err(CryptoError::DecryptionFailed)
        ));
    }
}
