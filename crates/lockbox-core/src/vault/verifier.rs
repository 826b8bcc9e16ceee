#![forbid(unsafe_code)]

//! Password verification against an existing envelope.

use crate::crypto::kdf::derive_key;

use super::cipher;
use super::envelope::EncryptedEnvelope;

/// Test a candidate password against an envelope without exposing plaintext.
///
/// Extracts the salt from the envelope, derives a candidate key, and attempts
/// decryption; returns `true` iff the envelope authenticates under that key.
/// The decrypted plaintext never leaves this function.
///
/// This is a pure yes/no predicate: a wrong password is a normal `false`, and
/// any other failure (malformed envelope, key-access error) also degrades to
/// `false` rather than propagating. No state is read or written beyond the
/// arguments.
pub fn verify_password(password: &str, envelope: &EncryptedEnvelope) -> bool {
    let Ok(salt) = envelope.salt() else {
        tracing::debug!("password verification failed: malformed envelope salt");
        return false;
    };
    let Ok(key) = derive_key(password, &salt) else {
        return false;
    };
    cipher::decrypt(envelope, &key).is_ok()
}
