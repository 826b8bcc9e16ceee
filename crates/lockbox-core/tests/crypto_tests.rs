mod crypto_tests {
    use lockbox_core::vault::cipher::{decrypt, encrypt};
    use lockbox_core::{MasterKey, Salt};
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn test_envelope_roundtrip(plaintext in prop::collection::vec(any::<u8>(), 0..10_000)) {
            let key = MasterKey::random().unwrap();
            let salt = Salt::generate();

            let envelope = encrypt(&plaintext, &key, &salt).unwrap();
            let decrypted = decrypt(&envelope, &key).unwrap();
            prop_assert_eq!(&plaintext, &*decrypted);
        }

        #[test]
        fn test_ciphertext_integrity(
            plaintext in prop::collection::vec(any::<u8>(), 0..10_000),
            flip in any::<u8>(),
        ) {
            let key = MasterKey::random().unwrap();
            let mut envelope = encrypt(&plaintext, &key, &Salt::generate()).unwrap();

            let idx = flip as usize % envelope.data.len();
            envelope.data[idx] ^= 0xFF;

            prop_assert!(decrypt(&envelope, &key).is_err());
        }

        #[test]
        fn test_nonce_integrity(plaintext in prop::collection::vec(any::<u8>(), 0..10_000)) {
            let key = MasterKey::random().unwrap();
            let mut envelope = encrypt(&plaintext, &key, &Salt::generate()).unwrap();
            envelope.iv[5] ^= 0xFF;

            prop_assert!(decrypt(&envelope, &key).is_err());
        }

        #[test]
        fn test_different_keys(plaintext in prop::collection::vec(any::<u8>(), 0..10_000)) {
            let key = MasterKey::random().unwrap();
            let other = MasterKey::random().unwrap();
            let envelope = encrypt(&plaintext, &key, &Salt::generate()).unwrap();

            prop_assert!(decrypt(&envelope, &other).is_err());
        }

        #[test]
        fn test_nonce_uniqueness(plaintext in prop::collection::vec(any::<u8>(), 0..1_000)) {
            let key = MasterKey::random().unwrap();
            let salt = Salt::generate();

            let a = encrypt(&plaintext, &key, &salt).unwrap();
            let b = encrypt(&plaintext, &key, &salt).unwrap();
            prop_assert_ne!(a.iv, b.iv);
            prop_assert_ne!(a.data, b.data);
        }

        #[test]
        fn test_json_wire_roundtrip(plaintext in prop::collection::vec(any::<u8>(), 0..10_000)) {
            let key = MasterKey::random().unwrap();
            let envelope = encrypt(&plaintext, &key, &Salt::generate()).unwrap();

            let json = serde_json::to_string(&envelope).unwrap();
            let parsed: lockbox_core::EncryptedEnvelope = serde_json::from_str(&json).unwrap();
            let decrypted = decrypt(&parsed, &key).unwrap();
            prop_assert_eq!(&plaintext, &*decrypted);
        }
    }

    #[test]
    fn test_ciphertext_is_plaintext_plus_tag() {
        let key = MasterKey::random().unwrap();
        let plaintext = vec![0u8; 1234];
        let envelope = encrypt(&plaintext, &key, &Salt::generate()).unwrap();

        assert_eq!(
            envelope.data.len(),
            plaintext.len() + lockbox_core::vault::envelope::TAG_LENGTH
        );
        assert_eq!(envelope.iv.len(), lockbox_core::vault::envelope::IV_LENGTH);
        assert_eq!(envelope.salt.len(), lockbox_core::crypto::kdf::SALT_LENGTH);
    }
}
