//! AES-GCM encryption of serialized state.
//!
//! The IV travels as its own token field, so the output here is just
//! `[ciphertext + tag]`. GCM runs with a 16-byte IV rather than the usual 12.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{self, Aead, KeyInit};
use aes_gcm::aes::{Aes128, Aes256};
use aes_gcm::AesGcm;

use crate::error::CryptoError;
use crate::types::{EncryptionAlgorithm, IV_LENGTH};

type Aes256Gcm16 = AesGcm<Aes256, U16>;
type Aes128Gcm16 = AesGcm<Aes128, U16>;

fn check_lengths(
    algorithm: EncryptionAlgorithm,
    key: &[u8],
    iv: &[u8],
) -> Result<(), CryptoError> {
    if key.len() != algorithm.key_length() {
        return Err(CryptoError::InvalidKeyLength {
            expected: algorithm.key_length(),
            got: key.len(),
        });
    }
    if iv.len() != IV_LENGTH {
        return Err(CryptoError::InvalidIvLength {
            expected: IV_LENGTH,
            got: iv.len(),
        });
    }
    Ok(())
}

fn seal<C: Aead + KeyInit>(
    key: &[u8],
    iv: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher =
        C::new_from_slice(key).map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
    cipher
        .encrypt(aead::Nonce::<C>::from_slice(iv), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
}

fn open<C: Aead + KeyInit>(
    key: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher =
        C::new_from_slice(key).map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?;
    cipher
        .decrypt(aead::Nonce::<C>::from_slice(iv), ciphertext)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}

/// Encrypt `plaintext` under `key` and a caller-supplied 16-byte `iv`.
///
/// Returns `[ciphertext + tag]`.
pub fn encrypt(
    algorithm: EncryptionAlgorithm,
    key: &[u8],
    iv: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    check_lengths(algorithm, key, iv)?;
    match algorithm {
        EncryptionAlgorithm::Aes256Gcm => seal::<Aes256Gcm16>(key, iv, plaintext),
        EncryptionAlgorithm::Aes128Gcm => seal::<Aes128Gcm16>(key, iv, plaintext),
    }
}

/// Decrypt `[ciphertext + tag]` produced by [`encrypt`].
pub fn decrypt(
    algorithm: EncryptionAlgorithm,
    key: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    check_lengths(algorithm, key, iv)?;
    match algorithm {
        EncryptionAlgorithm::Aes256Gcm => open::<Aes256Gcm16>(key, iv, ciphertext),
        EncryptionAlgorithm::Aes128Gcm => open::<Aes128Gcm16>(key, iv, ciphertext),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AES_GCM_TAG_LENGTH;

    const KEY: [u8; 32] = [0x11; 32];
    const IV: [u8; IV_LENGTH] = [0x33; IV_LENGTH];

    #[test]
    fn encrypt_decrypt_round_trip() {
        let ct = encrypt(EncryptionAlgorithm::Aes256Gcm, &KEY, &IV, b"Hello, World!").unwrap();
        let pt = decrypt(EncryptionAlgorithm::Aes256Gcm, &KEY, &IV, &ct).unwrap();
        assert_eq!(pt, b"Hello, World!");
    }

    #[test]
    fn known_vector_aes_256() {
        let ct = encrypt(EncryptionAlgorithm::Aes256Gcm, &KEY, &IV, br#"{"a":1}"#).unwrap();
        assert_eq!(
            hex::encode(&ct),
            "a8d5fe58808cc3d1f022321f9d4877dfe9f7d93449f025"
        );
    }

    #[test]
    fn known_vector_aes_128() {
        let ct = encrypt(EncryptionAlgorithm::Aes128Gcm, &[0x11; 16], &IV, br#"{"a":1}"#).unwrap();
        assert_eq!(
            hex::encode(&ct),
            "2d848f426320d4097cff4cc7d1a1642f935a7c2b13c06b"
        );
    }

    #[test]
    fn output_is_plaintext_plus_tag() {
        let ct = encrypt(EncryptionAlgorithm::Aes256Gcm, &KEY, &IV, &[0u8; 40]).unwrap();
        assert_eq!(ct.len(), 40 + AES_GCM_TAG_LENGTH);
    }

    #[test]
    fn handles_empty_plaintext() {
        let ct = encrypt(EncryptionAlgorithm::Aes256Gcm, &KEY, &IV, b"").unwrap();
        let pt = decrypt(EncryptionAlgorithm::Aes256Gcm, &KEY, &IV, &ct).unwrap();
        assert!(pt.is_empty());
    }

    #[test]
    fn rejects_tampered_ciphertext() {
        let mut ct = encrypt(EncryptionAlgorithm::Aes256Gcm, &KEY, &IV, b"secret").unwrap();
        ct[0] ^= 0x01;
        assert!(decrypt(EncryptionAlgorithm::Aes256Gcm, &KEY, &IV, &ct).is_err());
    }

    #[test]
    fn wrong_key_fails() {
        let ct = encrypt(EncryptionAlgorithm::Aes256Gcm, &KEY, &IV, b"secret").unwrap();
        assert!(decrypt(EncryptionAlgorithm::Aes256Gcm, &[0x12; 32], &IV, &ct).is_err());
    }

    #[test]
    fn rejects_bad_key_length() {
        let err = encrypt(EncryptionAlgorithm::Aes256Gcm, &[0u8; 16], &IV, b"x").unwrap_err();
        assert!(matches!(
            err,
            CryptoError::InvalidKeyLength {
                expected: 32,
                got: 16
            }
        ));
    }

    #[test]
    fn rejects_bad_iv_length() {
        let err = decrypt(EncryptionAlgorithm::Aes256Gcm, &KEY, &[0u8; 12], b"x").unwrap_err();
        assert!(matches!(err, CryptoError::InvalidIvLength { expected: 16, got: 12 }));
    }
}
