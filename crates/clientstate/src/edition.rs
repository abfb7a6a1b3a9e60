//! Key material, algorithms and tenant identity.

use clientstate_crypto::{
    hkdf_derive, AuthenticationAlgorithm, EncryptionAlgorithm, Zeroizing, AES_256_KEY_LENGTH,
    MIN_MAC_KEY_LENGTH,
};

use crate::error::StateError;

/// Fixed HKDF salt for splitting a master secret.
const KEY_SALT: &[u8] = b"clientstate-key-salt-v1";

const ENCRYPTION_INFO: &[u8] = b"clientstate:encryption:v1";

const AUTHENTICATION_INFO: &[u8] = b"clientstate:authentication:v1";

/// Supplies keys, algorithm identifiers and the tenant id to the codec.
///
/// Values must stay constant for the lifetime of an instance.
pub trait KeyProvider: Send + Sync {
    fn encryption_key(&self) -> &[u8];

    fn authentication_key(&self) -> &[u8];

    /// Identifies the issuing deployment. Not secret.
    fn tenant_id(&self) -> &[u8];

    fn encryption_algorithm_id(&self) -> &str;

    fn authentication_algorithm_id(&self) -> &str;
}

/// Encryption and authentication keys, wiped on drop.
pub struct KeySource {
    encryption_key: Zeroizing<Vec<u8>>,
    authentication_key: Zeroizing<Vec<u8>>,
}

impl KeySource {
    pub fn new(encryption_key: &[u8], authentication_key: &[u8]) -> Self {
        Self {
            encryption_key: Zeroizing::new(encryption_key.to_vec()),
            authentication_key: Zeroizing::new(authentication_key.to_vec()),
        }
    }

    /// Derive an AES-256 key and a 32-byte MAC key from one master secret
    /// with HKDF-SHA256.
    ///
    /// The secret must be at least 32 bytes.
    pub fn derive(secret: &[u8]) -> Result<Self, StateError> {
        if secret.len() < AES_256_KEY_LENGTH {
            return Err(StateError::CryptoConfiguration(format!(
                "master secret must be at least {} bytes, got {}",
                AES_256_KEY_LENGTH,
                secret.len()
            )));
        }
        let derive = |info: &[u8]| {
            hkdf_derive(secret, KEY_SALT, info, AES_256_KEY_LENGTH)
                .map_err(|e| StateError::CryptoConfiguration(e.to_string()))
        };
        Ok(Self {
            encryption_key: derive(ENCRYPTION_INFO)?,
            authentication_key: derive(AUTHENTICATION_INFO)?,
        })
    }

    pub fn encryption_key(&self) -> &[u8] {
        &self.encryption_key
    }

    pub fn authentication_key(&self) -> &[u8] {
        &self.authentication_key
    }
}

impl std::fmt::Debug for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySource").finish_non_exhaustive()
    }
}

/// The production [`KeyProvider`]: a tenant id, the algorithms in use, and
/// their keys.
#[derive(Debug)]
pub struct Edition {
    tid: Vec<u8>,
    encryption_algorithm: EncryptionAlgorithm,
    authentication_algorithm: AuthenticationAlgorithm,
    keys: KeySource,
}

impl Edition {
    /// AES-256-GCM and HMAC-SHA256.
    pub fn new(tid: &[u8], keys: KeySource) -> Result<Self, StateError> {
        Self::with_algorithms(
            tid,
            EncryptionAlgorithm::default(),
            AuthenticationAlgorithm::default(),
            keys,
        )
    }

    /// Key lengths are checked against the algorithms here, so a bad
    /// configuration fails at startup instead of on the first request.
    pub fn with_algorithms(
        tid: &[u8],
        encryption_algorithm: EncryptionAlgorithm,
        authentication_algorithm: AuthenticationAlgorithm,
        keys: KeySource,
    ) -> Result<Self, StateError> {
        if keys.encryption_key().len() != encryption_algorithm.key_length() {
            return Err(StateError::CryptoConfiguration(format!(
                "{} needs a {}-byte key, got {}",
                encryption_algorithm,
                encryption_algorithm.key_length(),
                keys.encryption_key().len()
            )));
        }
        if keys.authentication_key().len() < MIN_MAC_KEY_LENGTH {
            return Err(StateError::CryptoConfiguration(format!(
                "{} key must be at least {} bytes, got {}",
                authentication_algorithm,
                MIN_MAC_KEY_LENGTH,
                keys.authentication_key().len()
            )));
        }
        Ok(Self {
            tid: tid.to_vec(),
            encryption_algorithm,
            authentication_algorithm,
            keys,
        })
    }
}

impl KeyProvider for Edition {
    fn encryption_key(&self) -> &[u8] {
        self.keys.encryption_key()
    }

    fn authentication_key(&self) -> &[u8] {
        self.keys.authentication_key()
    }

    fn tenant_id(&self) -> &[u8] {
        &self.tid
    }

    fn encryption_algorithm_id(&self) -> &str {
        self.encryption_algorithm.id()
    }

    fn authentication_algorithm_id(&self) -> &str {
        self.authentication_algorithm.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_keys_match_vector() {
        let keys = KeySource::derive(&[0x42; 32]).unwrap();
        assert_eq!(
            hex::encode(keys.encryption_key()),
            "e4a44302cfc786dee61a3637a25669f85f64aaac84aa80bfd9951a75c0c3c2b9"
        );
        assert_eq!(
            hex::encode(keys.authentication_key()),
            "139ebd61e6f0d8c74a611ce7e6683e2162ce468c67f76578731904facfe07730"
        );
    }

    #[test]
    fn derive_rejects_short_secret() {
        let err = KeySource::derive(&[1u8; 16]).unwrap_err();
        assert!(matches!(err, StateError::CryptoConfiguration(_)));
    }

    #[test]
    fn edition_exposes_provider_values() {
        let edition = Edition::new(b"tenant-a", KeySource::new(&[1; 32], &[2; 32])).unwrap();
        assert_eq!(edition.tenant_id(), b"tenant-a");
        assert_eq!(edition.encryption_algorithm_id(), "AES-256-GCM");
        assert_eq!(edition.authentication_algorithm_id(), "HMAC-SHA256");
        assert_eq!(edition.encryption_key(), [1u8; 32]);
        assert_eq!(edition.authentication_key(), [2u8; 32]);
    }

    #[test]
    fn edition_checks_key_lengths() {
        let err = Edition::with_algorithms(
            b"t",
            EncryptionAlgorithm::Aes128Gcm,
            AuthenticationAlgorithm::HmacSha256,
            KeySource::new(&[1; 32], &[2; 32]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("AES-128-GCM needs a 16-byte key"));

        assert!(Edition::new(b"t", KeySource::new(&[1; 32], &[2; 8])).is_err());
    }

    #[test]
    fn debug_hides_keys() {
        let keys = KeySource::new(&[0xab; 32], &[0xcd; 32]);
        let rendered = format!("{:?}", keys);
        assert_eq!(rendered, "KeySource { .. }");
    }
}
