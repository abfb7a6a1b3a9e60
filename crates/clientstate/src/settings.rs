//! Deployment settings for a [`ClientSideState`].

use std::sync::Arc;

use clientstate_crypto::{base64url_decode, AuthenticationAlgorithm, EncryptionAlgorithm};
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::edition::{Edition, KeySource};
use crate::error::StateError;
use crate::state::{ClientSideState, DEFAULT_TIMEOUT};

/// Settings as they appear in a deployment's JSON configuration.
///
/// ```json
/// {
///   "tenant_id": "7379e2b1",
///   "secret": "<base64url, at least 32 bytes>",
///   "timeout_secs": 600
/// }
/// ```
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateSettings {
    /// Hex-encoded tenant id.
    pub tenant_id: String,
    /// Base64url master secret; encryption and MAC keys are derived from it.
    /// Wiped on drop.
    secret: Zeroizing<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_encryption_algorithm")]
    pub encryption_algorithm: String,
    #[serde(default = "default_authentication_algorithm")]
    pub authentication_algorithm: String,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT
}

fn default_encryption_algorithm() -> String {
    EncryptionAlgorithm::default().id().to_string()
}

fn default_authentication_algorithm() -> String {
    AuthenticationAlgorithm::default().id().to_string()
}

impl StateSettings {
    pub fn from_json(json: &str) -> Result<Self, StateError> {
        serde_json::from_str(json).map_err(|e| StateError::Configuration(e.to_string()))
    }

    pub fn edition(&self) -> Result<Edition, StateError> {
        let tid = hex::decode(&self.tenant_id)
            .map_err(|e| StateError::Configuration(format!("tenant_id: {}", e)))?;
        let secret = base64url_decode(&self.secret)
            .map(Zeroizing::new)
            .map_err(|e| StateError::Configuration(format!("secret: {}", e)))?;
        let encryption_algorithm = self
            .encryption_algorithm
            .parse::<EncryptionAlgorithm>()
            .map_err(|e| StateError::Configuration(e.to_string()))?;
        let authentication_algorithm = self
            .authentication_algorithm
            .parse::<AuthenticationAlgorithm>()
            .map_err(|e| StateError::Configuration(e.to_string()))?;

        let derived = KeySource::derive(&secret)?;
        // AES-128 takes the first half of the derived encryption key.
        let keys = KeySource::new(
            &derived.encryption_key()[..encryption_algorithm.key_length()],
            derived.authentication_key(),
        );
        Edition::with_algorithms(&tid, encryption_algorithm, authentication_algorithm, keys)
    }

    /// Build a codec with the system clock and OS randomness.
    pub fn build(&self) -> Result<ClientSideState, StateError> {
        let edition = self.edition()?;
        Ok(ClientSideState::new(Arc::new(edition))?.with_timeout(self.timeout_secs))
    }
}

impl std::fmt::Debug for StateSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateSettings")
            .field("tenant_id", &self.tenant_id)
            .field("timeout_secs", &self.timeout_secs)
            .field("encryption_algorithm", &self.encryption_algorithm)
            .field("authentication_algorithm", &self.authentication_algorithm)
            .finish_non_exhaustive()
    }
}
