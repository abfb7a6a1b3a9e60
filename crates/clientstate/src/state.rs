//! Client-side state codec.
//!
//! Persists state on the client with these properties:
//! - the state stays opaque (encrypted), so the client cannot read it
//! - tampering is detected by a MAC over the encoded token text
//! - a timeout is enforced from the authenticated issue time (default 15 min)
//! - tokens are bound to the issuing tenant
//!
//! The scheme follows RFC 6896 (SCS: KoanLogic's Secure Cookie Sessions for
//! HTTP).

use std::sync::Arc;

use clientstate_crypto::{
    compute_mac, constant_time_eq, decrypt, encrypt, verify_mac, AuthenticationAlgorithm,
    EncryptionAlgorithm, IV_LENGTH,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::cookie::StateCookie;
use crate::edition::KeyProvider;
use crate::error::StateError;
use crate::random::{OsRandom, RandomSource};
use crate::serializer::{JsonSerializer, Serializer};
use crate::token;

/// Default token lifetime in seconds (15 minutes).
pub const DEFAULT_TIMEOUT: u64 = 15 * 60;

/// Encodes values into self-authenticating, encrypted tokens and decodes
/// them back.
///
/// Holds no mutable state of its own; `encode` and `decode` can be called
/// concurrently from any number of threads.
pub struct ClientSideState<S = JsonSerializer> {
    provider: Arc<dyn KeyProvider>,
    encryption_algorithm: EncryptionAlgorithm,
    authentication_algorithm: AuthenticationAlgorithm,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
    serializer: S,
    timeout: u64,
}

impl ClientSideState<JsonSerializer> {
    /// Resolve the provider's algorithm identifiers once; unknown ones are a
    /// [`StateError::CryptoConfiguration`].
    pub fn new(provider: Arc<dyn KeyProvider>) -> Result<Self, StateError> {
        let encryption_algorithm = provider
            .encryption_algorithm_id()
            .parse::<EncryptionAlgorithm>()
            .map_err(|e| StateError::CryptoConfiguration(e.to_string()))?;
        let authentication_algorithm = provider
            .authentication_algorithm_id()
            .parse::<AuthenticationAlgorithm>()
            .map_err(|e| StateError::CryptoConfiguration(e.to_string()))?;

        Ok(Self {
            provider,
            encryption_algorithm,
            authentication_algorithm,
            clock: Arc::new(SystemClock),
            random: Arc::new(OsRandom::new()),
            serializer: JsonSerializer,
            timeout: DEFAULT_TIMEOUT,
        })
    }
}

impl<S: Serializer> ClientSideState<S> {
    /// Maximum token age in seconds.
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_random_source(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    pub fn with_serializer<S2: Serializer>(self, serializer: S2) -> ClientSideState<S2> {
        ClientSideState {
            provider: self.provider,
            encryption_algorithm: self.encryption_algorithm,
            authentication_algorithm: self.authentication_algorithm,
            clock: self.clock,
            random: self.random,
            serializer,
            timeout: self.timeout,
        }
    }

    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    /// Serialize, encrypt and authenticate `value` into a URL-safe token.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, StateError> {
        let clear = self.serializer.serialize(value)?;

        let mut iv = [0u8; IV_LENGTH];
        self.random.fill(&mut iv)?;

        let ciphertext = encrypt(
            self.encryption_algorithm,
            self.provider.encryption_key(),
            &iv,
            &clear,
        )
        .map_err(|e| StateError::CryptoConfiguration(e.to_string()))?;

        let issued_at = self.clock.now();

        let signed = token::join_signed(&ciphertext, issued_at, self.provider.tenant_id(), &iv);
        let mac = self.mac(&signed)?;
        let encoded = token::append_mac(signed, &mac);

        debug!(issued_at, len = encoded.len(), "encoded client-side state");
        Ok(encoded)
    }

    /// Verify and decrypt a token produced by [`encode`](Self::encode).
    ///
    /// Checks run cheapest first and stop at the first failure: framing,
    /// MAC, expiry, tenant. Nothing is decrypted until the MAC has been
    /// verified.
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, StateError> {
        let parsed = token::parse(token)
            .inspect_err(|e| debug!(error = %e, "rejected state token"))?;

        let authentic = verify_mac(
            self.authentication_algorithm,
            self.provider.authentication_key(),
            parsed.signed.as_bytes(),
            &parsed.mac,
        )
        .map_err(|e| StateError::CryptoConfiguration(e.to_string()))?;
        if !authentic {
            warn!("state token fails authenticity check");
            return Err(StateError::Authenticity);
        }

        let now = self.clock.now();
        if self.is_expired(parsed.issued_at, now) {
            debug!(issued_at = parsed.issued_at, now, "state token expired");
            return Err(StateError::Expired {
                issued_at: parsed.issued_at,
                timeout: self.timeout,
            });
        }

        let expected_tid = self.provider.tenant_id();
        if !constant_time_eq(&parsed.tid, expected_tid) {
            warn!(
                given = %hex::encode(&parsed.tid),
                expected = %hex::encode(expected_tid),
                "state token issued for another tenant"
            );
            return Err(StateError::TenantMismatch {
                given: hex::encode(&parsed.tid),
                expected: hex::encode(expected_tid),
            });
        }

        if parsed.iv.len() != IV_LENGTH {
            return Err(StateError::MalformedToken(format!(
                "iv must be {} bytes, got {}",
                IV_LENGTH,
                parsed.iv.len()
            )));
        }

        let clear = decrypt(
            self.encryption_algorithm,
            self.provider.encryption_key(),
            &parsed.iv,
            &parsed.ciphertext,
        )
        .map_err(|e| StateError::CryptoConfiguration(e.to_string()))?;

        let value = self.serializer.deserialize(&clear)?;
        debug!(issued_at = parsed.issued_at, "decoded client-side state");
        Ok(value)
    }

    /// Encode `value` into a `Secure; HttpOnly` cookie scoped to `path` that
    /// lives as long as the token does.
    pub fn persist<T: Serialize + ?Sized>(
        &self,
        name: &str,
        path: &str,
        value: &T,
    ) -> Result<StateCookie, StateError> {
        Ok(StateCookie::new(name, self.encode(value)?)
            .with_path(path)
            .with_max_age(self.timeout))
    }

    /// Decode the value carried by `cookie`.
    pub fn restore_from<T: DeserializeOwned>(&self, cookie: &StateCookie) -> Result<T, StateError> {
        self.decode(cookie.value())
    }

    fn mac(&self, signed: &str) -> Result<Vec<u8>, StateError> {
        // `signed` holds only base64url characters and '|', so its UTF-8
        // bytes are its ASCII bytes.
        compute_mac(
            self.authentication_algorithm,
            self.provider.authentication_key(),
            signed.as_bytes(),
        )
        .map_err(|e| StateError::CryptoConfiguration(e.to_string()))
    }

    /// Valid up to and including `issued_at + timeout`.
    fn is_expired(&self, issued_at: i64, now: i64) -> bool {
        let timeout = i64::try_from(self.timeout).unwrap_or(i64::MAX);
        issued_at.saturating_add(timeout) < now
    }
}

impl<S> std::fmt::Debug for ClientSideState<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSideState")
            .field("encryption_algorithm", &self.encryption_algorithm)
            .field("authentication_algorithm", &self.authentication_algorithm)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
