use thiserror::Error;

/// Why a token could not be produced or accepted.
///
/// Every decode failure surfaces as one of these; partially decoded data is
/// never returned.
#[derive(Debug, Error)]
pub enum StateError {
    /// Wrong field count, invalid base64url, non-numeric timestamp, bad IV length.
    #[error("Malformed state token: {0}")]
    MalformedToken(String),

    /// The MAC does not match. Callers should not echo details to end users.
    #[error("State token fails authenticity check")]
    Authenticity,

    #[error("State token expired at: {}", format_instant(.issued_at, .timeout))]
    Expired { issued_at: i64, timeout: u64 },

    #[error("Given TID `{given}` mismatches current TID `{expected}`")]
    TenantMismatch { given: String, expected: String },

    /// Cipher or MAC unavailable, or key material invalid. An environment
    /// problem, not something a request can trigger.
    #[error("Crypto configuration error: {0}")]
    CryptoConfiguration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid settings: {0}")]
    Configuration(String),
}

impl StateError {
    /// Authenticity and tenant failures point at tampering or a misrouted
    /// token rather than an ordinary expired session.
    pub fn is_security_relevant(&self) -> bool {
        matches!(self, Self::Authenticity | Self::TenantMismatch { .. })
    }
}

fn format_instant(issued_at: &i64, timeout: &u64) -> String {
    let expired_at = issued_at.saturating_add(i64::try_from(*timeout).unwrap_or(i64::MAX));
    match chrono::DateTime::from_timestamp(expired_at, 0) {
        Some(at) => at.to_rfc3339(),
        None => expired_at.to_string(),
    }
}
