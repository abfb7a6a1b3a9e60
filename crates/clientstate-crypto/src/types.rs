use std::fmt;
use std::str::FromStr;

use crate::error::CryptoError;

/// IV length in bytes. Every token carries a fresh 16-byte IV.
pub const IV_LENGTH: usize = 16;

/// AES-GCM tag length in bytes (128 bits), appended to the ciphertext.
pub const AES_GCM_TAG_LENGTH: usize = 16;

/// AES-256 key length in bytes.
pub const AES_256_KEY_LENGTH: usize = 32;

/// AES-128 key length in bytes.
pub const AES_128_KEY_LENGTH: usize = 16;

/// Minimum HMAC key length we accept (the SHA-256 output size).
pub const MIN_MAC_KEY_LENGTH: usize = 32;

/// Symmetric cipher used to keep the state opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EncryptionAlgorithm {
    /// AES-256 in GCM mode with a 16-byte IV.
    #[default]
    Aes256Gcm,
    /// AES-128 in GCM mode with a 16-byte IV.
    Aes128Gcm,
}

impl EncryptionAlgorithm {
    pub const fn id(self) -> &'static str {
        match self {
            Self::Aes256Gcm => "AES-256-GCM",
            Self::Aes128Gcm => "AES-128-GCM",
        }
    }

    pub const fn key_length(self) -> usize {
        match self {
            Self::Aes256Gcm => AES_256_KEY_LENGTH,
            Self::Aes128Gcm => AES_128_KEY_LENGTH,
        }
    }
}

impl fmt::Display for EncryptionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for EncryptionAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AES-256-GCM" => Ok(Self::Aes256Gcm),
            "AES-128-GCM" => Ok(Self::Aes128Gcm),
            other => Err(CryptoError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// Keyed MAC binding the token fields together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthenticationAlgorithm {
    #[default]
    HmacSha256,
    HmacSha512,
}

impl AuthenticationAlgorithm {
    pub const fn id(self) -> &'static str {
        match self {
            Self::HmacSha256 => "HMAC-SHA256",
            Self::HmacSha512 => "HMAC-SHA512",
        }
    }

    /// Tag length in bytes.
    pub const fn output_length(self) -> usize {
        match self {
            Self::HmacSha256 => 32,
            Self::HmacSha512 => 64,
        }
    }
}

impl fmt::Display for AuthenticationAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for AuthenticationAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HMAC-SHA256" => Ok(Self::HmacSha256),
            "HMAC-SHA512" => Ok(Self::HmacSha512),
            other => Err(CryptoError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}
