//! Cryptographic primitives behind client-side state tokens.
//!
//! - AES-GCM with a 16-byte IV for confidentiality
//! - HMAC-SHA256 / HMAC-SHA512 tags over the encoded token text
//! - Constant-time comparison for tags and tenant ids
//! - HKDF-SHA256 for splitting one secret into independent keys
//! - Unpadded base64url for the wire fields

pub mod base64url;
pub mod cipher;
pub mod compare;
pub mod error;
pub mod hkdf;
pub mod mac;
pub mod random;
pub mod types;

pub use base64url::{base64url_decode, base64url_encode};
pub use cipher::{decrypt, encrypt};
pub use compare::constant_time_eq;
pub use error::CryptoError;
pub use hkdf::hkdf_derive;
pub use mac::{compute_mac, verify_mac};
pub use random::fill_random;
pub use types::{
    AuthenticationAlgorithm, EncryptionAlgorithm, AES_128_KEY_LENGTH, AES_256_KEY_LENGTH,
    AES_GCM_TAG_LENGTH, IV_LENGTH, MIN_MAC_KEY_LENGTH,
};
pub use zeroize::Zeroizing;
