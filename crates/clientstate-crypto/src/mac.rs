//! HMAC-SHA2 authentication tags.

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};

use crate::compare::constant_time_eq;
use crate::error::CryptoError;
use crate::types::{AuthenticationAlgorithm, MIN_MAC_KEY_LENGTH};

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

fn tag<M: Mac + hmac::digest::KeyInit>(key: &[u8], data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut mac =
        <M as Mac>::new_from_slice(key).map_err(|e| CryptoError::MacFailed(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Compute the authentication tag of `data` under `key`.
///
/// Keys shorter than [`MIN_MAC_KEY_LENGTH`] are refused.
pub fn compute_mac(
    algorithm: AuthenticationAlgorithm,
    key: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    if key.len() < MIN_MAC_KEY_LENGTH {
        return Err(CryptoError::InvalidKeyLength {
            expected: MIN_MAC_KEY_LENGTH,
            got: key.len(),
        });
    }
    match algorithm {
        AuthenticationAlgorithm::HmacSha256 => tag::<HmacSha256>(key, data),
        AuthenticationAlgorithm::HmacSha512 => tag::<HmacSha512>(key, data),
    }
}

/// Recompute the tag of `data` and compare it with `expected` in constant time.
pub fn verify_mac(
    algorithm: AuthenticationAlgorithm,
    key: &[u8],
    data: &[u8],
    expected: &[u8],
) -> Result<bool, CryptoError> {
    let calculated = compute_mac(algorithm, key, data)?;
    Ok(constant_time_eq(&calculated, expected))
}
