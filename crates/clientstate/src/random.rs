use clientstate_crypto::fill_random;

use crate::error::StateError;

/// Cryptographically secure random bytes.
///
/// Every encode draws an IV from here, so implementations must tolerate
/// concurrent callers.
pub trait RandomSource: Send + Sync {
    fn fill(&self, buf: &mut [u8]) -> Result<(), StateError>;
}

/// Handle onto the operating system CSPRNG.
///
/// Constructed explicitly and passed to the codec; there is no implicit
/// shared instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom {
    _private: (),
}

impl OsRandom {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), StateError> {
        fill_random(buf).map_err(|e| StateError::CryptoConfiguration(e.to_string()))
    }
}
