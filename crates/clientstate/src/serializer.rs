//! Value <-> bytes codecs for the encrypted payload.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StateError;

/// Turns state values into bytes and back.
pub trait Serializer: Send + Sync {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, StateError>;

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, StateError>;
}

/// JSON payloads (the default).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, StateError> {
        serde_json::to_vec(value).map_err(|e| StateError::Serialization(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, StateError> {
        serde_json::from_slice(bytes).map_err(|e| StateError::Serialization(e.to_string()))
    }
}

/// CBOR payloads; smaller cookies for byte-heavy state.
#[derive(Debug, Clone, Copy, Default)]
pub struct CborSerializer;

impl Serializer for CborSerializer {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, StateError> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StateError::Serialization(format!("CBOR encode: {}", e)))?;
        Ok(buf)
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, StateError> {
        ciborium::from_reader(bytes)
            .map_err(|e| StateError::Serialization(format!("CBOR decode: {}", e)))
    }
}
