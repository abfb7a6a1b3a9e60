//! Stateless client-side state for HTTP services.
//!
//! [`ClientSideState`] turns any serializable value into an opaque,
//! URL-safe token a server can hand to a client (typically in a cookie) and
//! later accept back without keeping a session store:
//!
//! - the payload is encrypted (AES-GCM)
//! - the token text is authenticated (HMAC-SHA2) and verified before decryption
//! - the authenticated issue time enforces a timeout
//! - an embedded tenant id rejects tokens minted by other deployments
//!
//! ```no_run
//! use std::sync::Arc;
//! use clientstate::{ClientSideState, Edition, KeySource};
//!
//! # fn main() -> Result<(), clientstate::StateError> {
//! let keys = KeySource::derive(&[0x42; 32])?;
//! let state = ClientSideState::new(Arc::new(Edition::new(b"tenant-a", keys)?))?;
//!
//! let token = state.encode(&("salesforce", 42))?;
//! let (provider, attempt): (String, u32) = state.decode(&token)?;
//! # Ok(())
//! # }
//! ```

mod clock;
mod cookie;
mod edition;
mod error;
mod random;
mod serializer;
mod settings;
mod state;
mod token;

pub use clock::{Clock, FixedClock, SystemClock};
pub use cookie::StateCookie;
pub use edition::{Edition, KeyProvider, KeySource};
pub use error::StateError;
pub use random::{OsRandom, RandomSource};
pub use serializer::{CborSerializer, JsonSerializer, Serializer};
pub use settings::StateSettings;
pub use state::{ClientSideState, DEFAULT_TIMEOUT};
pub use token::{FIELD_COUNT, SEPARATOR};
