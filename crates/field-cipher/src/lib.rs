//! `field-cipher` — symmetric encryption of sensitive string fields such as
//! partner delivery identifiers and payout details.
//!
//! ```text
//! Config::from_env() ──▶ CipherEngine::from_source ──▶ encrypt / decrypt
//!        (host)                 (key validated once)        (any thread)
//! ```
//!
//! Tokens are `base64(IV || AES-256-CBC(PKCS#7(plaintext)))`. The scheme gives
//! confidentiality only: there is no integrity tag, and keys are not zeroed
//! when the engine is dropped.

pub mod config;
pub mod crypto;
pub mod key;
pub mod telemetry;

pub use common::{CipherError, EncodedToken};
pub use crate::config::Config;
pub use crypto::{CipherEngine, IvSource, OsIvSource};
pub use key::{Key, KeyFormat, KeySource, StaticKeySource, KEY_LEN};
