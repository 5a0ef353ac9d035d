//! Key provisioning and validation.
//!
//! A [`Key`] is built either from caller-supplied bytes ([`Key::from_bytes`]) or
//! from a textual value held by a [`KeySource`] ([`Key::from_source`]). Textual
//! values go through [`resolve_key_material`], which decides between raw and
//! base64 forms by length alone.
//!
//! # Security invariants
//!
//! - Key bytes are never logged, serialised, or included in error messages.
//! - Key bytes are **not** zeroed on drop. The process that owns the engine is
//!   trusted with the key for its whole lifetime.

pub mod source;

pub use source::{KeySource, StaticKeySource};

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::CipherError;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Textual key values longer than this many characters are base64-decoded;
/// shorter or equal values are used as raw bytes.
pub const RAW_KEY_MAX_CHARS: usize = 32;

/// How a textual key value was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFormat {
    /// The value's UTF-8 bytes are the key.
    Raw,
    /// The value is standard base64 of the key.
    Base64,
}

impl KeyFormat {
    /// Short label used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            KeyFormat::Raw => "raw",
            KeyFormat::Base64 => "base64",
        }
    }
}

/// Validated 256-bit key owned by one engine.
pub struct Key(Box<[u8; KEY_LEN]>);

impl Key {
    /// Validate `bytes` as a key.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKey`] unless `bytes` is exactly [`KEY_LEN`] long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CipherError> {
        if bytes.len() != KEY_LEN {
            return Err(CipherError::InvalidKey(bytes.len()));
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    /// Read the source once and validate what it holds.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Configuration`] if the source is absent, empty, or
    /// not decodable, and [`CipherError::InvalidKey`] if the resolved bytes are
    /// not [`KEY_LEN`] long.
    pub fn from_source(source: &dyn KeySource) -> Result<(Self, KeyFormat), CipherError> {
        let value = source.key_material().unwrap_or_default();
        if value.is_empty() {
            return Err(CipherError::Configuration(format!(
                "missing key source: {}",
                source.name()
            )));
        }
        let (bytes, format) = resolve_key_material(&value)?;
        Ok((Self::from_bytes(&bytes)?, format))
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Key([REDACTED])")
    }
}

/// Turn a textual key value into key bytes.
///
/// Values longer than [`RAW_KEY_MAX_CHARS`] are treated as base64 (a base64
/// encoded 32-byte key is 44 characters); anything else is taken as raw bytes.
/// Length counts characters, not UTF-8 bytes.
/// Length is a heuristic, not a format marker: a 40-character raw secret is
/// misread as base64 and rejected. The returned bytes are not length-checked.
///
/// # Errors
///
/// Returns [`CipherError::Configuration`] if a long value is not valid base64.
pub fn resolve_key_material(value: &str) -> Result<(Vec<u8>, KeyFormat), CipherError> {
    if value.chars().count() > RAW_KEY_MAX_CHARS {
        let bytes = STANDARD.decode(value).map_err(|_| {
            CipherError::Configuration(format!(
                "key source is longer than {RAW_KEY_MAX_CHARS} characters but is not valid base64"
            ))
        })?;
        Ok((bytes, KeyFormat::Base64))
    } else {
        Ok((value.as_bytes().to_vec(), KeyFormat::Raw))
    }
}
