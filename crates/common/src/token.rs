//! The opaque string produced by `encrypt` and consumed by `decrypt`.
//!
//! A token is standard base64 of `IV(16) || ciphertext(N * 16)`. It carries no
//! version prefix or key identifier; callers store it as-is in a text column or
//! JSON value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Encoded ciphertext as it is stored or transported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedToken(String);

impl EncodedToken {
    /// Wrap an already-encoded token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Borrow the token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the token, returning the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EncodedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EncodedToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for EncodedToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<EncodedToken> for String {
    fn from(t: EncodedToken) -> Self {
        t.0
    }
}
