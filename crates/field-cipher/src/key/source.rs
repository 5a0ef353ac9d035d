//! [`KeySource`]: where textual key material comes from.

/// A named configuration entry holding a textual key.
///
/// Implementations are read once, at engine construction.
#[cfg_attr(test, mockall::automock)]
pub trait KeySource {
    /// Name of the entry, used in error messages. Never the value.
    fn name(&self) -> &str;

    /// The raw textual value, or `None` if the entry is not set.
    fn key_material(&self) -> Option<String>;
}

/// A key value supplied by the caller, e.g. one already fetched from a
/// secrets file.
#[derive(Clone)]
pub struct StaticKeySource {
    name: String,
    value: Option<String>,
}

impl StaticKeySource {
    /// Create a source named `name` holding `value`.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Create a source named `name` that holds nothing.
    pub fn unset(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

impl KeySource for StaticKeySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn key_material(&self) -> Option<String> {
        self.value.clone()
    }
}

impl std::fmt::Debug for StaticKeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticKeySource")
            .field("name", &self.name)
            .field("value", &self.value.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
