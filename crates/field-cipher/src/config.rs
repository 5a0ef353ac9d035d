//! Configuration loading for hosts that provision the key from the environment.
//!
//! The engine itself never reads the environment. A host loads a [`Config`]
//! once at startup and hands it to [`CipherEngine::from_source`], or calls
//! [`Config::cipher_engine`].

use anyhow::{Context, Result};
use common::CipherError;
use config::builder::{ConfigBuilder, DefaultState};
use serde::Deserialize;

use crate::crypto::CipherEngine;
use crate::key::KeySource;

/// Validated key-provisioning configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Textual key: 32 raw ASCII characters or base64 of 32 bytes.
    #[serde(default)]
    pub encryption_key: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Environment variable the key was read from.
    #[serde(skip, default = "default_key_name")]
    key_name: String,
}

fn default_log_level() -> String {
    "info".into()
}
fn default_key_name() -> String {
    "ENCRYPTION_KEY".into()
}

impl Config {
    /// Load configuration from unprefixed environment variables
    /// (`ENCRYPTION_KEY`, `LOG_LEVEL`).
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be deserialised or the
    /// resulting configuration is invalid. A missing key is not an error here;
    /// it surfaces when the engine is built.
    pub fn from_env() -> Result<Self> {
        let builder = config::Config::builder().add_source(config::Environment::default());
        Self::from_builder(builder, default_key_name())
    }

    /// Load configuration from environment variables named `<PREFIX>_*`, e.g.
    /// `DELIVERY_ENCRYPTION_KEY` for prefix `"DELIVERY"`.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_env_prefixed(prefix: &str) -> Result<Self> {
        let builder =
            config::Config::builder().add_source(config::Environment::with_prefix(prefix));
        Self::from_builder(builder, format!("{}_ENCRYPTION_KEY", prefix.to_uppercase()))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>, key_name: String) -> Result<Self> {
        let cfg = builder
            .build()
            .context("failed to build field-cipher configuration")?;

        let mut c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise field-cipher configuration")?;
        c.key_name = key_name;

        c.validate()?;
        Ok(c)
    }

    /// Load from explicit key/value overrides only, ignoring the environment.
    #[cfg(test)]
    pub(crate) fn from_overrides(overrides: &[(&str, &str)]) -> Result<Self> {
        let mut builder = config::Config::builder();
        for (k, v) in overrides {
            builder = builder.set_override(*k, *v)?;
        }
        Self::from_builder(builder, default_key_name())
    }

    fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            anyhow::bail!("LOG_LEVEL must not be empty");
        }
        Ok(())
    }

    /// Build a [`CipherEngine`] keyed from this configuration.
    ///
    /// # Errors
    ///
    /// See [`CipherEngine::from_source`].
    pub fn cipher_engine(&self) -> Result<CipherEngine, CipherError> {
        CipherEngine::from_source(self)
    }
}

impl KeySource for Config {
    fn name(&self) -> &str {
        &self.key_name
    }

    fn key_material(&self) -> Option<String> {
        self.encryption_key.clone()
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("Config")
            .field("encryption_key", &self.encryption_key.as_ref().map(|_| "[REDACTED]"))
            .field("log_level", &self.log_level)
            .field("key_name", &self.key_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW_KEY: &str = "0123456789abcdef0123456789abcdef";

    fn load(overrides: &[(&str, &str)]) -> Result<Config> {
        Config::from_overrides(overrides)
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_key_name(), "ENCRYPTION_KEY");
    }

    #[test]
    fn missing_key_loads_but_engine_fails() {
        let cfg = load(&[]).unwrap();
        assert!(cfg.encryption_key.is_none());
        assert_eq!(cfg.log_level, "info");
        let err = cfg.cipher_engine().unwrap_err();
        assert!(matches!(err, CipherError::Configuration(ref m) if m.contains("ENCRYPTION_KEY")));
    }

    #[test]
    fn empty_key_is_configuration_error() {
        let cfg = load(&[("encryption_key", "")]).unwrap();
        assert_eq!(cfg.cipher_engine().unwrap_err().code(), "configuration_error");
    }

    #[test]
    fn key_from_config_builds_engine() {
        let cfg = load(&[("encryption_key", RAW_KEY), ("log_level", "debug")]).unwrap();
        assert_eq!(cfg.log_level, "debug");
        let engine = cfg.cipher_engine().unwrap();
        let token = engine.encrypt("acct 0042").unwrap();
        assert_eq!(engine.decrypt(token).unwrap(), "acct 0042");
    }

    #[test]
    fn validate_rejects_blank_log_level() {
        assert!(load(&[("log_level", "  ")]).is_err());
    }

    #[test]
    fn unprefixed_env_key_name() {
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.name(), "ENCRYPTION_KEY");
    }

    #[test]
    fn prefixed_key_name() {
        let cfg = Config::from_env_prefixed("field_cipher_test_unset_prefix").unwrap();
        assert_eq!(cfg.name(), "FIELD_CIPHER_TEST_UNSET_PREFIX_ENCRYPTION_KEY");
    }

    #[test]
    fn debug_redacts_key() {
        let cfg = load(&[("encryption_key", RAW_KEY)]).unwrap();
        let dbg = format!("{cfg:?}");
        assert!(dbg.contains("REDACTED"));
        assert!(!dbg.contains(RAW_KEY));
    }
}
