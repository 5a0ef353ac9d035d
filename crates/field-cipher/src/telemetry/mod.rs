//! Structured logging for hosts embedding the engine.
//!
//! The library emits `tracing` events but never installs a subscriber on its
//! own. Hosts without their own pipeline call [`init`] once at startup, after
//! loading [`Config`] and before building the engine:
//!
//! ```text
//! Config::from_env() ──▶ telemetry::init(&cfg) ──▶ cfg.cipher_engine()
//! ```
//!
//! # Telemetry invariants
//!
//! - **No plaintext, key material or IVs** appear in any event field. Only the
//!   key source *name* is logged.
//! - Log level comes from `LOG_LEVEL` (default: `info`); `RUST_LOG` overrides it.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::key::KeySource;

/// Install a JSON tracing subscriber at `cfg.log_level`.
///
/// # Errors
///
/// Returns an error if the level is not a valid filter directive or a global
/// subscriber has already been set.
pub fn init(cfg: &Config) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => EnvFilter::try_new(&cfg.log_level)
            .with_context(|| format!("invalid LOG_LEVEL directive: {}", cfg.log_level))?,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().json().with_target(false))
        .try_init()
        .context("failed to initialise field-cipher tracing subscriber")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        key_source = cfg.name(),
        "field-cipher telemetry ready"
    );
    Ok(())
}
