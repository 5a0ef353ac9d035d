//! AES-256-CBC field encryption primitives.
//!
//! This module is free of configuration and environment access. The engine is
//! handed a validated [`Key`](crate::key::Key) and never looks anything up.
//!
//! # Token format
//!
//! ```text
//! base64(IV(16) || AES-256-CBC(PKCS#7(plaintext)))
//! ```
//!
//! There is no version prefix and no authentication tag. A token can be
//! tampered with undetected beyond what padding validation happens to catch.

pub mod cipher;
pub mod codec;
pub mod iv;

pub use cipher::{CipherEngine, BLOCK_LEN};
pub use iv::{IvSource, OsIvSource, IV_LEN};
