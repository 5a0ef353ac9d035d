//! Per-call initialization vectors.

use common::CipherError;
use rand::{rngs::OsRng, RngCore};

/// Byte length of a CBC initialization vector (one AES block).
pub const IV_LEN: usize = 16;

/// Supplies a fresh IV for every encryption.
///
/// Production code uses [`OsIvSource`]. A fixed source is only meant for
/// known-answer tests; reusing an IV under one key leaks whether two
/// plaintexts share a prefix.
pub trait IvSource: Send + Sync {
    /// Produce the IV for the next encryption.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Cipher`] if no randomness is available.
    fn next_iv(&self) -> Result<[u8; IV_LEN], CipherError>;
}

/// IVs drawn from the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsIvSource;

impl IvSource for OsIvSource {
    fn next_iv(&self) -> Result<[u8; IV_LEN], CipherError> {
        let mut iv = [0u8; IV_LEN];
        OsRng
            .try_fill_bytes(&mut iv)
            .map_err(|e| CipherError::Cipher(format!("random source failed: {e}")))?;
        Ok(iv)
    }
}
