//! Binary to text-safe encoding of the `IV || ciphertext` blob.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::CipherError;

use super::cipher::BLOCK_LEN;
use super::iv::IV_LEN;

/// Smallest valid decoded token: one IV plus one padded block.
pub const MIN_BLOB_LEN: usize = IV_LEN + BLOCK_LEN;

/// Standard base64 with padding.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode a token back to its blob.
///
/// # Errors
///
/// Returns [`CipherError::Decoding`] if `token` is not valid standard base64.
pub fn decode(token: &str) -> Result<Vec<u8>, CipherError> {
    STANDARD.decode(token).map_err(|_| CipherError::Decoding)
}

/// Concatenate IV and ciphertext into one blob.
pub fn join_blob(iv: &[u8; IV_LEN], ciphertext: &[u8]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(IV_LEN + ciphertext.len());
    blob.extend_from_slice(iv);
    blob.extend_from_slice(ciphertext);
    blob
}

/// Split a blob into IV and ciphertext after checking its layout.
///
/// # Errors
///
/// Returns [`CipherError::MalformedCiphertext`] if the blob is shorter than
/// [`MIN_BLOB_LEN`] or the part after the IV is not whole blocks.
pub fn split_blob(blob: &[u8]) -> Result<([u8; IV_LEN], &[u8]), CipherError> {
    if blob.len() < MIN_BLOB_LEN || (blob.len() - IV_LEN) % BLOCK_LEN != 0 {
        return Err(CipherError::MalformedCiphertext(blob.len()));
    }
    let (iv_bytes, ciphertext) = blob.split_at(IV_LEN);
    let mut iv = [0u8; IV_LEN];
    iv.copy_from_slice(iv_bytes);
    Ok((iv, ciphertext))
}
