//! Error taxonomy for the cipher engine.

use thiserror::Error;

/// Every failure the cipher engine can report.
///
/// Messages are safe to surface to operators: no variant carries key bytes,
/// IVs or plaintext. Callers translate variants into user-facing responses via
/// [`CipherError::code`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// The key source is missing, empty, or not decodable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The resolved key is not exactly 32 bytes.
    #[error("key must be 256 bits (got {0} bytes)")]
    InvalidKey(usize),

    /// Text could not be converted to or from UTF-8 bytes.
    #[error("encoding error: recovered bytes are not valid UTF-8")]
    Encoding,

    /// The token is not valid base64.
    #[error("decoding error: token is not valid base64")]
    Decoding,

    /// The decoded token length does not match `IV || N * block`.
    #[error("malformed ciphertext: {0} decoded bytes is not a valid IV + block layout")]
    MalformedCiphertext(usize),

    /// Padding bytes failed validation after decryption.
    #[error("padding error: invalid PKCS#7 padding")]
    Padding,

    /// The block cipher or the random source failed unexpectedly.
    #[error("cipher error: {0}")]
    Cipher(String),
}

impl CipherError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            CipherError::Configuration(_) => "configuration_error",
            CipherError::InvalidKey(_) => "invalid_key_error",
            CipherError::Encoding => "encoding_error",
            CipherError::Decoding => "decoding_error",
            CipherError::MalformedCiphertext(_) => "malformed_ciphertext_error",
            CipherError::Padding => "padding_error",
            CipherError::Cipher(_) => "cipher_error",
        }
    }

    /// Returns `true` for errors caused by the token rather than the engine.
    ///
    /// Input errors are expected when decrypting untrusted values; the rest
    /// indicate a misconfigured or broken engine.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CipherError::Encoding
                | CipherError::Decoding
                | CipherError::MalformedCiphertext(_)
                | CipherError::Padding
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let all = [
            CipherError::Configuration("x".into()),
            CipherError::InvalidKey(16),
            CipherError::Encoding,
            CipherError::Decoding,
            CipherError::MalformedCiphertext(3),
            CipherError::Padding,
            CipherError::Cipher("x".into()),
        ];
        let mut codes: Vec<_> = all.iter().map(CipherError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn invalid_key_message() {
        let e = CipherError::InvalidKey(31);
        assert!(e.to_string().contains("key must be 256 bits"));
        assert!(e.to_string().contains("31"));
    }

    #[test]
    fn input_errors_classified() {
        assert!(CipherError::Padding.is_input_error());
        assert!(CipherError::MalformedCiphertext(8).is_input_error());
        assert!(!CipherError::InvalidKey(0).is_input_error());
        assert!(!CipherError::Configuration("missing key source".into()).is_input_error());
    }
}
