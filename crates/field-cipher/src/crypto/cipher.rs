//! [`CipherEngine`]: AES-256-CBC encryption and decryption of string fields.
//!
//! **Confidentiality only.** CBC with PKCS#7 gives no integrity: a modified
//! token may decrypt to different bytes without any error, and the difference
//! between a [`CipherError::Padding`] and a successful decrypt is observable.
//! Do not expose decrypt results for attacker-controlled tokens as an oracle.

use std::fmt;

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use common::{CipherError, EncodedToken};
use tracing::debug;

use super::codec;
use super::iv::{IvSource, OsIvSource};
use crate::key::{Key, KeySource};

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Encrypts and decrypts field values under one immutable key.
///
/// The engine holds no mutable state; share it behind an `Arc` and call it
/// from any number of threads.
pub struct CipherEngine<S = OsIvSource> {
    key: Key,
    iv_source: S,
}

impl CipherEngine<OsIvSource> {
    /// Build an engine from raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKey`] unless `key_bytes` is 32 bytes.
    pub fn new(key_bytes: &[u8]) -> Result<Self, CipherError> {
        Ok(Self::with_iv_source(Key::from_bytes(key_bytes)?, OsIvSource))
    }

    /// Build an engine from a textual key held by `source`.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Configuration`] if the source is empty or
    /// undecodable, [`CipherError::InvalidKey`] if it resolves to the wrong length.
    pub fn from_source(source: &dyn KeySource) -> Result<Self, CipherError> {
        let (key, format) = Key::from_source(source)?;
        debug!(
            key_source = source.name(),
            key_format = format.as_str(),
            "cipher engine ready"
        );
        Ok(Self::with_iv_source(key, OsIvSource))
    }
}

impl<S: IvSource> CipherEngine<S> {
    /// Build an engine that draws IVs from `iv_source`.
    pub fn with_iv_source(key: Key, iv_source: S) -> Self {
        Self { key, iv_source }
    }

    /// Encrypt a text field.
    ///
    /// `&str` is always valid UTF-8, so [`CipherError::Encoding`] cannot occur here.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Cipher`] if the IV source fails.
    pub fn encrypt(&self, plaintext: &str) -> Result<EncodedToken, CipherError> {
        self.encrypt_bytes(plaintext.as_bytes())
    }

    /// Encrypt an arbitrary byte string.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Cipher`] if the IV source fails.
    pub fn encrypt_bytes(&self, plaintext: &[u8]) -> Result<EncodedToken, CipherError> {
        let iv = self.iv_source.next_iv()?;
        let ciphertext = Aes256CbcEnc::new(self.key.as_bytes().into(), (&iv).into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext);
        Ok(EncodedToken::new(codec::encode(&codec::join_blob(
            &iv,
            &ciphertext,
        ))))
    }

    /// Decrypt a token produced by [`encrypt`](Self::encrypt).
    ///
    /// # Errors
    ///
    /// Everything [`decrypt_bytes`](Self::decrypt_bytes) returns, plus
    /// [`CipherError::Encoding`] if the recovered bytes are not UTF-8.
    pub fn decrypt(&self, token: impl AsRef<str>) -> Result<String, CipherError> {
        let bytes = self.decrypt_bytes(token)?;
        String::from_utf8(bytes).map_err(|_| {
            debug!(code = CipherError::Encoding.code(), "token rejected");
            CipherError::Encoding
        })
    }

    /// Decrypt a token to raw bytes.
    ///
    /// # Errors
    ///
    /// - [`CipherError::Decoding`] if the token is not base64.
    /// - [`CipherError::MalformedCiphertext`] if the decoded length is not
    ///   `16 + 16 * n` with `n >= 1`. No cipher work is done in that case.
    /// - [`CipherError::Padding`] if the padding is invalid after decryption.
    pub fn decrypt_bytes(&self, token: impl AsRef<str>) -> Result<Vec<u8>, CipherError> {
        self.open(token.as_ref()).map_err(|e| {
            debug!(code = e.code(), "token rejected");
            e
        })
    }

    fn open(&self, token: &str) -> Result<Vec<u8>, CipherError> {
        let blob = codec::decode(token)?;
        let (iv, ciphertext) = codec::split_blob(&blob)?;
        Aes256CbcDec::new(self.key.as_bytes().into(), (&iv).into())
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CipherError::Padding)
    }
}

impl<S> fmt::Debug for CipherEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherEngine")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::iv::IV_LEN;
    use crate::key::KEY_LEN;

    struct FixedIv([u8; IV_LEN]);

    impl IvSource for FixedIv {
        fn next_iv(&self) -> Result<[u8; IV_LEN], CipherError> {
            Ok(self.0)
        }
    }

    struct BrokenRng;

    impl IvSource for BrokenRng {
        fn next_iv(&self) -> Result<[u8; IV_LEN], CipherError> {
            Err(CipherError::Cipher("random source failed: test".into()))
        }
    }

    fn engine() -> CipherEngine {
        CipherEngine::new(&[0x42u8; KEY_LEN]).unwrap()
    }

    fn fixed(iv: [u8; IV_LEN]) -> CipherEngine<FixedIv> {
        let key = Key::from_bytes(&[0x42u8; KEY_LEN]).unwrap();
        CipherEngine::with_iv_source(key, FixedIv(iv))
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let e = engine();
        let token = e.encrypt("PARTNER-7781-XQ").unwrap();
        assert_eq!(e.decrypt(&token).unwrap(), "PARTNER-7781-XQ");
    }

    #[test]
    fn padding_adds_full_block_when_aligned() {
        let e = engine();
        for (len, blocks) in [(0, 1), (1, 1), (15, 1), (16, 2), (17, 2), (32, 3)] {
            let token = e.encrypt(&"a".repeat(len)).unwrap();
            let blob = codec::decode(token.as_str()).unwrap();
            assert_eq!(blob.len(), IV_LEN + blocks * BLOCK_LEN, "plaintext len {len}");
        }
    }

    #[test]
    fn token_starts_with_iv() {
        let iv = [9u8; IV_LEN];
        let token = fixed(iv).encrypt("x").unwrap();
        let blob = codec::decode(token.as_str()).unwrap();
        assert_eq!(&blob[..IV_LEN], &iv);
    }

    #[test]
    fn fixed_iv_is_deterministic() {
        let e = fixed([3u8; IV_LEN]);
        assert_eq!(e.encrypt("payout").unwrap(), e.encrypt("payout").unwrap());
    }

    #[test]
    fn iv_source_failure_is_cipher_error() {
        let key = Key::from_bytes(&[1u8; KEY_LEN]).unwrap();
        let e = CipherEngine::with_iv_source(key, BrokenRng);
        assert_eq!(e.encrypt("x").unwrap_err().code(), "cipher_error");
    }

    #[test]
    fn non_utf8_plaintext_is_encoding_error() {
        let e = engine();
        let token = e.encrypt_bytes(&[0xff, 0xfe, 0x00]).unwrap();
        assert_eq!(e.decrypt(&token).unwrap_err(), CipherError::Encoding);
        assert_eq!(e.decrypt_bytes(&token).unwrap(), vec![0xff, 0xfe, 0x00]);
    }

    #[test]
    fn bad_padding_is_rejected() {
        let e = engine();
        let token = e.encrypt("0123456789abcde").unwrap();
        let mut blob = codec::decode(token.as_str()).unwrap();
        // 15-byte plaintext ends in pad byte 0x01; flipping the IV turns it into 0x00.
        blob[IV_LEN - 1] ^= 0x01;
        let tampered = codec::encode(&blob);
        assert_eq!(e.decrypt(tampered).unwrap_err(), CipherError::Padding);
    }

    #[test]
    fn debug_hides_key() {
        let dbg = format!("{:?}", engine());
        assert!(dbg.contains("REDACTED"));
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CipherEngine>();
    }
}
