use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;
/// CBC initialization vector length (one AES block).
pub const IV_LEN: usize = 16;

/// Errors from decryption. A padding failure is indistinguishable from a
/// wrong key, so callers treat every variant as corruption.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("initialization vector must be {IV_LEN} bytes, got {len}")]
    BadIvLength { len: usize },
    #[error("ciphertext length {len} is not a multiple of the cipher block size")]
    NotBlockAligned { len: usize },
    #[error("padding check failed (wrong key or corrupted ciphertext)")]
    BadPadding,
}

/// AES-256-CBC adapter with PKCS#7 padding. Holds only key material;
/// every encryption draws a fresh random IV, so identical plaintexts
/// produce different ciphertexts across saves.
pub struct CbcCipher {
    key: [u8; KEY_LEN],
}

impl CbcCipher {
    pub fn new(key: [u8; KEY_LEN]) -> Self {
        Self { key }
    }

    /// Encrypt a plaintext, returning the generated IV alongside the
    /// ciphertext. The IV is not secret and is stored with the blob.
    pub fn encrypt(&self, plaintext: &[u8]) -> ([u8; IV_LEN], Vec<u8>) {
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);
        let ciphertext = Aes256CbcEnc::new(&self.key.into(), &iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext);
        (iv, ciphertext)
    }

    /// Decrypt a ciphertext produced by [`CbcCipher::encrypt`].
    pub fn decrypt(&self, iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let iv: [u8; IV_LEN] = iv
            .try_into()
            .map_err(|_| CryptoError::BadIvLength { len: iv.len() })?;
        if ciphertext.is_empty() || ciphertext.len() % IV_LEN != 0 {
            return Err(CryptoError::NotBlockAligned {
                len: ciphertext.len(),
            });
        }
        Aes256CbcDec::new(&self.key.into(), &iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CryptoError::BadPadding)
    }
}
