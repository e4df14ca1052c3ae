//! # AES-256-CBC Page Cipher
//!
//! Raw block-mode transform for fixed-size page buffers. No padding is
//! applied: the input must already be a whole number of blocks.
//!
//! ## Stages
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      CIPHER OPERATION                                   │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  create    key (32) + iv (16) ──► CBC encryptor / decryptor            │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  update    every whole block of input ──► out[..n]                     │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  finalize  trailing partial block? ──► alignment failure               │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  release   key schedule zeroized on drop                               │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  check     produced == in_sz, otherwise fatal consistency failure      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! On any failure the output region is wiped before the error is returned.

use aes::Aes256;
use cbc::cipher::generic_array::GenericArray;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use zeroize::Zeroize;

use crate::algorithm::CipherMode;
use crate::error::{Error, Result, Stage};

/// Canonical name of the cipher
pub const CIPHER_NAME: &str = "aes-256-cbc";

/// AES-256 key length in bytes
pub const KEY_SIZE: usize = 32;

/// AES block length in bytes
pub const BLOCK_SIZE: usize = 16;

/// CBC IV length in bytes (one block)
pub const IV_SIZE: usize = BLOCK_SIZE;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// A live CBC cipher context
enum Cryptor {
    Encrypt(Aes256CbcEnc),
    Decrypt(Aes256CbcDec),
}

impl Cryptor {
    fn create(mode: CipherMode, key: &[u8], iv: &[u8]) -> Result<Self> {
        let cryptor = match mode {
            CipherMode::Encrypt => Aes256CbcEnc::new_from_slices(key, iv).map(Cryptor::Encrypt),
            CipherMode::Decrypt => Aes256CbcDec::new_from_slices(key, iv).map(Cryptor::Decrypt),
        };
        cryptor.map_err(|_| {
            Error::backend(
                Stage::Create,
                format!(
                    "expected {}-byte key and {}-byte iv, got {} and {}",
                    KEY_SIZE,
                    IV_SIZE,
                    key.len(),
                    iv.len()
                ),
            )
        })
    }

    /// Transform every whole block of `input`; returns bytes produced
    fn update(&mut self, input: &[u8], out: &mut [u8]) -> Result<usize> {
        let whole = input.len() - input.len() % BLOCK_SIZE;
        if out.len() < whole {
            return Err(Error::backend(
                Stage::Update,
                format!("output holds {} bytes, need {}", out.len(), whole),
            ));
        }

        let blocks = input[..whole]
            .chunks_exact(BLOCK_SIZE)
            .zip(out[..whole].chunks_exact_mut(BLOCK_SIZE));
        for (in_block, out_block) in blocks {
            let in_block = GenericArray::from_slice(in_block);
            let out_block = GenericArray::from_mut_slice(out_block);
            match self {
                Cryptor::Encrypt(enc) => enc.encrypt_block_b2b_mut(in_block, out_block),
                Cryptor::Decrypt(dec) => dec.decrypt_block_b2b_mut(in_block, out_block),
            }
        }

        Ok(whole)
    }

    /// Flush buffered input; returns bytes produced
    ///
    /// Unpadded CBC buffers nothing across whole blocks, so any bytes left
    /// over are a partial block.
    fn finalize(&mut self, remaining: &[u8]) -> Result<usize> {
        if !remaining.is_empty() {
            return Err(Error::backend(
                Stage::Finalize,
                format!(
                    "{} trailing bytes do not fill a {}-byte block",
                    remaining.len(),
                    BLOCK_SIZE
                ),
            ));
        }
        Ok(0)
    }
}

/// Encrypt or decrypt `input` into the first `input.len()` bytes of `out`
pub(crate) fn cipher(
    mode: CipherMode,
    key: &[u8],
    iv: &[u8],
    input: &[u8],
    out: &mut [u8],
) -> Result<()> {
    if out.len() < input.len() {
        return Err(Error::BufferTooSmall {
            what: "cipher output",
            required: input.len(),
            actual: out.len(),
        });
    }
    let out = &mut out[..input.len()];

    let result = transform(mode, key, iv, input, out);
    if result.is_err() {
        out.zeroize();
    }
    result
}

fn transform(
    mode: CipherMode,
    key: &[u8],
    iv: &[u8],
    input: &[u8],
    out: &mut [u8],
) -> Result<()> {
    let mut cryptor = Cryptor::create(mode, key, iv)?;

    let mut produced = cryptor.update(input, out)?;
    produced += cryptor.finalize(&input[produced..])?;

    // release
    drop(cryptor);

    check_produced(input.len(), produced)
}

/// Fail with a fatal consistency error unless exactly `expected` bytes
/// were produced
fn check_produced(expected: usize, produced: usize) -> Result<()> {
    if produced != expected {
        tracing::error!(
            expected,
            produced,
            "cipher produced an unexpected number of bytes"
        );
        return Err(Error::InternalConsistency { expected, produced });
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // NIST SP 800-38A, F.2.5 / F.2.6 (CBC-AES256)
    const NIST_KEY: &str = "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4";
    const NIST_IV: &str = "000102030405060708090a0b0c0d0e0f";
    const NIST_PLAINTEXT: &str = "6bc1bee22e409f96e93d7e117393172a\
                                  ae2d8a571e03ac9c9eb76fac45af8e51\
                                  30c81c46a35ce411e5fbc1191a0a52ef\
                                  f69f2445df4f9b17ad2b417be66c3710";
    const NIST_CIPHERTEXT: &str = "f58c4c04d6e5f1ba779eabfb5f7bfbd6\
                                   9cfc4e967edb808d679f777bc6702c7d\
                                   39f23369a9d9bacfa530e26304231461\
                                   b2eb05e2c39be9fcda6c19078c6a9d1b";

    #[test]
    fn test_nist_encrypt() {
        let key = hex::decode(NIST_KEY).unwrap();
        let iv = hex::decode(NIST_IV).unwrap();
        let plaintext = hex::decode(NIST_PLAINTEXT).unwrap();

        let mut out = vec![0u8; plaintext.len()];
        cipher(CipherMode::Encrypt, &key, &iv, &plaintext, &mut out).unwrap();

        assert_eq!(hex::encode(&out), NIST_CIPHERTEXT);
    }

    #[test]
    fn test_nist_decrypt() {
        let key = hex::decode(NIST_KEY).unwrap();
        let iv = hex::decode(NIST_IV).unwrap();
        let ciphertext = hex::decode(NIST_CIPHERTEXT).unwrap();

        let mut out = vec![0u8; ciphertext.len()];
        cipher(CipherMode::Decrypt, &key, &iv, &ciphertext, &mut out).unwrap();

        assert_eq!(hex::encode(&out), NIST_PLAINTEXT);
    }

    #[test]
    fn test_page_round_trip() {
        let key = [7u8; KEY_SIZE];
        let iv = [9u8; IV_SIZE];
        let page: Vec<u8> = (0..4096u32).map(|i| (i % 251) as u8).collect();

        let mut ciphertext = vec![0u8; page.len()];
        cipher(CipherMode::Encrypt, &key, &iv, &page, &mut ciphertext).unwrap();
        assert_ne!(ciphertext, page);

        let mut decrypted = vec![0u8; page.len()];
        cipher(CipherMode::Decrypt, &key, &iv, &ciphertext, &mut decrypted).unwrap();
        assert_eq!(decrypted, page);
    }

    #[test]
    fn test_larger_output_only_front_written() {
        let key = [1u8; KEY_SIZE];
        let iv = [2u8; IV_SIZE];
        let input = [3u8; 32];

        let mut out = [0xAAu8; 48];
        cipher(CipherMode::Encrypt, &key, &iv, &input, &mut out).unwrap();
        assert!(out[32..].iter().all(|b| *b == 0xAA));
    }

    #[test]
    fn test_empty_input() {
        let mut out = [0u8; 0];
        cipher(CipherMode::Encrypt, &[0u8; KEY_SIZE], &[0u8; IV_SIZE], &[], &mut out).unwrap();
    }

    #[test]
    fn test_unaligned_input_fails_at_finalize() {
        let key = [1u8; KEY_SIZE];
        let iv = [2u8; IV_SIZE];
        let input = [3u8; 40];

        let mut out = [0xAAu8; 40];
        let err = cipher(CipherMode::Encrypt, &key, &iv, &input, &mut out).unwrap_err();
        assert!(matches!(
            err,
            Error::BackendFailure {
                stage: Stage::Finalize,
                ..
            }
        ));
        // Partially written blocks are wiped
        assert!(out.iter().all(|b| *b == 0));
    }

    #[test]
    fn test_wrong_key_size_fails_at_create() {
        let mut out = [0u8; 16];
        let err = cipher(CipherMode::Decrypt, &[0u8; 16], &[0u8; IV_SIZE], &[0u8; 16], &mut out)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::BackendFailure {
                stage: Stage::Create,
                ..
            }
        ));
    }

    #[test]
    fn test_wrong_iv_size_fails_at_create() {
        let mut out = [0u8; 16];
        let err = cipher(CipherMode::Encrypt, &[0u8; KEY_SIZE], &[0u8; 8], &[0u8; 16], &mut out)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::BackendFailure {
                stage: Stage::Create,
                ..
            }
        ));
    }

    #[test]
    fn test_short_output_rejected() {
        let mut out = [0u8; 16];
        let err = cipher(
            CipherMode::Encrypt,
            &[0u8; KEY_SIZE],
            &[0u8; IV_SIZE],
            &[0u8; 32],
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::BufferTooSmall {
                required: 32,
                actual: 16,
                ..
            }
        ));
    }

    #[test]
    fn test_check_produced_exact_count() {
        check_produced(0, 0).unwrap();
        check_produced(4096, 4096).unwrap();
    }

    #[test]
    fn test_check_produced_mismatch_is_fatal() {
        for (expected, produced) in [(32, 16), (16, 32), (16, 0)] {
            let err = check_produced(expected, produced).unwrap_err();
            assert!(err.is_fatal());
            assert!(matches!(
                err,
                Error::InternalConsistency { expected: e, produced: p } if e == expected && p == produced
            ));
        }
    }
}
