//! HMAC over the SHA family with an optional second input.
//!
//! The second input is a direct continuation of the first, so
//! `hmac(key, a, Some(b))` equals `hmac(key, a || b, None)`. Consumers use
//! it to append a page number or counter without copying the page.

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

use crate::algorithm::HmacAlgorithm;
use crate::error::{Error, Result, Stage};

/// Compute the HMAC of `input || input2` into the front of `out`
pub(crate) fn hmac(
    algorithm: HmacAlgorithm,
    key: &[u8],
    input: &[u8],
    input2: Option<&[u8]>,
    out: &mut [u8],
) -> Result<()> {
    let size = algorithm.digest_size();
    if out.len() < size {
        return Err(Error::BufferTooSmall {
            what: "hmac output",
            required: size,
            actual: out.len(),
        });
    }
    let out = &mut out[..size];

    match algorithm {
        HmacAlgorithm::Sha1 => compute::<Hmac<Sha1>>(key, input, input2, out),
        HmacAlgorithm::Sha256 => compute::<Hmac<Sha256>>(key, input, input2, out),
        HmacAlgorithm::Sha512 => compute::<Hmac<Sha512>>(key, input, input2, out),
    }
}

fn compute<M: Mac + KeyInit>(
    key: &[u8],
    input: &[u8],
    input2: Option<&[u8]>,
    out: &mut [u8],
) -> Result<()> {
    let mut mac =
        <M as Mac>::new_from_slice(key).map_err(|e| Error::backend(Stage::HmacInit, e))?;

    mac.update(input);
    if let Some(input2) = input2 {
        mac.update(input2);
    }

    let tag = mac.finalize().into_bytes();
    if tag.len() != out.len() {
        return Err(Error::backend(
            Stage::HmacFinal,
            format!("digest is {} bytes, expected {}", tag.len(), out.len()),
        ));
    }
    out.copy_from_slice(&tag);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hmac_hex(algorithm: HmacAlgorithm, key: &[u8], input: &[u8], input2: Option<&[u8]>) -> String {
        let mut out = vec![0u8; algorithm.digest_size()];
        hmac(algorithm, key, input, input2, &mut out).unwrap();
        hex::encode(out)
    }

    // RFC 2202 test case 2, RFC 4231 test case 2
    #[test]
    fn test_known_answers() {
        let key = b"Jefe";
        let data = b"what do ya want for nothing?";

        assert_eq!(
            hmac_hex(HmacAlgorithm::Sha1, key, data, None),
            "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79"
        );
        assert_eq!(
            hmac_hex(HmacAlgorithm::Sha256, key, data, None),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
        assert_eq!(
            hmac_hex(HmacAlgorithm::Sha512, key, data, None),
            "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554\
             9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
        );
    }

    #[test]
    fn test_second_input_is_concatenation() {
        let key = b"page-hmac-key";
        let page = [0x5Au8; 1024];
        let pgno = 42u32.to_le_bytes();

        let mut joined = page.to_vec();
        joined.extend_from_slice(&pgno);

        for alg in HmacAlgorithm::ALL {
            assert_eq!(
                hmac_hex(alg, key, &page, Some(&pgno[..])),
                hmac_hex(alg, key, &joined, None),
                "{:?}",
                alg
            );
        }
    }

    #[test]
    fn test_split_point_does_not_matter() {
        let key = [0x0bu8; 20];
        let message = b"Hi There, this message is split in different places";

        for alg in HmacAlgorithm::ALL {
            let whole = hmac_hex(alg, &key, message, None);
            for split in [0, 1, 17, message.len()] {
                let (a, b) = message.split_at(split);
                assert_eq!(hmac_hex(alg, &key, a, Some(b)), whole);
            }
        }
    }

    #[test]
    fn test_empty_second_input_matches_absent() {
        for alg in HmacAlgorithm::ALL {
            assert_eq!(
                hmac_hex(alg, b"k", b"message", Some(&[][..])),
                hmac_hex(alg, b"k", b"message", None)
            );
        }
    }

    #[test]
    fn test_order_matters() {
        let ab = hmac_hex(HmacAlgorithm::Sha256, b"k", b"first", Some(&b"second"[..]));
        let ba = hmac_hex(HmacAlgorithm::Sha256, b"k", b"second", Some(&b"first"[..]));
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_long_key_accepted() {
        // Keys longer than the block size are hashed first
        let key = [0xaau8; 131];
        let out = hmac_hex(HmacAlgorithm::Sha512, &key, b"data", None);
        assert_eq!(out.len(), 128);
    }

    #[test]
    fn test_only_digest_bytes_written() {
        let mut out = [0xEEu8; 40];
        hmac(HmacAlgorithm::Sha1, b"k", b"m", None, &mut out).unwrap();
        assert!(out[20..].iter().all(|b| *b == 0xEE));
    }

    #[test]
    fn test_short_output_rejected() {
        let mut out = [0u8; 31];
        let err = hmac(HmacAlgorithm::Sha256, b"k", b"m", None, &mut out).unwrap_err();
        assert!(matches!(
            err,
            Error::BufferTooSmall {
                required: 32,
                actual: 31,
                ..
            }
        ));
    }
}
