//! PBKDF2 key derivation with a selectable HMAC pseudorandom function.
//!
//! The workfactor is the PBKDF2 iteration count. It is consumer policy:
//! cost grows linearly with it and no upper bound is enforced here.

use hmac::Hmac;
use sha1::Sha1;
use sha2::{Sha256, Sha512};

use crate::algorithm::HmacAlgorithm;
use crate::error::{Error, Result, Stage};

/// Derive `key.len()` bytes from `pass` and `salt`
pub(crate) fn kdf(
    algorithm: HmacAlgorithm,
    pass: &[u8],
    salt: &[u8],
    workfactor: u32,
    key: &mut [u8],
) -> Result<()> {
    if workfactor == 0 {
        return Err(Error::backend(Stage::Derive, "workfactor must be at least 1"));
    }
    if key.is_empty() {
        return Err(Error::BufferTooSmall {
            what: "derived key",
            required: 1,
            actual: 0,
        });
    }

    let derived = match algorithm {
        HmacAlgorithm::Sha1 => pbkdf2::pbkdf2::<Hmac<Sha1>>(pass, salt, workfactor, key),
        HmacAlgorithm::Sha256 => pbkdf2::pbkdf2::<Hmac<Sha256>>(pass, salt, workfactor, key),
        HmacAlgorithm::Sha512 => pbkdf2::pbkdf2::<Hmac<Sha512>>(pass, salt, workfactor, key),
    };
    derived.map_err(|e| Error::backend(Stage::Derive, e))
}
