//! # Algorithm Selectors
//!
//! Closed sets of the HMAC algorithms and cipher directions a provider
//! understands. Each variant carries a stable integer id used at the
//! descriptor boundary.
//!
//! | Selector | Id | Digest size |
//! |----------|----|-------------|
//! | `HmacAlgorithm::Sha1` | 0 | 20 |
//! | `HmacAlgorithm::Sha256` | 1 | 32 |
//! | `HmacAlgorithm::Sha512` | 2 | 64 |
//! | `CipherMode::Decrypt` | 0 | - |
//! | `CipherMode::Encrypt` | 1 | - |

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// HMAC algorithm, also used as the PBKDF2 pseudorandom function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HmacAlgorithm {
    /// HMAC-SHA1
    Sha1,
    /// HMAC-SHA256
    Sha256,
    /// HMAC-SHA512
    Sha512,
}

impl HmacAlgorithm {
    /// Every supported algorithm, in id order
    pub const ALL: [HmacAlgorithm; 3] = [
        HmacAlgorithm::Sha1,
        HmacAlgorithm::Sha256,
        HmacAlgorithm::Sha512,
    ];

    /// Stable integer id
    pub fn id(self) -> i32 {
        match self {
            HmacAlgorithm::Sha1 => 0,
            HmacAlgorithm::Sha256 => 1,
            HmacAlgorithm::Sha512 => 2,
        }
    }

    /// Look up an algorithm by id
    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|alg| alg.id() == id)
    }

    /// Digest length in bytes
    pub fn digest_size(self) -> usize {
        match self {
            HmacAlgorithm::Sha1 => 20,
            HmacAlgorithm::Sha256 => 32,
            HmacAlgorithm::Sha512 => 64,
        }
    }

    /// Canonical lowercase name
    pub fn name(self) -> &'static str {
        match self {
            HmacAlgorithm::Sha1 => "hmac-sha1",
            HmacAlgorithm::Sha256 => "hmac-sha256",
            HmacAlgorithm::Sha512 => "hmac-sha512",
        }
    }
}

impl TryFrom<i32> for HmacAlgorithm {
    type Error = Error;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        Self::from_id(id).ok_or(Error::UnsupportedAlgorithm(id))
    }
}

/// Direction of a cipher operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CipherMode {
    /// Ciphertext to plaintext
    Decrypt,
    /// Plaintext to ciphertext
    Encrypt,
}

impl CipherMode {
    /// Stable integer id
    pub fn id(self) -> i32 {
        match self {
            CipherMode::Decrypt => 0,
            CipherMode::Encrypt => 1,
        }
    }
}

impl TryFrom<i32> for CipherMode {
    type Error = Error;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(CipherMode::Decrypt),
            1 => Ok(CipherMode::Encrypt),
            other => Err(Error::UnsupportedCipherMode(other)),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
