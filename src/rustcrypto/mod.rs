//! # RustCrypto Reference Backend
//!
//! A stateless [`CryptoProvider`] built entirely on pure-Rust RustCrypto
//! implementations.
//!
//! ## Primitive Bindings
//!
//! | Operation | Binding |
//! |-----------|---------|
//! | random | `rand::rngs::OsRng` |
//! | add_random | no-op (OS generator cannot be seeded) |
//! | hmac | `hmac::Hmac` over `sha1` / `sha2` |
//! | kdf | `pbkdf2::pbkdf2` with the selected HMAC as PRF |
//! | cipher | `cbc` over `aes::Aes256`, no padding |
//! | fips_status | always not-in-FIPS-mode |
//!
//! The provider holds no state at all, so one instance can be shared by any
//! number of threads. Contexts are empty placeholders.

mod cipher;
mod hmac;
mod kdf;
mod random;

use crate::algorithm::{CipherMode, HmacAlgorithm};
use crate::context::ProviderContext;
use crate::error::Result;
use crate::provider::CryptoProvider;

pub use cipher::{BLOCK_SIZE, CIPHER_NAME, IV_SIZE, KEY_SIZE};

/// Name reported by [`RustCryptoProvider`]
pub const PROVIDER_NAME: &str = "rustcrypto";

/// Version reported by [`RustCryptoProvider`]
///
/// This is the version of this crate. The RustCrypto crates expose no
/// version at runtime, and their exact versions are fixed by this crate's
/// lockfile.
pub const PROVIDER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reference backend over RustCrypto primitives
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoProvider;

impl RustCryptoProvider {
    /// Create the provider
    pub fn new() -> Self {
        Self
    }
}

impl CryptoProvider for RustCryptoProvider {
    fn random(&self, _ctx: &mut ProviderContext, buffer: &mut [u8]) -> Result<()> {
        random::fill(buffer)
    }

    fn add_random(&self, _ctx: &mut ProviderContext, entropy: &[u8]) -> Result<()> {
        random::add_entropy(entropy)
    }

    fn hmac(
        &self,
        _ctx: &mut ProviderContext,
        algorithm: HmacAlgorithm,
        key: &[u8],
        input: &[u8],
        input2: Option<&[u8]>,
        out: &mut [u8],
    ) -> Result<()> {
        hmac::hmac(algorithm, key, input, input2, out)
    }

    fn kdf(
        &self,
        _ctx: &mut ProviderContext,
        algorithm: HmacAlgorithm,
        pass: &[u8],
        salt: &[u8],
        workfactor: u32,
        key: &mut [u8],
    ) -> Result<()> {
        kdf::kdf(algorithm, pass, salt, workfactor, key)
    }

    fn cipher(
        &self,
        _ctx: &mut ProviderContext,
        mode: CipherMode,
        key: &[u8],
        iv: &[u8],
        input: &[u8],
        out: &mut [u8],
    ) -> Result<()> {
        cipher::cipher(mode, key, iv, input, out)
    }

    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    fn provider_version(&self) -> &str {
        PROVIDER_VERSION
    }

    fn cipher_name(&self) -> &str {
        CIPHER_NAME
    }

    fn key_size(&self) -> usize {
        KEY_SIZE
    }

    fn iv_size(&self) -> usize {
        IV_SIZE
    }

    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }
}

// ============================================================================
// TESTS
// ============================================================================
