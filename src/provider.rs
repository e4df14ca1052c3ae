//! # Provider Interface
//!
//! The capability contract every cryptographic backend implements.
//!
//! ## Operation Table
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       CryptoProvider                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Lifecycle            Per-call operations        Introspection         │
//! │  ─────────            ───────────────────        ─────────────         │
//! │  init()     (opt)     random(buf)                provider_name()       │
//! │  shutdown() (opt)     add_random(entropy)        provider_version()    │
//! │  ctx_init()           hmac(alg, key, in, in2)    cipher_name()         │
//! │  ctx_free()           kdf(alg, pass, salt, wf)   key_size()            │
//! │  fips_status()        cipher(mode, key, iv, in)  iv_size()             │
//! │                                                  block_size()          │
//! │                                                  hmac_size(alg)        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Implementations must be `Send + Sync` and must not mutate shared state
//! per call: many consumer threads invoke the same provider concurrently,
//! each with its own buffers and its own [`ProviderContext`].

use serde::{Deserialize, Serialize};

use crate::algorithm::{CipherMode, HmacAlgorithm};
use crate::context::ProviderContext;
use crate::error::Result;

/// Version string reported when a backend cannot determine its version
pub const UNKNOWN_VERSION: &str = "unknown";

/// FIPS mode indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FipsMode {
    /// Not operating inside a FIPS boundary
    Disabled,
    /// Operating in FIPS mode
    Enabled,
}

impl FipsMode {
    /// Integer mode indicator (0 = not in FIPS mode)
    pub fn code(self) -> i32 {
        match self {
            FipsMode::Disabled => 0,
            FipsMode::Enabled => 1,
        }
    }
}

/// A cryptographic backend
///
/// The consumer holds an `Arc<dyn CryptoProvider>` and never learns which
/// backend sits behind it. Every backend supports exactly one cipher.
pub trait CryptoProvider: Send + Sync {
    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Process-wide setup, run once when the provider is activated
    fn init(&self) -> Result<()> {
        Ok(())
    }

    /// Process-wide teardown, run once when the provider is retired
    fn shutdown(&self) {}

    /// Create a context for one consumer call-site
    fn ctx_init(&self) -> Result<ProviderContext> {
        Ok(ProviderContext::stateless())
    }

    /// Destroy a context created by [`ctx_init`](Self::ctx_init)
    fn ctx_free(&self, ctx: ProviderContext) -> Result<()> {
        drop(ctx);
        Ok(())
    }

    /// FIPS mode of this backend
    fn fips_status(&self, _ctx: &ProviderContext) -> FipsMode {
        FipsMode::Disabled
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Fill `buffer` from the operating system CSPRNG
    ///
    /// On error the buffer contents are undefined.
    fn random(&self, ctx: &mut ProviderContext, buffer: &mut [u8]) -> Result<()>;

    /// Mix external entropy into the random source
    ///
    /// Backends that cannot be seeded treat this as a successful no-op.
    fn add_random(&self, ctx: &mut ProviderContext, entropy: &[u8]) -> Result<()>;

    /// Keyed hash of `input` followed by `input2`
    ///
    /// Equivalent to HMAC over `input || input2`. Writes exactly
    /// [`hmac_size`](Self::hmac_size) bytes to the front of `out`.
    fn hmac(
        &self,
        ctx: &mut ProviderContext,
        algorithm: HmacAlgorithm,
        key: &[u8],
        input: &[u8],
        input2: Option<&[u8]>,
        out: &mut [u8],
    ) -> Result<()>;

    /// PBKDF2 with `algorithm` as PRF, filling all of `key`
    fn kdf(
        &self,
        ctx: &mut ProviderContext,
        algorithm: HmacAlgorithm,
        pass: &[u8],
        salt: &[u8],
        workfactor: u32,
        key: &mut [u8],
    ) -> Result<()>;

    /// Unpadded block-mode transform of `input` into the front of `out`
    ///
    /// `input.len()` must be a multiple of [`block_size`](Self::block_size).
    /// On error the caller must discard `out` entirely.
    fn cipher(
        &self,
        ctx: &mut ProviderContext,
        mode: CipherMode,
        key: &[u8],
        iv: &[u8],
        input: &[u8],
        out: &mut [u8],
    ) -> Result<()>;

    // ------------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------------

    /// Backend identifier
    fn provider_name(&self) -> &str;

    /// Backend library version, or [`UNKNOWN_VERSION`]
    fn provider_version(&self) -> &str;

    /// Canonical lowercase hyphenated cipher name, e.g. `aes-256-cbc`
    fn cipher_name(&self) -> &str;

    /// Cipher key length in bytes
    fn key_size(&self) -> usize;

    /// IV length in bytes
    fn iv_size(&self) -> usize;

    /// Cipher block length in bytes
    fn block_size(&self) -> usize;

    /// Digest length of `algorithm` in bytes
    fn hmac_size(&self, algorithm: HmacAlgorithm) -> usize {
        algorithm.digest_size()
    }
}

// ============================================================================
// INTROSPECTION SNAPSHOT
// ============================================================================

/// Every introspection value of a provider, collected for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Backend identifier
    pub name: String,
    /// Backend version
    pub version: String,
    /// Active cipher
    pub cipher: String,
    /// Key length in bytes
    pub key_size: usize,
    /// IV length in bytes
    pub iv_size: usize,
    /// Block length in bytes
    pub block_size: usize,
    /// HMAC-SHA1 digest length
    pub hmac_sha1_size: usize,
    /// HMAC-SHA256 digest length
    pub hmac_sha256_size: usize,
    /// HMAC-SHA512 digest length
    pub hmac_sha512_size: usize,
    /// FIPS mode indicator
    pub fips_mode: FipsMode,
}

impl ProviderInfo {
    /// Query every introspection slot of `provider`
    pub fn collect(provider: &dyn CryptoProvider) -> Result<Self> {
        let ctx = provider.ctx_init()?;
        let fips_mode = provider.fips_status(&ctx);
        provider.ctx_free(ctx)?;

        Ok(Self {
            name: provider.provider_name().to_string(),
            version: provider.provider_version().to_string(),
            cipher: provider.cipher_name().to_string(),
            key_size: provider.key_size(),
            iv_size: provider.iv_size(),
            block_size: provider.block_size(),
            hmac_sha1_size: provider.hmac_size(HmacAlgorithm::Sha1),
            hmac_sha256_size: provider.hmac_size(HmacAlgorithm::Sha256),
            hmac_sha512_size: provider.hmac_size(HmacAlgorithm::Sha512),
            fips_mode,
        })
    }

    /// Render as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
