//! # Provider Descriptor
//!
//! The table of operations the host engine actually calls. It wraps one
//! active [`CryptoProvider`] and exposes it with raw integer selectors and
//! two-valued [`Status`] results, the way a storage engine's codec layer
//! consumes it.
//!
//! ## Lifecycle
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      DESCRIPTOR LIFECYCLE                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ProviderDescriptor::activate(provider)                                │
//! │     │──► provider.init()         (first activation of this provider)   │
//! │     ▼                                                                   │
//! │  CONFIGURED                                                            │
//! │     │◄─► ctx_init / random / hmac / kdf / cipher / ctx_free            │
//! │     │    (many threads, one context each)                              │
//! │     ▼                                                                   │
//! │  last descriptor over the provider dropped                             │
//! │     └──► provider.shutdown()     (once, after the last activation)     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Activations are counted per provider instance, so wrapping the same
//! `Arc<dyn CryptoProvider>` in several descriptors runs `init` and
//! `shutdown` once around their combined lifetime.
//!
//! Failures are reported to the host as [`Status::Error`] only; the detailed
//! [`Error`] goes to `tracing`. Log records carry operation names, selectors
//! and lengths, never buffer contents.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::algorithm::{CipherMode, HmacAlgorithm};
use crate::context::ProviderContext;
use crate::error::{Error, Result, Status};
use crate::provider::{CryptoProvider, ProviderInfo};

/// Live descriptor count per provider instance, keyed by allocation address
///
/// An entry exists only while at least one descriptor holds the provider's
/// `Arc`, so the address cannot be reused by another provider meanwhile.
static ACTIVATIONS: Lazy<Mutex<HashMap<usize, usize>>> = Lazy::new(Default::default);

fn activation_key(provider: &Arc<dyn CryptoProvider>) -> usize {
    Arc::as_ptr(provider) as *const () as usize
}

/// An activated provider and its operation table
pub struct ProviderDescriptor {
    provider: Arc<dyn CryptoProvider>,
    verbose: bool,
}

impl ProviderDescriptor {
    /// Wrap `provider`, running its init hook on first activation
    ///
    /// The provider's shutdown hook runs when the last descriptor wrapping
    /// the same provider instance is dropped. `init` is called with the
    /// activation table locked and must not activate descriptors itself.
    pub fn activate(provider: Arc<dyn CryptoProvider>) -> Result<Self> {
        let mut activations = ACTIVATIONS.lock();
        let count = activations.get(&activation_key(&provider)).copied().unwrap_or(0);

        if count == 0 {
            provider
                .init()
                .map_err(|e| Error::ProviderInitFailed(e.to_string()))?;

            tracing::info!(
                provider = provider.provider_name(),
                version = provider.provider_version(),
                cipher = provider.cipher_name(),
                "Crypto provider activated"
            );
        }
        activations.insert(activation_key(&provider), count + 1);
        drop(activations);

        Ok(Self {
            provider,
            verbose: false,
        })
    }

    /// Emit a trace event for every call
    pub fn with_verbose_logging(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The wrapped provider
    pub fn provider(&self) -> &dyn CryptoProvider {
        self.provider.as_ref()
    }

    /// Snapshot of every introspection value
    pub fn info(&self) -> Result<ProviderInfo> {
        ProviderInfo::collect(self.provider())
    }

    // ========================================================================
    // CONTEXT SLOTS
    // ========================================================================

    /// Create a per-call-site context
    ///
    /// The one slot that does not return [`Status`]: on success it hands
    /// back the context itself. Failures are logged like every other slot.
    pub fn ctx_init(&self) -> Result<ProviderContext> {
        self.provider.ctx_init().map_err(|err| {
            self.log_failure("ctx_init", &err);
            err
        })
    }

    /// Destroy a context
    pub fn ctx_free(&self, ctx: ProviderContext) -> Status {
        self.report("ctx_free", self.provider.ctx_free(ctx))
    }

    /// FIPS mode indicator (0 = not in FIPS mode)
    pub fn fips_status(&self, ctx: &ProviderContext) -> i32 {
        self.provider.fips_status(ctx).code()
    }

    // ========================================================================
    // OPERATION SLOTS
    // ========================================================================

    /// Fill `buffer` with secure random bytes
    pub fn random(&self, ctx: &mut ProviderContext, buffer: &mut [u8]) -> Status {
        self.trace("random", None, buffer.len());
        self.report("random", self.provider.random(ctx, buffer))
    }

    /// Offer external entropy to the random source
    pub fn add_random(&self, ctx: &mut ProviderContext, entropy: &[u8]) -> Status {
        self.trace("add_random", None, entropy.len());
        self.report("add_random", self.provider.add_random(ctx, entropy))
    }

    /// HMAC of `input || input2` with the algorithm selected by `algorithm`
    ///
    /// `input` is mandatory; `None` fails.
    pub fn hmac(
        &self,
        ctx: &mut ProviderContext,
        algorithm: i32,
        key: &[u8],
        input: Option<&[u8]>,
        input2: Option<&[u8]>,
        out: &mut [u8],
    ) -> Status {
        let result = (|| {
            let input = input.ok_or(Error::MissingInput("hmac input"))?;
            let algorithm = HmacAlgorithm::try_from(algorithm)?;
            self.trace("hmac", Some(algorithm.id()), input.len());
            self.provider.hmac(ctx, algorithm, key, input, input2, out)
        })();
        self.report("hmac", result)
    }

    /// PBKDF2 with the HMAC selected by `algorithm` as PRF
    pub fn kdf(
        &self,
        ctx: &mut ProviderContext,
        algorithm: i32,
        pass: &[u8],
        salt: &[u8],
        workfactor: u32,
        key: &mut [u8],
    ) -> Status {
        let result = HmacAlgorithm::try_from(algorithm).and_then(|algorithm| {
            self.trace("kdf", Some(algorithm.id()), key.len());
            self.provider
                .kdf(ctx, algorithm, pass, salt, workfactor, key)
        });
        self.report("kdf", result)
    }

    /// Block-mode transform; `mode` is 1 to encrypt, 0 to decrypt
    pub fn cipher(
        &self,
        ctx: &mut ProviderContext,
        mode: i32,
        key: &[u8],
        iv: &[u8],
        input: &[u8],
        out: &mut [u8],
    ) -> Status {
        let result = CipherMode::try_from(mode).and_then(|mode| {
            self.trace("cipher", Some(mode.id()), input.len());
            self.provider.cipher(ctx, mode, key, iv, input, out)
        });
        self.report("cipher", result)
    }

    // ========================================================================
    // INTROSPECTION SLOTS
    // ========================================================================

    /// Backend identifier
    pub fn get_provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Backend version or `"unknown"`
    pub fn get_provider_version(&self) -> &str {
        self.provider.provider_version()
    }

    /// Active cipher name
    pub fn get_cipher(&self) -> &str {
        self.provider.cipher_name()
    }

    /// Key length in bytes
    pub fn get_key_sz(&self) -> usize {
        self.provider.key_size()
    }

    /// IV length in bytes
    pub fn get_iv_sz(&self) -> usize {
        self.provider.iv_size()
    }

    /// Block length in bytes
    pub fn get_block_sz(&self) -> usize {
        self.provider.block_size()
    }

    /// Digest length for `algorithm`, or 0 when the selector is unknown
    pub fn get_hmac_sz(&self, algorithm: i32) -> usize {
        HmacAlgorithm::from_id(algorithm)
            .map(|algorithm| self.provider.hmac_size(algorithm))
            .unwrap_or(0)
    }

    // ========================================================================
    // DIAGNOSTICS
    // ========================================================================

    fn trace(&self, operation: &'static str, selector: Option<i32>, len: usize) {
        if self.verbose {
            tracing::trace!(
                provider = self.provider.provider_name(),
                operation,
                selector,
                len,
                "provider call"
            );
        }
    }

    fn report(&self, operation: &'static str, result: Result<()>) -> Status {
        match result {
            Ok(()) => Status::Ok,
            Err(err) => {
                self.log_failure(operation, &err);
                err.status()
            }
        }
    }

    fn log_failure(&self, operation: &'static str, err: &Error) {
        if err.is_fatal() {
            tracing::error!(
                provider = self.provider.provider_name(),
                operation,
                code = err.code(),
                error = %err,
                "Crypto provider contract violated"
            );
        } else {
            tracing::warn!(
                provider = self.provider.provider_name(),
                operation,
                code = err.code(),
                error = %err,
                "Crypto provider operation failed"
            );
        }
    }
}

impl Drop for ProviderDescriptor {
    fn drop(&mut self) {
        let key = activation_key(&self.provider);
        let mut activations = ACTIVATIONS.lock();
        let count = activations.get(&key).copied().unwrap_or(0);
        if count > 1 {
            activations.insert(key, count - 1);
            return;
        }
        activations.remove(&key);

        // Still locked, so a concurrent activation cannot run init first
        tracing::info!(
            provider = self.provider.provider_name(),
            "Crypto provider shutting down"
        );
        self.provider.shutdown();
    }
}

impl fmt::Debug for ProviderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderDescriptor")
            .field("provider", &self.provider.provider_name())
            .field("verbose", &self.verbose)
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
