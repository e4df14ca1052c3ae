//! # Page Crypto Provider
//!
//! A pluggable cryptographic provider interface for an encrypted database
//! engine, with a reference backend built on the RustCrypto primitives.
//!
//! The storage engine encrypts and authenticates fixed-size pages. It never
//! calls a crypto library directly; every primitive goes through the single
//! active provider, which can be swapped without touching the engine.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      PAGE CRYPTO PROVIDER                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌──────────────────┐        ┌────────────────────────────────────┐    │
//! │  │  Storage Engine  │        │          Registry                  │    │
//! │  │  (page codec)    │───────►│  setup(config) / active()          │    │
//! │  └──────────────────┘        └─────────────────┬──────────────────┘    │
//! │           │                                    │                       │
//! │           │ integer selectors, Status          ▼                       │
//! │           │                  ┌────────────────────────────────────┐    │
//! │           └─────────────────►│       ProviderDescriptor           │    │
//! │                              │  random / hmac / kdf / cipher      │    │
//! │                              │  ctx_init / ctx_free / get_*_sz    │    │
//! │                              └─────────────────┬──────────────────┘    │
//! │                                                │ dyn CryptoProvider    │
//! │                                                ▼                       │
//! │                              ┌────────────────────────────────────┐    │
//! │                              │     RustCryptoProvider             │    │
//! │                              │  OsRng · HMAC-SHA1/256/512         │    │
//! │                              │  PBKDF2 · AES-256-CBC (no pad)     │    │
//! │                              └────────────────────────────────────┘    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error types and the two-valued [`Status`]
//! - [`algorithm`] - HMAC algorithm and cipher direction selectors
//! - [`context`] - Opaque per-call-site provider context
//! - [`provider`] - The [`CryptoProvider`] trait every backend implements
//! - [`descriptor`] - Integer-selector operation table over a provider
//! - [`config`] - Provider configuration
//! - [`registry`] - The process-wide active provider
//! - [`rustcrypto`] - Reference backend
//!
//! ## Reference Backend Parameters
//!
//! | Parameter | Value |
//! |-----------|-------|
//! | Cipher | `aes-256-cbc`, no padding |
//! | Key size | 32 bytes |
//! | IV size | 16 bytes |
//! | Block size | 16 bytes |
//! | HMAC sizes | SHA1 20, SHA256 32, SHA512 64 |
//! | FIPS mode | never |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod algorithm;
pub mod config;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod provider;
pub mod registry;
pub mod rustcrypto;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use algorithm::{CipherMode, HmacAlgorithm};
pub use config::ProviderConfig;
pub use context::ProviderContext;
pub use descriptor::ProviderDescriptor;
pub use error::{Error, ErrorCategory, Result, Stage, Status};
pub use provider::{CryptoProvider, FipsMode, ProviderInfo};
pub use registry::{active, setup, ProviderRegistry};
pub use rustcrypto::RustCryptoProvider;

// ============================================================================
// VERSION INFO
// ============================================================================

/// Returns the version of this crate
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_page_codec_flow() {
        let registry = ProviderRegistry::new();
        let provider = registry.setup(&ProviderConfig::default()).unwrap();
        let mut ctx = provider.ctx_init().unwrap();

        // Derive the database key
        let mut salt = [0u8; 16];
        assert!(provider.random(&mut ctx, &mut salt).is_ok());
        let mut key = vec![0u8; provider.get_key_sz()];
        assert!(provider
            .kdf(&mut ctx, HmacAlgorithm::Sha512.id(), b"secret", &salt, 256, &mut key)
            .is_ok());

        // Encrypt a page with a fresh IV
        let page = [0xA5u8; 4096];
        let mut iv = vec![0u8; provider.get_iv_sz()];
        assert!(provider.random(&mut ctx, &mut iv).is_ok());
        let mut enc = [0u8; 4096];
        assert!(provider
            .cipher(&mut ctx, CipherMode::Encrypt.id(), &key, &iv, &page, &mut enc)
            .is_ok());

        // Authenticate ciphertext || IV, appending the page number
        let hmac_sz = provider.get_hmac_sz(HmacAlgorithm::Sha512.id());
        let mut tag = vec![0u8; hmac_sz];
        let mut authenticated = enc.to_vec();
        authenticated.extend_from_slice(&iv);
        let pgno = 3u32.to_le_bytes();
        assert!(provider
            .hmac(
                &mut ctx,
                HmacAlgorithm::Sha512.id(),
                &key,
                Some(&authenticated[..]),
                Some(&pgno[..]),
                &mut tag,
            )
            .is_ok());
        assert_eq!(tag.len(), 64);

        let mut dec = [0u8; 4096];
        assert!(provider
            .cipher(&mut ctx, CipherMode::Decrypt.id(), &key, &iv, &enc, &mut dec)
            .is_ok());
        assert_eq!(dec, page);

        assert!(provider.ctx_free(ctx).is_ok());
    }
}
