//! # Provider Registry
//!
//! Holds the single active [`ProviderDescriptor`] of a process.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        REGISTRY STATES                                  │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   UNCONFIGURED ──── setup(config) ────► CONFIGURED                      │
//! │        │                                   │   ▲                        │
//! │        │ active() → NotConfigured          │   │ setup(config): no-op   │
//! │        ▼                                   │   │ register(d): replace   │
//! │                                            └───┘                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Readers clone an `Arc` out of the lock, so a replacement never pulls a
//! descriptor out from under an in-flight operation. A provider's shutdown
//! hook runs once no descriptor over it remains, so re-registering the
//! active provider never shuts it down.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::config::ProviderConfig;
use crate::descriptor::ProviderDescriptor;
use crate::error::{Error, Result};

/// Slot for the active provider descriptor
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    active: RwLock<Option<Arc<ProviderDescriptor>>>,
}

impl ProviderRegistry {
    /// Create an unconfigured registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the registry from `config`
    ///
    /// If a descriptor is already active it is returned unchanged and
    /// `config` is ignored.
    pub fn setup(&self, config: &ProviderConfig) -> Result<Arc<ProviderDescriptor>> {
        if let Some(active) = self.active.read().as_ref() {
            return Ok(Arc::clone(active));
        }

        let mut slot = self.active.write();
        // Another thread may have won the race between the two locks
        if let Some(active) = slot.as_ref() {
            return Ok(Arc::clone(active));
        }

        let descriptor = Arc::new(config.build()?);
        tracing::info!(
            provider = descriptor.get_provider_name(),
            "Crypto provider configured"
        );
        *slot = Some(Arc::clone(&descriptor));
        Ok(descriptor)
    }

    /// Install `descriptor`, replacing any active one
    pub fn register(&self, descriptor: ProviderDescriptor) -> Arc<ProviderDescriptor> {
        let descriptor = Arc::new(descriptor);
        let previous = self.active.write().replace(Arc::clone(&descriptor));

        match previous {
            Some(previous) => tracing::info!(
                from = previous.get_provider_name(),
                to = descriptor.get_provider_name(),
                "Crypto provider replaced"
            ),
            None => tracing::info!(
                provider = descriptor.get_provider_name(),
                "Crypto provider registered"
            ),
        }
        descriptor
    }

    /// The active descriptor
    pub fn active(&self) -> Result<Arc<ProviderDescriptor>> {
        self.active.read().clone().ok_or(Error::NotConfigured)
    }

    /// Check whether a descriptor is active
    pub fn is_configured(&self) -> bool {
        self.active.read().is_some()
    }
}

// ============================================================================
// PROCESS-WIDE REGISTRY
// ============================================================================

static GLOBAL: Lazy<ProviderRegistry> = Lazy::new(ProviderRegistry::new);

/// The process-wide registry
pub fn global() -> &'static ProviderRegistry {
    &GLOBAL
}

/// Configure the process-wide provider
///
/// Call once at startup. Later calls return the already active descriptor.
///
/// ## Example
///
/// ```ignore
/// use page_crypto_provider::{setup, ProviderConfig};
///
/// let provider = setup(&ProviderConfig::default())?;
/// assert_eq!(provider.get_key_sz(), 32);
/// ```
pub fn setup(config: &ProviderConfig) -> Result<Arc<ProviderDescriptor>> {
    GLOBAL.setup(config)
}

/// The process-wide active provider
///
/// Returns an error if [`setup`] has not been called.
pub fn active() -> Result<Arc<ProviderDescriptor>> {
    GLOBAL.active()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::thread;

    use super::*;
    use crate::descriptor::tests::CountingProvider;
    use crate::rustcrypto::RustCryptoProvider;

    #[test]
    fn test_unconfigured() {
        let registry = ProviderRegistry::new();
        assert!(!registry.is_configured());
        assert!(matches!(registry.active(), Err(Error::NotConfigured)));
    }

    #[test]
    fn test_setup_is_idempotent() {
        let registry = ProviderRegistry::new();
        let first = registry.setup(&ProviderConfig::default()).unwrap();

        let other = ProviderConfig {
            provider: "does-not-exist".into(),
            ..Default::default()
        };
        let second = registry.setup(&other).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &registry.active().unwrap()));
    }

    #[test]
    fn test_failed_setup_stays_unconfigured() {
        let registry = ProviderRegistry::new();
        let config = ProviderConfig {
            provider: "does-not-exist".into(),
            ..Default::default()
        };
        assert!(registry.setup(&config).is_err());
        assert!(!registry.is_configured());
    }

    #[test]
    fn test_concurrent_setup_builds_once() {
        let registry = Arc::new(ProviderRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.setup(&ProviderConfig::default()).unwrap())
            })
            .collect();
        let descriptors: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        for descriptor in &descriptors[1..] {
            assert!(Arc::ptr_eq(&descriptors[0], descriptor));
        }
    }

    #[test]
    fn test_replacement_shuts_down_previous() {
        let registry = ProviderRegistry::new();
        let counting = Arc::new(CountingProvider::default());

        let held = registry.register(ProviderDescriptor::activate(counting.clone()).unwrap());
        assert_eq!(registry.active().unwrap().get_provider_name(), "counting");

        let replacement =
            ProviderDescriptor::activate(Arc::new(RustCryptoProvider::new())).unwrap();
        registry.register(replacement);
        assert_eq!(registry.active().unwrap().get_provider_name(), "rustcrypto");

        // The caller still holds the old descriptor
        assert_eq!(counting.shutdowns.load(Ordering::SeqCst), 0);
        drop(held);
        assert_eq!(counting.shutdowns.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reregistering_active_provider_keeps_it_running() {
        let registry = ProviderRegistry::new();
        let counting = Arc::new(CountingProvider::default());

        registry.register(ProviderDescriptor::activate(counting.clone()).unwrap());
        registry.register(ProviderDescriptor::activate(counting.clone()).unwrap());

        assert_eq!(registry.active().unwrap().get_provider_name(), "counting");
        assert_eq!(counting.inits.load(Ordering::SeqCst), 1);
        assert_eq!(counting.shutdowns.load(Ordering::SeqCst), 0);

        registry.register(ProviderDescriptor::activate(Arc::new(RustCryptoProvider::new())).unwrap());
        assert_eq!(counting.shutdowns.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_global_registry() {
        let descriptor = setup(&ProviderConfig::default()).unwrap();
        assert!(global().is_configured());
        assert!(Arc::ptr_eq(&descriptor, &active().unwrap()));
    }
}
