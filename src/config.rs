//! Provider configuration.
//!
//! The crate reads no files or environment variables; a host embeds
//! [`ProviderConfig`] in its own settings and hands it to
//! [`setup`](crate::registry::setup).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::descriptor::ProviderDescriptor;
use crate::error::{Error, Result};
use crate::provider::{CryptoProvider, FipsMode};
use crate::rustcrypto::{self, RustCryptoProvider};

/// Configuration for building the active provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Backend to build
    pub provider: String,
    /// Emit a trace event for every descriptor call
    pub verbose_logging: bool,
    /// Refuse backends that do not report FIPS mode
    pub require_fips: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: rustcrypto::PROVIDER_NAME.to_string(),
            verbose_logging: false,
            require_fips: false,
        }
    }
}

impl ProviderConfig {
    /// Build and activate the configured backend
    pub fn build(&self) -> Result<ProviderDescriptor> {
        let provider: Arc<dyn CryptoProvider> = match self.provider.as_str() {
            rustcrypto::PROVIDER_NAME => Arc::new(RustCryptoProvider::new()),
            other => return Err(Error::UnknownProvider(other.to_string())),
        };
        self.build_with(provider)
    }

    /// Activate a caller-supplied backend under this configuration
    ///
    /// The `provider` field is ignored.
    pub fn build_with(&self, provider: Arc<dyn CryptoProvider>) -> Result<ProviderDescriptor> {
        if self.require_fips {
            let ctx = provider.ctx_init()?;
            let mode = provider.fips_status(&ctx);
            provider.ctx_free(ctx)?;
            if mode != FipsMode::Enabled {
                return Err(Error::FipsRequired(provider.provider_name().to_string()));
            }
        }

        Ok(ProviderDescriptor::activate(provider)?.with_verbose_logging(self.verbose_logging))
    }
}
