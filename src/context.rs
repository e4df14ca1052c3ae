//! # Opaque Provider Context
//!
//! Backend-private state handed out by [`CryptoProvider::ctx_init`] and
//! returned through [`CryptoProvider::ctx_free`]. The consumer owns the
//! handle and passes it by `&mut` into every per-call operation, so a
//! context can never be used by two threads at once without the consumer
//! adding its own synchronization.
//!
//! Stateless backends hand out an empty context, which does not allocate.
//! Stateful backends (hardware tokens, FIPS modules) store their handles
//! inside and recover them with [`ProviderContext::state_mut`].
//!
//! [`CryptoProvider::ctx_init`]: crate::provider::CryptoProvider::ctx_init
//! [`CryptoProvider::ctx_free`]: crate::provider::CryptoProvider::ctx_free

use std::any::Any;
use std::fmt;

/// Consumer-owned handle to backend-private state
#[derive(Default)]
pub struct ProviderContext {
    state: Option<Box<dyn Any + Send>>,
}

impl ProviderContext {
    /// Empty placeholder for stateless backends
    pub fn stateless() -> Self {
        Self { state: None }
    }

    /// Wrap backend state
    pub fn with_state<T: Any + Send>(state: T) -> Self {
        Self {
            state: Some(Box::new(state)),
        }
    }

    /// Whether this context carries no backend state
    pub fn is_stateless(&self) -> bool {
        self.state.is_none()
    }

    /// Borrow the backend state, if it has type `T`
    pub fn state<T: Any>(&self) -> Option<&T> {
        self.state.as_ref()?.downcast_ref::<T>()
    }

    /// Mutably borrow the backend state, if it has type `T`
    pub fn state_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.state.as_mut()?.downcast_mut::<T>()
    }

    /// Take the backend state out, leaving the context stateless
    pub fn take_state<T: Any>(&mut self) -> Option<Box<T>> {
        let state = self.state.take()?;
        match state.downcast::<T>() {
            Ok(state) => Some(state),
            Err(other) => {
                self.state = Some(other);
                None
            }
        }
    }
}

// Backend state may hold secrets; only report whether it exists.
impl fmt::Debug for ProviderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderContext")
            .field("stateless", &self.is_stateless())
            .finish()
    }
}
