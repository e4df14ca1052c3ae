//! # Error Handling
//!
//! Error types for the provider interface.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Configuration Errors                                              │
//! │  │   ├── NotConfigured         - No provider has been set up           │
//! │  │   ├── UnknownProvider       - Config names an unknown backend       │
//! │  │   ├── FipsRequired          - Backend is not in FIPS mode           │
//! │  │   └── ProviderInitFailed    - Backend init hook failed              │
//! │  │                                                                      │
//! │  ├── Algorithm Errors                                                  │
//! │  │   ├── UnsupportedAlgorithm  - Unknown HMAC/KDF selector             │
//! │  │   └── UnsupportedCipherMode - Unknown cipher direction              │
//! │  │                                                                      │
//! │  ├── Usage Errors                                                      │
//! │  │   ├── MissingInput          - Required input buffer absent          │
//! │  │   └── BufferTooSmall        - Output buffer shorter than required   │
//! │  │                                                                      │
//! │  ├── Backend Errors                                                    │
//! │  │   ├── BackendFailure        - Primitive failed at a given stage     │
//! │  │   └── RngFailed             - OS CSPRNG could not fill the buffer   │
//! │  │                                                                      │
//! │  └── Internal Errors                                                   │
//! │      ├── InternalConsistency   - Produced byte count mismatch (fatal)  │
//! │      └── SerializationError    - Diagnostics rendering failed          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Codes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ERROR HANDLING FLOW                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Rust API                  Descriptor Slot             Host Engine     │
//! │  ──────────────────────────────────────────────────────────────────     │
//! │                                                                         │
//! │  Result<T, Error>  ──────►  Status::Ok | Status::Error  ──────► 0 | 1  │
//! │                    └──────► tracing::warn!(code, error)                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The host engine only ever sees the generic failure code. Detail goes to
//! the logging layer and never contains key material.

use std::fmt;

use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, Error>;

/// Stage of a multi-step backend operation at which a primitive failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Cipher context creation (key schedule, IV load)
    Create,
    /// Cipher block processing
    Update,
    /// Cipher finalization
    Finalize,
    /// HMAC keying
    HmacInit,
    /// HMAC finalization
    HmacFinal,
    /// PBKDF2 derivation
    Derive,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Create => "create",
            Stage::Update => "update",
            Stage::Finalize => "finalize",
            Stage::HmacInit => "hmac-init",
            Stage::HmacFinal => "hmac-final",
            Stage::Derive => "derive",
        };
        f.write_str(name)
    }
}

/// Main error type for provider operations
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors (100-199)
    // ========================================================================

    /// No provider has been configured yet
    #[error("No crypto provider configured. Call setup() first.")]
    NotConfigured,

    /// The configuration names a backend this build does not know
    #[error("Unknown crypto provider: {0}")]
    UnknownProvider(String),

    /// FIPS mode was required but the backend does not report it
    #[error("Provider {0} is not operating in FIPS mode")]
    FipsRequired(String),

    /// The backend's process-wide init hook failed
    #[error("Provider initialization failed: {0}")]
    ProviderInitFailed(String),

    // ========================================================================
    // Algorithm Errors (200-299)
    // ========================================================================

    /// Unrecognized HMAC / KDF algorithm selector
    #[error("Unsupported HMAC algorithm selector: {0}")]
    UnsupportedAlgorithm(i32),

    /// Unrecognized cipher direction selector
    #[error("Unsupported cipher mode selector: {0}")]
    UnsupportedCipherMode(i32),

    // ========================================================================
    // Usage Errors (300-399)
    // ========================================================================

    /// A required input buffer was absent
    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    /// A caller buffer is shorter than the operation requires
    #[error("{what} buffer too small: need {required} bytes, got {actual}")]
    BufferTooSmall {
        /// Which buffer
        what: &'static str,
        /// Minimum length in bytes
        required: usize,
        /// Supplied length in bytes
        actual: usize,
    },

    // ========================================================================
    // Backend Errors (400-499)
    // ========================================================================

    /// The underlying primitive reported failure
    #[error("Backend failure during {stage}: {reason}")]
    BackendFailure {
        /// Stage at which the primitive failed
        stage: Stage,
        /// Backend supplied reason
        reason: String,
    },

    /// The OS random source failed
    #[error("Random number generation failed: {0}")]
    RngFailed(String),

    // ========================================================================
    // Internal Errors (900-999)
    // ========================================================================

    /// Produced byte count did not match the expected length
    #[error("Internal consistency failure: expected {expected} bytes, produced {produced}")]
    InternalConsistency {
        /// Bytes the operation had to produce
        expected: usize,
        /// Bytes the backend actually produced
        produced: usize,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Error taxonomy of the provider boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Unrecognized selector passed to HMAC/KDF/cipher
    UnsupportedAlgorithm,
    /// The crypto library reported failure
    BackendFailure,
    /// Byte count mismatch; never retried
    InternalConsistency,
    /// Caller supplied malformed arguments
    Usage,
    /// Provider setup problems
    Configuration,
    /// Errors outside the crypto path
    Internal,
}

impl Error {
    /// Shorthand for a backend failure at `stage`
    pub(crate) fn backend(stage: Stage, reason: impl fmt::Display) -> Self {
        Error::BackendFailure {
            stage,
            reason: reason.to_string(),
        }
    }

    /// Get the numeric error code (diagnostics only)
    ///
    /// Error codes are organized by category:
    /// - 100-199: Configuration
    /// - 200-299: Algorithm
    /// - 300-399: Usage
    /// - 400-499: Backend
    /// - 900-999: Internal
    pub fn code(&self) -> i32 {
        match self {
            // Configuration (100-199)
            Error::NotConfigured => 100,
            Error::UnknownProvider(_) => 101,
            Error::FipsRequired(_) => 102,
            Error::ProviderInitFailed(_) => 103,

            // Algorithm (200-299)
            Error::UnsupportedAlgorithm(_) => 200,
            Error::UnsupportedCipherMode(_) => 201,

            // Usage (300-399)
            Error::MissingInput(_) => 300,
            Error::BufferTooSmall { .. } => 301,

            // Backend (400-499)
            Error::BackendFailure { .. } => 400,
            Error::RngFailed(_) => 401,

            // Internal (900-999)
            Error::InternalConsistency { .. } => 900,
            Error::SerializationError(_) => 901,
        }
    }

    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::NotConfigured
            | Error::UnknownProvider(_)
            | Error::FipsRequired(_)
            | Error::ProviderInitFailed(_) => ErrorCategory::Configuration,
            Error::UnsupportedAlgorithm(_) | Error::UnsupportedCipherMode(_) => {
                ErrorCategory::UnsupportedAlgorithm
            }
            Error::MissingInput(_) | Error::BufferTooSmall { .. } => ErrorCategory::Usage,
            Error::BackendFailure { .. } | Error::RngFailed(_) => ErrorCategory::BackendFailure,
            Error::InternalConsistency { .. } => ErrorCategory::InternalConsistency,
            Error::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    /// Whether this error signals a broken backend contract
    ///
    /// Fatal errors must abort the consumer's operation; retrying them is
    /// meaningless.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::InternalConsistency { .. })
    }

    /// The generic status reported across the descriptor boundary
    pub fn status(&self) -> Status {
        Status::Error
    }
}

// ============================================================================
// STATUS CODES
// ============================================================================

/// Two-valued outcome reported by descriptor slots
///
/// Callers must not infer a failure reason from the code.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    /// Operation succeeded
    Ok = 0,
    /// Operation failed
    Error = 1,
}

impl Status {
    /// Integer code (0 on success, 1 on failure)
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Whether the operation succeeded
    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }
}

impl<T> From<&Result<T>> for Status {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Status::Ok,
            Err(err) => err.status(),
        }
    }
}

// ============================================================================
// ERROR CONVERSIONS
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

// ============================================================================
// TESTS
// ============================================================================
