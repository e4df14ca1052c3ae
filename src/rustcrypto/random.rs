//! OS CSPRNG access.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{Error, Result};

/// Fill `buffer` with random bytes from the operating system
pub(crate) fn fill(buffer: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(buffer)
        .map_err(|e| Error::RngFailed(e.to_string()))
}

/// Accept external entropy
///
/// The OS generator cannot be seeded from user space, so the entropy is
/// ignored.
pub(crate) fn add_entropy(entropy: &[u8]) -> Result<()> {
    tracing::trace!(len = entropy.len(), "ignoring external entropy");
    Ok(())
}
