//! Apply-context token for thread confinement
//!
//! All registry reads/writes, resolver computations, and overlay
//! mutations must happen on one designated logical context. The token is
//! claimed once on that thread; every guarded call checks the current
//! thread against it and fails fast. Off-context calls are a programmer
//! error, not a retryable condition.
//!
//! Background work (store loads, sync pipelines) must hand results back
//! to the apply context before touching any confined structure.

use glossa_core::{Error, Result};
use std::thread::{self, ThreadId};

/// Token identifying the single thread allowed to mutate the store
///
/// Cheap to copy and to check. Holding the token does not grant access —
/// being *on* the owning thread does; the token only records which
/// thread that is.
#[derive(Debug, Clone, Copy)]
pub struct ApplyContext {
    owner: ThreadId,
}

impl ApplyContext {
    /// Claim the current thread as the apply context
    pub fn claim() -> Self {
        ApplyContext {
            owner: thread::current().id(),
        }
    }

    /// Whether the caller is on the apply context
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Fail fast unless the caller is on the apply context
    ///
    /// # Errors
    ///
    /// [`Error::WrongContext`] naming both threads. Never retried.
    pub fn ensure(&self) -> Result<()> {
        let current = thread::current().id();
        if current == self.owner {
            Ok(())
        } else {
            Err(Error::WrongContext {
                expected: format!("{:?}", self.owner),
                actual: format!("{:?}", current),
            })
        }
    }
}
