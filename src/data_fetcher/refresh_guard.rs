//! Stale-load guard for superseded fetches
//!
//! A page load can be superseded while its fetches are still in flight
//! (the user re-triggers a refresh, the consuming view is torn down).
//! The network call is not aborted; instead each load takes a token and
//! results are applied only while the token is still the current one.

use std::sync::atomic::{AtomicU64, Ordering};

/// Token handed out for one load; compared against the guard's current
/// generation when the results come back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken(u64);

#[derive(Debug, Default)]
pub struct RefreshGuard {
    generation: AtomicU64,
}

impl RefreshGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new load, invalidating the tokens of every earlier one.
    pub fn begin(&self) -> LoadToken {
        LoadToken(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether results carrying this token may still be applied.
    pub fn is_current(&self, token: &LoadToken) -> bool {
        self.generation.load(Ordering::SeqCst) == token.0
    }
}
