//! Reactive "current user" cell.
//!
//! ARCHITECTURE
//! ============
//! A `tokio::sync::watch` channel holds `Option<Profile>`; every subscriber
//! observes each change. The store is an explicit handle passed to whoever
//! needs it, not an ambient global.
//!
//! Navigations are tagged with a monotonically increasing `NavigationId`.
//! Only the most recently started navigation may write; results from a
//! superseded navigation are dropped so a slow stale flow cannot clobber a
//! newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use crate::net::types::Profile;

/// Identifier of one bootstrap run. Later navigations compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NavigationId(u64);

impl NavigationId {
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

struct Inner {
    tx: watch::Sender<Option<Profile>>,
    latest: AtomicU64,
}

/// Cloneable handle to the process-wide session cell. Starts empty.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { inner: Arc::new(Inner { tx, latest: AtomicU64::new(0) }) }
    }

    /// Snapshot of the current value.
    #[must_use]
    pub fn current(&self) -> Option<Profile> {
        self.inner.tx.borrow().clone()
    }

    /// Receiver that is notified on every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Profile>> {
        self.inner.tx.subscribe()
    }

    /// Start a navigation, superseding every earlier one.
    pub fn begin_navigation(&self) -> NavigationId {
        NavigationId(self.inner.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `nav` is still the most recent navigation.
    #[must_use]
    pub fn is_current(&self, nav: NavigationId) -> bool {
        self.inner.latest.load(Ordering::SeqCst) == nav.0
    }

    /// Publish `profile` on behalf of `nav`. Returns `false` and leaves the
    /// cell untouched if `nav` has been superseded.
    pub fn publish(&self, nav: NavigationId, profile: Profile) -> bool {
        self.write_if_current(nav, Some(profile))
    }

    /// Empty the cell on behalf of `nav`, with the same staleness rule as
    /// [`SessionStore::publish`].
    pub fn reset(&self, nav: NavigationId) -> bool {
        self.write_if_current(nav, None)
    }

    /// Empty the cell unconditionally (logout). Every navigation started
    /// before this call is superseded, so none of them can repopulate it.
    pub fn clear(&self) {
        let nav = self.begin_navigation();
        tracing::debug!(navigation = nav.0, "session cleared");
        self.inner.tx.send_if_modified(|state| state.take().is_some());
    }

    fn write_if_current(&self, nav: NavigationId, value: Option<Profile>) -> bool {
        let mut applied = false;
        self.inner.tx.send_if_modified(|state| {
            if !self.is_current(nav) {
                return false;
            }
            applied = true;
            if *state == value {
                return false;
            }
            *state = value;
            true
        });
        if !applied {
            tracing::debug!(navigation = nav.0, "discarding result from superseded navigation");
        }
        applied
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
