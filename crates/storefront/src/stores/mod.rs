//! Client-side state stores with backend synchronization.
//!
//! Both stores follow the same dual-state pattern: mutations apply
//! optimistically to local state, and for authenticated sessions are
//! mirrored to the backend, whose response replaces the local list
//! wholesale (last-confirmed-wins). Anonymous sessions are local-only and
//! persisted to disk on every change.
//!
//! # Sync state machine
//!
//! ```text
//! Local ──mutation (authed)──▶ Syncing ──ok──▶ Synced
//!                                 │
//!                                 └──err──▶ Error (local state intact)
//! ```
//!
//! Responses are sequenced: each issued request gets a monotonically
//! increasing number, and a response is applied only if no newer request
//! has been issued since. A slow response from a superseded request is
//! discarded instead of clobbering fresher state. With today's `&mut
//! self` mutations each request completes before the next is issued; the
//! sequencing exists for drivers that adopt backend snapshots out of
//! band (`replace_from_backend`) or pipeline requests concurrently.

pub mod cart;
pub mod wishlist;

pub use cart::CartStore;
pub use wishlist::WishlistStore;

/// Where a store stands relative to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncState {
    /// Never synced; local state only (anonymous sessions stay here).
    #[default]
    Local,
    /// A mirror request is in flight.
    Syncing,
    /// Local state matches the last confirmed backend response.
    Synced,
    /// The last mirror request failed; local optimistic state was kept.
    Error(String),
}

impl SyncState {
    /// The error message, if the last sync failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Sequences sync requests so stale responses can be recognized.
#[derive(Debug, Default)]
pub struct SyncTracker {
    issued: u64,
}

impl SyncTracker {
    /// Register a new in-flight request and return its sequence number.
    pub fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Whether a response for `seq` is still the latest word.
    ///
    /// False means a newer request was issued after `seq`; the response
    /// must be discarded.
    #[must_use]
    pub const fn is_current(&self, seq: u64) -> bool {
        seq == self.issued
    }
}
