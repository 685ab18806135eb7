//! Shared team-member roster.
//!
//! Refreshes may overlap (an add-members flow refetches while an earlier
//! selection refresh is still in flight). Each refresh takes a
//! [`RefreshTicket`] before it starts; a result is applied only if no later
//! ticket has already been applied, so the roster always reflects the most
//! recently issued refresh that has completed.

use std::sync::atomic::{AtomicU64, Ordering};

use projectdesk_core::roster::TeamMember;
use projectdesk_core::store::{ProjectStore, StoreError};
use tokio::sync::RwLock;

/// Issue order of a roster refresh. Higher is newer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

struct Applied {
    ticket: u64,
    members: Vec<TeamMember>,
}

/// Last-issued-wins roster cache.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared between the draft controller and any selection view.
pub struct RosterCache {
    issued: AtomicU64,
    applied: RwLock<Applied>,
}

impl RosterCache {
    pub fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            applied: RwLock::new(Applied {
                ticket: 0,
                members: Vec::new(),
            }),
        }
    }

    /// Reserve the next refresh slot. Call before starting the fetch.
    pub fn issue(&self) -> RefreshTicket {
        RefreshTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Install `members` if `ticket` is newer than whatever was applied last.
    ///
    /// Returns `false` when the result is stale and was discarded.
    pub async fn apply(&self, ticket: RefreshTicket, members: Vec<TeamMember>) -> bool {
        let mut applied = self.applied.write().await;
        if ticket.0 <= applied.ticket {
            tracing::debug!(
                ticket = ticket.0,
                applied = applied.ticket,
                "Discarding stale roster refresh"
            );
            return false;
        }
        applied.ticket = ticket.0;
        applied.members = members;
        true
    }

    /// Snapshot of the current roster.
    pub async fn members(&self) -> Vec<TeamMember> {
        self.applied.read().await.members.clone()
    }

    /// Whether any refresh has been applied yet.
    pub async fn is_loaded(&self) -> bool {
        self.applied.read().await.ticket > 0
    }

    /// Number of members currently cached.
    pub async fn len(&self) -> usize {
        self.applied.read().await.members.len()
    }
}

impl Default for RosterCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch the roster from `store` and apply it under a fresh ticket.
///
/// Returns whether the fetched roster was installed.
pub async fn refresh(store: &dyn ProjectStore, cache: &RosterCache) -> Result<bool, StoreError> {
    let ticket = cache.issue();
    let members = store.fetch_roster().await?;
    let count = members.len();
    let applied = cache.apply(ticket, members).await;
    if applied {
        tracing::debug!(count, "Roster refreshed");
    }
    Ok(applied)
}
