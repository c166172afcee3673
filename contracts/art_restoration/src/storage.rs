//! # Storage
//!
//! In-memory storage backing [`crate::LedgerStore`].
//!
//! ## Layout
//!
//! | Item            | Type                                   | Description                   |
//! |-----------------|----------------------------------------|-------------------------------|
//! | `next_id`       | `AtomicU64`                            | Last allocated project ID     |
//! | `entries`       | `RwLock<HashMap<ProjectId, EntryRef>>` | Project index                 |
//! | `entry.config`  | `ProjectConfig`                        | Immutable configuration       |
//! | `entry.state`   | `ProjectState`                         | Mutable funding state         |
//! | `entry.funders` | `HashMap<Identity, Amount>`            | Contribution per funder       |
//! | `entry.shares`  | `Option<u64>`                          | Share total, unset until mint |
//!
//! ## Locking
//!
//! Everything belonging to one project lives in one [`ProjectEntry`] behind its
//! own mutex, so read-modify-write on a project serializes while different
//! projects proceed in parallel. The index lock is only held long enough to
//! insert an entry or clone an [`EntryRef`]; it is never held while an entry
//! is locked.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::types::{Amount, Identity, ProjectConfig, ProjectId, ProjectState};

/// Shared handle to one project's entry.
pub type EntryRef = Arc<Mutex<ProjectEntry>>;

/// All ledger data for a single project.
#[derive(Debug)]
pub struct ProjectEntry {
    pub config: ProjectConfig,
    pub state: ProjectState,
    funders: HashMap<Identity, Amount>,
    shares: Option<u64>,
}

impl ProjectEntry {
    pub fn new(config: ProjectConfig) -> Self {
        Self {
            config,
            state: ProjectState::new(),
            funders: HashMap::new(),
            shares: None,
        }
    }

    /// Cumulative contribution of `funder`, zero when none is recorded.
    pub fn contribution_of(&self, funder: &Identity) -> Amount {
        self.funders.get(funder).copied().unwrap_or_default()
    }

    /// Store the new cumulative total for `funder`, creating the record on first use.
    pub fn set_contribution(&mut self, funder: &Identity, amount: Amount) {
        self.funders.insert(funder.clone(), amount);
    }

    /// Recorded share total; `None` means no mint has happened yet.
    pub fn shares(&self) -> Option<u64> {
        self.shares
    }

    pub fn set_shares(&mut self, total: u64) {
        self.shares = Some(total);
    }
}

/// Project index plus the sequential ID counter.
#[derive(Debug, Default)]
pub struct ProjectIndex {
    next_id: AtomicU64,
    entries: RwLock<HashMap<ProjectId, EntryRef>>,
}

impl ProjectIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next ID and insert the entry built for it.
    ///
    /// The counter is advanced under the index write lock so `clear` can never
    /// interleave with an allocation.
    pub fn insert_with(&self, build: impl FnOnce(ProjectId) -> ProjectEntry) -> ProjectId {
        let mut entries = self.entries.write();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        entries.insert(id, Arc::new(Mutex::new(build(id))));
        id
    }

    /// Clone the handle for `id` without holding the index lock afterwards.
    pub fn load(&self, id: ProjectId) -> Option<EntryRef> {
        self.entries.read().get(&id).cloned()
    }

    /// Number of IDs handed out so far.
    pub fn allocated(&self) -> u64 {
        self.next_id.load(Ordering::SeqCst)
    }

    /// Drop every entry and rewind the counter so the next ID is 1.
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        entries.clear();
        self.next_id.store(0, Ordering::SeqCst);
    }
}
