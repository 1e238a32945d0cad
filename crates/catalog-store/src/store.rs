//! The record store: a key-value store of `CatalogEntry` keyed by id.
//!
//! `RecordStore` is the seam the orchestrator talks to. It is object safe so
//! callers can hold an `Arc<dyn RecordStore>` and swap in a test double.
//! `CatalogStore` is the in-memory implementation; see `parser` for its
//! JSON file persistence.
//!
//! Every method hands out owned snapshots (`CatalogEntry` clones) rather than
//! references, so no lock is held across an `.await` in async callers.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::types::CatalogEntry;

/// Attribute that `get_all_where` can match on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Id,
    Type,
}

impl EntryField {
    fn matches(self, entry: &CatalogEntry, value: &str) -> bool {
        match self {
            EntryField::Id => entry.id == value,
            EntryField::Type => entry.kind == value,
        }
    }
}

/// Key-value store of catalog entries.
///
/// Concurrent reads and writes to different ids are safe; there is no
/// transaction spanning several calls.
pub trait RecordStore: Send + Sync {
    /// Look up a single entry.
    fn get_by_id(&self, id: &str) -> Result<Option<CatalogEntry>>;

    /// All entries whose `field` equals `value`, ordered by id.
    fn get_all_where(&self, field: EntryField, value: &str) -> Result<Vec<CatalogEntry>>;

    /// Insert a new entry. Fails with `DuplicateId` if the id is taken.
    fn create(&self, entry: CatalogEntry) -> Result<()>;

    /// Mutate an entry in place under the store's lock.
    ///
    /// Returns `false` (and does not call `f`) when the id is absent.
    fn update(&self, id: &str, f: &mut dyn FnMut(&mut CatalogEntry)) -> Result<bool>;

    /// Remove an entry. Returns `false` when the id was absent.
    fn delete_by_id(&self, id: &str) -> Result<bool>;

    /// Return the entry with this id, creating a bare one of `kind` if missing.
    fn fetch_or_create(&self, id: &str, kind: &str) -> Result<CatalogEntry> {
        if let Some(existing) = self.get_by_id(id)? {
            return Ok(existing);
        }
        let entry = CatalogEntry::new(id, kind);
        match self.create(entry.clone()) {
            Ok(()) => Ok(entry),
            // Lost a race with another writer; theirs wins.
            Err(StoreError::DuplicateId(_)) => {
                Ok(self.get_by_id(id)?.unwrap_or(entry))
            }
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    entries: BTreeMap<String, CatalogEntry>,
    /// Ids removed through `delete_by_id`, in deletion order
    deleted: Vec<String>,
}

/// In-memory `RecordStore`.
///
/// A `BTreeMap` keeps `get_all_where` results ordered by id without an extra
/// sort. All access goes through one `RwLock`.
#[derive(Debug, Default)]
pub struct CatalogStore {
    state: RwLock<StoreState>,
}

impl CatalogStore {
    /// Creates a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from entries, rejecting duplicate ids.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Result<Self> {
        let store = Self::new();
        for entry in entries {
            store.create(entry)?;
        }
        Ok(store)
    }

    /// Number of entries currently stored
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every entry, ordered by id.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.state.read().entries.values().cloned().collect()
    }

    /// Ids deleted since the store was created, in deletion order.
    pub fn deleted_ids(&self) -> Vec<String> {
        self.state.read().deleted.clone()
    }
}

impl RecordStore for CatalogStore {
    fn get_by_id(&self, id: &str) -> Result<Option<CatalogEntry>> {
        Ok(self.state.read().entries.get(id).cloned())
    }

    fn get_all_where(&self, field: EntryField, value: &str) -> Result<Vec<CatalogEntry>> {
        let state = self.state.read();
        Ok(state
            .entries
            .values()
            .filter(|entry| field.matches(entry, value))
            .cloned()
            .collect())
    }

    fn create(&self, entry: CatalogEntry) -> Result<()> {
        let mut state = self.state.write();
        if state.entries.contains_key(&entry.id) {
            return Err(StoreError::DuplicateId(entry.id));
        }
        debug!("Creating entry {}", entry.id);
        state.entries.insert(entry.id.clone(), entry);
        Ok(())
    }

    fn update(&self, id: &str, f: &mut dyn FnMut(&mut CatalogEntry)) -> Result<bool> {
        let mut state = self.state.write();
        match state.entries.get_mut(id) {
            Some(entry) => {
                f(entry);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_by_id(&self, id: &str) -> Result<bool> {
        let mut state = self.state.write();
        if state.entries.remove(id).is_some() {
            debug!("Deleted entry {}", id);
            state.deleted.push(id.to_string());
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
