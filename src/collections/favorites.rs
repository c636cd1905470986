//! Per-user favorite tracks

use super::probe::{InsertOutcome, ProbeTable};
use crate::error::StoreError;
use crate::model::TrackId;
use crate::persist::{self, WriteMode};
use std::path::Path;

/// Slot count of the favorites table (prime)
pub const FAVORITES_TABLE_SIZE: usize = 101;

/// Set of favorite track ids, one per user
///
/// Linear-probing hash set over [`FAVORITES_TABLE_SIZE`] slots. Once every
/// slot is taken further adds are rejected.
#[derive(Debug, Clone)]
pub struct FavoriteSet {
    table: ProbeTable<TrackId, ()>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self {
            table: ProbeTable::new(FAVORITES_TABLE_SIZE, FAVORITES_TABLE_SIZE),
        }
    }

    /// Mark a track as favorite
    ///
    /// Returns `true` if the set changed; adding an id twice or adding to a
    /// full set returns `false`.
    pub fn add(&mut self, id: TrackId) -> bool {
        match self.table.insert(id, ()) {
            InsertOutcome::Inserted => true,
            InsertOutcome::Present => false,
            InsertOutcome::Full => {
                log::debug!(
                    "Favorites full ({} entries), rejecting track {}",
                    self.table.capacity(),
                    id
                );
                false
            }
        }
    }

    /// Unmark a track. Returns `true` if it was a favorite.
    pub fn remove(&mut self, id: TrackId) -> bool {
        self.table.remove(id).is_some()
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.table.contains(id)
    }

    /// Stored ids, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = TrackId> + '_ {
        self.table.keys()
    }

    pub fn to_vec(&self) -> Vec<TrackId> {
        self.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Load from a one-id-per-line file
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        let records = persist::read_records::<TrackId>(path)?;
        let mut favorites = Self::new();
        for id in records.items {
            favorites.add(id);
        }
        Ok(favorites)
    }

    /// Rewrite the whole file, one id per line in ascending order
    pub fn save_to(&self, path: &Path, mode: WriteMode) -> Result<(), StoreError> {
        let mut ids = self.to_vec();
        ids.sort_unstable();
        persist::write_lines(path, ids, mode)
    }
}

impl Default for FavoriteSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<TrackId> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = TrackId>>(iter: I) -> Self {
        let mut favorites = Self::new();
        for id in iter {
            favorites.add(id);
        }
        favorites
    }
}
