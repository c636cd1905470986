//! Read-only track catalog
//!
//! The catalog is loaded once from the songs file and never changes
//! afterwards. It supplies tracks by load position and by identifier.

mod loader;

pub use loader::{load_catalog, parse_catalog_line};

use crate::model::{Track, TrackId};
use std::collections::HashMap;
use std::sync::Arc;

/// Maximum number of tracks a catalog will hold
pub const MAX_TRACKS: usize = 1000;

/// Ordered, fixed-capacity collection of tracks
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Tracks in load order
    tracks: Vec<Arc<Track>>,

    /// Track id to load position
    positions: HashMap<TrackId, usize>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from tracks in order, dropping duplicates and overflow
    pub fn from_tracks(tracks: impl IntoIterator<Item = Track>) -> Self {
        let mut catalog = Self::new();
        for track in tracks {
            catalog.push(track);
        }
        catalog
    }

    /// Append a track
    ///
    /// Returns `false` when the id is already present or the catalog is full.
    pub fn push(&mut self, track: Track) -> bool {
        if self.tracks.len() >= MAX_TRACKS {
            log::debug!("Catalog full, rejecting track {}", track.id);
            return false;
        }
        if self.positions.contains_key(&track.id) {
            log::debug!("Duplicate track id {} in catalog, ignoring", track.id);
            return false;
        }
        self.positions.insert(track.id, self.tracks.len());
        self.tracks.push(Arc::new(track));
        true
    }

    /// Get a track by load position
    pub fn get(&self, position: usize) -> Option<&Arc<Track>> {
        self.tracks.get(position)
    }

    /// Get a track by id
    pub fn get_by_id(&self, id: TrackId) -> Option<&Arc<Track>> {
        self.positions.get(&id).map(|&pos| &self.tracks[pos])
    }

    /// Whether a track with this id exists
    pub fn contains(&self, id: TrackId) -> bool {
        self.positions.contains_key(&id)
    }

    /// All tracks in load order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Track>> {
        self.tracks.iter()
    }

    /// Resolve ids to tracks, silently dropping ids the catalog does not know
    pub fn resolve<'a, 'b>(
        &'a self,
        ids: &'b [TrackId],
    ) -> impl Iterator<Item = &'a Arc<Track>> + 'b
    where
        'a: 'b,
    {
        ids.iter().filter_map(move |id| self.get_by_id(*id))
    }

    /// Total number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
