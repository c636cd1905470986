//! Catalog plus the indexes built from it

use crate::catalog::{self, Catalog};
use crate::collections::{RecommendationGraph, TitleIndex, TitleOrdering};
use crate::model::{Track, TrackId};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

/// Read-only music library shared by every user session
///
/// Holds the catalog, the title search tree and the same-artist graph.
/// Both indexes are rebuilt whenever a library is constructed.
#[derive(Debug, Clone)]
pub struct Library {
    catalog: Catalog,
    titles: TitleIndex,
    graph: RecommendationGraph,
}

impl Library {
    /// Build the indexes over `catalog`
    pub fn new(catalog: Catalog) -> Self {
        Self::with_title_ordering(catalog, TitleOrdering::default())
    }

    pub fn with_title_ordering(catalog: Catalog, ordering: TitleOrdering) -> Self {
        let titles = TitleIndex::from_catalog(&catalog, ordering);
        let graph = RecommendationGraph::from_catalog(&catalog);
        Self {
            catalog,
            titles,
            graph,
        }
    }

    /// Load the songs file and build the indexes
    pub fn load(songs_path: &Path, ordering: TitleOrdering) -> Result<Self> {
        let catalog = catalog::load_catalog(songs_path)?;
        Ok(Self::with_title_ordering(catalog, ordering))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn titles(&self) -> &TitleIndex {
        &self.titles
    }

    pub fn graph(&self) -> &RecommendationGraph {
        &self.graph
    }

    /// Get a track by id
    pub fn track(&self, id: TrackId) -> Option<&Arc<Track>> {
        self.catalog.get_by_id(id)
    }

    /// Track with exactly this title
    pub fn find_title(&self, title: &str) -> Option<&Arc<Track>> {
        self.titles.find_exact(title)
    }

    /// Tracks whose title or artist contains `query`, in title order
    pub fn search(&self, query: &str, max_results: usize) -> Vec<&Arc<Track>> {
        self.titles.find_partial(query, max_results)
    }

    /// Tracks by the same artist network as `seed`, nearest first
    pub fn recommend_tracks(&self, seed: TrackId) -> Vec<&Arc<Track>> {
        let ids = self.graph.recommend(seed);
        self.resolve(&ids)
    }

    /// Resolve stored ids to tracks, skipping ids the catalog does not know
    pub fn resolve(&self, ids: &[TrackId]) -> Vec<&Arc<Track>> {
        self.catalog.resolve(ids).collect()
    }

    /// Total number of tracks
    pub fn track_count(&self) -> usize {
        self.catalog.len()
    }
}
