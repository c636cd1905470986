//! In-memory containers behind each library feature
//!
//! The favorites set and the playlist table share the open-addressing
//! table in [`probe`]. Recency and title index nodes, as well as playlist
//! membership nodes, live in index-addressed arenas.

mod favorites;
mod graph;
mod playlists;
pub mod probe;
mod recency;
mod title_index;

pub use favorites::{FavoriteSet, FAVORITES_TABLE_SIZE};
pub use graph::{RecommendationGraph, MAX_GRAPH_NODES, MAX_NEIGHBORS};
pub use playlists::{PlaylistTable, MAX_PLAYLISTS, PLAYLIST_TABLE_SIZE};
pub use probe::{InsertOutcome, ProbeKey, ProbeTable};
pub use recency::{RecencyList, MAX_RECENT};
pub use title_index::{TitleIndex, TitleOrdering};
