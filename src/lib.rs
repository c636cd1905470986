//! songvault - per-user music library store
//!
//! Keeps favorites, playlists and recently played tracks for one user at a
//! time in flat per-user files, and serves title search and same-artist
//! recommendations over a read-only track catalog.

pub mod catalog;
pub mod collections;
pub mod error;
pub mod library;
pub mod model;
pub mod persist;
pub mod session;

pub use error::StoreError;
pub use library::Library;
pub use session::{StoreConfig, UserSession};
