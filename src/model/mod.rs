//! Data model shared by the catalog and the per-user containers
//!
//! Tracks are owned by the catalog; everything else refers to them by
//! [`TrackId`].

mod playlist;
mod track;
mod user;

pub use playlist::{PlaylistId, PlaylistSummary};
pub use track::{Track, TrackId};
pub use user::{UserId, UserIdError};
