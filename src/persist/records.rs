//! Two-field line records used by the playlist files

use crate::model::{PlaylistId, TrackId};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseRecordError {
    #[error("missing ',' separator")]
    MissingSeparator,

    #[error("invalid playlist id {0:?}")]
    PlaylistId(String),

    #[error("invalid track id {0:?}")]
    TrackId(String),
}

/// `<playlistId>,<name>`; the name is the rest of the line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRecord {
    pub id: PlaylistId,
    pub name: String,
}

impl fmt::Display for PlaylistRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.id, self.name)
    }
}

impl FromStr for PlaylistRecord {
    type Err = ParseRecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (id, name) = line
            .split_once(',')
            .ok_or(ParseRecordError::MissingSeparator)?;
        let id = id
            .parse::<PlaylistId>()
            .map_err(|_| ParseRecordError::PlaylistId(id.to_string()))?;
        Ok(Self {
            id,
            name: name.to_string(),
        })
    }
}

/// `<playlistId>,<songId>`, one line per membership edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MembershipRecord {
    pub playlist: PlaylistId,
    pub song: TrackId,
}

impl fmt::Display for MembershipRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.playlist, self.song)
    }
}

impl FromStr for MembershipRecord {
    type Err = ParseRecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (playlist, song) = line
            .split_once(',')
            .ok_or(ParseRecordError::MissingSeparator)?;
        let playlist = playlist
            .parse::<PlaylistId>()
            .map_err(|_| ParseRecordError::PlaylistId(playlist.to_string()))?;
        let song = song
            .parse::<TrackId>()
            .map_err(|_| ParseRecordError::TrackId(song.to_string()))?;
        Ok(Self { playlist, song })
    }
}
