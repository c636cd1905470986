use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::str::FromStr;

/// Catalog identifier of a track, stable for the catalog's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u32);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TrackId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(TrackId)
    }
}

impl From<u32> for TrackId {
    fn from(id: u32) -> Self {
        TrackId(id)
    }
}

/// Represents a single catalog track with all its metadata
///
/// Immutable once the catalog is loaded; every other component refers to
/// tracks by [`TrackId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique identifier for this track
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Genre
    pub genre: String,

    /// Track duration in seconds
    pub duration_secs: u32,

    /// File path to the audio file
    pub file_path: PathBuf,

    /// Path to the artwork image
    pub image_path: PathBuf,

    /// Day the track was added to the catalog (optional)
    pub date_added: Option<NaiveDate>,
}

impl Track {
    /// Create a track with only the fields the indexes care about
    pub fn new(id: TrackId, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
            genre: String::new(),
            duration_secs: 0,
            file_path: PathBuf::new(),
            image_path: PathBuf::new(),
            date_added: None,
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    pub fn with_duration(mut self, duration_secs: u32) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    pub fn with_paths(mut self, file_path: impl Into<PathBuf>, image_path: impl Into<PathBuf>) -> Self {
        self.file_path = file_path.into();
        self.image_path = image_path.into();
        self
    }

    pub fn with_date_added(mut self, date_added: Option<NaiveDate>) -> Self {
        self.date_added = date_added;
        self
    }

    /// Duration formatted as `m:ss`
    pub fn duration_display(&self) -> String {
        format!("{}:{:02}", self.duration_secs / 60, self.duration_secs % 60)
    }

    /// Single-line listing: `id,title,artist,genre,duration,filePath,imagePath`
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{},{},{},{}",
            self.id,
            self.title,
            self.artist,
            self.genre,
            self.duration_secs,
            self.file_path.display(),
            self.image_path.display()
        )
    }
}
