//! Store configuration

use crate::collections::MAX_RECENT;
use crate::model::UserId;
use crate::persist::WriteMode;
use std::path::{Path, PathBuf};

/// Where and how per-user files are stored
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding every user's files
    pub data_dir: PathBuf,

    /// How files are replaced on save
    pub write_mode: WriteMode,

    /// Number of plays remembered per user
    pub recent_capacity: usize,
}

impl StoreConfig {
    /// Create a configuration rooted at `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            write_mode: WriteMode::Truncate,
            recent_capacity: MAX_RECENT,
        }
    }

    /// Set how files are replaced on save
    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    /// Set the recently-played capacity
    pub fn with_recent_capacity(mut self, capacity: usize) -> Self {
        self.recent_capacity = capacity;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// `favorites_<user>.csv`
    pub fn favorites_path(&self, user: &UserId) -> PathBuf {
        self.user_file("favorites", user)
    }

    /// `playlists_<user>.csv`
    pub fn playlists_path(&self, user: &UserId) -> PathBuf {
        self.user_file("playlists", user)
    }

    /// `playlist_songs_<user>.csv`
    pub fn playlist_songs_path(&self, user: &UserId) -> PathBuf {
        self.user_file("playlist_songs", user)
    }

    /// `recently_played_<user>.csv`
    pub fn recents_path(&self, user: &UserId) -> PathBuf {
        self.user_file("recently_played", user)
    }

    fn user_file(&self, kind: &str, user: &UserId) -> PathBuf {
        self.data_dir.join(format!("{}_{}.csv", kind, user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_file_names() {
        let config = StoreConfig::new("/data");
        let user = UserId::new("alice").unwrap();
        assert_eq!(config.favorites_path(&user), PathBuf::from("/data/favorites_alice.csv"));
        assert_eq!(config.playlists_path(&user), PathBuf::from("/data/playlists_alice.csv"));
        assert_eq!(
            config.playlist_songs_path(&user),
            PathBuf::from("/data/playlist_songs_alice.csv")
        );
        assert_eq!(
            config.recents_path(&user),
            PathBuf::from("/data/recently_played_alice.csv")
        );
    }

    #[test]
    fn test_builder() {
        let config = StoreConfig::new("d")
            .with_write_mode(WriteMode::Atomic)
            .with_recent_capacity(5);
        assert_eq!(config.write_mode, WriteMode::Atomic);
        assert_eq!(config.recent_capacity, 5);
        assert_eq!(StoreConfig::new("d").recent_capacity, MAX_RECENT);
    }
}
