//! Per-user session state
//!
//! A [`UserSession`] owns the loaded user's favorites, playlists and play
//! history. Every mutation that changes a container rewrites that
//! container's file before returning, so dropping a session never loses
//! data. Switching users flushes the current session and loads a fresh one.

mod config;

pub use config::StoreConfig;

use crate::collections::{FavoriteSet, PlaylistTable, RecencyList};
use crate::error::StoreError;
use crate::model::{PlaylistId, TrackId, UserId};
use std::path::PathBuf;

/// Durable state of the currently loaded user
#[derive(Debug)]
pub struct UserSession {
    user: UserId,
    config: StoreConfig,
    favorites: FavoriteSet,
    playlists: PlaylistTable,
    recents: RecencyList,
}

impl UserSession {
    /// Load a user's files; missing files start empty
    pub fn load(config: &StoreConfig, user: UserId) -> Result<Self, StoreError> {
        let favorites = FavoriteSet::load_from(&config.favorites_path(&user))?;
        let playlists = PlaylistTable::load_from(
            &config.playlists_path(&user),
            &config.playlist_songs_path(&user),
        )?;
        let recents = RecencyList::load_from(&config.recents_path(&user), config.recent_capacity)?;

        log::info!(
            "Loaded user {}: {} favorites, {} playlists, {} recently played",
            user,
            favorites.len(),
            playlists.len(),
            recents.len()
        );

        Ok(Self {
            user,
            config: config.clone(),
            favorites,
            playlists,
            recents,
        })
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn playlists(&self) -> &PlaylistTable {
        &self.playlists
    }

    pub fn recents(&self) -> &RecencyList {
        &self.recents
    }

    /// Mark a track as favorite. `Ok(false)` if already marked or full.
    pub fn add_favorite(&mut self, id: TrackId) -> Result<bool, StoreError> {
        let path = self.config.favorites_path(&self.user);
        let mode = self.config.write_mode;
        commit(&mut self.favorites, |f| f.add(id), |f| f.save_to(&path, mode))
    }

    /// Unmark a track. `Ok(false)` if it was not a favorite.
    pub fn remove_favorite(&mut self, id: TrackId) -> Result<bool, StoreError> {
        let path = self.config.favorites_path(&self.user);
        let mode = self.config.write_mode;
        commit(&mut self.favorites, |f| f.remove(id), |f| f.save_to(&path, mode))
    }

    pub fn is_favorite(&self, id: TrackId) -> bool {
        self.favorites.contains(id)
    }

    /// Create an empty playlist. `Ok(false)` if the id is taken or the
    /// playlist limit is reached.
    pub fn create_playlist(
        &mut self,
        id: PlaylistId,
        name: impl Into<String>,
    ) -> Result<bool, StoreError> {
        let name = name.into();
        let (lists, songs) = self.playlist_paths();
        let mode = self.config.write_mode;
        commit(
            &mut self.playlists,
            |p| p.create(id, name),
            |p| p.save_to(&lists, &songs, mode),
        )
    }

    /// Put a track at the front of a playlist. `Ok(false)` for unknown
    /// playlists.
    pub fn add_to_playlist(&mut self, id: PlaylistId, song: TrackId) -> Result<bool, StoreError> {
        let (lists, songs) = self.playlist_paths();
        let mode = self.config.write_mode;
        commit(
            &mut self.playlists,
            |p| p.add_song(id, song),
            |p| p.save_to(&lists, &songs, mode),
        )
    }

    /// Remove the first occurrence of a track from a playlist
    pub fn remove_from_playlist(
        &mut self,
        id: PlaylistId,
        song: TrackId,
    ) -> Result<bool, StoreError> {
        let (lists, songs) = self.playlist_paths();
        let mode = self.config.write_mode;
        commit(
            &mut self.playlists,
            |p| p.remove_song(id, song),
            |p| p.save_to(&lists, &songs, mode),
        )
    }

    /// Record a play and rewrite the history file
    pub fn record_play(&mut self, id: TrackId) -> Result<(), StoreError> {
        let path = self.config.recents_path(&self.user);
        let mode = self.config.write_mode;
        commit(
            &mut self.recents,
            |r| {
                r.record_play(id);
                true
            },
            |r| r.save_to(&path, mode),
        )
        .map(|_| ())
    }

    /// Rewrite every file of this user
    pub fn flush(&self) -> Result<(), StoreError> {
        self.save_favorites()?;
        self.save_playlists()?;
        self.save_recents()
    }

    /// Flush this user and load another one
    pub fn switch_user(self, user: UserId) -> Result<UserSession, StoreError> {
        self.flush()?;
        log::info!("Switching from user {} to {}", self.user, user);
        UserSession::load(&self.config, user)
    }

    fn save_favorites(&self) -> Result<(), StoreError> {
        self.favorites
            .save_to(&self.config.favorites_path(&self.user), self.config.write_mode)
    }

    fn save_playlists(&self) -> Result<(), StoreError> {
        let (lists, songs) = self.playlist_paths();
        self.playlists.save_to(&lists, &songs, self.config.write_mode)
    }

    fn playlist_paths(&self) -> (PathBuf, PathBuf) {
        (
            self.config.playlists_path(&self.user),
            self.config.playlist_songs_path(&self.user),
        )
    }

    fn save_recents(&self) -> Result<(), StoreError> {
        self.recents
            .save_to(&self.config.recents_path(&self.user), self.config.write_mode)
    }
}

/// Apply `change` and save the result
///
/// A change that reports `false` is not saved. If the save fails the
/// container is put back the way it was, so memory never runs ahead of disk
/// and retrying the same call writes again.
fn commit<T: Clone>(
    container: &mut T,
    change: impl FnOnce(&mut T) -> bool,
    save: impl FnOnce(&T) -> Result<(), StoreError>,
) -> Result<bool, StoreError> {
    let before = container.clone();
    if !change(container) {
        return Ok(false);
    }
    if let Err(e) = save(container) {
        *container = before;
        return Err(e);
    }
    Ok(true)
}
