//! Per-user playlists keyed by playlist id

use super::probe::{InsertOutcome, ProbeTable};
use crate::error::StoreError;
use crate::model::{PlaylistId, PlaylistSummary, TrackId};
use crate::persist::{self, MembershipRecord, PlaylistRecord, WriteMode};
use std::path::Path;

/// Slot count of the playlist table (prime)
pub const PLAYLIST_TABLE_SIZE: usize = 53;

/// Maximum number of playlists per user
pub const MAX_PLAYLISTS: usize = 50;

#[derive(Debug, Clone, Copy)]
struct SongNode {
    song: TrackId,
    next: Option<usize>,
}

/// Singly linked list of track ids stored in an index arena
///
/// Newest entries sit at the head. Freed nodes are recycled.
#[derive(Debug, Clone, Default)]
struct SongList {
    nodes: Vec<SongNode>,
    free: Vec<usize>,
    head: Option<usize>,
    len: usize,
}

impl SongList {
    fn push_front(&mut self, song: TrackId) {
        let node = SongNode {
            song,
            next: self.head,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };
        self.head = Some(idx);
        self.len += 1;
    }

    /// Unlink the first node holding `song`
    fn remove_first(&mut self, song: TrackId) -> bool {
        let mut prev: Option<usize> = None;
        let mut current = self.head;

        while let Some(idx) = current {
            let node = self.nodes[idx];
            if node.song == song {
                match prev {
                    Some(p) => self.nodes[p].next = node.next,
                    None => self.head = node.next,
                }
                self.free.push(idx);
                self.len -= 1;
                return true;
            }
            prev = current;
            current = node.next;
        }
        false
    }

    fn iter(&self) -> SongIter<'_> {
        SongIter {
            list: self,
            current: self.head,
        }
    }
}

struct SongIter<'a> {
    list: &'a SongList,
    current: Option<usize>,
}

impl Iterator for SongIter<'_> {
    type Item = TrackId;

    fn next(&mut self) -> Option<TrackId> {
        let node = self.list.nodes[self.current?];
        self.current = node.next;
        Some(node.song)
    }
}

#[derive(Debug, Clone)]
struct Playlist {
    name: String,
    songs: SongList,
}

/// Playlists of one user
///
/// Open-addressed over [`PLAYLIST_TABLE_SIZE`] slots with at most
/// [`MAX_PLAYLISTS`] entries. Playlists are never deleted, so creation order
/// is kept alongside the table for listing and saving.
#[derive(Debug, Clone)]
pub struct PlaylistTable {
    table: ProbeTable<PlaylistId, Playlist>,
    order: Vec<PlaylistId>,
}

impl PlaylistTable {
    pub fn new() -> Self {
        Self {
            table: ProbeTable::new(PLAYLIST_TABLE_SIZE, MAX_PLAYLISTS),
            order: Vec::new(),
        }
    }

    /// Register an empty playlist
    ///
    /// Returns `false` if the id is taken or the user already has
    /// [`MAX_PLAYLISTS`] playlists.
    pub fn create(&mut self, id: PlaylistId, name: impl Into<String>) -> bool {
        let playlist = Playlist {
            name: name.into(),
            songs: SongList::default(),
        };
        match self.table.insert(id, playlist) {
            InsertOutcome::Inserted => {
                self.order.push(id);
                true
            }
            InsertOutcome::Present => {
                log::debug!("Playlist {} already exists", id);
                false
            }
            InsertOutcome::Full => {
                log::debug!("Playlist limit of {} reached, rejecting {}", MAX_PLAYLISTS, id);
                false
            }
        }
    }

    /// Put a track at the front of a playlist
    ///
    /// The same track may appear several times. Returns `false` if the
    /// playlist does not exist.
    pub fn add_song(&mut self, playlist: PlaylistId, song: TrackId) -> bool {
        match self.table.get_mut(playlist) {
            Some(p) => {
                p.songs.push_front(song);
                true
            }
            None => false,
        }
    }

    /// Remove the first (most recently added) occurrence of a track
    pub fn remove_song(&mut self, playlist: PlaylistId, song: TrackId) -> bool {
        self.table
            .get_mut(playlist)
            .is_some_and(|p| p.songs.remove_first(song))
    }

    /// All playlists in creation order
    pub fn list(&self) -> Vec<PlaylistSummary> {
        self.order
            .iter()
            .filter_map(|&id| {
                self.table
                    .get(id)
                    .map(|p| PlaylistSummary::new(id, p.name.clone()))
            })
            .collect()
    }

    /// Tracks of a playlist front to back (newest first), `None` if unknown
    pub fn songs_of(&self, playlist: PlaylistId) -> Option<Vec<TrackId>> {
        self.table.get(playlist).map(|p| p.songs.iter().collect())
    }

    pub fn name_of(&self, playlist: PlaylistId) -> Option<&str> {
        self.table.get(playlist).map(|p| p.name.as_str())
    }

    pub fn contains(&self, playlist: PlaylistId) -> bool {
        self.table.contains(playlist)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.table.is_full()
    }

    fn playlist_records(&self) -> Vec<PlaylistRecord> {
        self.list()
            .into_iter()
            .map(|s| PlaylistRecord {
                id: s.id,
                name: s.name,
            })
            .collect()
    }

    /// Membership edges, oldest first within each playlist
    ///
    /// Replaying these through [`add_song`](Self::add_song) in order puts
    /// every playlist back in its current front-to-back order.
    fn membership_records(&self) -> Vec<MembershipRecord> {
        let mut records = Vec::new();
        for &id in &self.order {
            if let Some(p) = self.table.get(id) {
                let mut songs: Vec<TrackId> = p.songs.iter().collect();
                songs.reverse();
                records.extend(songs.into_iter().map(|song| MembershipRecord { playlist: id, song }));
            }
        }
        records
    }

    /// Load from the playlist file and the membership file
    ///
    /// Creates are replayed first, then memberships, both in file order.
    /// Memberships naming an unknown playlist are dropped.
    pub fn load_from(playlists_path: &Path, songs_path: &Path) -> Result<Self, StoreError> {
        let mut table = Self::new();

        for record in persist::read_records::<PlaylistRecord>(playlists_path)?.items {
            table.create(record.id, record.name);
        }

        for record in persist::read_records::<MembershipRecord>(songs_path)?.items {
            if !table.add_song(record.playlist, record.song) {
                log::warn!(
                    "Dropping track {} for unknown playlist {} in {:?}",
                    record.song,
                    record.playlist,
                    songs_path
                );
            }
        }

        Ok(table)
    }

    /// Rewrite both files in full
    pub fn save_to(
        &self,
        playlists_path: &Path,
        songs_path: &Path,
        mode: WriteMode,
    ) -> Result<(), StoreError> {
        persist::write_lines(playlists_path, self.playlist_records(), mode)?;
        persist::write_lines(songs_path, self.membership_records(), mode)
    }
}

impl Default for PlaylistTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn ids(raw: &[u32]) -> Vec<TrackId> {
        raw.iter().copied().map(TrackId).collect()
    }

    #[test]
    fn test_add_prepends_and_remove_deletes() {
        let mut table = PlaylistTable::new();
        assert!(table.create(PlaylistId(5), "Chill"));
        assert!(table.add_song(PlaylistId(5), TrackId(10)));
        assert!(table.add_song(PlaylistId(5), TrackId(20)));
        assert_eq!(table.songs_of(PlaylistId(5)), Some(ids(&[20, 10])));

        assert!(table.remove_song(PlaylistId(5), TrackId(10)));
        assert_eq!(table.songs_of(PlaylistId(5)), Some(ids(&[20])));
    }

    #[test]
    fn test_remove_first_occurrence_only() {
        let mut table = PlaylistTable::new();
        table.create(PlaylistId(1), "Loop");
        for song in [1, 2, 1, 3] {
            table.add_song(PlaylistId(1), TrackId(song));
        }
        assert_eq!(table.songs_of(PlaylistId(1)), Some(ids(&[3, 1, 2, 1])));

        assert!(table.remove_song(PlaylistId(1), TrackId(1)));
        assert_eq!(table.songs_of(PlaylistId(1)), Some(ids(&[3, 2, 1])));
        assert!(!table.remove_song(PlaylistId(1), TrackId(9)));

        // Recycled node slots keep the list intact
        table.add_song(PlaylistId(1), TrackId(4));
        assert_eq!(table.songs_of(PlaylistId(1)), Some(ids(&[4, 3, 2, 1])));
    }

    #[test]
    fn test_unknown_playlist() {
        let mut table = PlaylistTable::new();
        assert!(!table.add_song(PlaylistId(9), TrackId(1)));
        assert!(!table.remove_song(PlaylistId(9), TrackId(1)));
        assert_eq!(table.songs_of(PlaylistId(9)), None);
        assert_eq!(table.name_of(PlaylistId(9)), None);
    }

    #[test]
    fn test_duplicate_create_keeps_original() {
        let mut table = PlaylistTable::new();
        assert!(table.create(PlaylistId(3), "First"));
        table.add_song(PlaylistId(3), TrackId(1));
        assert!(!table.create(PlaylistId(3), "Second"));
        assert_eq!(table.name_of(PlaylistId(3)), Some("First"));
        assert_eq!(table.songs_of(PlaylistId(3)), Some(ids(&[1])));
    }

    #[test]
    fn test_playlist_limit() {
        let mut table = PlaylistTable::new();
        for id in 0..MAX_PLAYLISTS as u64 {
            // Multiples of the table size all collide on slot 0
            assert!(table.create(PlaylistId(id * PLAYLIST_TABLE_SIZE as u64), format!("P{id}")));
        }
        assert!(table.is_full());
        assert!(!table.create(PlaylistId(1), "Overflow"));
        assert_eq!(table.len(), MAX_PLAYLISTS);
        assert!(table.contains(PlaylistId(49 * PLAYLIST_TABLE_SIZE as u64)));
    }

    #[test]
    fn test_list_in_creation_order() {
        let mut table = PlaylistTable::new();
        table.create(PlaylistId(105), "B");
        table.create(PlaylistId(52), "A");
        table.create(PlaylistId(0), "C");
        let names: Vec<_> = table.list().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_save_layout() {
        let dir = TempDir::new().unwrap();
        let meta = dir.path().join("playlists_u.csv");
        let songs = dir.path().join("playlist_songs_u.csv");

        let mut table = PlaylistTable::new();
        table.create(PlaylistId(5), "Chill, Vol. 2");
        table.add_song(PlaylistId(5), TrackId(10));
        table.add_song(PlaylistId(5), TrackId(20));
        table.save_to(&meta, &songs, WriteMode::Truncate).unwrap();

        assert_eq!(fs::read_to_string(&meta).unwrap(), "5,Chill, Vol. 2\n");
        assert_eq!(fs::read_to_string(&songs).unwrap(), "5,10\n5,20\n");
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let meta = dir.path().join("playlists_u.csv");
        let songs = dir.path().join("playlist_songs_u.csv");

        let mut table = PlaylistTable::new();
        table.create(PlaylistId(52), "Late");
        table.create(PlaylistId(105), "Wrapped");
        table.create(PlaylistId(7), "Empty");
        for song in [1, 2, 3, 2] {
            table.add_song(PlaylistId(52), TrackId(song));
        }
        table.add_song(PlaylistId(105), TrackId(9));
        table.remove_song(PlaylistId(52), TrackId(2));
        table.save_to(&meta, &songs, WriteMode::Atomic).unwrap();

        let reloaded = PlaylistTable::load_from(&meta, &songs).unwrap();
        assert_eq!(reloaded.list(), table.list());
        for summary in table.list() {
            assert_eq!(reloaded.songs_of(summary.id), table.songs_of(summary.id));
        }
    }

    #[test]
    fn test_load_drops_orphans_and_bad_lines() {
        let dir = TempDir::new().unwrap();
        let meta = dir.path().join("playlists_u.csv");
        let songs = dir.path().join("playlist_songs_u.csv");
        fs::write(&meta, "1,Road Trip\nnot a record\n").unwrap();
        fs::write(&songs, "1,4\n2,5\n1,x\n1,6\n").unwrap();

        let table = PlaylistTable::load_from(&meta, &songs).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.songs_of(PlaylistId(1)), Some(ids(&[6, 4])));
    }
}
