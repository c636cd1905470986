//! Bounded recently-played history, most recent first

use crate::error::StoreError;
use crate::model::TrackId;
use crate::persist::{self, WriteMode};
use std::path::Path;

/// Default number of plays remembered per user
pub const MAX_RECENT: usize = 20;

#[derive(Debug, Clone, Copy)]
struct RecentNode {
    song: TrackId,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Doubly linked play history with explicit front and back
///
/// Nodes live in an arena and are addressed by index; unlinked nodes go on a
/// free list. A track appears at most once: replaying it moves it to the
/// front, and inserting past capacity evicts the back.
#[derive(Debug, Clone)]
pub struct RecencyList {
    nodes: Vec<RecentNode>,
    free: Vec<usize>,
    front: Option<usize>,
    back: Option<usize>,
    len: usize,
    capacity: usize,
}

impl RecencyList {
    pub fn new() -> Self {
        Self::with_capacity(MAX_RECENT)
    }

    /// History remembering at most `capacity` tracks (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            nodes: Vec::with_capacity(capacity + 1),
            free: Vec::new(),
            front: None,
            back: None,
            len: 0,
            capacity,
        }
    }

    /// Record a play of `song`
    ///
    /// Moves an existing entry to the front, or inserts a new one and
    /// evicts the least recently played entry if over capacity.
    pub fn record_play(&mut self, song: TrackId) {
        let idx = match self.find(song) {
            Some(idx) => {
                if self.front == Some(idx) {
                    return;
                }
                self.unlink(idx);
                idx
            }
            None => self.alloc(song),
        };

        self.link_front(idx);

        if self.len > self.capacity {
            if let Some(evicted) = self.pop_back() {
                log::trace!("Evicted track {} from recently played", evicted);
            }
        }
    }

    fn find(&self, song: TrackId) -> Option<usize> {
        let mut current = self.front;
        while let Some(idx) = current {
            if self.nodes[idx].song == song {
                return Some(idx);
            }
            current = self.nodes[idx].next;
        }
        None
    }

    fn alloc(&mut self, song: TrackId) -> usize {
        let node = RecentNode {
            song,
            prev: None,
            next: None,
        };
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// Detach a linked node, leaving it allocated
    fn unlink(&mut self, idx: usize) {
        let RecentNode { prev, next, .. } = self.nodes[idx];
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.front = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.back = prev,
        }
        self.nodes[idx].prev = None;
        self.nodes[idx].next = None;
        self.len -= 1;
    }

    fn link_front(&mut self, idx: usize) {
        self.nodes[idx].prev = None;
        self.nodes[idx].next = self.front;
        match self.front {
            Some(old) => self.nodes[old].prev = Some(idx),
            None => self.back = Some(idx),
        }
        self.front = Some(idx);
        self.len += 1;
    }

    fn pop_back(&mut self) -> Option<TrackId> {
        let idx = self.back?;
        let song = self.nodes[idx].song;
        self.unlink(idx);
        self.free.push(idx);
        Some(song)
    }

    /// Tracks front to back, most recently played first
    pub fn snapshot(&self) -> Vec<TrackId> {
        let mut out = Vec::with_capacity(self.len);
        let mut current = self.front;
        while let Some(idx) = current {
            out.push(self.nodes[idx].song);
            current = self.nodes[idx].next;
        }
        out
    }

    pub fn most_recent(&self) -> Option<TrackId> {
        self.front.map(|idx| self.nodes[idx].song)
    }

    pub fn contains(&self, song: TrackId) -> bool {
        self.find(song).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Load a most-recent-first file
    ///
    /// Lines are replayed from the last to the first so the first line ends
    /// up at the front again.
    pub fn load_from(path: &Path, capacity: usize) -> Result<Self, StoreError> {
        let records = persist::read_records::<TrackId>(path)?;
        let mut recents = Self::with_capacity(capacity);
        for song in records.items.into_iter().rev() {
            recents.record_play(song);
        }
        Ok(recents)
    }

    /// Rewrite the file, most recent first
    pub fn save_to(&self, path: &Path, mode: WriteMode) -> Result<(), StoreError> {
        persist::write_lines(path, self.snapshot(), mode)
    }
}

impl Default for RecencyList {
    fn default() -> Self {
        Self::new()
    }
}
