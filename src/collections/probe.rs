//! Fixed-size open-addressing table with linear probing.
//!
//! Keys hash to `id mod table_size` and collide forward, wrapping at the end
//! of the table. Removal leaves a tombstone so that keys which probed past the
//! removed slot stay reachable; tombstones directly in front of an empty slot
//! are turned back into empty slots since no probe sequence can run through
//! them anymore.

use crate::model::{PlaylistId, TrackId};

/// Key that knows its preferred slot in a table of a given size
pub trait ProbeKey: Copy + Eq {
    fn home_slot(&self, table_size: usize) -> usize;
}

impl ProbeKey for TrackId {
    fn home_slot(&self, table_size: usize) -> usize {
        self.0 as usize % table_size
    }
}

impl ProbeKey for PlaylistId {
    fn home_slot(&self, table_size: usize) -> usize {
        (self.0 % table_size as u64) as usize
    }
}

#[derive(Debug, Clone)]
enum Slot<K, V> {
    Empty,
    Tombstone,
    Occupied(K, V),
}

/// Result of [`ProbeTable::insert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The key was added
    Inserted,
    /// The key was already stored, nothing changed
    Present,
    /// The table holds its maximum number of entries, nothing changed
    Full,
}

impl InsertOutcome {
    pub fn is_inserted(self) -> bool {
        self == InsertOutcome::Inserted
    }
}

enum Probe {
    Found(usize),
    /// First reusable slot on the probe path, if any
    Vacant(Option<usize>),
}

/// Open-addressed table with a fixed number of slots and an entry limit
///
/// The entry limit may be lower than the slot count (playlists cap at 50
/// entries in a 53-slot table). Every probe visits at most one lap of the
/// table, so lookups terminate even when no slot is empty.
#[derive(Debug, Clone)]
pub struct ProbeTable<K, V> {
    slots: Box<[Slot<K, V>]>,
    len: usize,
    max_len: usize,
}

impl<K: ProbeKey, V> ProbeTable<K, V> {
    /// Create a table with `table_size` slots holding at most `max_len` entries
    ///
    /// # Panics
    ///
    /// Panics if `table_size` is zero.
    pub fn new(table_size: usize, max_len: usize) -> Self {
        assert!(table_size > 0, "Probe table needs at least one slot");
        Self {
            slots: (0..table_size).map(|_| Slot::Empty).collect(),
            len: 0,
            max_len: max_len.min(table_size),
        }
    }

    fn probe(&self, key: K) -> Probe {
        let size = self.slots.len();
        let home = key.home_slot(size);
        let mut first_free = None;

        for step in 0..size {
            let idx = (home + step) % size;
            match &self.slots[idx] {
                Slot::Empty => return Probe::Vacant(first_free.or(Some(idx))),
                Slot::Tombstone => {
                    first_free.get_or_insert(idx);
                }
                Slot::Occupied(k, _) if *k == key => return Probe::Found(idx),
                Slot::Occupied(..) => {}
            }
        }

        Probe::Vacant(first_free)
    }

    /// Insert `key` unless it is already present or the table is full
    pub fn insert(&mut self, key: K, value: V) -> InsertOutcome {
        match self.probe(key) {
            Probe::Found(_) => InsertOutcome::Present,
            Probe::Vacant(_) if self.len >= self.max_len => InsertOutcome::Full,
            Probe::Vacant(None) => InsertOutcome::Full,
            Probe::Vacant(Some(idx)) => {
                self.slots[idx] = Slot::Occupied(key, value);
                self.len += 1;
                InsertOutcome::Inserted
            }
        }
    }

    pub fn get(&self, key: K) -> Option<&V> {
        match self.probe(key) {
            Probe::Found(idx) => match &self.slots[idx] {
                Slot::Occupied(_, value) => Some(value),
                _ => None,
            },
            Probe::Vacant(_) => None,
        }
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        match self.probe(key) {
            Probe::Found(idx) => match &mut self.slots[idx] {
                Slot::Occupied(_, value) => Some(value),
                _ => None,
            },
            Probe::Vacant(_) => None,
        }
    }

    pub fn contains(&self, key: K) -> bool {
        matches!(self.probe(key), Probe::Found(_))
    }

    /// Remove `key`, returning its value if it was present
    pub fn remove(&mut self, key: K) -> Option<V> {
        let Probe::Found(idx) = self.probe(key) else {
            return None;
        };

        match std::mem::replace(&mut self.slots[idx], Slot::Tombstone) {
            Slot::Occupied(_, value) => {
                self.len -= 1;
                self.reclaim_tombstones(idx);
                Some(value)
            }
            other => {
                self.slots[idx] = other;
                None
            }
        }
    }

    /// Turn the run of tombstones ending at `idx` back into empty slots if
    /// the slot after it is empty.
    fn reclaim_tombstones(&mut self, idx: usize) {
        let size = self.slots.len();
        if self.len == 0 {
            self.slots.iter_mut().for_each(|slot| *slot = Slot::Empty);
            return;
        }
        if !matches!(self.slots[(idx + 1) % size], Slot::Empty) {
            return;
        }

        let mut current = idx;
        for _ in 0..size {
            if !matches!(self.slots[current], Slot::Tombstone) {
                break;
            }
            self.slots[current] = Slot::Empty;
            current = (current + size - 1) % size;
        }
    }

    /// Entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied(key, value) => Some((*key, value)),
            _ => None,
        })
    }

    /// Keys in slot order
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.max_len
    }

    /// Number of slots
    pub fn table_size(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.len >= self.max_len
    }

    #[cfg(test)]
    fn slot_of(&self, key: K) -> Option<usize> {
        match self.probe(key) {
            Probe::Found(idx) => Some(idx),
            Probe::Vacant(_) => None,
        }
    }

    #[cfg(test)]
    fn tombstones(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Tombstone))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(size: usize) -> ProbeTable<TrackId, ()> {
        ProbeTable::new(size, size)
    }

    #[test]
    fn test_home_slot_is_modulo() {
        assert_eq!(TrackId(205).home_slot(101), 3);
        assert_eq!(PlaylistId(106).home_slot(53), 0);
    }

    #[test]
    fn test_collisions_probe_forward() {
        let mut t = table(7);
        for id in [1, 8, 15] {
            assert_eq!(t.insert(TrackId(id), ()), InsertOutcome::Inserted);
        }
        assert_eq!(t.slot_of(TrackId(1)), Some(1));
        assert_eq!(t.slot_of(TrackId(8)), Some(2));
        assert_eq!(t.slot_of(TrackId(15)), Some(3));
        assert!(!t.contains(TrackId(22)));
    }

    #[test]
    fn test_probe_wraps_around() {
        let mut t = table(7);
        t.insert(TrackId(6), ());
        t.insert(TrackId(13), ());
        assert_eq!(t.slot_of(TrackId(13)), Some(0));
        assert!(t.contains(TrackId(13)));
    }

    #[test]
    fn test_remove_keeps_later_chain_reachable() {
        let mut t = table(7);
        for id in [1, 8, 15] {
            t.insert(TrackId(id), ());
        }

        assert!(t.remove(TrackId(8)).is_some());
        assert!(t.contains(TrackId(15)));
        assert!(!t.contains(TrackId(8)));

        // Re-adding a key stored past the tombstone must not duplicate it
        assert_eq!(t.insert(TrackId(15), ()), InsertOutcome::Present);
        assert_eq!(t.len(), 2);

        // New colliding keys reuse the tombstone
        assert_eq!(t.insert(TrackId(22), ()), InsertOutcome::Inserted);
        assert_eq!(t.slot_of(TrackId(22)), Some(2));
        assert_eq!(t.tombstones(), 0);
    }

    #[test]
    fn test_trailing_tombstones_reclaimed() {
        let mut t = table(7);
        for id in [1, 8, 15] {
            t.insert(TrackId(id), ());
        }
        t.remove(TrackId(8));
        assert_eq!(t.tombstones(), 1);

        // Removing the end of the chain clears both slots
        t.remove(TrackId(15));
        assert_eq!(t.tombstones(), 0);
        assert!(t.contains(TrackId(1)));
    }

    #[test]
    fn test_full_table_rejects_and_terminates() {
        let mut t = table(5);
        for id in 0..5 {
            assert!(t.insert(TrackId(id), ()).is_inserted());
        }
        assert!(t.is_full());
        assert_eq!(t.insert(TrackId(99), ()), InsertOutcome::Full);
        assert!(!t.contains(TrackId(99)));
        assert!(t.remove(TrackId(99)).is_none());
        for id in 0..5 {
            assert!(t.contains(TrackId(id)));
        }
    }

    #[test]
    fn test_max_len_below_table_size() {
        let mut t: ProbeTable<PlaylistId, &str> = ProbeTable::new(5, 2);
        assert!(t.insert(PlaylistId(1), "a").is_inserted());
        assert!(t.insert(PlaylistId(2), "b").is_inserted());
        assert_eq!(t.insert(PlaylistId(3), "c"), InsertOutcome::Full);
        assert_eq!(t.capacity(), 2);
        assert_eq!(t.table_size(), 5);
    }

    #[test]
    fn test_get_mut_and_iter() {
        let mut t: ProbeTable<TrackId, u32> = ProbeTable::new(11, 11);
        t.insert(TrackId(3), 30);
        t.insert(TrackId(1), 10);
        *t.get_mut(TrackId(3)).unwrap() += 1;

        let entries: Vec<_> = t.iter().map(|(k, v)| (k.0, *v)).collect();
        assert_eq!(entries, vec![(1, 10), (3, 31)]);
        assert_eq!(t.get(TrackId(2)), None);
    }

    #[test]
    fn test_tombstone_only_table_still_terminates() {
        let mut t = table(3);
        for id in [0, 1, 2] {
            t.insert(TrackId(id), ());
        }
        t.remove(TrackId(0));
        t.remove(TrackId(1));
        assert!(!t.contains(TrackId(5)));
        assert!(t.insert(TrackId(5), ()).is_inserted());
        assert!(t.contains(TrackId(5)));
        assert!(t.contains(TrackId(2)));
    }
}
