//! Binary search tree over track titles
//!
//! Built once per session from the catalog, in catalog order, and never
//! rebalanced. Exact lookups descend the tree; partial searches walk it in
//! order and stop once enough matches are collected.

use crate::catalog::Catalog;
use crate::model::{Track, TrackId};
use std::cmp::Ordering;
use std::sync::Arc;

/// How titles are ordered in the tree
///
/// The same ordering is used for inserting and for exact lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleOrdering {
    /// Byte-wise comparison
    #[default]
    CaseSensitive,

    /// Comparison after ASCII lowercasing
    IgnoreCase,
}

impl TitleOrdering {
    fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            TitleOrdering::CaseSensitive => a.cmp(b),
            TitleOrdering::IgnoreCase => a
                .bytes()
                .map(|c| c.to_ascii_lowercase())
                .cmp(b.bytes().map(|c| c.to_ascii_lowercase())),
        }
    }
}

#[derive(Debug, Clone)]
struct TitleNode {
    track: Arc<Track>,
    left: Option<usize>,
    right: Option<usize>,
}

/// Title-keyed search tree of catalog tracks
#[derive(Debug, Clone, Default)]
pub struct TitleIndex {
    nodes: Vec<TitleNode>,
    root: Option<usize>,
    ordering: TitleOrdering,
}

impl TitleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ordering(ordering: TitleOrdering) -> Self {
        Self {
            ordering,
            ..Self::default()
        }
    }

    /// Index every catalog track in load order
    pub fn from_catalog(catalog: &Catalog, ordering: TitleOrdering) -> Self {
        let mut index = Self::with_ordering(ordering);
        for track in catalog.iter() {
            index.insert(Arc::clone(track));
        }
        index
    }

    pub fn ordering(&self) -> TitleOrdering {
        self.ordering
    }

    /// Add a track keyed by its title
    ///
    /// Equal titles go to the right, so among duplicates the earliest
    /// inserted track is found first.
    pub fn insert(&mut self, track: Arc<Track>) {
        let new_idx = self.nodes.len();
        let mut current = match self.root {
            Some(root) => root,
            None => {
                self.nodes.push(TitleNode {
                    track,
                    left: None,
                    right: None,
                });
                self.root = Some(new_idx);
                return;
            }
        };

        loop {
            let goes_left =
                self.ordering.compare(&track.title, &self.nodes[current].track.title) == Ordering::Less;
            let child = if goes_left {
                &mut self.nodes[current].left
            } else {
                &mut self.nodes[current].right
            };
            match *child {
                Some(next) => current = next,
                None => {
                    *child = Some(new_idx);
                    break;
                }
            }
        }

        self.nodes.push(TitleNode {
            track,
            left: None,
            right: None,
        });
    }

    /// Track whose title equals `title` exactly (case-sensitive)
    pub fn find_exact(&self, title: &str) -> Option<&Arc<Track>> {
        let mut current = self.root;
        while let Some(idx) = current {
            let node = &self.nodes[idx];
            match self.ordering.compare(title, &node.track.title) {
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
                Ordering::Equal if node.track.title == title => return Some(&node.track),
                // Same title under case folding but different bytes; later
                // inserts of equal keys live on the right.
                Ordering::Equal => current = node.right,
            }
        }
        None
    }

    /// Up to `max_results` tracks whose title or artist contains `query`,
    /// ignoring case, in title order
    ///
    /// An empty query matches every track.
    pub fn find_partial(&self, query: &str, max_results: usize) -> Vec<&Arc<Track>> {
        let needle = query.to_lowercase();
        let mut results = Vec::new();
        if max_results == 0 {
            return results;
        }

        let mut stack = Vec::new();
        let mut current = self.root;
        loop {
            while let Some(idx) = current {
                stack.push(idx);
                current = self.nodes[idx].left;
            }
            let Some(idx) = stack.pop() else {
                break;
            };

            let track = &self.nodes[idx].track;
            if contains_ignore_case(&track.title, &needle)
                || contains_ignore_case(&track.artist, &needle)
            {
                results.push(track);
                if results.len() >= max_results {
                    break;
                }
            }
            current = self.nodes[idx].right;
        }

        results
    }

    /// Find a track by id with a full traversal
    pub fn find_by_id(&self, id: TrackId) -> Option<&Arc<Track>> {
        let mut stack: Vec<usize> = self.root.into_iter().collect();
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if node.track.id == id {
                return Some(&node.track);
            }
            stack.extend(node.right);
            stack.extend(node.left);
        }
        None
    }

    /// Every track in title order
    pub fn in_order(&self) -> Vec<&Arc<Track>> {
        self.find_partial("", self.len())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(usize, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((idx, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.nodes[idx];
            stack.extend(node.left.map(|l| (l, depth + 1)));
            stack.extend(node.right.map(|r| (r, depth + 1)));
        }
        height
    }
}

fn contains_ignore_case(haystack: &str, lowered_needle: &str) -> bool {
    lowered_needle.is_empty() || haystack.to_lowercase().contains(lowered_needle)
}
