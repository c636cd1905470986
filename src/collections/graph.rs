//! Same-artist recommendation graph

use crate::catalog::Catalog;
use crate::model::TrackId;
use std::collections::{HashMap, VecDeque};

/// Maximum number of vertices
pub const MAX_GRAPH_NODES: usize = 1000;

/// Maximum number of neighbors stored per vertex
pub const MAX_NEIGHBORS: usize = 10;

#[derive(Debug, Clone)]
struct GraphNode {
    id: TrackId,
    neighbors: Vec<usize>,
}

/// Undirected adjacency-list graph over track ids
///
/// Each vertex keeps at most [`MAX_NEIGHBORS`] neighbors; edges past that
/// are dropped on the full side only. Neighbor lists keep insertion order,
/// which fixes the order [`recommend`](Self::recommend) returns.
#[derive(Debug, Clone, Default)]
pub struct RecommendationGraph {
    nodes: Vec<GraphNode>,
    index: HashMap<TrackId, usize>,
}

impl RecommendationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link every pair of catalog tracks by the same artist
    ///
    /// Pairs are visited in catalog order, so the first tracks of a prolific
    /// artist use up each other's neighbor slots.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut graph = Self::new();
        for track in catalog.iter() {
            graph.add_node(track.id);
        }

        let tracks: Vec<_> = catalog.iter().collect();
        let mut edges = 0usize;
        for (i, a) in tracks.iter().enumerate() {
            for b in &tracks[i + 1..] {
                if a.artist == b.artist && graph.add_edge(a.id, b.id) {
                    edges += 1;
                }
            }
        }

        log::info!(
            "Built recommendation graph: {} nodes, {} edges",
            graph.node_count(),
            edges
        );
        graph
    }

    /// Register a vertex. Returns `false` for duplicates or when full.
    pub fn add_node(&mut self, id: TrackId) -> bool {
        if self.index.contains_key(&id) {
            return false;
        }
        if self.nodes.len() >= MAX_GRAPH_NODES {
            log::debug!("Graph full, rejecting node {}", id);
            return false;
        }
        self.index.insert(id, self.nodes.len());
        self.nodes.push(GraphNode {
            id,
            neighbors: Vec::new(),
        });
        true
    }

    /// Link two registered vertices in both directions
    ///
    /// Returns `true` if at least one side recorded the edge. Unknown
    /// endpoints and self-edges are rejected.
    pub fn add_edge(&mut self, a: TrackId, b: TrackId) -> bool {
        let (Some(&ia), Some(&ib)) = (self.index.get(&a), self.index.get(&b)) else {
            return false;
        };
        if ia == ib {
            return false;
        }

        let forward = self.link(ia, ib);
        let backward = self.link(ib, ia);
        forward || backward
    }

    fn link(&mut self, from: usize, to: usize) -> bool {
        let node = &mut self.nodes[from];
        if node.neighbors.contains(&to) {
            return false;
        }
        if node.neighbors.len() >= MAX_NEIGHBORS {
            log::trace!("Neighbor cap reached for {}", node.id);
            return false;
        }
        node.neighbors.push(to);
        true
    }

    /// Every track reachable from `seed`, in breadth-first discovery order
    ///
    /// The seed itself is excluded. An unknown seed yields nothing.
    pub fn recommend(&self, seed: TrackId) -> Vec<TrackId> {
        let Some(&start) = self.index.get(&seed) else {
            return Vec::new();
        };

        let mut visited = vec![false; self.nodes.len()];
        let mut frontier = VecDeque::new();
        let mut found = Vec::new();

        visited[start] = true;
        frontier.push_back(start);

        while let Some(current) = frontier.pop_front() {
            for &next in &self.nodes[current].neighbors {
                if !visited[next] {
                    visited[next] = true;
                    found.push(self.nodes[next].id);
                    frontier.push_back(next);
                }
            }
        }

        found
    }

    /// Direct neighbors in insertion order, `None` for unknown ids
    pub fn neighbors(&self, id: TrackId) -> Option<Vec<TrackId>> {
        self.index.get(&id).map(|&idx| {
            self.nodes[idx]
                .neighbors
                .iter()
                .map(|&n| self.nodes[n].id)
                .collect()
        })
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Track;

    fn graph_with(nodes: &[u32], edges: &[(u32, u32)]) -> RecommendationGraph {
        let mut graph = RecommendationGraph::new();
        for &n in nodes {
            graph.add_node(TrackId(n));
        }
        for &(a, b) in edges {
            graph.add_edge(TrackId(a), TrackId(b));
        }
        graph
    }

    fn ids(raw: &[u32]) -> Vec<TrackId> {
        raw.iter().copied().map(TrackId).collect()
    }

    #[test]
    fn test_same_artist_clique() {
        let graph = graph_with(&[1, 2, 3, 4], &[(1, 2), (1, 3), (2, 3)]);
        assert_eq!(graph.recommend(TrackId(1)), ids(&[2, 3]));
        assert_eq!(graph.recommend(TrackId(3)), ids(&[1, 2]));
        assert!(graph.recommend(TrackId(4)).is_empty());
        assert!(graph.recommend(TrackId(99)).is_empty());
    }

    #[test]
    fn test_bfs_discovery_order() {
        // 1 - 2 - 4
        //  \     /
        //   3 - 5 - 6
        let graph = graph_with(
            &[1, 2, 3, 4, 5, 6],
            &[(1, 2), (1, 3), (2, 4), (3, 5), (4, 5), (5, 6)],
        );
        assert_eq!(graph.recommend(TrackId(1)), ids(&[2, 3, 4, 5, 6]));
        assert_eq!(graph.recommend(TrackId(6)), ids(&[5, 3, 4, 1, 2]));
    }

    #[test]
    fn test_edges_are_symmetric() {
        let graph = graph_with(&[1, 2], &[(1, 2)]);
        assert_eq!(graph.neighbors(TrackId(1)), Some(ids(&[2])));
        assert_eq!(graph.neighbors(TrackId(2)), Some(ids(&[1])));
        assert_eq!(graph.neighbors(TrackId(3)), None);
    }

    #[test]
    fn test_rejected_edges() {
        let mut graph = graph_with(&[1, 2], &[]);
        assert!(!graph.add_edge(TrackId(1), TrackId(9)));
        assert!(!graph.add_edge(TrackId(1), TrackId(1)));
        assert!(graph.add_edge(TrackId(1), TrackId(2)));
        assert!(!graph.add_edge(TrackId(2), TrackId(1)));
        assert_eq!(graph.neighbors(TrackId(1)), Some(ids(&[2])));
        assert!(!graph.add_node(TrackId(1)));
    }

    #[test]
    fn test_fan_out_cap() {
        let mut graph = RecommendationGraph::new();
        for n in 0..=12 {
            graph.add_node(TrackId(n));
        }
        for n in 1..=12 {
            graph.add_edge(TrackId(0), TrackId(n));
        }

        let hub = graph.neighbors(TrackId(0)).unwrap();
        assert_eq!(hub.len(), MAX_NEIGHBORS);
        assert_eq!(hub, (1..=10).map(TrackId).collect::<Vec<_>>());

        // The full side drops the edge, the other side keeps it
        assert_eq!(graph.neighbors(TrackId(12)), Some(ids(&[0])));
        assert_eq!(graph.recommend(TrackId(0)).len(), 10);
        assert_eq!(graph.recommend(TrackId(12)).len(), 11);
    }

    #[test]
    fn test_from_catalog_links_same_artist() {
        let catalog = Catalog::from_tracks(vec![
            Track::new(TrackId(1), "A1", "Artist"),
            Track::new(TrackId(2), "B1", "Other"),
            Track::new(TrackId(3), "A2", "Artist"),
            Track::new(TrackId(4), "A3", "Artist"),
            Track::new(TrackId(5), "A4", "artist"),
        ]);
        let graph = RecommendationGraph::from_catalog(&catalog);
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.recommend(TrackId(1)), ids(&[3, 4]));
        assert_eq!(graph.recommend(TrackId(4)), ids(&[1, 3]));
        assert!(graph.recommend(TrackId(2)).is_empty());
        assert!(graph.recommend(TrackId(5)).is_empty());
    }
}
