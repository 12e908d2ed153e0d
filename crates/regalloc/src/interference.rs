//! Interference graph between nets.

use crate::coords::NetIdx;
use crate::liveness::Interval;

/// Undirected graph with an edge between every pair of nets whose intervals
/// overlap.  Immutable once built.
#[derive(Clone, Debug)]
pub struct InterferenceGraph {
    /// Sorted neighbor lists, indexed by node.
    adj: Vec<Vec<NetIdx>>,
    edges: usize,
    max_live: usize,
}

impl InterferenceGraph {
    /// Builds the graph from one interval per node.
    ///
    /// Nodes are swept by start position while keeping the set of intervals
    /// still open.  Every open interval overlaps the one being inserted, so
    /// the work done is proportional to the nodes plus the edges instead of
    /// comparing every pair.  Empty intervals get no edges.
    pub fn from_intervals(intervals: &[Interval]) -> Self {
        let mut order = (0..intervals.len()).collect::<Vec<_>>();
        order.sort_by_key(|&i| intervals[i].start());

        let mut adj = vec![Vec::new(); intervals.len()];
        let mut active: Vec<usize> = Vec::new();
        let mut edges = 0;
        let mut max_live = 0;

        for i in order {
            let cur = intervals[i];
            if cur.is_empty() {
                continue;
            }

            active.retain(|&j| intervals[j].end() > cur.start());
            for &j in &active {
                adj[i].push(NetIdx::from(j));
                adj[j].push(NetIdx::from(i));
            }
            edges += active.len();

            active.push(i);
            max_live = max_live.max(active.len());
        }

        for neighbors in &mut adj {
            neighbors.sort_unstable();
        }

        Self {
            adj,
            edges,
            max_live,
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.adj.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges
    }

    /// Largest number of intervals open at any single position, which bounds
    /// the number of colors from below.
    pub fn max_live(&self) -> usize {
        self.max_live
    }

    /// Neighbors of a node in increasing index order.
    pub fn neighbors(&self, node: NetIdx) -> &[NetIdx] {
        &self.adj[usize::from(node)]
    }

    pub fn degree(&self, node: NetIdx) -> usize {
        self.neighbors(node).len()
    }

    pub fn interferes(&self, a: NetIdx, b: NetIdx) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }
}
