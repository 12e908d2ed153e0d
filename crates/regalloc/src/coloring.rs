//! Greedy graph coloring.

use fixedbitset::FixedBitSet;

use crate::coords::{NetIdx, SlotIdx};
use crate::interference::InterferenceGraph;

/// Colors nodes in index order, giving each the smallest color none of its
/// already colored neighbors has.
///
/// The result is always a valid coloring but not necessarily a minimal one.
/// When node order is interval start order, as it is for nets in program
/// order, it uses exactly [`InterferenceGraph::max_live`] colors.
pub fn greedy_color(graph: &InterferenceGraph) -> Vec<SlotIdx> {
    let mut colors: Vec<SlotIdx> = Vec::with_capacity(graph.num_nodes());
    let mut taken = FixedBitSet::new();

    for i in 0..graph.num_nodes() {
        let neighbors = graph.neighbors(NetIdx::from(i));

        // With at most `degree` colors taken there's always a free one below
        // `degree + 1`.
        taken.clear();
        taken.grow(neighbors.len() + 1);

        for &n in neighbors {
            let n = usize::from(n);
            if n >= i {
                break;
            }
            let c = usize::from(colors[n]);
            if c < taken.len() {
                taken.insert(c);
            }
        }

        let color = taken.zeroes().next().unwrap_or(neighbors.len());
        colors.push(SlotIdx::from(color));
    }

    colors
}

/// Number of distinct colors used, `max color + 1`.
pub fn color_count(colors: &[SlotIdx]) -> usize {
    colors
        .iter()
        .map(|&c| usize::from(c) + 1)
        .max()
        .unwrap_or(0)
}
