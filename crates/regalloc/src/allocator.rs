//! Net to slot assignment.

use ahash::RandomState;
use fixedbitset::FixedBitSet;
use heckt_ir::{Circuit, Equation};
use indexmap::IndexSet;
use tracing::debug;

use crate::coloring::{color_count, greedy_color};
use crate::coords::*;
use crate::error::AllocError;
use crate::interference::InterferenceGraph;
use crate::liveness::{Interval, compute_intervals};

/// Maps every net of a circuit onto a small pool of reusable slots.
///
/// Built once before evaluation.  Nets are numbered in program order, given
/// a liveness interval, and the resulting interference graph is colored
/// greedily.  Two nets get the same slot only if they're never live at the
/// same time, and outputs stay live until the end, so no later net ever
/// overwrites them.
#[derive(Clone, Debug)]
pub struct RegisterAllocator {
    /// Net names, the index of each being its position.
    nets: IndexSet<String, RandomState>,
    intervals: Vec<Interval>,
    slots: Vec<SlotIdx>,
    slot_count: usize,
    stats: AllocStats,
}

impl RegisterAllocator {
    pub fn new(
        inputs: &[String],
        equations: &[Equation],
        outputs: &[String],
    ) -> Result<Self, AllocError> {
        let total = inputs.len() + equations.len();
        if total > RawNetIdx::MAX as usize {
            return Err(AllocError::MalformedCircuit(format!(
                "{total} nets don't fit in a u32 net index"
            )));
        }

        let mut nets = IndexSet::with_capacity_and_hasher(
            inputs.len() + equations.len(),
            RandomState::new(),
        );

        let defs = inputs.iter().map(String::as_str);
        for name in defs.chain(equations.iter().map(Equation::net)) {
            if !nets.insert(name.to_owned()) {
                return Err(AllocError::MalformedCircuit(format!(
                    "net `{name}` defined more than once"
                )));
            }
        }

        let mut output_set = FixedBitSet::with_capacity(nets.len());
        for name in outputs {
            let Some(idx) = nets.get_index_of(name.as_str()) else {
                return Err(AllocError::MalformedCircuit(format!(
                    "output `{name}` is never defined"
                )));
            };
            output_set.insert(idx);
        }

        let intervals = compute_intervals(&nets, inputs.len(), equations, &output_set)?;
        let graph = InterferenceGraph::from_intervals(&intervals);
        let slots = greedy_color(&graph);
        let slot_count = color_count(&slots);

        let stats = AllocStats {
            nets: nets.len(),
            slots: slot_count,
            edges: graph.edge_count(),
            max_live: graph.max_live(),
        };
        debug!(
            nets = stats.nets,
            edges = stats.edges,
            max_live = stats.max_live,
            "Colors: {slot_count}"
        );

        Ok(Self {
            nets,
            intervals,
            slots,
            slot_count,
            stats,
        })
    }

    /// Builds the allocator for a validated circuit.
    pub fn from_circuit(circuit: &Circuit) -> Result<Self, AllocError> {
        Self::new(circuit.inputs(), circuit.equations(), circuit.outputs())
    }

    /// Gets the slot assigned to a net.
    pub fn net_to_slot(&self, name: &str) -> Result<SlotIdx, AllocError> {
        self.net_idx(name)
            .map(|idx| self.slot_of(idx))
            .ok_or_else(|| AllocError::UnknownNet(name.to_owned()))
    }

    /// Gets the position index of a net, if it was registered.
    pub fn net_idx(&self, name: &str) -> Option<NetIdx> {
        self.nets.get_index_of(name).map(NetIdx::from)
    }

    /// Gets the slot of a net by position.
    ///
    /// # Panics
    ///
    /// If `idx` didn't come from this allocator.
    pub fn slot_of(&self, idx: NetIdx) -> SlotIdx {
        self.slots[usize::from(idx)]
    }

    pub fn net_name(&self, idx: NetIdx) -> Option<&str> {
        self.nets.get_index(usize::from(idx)).map(String::as_str)
    }

    /// Number of distinct slots, which is the register file size.
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn num_nets(&self) -> usize {
        self.nets.len()
    }

    /// Liveness intervals, indexed by position.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn interval(&self, name: &str) -> Option<Interval> {
        self.net_idx(name).map(|idx| self.intervals[usize::from(idx)])
    }

    /// Slot of every net, indexed by position.
    pub fn slots(&self) -> &[SlotIdx] {
        &self.slots
    }

    pub fn stats(&self) -> AllocStats {
        self.stats
    }
}

/// Summary of an allocation.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct AllocStats {
    /// Nets registered, inputs included.
    pub nets: usize,

    /// Slots used.
    pub slots: usize,

    /// Interference edges.
    pub edges: usize,

    /// Most nets live at one position.  No valid allocation uses fewer slots.
    pub max_live: usize,
}
