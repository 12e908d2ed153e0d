//! Liveness intervals over program order.

use std::hash::BuildHasher;

use fixedbitset::FixedBitSet;
use heckt_ir::Equation;
use indexmap::IndexSet;

use crate::error::AllocError;

/// Half-open range `[start, end)` of positions during which a net has to be
/// kept around.
///
/// `start` is the position that defines the net, `end` the position of the
/// last equation that reads it.  Nets that are outputs or that nobody reads
/// end at the total net count.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Interval {
    start: usize,
    end: usize,
}

impl Interval {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// If the net is live at position `pos`.
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    /// If two nets with these intervals can't share a slot.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.end.min(other.end) > self.start.max(other.start)
    }
}

/// Computes the interval of every net in `nets`.
///
/// `nets` holds inputs followed by equation nets, so a net's index in it is
/// its position.  Equations are scanned in reverse and the first read seen
/// for a net is its last use.
pub(crate) fn compute_intervals<S: BuildHasher>(
    nets: &IndexSet<String, S>,
    num_inputs: usize,
    equations: &[Equation],
    outputs: &FixedBitSet,
) -> Result<Vec<Interval>, AllocError> {
    let infinity = nets.len();
    let mut intervals = (0..nets.len())
        .map(|i| Interval::new(i, infinity))
        .collect::<Vec<_>>();

    for (k, eqn) in equations.iter().enumerate().rev() {
        let pos = num_inputs + k;

        for name in eqn.gate().net_refs() {
            let Some(idx) = nets.get_index_of(name) else {
                return Err(AllocError::MalformedCircuit(format!(
                    "`{}` reads undefined net `{name}`",
                    eqn.net()
                )));
            };

            if idx >= pos {
                return Err(AllocError::MalformedCircuit(format!(
                    "`{}` reads `{name}` before it is defined",
                    eqn.net()
                )));
            }

            let interval = &mut intervals[idx];
            if interval.end == infinity && !outputs.contains(idx) {
                interval.end = pos;
            }
        }
    }

    Ok(intervals)
}
