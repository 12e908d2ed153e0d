//! Slot allocation for circuit nets.
//!
//! Every net gets a half-open liveness interval over program order (inputs,
//! then equations).  Nets whose intervals overlap interfere, and the
//! interference graph is greedily colored in program order.  The color of a
//! net is the register file slot it lives in during evaluation.

mod allocator;
mod coloring;
mod coords;
mod error;
mod interference;
mod liveness;

pub use allocator::{AllocStats, RegisterAllocator};
pub use coloring::{color_count, greedy_color};
pub use coords::*;
pub use error::AllocError;
pub use interference::InterferenceGraph;
pub use liveness::Interval;
