//! Gate IR for encrypted boolean circuits.
//!
//! A [`Circuit`] is a validated, immutable list of named inputs, named outputs
//! and an ordered list of [`Equation`]s.  The equation order is the evaluation
//! order and is checked to be topological when the circuit is built.
//!
//! Circuits are usually built from the equation text format through
//! [`eqn::parse_circuit`], which goes through the expression arena in
//! [`expr`] and the normalization pass in [`normalize`].

mod circuit;
mod depth;
mod error;
mod gate;

pub mod eqn;
pub mod example_circuits;
pub mod expr;
pub mod normalize;

pub use circuit::*;
pub use depth::multiplicative_depth;
pub use error::IrError;
pub use gate::*;
