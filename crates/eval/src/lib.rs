//! Encrypted evaluation of allocated circuits.
//!
//! The [`Evaluator`] walks a circuit's equations in order over a register
//! file sized by a [`heckt_regalloc::RegisterAllocator`], calling into a
//! [`Backend`] for every gate while computing the same gate in the clear.
//! Afterwards the outputs are decrypted and checked against those shadow
//! values.

mod backend;
mod clear;
mod error;
mod evaluator;
mod inputs;
mod regfile;
mod report;
mod sim;

pub use backend::{Backend, Decryptor};
pub use clear::ClearBackend;
pub use error::EvalError;
pub use evaluator::{EvalStats, Evaluator};
pub use inputs::{format_bits, parse_bits, random_inputs};
pub use report::{OutputValue, ValidationReport};
pub use sim::{SimBackend, SimCiphertext, SimCounters, SimParams, SimSecretKey};
