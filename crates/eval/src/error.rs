//! Evaluation errors.

use crate::report::{OutputValue, fmt_mismatches};

/// Errors produced while evaluating a circuit.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// A gate read a net that isn't in its slot, either because it was never
    /// written or because the slot has been reused.
    #[error("net `{0}` is not held in its slot")]
    UseOfUnallocatedNet(String),

    /// A net the allocator doesn't know about.
    #[error("unknown net `{0}`")]
    UnknownNet(String),

    /// The number of input values doesn't match the number of inputs.
    #[error("expected {expected} input values, got {got}")]
    InputCountMismatch {
        /// Number of circuit inputs.
        expected: usize,
        /// Number of values provided.
        got: usize,
    },

    /// An input bit string had a character other than `0` or `1`.
    #[error("invalid input bit {found:?} at position {position}")]
    InvalidInputBit {
        /// Character offset in the string.
        position: usize,
        /// Offending character.
        found: char,
    },

    /// Some outputs decrypted to something other than their shadow value.
    #[error("validation failed: {}", fmt_mismatches(.mismatches))]
    ValidationMismatch {
        /// Every output that didn't match, in output order.
        mismatches: Vec<OutputValue>,
    },
}
