//! IR construction errors.

/// Errors produced while building or validating a circuit.
#[derive(Debug, thiserror::Error)]
pub enum IrError {
    /// The circuit violates a construction invariant, like referencing an
    /// undefined net or defining a net twice.
    #[error("malformed circuit: {0}")]
    MalformedCircuit(String),

    /// An OR in the source had a shape the normalization pass can't rewrite.
    #[error("unsupported OR pattern in the definition of `{net}`: {shape}")]
    UnsupportedOrPattern {
        /// Net being defined.
        net: String,
        /// Rendering of the offending expression.
        shape: String,
    },

    /// The equation text could not be parsed.
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number where the statement starts.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// The wrong number of input values was provided for plaintext
    /// evaluation.
    #[error("expected {expected} input values, got {got}")]
    InputCountMismatch {
        /// Number of circuit inputs.
        expected: usize,
        /// Number of values provided.
        got: usize,
    },
}

impl IrError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedCircuit(msg.into())
    }
}
