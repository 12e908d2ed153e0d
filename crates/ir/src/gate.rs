//! Gate concepts

use std::fmt;

/// A gate input, either a literal or a reference to a previously defined net.
///
/// Both variants carry a `negated` flag that means "use the logical negation
/// of this value".  It's applied where the operand is read and never changes
/// the referenced definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    /// Boolean literal.
    Const { value: bool, negated: bool },

    /// Reference to a named net.
    Net { name: String, negated: bool },
}

impl Operand {
    /// Literal operand with positive polarity.
    pub fn constant(value: bool) -> Self {
        Self::Const {
            value,
            negated: false,
        }
    }

    /// Net reference with positive polarity.
    pub fn net(name: impl Into<String>) -> Self {
        Self::Net {
            name: name.into(),
            negated: false,
        }
    }

    /// Net reference with inverted polarity.
    pub fn not_net(name: impl Into<String>) -> Self {
        Self::Net {
            name: name.into(),
            negated: true,
        }
    }

    /// Returns the operand with its polarity flipped.
    pub fn inverted(&self) -> Self {
        match self {
            Self::Const { value, negated } => Self::Const {
                value: *value,
                negated: !negated,
            },
            Self::Net { name, negated } => Self::Net {
                name: name.clone(),
                negated: !negated,
            },
        }
    }

    pub fn is_negated(&self) -> bool {
        match self {
            Self::Const { negated, .. } | Self::Net { negated, .. } => *negated,
        }
    }

    /// Name of the referenced net, if this is a net reference.
    pub fn net_name(&self) -> Option<&str> {
        match self {
            Self::Const { .. } => None,
            Self::Net { name, .. } => Some(name),
        }
    }

    /// Checks if `other` reads the same value with the opposite polarity.
    ///
    /// Literals are compared by their effective value, so `!0` complements
    /// `0` but also `1` complements `0`.
    pub fn is_complement_of(&self, other: &Operand) -> bool {
        match (self, other) {
            (
                Self::Const {
                    value: v1,
                    negated: n1,
                },
                Self::Const {
                    value: v2,
                    negated: n2,
                },
            ) => (v1 ^ n1) != (v2 ^ n2),
            (
                Self::Net {
                    name: a,
                    negated: n1,
                },
                Self::Net {
                    name: b,
                    negated: n2,
                },
            ) => a == b && n1 != n2,
            _ => false,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negated() {
            f.write_str("!")?;
        }
        match self {
            Self::Const { value, .. } => write!(f, "{}", *value as u8),
            Self::Net { name, .. } => f.write_str(name),
        }
    }
}

/// Runtime-evaluable gate operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GateOp {
    AND,
    XOR,
    OR,
    /// Pass-through of a single operand.
    WIRE,
}

impl GateOp {
    /// Whether the op consumes a level of multiplicative depth.
    pub fn is_multiplicative(&self) -> bool {
        matches!(self, Self::AND | Self::OR)
    }
}

/// A gate with its operands.
///
/// WIRE gates have exactly one operand, all other gates have two.  The
/// constructors are the only way to build one so this always holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gate {
    op: GateOp,
    left: Operand,
    right: Option<Operand>,
}

impl Gate {
    pub fn and(left: Operand, right: Operand) -> Self {
        Self::binary(GateOp::AND, left, right)
    }

    pub fn xor(left: Operand, right: Operand) -> Self {
        Self::binary(GateOp::XOR, left, right)
    }

    pub fn or(left: Operand, right: Operand) -> Self {
        Self::binary(GateOp::OR, left, right)
    }

    pub fn wire(input: Operand) -> Self {
        Self {
            op: GateOp::WIRE,
            left: input,
            right: None,
        }
    }

    /// Constructs a two-operand gate.
    ///
    /// # Panics
    ///
    /// If `op` is [`GateOp::WIRE`].
    pub fn binary(op: GateOp, left: Operand, right: Operand) -> Self {
        assert_ne!(op, GateOp::WIRE, "gate: WIRE takes one operand");
        Self {
            op,
            left,
            right: Some(right),
        }
    }

    pub fn op(&self) -> GateOp {
        self.op
    }

    pub fn left(&self) -> &Operand {
        &self.left
    }

    /// The second operand, `None` for WIRE gates.
    pub fn right(&self) -> Option<&Operand> {
        self.right.as_ref()
    }

    /// Iterates over the gate's operands, left first.
    pub fn operands(&self) -> impl Iterator<Item = &Operand> {
        std::iter::once(&self.left).chain(self.right.iter())
    }

    /// Iterates over the names of the nets this gate reads.
    pub fn net_refs(&self) -> impl Iterator<Item = &str> {
        self.operands().filter_map(Operand::net_name)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.right {
            None => write!(f, "{:?}({})", self.op, self.left),
            Some(right) => write!(f, "{:?}({}, {})", self.op, self.left, right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_has_single_operand() {
        let g = Gate::wire(Operand::not_net("a"));
        assert_eq!(g.op(), GateOp::WIRE);
        assert!(g.right().is_none());
        assert_eq!(g.operands().count(), 1);
        assert_eq!(g.to_string(), "WIRE(!a)");
    }

    #[test]
    #[should_panic]
    fn test_binary_rejects_wire() {
        let _ = Gate::binary(GateOp::WIRE, Operand::net("a"), Operand::net("b"));
    }

    #[test]
    fn test_net_refs_skip_constants() {
        let g = Gate::and(Operand::constant(true), Operand::net("x"));
        assert_eq!(g.net_refs().collect::<Vec<_>>(), vec!["x"]);
    }

    #[test]
    fn test_complement() {
        assert!(Operand::net("a").is_complement_of(&Operand::not_net("a")));
        assert!(!Operand::net("a").is_complement_of(&Operand::not_net("b")));
        assert!(!Operand::net("a").is_complement_of(&Operand::net("a")));
        assert!(Operand::constant(true).is_complement_of(&Operand::constant(false)));
        assert!(
            Operand::constant(true).is_complement_of(&Operand::constant(true).inverted())
        );
        assert!(!Operand::constant(true).is_complement_of(&Operand::net("a")));
    }
}
