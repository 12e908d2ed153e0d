//! Lowering of expression trees into flat gates.
//!
//! Every equation right-hand side has to become exactly one [`Gate`] over
//! leaf operands.  The shapes accepted are:
//!
//! - `WIRE(x)` and bare leaves → `WIRE(x)`
//! - `x * y` → `AND(x, y)`, `x ^ y` → `XOR(x, y)`
//! - `WIRE(x) + WIRE(y)` → `OR(x, y)`
//! - `(p * q) + (!p * !q)` → `XOR(p, !q)`, with the second product's operands
//!   in either order.  `(a * !b) + (!a * b)` is the usual way XOR is spelled
//!   in sum-of-products netlists.
//!
//! Any other shape under `+` is [`IrError::UnsupportedOrPattern`].  These are
//! structural preconditions on what the front-end produces, not a general
//! boolean rewriter.

use crate::error::IrError;
use crate::expr::*;
use crate::gate::*;

/// Lowers the expression rooted at `root` into a gate defining `net`.
pub fn lower(arena: &ExprArena, net: &str, root: NodeId) -> Result<Gate, IrError> {
    let &Node::Gate { op, left, right } = arena.get(root) else {
        return Ok(Gate::wire(leaf_operand(arena, net, root)?));
    };

    match (op, right) {
        (ExprOp::WIRE, None) => Ok(Gate::wire(leaf_operand(arena, net, left)?)),
        (ExprOp::AND, Some(right)) => Ok(Gate::and(
            leaf_operand(arena, net, left)?,
            leaf_operand(arena, net, right)?,
        )),
        (ExprOp::XOR, Some(right)) => Ok(Gate::xor(
            leaf_operand(arena, net, left)?,
            leaf_operand(arena, net, right)?,
        )),
        (ExprOp::UnsafeOr, Some(right)) => lower_or(arena, net, root, left, right),
        (op, right) => Err(IrError::malformed(format!(
            "`{net}`: {op:?} node with {} operands",
            1 + right.is_some() as usize
        ))),
    }
}

fn lower_or(
    arena: &ExprArena,
    net: &str,
    root: NodeId,
    left: NodeId,
    right: NodeId,
) -> Result<Gate, IrError> {
    if let (Some(l), Some(r)) = (wire_operand(arena, net, left)?, wire_operand(arena, net, right)?)
    {
        return Ok(Gate::or(l, r));
    }

    if let (Some((p, q)), Some((np, nq))) = (
        and_operands(arena, net, left)?,
        and_operands(arena, net, right)?,
    ) {
        let matches = (np.is_complement_of(&p) && nq.is_complement_of(&q))
            || (np.is_complement_of(&q) && nq.is_complement_of(&p));

        if matches {
            // (p & q) | (!p & !q) == !(p ^ q) == p ^ !q
            return Ok(Gate::xor(p, q.inverted()));
        }
    }

    Err(IrError::UnsupportedOrPattern {
        net: net.to_owned(),
        shape: arena.display(root).to_string(),
    })
}

/// If the node is a leaf or a WIRE over a leaf, returns the leaf operand.
fn wire_operand(arena: &ExprArena, net: &str, id: NodeId) -> Result<Option<Operand>, IrError> {
    match arena.get(id) {
        node if node.is_leaf() => leaf_operand(arena, net, id).map(Some),
        Node::Gate {
            op: ExprOp::WIRE,
            left,
            right: None,
        } => leaf_operand(arena, net, *left).map(Some),
        _ => Ok(None),
    }
}

/// If the node is an AND over two leaves, returns both operands.
fn and_operands(
    arena: &ExprArena,
    net: &str,
    id: NodeId,
) -> Result<Option<(Operand, Operand)>, IrError> {
    match arena.get(id) {
        Node::Gate {
            op: ExprOp::AND,
            left,
            right: Some(right),
        } => Ok(Some((
            leaf_operand(arena, net, *left)?,
            leaf_operand(arena, net, *right)?,
        ))),
        _ => Ok(None),
    }
}

fn leaf_operand(arena: &ExprArena, net: &str, id: NodeId) -> Result<Operand, IrError> {
    match arena.get(id) {
        Node::Input { name, negated } => Ok(Operand::Net {
            name: name.clone(),
            negated: *negated,
        }),
        Node::Constant { value } => Ok(Operand::constant(*value)),
        Node::Gate { .. } => Err(IrError::malformed(format!(
            "`{net}`: expected an operand, found nested expression {}",
            arena.display(id)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_becomes_wire() {
        let mut arena = ExprArena::new();
        let a = arena.input("a", true);
        let g = lower(&arena, "n", a).unwrap();
        assert_eq!(g, Gate::wire(Operand::not_net("a")));

        let one = arena.constant(true);
        let w = arena.wire(one);
        assert_eq!(
            lower(&arena, "n", w).unwrap(),
            Gate::wire(Operand::constant(true))
        );
    }

    #[test]
    fn test_and_xor() {
        let mut arena = ExprArena::new();
        let a = arena.input("a", false);
        let b = arena.input("b", true);
        let and = arena.binary(ExprOp::AND, a, b);
        let xor = arena.binary(ExprOp::XOR, a, b);
        assert_eq!(
            lower(&arena, "n", and).unwrap(),
            Gate::and(Operand::net("a"), Operand::not_net("b"))
        );
        assert_eq!(
            lower(&arena, "n", xor).unwrap(),
            Gate::xor(Operand::net("a"), Operand::not_net("b"))
        );
    }

    #[test]
    fn test_wire_wire_or() {
        let mut arena = ExprArena::new();
        let a = arena.input("a", false);
        let b = arena.input("b", true);
        let wa = arena.wire(a);
        let wb = arena.wire(b);
        let or = arena.binary(ExprOp::UnsafeOr, wa, wb);
        assert_eq!(
            lower(&arena, "n", or).unwrap(),
            Gate::or(Operand::net("a"), Operand::not_net("b"))
        );
    }

    #[test]
    fn test_xor_pattern() {
        // (a * !b) + (!a * b)
        let mut arena = ExprArena::new();
        let a = arena.input("a", false);
        let nb = arena.input("b", true);
        let na = arena.input("a", true);
        let b = arena.input("b", false);
        let l = arena.binary(ExprOp::AND, a, nb);
        let r = arena.binary(ExprOp::AND, na, b);
        let or = arena.binary(ExprOp::UnsafeOr, l, r);
        assert_eq!(
            lower(&arena, "n", or).unwrap(),
            Gate::xor(Operand::net("a"), Operand::net("b"))
        );

        // (!a * b) + (!b * a), second product swapped.
        let r2 = arena.binary(ExprOp::AND, nb, a);
        let l2 = arena.binary(ExprOp::AND, na, b);
        let or2 = arena.binary(ExprOp::UnsafeOr, l2, r2);
        assert_eq!(
            lower(&arena, "n", or2).unwrap(),
            Gate::xor(Operand::not_net("a"), Operand::not_net("b"))
        );
    }

    #[test]
    fn test_xnor_pattern() {
        // (a * b) + (!a * !b) == !(a ^ b)
        let mut arena = ExprArena::new();
        let a = arena.input("a", false);
        let b = arena.input("b", false);
        let na = arena.input("a", true);
        let nb = arena.input("b", true);
        let l = arena.binary(ExprOp::AND, a, b);
        let r = arena.binary(ExprOp::AND, na, nb);
        let or = arena.binary(ExprOp::UnsafeOr, l, r);
        assert_eq!(
            lower(&arena, "n", or).unwrap(),
            Gate::xor(Operand::net("a"), Operand::not_net("b"))
        );
    }

    #[test]
    fn test_unsupported_or_shapes() {
        let mut arena = ExprArena::new();
        let a = arena.input("a", false);
        let b = arena.input("b", false);
        let c = arena.input("c", false);

        // Products over different variables.
        let l = arena.binary(ExprOp::AND, a, b);
        let r = arena.binary(ExprOp::AND, a, c);
        let or = arena.binary(ExprOp::UnsafeOr, l, r);
        let err = lower(&arena, "n", or).unwrap_err();
        assert!(
            matches!(&err, IrError::UnsupportedOrPattern { net, .. } if net == "n"),
            "{err}"
        );

        // Product plus a plain wire.
        let wc = arena.wire(c);
        let mixed = arena.binary(ExprOp::UnsafeOr, l, wc);
        assert!(matches!(
            lower(&arena, "n", mixed).unwrap_err(),
            IrError::UnsupportedOrPattern { .. }
        ));
    }

    #[test]
    fn test_nested_product_is_malformed() {
        let mut arena = ExprArena::new();
        let a = arena.input("a", false);
        let b = arena.input("b", false);
        let inner = arena.binary(ExprOp::AND, a, b);
        let outer = arena.binary(ExprOp::AND, inner, a);
        assert!(matches!(
            lower(&arena, "n", outer).unwrap_err(),
            IrError::MalformedCircuit(_)
        ));
    }
}
