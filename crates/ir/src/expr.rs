//! Expression arena used while building the IR.
//!
//! The front-end parses each right-hand side into nodes stored in an
//! [`ExprArena`] and refers to them by [`NodeId`].  The arena is the sole
//! owner of the nodes.  [`crate::normalize`] then lowers every root into a
//! flat [`crate::Gate`].

use std::fmt;

/// Index of a node within an [`ExprArena`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(u32);

impl From<NodeId> for usize {
    fn from(value: NodeId) -> Self {
        value.0 as usize
    }
}

/// Operations that may appear on expression nodes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExprOp {
    AND,
    XOR,
    /// Pass-through, has no right child.
    WIRE,
    /// OR as written in the source.  Only exists here; normalization
    /// rewrites it into OR or XOR, see [`crate::normalize`].
    UnsafeOr,
}

/// A node in the expression arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// Reference to a named net.
    Input { name: String, negated: bool },

    /// Literal value, with any negation already folded in.
    Constant { value: bool },

    /// An operation over other nodes.
    Gate {
        op: ExprOp,
        left: NodeId,
        right: Option<NodeId>,
    },
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Node::Gate { .. })
    }
}

/// Owner of all expression nodes for a parse.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    nodes: Vec<Node>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, returning its id.
    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn input(&mut self, name: impl Into<String>, negated: bool) -> NodeId {
        self.push(Node::Input {
            name: name.into(),
            negated,
        })
    }

    pub fn constant(&mut self, value: bool) -> NodeId {
        self.push(Node::Constant { value })
    }

    pub fn binary(&mut self, op: ExprOp, left: NodeId, right: NodeId) -> NodeId {
        self.push(Node::Gate {
            op,
            left,
            right: Some(right),
        })
    }

    pub fn wire(&mut self, inner: NodeId) -> NodeId {
        self.push(Node::Gate {
            op: ExprOp::WIRE,
            left: inner,
            right: None,
        })
    }

    /// Gets a node.
    ///
    /// # Panics
    ///
    /// If the id came from a different arena and is out of bounds.
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[usize::from(id)]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns a displayable rendering of the subtree rooted at `id`.
    pub fn display(&self, id: NodeId) -> DisplayExpr<'_> {
        DisplayExpr { arena: self, id }
    }
}

/// Renders an expression subtree, see [`ExprArena::display`].
#[derive(Debug)]
pub struct DisplayExpr<'a> {
    arena: &'a ExprArena,
    id: NodeId,
}

impl fmt::Display for DisplayExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arena.get(self.id) {
            Node::Input { name, negated } => {
                write!(f, "{}{name}", if *negated { "!" } else { "" })
            }
            Node::Constant { value } => write!(f, "{}", *value as u8),
            Node::Gate { op, left, right } => {
                let l = self.arena.display(*left);
                match (op, right) {
                    (ExprOp::WIRE, _) | (_, None) => write!(f, "{l}"),
                    (op, Some(r)) => {
                        let sym = match op {
                            ExprOp::AND => "*",
                            ExprOp::XOR => "^",
                            _ => "+",
                        };
                        write!(f, "({l} {sym} {})", self.arena.display(*r))
                    }
                }
            }
        }
    }
}
