//! Multiplicative depth analysis.

use ahash::{HashMap, HashMapExt};

use crate::circuit::Equation;
use crate::gate::Operand;

/// Computes the multiplicative depth of an equation list, the length of the
/// longest chain of AND/OR gates from any input to any net.
///
/// XOR and WIRE gates pass through the deepest of their operands, AND and OR
/// add one to it.  Literals and inputs are at depth 0.
///
/// The result is only used to size backend parameters, so a reference to a
/// net that hasn't been seen yet is counted as depth 0 instead of failing.
/// Undefined references are caught by [`crate::Circuit::new`].
pub fn multiplicative_depth(equations: &[Equation]) -> usize {
    let mut depths: HashMap<&str, usize> = HashMap::with_capacity(equations.len());
    let mut max_depth = 0;

    for eqn in equations {
        let gate = eqn.gate();
        let operand_depth = gate
            .operands()
            .map(|op| match op {
                Operand::Const { .. } => 0,
                Operand::Net { name, .. } => depths.get(name.as_str()).copied().unwrap_or(0),
            })
            .max()
            .unwrap_or(0);

        let depth = operand_depth + gate.op().is_multiplicative() as usize;
        max_depth = max_depth.max(depth);
        depths.insert(eqn.net(), depth);
    }

    max_depth
}
