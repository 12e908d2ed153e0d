//! Example circuit definitions for testing and demonstration.

use rand::Rng;

use crate::circuit::{Circuit, Equation};
use crate::gate::{Gate, GateOp, Operand};

fn net(s: &str) -> Operand {
    Operand::net(s)
}

fn not(s: &str) -> Operand {
    Operand::not_net(s)
}

/// One-bit full adder.
///
/// Inputs `a, b, cin`, outputs `sum, cout`.
pub fn build_full_adder() -> Circuit {
    Circuit::from_parts(
        &["a", "b", "cin"],
        &["sum", "cout"],
        vec![
            Equation::new("ab_x", Gate::xor(net("a"), net("b"))),
            Equation::new("sum", Gate::xor(net("ab_x"), net("cin"))),
            Equation::new("ab_a", Gate::and(net("a"), net("b"))),
            Equation::new("c_a", Gate::and(net("ab_x"), net("cin"))),
            Equation::new("cout", Gate::or(net("ab_a"), net("c_a"))),
        ],
    )
    .expect("example: full adder is well formed")
}

/// Creates a circuit that takes 2-bit inputs a, b, c, d, computes a+b and
/// c+d, and checks if they are equal.
///
/// Inputs are `a0, a1, b0, b1, c0, c1, d0, d1` (bit 1 is the MSB).  The single
/// output `eq` is 1 iff (a+b) == (c+d).
pub fn build_two_bit_equality() -> Circuit {
    let mut eqns = Vec::new();

    for (x, y, s) in [("a", "b", "ab"), ("c", "d", "cd")] {
        let (x0, x1, y0, y1) = (
            format!("{x}0"),
            format!("{x}1"),
            format!("{y}0"),
            format!("{y}1"),
        );

        // sum[0] = x0 ^ y0, carry0 = x0 & y0
        eqns.push(Equation::new(format!("{s}_s0"), Gate::xor(net(&x0), net(&y0))));
        eqns.push(Equation::new(format!("{s}_c0"), Gate::and(net(&x0), net(&y0))));

        // sum[1] = x1 ^ y1 ^ carry0
        eqns.push(Equation::new(format!("{s}_x1"), Gate::xor(net(&x1), net(&y1))));
        eqns.push(Equation::new(
            format!("{s}_s1"),
            Gate::xor(net(&format!("{s}_x1")), net(&format!("{s}_c0"))),
        ));

        // carry = (x1 & y1) | (carry0 & (x1 ^ y1))
        eqns.push(Equation::new(format!("{s}_a1"), Gate::and(net(&x1), net(&y1))));
        eqns.push(Equation::new(
            format!("{s}_p1"),
            Gate::and(net(&format!("{s}_c0")), net(&format!("{s}_x1"))),
        ));
        eqns.push(Equation::new(
            format!("{s}_s2"),
            Gate::or(net(&format!("{s}_a1")), net(&format!("{s}_p1"))),
        ));
    }

    // Per-bit difference, then eq = !(diff0 | diff1 | diff2).
    for bit in 0..3 {
        eqns.push(Equation::new(
            format!("diff{bit}"),
            Gate::xor(net(&format!("ab_s{bit}")), net(&format!("cd_s{bit}"))),
        ));
    }
    eqns.push(Equation::new("diff01", Gate::or(net("diff0"), net("diff1"))));
    eqns.push(Equation::new("any", Gate::or(net("diff01"), net("diff2"))));
    eqns.push(Equation::new("eq", Gate::wire(not("any"))));

    Circuit::from_parts(
        &["a0", "a1", "b0", "b1", "c0", "c1", "d0", "d1"],
        &["eq"],
        eqns,
    )
    .expect("example: equality circuit is well formed")
}

/// Shape parameters for [`random_circuit`].
#[derive(Copy, Clone, Debug)]
pub struct RandomCircuitConfig {
    pub inputs: usize,
    pub equations: usize,
    pub outputs: usize,
    /// Probability that an operand is a literal instead of a net.
    pub const_prob: f64,
}

impl Default for RandomCircuitConfig {
    fn default() -> Self {
        Self {
            inputs: 8,
            equations: 64,
            outputs: 4,
            const_prob: 0.05,
        }
    }
}

/// Generates a random, well-formed circuit.
///
/// Operands pick uniformly among all earlier nets with random polarity, so
/// the result has plenty of dead nets, long-lived nets and reuse.  Outputs
/// are distinct equation nets and always include the last one.
///
/// # Panics
///
/// If `inputs` is zero, or `outputs` exceeds `equations`.
pub fn random_circuit<R: Rng>(rng: &mut R, config: RandomCircuitConfig) -> Circuit {
    assert!(config.inputs > 0, "example: need at least one input");
    assert!(
        config.outputs <= config.equations,
        "example: more outputs than equations"
    );

    let inputs = (0..config.inputs).map(|i| format!("i{i}")).collect::<Vec<_>>();
    let mut names = inputs.clone();
    let mut eqns = Vec::with_capacity(config.equations);

    for i in 0..config.equations {
        let operand = |rng: &mut R| {
            if rng.random_bool(config.const_prob) {
                Operand::Const {
                    value: rng.random(),
                    negated: rng.random(),
                }
            } else {
                Operand::Net {
                    name: names[rng.random_range(0..names.len())].clone(),
                    negated: rng.random(),
                }
            }
        };

        let op = [GateOp::AND, GateOp::XOR, GateOp::OR, GateOp::WIRE][rng.random_range(0..4)];
        let left = operand(rng);
        let gate = match op {
            GateOp::WIRE => Gate::wire(left),
            op => Gate::binary(op, left, operand(rng)),
        };

        let name = format!("n{i}");
        eqns.push(Equation::new(name.clone(), gate));
        names.push(name);
    }

    // Partial Fisher-Yates over the equation nets, keeping the last one first.
    let mut candidates = (0..config.equations).rev().collect::<Vec<_>>();
    for k in 1..config.outputs {
        let j = rng.random_range(k..candidates.len());
        candidates.swap(k, j);
    }
    let outputs = candidates
        .iter()
        .take(config.outputs)
        .map(|i| format!("n{i}"))
        .collect();

    Circuit::new(inputs, outputs, eqns).expect("example: random circuit is well formed")
}
