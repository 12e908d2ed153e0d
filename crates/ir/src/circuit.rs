//! Circuit representation and validation.

use ahash::{HashMap, HashMapExt, HashSet, HashSetExt};

use crate::depth::multiplicative_depth;
use crate::error::IrError;
use crate::gate::*;

/// Definition of a net by a gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Equation {
    net: String,
    gate: Gate,
}

impl Equation {
    pub fn new(net: impl Into<String>, gate: Gate) -> Self {
        Self {
            net: net.into(),
            gate,
        }
    }

    /// Name of the net this equation defines.
    pub fn net(&self) -> &str {
        &self.net
    }

    pub fn gate(&self) -> &Gate {
        &self.gate
    }
}

/// A validated circuit.
///
/// Construction checks that every net is defined exactly once, that every
/// operand refers to a net defined earlier in program order (inputs first,
/// then equations), and that every output names a defined net.  Once built
/// the circuit is never mutated.
#[derive(Clone, Debug)]
pub struct Circuit {
    inputs: Vec<String>,
    outputs: Vec<String>,
    equations: Vec<Equation>,
}

impl Circuit {
    pub fn new(
        inputs: Vec<String>,
        outputs: Vec<String>,
        equations: Vec<Equation>,
    ) -> Result<Self, IrError> {
        let mut defined: HashSet<&str> = HashSet::with_capacity(inputs.len() + equations.len());

        for input in &inputs {
            if !defined.insert(input) {
                return Err(IrError::malformed(format!(
                    "input `{input}` declared twice"
                )));
            }
        }

        for (i, eqn) in equations.iter().enumerate() {
            for name in eqn.gate().net_refs() {
                if !defined.contains(name) {
                    return Err(IrError::malformed(format!(
                        "equation {i} (`{}`) reads `{name}` before it is defined",
                        eqn.net()
                    )));
                }
            }

            if !defined.insert(eqn.net()) {
                return Err(IrError::malformed(format!(
                    "net `{}` defined more than once",
                    eqn.net()
                )));
            }
        }

        for output in &outputs {
            if !defined.contains(output.as_str()) {
                return Err(IrError::malformed(format!(
                    "output `{output}` is never defined"
                )));
            }
        }

        Ok(Self {
            inputs,
            outputs,
            equations,
        })
    }

    /// Convenience constructor taking string slices, mostly for tests.
    pub fn from_parts(
        inputs: &[&str],
        outputs: &[&str],
        equations: Vec<Equation>,
    ) -> Result<Self, IrError> {
        Self::new(
            inputs.iter().map(|s| s.to_string()).collect(),
            outputs.iter().map(|s| s.to_string()).collect(),
            equations,
        )
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Total number of nets, inputs plus equation-defined nets.
    pub fn num_nets(&self) -> usize {
        self.inputs.len() + self.equations.len()
    }

    /// Multiplicative depth of the circuit, see [`multiplicative_depth`].
    pub fn depth(&self) -> usize {
        multiplicative_depth(&self.equations)
    }

    pub fn stats(&self) -> CircuitStats {
        let mut stats = CircuitStats {
            inputs: self.inputs.len(),
            outputs: self.outputs.len(),
            ..Default::default()
        };

        for eqn in &self.equations {
            match eqn.gate().op() {
                GateOp::AND => stats.and_gates += 1,
                GateOp::XOR => stats.xor_gates += 1,
                GateOp::OR => stats.or_gates += 1,
                GateOp::WIRE => stats.wire_gates += 1,
            }
        }

        stats
    }

    /// Evaluates the circuit directly in plaintext, returning the value of
    /// every net.
    ///
    /// This is the ground truth the encrypted evaluation is checked against
    /// in tests, so it deliberately shares no code with the evaluator.
    pub fn evaluate_plain(
        &self,
        inputs: impl IntoIterator<Item = bool>,
    ) -> Result<HashMap<&str, bool>, IrError> {
        let inputs = inputs.into_iter().collect::<Vec<_>>();
        if inputs.len() != self.inputs.len() {
            return Err(IrError::InputCountMismatch {
                expected: self.inputs.len(),
                got: inputs.len(),
            });
        }

        let mut values: HashMap<&str, bool> = HashMap::with_capacity(self.num_nets());
        for (name, value) in self.inputs.iter().zip(inputs) {
            values.insert(name, value);
        }

        // Fine to evaluate in order since construction checked it's
        // topologically sorted.
        for eqn in &self.equations {
            let read = |op: &Operand| -> bool {
                let v = match op {
                    Operand::Const { value, .. } => *value,
                    Operand::Net { name, .. } => values[name.as_str()],
                };
                v ^ op.is_negated()
            };

            let gate = eqn.gate();
            let left = read(gate.left());
            let value = match (gate.op(), gate.right()) {
                (GateOp::WIRE, _) => left,
                (GateOp::AND, Some(r)) => left & read(r),
                (GateOp::XOR, Some(r)) => left ^ read(r),
                (GateOp::OR, Some(r)) => left | read(r),
                (op, None) => unreachable!("circuit: {op:?} gate without right operand"),
            };

            values.insert(eqn.net(), value);
        }

        Ok(values)
    }

    /// Evaluates the circuit in plaintext and returns just the outputs, in
    /// output order.
    pub fn evaluate_plain_outputs(
        &self,
        inputs: impl IntoIterator<Item = bool>,
    ) -> Result<Vec<bool>, IrError> {
        let values = self.evaluate_plain(inputs)?;
        Ok(self
            .outputs
            .iter()
            .map(|o| values[o.as_str()])
            .collect())
    }
}

/// Gate counts of a circuit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CircuitStats {
    pub inputs: usize,
    pub outputs: usize,
    pub and_gates: usize,
    pub xor_gates: usize,
    pub or_gates: usize,
    pub wire_gates: usize,
}

impl CircuitStats {
    pub fn total_gates(&self) -> usize {
        self.and_gates + self.xor_gates + self.or_gates + self.wire_gates
    }
}
