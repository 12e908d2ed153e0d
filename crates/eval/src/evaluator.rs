//! Gate-by-gate encrypted evaluation with a plaintext shadow.

use bitvec::slice::BitSlice;
use heckt_ir::{Equation, GateOp, Operand};
use heckt_regalloc::{NetIdx, RegisterAllocator, SlotIdx};
use tracing::{error, trace};

use crate::backend::{Backend, Decryptor};
use crate::error::EvalError;
use crate::inputs::check_input_count;
use crate::regfile::RegisterFile;
use crate::report::{OutputValue, ValidationReport};

/// Evaluation instance for a circuit over some backend.
///
/// Every slot of the register file holds a ciphertext along with the plain
/// bit it should decrypt to.  Gates are fed in equation order and write their
/// result into the slot the allocator picked for their net.
#[derive(Debug)]
pub struct Evaluator<'a, B: Backend> {
    backend: B,
    alloc: &'a RegisterAllocator,
    regs: RegisterFile<B::Ciphertext>,

    /// Encryptions of the two constants, made once.
    enc_false: B::Ciphertext,
    enc_true: B::Ciphertext,

    stats: EvalStats,
}

impl<'a, B: Backend> Evaluator<'a, B> {
    /// Encrypts the inputs into their slots.
    pub fn new(
        inputs: &[String],
        mut backend: B,
        alloc: &'a RegisterAllocator,
        values: &BitSlice,
    ) -> Result<Self, EvalError> {
        check_input_count(inputs.len(), values.len())?;

        let enc_false = backend.encrypt(false);
        let enc_true = backend.encrypt(true);
        let mut stats = EvalStats {
            encryptions: 2,
            ..Default::default()
        };

        let mut regs = RegisterFile::new(alloc.slot_count());
        for (name, value) in inputs.iter().zip(values.iter().by_vals()) {
            let (net, slot) = locate(alloc, name)?;
            regs.write(slot, net, backend.encrypt(value), value);
            stats.encryptions += 1;
        }

        Ok(Self {
            backend,
            alloc,
            regs,
            enc_false,
            enc_true,
            stats,
        })
    }

    /// Feeds every equation in order.
    pub fn evaluate(&mut self, equations: &[Equation]) -> Result<(), EvalError> {
        for eqn in equations {
            self.feed_gate(eqn)?;
        }
        Ok(())
    }

    /// Evaluates a single equation and writes its result back.
    ///
    /// Both operands are read before the result is stored, so the result may
    /// take over the slot of an operand it consumes for the last time.
    pub fn feed_gate(&mut self, eqn: &Equation) -> Result<(), EvalError> {
        let gate = eqn.gate();
        let (net, out) = locate(self.alloc, eqn.net())?;

        let (ct, bit) = match (gate.op(), gate.right()) {
            (GateOp::AND, Some(right)) => self.feed_and_gate(gate.left(), right)?,
            (GateOp::OR, Some(right)) => self.feed_or_gate(gate.left(), right)?,
            (GateOp::XOR, Some(right)) => self.feed_xor_gate(gate.left(), right)?,
            (GateOp::WIRE, _) => self.feed_wire_gate(gate.left())?,
            (op, None) => unreachable!("evaluator: {op:?} gate without right operand"),
        };

        trace!(
            net = eqn.net(),
            slot = u32::from(out),
            %gate,
            value = bit,
            "gate"
        );

        self.regs.write(out, net, ct, bit);
        Ok(())
    }

    fn feed_and_gate(
        &mut self,
        left: &Operand,
        right: &Operand,
    ) -> Result<(B::Ciphertext, bool), EvalError> {
        let (l, lv) = self.resolve(left)?;
        let (r, rv) = self.resolve(right)?;

        let prod = self.backend.multiply(&l, &r);
        let ct = self.backend.relinearize(prod);
        self.stats.multiplications += 1;
        self.stats.relinearizations += 1;
        self.stats.and_gates += 1;

        Ok((ct, lv & rv))
    }

    /// `l | r == !(!l & !r)`, one multiplication and one addition of true.
    fn feed_or_gate(
        &mut self,
        left: &Operand,
        right: &Operand,
    ) -> Result<(B::Ciphertext, bool), EvalError> {
        let (l, lv) = self.resolve(&left.inverted())?;
        let (r, rv) = self.resolve(&right.inverted())?;

        let prod = self.backend.multiply(&l, &r);
        let sum = self.backend.add(&prod, &self.enc_true);
        let ct = self.backend.relinearize(sum);
        self.stats.multiplications += 1;
        self.stats.additions += 1;
        self.stats.relinearizations += 1;
        self.stats.or_gates += 1;

        Ok((ct, !(lv & rv)))
    }

    fn feed_xor_gate(
        &mut self,
        left: &Operand,
        right: &Operand,
    ) -> Result<(B::Ciphertext, bool), EvalError> {
        let (l, lv) = self.resolve(left)?;
        let (r, rv) = self.resolve(right)?;

        let ct = self.backend.add(&l, &r);
        self.stats.additions += 1;
        self.stats.xor_gates += 1;

        Ok((ct, lv ^ rv))
    }

    fn feed_wire_gate(&mut self, input: &Operand) -> Result<(B::Ciphertext, bool), EvalError> {
        self.stats.wire_gates += 1;
        self.resolve(input)
    }

    /// Gets the value an operand refers to with its polarity applied.
    fn resolve(&mut self, op: &Operand) -> Result<(B::Ciphertext, bool), EvalError> {
        let (ct, bit) = match op {
            Operand::Const { value: true, .. } => (self.enc_true.clone(), true),
            Operand::Const { value: false, .. } => (self.enc_false.clone(), false),
            Operand::Net { name, .. } => {
                let (net, slot) = locate(self.alloc, name)?;
                let (ct, bit) = self
                    .regs
                    .read(slot, net)
                    .ok_or_else(|| EvalError::UseOfUnallocatedNet(name.clone()))?;
                (ct.clone(), bit)
            }
        };

        if !op.is_negated() {
            return Ok((ct, bit));
        }

        let ct = self.backend.add(&ct, &self.enc_true);
        self.stats.additions += 1;
        Ok((ct, !bit))
    }

    /// Decrypts every output and compares it against its shadow value.
    ///
    /// Mismatches are logged one by one and returned together as
    /// [`EvalError::ValidationMismatch`].
    pub fn validate<D: Decryptor<B::Ciphertext>>(
        &self,
        outputs: &[String],
        decryptor: &D,
    ) -> Result<ValidationReport, EvalError> {
        let mut values = Vec::with_capacity(outputs.len());

        for name in outputs {
            let (net, slot) = locate(self.alloc, name)?;
            let (ct, shadow) = self
                .regs
                .read(slot, net)
                .ok_or_else(|| EvalError::UseOfUnallocatedNet(name.clone()))?;

            let value = OutputValue {
                net: name.clone(),
                decrypted: decryptor.decrypt(ct),
                shadow,
            };
            if !value.is_match() {
                error!(
                    net = %name,
                    decrypted = value.decrypted,
                    shadow = value.shadow,
                    "output mismatch"
                );
            }
            values.push(value);
        }

        let report = ValidationReport::new(values);
        if !report.is_ok() {
            return Err(EvalError::ValidationMismatch {
                mismatches: report.mismatches().cloned().collect(),
            });
        }

        Ok(report)
    }

    /// Shadow value of a net, if it's still held in its slot.
    pub fn shadow_value(&self, name: &str) -> Option<bool> {
        let net = self.alloc.net_idx(name)?;
        self.regs
            .read(self.alloc.slot_of(net), net)
            .map(|(_, bit)| bit)
    }

    /// Ciphertext of a net, if it's still held in its slot.
    pub fn ciphertext(&self, name: &str) -> Option<&B::Ciphertext> {
        let net = self.alloc.net_idx(name)?;
        self.regs.read(self.alloc.slot_of(net), net).map(|(ct, _)| ct)
    }

    pub fn stats(&self) -> EvalStats {
        EvalStats {
            releases: self.regs.releases(),
            live_slots: self.regs.occupied(),
            ..self.stats
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}

fn locate(alloc: &RegisterAllocator, name: &str) -> Result<(NetIdx, SlotIdx), EvalError> {
    let net = alloc
        .net_idx(name)
        .ok_or_else(|| EvalError::UnknownNet(name.to_owned()))?;
    Ok((net, alloc.slot_of(net)))
}

/// Counters for an evaluation run.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct EvalStats {
    pub and_gates: u64,
    pub xor_gates: u64,
    pub or_gates: u64,
    pub wire_gates: u64,

    /// Slot occupants overwritten by a later net.
    pub releases: u64,

    /// Slots holding a value right now.
    pub live_slots: usize,

    pub encryptions: u64,
    pub additions: u64,
    pub multiplications: u64,
    pub relinearizations: u64,
}

impl EvalStats {
    pub fn gates(&self) -> u64 {
        self.and_gates + self.xor_gates + self.or_gates + self.wire_gates
    }
}

#[cfg(test)]
mod tests {
    use bitvec::bitvec;
    use bitvec::order::Lsb0;
    use heckt_ir::{Circuit, Gate};

    use super::*;
    use crate::clear::ClearBackend;

    fn run(circuit: &Circuit, bits: &BitSlice) -> (Vec<bool>, EvalStats) {
        let alloc = RegisterAllocator::from_circuit(circuit).unwrap();
        let mut ev = Evaluator::new(circuit.inputs(), ClearBackend, &alloc, bits).unwrap();
        ev.evaluate(circuit.equations()).unwrap();
        let report = ev.validate(circuit.outputs(), &ClearBackend).unwrap();
        (report.values().collect(), ev.stats())
    }

    #[test]
    fn test_polarity_on_constants() {
        let c = Circuit::from_parts(
            &["a"],
            &["x", "y"],
            vec![
                Equation::new("x", Gate::xor(Operand::net("a"), Operand::Const {
                    value: true,
                    negated: true,
                })),
                Equation::new("y", Gate::wire(Operand::Const {
                    value: false,
                    negated: true,
                })),
            ],
        )
        .unwrap();
        let (out, _) = run(&c, bitvec![usize, Lsb0; 1].as_bitslice());
        assert_eq!(out, vec![true, true]);
    }

    #[test]
    fn test_stats() {
        let c = Circuit::from_parts(
            &["a", "b"],
            &["o"],
            vec![
                Equation::new("t", Gate::and(Operand::net("a"), Operand::not_net("b"))),
                Equation::new("o", Gate::or(Operand::net("t"), Operand::net("a"))),
            ],
        )
        .unwrap();
        let (out, stats) = run(&c, bitvec![usize, Lsb0; 1, 0].as_bitslice());
        assert_eq!(out, vec![true]);

        assert_eq!(stats.gates(), 2);
        assert_eq!(stats.multiplications, 2);
        assert_eq!(stats.relinearizations, 2);
        // One for !b, two for the OR's inverted operands, one for `+ true`.
        assert_eq!(stats.additions, 4);
        assert_eq!(stats.encryptions, 4);
    }

    #[test]
    fn test_shadow_value_tracks_slot_reuse() {
        let c = Circuit::from_parts(
            &["a"],
            &["y"],
            vec![
                Equation::new("t", Gate::wire(Operand::not_net("a"))),
                Equation::new("y", Gate::wire(Operand::not_net("t"))),
            ],
        )
        .unwrap();
        let alloc = RegisterAllocator::from_circuit(&c).unwrap();
        assert_eq!(alloc.slot_count(), 1);

        let bits = bitvec![usize, Lsb0; 1];
        let mut ev = Evaluator::new(c.inputs(), ClearBackend, &alloc, &bits).unwrap();
        assert_eq!(ev.shadow_value("a"), Some(true));

        ev.evaluate(c.equations()).unwrap();
        assert_eq!(ev.shadow_value("y"), Some(true));
        assert_eq!(ev.shadow_value("a"), None);
        assert_eq!(ev.shadow_value("nope"), None);
        assert_eq!(ev.stats().releases, 2);
        assert_eq!(ev.stats().live_slots, 1);
    }
}
