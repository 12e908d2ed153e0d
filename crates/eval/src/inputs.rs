//! Input assignment helpers.

use bitvec::slice::BitSlice;
use bitvec::vec::BitVec;
use rand::Rng;

use crate::error::EvalError;

/// Draws `n` uniformly random input bits.
pub fn random_inputs<R: Rng>(rng: &mut R, n: usize) -> BitVec {
    (0..n).map(|_| rng.random::<bool>()).collect()
}

/// Parses a string of `0`/`1` characters, first character first.  `_` is
/// accepted as a separator and skipped.
pub fn parse_bits(s: &str) -> Result<BitVec, EvalError> {
    let mut bits = BitVec::with_capacity(s.len());
    for (position, c) in s.chars().enumerate() {
        match c {
            '0' => bits.push(false),
            '1' => bits.push(true),
            '_' => {}
            found => return Err(EvalError::InvalidInputBit { position, found }),
        }
    }
    Ok(bits)
}

/// Renders bits the way [`parse_bits`] reads them.
pub fn format_bits(bits: &BitSlice) -> String {
    bits.iter().map(|b| if *b { '1' } else { '0' }).collect()
}

pub(crate) fn check_input_count(expected: usize, got: usize) -> Result<(), EvalError> {
    if expected != got {
        return Err(EvalError::InputCountMismatch { expected, got });
    }
    Ok(())
}
