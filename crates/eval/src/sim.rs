//! Noise budget simulation backend.
//!
//! This is not an encryption scheme.  A [`SimCiphertext`] carries its bit in
//! the clear next to the bookkeeping a leveled scheme would do: how many
//! multiplicative levels it has consumed and how many components it has.
//! Decrypting a ciphertext that consumed more levels than the parameters
//! provide returns garbage (the complement of the bit), the same way noise
//! overflow shows up in a real scheme, so an undersized level budget is
//! caught by output validation.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::backend::{Backend, Decryptor};

/// Parameters of the simulated scheme.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SimParams {
    /// Security level in bits.
    pub security: u32,

    /// Multiplicative levels available before decryption fails.
    pub levels: usize,

    /// Modulus bits consumed per level.
    pub bits_per_level: u32,

    /// Columns of the key-switching matrix.
    pub key_switch_columns: u32,
}

impl SimParams {
    pub const DEFAULT_SECURITY: u32 = 128;
    pub const DEFAULT_BITS_PER_LEVEL: u32 = 30;
    pub const DEFAULT_KEY_SWITCH_COLUMNS: u32 = 2;

    /// Parameters with exactly enough levels for a circuit of this
    /// multiplicative depth.
    pub fn for_depth(depth: usize) -> Self {
        Self {
            security: Self::DEFAULT_SECURITY,
            levels: depth,
            bits_per_level: Self::DEFAULT_BITS_PER_LEVEL,
            key_switch_columns: Self::DEFAULT_KEY_SWITCH_COLUMNS,
        }
    }

    /// Total bits in the modulus chain.
    pub fn modulus_bits(&self) -> usize {
        self.levels * self.bits_per_level as usize
    }
}

/// Simulated ciphertext.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SimCiphertext {
    bit: bool,
    nonce: u64,
    level: usize,
    components: u8,
}

impl SimCiphertext {
    const FRESH_COMPONENTS: u8 = 2;

    /// Multiplicative levels consumed so far.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Number of ring elements, 2 when fresh or relinearized.
    pub fn components(&self) -> u8 {
        self.components
    }

    /// Randomness that makes two encryptions of the same bit differ.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }
}

/// Operations issued against a [`SimBackend`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SimCounters {
    pub encryptions: u64,
    pub additions: u64,
    pub multiplications: u64,
    pub relinearizations: u64,

    /// Deepest level any produced ciphertext reached.
    pub max_level: usize,
}

/// Public half of a simulated key pair.
#[derive(Debug)]
pub struct SimBackend {
    params: SimParams,
    rng: ChaCha20Rng,
    counters: SimCounters,
}

/// Secret half of a simulated key pair.
#[derive(Clone, Debug)]
pub struct SimSecretKey {
    params: SimParams,
}

impl SimBackend {
    /// Generates a key pair.  Encryption randomness is drawn from a generator
    /// seeded off `rng`.
    pub fn keygen<R: RngCore>(params: SimParams, rng: &mut R) -> (Self, SimSecretKey) {
        let backend = Self {
            params,
            rng: ChaCha20Rng::from_rng(rng),
            counters: SimCounters::default(),
        };
        (backend, SimSecretKey { params })
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn counters(&self) -> SimCounters {
        self.counters
    }

    fn produced(&mut self, ct: SimCiphertext) -> SimCiphertext {
        self.counters.max_level = self.counters.max_level.max(ct.level);
        ct
    }
}

impl Backend for SimBackend {
    type Ciphertext = SimCiphertext;

    fn encrypt(&mut self, value: bool) -> SimCiphertext {
        self.counters.encryptions += 1;
        SimCiphertext {
            bit: value,
            nonce: self.rng.random(),
            level: 0,
            components: SimCiphertext::FRESH_COMPONENTS,
        }
    }

    fn add(&mut self, a: &SimCiphertext, b: &SimCiphertext) -> SimCiphertext {
        self.counters.additions += 1;
        self.produced(SimCiphertext {
            bit: a.bit ^ b.bit,
            nonce: a.nonce.rotate_left(17) ^ b.nonce,
            level: a.level.max(b.level),
            components: a.components.max(b.components),
        })
    }

    fn multiply(&mut self, a: &SimCiphertext, b: &SimCiphertext) -> SimCiphertext {
        self.counters.multiplications += 1;
        self.produced(SimCiphertext {
            bit: a.bit & b.bit,
            nonce: a.nonce.wrapping_mul(b.nonce | 1),
            level: a.level.max(b.level) + 1,
            components: a.components.saturating_add(b.components).saturating_sub(1),
        })
    }

    fn relinearize(&mut self, ct: SimCiphertext) -> SimCiphertext {
        self.counters.relinearizations += 1;
        SimCiphertext {
            components: SimCiphertext::FRESH_COMPONENTS,
            ..ct
        }
    }
}

impl SimSecretKey {
    pub fn params(&self) -> &SimParams {
        &self.params
    }
}

impl Decryptor<SimCiphertext> for SimSecretKey {
    fn decrypt(&self, ct: &SimCiphertext) -> bool {
        if ct.level > self.params.levels {
            // Noise overflowed, the result is meaningless.
            !ct.bit
        } else {
            ct.bit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(levels: usize) -> (SimBackend, SimSecretKey) {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        SimBackend::keygen(SimParams::for_depth(levels), &mut rng)
    }

    #[test]
    fn test_params() {
        let p = SimParams::for_depth(4);
        assert_eq!(p.security, 128);
        assert_eq!(p.modulus_bits(), 120);
        assert_eq!(p.key_switch_columns, 2);
    }

    #[test]
    fn test_fresh_encryptions_differ() {
        let (mut be, sk) = keys(1);
        let a = be.encrypt(true);
        let b = be.encrypt(true);
        assert_ne!(a.nonce(), b.nonce());
        assert!(sk.decrypt(&a) && sk.decrypt(&b));
        assert_eq!(be.counters().encryptions, 2);
    }

    #[test]
    fn test_components_and_levels() {
        let (mut be, sk) = keys(1);
        let a = be.encrypt(true);
        let b = be.encrypt(false);

        let sum = be.add(&a, &b);
        assert_eq!((sum.level(), sum.components()), (0, 2));
        assert!(sk.decrypt(&sum));

        let prod = be.multiply(&a, &a);
        assert_eq!((prod.level(), prod.components()), (1, 3));
        let prod = be.relinearize(prod);
        assert_eq!(prod.components(), 2);
        assert!(sk.decrypt(&prod));

        let counters = be.counters();
        assert_eq!(counters.multiplications, 1);
        assert_eq!(counters.relinearizations, 1);
        assert_eq!(counters.max_level, 1);
    }

    #[test]
    fn test_budget_exhaustion_flips() {
        let (mut be, sk) = keys(1);
        let a = be.encrypt(true);
        let p1 = be.multiply(&a, &a);
        let p1 = be.relinearize(p1);
        let p2 = be.multiply(&p1, &a);
        assert_eq!(p2.level(), 2);
        assert!(!sk.decrypt(&p2));
    }

    #[test]
    fn test_chained_multiplies_without_relinearizing() {
        let (mut be, sk) = keys(300);
        let fresh = be.encrypt(true);
        let mut acc = fresh;
        for _ in 0..300 {
            acc = be.multiply(&acc, &fresh);
        }
        assert_eq!(acc.level(), 300);
        assert_eq!(acc.components(), u8::MAX);
        assert!(sk.decrypt(&acc));

        let acc = be.relinearize(acc);
        assert_eq!(acc.components(), 2);
    }

    #[test]
    fn test_same_seed_same_nonces() {
        let (mut a, _) = keys(0);
        let (mut b, _) = keys(0);
        assert_eq!(a.encrypt(false), b.encrypt(false));
    }
}
