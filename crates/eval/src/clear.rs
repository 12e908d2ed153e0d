//! Plaintext backend.

use crate::backend::{Backend, Decryptor};

/// Backend whose ciphertexts are the bits themselves.
///
/// Only useful for tests and for checking the evaluator's plumbing.  It is its
/// own [`Decryptor`].
#[derive(Copy, Clone, Debug, Default)]
pub struct ClearBackend;

impl Backend for ClearBackend {
    type Ciphertext = bool;

    fn encrypt(&mut self, value: bool) -> bool {
        value
    }

    fn add(&mut self, a: &bool, b: &bool) -> bool {
        a ^ b
    }

    fn multiply(&mut self, a: &bool, b: &bool) -> bool {
        a & b
    }

    fn relinearize(&mut self, ct: bool) -> bool {
        ct
    }
}

impl Decryptor<bool> for ClearBackend {
    fn decrypt(&self, ct: &bool) -> bool {
        *ct
    }
}
