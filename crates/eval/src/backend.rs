//! Encrypted arithmetic capability the evaluator is generic over.

/// Homomorphic operations over encrypted bits.
///
/// Addition is XOR of the underlying bits and multiplication is AND.  The
/// evaluator never looks inside a ciphertext, it only hands them back to the
/// backend or to a [`Decryptor`].
pub trait Backend {
    /// Encrypted bit.
    type Ciphertext: Clone;

    /// Encrypts a bit.
    fn encrypt(&mut self, value: bool) -> Self::Ciphertext;

    /// Homomorphic XOR.
    fn add(&mut self, a: &Self::Ciphertext, b: &Self::Ciphertext) -> Self::Ciphertext;

    /// Homomorphic AND.  The result usually has to be relinearized before it
    /// takes part in another multiplication.
    fn multiply(&mut self, a: &Self::Ciphertext, b: &Self::Ciphertext) -> Self::Ciphertext;

    /// Brings a ciphertext produced by [`Backend::multiply`] back to its
    /// normal size.
    fn relinearize(&mut self, ct: Self::Ciphertext) -> Self::Ciphertext;
}

/// Holder of the secret needed to read results back.
pub trait Decryptor<C> {
    /// Decrypts a ciphertext.
    fn decrypt(&self, ct: &C) -> bool;
}
