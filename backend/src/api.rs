use std::fmt::Debug;

use rug::Integer;
use sampling::source::Source;

use crate::{BackendError, ReaderFrom, WriterTo};

/// Raw primitives of one additively homomorphic cryptosystem.
///
/// Plaintexts are signed integers. Any `m` with `|m| < 2^capacity_bits(pk)`
/// decrypts back to itself, including after additions and subtractions as
/// long as the running result stays within that range.
pub trait Backend: Sized + Send + Sync + 'static {
    type Params: Clone + Debug + Default + Send + Sync;
    type PublicKey: Clone + Debug + PartialEq + Eq + Send + Sync + WriterTo + ReaderFrom;
    type SecretKey: Send + Sync;
    type Ciphertext: Clone + Debug + PartialEq + Eq + Send + Sync + WriterTo + ReaderFrom;

    const NAME: &'static str;

    fn keygen(params: &Self::Params, source: &mut Source) -> Result<(Self::SecretKey, Self::PublicKey), BackendError>;

    /// Bit length of the public modulus.
    fn key_size(pk: &Self::PublicKey) -> u32;

    /// Number of bits of signed magnitude recoverable by [Backend::decrypt].
    fn capacity_bits(pk: &Self::PublicKey) -> u32;

    fn encrypt(pk: &Self::PublicKey, m: &Integer, source: &mut Source) -> Result<Self::Ciphertext, BackendError>;

    fn decrypt(sk: &Self::SecretKey, pk: &Self::PublicKey, ct: &Self::Ciphertext) -> Result<Integer, BackendError>;

    fn add(pk: &Self::PublicKey, a: &Self::Ciphertext, b: &Self::Ciphertext) -> Self::Ciphertext;

    fn add_inplace(pk: &Self::PublicKey, a: &mut Self::Ciphertext, b: &Self::Ciphertext);

    /// Encryption of `-m` given an encryption of `m`.
    fn negate(pk: &Self::PublicKey, a: &Self::Ciphertext) -> Result<Self::Ciphertext, BackendError>;

    fn sub(pk: &Self::PublicKey, a: &Self::Ciphertext, b: &Self::Ciphertext) -> Result<Self::Ciphertext, BackendError> {
        let mut res: Self::Ciphertext = a.clone();
        Self::sub_inplace(pk, &mut res, b)?;
        Ok(res)
    }

    fn sub_inplace(pk: &Self::PublicKey, a: &mut Self::Ciphertext, b: &Self::Ciphertext) -> Result<(), BackendError> {
        let neg_b: Self::Ciphertext = Self::negate(pk, b)?;
        Self::add_inplace(pk, a, &neg_b);
        Ok(())
    }

    /// Checks that a ciphertext read from bytes is a valid group element for `pk`.
    fn validate(pk: &Self::PublicKey, ct: &Self::Ciphertext) -> Result<(), BackendError>;
}
