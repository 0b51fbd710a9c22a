//! Native primitives of the additively homomorphic schemes.
//!
//! Each scheme is a zero-sized marker type ([Ou], [ElGamal]) implementing
//! [Backend]. The trait works on signed [rug::Integer] plaintexts: the caller
//! handles fixed-point encoding and only hands over integers.

pub mod api;
mod arith;
pub mod elgamal;
pub mod encoding;
pub mod error;
pub mod ou;
pub mod sampling;
pub mod serialization;

#[cfg(test)]
mod tests;

pub use api::*;
pub use elgamal::{ElGamal, ElGamalCiphertext, ElGamalParams, ElGamalPublicKey, ElGamalSecretKey};
pub use error::BackendError;
pub use ou::{Ou, OuCiphertext, OuParams, OuPublicKey, OuSecretKey};
pub use serialization::{ReaderFrom, WriterTo};

pub use rug::Integer;
