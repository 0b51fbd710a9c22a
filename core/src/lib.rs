//! Partially homomorphic encryption kit.
//!
//! A [PheKit] binds one scheme ([SchemeType::Ou] or [SchemeType::ElGamal])
//! to one key pair, a fixed-point [Codec] and a thread pool. Reals are
//! encrypted one per ciphertext ([Arity::Single]) or two per ciphertext
//! ([Arity::Pair]), combined with homomorphic additions and subtractions, and
//! decrypted by the holder of the private key. Batch calls apply the same
//! operations element-wise over index-aligned slices.

mod batch;
pub mod ciphertext;
pub mod codec;
pub mod config;
pub mod error;
pub mod keys;
mod kit;
pub mod scheme;

#[cfg(test)]
mod tests;

pub use backend::{ElGamalParams, OuParams};
pub use batch::AbortHandle;
pub use ciphertext::{Arity, Ciphertext, ciphertexts_to_bytes};
pub use codec::{Codec, PairLayout};
pub use config::KitConfig;
pub use error::{ErrorKind, PheError, Result};
pub use keys::{KeyMaterial, PublicKeyHandle};
pub use kit::PheKit;
pub use scheme::{SchemeParams, SchemeType};
