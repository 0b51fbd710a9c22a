use rug::Integer;

use crate::{Arity, Ciphertext, PheKit, Result};

impl PheKit {
    /// Encrypts `round(value * scale)` as a Single ciphertext.
    pub fn encrypt(&self, value: f64) -> Result<Ciphertext> {
        let m: Integer = self.codec.encode(value)?;
        self.seal(Arity::Single, &m, &mut self.branch_source())
    }

    /// Packs `(a, b)` into one plaintext and encrypts it as a Pair ciphertext.
    pub fn encrypt_pair(&self, a: f64, b: f64) -> Result<Ciphertext> {
        let m: Integer = self.codec.encode_pair(a, b)?;
        self.seal(Arity::Pair, &m, &mut self.branch_source())
    }
}
