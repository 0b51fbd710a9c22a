use crate::{Ciphertext, PheKit, Result};

impl PheKit {
    /// Returns an encryption of `a + b`. Both operands must share scheme, arity and key.
    pub fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        self.check_operands(a, b)?;
        Ok(Ciphertext {
            arity: a.arity,
            key_fingerprint: a.key_fingerprint,
            payload: self.keys.add(&a.payload, &b.payload)?,
        })
    }

    /// Returns an encryption of `a - b`.
    pub fn sub(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        self.check_operands(a, b)?;
        Ok(Ciphertext {
            arity: a.arity,
            key_fingerprint: a.key_fingerprint,
            payload: self.keys.sub(&a.payload, &b.payload)?,
        })
    }

    /// `a <- a + b`. On error `a` is left untouched.
    pub fn add_inplace(&self, a: &mut Ciphertext, b: &Ciphertext) -> Result<()> {
        self.check_operands(a, b)?;
        self.keys.add_inplace(&mut a.payload, &b.payload)
    }

    /// `a <- a - b`. On error `a` is left untouched.
    pub fn sub_inplace(&self, a: &mut Ciphertext, b: &Ciphertext) -> Result<()> {
        self.check_operands(a, b)?;
        self.keys.sub_inplace(&mut a.payload, &b.payload)
    }
}
