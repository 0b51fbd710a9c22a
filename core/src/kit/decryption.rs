use rug::Integer;

use crate::{Arity, Ciphertext, PheError, PheKit, Result};

impl PheKit {
    pub fn decrypt(&self, ct: &Ciphertext) -> Result<f64> {
        let m: Integer = self.open(ct, Arity::Single)?;
        Ok(self.codec.decode(&m))
    }

    pub fn decrypt_pair(&self, ct: &Ciphertext) -> Result<(f64, f64)> {
        let m: Integer = self.open(ct, Arity::Pair)?;
        Ok(self.codec.decode_pair(&m))
    }

    fn open(&self, ct: &Ciphertext, arity: Arity) -> Result<Integer> {
        self.require_private_key()?;
        self.check_owned(ct, arity)?;
        self.keys.decrypt(&ct.payload)
    }

    pub(super) fn require_private_key(&self) -> Result<()> {
        if !self.keys.has_private_key() {
            return Err(PheError::NoPrivateKey);
        }
        Ok(())
    }
}
