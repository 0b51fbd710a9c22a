use itertools::izip;
use rug::Integer;
use tracing::instrument;

use crate::{Arity, Ciphertext, PheError, PheKit, Result};

fn check_non_empty(len: usize) -> Result<()> {
    if len == 0 {
        return Err(PheError::InvalidCiphertext("empty batch".into()));
    }
    Ok(())
}

/// Rejects empty batches and batches whose operand slices are not index-aligned.
fn check_lengths(len_a: usize, len_b: usize) -> Result<()> {
    check_non_empty(len_a)?;
    if len_a != len_b {
        return Err(PheError::InvalidCiphertext(format!(
            "operand lengths differ: {} != {}",
            len_a, len_b
        )));
    }
    Ok(())
}

impl PheKit {
    #[instrument(level = "debug", skip_all, fields(n = values.len()))]
    pub fn encrypts(&self, values: &[f64]) -> Result<Vec<Ciphertext>> {
        check_non_empty(values.len())?;
        self.engine.map_with_source(values, &self.source, |value, source| {
            let m: Integer = self.codec.encode(*value)?;
            self.seal(Arity::Single, &m, source)
        })
    }

    #[instrument(level = "debug", skip_all, fields(n = cts.len()))]
    pub fn decrypts(&self, cts: &[Ciphertext]) -> Result<Vec<f64>> {
        self.require_private_key()?;
        self.check_batch(cts, Arity::Single)?;
        self.engine.map(cts, |ct| {
            let m: Integer = self.keys.decrypt(&ct.payload)?;
            Ok(self.codec.decode(&m))
        })
    }

    /// Encrypts `(a[i], b[i])` as the i-th Pair ciphertext.
    #[instrument(level = "debug", skip_all, fields(n = a.len()))]
    pub fn encrypt_pairs(&self, a: &[f64], b: &[f64]) -> Result<Vec<Ciphertext>> {
        check_lengths(a.len(), b.len())?;
        let pairs: Vec<(f64, f64)> = izip!(a, b).map(|(a, b)| (*a, *b)).collect();
        self.engine.map_with_source(&pairs, &self.source, |(a, b), source| {
            let m: Integer = self.codec.encode_pair(*a, *b)?;
            self.seal(Arity::Pair, &m, source)
        })
    }

    /// Decrypts N Pair ciphertexts into `2N` values: `out[i]` is the first
    /// slot of `cts[i]` and `out[i + N]` its second slot.
    #[instrument(level = "debug", skip_all, fields(n = cts.len()))]
    pub fn decrypt_pairs(&self, cts: &[Ciphertext]) -> Result<Vec<f64>> {
        self.require_private_key()?;
        self.check_batch(cts, Arity::Pair)?;
        let pairs: Vec<(f64, f64)> = self.engine.map(cts, |ct| {
            let m: Integer = self.keys.decrypt(&ct.payload)?;
            Ok(self.codec.decode_pair(&m))
        })?;
        let (mut out, second): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        out.extend(second);
        Ok(out)
    }

    /// Encrypts every value of `a` then `b` separately: `2N` Single ciphertexts
    /// laid out `[a_0..a_{N-1}, b_0..b_{N-1}]`.
    ///
    /// As with [PheKit::encrypt_pairs], a failure reports the pair index `i`
    /// whether it came from `a[i]` or `b[i]`.
    pub fn encrypt_pairs_unpacked(&self, a: &[f64], b: &[f64]) -> Result<Vec<Ciphertext>> {
        check_lengths(a.len(), b.len())?;
        let values: Vec<f64> = a.iter().chain(b).copied().collect();
        self.encrypts(&values).map_err(|err| match err {
            PheError::AtIndex { index, source } if index >= a.len() => PheError::AtIndex {
                index: index - a.len(),
                source,
            },
            err => err,
        })
    }

    /// Inverse of [PheKit::encrypt_pairs_unpacked], with the layout of [PheKit::decrypt_pairs].
    pub fn decrypt_pairs_unpacked(&self, cts: &[Ciphertext]) -> Result<Vec<f64>> {
        if cts.len() % 2 != 0 {
            return Err(PheError::InvalidCiphertext(format!(
                "unpacked pairs need an even number of ciphertexts, got {}",
                cts.len()
            )));
        }
        self.decrypts(cts)
    }

    #[instrument(level = "debug", skip_all, fields(n = a.len()))]
    pub fn adds(&self, a: &[Ciphertext], b: &[Ciphertext]) -> Result<Vec<Ciphertext>> {
        let operands: Vec<(&Ciphertext, &Ciphertext)> = self.check_operand_batch(a, b)?;
        self.engine.map(&operands, |(a, b)| self.combine(a, b, false))
    }

    #[instrument(level = "debug", skip_all, fields(n = a.len()))]
    pub fn subs(&self, a: &[Ciphertext], b: &[Ciphertext]) -> Result<Vec<Ciphertext>> {
        let operands: Vec<(&Ciphertext, &Ciphertext)> = self.check_operand_batch(a, b)?;
        self.engine.map(&operands, |(a, b)| self.combine(a, b, true))
    }

    /// `a[i] <- a[i] + b[i]`. Every index is checked before any ciphertext is modified.
    #[instrument(level = "debug", skip_all, fields(n = a.len()))]
    pub fn add_inplaces(&self, a: &mut [Ciphertext], b: &[Ciphertext]) -> Result<()> {
        self.check_operand_batch(a, b)?;
        self.engine
            .for_each_mut(a, b, |a, b| self.keys.add_inplace(&mut a.payload, &b.payload))
    }

    /// `a[i] <- a[i] - b[i]`. Every index is checked before any ciphertext is modified.
    #[instrument(level = "debug", skip_all, fields(n = a.len()))]
    pub fn sub_inplaces(&self, a: &mut [Ciphertext], b: &[Ciphertext]) -> Result<()> {
        self.check_operand_batch(a, b)?;
        self.engine
            .for_each_mut(a, b, |a, b| self.keys.sub_inplace(&mut a.payload, &b.payload))
    }

    /// Parses a ciphertext and checks that it belongs to this kit's key.
    pub fn ciphertext_from_bytes(&self, bytes: &[u8]) -> Result<Ciphertext> {
        let ct: Ciphertext = Ciphertext::from_bytes(bytes)?;
        self.check_owned(&ct, ct.arity)?;
        self.keys.validate(&ct.payload)?;
        Ok(ct)
    }

    #[instrument(level = "debug", skip_all, fields(n = bytes.len()))]
    pub fn ciphertexts_from_bytes<B: AsRef<[u8]> + Sync>(&self, bytes: &[B]) -> Result<Vec<Ciphertext>> {
        check_non_empty(bytes.len())?;
        self.engine.map(bytes, |bytes| self.ciphertext_from_bytes(bytes.as_ref()))
    }

    fn combine(&self, a: &Ciphertext, b: &Ciphertext, subtract: bool) -> Result<Ciphertext> {
        Ok(Ciphertext {
            arity: a.arity,
            key_fingerprint: a.key_fingerprint,
            payload: if subtract {
                self.keys.sub(&a.payload, &b.payload)?
            } else {
                self.keys.add(&a.payload, &b.payload)?
            },
        })
    }

    fn check_batch(&self, cts: &[Ciphertext], arity: Arity) -> Result<()> {
        check_non_empty(cts.len())?;
        cts.iter()
            .enumerate()
            .try_for_each(|(i, ct)| self.check_owned(ct, arity).map_err(|err| err.at(i)))
    }

    fn check_operand_batch<'a>(
        &self,
        a: &'a [Ciphertext],
        b: &'a [Ciphertext],
    ) -> Result<Vec<(&'a Ciphertext, &'a Ciphertext)>> {
        check_lengths(a.len(), b.len())?;
        izip!(a, b)
            .enumerate()
            .map(|(i, (a, b))| {
                self.check_operands(a, b).map_err(|err| err.at(i))?;
                Ok((a, b))
            })
            .collect()
    }
}
