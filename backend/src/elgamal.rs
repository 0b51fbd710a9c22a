//! Exponential ("lifted") ElGamal over a Schnorr group.
//!
//! `p = kq + 1`, `g` generates the order-`q` subgroup of `Z_p^*`, `y = g^x`.
//! `E(m) = (g^r, g^m y^r)`. Decryption recovers `g^m` and solves the discrete
//! logarithm with baby-step giant-step over a bounded signed range, so only
//! small plaintexts are recoverable.

use std::io::{Read, Result as IoResult, Write};
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Instant;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use rug::{Integer, integer::IsPrime};
use sampling::source::Source;
use utils::map::Map;

use crate::{
    Backend, BackendError,
    arith::{in_group, invert, mul_mod, mul_mod_assign, pow_mod},
    encoding::to_residue,
    sampling::SampleInteger,
    serialization::{ReaderFrom, WriterTo, read_integer, write_integer},
};

pub const ELGAMAL_MIN_ORDER_BITS: u32 = 64;
pub const ELGAMAL_MAX_TABLE_BITS: u32 = 24;

const PRIMALITY_REPS: u32 = 30;

pub struct ElGamal;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElGamalParams {
    /// Bit length of the group modulus `p`.
    pub key_size: u32,
    /// Bit length of the subgroup order `q`.
    pub order_bits: u32,
    /// Base two logarithm of the baby-step table size.
    pub table_bits: u32,
}

impl Default for ElGamalParams {
    fn default() -> Self {
        Self {
            key_size: 2048,
            order_bits: 256,
            table_bits: 18,
        }
    }
}

impl ElGamalParams {
    pub fn new(key_size: u32, order_bits: u32, table_bits: u32) -> Self {
        Self {
            key_size,
            order_bits,
            table_bits,
        }
    }

    fn check(&self) -> Result<(), BackendError> {
        if self.order_bits < ELGAMAL_MIN_ORDER_BITS {
            return Err(BackendError::InvalidParams(format!(
                "ElGamal order_bits={} < {}",
                self.order_bits, ELGAMAL_MIN_ORDER_BITS
            )));
        }
        if self.key_size < self.order_bits + 32 {
            return Err(BackendError::InvalidParams(format!(
                "ElGamal key_size={} < order_bits+32={}",
                self.key_size,
                self.order_bits + 32
            )));
        }
        if self.table_bits == 0 || self.table_bits > ELGAMAL_MAX_TABLE_BITS || 2 * self.table_bits >= self.order_bits {
            return Err(BackendError::InvalidParams(format!(
                "ElGamal table_bits={} outside [1, {}] or 2*table_bits >= order_bits={}",
                self.table_bits, ELGAMAL_MAX_TABLE_BITS, self.order_bits
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElGamalPublicKey {
    pub(crate) p: Integer,
    pub(crate) q: Integer,
    pub(crate) g: Integer,
    pub(crate) y: Integer,
    pub(crate) table_bits: u32,
}

pub struct ElGamalSecretKey {
    x: Integer,
    table: OnceLock<DlogTable>,
    // Held while the table is built so concurrent first decryptions build it once.
    building: Mutex<()>,
    #[cfg(test)]
    pub(crate) table_builds: AtomicUsize,
}

impl ElGamalSecretKey {
    fn new(x: Integer) -> Self {
        Self {
            x,
            table: OnceLock::new(),
            building: Mutex::new(()),
            #[cfg(test)]
            table_builds: AtomicUsize::new(0),
        }
    }

    /// Returns true once the discrete-log table has been built.
    pub fn has_table(&self) -> bool {
        self.table.get().is_some()
    }

    pub(crate) fn table(&self, pk: &ElGamalPublicKey) -> Result<&DlogTable, BackendError> {
        if let Some(table) = self.table.get() {
            return Ok(table);
        }
        let _guard = self.building.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = self.table.get() {
            return Ok(table);
        }
        let built: DlogTable = DlogTable::build(pk)?;
        #[cfg(test)]
        self.table_builds.fetch_add(1, Ordering::Relaxed);
        Ok(self.table.get_or_init(|| built))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElGamalCiphertext {
    pub(crate) c1: Integer,
    pub(crate) c2: Integer,
}

/// Baby-step giant-step table for `g`.
///
/// Baby steps are keyed by the low 64 bits of `g^j`. Every `j` sharing a key
/// is kept (the first in `baby`, the rest in `collisions`) and each hit is
/// confirmed by exponentiation.
pub(crate) struct DlogTable {
    pub(crate) baby: Map<u64, u32>,
    pub(crate) collisions: Map<u64, Vec<u32>>,
    // g^(-2^table_bits)
    giant: Integer,
    // g^(2^(2*table_bits-1))
    pub(crate) offset: Integer,
    table_bits: u32,
}

impl DlogTable {
    pub(crate) fn build(pk: &ElGamalPublicKey) -> Result<Self, BackendError> {
        let now: Instant = Instant::now();
        let steps: u32 = 1 << pk.table_bits;
        let mut baby: Map<u64, u32> = Map::with_capacity(steps as usize);
        let mut collisions: Map<u64, Vec<u32>> = Map::new();
        let mut acc: Integer = Integer::from(1u32);
        (0..steps).for_each(|j| {
            let key: u64 = acc.to_u64_wrapping();
            if baby.get(&key).is_none() {
                baby.insert(key, j);
            } else if let Some(js) = collisions.get_mut(&key) {
                js.push(j);
            } else {
                collisions.insert(key, vec![j]);
            }
            mul_mod_assign(&mut acc, &pk.g, &pk.p);
        });
        // acc = g^(2^table_bits)
        let giant: Integer = invert(&acc, &pk.p)?;
        let offset_exp: Integer = Integer::from(1u32) << (2 * pk.table_bits - 1);
        let offset: Integer = pow_mod(&pk.g, &offset_exp, &pk.p)?;

        tracing::debug!(
            scheme = ElGamal::NAME,
            table_bits = pk.table_bits,
            entries = baby.len(),
            collisions = collisions.len(),
            elapsed_ms = now.elapsed().as_millis() as u64,
            "built discrete-log table"
        );

        Ok(Self {
            baby,
            collisions,
            giant,
            offset,
            table_bits: pk.table_bits,
        })
    }

    /// Returns m with g^m = gm and -2^(2t-1) <= m < 2^(2t-1).
    pub(crate) fn solve(&self, pk: &ElGamalPublicKey, gm: &Integer) -> Result<Integer, BackendError> {
        let steps: u64 = 1 << self.table_bits;
        let half_range: u64 = 1 << (2 * self.table_bits - 1);

        // g^(m + 2^(2t-1)) with m + 2^(2t-1) in [0, 2^(2t)).
        let shifted: Integer = mul_mod(gm, &self.offset, &pk.p);
        let mut gamma: Integer = shifted.clone();
        for i in 0..steps {
            let key: u64 = gamma.to_u64_wrapping();
            if let Some(&first) = self.baby.get(&key) {
                let rest: &[u32] = self.collisions.get(&key).map(Vec::as_slice).unwrap_or(&[]);
                for &j in std::iter::once(&first).chain(rest) {
                    let candidate: Integer = Integer::from(i * steps + j as u64);
                    if pow_mod(&pk.g, &candidate, &pk.p)? == shifted {
                        return Ok(candidate - half_range);
                    }
                }
            }
            mul_mod_assign(&mut gamma, &self.giant, &pk.p);
        }

        Err(BackendError::DiscreteLogOutOfRange {
            bits: 2 * self.table_bits - 1,
        })
    }
}

impl Backend for ElGamal {
    type Params = ElGamalParams;
    type PublicKey = ElGamalPublicKey;
    type SecretKey = ElGamalSecretKey;
    type Ciphertext = ElGamalCiphertext;

    const NAME: &'static str = "ElGamal";

    fn keygen(
        params: &ElGamalParams,
        source: &mut Source,
    ) -> Result<(ElGamalSecretKey, ElGamalPublicKey), BackendError> {
        params.check()?;

        let now: Instant = Instant::now();
        let q: Integer = source.next_prime(params.order_bits);
        let cofactor_bits: u32 = params.key_size - params.order_bits;

        let (p, cofactor) = loop {
            let mut k: Integer = source.next_integer_bits(cofactor_bits);
            k.set_bit(cofactor_bits - 1, true);
            k.set_bit(0, false);
            let p: Integer = Integer::from(&k * &q) + 1u32;
            if p.significant_bits() == params.key_size && p.is_probably_prime(PRIMALITY_REPS) != IsPrime::No {
                break (p, k);
            }
        };

        let two: Integer = Integer::from(2u32);
        let p_minus_one: Integer = Integer::from(&p - 1u32);
        let g: Integer = loop {
            let h: Integer = source.next_integer_range(&two, &p_minus_one);
            let g: Integer = pow_mod(&h, &cofactor, &p)?;
            if g != 1 {
                break g;
            }
        };

        let x: Integer = source.next_integer_range(&Integer::from(1u32), &q);
        let y: Integer = pow_mod(&g, &x, &p)?;

        tracing::debug!(
            scheme = Self::NAME,
            key_size = params.key_size,
            order_bits = params.order_bits,
            elapsed_ms = now.elapsed().as_millis() as u64,
            "generated key pair"
        );

        Ok((
            ElGamalSecretKey::new(x),
            ElGamalPublicKey {
                p,
                q,
                g,
                y,
                table_bits: params.table_bits,
            },
        ))
    }

    fn key_size(pk: &ElGamalPublicKey) -> u32 {
        pk.p.significant_bits()
    }

    fn capacity_bits(pk: &ElGamalPublicKey) -> u32 {
        2 * pk.table_bits - 1
    }

    fn encrypt(pk: &ElGamalPublicKey, m: &Integer, source: &mut Source) -> Result<ElGamalCiphertext, BackendError> {
        let exp: Integer = to_residue(m, &pk.q);
        let r: Integer = source.next_integer_range(&Integer::from(1u32), &pk.q);
        let c1: Integer = pow_mod(&pk.g, &r, &pk.p)?;
        let gm: Integer = pow_mod(&pk.g, &exp, &pk.p)?;
        let yr: Integer = pow_mod(&pk.y, &r, &pk.p)?;
        Ok(ElGamalCiphertext {
            c1,
            c2: mul_mod(&gm, &yr, &pk.p),
        })
    }

    fn decrypt(
        sk: &ElGamalSecretKey,
        pk: &ElGamalPublicKey,
        ct: &ElGamalCiphertext,
    ) -> Result<Integer, BackendError> {
        let s: Integer = pow_mod(&ct.c1, &sk.x, &pk.p)?;
        let gm: Integer = mul_mod(&ct.c2, &invert(&s, &pk.p)?, &pk.p);

        sk.table(pk)?.solve(pk, &gm)
    }

    fn add(pk: &ElGamalPublicKey, a: &ElGamalCiphertext, b: &ElGamalCiphertext) -> ElGamalCiphertext {
        ElGamalCiphertext {
            c1: mul_mod(&a.c1, &b.c1, &pk.p),
            c2: mul_mod(&a.c2, &b.c2, &pk.p),
        }
    }

    fn add_inplace(pk: &ElGamalPublicKey, a: &mut ElGamalCiphertext, b: &ElGamalCiphertext) {
        mul_mod_assign(&mut a.c1, &b.c1, &pk.p);
        mul_mod_assign(&mut a.c2, &b.c2, &pk.p);
    }

    fn negate(pk: &ElGamalPublicKey, a: &ElGamalCiphertext) -> Result<ElGamalCiphertext, BackendError> {
        Ok(ElGamalCiphertext {
            c1: invert(&a.c1, &pk.p)?,
            c2: invert(&a.c2, &pk.p)?,
        })
    }

    fn validate(pk: &ElGamalPublicKey, ct: &ElGamalCiphertext) -> Result<(), BackendError> {
        if in_group(&ct.c1, &pk.p) && in_group(&ct.c2, &pk.p) {
            Ok(())
        } else {
            Err(BackendError::CiphertextOutOfRange)
        }
    }
}

impl WriterTo for ElGamalPublicKey {
    fn write_to<W: Write>(&self, writer: &mut W) -> IoResult<()> {
        writer.write_u32::<LittleEndian>(self.table_bits)?;
        write_integer(writer, &self.p)?;
        write_integer(writer, &self.q)?;
        write_integer(writer, &self.g)?;
        write_integer(writer, &self.y)
    }
}

impl ReaderFrom for ElGamalPublicKey {
    fn read_from<R: Read>(reader: &mut R) -> IoResult<Self> {
        let table_bits: u32 = reader.read_u32::<LittleEndian>()?;
        let p: Integer = read_integer(reader)?;
        let q: Integer = read_integer(reader)?;
        let g: Integer = read_integer(reader)?;
        let y: Integer = read_integer(reader)?;
        let consistent: bool = table_bits > 0
            && table_bits <= ELGAMAL_MAX_TABLE_BITS
            && 2 * table_bits < q.significant_bits()
            && in_group(&q, &p)
            && in_group(&g, &p)
            && in_group(&y, &p);
        if !consistent {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "inconsistent ElGamal public key",
            ));
        }
        Ok(Self { p, q, g, y, table_bits })
    }
}

impl WriterTo for ElGamalCiphertext {
    fn write_to<W: Write>(&self, writer: &mut W) -> IoResult<()> {
        write_integer(writer, &self.c1)?;
        write_integer(writer, &self.c2)
    }
}

impl ReaderFrom for ElGamalCiphertext {
    fn read_from<R: Read>(reader: &mut R) -> IoResult<Self> {
        let c1: Integer = read_integer(reader)?;
        let c2: Integer = read_integer(reader)?;
        Ok(Self { c1, c2 })
    }
}
