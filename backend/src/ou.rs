//! Okamoto–Uchiyama cryptosystem.
//!
//! `n = p^2 q`, plaintexts live in `Z_p`, ciphertexts in `Z_n^*`:
//! `E(m) = g^m h^r mod n` with `h = g^n`. Decryption computes
//! `L(c^(p-1) mod p^2) / L(g^(p-1) mod p^2) mod p` where `L(x) = (x - 1) / p`.

use std::io::{Read, Result as IoResult, Write};
use std::time::Instant;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use rug::Integer;
use sampling::source::Source;

use crate::{
    Backend, BackendError,
    arith::{in_group, invert, mul_mod, mul_mod_assign, pow_mod},
    encoding::{centered, to_residue},
    sampling::SampleInteger,
    serialization::{ReaderFrom, WriterTo, read_integer, write_integer},
};

pub const OU_MIN_KEY_SIZE: u32 = 96;

pub struct Ou;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OuParams {
    /// Bit length of `n = p^2 q`.
    pub key_size: u32,
}

impl Default for OuParams {
    fn default() -> Self {
        Self { key_size: 2048 }
    }
}

impl OuParams {
    pub fn new(key_size: u32) -> Self {
        Self { key_size }
    }

    pub fn prime_bits(&self) -> u32 {
        self.key_size / 3
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OuPublicKey {
    pub(crate) n: Integer,
    pub(crate) g: Integer,
    pub(crate) h: Integer,
    pub(crate) prime_bits: u32,
}

impl OuPublicKey {
    pub fn n(&self) -> &Integer {
        &self.n
    }
}

pub struct OuSecretKey {
    p: Integer,
    p_squared: Integer,
    // L(g^(p-1) mod p^2)^-1 mod p
    gp_inv: Integer,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OuCiphertext(pub(crate) Integer);

impl OuCiphertext {
    pub fn value(&self) -> &Integer {
        &self.0
    }
}

// L(x) = (x - 1) / p
fn l_function(x: Integer, p: &Integer) -> Integer {
    let mut res: Integer = x - 1u32;
    res /= p;
    res
}

impl Backend for Ou {
    type Params = OuParams;
    type PublicKey = OuPublicKey;
    type SecretKey = OuSecretKey;
    type Ciphertext = OuCiphertext;

    const NAME: &'static str = "OU";

    fn keygen(params: &OuParams, source: &mut Source) -> Result<(OuSecretKey, OuPublicKey), BackendError> {
        if params.key_size < OU_MIN_KEY_SIZE {
            return Err(BackendError::InvalidParams(format!(
                "OU key_size={} < {}",
                params.key_size, OU_MIN_KEY_SIZE
            )));
        }

        let now: Instant = Instant::now();
        let prime_bits: u32 = params.prime_bits();

        let p: Integer = source.next_prime(prime_bits);
        let mut q: Integer = source.next_prime(prime_bits);
        while q == p {
            q = source.next_prime(prime_bits);
        }

        let p_squared: Integer = Integer::from(p.square_ref());
        let n: Integer = Integer::from(&p_squared * &q);
        let p_minus_one: Integer = Integer::from(&p - 1u32);

        let two: Integer = Integer::from(2u32);
        let (g, gp_inv) = loop {
            let g: Integer = source.next_integer_range(&two, &n);
            if Integer::from(g.gcd_ref(&n)) != 1 {
                continue;
            }
            // g^(p-1) mod p^2 must have order p, i.e. L(.) != 0 mod p.
            let gp: Integer = pow_mod(&g, &p_minus_one, &p_squared)?;
            let lg: Integer = to_residue(&l_function(gp, &p), &p);
            if lg == 0 {
                continue;
            }
            break (g, invert(&lg, &p)?);
        };

        let h: Integer = pow_mod(&g, &n, &n)?;

        tracing::debug!(
            scheme = Self::NAME,
            key_size = n.significant_bits(),
            prime_bits,
            elapsed_ms = now.elapsed().as_millis() as u64,
            "generated key pair"
        );

        Ok((
            OuSecretKey {
                p,
                p_squared,
                gp_inv,
            },
            OuPublicKey { n, g, h, prime_bits },
        ))
    }

    fn key_size(pk: &OuPublicKey) -> u32 {
        pk.n.significant_bits()
    }

    fn capacity_bits(pk: &OuPublicKey) -> u32 {
        // p >= 2^(prime_bits-1) so every |m| < 2^(prime_bits-2) lies in (-p/2, p/2].
        pk.prime_bits.saturating_sub(2)
    }

    fn encrypt(pk: &OuPublicKey, m: &Integer, source: &mut Source) -> Result<OuCiphertext, BackendError> {
        // m + n = m mod p, so negative plaintexts are mapped into [0, n).
        let exp: Integer = to_residue(m, &pk.n);
        let r: Integer = source.next_integer_range(&Integer::from(1u32), &pk.n);
        let gm: Integer = pow_mod(&pk.g, &exp, &pk.n)?;
        let hr: Integer = pow_mod(&pk.h, &r, &pk.n)?;
        Ok(OuCiphertext(mul_mod(&gm, &hr, &pk.n)))
    }

    fn decrypt(sk: &OuSecretKey, _pk: &OuPublicKey, ct: &OuCiphertext) -> Result<Integer, BackendError> {
        let p_minus_one: Integer = Integer::from(&sk.p - 1u32);
        let cp: Integer = pow_mod(&ct.0, &p_minus_one, &sk.p_squared)?;
        let lc: Integer = l_function(cp, &sk.p);
        let m: Integer = mul_mod(&to_residue(&lc, &sk.p), &sk.gp_inv, &sk.p);
        Ok(centered(m, &sk.p))
    }

    fn add(pk: &OuPublicKey, a: &OuCiphertext, b: &OuCiphertext) -> OuCiphertext {
        OuCiphertext(mul_mod(&a.0, &b.0, &pk.n))
    }

    fn add_inplace(pk: &OuPublicKey, a: &mut OuCiphertext, b: &OuCiphertext) {
        mul_mod_assign(&mut a.0, &b.0, &pk.n);
    }

    fn negate(pk: &OuPublicKey, a: &OuCiphertext) -> Result<OuCiphertext, BackendError> {
        Ok(OuCiphertext(invert(&a.0, &pk.n)?))
    }

    fn validate(pk: &OuPublicKey, ct: &OuCiphertext) -> Result<(), BackendError> {
        if in_group(&ct.0, &pk.n) {
            Ok(())
        } else {
            Err(BackendError::CiphertextOutOfRange)
        }
    }
}

impl WriterTo for OuPublicKey {
    fn write_to<W: Write>(&self, writer: &mut W) -> IoResult<()> {
        writer.write_u32::<LittleEndian>(self.prime_bits)?;
        write_integer(writer, &self.n)?;
        write_integer(writer, &self.g)?;
        write_integer(writer, &self.h)
    }
}

impl ReaderFrom for OuPublicKey {
    fn read_from<R: Read>(reader: &mut R) -> IoResult<Self> {
        let prime_bits: u32 = reader.read_u32::<LittleEndian>()?;
        let n: Integer = read_integer(reader)?;
        let g: Integer = read_integer(reader)?;
        let h: Integer = read_integer(reader)?;
        // n = p^2 q with p, q of prime_bits bits each.
        let n_bits: u64 = u64::from(n.significant_bits());
        let pb: u64 = u64::from(prime_bits);
        if prime_bits < OU_MIN_KEY_SIZE / 3
            || n_bits < 2 * pb
            || n_bits > 3 * pb + 2
            || !in_group(&g, &n)
            || !in_group(&h, &n)
        {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "inconsistent OU public key",
            ));
        }
        Ok(Self { n, g, h, prime_bits })
    }
}

impl WriterTo for OuCiphertext {
    fn write_to<W: Write>(&self, writer: &mut W) -> IoResult<()> {
        write_integer(writer, &self.0)
    }
}

impl ReaderFrom for OuCiphertext {
    fn read_from<R: Read>(reader: &mut R) -> IoResult<Self> {
        Ok(Self(read_integer(reader)?))
    }
}
