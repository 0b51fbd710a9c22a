use std::io::{Read, Result as IoResult, Write};

use backend::{ElGamalCiphertext, OuCiphertext, ReaderFrom, WriterTo};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::{PheError, Result, SchemeType};

/// Number of plaintext values carried by one ciphertext.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Arity {
    Single,
    Pair,
}

impl Arity {
    fn tag(&self) -> u8 {
        match self {
            Arity::Single => 1,
            Arity::Pair => 2,
        }
    }

    fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Arity::Single),
            2 => Some(Arity::Pair),
            _ => None,
        }
    }
}

/// Scheme-native encrypted value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Payload {
    Ou(OuCiphertext),
    ElGamal(ElGamalCiphertext),
}

impl Payload {
    pub(crate) fn scheme(&self) -> SchemeType {
        match self {
            Payload::Ou(_) => SchemeType::Ou,
            Payload::ElGamal(_) => SchemeType::ElGamal,
        }
    }
}

/// An owned encrypted value, tagged with its scheme, arity and the
/// fingerprint of the public key it was produced under.
///
/// Dropping a ciphertext releases it. Arithmetic is only defined between
/// ciphertexts that agree on all three tags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ciphertext {
    pub(crate) arity: Arity,
    pub(crate) key_fingerprint: u64,
    pub(crate) payload: Payload,
}

impl Ciphertext {
    pub fn scheme(&self) -> SchemeType {
        self.payload.scheme()
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn key_fingerprint(&self) -> u64 {
        self.key_fingerprint
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        WriterTo::to_bytes(self)
    }

    /// Parses a ciphertext. The result is only checked against a key by
    /// [crate::PheKit::ciphertext_from_bytes].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader: &[u8] = bytes;
        let ct: Ciphertext = Ciphertext::read_from(&mut reader)
            .map_err(|err| PheError::InvalidCiphertext(format!("malformed ciphertext: {}", err)))?;
        if !reader.is_empty() {
            return Err(PheError::InvalidCiphertext(format!(
                "{} trailing bytes after ciphertext",
                reader.len()
            )));
        }
        Ok(ct)
    }
}

/// Serializes every ciphertext of a batch, index-aligned.
pub fn ciphertexts_to_bytes(cts: &[Ciphertext]) -> Vec<Vec<u8>> {
    cts.iter().map(Ciphertext::to_bytes).collect()
}

impl WriterTo for Ciphertext {
    fn write_to<W: Write>(&self, writer: &mut W) -> IoResult<()> {
        writer.write_u8(self.scheme().tag())?;
        writer.write_u8(self.arity.tag())?;
        writer.write_u64::<LittleEndian>(self.key_fingerprint)?;
        match &self.payload {
            Payload::Ou(ct) => ct.write_to(writer),
            Payload::ElGamal(ct) => ct.write_to(writer),
        }
    }
}

impl ReaderFrom for Ciphertext {
    fn read_from<R: Read>(reader: &mut R) -> IoResult<Self> {
        let invalid = |what: &str| std::io::Error::new(std::io::ErrorKind::InvalidData, what.to_string());
        let scheme: SchemeType = SchemeType::from_tag(reader.read_u8()?).ok_or_else(|| invalid("unknown scheme tag"))?;
        let arity: Arity = Arity::from_tag(reader.read_u8()?).ok_or_else(|| invalid("unknown arity tag"))?;
        let key_fingerprint: u64 = reader.read_u64::<LittleEndian>()?;
        let payload: Payload = match scheme {
            SchemeType::Ou => Payload::Ou(OuCiphertext::read_from(reader)?),
            SchemeType::ElGamal => Payload::ElGamal(ElGamalCiphertext::read_from(reader)?),
        };
        Ok(Self {
            arity,
            key_fingerprint,
            payload,
        })
    }
}
