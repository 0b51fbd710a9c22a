use std::io::{Error, ErrorKind, Read, Result, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use rug::{Integer, integer::Order};

/// Upper bound on the encoded size of a single integer (512 KiB).
pub const MAX_INTEGER_BYTES: usize = 1 << 19;

pub trait WriterTo {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()>;

    fn to_bytes(&self) -> Vec<u8> {
        let mut buf: Vec<u8> = Vec::new();
        self.write_to(&mut buf)
            .expect("keys and ciphertexts hold non-negative residues and Vec writes are infallible");
        buf
    }
}

pub trait ReaderFrom: Sized {
    fn read_from<R: Read>(reader: &mut R) -> Result<Self>;
}

/// Writes a non-negative integer as a little-endian u64 length followed by its big-endian bytes.
pub fn write_integer<W: Write>(writer: &mut W, value: &Integer) -> Result<()> {
    if *value < 0 {
        return Err(Error::new(ErrorKind::InvalidInput, "negative integer"));
    }
    let digits: Vec<u8> = value.to_digits::<u8>(Order::Msf);
    writer.write_u64::<LittleEndian>(digits.len() as u64)?;
    writer.write_all(&digits)
}

pub fn read_integer<R: Read>(reader: &mut R) -> Result<Integer> {
    let len: usize = reader.read_u64::<LittleEndian>()? as usize;
    if len > MAX_INTEGER_BYTES {
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!("integer length {} > MAX_INTEGER_BYTES={}", len, MAX_INTEGER_BYTES),
        ));
    }
    let mut digits: Vec<u8> = vec![0u8; len];
    reader.read_exact(&mut digits)?;
    Ok(Integer::from_digits(&digits, Order::Msf))
}
