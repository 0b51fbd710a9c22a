use backend::encoding::fits_signed;
use rug::Integer;

use crate::{PheError, Result};

/// Slot split of a pair plaintext `A + B * 2^slot_bits`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PairLayout {
    /// Width of the low slot.
    pub slot_bits: u32,
    /// Each encoded slot value must satisfy `|v| < 2^value_bits`.
    pub value_bits: u32,
}

impl PairLayout {
    pub fn new(capacity_bits: u32, headroom_bits: u32) -> Self {
        let slot_bits: u32 = capacity_bits / 2;
        // The low slot is read back as a signed slot_bits-bit window, the high
        // slot must keep |A + B*2^S| below 2^capacity_bits.
        let low: u32 = slot_bits.saturating_sub(1);
        let high: u32 = capacity_bits.saturating_sub(slot_bits + 1);
        Self {
            slot_bits,
            value_bits: low.min(high).saturating_sub(headroom_bits),
        }
    }
}

/// Fixed-point encoder between reals and the signed plaintext integers of a backend.
///
/// A real `x` is encoded as `round(x * scale)`. Encoding fails with
/// [PheError::EncodingOverflow] rather than wrap around, since a wrapped
/// value would decrypt to a plausible but wrong number.
#[derive(Clone, Debug, PartialEq)]
pub struct Codec {
    scale: u64,
    single_bits: u32,
    pair: PairLayout,
}

impl Codec {
    pub fn new(capacity_bits: u32, scale: u64, headroom_bits: u32) -> Self {
        Self {
            scale,
            single_bits: capacity_bits.saturating_sub(headroom_bits),
            pair: PairLayout::new(capacity_bits, headroom_bits),
        }
    }

    pub fn scale(&self) -> u64 {
        self.scale
    }

    /// Encoded single values must satisfy `|v| < 2^single_bits`.
    pub fn single_bits(&self) -> u32 {
        self.single_bits
    }

    pub fn pair_layout(&self) -> PairLayout {
        self.pair
    }

    /// Largest real accepted by [Codec::encode], in absolute value.
    pub fn max_single(&self) -> f64 {
        Self::limit(self.single_bits, self.scale)
    }

    /// Largest real accepted in each slot by [Codec::encode_pair], in absolute value.
    pub fn max_slot(&self) -> f64 {
        Self::limit(self.pair.value_bits, self.scale)
    }

    pub fn encode(&self, value: f64) -> Result<Integer> {
        self.scale_checked(value, self.single_bits)
    }

    pub fn decode(&self, m: &Integer) -> f64 {
        m.to_f64() / self.scale as f64
    }

    pub fn encode_pair(&self, a: f64, b: f64) -> Result<Integer> {
        let a: Integer = self.scale_checked(a, self.pair.value_bits)?;
        let b: Integer = self.scale_checked(b, self.pair.value_bits)?;
        Ok(a + (b << self.pair.slot_bits))
    }

    pub fn decode_pair(&self, m: &Integer) -> (f64, f64) {
        let low: Integer = m.clone().keep_signed_bits(self.pair.slot_bits);
        let high: Integer = Integer::from(m - &low) >> self.pair.slot_bits;
        (self.decode(&low), self.decode(&high))
    }

    fn scale_checked(&self, value: f64, bits: u32) -> Result<Integer> {
        let scaled: f64 = (value * self.scale as f64).round();
        let m: Integer = Integer::from_f64(scaled)
            .ok_or_else(|| PheError::EncodingOverflow(format!("{} is not a finite value", value)))?;
        if !fits_signed(&m, bits) {
            return Err(PheError::EncodingOverflow(format!(
                "|{}| * {} does not fit in {} bits",
                value, self.scale, bits
            )));
        }
        Ok(m)
    }

    fn limit(bits: u32, scale: u64) -> f64 {
        let bound: f64 = (2f64).powi(bits as i32);
        // Past 52 bits, 2^bits - 1 is not representable.
        let units: f64 = if bits <= 52 {
            bound - 1.0
        } else {
            bound * (1.0 - 4.0 * f64::EPSILON)
        };
        units / scale as f64
    }
}
