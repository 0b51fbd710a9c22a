use rug::{Integer, integer::Order};
use sampling::source::Source;

/// Big-integer draws on top of a [Source].
pub trait SampleInteger {
    /// Uniform integer in `[0, 2^bits)`.
    fn next_integer_bits(&mut self, bits: u32) -> Integer;

    /// Uniform integer in `[0, bound)`, up to a statistical distance of `2^-64`.
    fn next_integer_below(&mut self, bound: &Integer) -> Integer;

    /// Uniform integer in `[low, high)`.
    fn next_integer_range(&mut self, low: &Integer, high: &Integer) -> Integer;

    /// Random prime with exactly `bits` significant bits.
    fn next_prime(&mut self, bits: u32) -> Integer;
}

impl SampleInteger for Source {
    fn next_integer_bits(&mut self, bits: u32) -> Integer {
        let bytes: Vec<u8> = self.next_bytes(bits.div_ceil(8) as usize);
        Integer::from_digits(&bytes, Order::Lsf).keep_bits(bits)
    }

    fn next_integer_below(&mut self, bound: &Integer) -> Integer {
        debug_assert!(*bound > 0, "invalid bound: {} <= 0", bound);
        let wide: Integer = self.next_integer_bits(bound.significant_bits() + 64);
        Integer::from(wide.rem_euc_ref(bound))
    }

    fn next_integer_range(&mut self, low: &Integer, high: &Integer) -> Integer {
        debug_assert!(low < high, "invalid range: [{}, {})", low, high);
        let width: Integer = Integer::from(high - low);
        self.next_integer_below(&width) + low
    }

    fn next_prime(&mut self, bits: u32) -> Integer {
        assert!(bits >= 2, "invalid prime size: {} < 2 bits", bits);
        loop {
            let mut candidate: Integer = self.next_integer_bits(bits);
            candidate.set_bit(bits - 1, true);
            let prime: Integer = candidate.next_prime();
            if prime.significant_bits() == bits {
                return prime;
            }
        }
    }
}
