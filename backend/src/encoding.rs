use rug::Integer;

/// Maps a signed integer to its representative in `[0, modulus)`.
pub fn to_residue(m: &Integer, modulus: &Integer) -> Integer {
    Integer::from(m.rem_euc_ref(modulus))
}

/// Lifts a residue in `[0, modulus)` to the centered range `(-modulus/2, modulus/2]`.
pub fn centered(r: Integer, modulus: &Integer) -> Integer {
    let half: Integer = Integer::from(modulus >> 1u32);
    if r > half { r - modulus } else { r }
}

/// Returns true if `|m| < 2^bits`.
pub fn fits_signed(m: &Integer, bits: u32) -> bool {
    m.significant_bits() <= bits
}
