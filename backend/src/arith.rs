use rug::Integer;

use crate::BackendError;

pub(crate) fn pow_mod(base: &Integer, exp: &Integer, modulus: &Integer) -> Result<Integer, BackendError> {
    base.pow_mod_ref(exp, modulus)
        .map(Integer::from)
        .ok_or(BackendError::NotInvertible)
}

pub(crate) fn invert(a: &Integer, modulus: &Integer) -> Result<Integer, BackendError> {
    a.invert_ref(modulus)
        .map(Integer::from)
        .ok_or(BackendError::NotInvertible)
}

/// a * b mod modulus, for non-negative a and b.
pub(crate) fn mul_mod(a: &Integer, b: &Integer, modulus: &Integer) -> Integer {
    let mut res: Integer = Integer::from(a * b);
    res %= modulus;
    res
}

pub(crate) fn mul_mod_assign(a: &mut Integer, b: &Integer, modulus: &Integer) {
    *a *= b;
    *a %= modulus;
}

/// Returns true if 0 < a < modulus.
pub(crate) fn in_group(a: &Integer, modulus: &Integer) -> bool {
    *a > 0 && a < modulus
}
