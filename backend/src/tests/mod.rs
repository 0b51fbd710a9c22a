
use rug::Integer;
use sampling::source::Source;

use crate::Backend;

/// Checks encrypt/add/sub/negate against plain integer arithmetic for any backend.
pub(crate) fn test_homomorphism<B: Backend>(params: &B::Params, values: &[(i64, i64)]) {
    let mut source: Source = Source::new([0u8; 32]);
    let (sk, pk) = B::keygen(params, &mut source).unwrap();

    values.iter().for_each(|&(a, b)| {
        let ct_a: B::Ciphertext = B::encrypt(&pk, &Integer::from(a), &mut source).unwrap();
        let ct_b: B::Ciphertext = B::encrypt(&pk, &Integer::from(b), &mut source).unwrap();

        let sum: B::Ciphertext = B::add(&pk, &ct_a, &ct_b);
        assert_eq!(B::decrypt(&sk, &pk, &sum).unwrap(), a + b);

        let diff: B::Ciphertext = B::sub(&pk, &ct_a, &ct_b).unwrap();
        assert_eq!(B::decrypt(&sk, &pk, &diff).unwrap(), a - b);

        let neg: B::Ciphertext = B::negate(&pk, &ct_a).unwrap();
        assert_eq!(B::decrypt(&sk, &pk, &neg).unwrap(), -a);

        let mut acc: B::Ciphertext = ct_a.clone();
        B::add_inplace(&pk, &mut acc, &ct_b);
        B::sub_inplace(&pk, &mut acc, &ct_b).unwrap();
        B::sub_inplace(&pk, &mut acc, &ct_b).unwrap();
        assert_eq!(B::decrypt(&sk, &pk, &acc).unwrap(), a - b);

        // Operands are untouched.
        assert_eq!(B::decrypt(&sk, &pk, &ct_b).unwrap(), b);
    });
}
