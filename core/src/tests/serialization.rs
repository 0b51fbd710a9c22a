use crate::{
    Arity, Ciphertext, ErrorKind, PheError, PheKit, ciphertexts_to_bytes,
    tests::{assert_close, kits},
};

#[test]
fn ciphertext_bytes() {
    kits().iter().for_each(|kit| {
        let single: Ciphertext = kit.encrypt(-4.5).unwrap();
        let pair: Ciphertext = kit.encrypt_pair(0.25, -0.125).unwrap();

        let restored: Ciphertext = kit.ciphertext_from_bytes(&single.to_bytes()).unwrap();
        assert_eq!(restored, single);
        assert_close(kit.decrypt(&restored).unwrap(), -4.5);

        let restored: Ciphertext = Ciphertext::from_bytes(&pair.to_bytes()).unwrap();
        assert_eq!(restored.arity(), Arity::Pair);
        assert_eq!(restored.key_fingerprint(), kit.key_material().fingerprint());
        let (a, b) = kit.decrypt_pair(&restored).unwrap();
        assert_close(a, 0.25);
        assert_close(b, -0.125);
    });
}

#[test]
fn batch_bytes() {
    kits().iter().for_each(|kit| {
        let values: Vec<f64> = vec![1.0, -2.0, 3.5];
        let cts: Vec<Ciphertext> = kit.encrypts(&values).unwrap();
        let bytes: Vec<Vec<u8>> = ciphertexts_to_bytes(&cts);
        assert_eq!(bytes.len(), 3);

        let restored: Vec<Ciphertext> = kit.ciphertexts_from_bytes(&bytes).unwrap();
        assert_eq!(restored, cts);
        let res: Vec<f64> = kit.decrypts(&restored).unwrap();
        (0..3).for_each(|i| assert_close(res[i], values[i]));
    });
}

#[test]
fn public_side_ships_ciphertexts() {
    let [kit, _] = kits();
    let public: PheKit = PheKit::from_public_key(&kit.public_key()).unwrap();
    let bytes: Vec<Vec<u8>> = ciphertexts_to_bytes(&public.encrypts(&[7.0, 8.0]).unwrap());
    let cts: Vec<Ciphertext> = kit.ciphertexts_from_bytes(&bytes).unwrap();
    let sum: Ciphertext = kit.add(&cts[0], &cts[1]).unwrap();
    assert_close(kit.decrypt(&sum).unwrap(), 15.0);
}

#[test]
fn malformed_bytes() {
    let [ou, elgamal] = kits();
    let bytes: Vec<u8> = ou.encrypt(1.0).unwrap().to_bytes();

    let invalid = |bytes: &[u8]| {
        assert_eq!(
            ou.ciphertext_from_bytes(bytes).unwrap_err().kind(),
            ErrorKind::InvalidCiphertext
        )
    };
    invalid(&[]);
    invalid(&bytes[..bytes.len() - 1]);
    invalid(&[bytes.as_slice(), &[0u8]].concat());

    let mut tagged: Vec<u8> = bytes.clone();
    tagged[1] = 9;
    invalid(&tagged);

    // The payload is a valid integer but not a unit modulo n.
    let mut zero: Vec<u8> = bytes[..10].to_vec();
    zero.extend_from_slice(&0u64.to_le_bytes());
    invalid(&zero);

    assert_eq!(
        elgamal.ciphertext_from_bytes(&bytes).unwrap_err().kind(),
        ErrorKind::SchemeMismatch
    );

    let mut batch: Vec<Vec<u8>> = vec![bytes.clone(); 4];
    batch[2].truncate(5);
    let err: PheError = ou.ciphertexts_from_bytes(&batch).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCiphertext);
    assert_eq!(err.index(), Some(2));
}
