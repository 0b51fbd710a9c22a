use crate::{
    AbortHandle, Arity, Ciphertext, ErrorKind, KitConfig, PheError, PheKit,
    batch::BatchEngine,
    tests::{assert_close, config, elgamal_config, elgamal_kit, elgamal_params, kit, ou_kit},
};

fn first(n: usize) -> Vec<f64> {
    (0..n).map(|i| (i * 10) as f64 + i as f64 / 10.0).collect()
}

fn second(n: usize) -> Vec<f64> {
    (0..n).map(|i| (i * 100) as f64 + (i + 3) as f64 / 10.0).collect()
}

fn test_batch_scenario(kit: &PheKit, n: usize) {
    let ms1: Vec<f64> = first(n);
    let ms2: Vec<f64> = second(n);
    let ct1: Vec<Ciphertext> = kit.encrypts(&ms1).unwrap();
    let ct2: Vec<Ciphertext> = kit.encrypts(&ms2).unwrap();
    assert_eq!(ct1.len(), n);

    let mut acc: Vec<Ciphertext> = kit.adds(&ct1, &ct2).unwrap();
    kit.add_inplaces(&mut acc, &ct2).unwrap();
    let res: Vec<f64> = kit.decrypts(&acc).unwrap();
    assert_eq!(res.len(), n);
    (0..n).for_each(|i| assert_close(res[i], ms1[i] + 2.0 * ms2[i]));

    let mut acc: Vec<Ciphertext> = kit.subs(&acc, &ct2).unwrap();
    kit.sub_inplaces(&mut acc, &ct2).unwrap();
    let res: Vec<f64> = kit.decrypts(&acc).unwrap();
    (0..n).for_each(|i| assert_close(res[i], ms1[i]));
}

#[test]
fn ou_batch_scenario() {
    test_batch_scenario(&ou_kit(), 100);
}

#[test]
fn elgamal_batch_scenario() {
    test_batch_scenario(&elgamal_kit(), 20);
}

#[test]
fn ou_batch_pair_scenario() {
    let n: usize = 100;
    let kit: PheKit = ou_kit();
    let ms11: Vec<f64> = first(n);
    let ms12: Vec<f64> = (0..n).map(|i| (i * 10) as f64 + i as f64 / 5.0).collect();
    let ms21: Vec<f64> = second(n);
    let ms22: Vec<f64> = (0..n).map(|i| (i * 100) as f64 + (i + 3) as f64 / 5.0).collect();

    let ct1: Vec<Ciphertext> = kit.encrypt_pairs(&ms11, &ms12).unwrap();
    let ct2: Vec<Ciphertext> = kit.encrypt_pairs(&ms21, &ms22).unwrap();
    assert!(ct1.iter().all(|ct| ct.arity() == Arity::Pair));

    let mut acc: Vec<Ciphertext> = kit.adds(&ct1, &ct2).unwrap();
    kit.add_inplaces(&mut acc, &ct2).unwrap();
    let res: Vec<f64> = kit.decrypt_pairs(&acc).unwrap();
    assert_eq!(res.len(), 2 * n);
    (0..n).for_each(|i| {
        assert_close(res[i], ms11[i] + 2.0 * ms21[i]);
        assert_close(res[i + n], ms12[i] + 2.0 * ms22[i]);
    });

    let mut acc: Vec<Ciphertext> = kit.subs(&acc, &ct2).unwrap();
    kit.sub_inplaces(&mut acc, &ct2).unwrap();
    let res: Vec<f64> = kit.decrypt_pairs(&acc).unwrap();
    (0..n).for_each(|i| {
        assert_close(res[i], ms11[i]);
        assert_close(res[i + n], ms12[i]);
    });
}

#[test]
fn elgamal_batch_pairs() {
    let kit: PheKit = kit(
        elgamal_params(),
        config().with_scale(10).with_headroom_bits(2),
        [3u8; 32],
    );
    let a: Vec<f64> = vec![1.5, -2.0, 0.0, 40.1];
    let b: Vec<f64> = vec![-0.5, 3.3, -50.0, 7.0];
    let cts: Vec<Ciphertext> = kit.encrypt_pairs(&a, &b).unwrap();
    let res: Vec<f64> = kit.decrypt_pairs(&cts).unwrap();
    assert_eq!(res.len(), 8);
    (0..4).for_each(|i| {
        assert_close(res[i], a[i]);
        assert_close(res[i + 4], b[i]);
    });
}

#[test]
fn unpacked_pairs() {
    let kit: PheKit = ou_kit();
    let a: Vec<f64> = first(10);
    let b: Vec<f64> = second(10);
    let cts: Vec<Ciphertext> = kit.encrypt_pairs_unpacked(&a, &b).unwrap();
    assert_eq!(cts.len(), 20);
    assert!(cts.iter().all(|ct| ct.arity() == Arity::Single));
    assert_close(kit.decrypt(&cts[3]).unwrap(), a[3]);
    assert_close(kit.decrypt(&cts[13]).unwrap(), b[3]);

    let packed: Vec<f64> = kit.decrypt_pairs(&kit.encrypt_pairs(&a, &b).unwrap()).unwrap();
    let unpacked: Vec<f64> = kit.decrypt_pairs_unpacked(&cts).unwrap();
    (0..20).for_each(|i| assert_close(unpacked[i], packed[i]));

    assert_eq!(
        kit.decrypt_pairs_unpacked(&cts[..3]).unwrap_err().kind(),
        ErrorKind::InvalidCiphertext
    );
}

#[test]
fn batch_matches_single() {
    let kit: PheKit = elgamal_kit();
    let values: Vec<f64> = vec![0.5, -1.25, 3.0, 8000.0, -8000.0];
    let cts: Vec<Ciphertext> = kit.encrypts(&values).unwrap();
    let res: Vec<f64> = kit.decrypts(&cts).unwrap();
    (0..values.len()).for_each(|i| {
        assert_close(res[i], values[i]);
        assert_close(kit.decrypt(&cts[i]).unwrap(), values[i]);
    });
}

#[test]
fn mismatch_reports_lowest_index() {
    let kit: PheKit = ou_kit();
    let other: PheKit = elgamal_kit();
    let mut a: Vec<Ciphertext> = kit.encrypts(&first(12)).unwrap();
    let mut b: Vec<Ciphertext> = kit.encrypts(&second(12)).unwrap();
    b[9] = other.encrypt(1.0).unwrap();
    b[5] = kit.encrypt_pair(1.0, 1.0).unwrap();

    let err: PheError = kit.adds(&a, &b).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemeMismatch);
    assert_eq!(err.index(), Some(5));
    assert_eq!(kit.subs(&a, &b).unwrap_err().index(), Some(5));

    // Nothing is modified when any index is rejected.
    let before: Vec<Ciphertext> = a.clone();
    let err: PheError = kit.add_inplaces(&mut a, &b).unwrap_err();
    assert_eq!(err.index(), Some(5));
    assert_eq!(kit.sub_inplaces(&mut a, &b).unwrap_err().index(), Some(5));
    assert_eq!(a, before);

    let err: PheError = kit.decrypts(&b).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemeMismatch);
    assert_eq!(err.index(), Some(5));

    b[5] = kit.encrypt(1.0).unwrap();
    assert_eq!(kit.decrypts(&b).unwrap_err().index(), Some(9));
    assert_eq!(kit.decrypt_pairs(&a).unwrap_err().index(), Some(0));
}

#[test]
fn encoding_overflow_index() {
    let kit: PheKit = kit(elgamal_params(), elgamal_config(), [4u8; 32]);
    let values: Vec<f64> = vec![1.0, 2.0, 1e9, 3.0, f64::NAN];
    let err: PheError = kit.encrypts(&values).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EncodingOverflow);
    assert_eq!(err.index(), Some(2));

    let err: PheError = kit.encrypt_pairs(&[0.0, 0.0], &[0.0, 1e9]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EncodingOverflow);
    assert_eq!(err.index(), Some(1));

    let err: PheError = kit.encrypt_pairs_unpacked(&[0.0, 0.0, 0.0], &[0.0, 1e9, 0.0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EncodingOverflow);
    assert_eq!(err.index(), Some(1));
    let err: PheError = kit.encrypt_pairs_unpacked(&[0.0, 0.0, 1e9], &[0.0, 0.0, 0.0]).unwrap_err();
    assert_eq!(err.index(), Some(2));
}

#[test]
fn empty_and_unaligned() {
    let kit: PheKit = ou_kit();
    let cts: Vec<Ciphertext> = kit.encrypts(&[1.0, 2.0]).unwrap();
    let invalid = |res: Result<(), PheError>| assert_eq!(res.unwrap_err().kind(), ErrorKind::InvalidCiphertext);

    invalid(kit.encrypts(&[]).map(|_| ()));
    invalid(kit.decrypts(&[]).map(|_| ()));
    invalid(kit.encrypt_pairs(&[1.0], &[1.0, 2.0]).map(|_| ()));
    invalid(kit.encrypt_pairs_unpacked(&[], &[]).map(|_| ()));
    invalid(kit.adds(&cts, &cts[..1]).map(|_| ()));
    invalid(kit.subs(&[], &[]).map(|_| ()));
    invalid(kit.add_inplaces(&mut cts.clone(), &cts[..1]));
    invalid(kit.sub_inplaces(&mut [], &[]));
    invalid(kit.ciphertexts_from_bytes::<Vec<u8>>(&[]).map(|_| ()));
}

#[test]
fn abort_and_reset() {
    let kit: PheKit = ou_kit();
    let handle: AbortHandle = kit.abort_handle();
    let cts: Vec<Ciphertext> = kit.encrypts(&first(4)).unwrap();

    handle.abort();
    assert!(kit.abort_handle().is_aborted());
    assert_eq!(kit.encrypts(&first(4)).unwrap_err().kind(), ErrorKind::Aborted);
    assert_eq!(kit.decrypts(&cts).unwrap_err().kind(), ErrorKind::Aborted);
    assert_eq!(kit.adds(&cts, &cts).unwrap_err().kind(), ErrorKind::Aborted);
    // Single calls are not batches.
    assert!(kit.encrypt(1.0).is_ok());

    handle.reset();
    assert_eq!(kit.decrypts(&cts).unwrap().len(), 4);
}

#[test]
fn abort_from_another_thread() {
    let kit: PheKit = kit(
        crate::tests::ou_params(),
        KitConfig::default().with_threads(1).with_chunk_size(1),
        [6u8; 32],
    );
    let handle: AbortHandle = kit.abort_handle();
    let values: Vec<f64> = first(2_000);
    let err: PheError = std::thread::scope(|scope| {
        let worker = scope.spawn(|| kit.encrypts(&values));
        handle.abort();
        worker.join().unwrap()
    })
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Aborted);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic]
fn for_each_mut_length_mismatch() {
    let engine: BatchEngine = BatchEngine::new(&config()).unwrap();
    let mut targets: Vec<u32> = vec![0; 3];
    let _ = engine.for_each_mut(&mut targets, &[1u32, 2], |t, o| {
        *t += o;
        Ok(())
    });
}
