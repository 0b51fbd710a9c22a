use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use phe_core::{Ciphertext, ElGamalParams, KitConfig, OuParams, PheKit, SchemeParams};
use sampling::source::Source;

struct Params {
    name: &'static str,
    scheme: SchemeParams,
    scale: u64,
}

fn params_set() -> Vec<Params> {
    vec![
        Params {
            name: "OU_2048",
            scheme: OuParams::new(2048).into(),
            scale: 1_000_000,
        },
        Params {
            name: "ELGAMAL_2048",
            scheme: ElGamalParams::new(2048, 256, 16).into(),
            scale: 10,
        },
    ]
}

fn kit(p: &Params) -> PheKit {
    let config: KitConfig = KitConfig::default().with_scale(p.scale);
    PheKit::generate(p.scheme, config, Source::new([0u8; 32])).unwrap()
}

fn bench_encrypt(c: &mut Criterion) {
    let mut group = c.benchmark_group("encrypt");

    for p in params_set() {
        let kit: PheKit = kit(&p);
        group.bench_with_input(BenchmarkId::new("SINGLE", p.name), &(), |b, _| {
            b.iter(|| kit.encrypt(black_box(2.36)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("PAIR", p.name), &(), |b, _| {
            b.iter(|| kit.encrypt_pair(black_box(2.36), black_box(5.12)).unwrap())
        });
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    group.sample_size(10);

    let len: usize = 1_000;
    let ms1: Vec<f64> = (0..len).map(|i| (i * 10) as f64 + i as f64 / 10.0).collect();
    let ms2: Vec<f64> = (0..len).map(|i| (i * 100) as f64 + (i + 3) as f64 / 10.0).collect();

    for p in params_set() {
        let kit: PheKit = kit(&p);
        let ct1: Vec<Ciphertext> = kit.encrypts(&ms1).unwrap();
        let ct2: Vec<Ciphertext> = kit.encrypts(&ms2).unwrap();

        group.bench_with_input(BenchmarkId::new("ENCRYPTS", p.name), &ms1, |b, ms| {
            b.iter(|| kit.encrypts(black_box(ms)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("ADDS", p.name), &(), |b, _| {
            b.iter(|| kit.adds(black_box(&ct1), black_box(&ct2)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("DECRYPTS", p.name), &(), |b, _| {
            b.iter(|| kit.decrypts(black_box(&ct1)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encrypt, bench_batch);
criterion_main!(benches);
