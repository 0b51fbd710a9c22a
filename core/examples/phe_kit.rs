use std::time::Instant;

use phe_core::{Ciphertext, KitConfig, PheKit, PublicKeyHandle, Result, SchemeType};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn single_op(kit: &PheKit) -> Result<()> {
    let (a, b) = (2.36, 5.12);
    let ct_a: Ciphertext = kit.encrypt(a)?;
    let ct_b: Ciphertext = kit.encrypt(b)?;

    let mut acc: Ciphertext = kit.add(&ct_a, &ct_b)?;
    kit.add_inplace(&mut acc, &kit.encrypt(b)?)?;
    println!("[{} add] real: {}, res: {}", kit.scheme(), a + b + b, kit.decrypt(&acc)?);

    let mut acc: Ciphertext = kit.sub(&acc, &ct_b)?;
    kit.sub_inplace(&mut acc, &ct_b)?;
    println!("[{} sub] real: {}, res: {}", kit.scheme(), a, kit.decrypt(&acc)?);
    Ok(())
}

fn pair_op(kit: &PheKit) -> Result<()> {
    let (a1, a2, b1, b2) = (2.36, 5.12, 3.12, 7.45);
    let ct1: Ciphertext = kit.encrypt_pair(a1, a2)?;
    let ct2: Ciphertext = kit.encrypt_pair(b1, b2)?;

    let mut acc: Ciphertext = kit.add(&ct1, &ct2)?;
    kit.add_inplace(&mut acc, &ct2)?;
    let (x, y) = kit.decrypt_pair(&acc)?;
    println!("[pair add] real: [{} {}], res: [{} {}]", a1 + b1 + b1, a2 + b2 + b2, x, y);

    let mut acc: Ciphertext = kit.sub(&acc, &ct2)?;
    kit.sub_inplace(&mut acc, &ct2)?;
    let (x, y) = kit.decrypt_pair(&acc)?;
    println!("[pair sub] real: [{} {}], res: [{} {}]", a1, a2, x, y);
    Ok(())
}

fn batch_op(kit: &PheKit, len: usize) -> Result<()> {
    let ms1: Vec<f64> = (0..len).map(|i| (i * 10) as f64 + i as f64 / 10.0).collect();
    let ms2: Vec<f64> = (0..len).map(|i| (i * 100) as f64 + (i + 3) as f64 / 10.0).collect();

    let now: Instant = Instant::now();
    let ct1: Vec<Ciphertext> = kit.encrypts(&ms1)?;
    let ct2: Vec<Ciphertext> = kit.encrypts(&ms2)?;
    info!(len, elapsed_ms = now.elapsed().as_millis() as u64, "encrypts");

    let mut acc: Vec<Ciphertext> = kit.adds(&ct1, &ct2)?;
    kit.add_inplaces(&mut acc, &ct2)?;
    let res: Vec<f64> = kit.decrypts(&acc)?;
    (0..len).step_by(len.div_ceil(4)).for_each(|i| {
        println!("[batch add] real: {}, res: {}", ms1[i] + ms2[i] + ms2[i], res[i]);
    });

    let mut acc: Vec<Ciphertext> = kit.subs(&acc, &ct2)?;
    kit.sub_inplaces(&mut acc, &ct2)?;
    let res: Vec<f64> = kit.decrypts(&acc)?;
    (0..len).step_by(len.div_ceil(4)).for_each(|i| {
        println!("[batch sub] real: {}, res: {}", ms1[i], res[i]);
    });
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let len: usize = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(10_000);

    let ou: PheKit = PheKit::new(SchemeType::Ou)?;
    single_op(&ou)?;
    pair_op(&ou)?;

    // Encrypt on the public side only.
    let handle: PublicKeyHandle = ou.public_key();
    let public: PheKit = PheKit::from_public_key(&handle)?;
    let ct: Ciphertext = public.encrypt(42.0)?;
    println!("[public] handle: {} bytes, res: {}", handle.as_bytes().len(), ou.decrypt(&ct)?);
    if let Err(err) = public.decrypt(&ct) {
        println!("[public] decrypt: {}", err);
    }

    batch_op(&ou, len)?;

    let elgamal: PheKit = PheKit::with_params(SchemeType::ElGamal, KitConfig::default().with_scale(100))?;
    single_op(&elgamal)?;
    batch_op(&elgamal, len.min(200))?;
    Ok(())
}
