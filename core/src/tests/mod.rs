mod batch;
mod serialization;

use backend::{ElGamalParams, OuParams};
use sampling::source::Source;

use crate::{KitConfig, PheKit, SchemeParams};

pub(crate) const TOLERANCE: f64 = 1e-5;

pub(crate) fn ou_params() -> OuParams {
    OuParams::new(768)
}

/// Small Schnorr group: 27 bits of capacity.
pub(crate) fn elgamal_params() -> ElGamalParams {
    ElGamalParams::new(512, 160, 14)
}

pub(crate) fn config() -> KitConfig {
    KitConfig::default().with_threads(2).with_chunk_size(8)
}

/// Three decimal digits leave 23 bits of single range to ElGamal.
pub(crate) fn elgamal_config() -> KitConfig {
    config().with_scale(1_000).with_headroom_bits(4)
}

pub(crate) fn ou_kit() -> PheKit {
    kit(ou_params(), config(), [0u8; 32])
}

pub(crate) fn elgamal_kit() -> PheKit {
    kit(elgamal_params(), elgamal_config(), [1u8; 32])
}

pub(crate) fn kit(params: impl Into<SchemeParams>, config: KitConfig, seed: [u8; 32]) -> PheKit {
    PheKit::generate(params, config, Source::new(seed)).unwrap()
}

/// Both schemes, each with test-sized keys.
pub(crate) fn kits() -> [PheKit; 2] {
    [ou_kit(), elgamal_kit()]
}

pub(crate) fn assert_close(got: f64, want: f64) {
    assert!(
        (got - want).abs() < TOLERANCE,
        "got {} want {}",
        got,
        want
    );
}
