mod batch;
mod decryption;
mod encryption;
mod operations;

use std::fmt;
use std::sync::{Mutex, PoisonError};

use rug::Integer;
use sampling::source::Source;
use tracing::info;

use crate::{
    AbortHandle, Arity, Ciphertext, Codec, KeyMaterial, KitConfig, PheError, PublicKeyHandle, Result, SchemeParams,
    SchemeType, batch::BatchEngine,
};

/// Entry point of the toolkit: one scheme, one key, one codec and one batch pool.
///
/// A kit is `Send + Sync`. Keys are read-only after construction, so any
/// number of threads may encrypt, combine and decrypt through a shared
/// reference at the same time.
///
/// # Example
///
/// ```no_run
/// use phe_core::{PheKit, SchemeType};
///
/// let kit: PheKit = PheKit::new(SchemeType::Ou)?;
/// let a = kit.encrypt(2.36)?;
/// let b = kit.encrypt(5.12)?;
/// let sum = kit.add(&a, &b)?;
/// assert!((kit.decrypt(&sum)? - 7.48).abs() < 1e-6);
/// # Ok::<(), phe_core::PheError>(())
/// ```
pub struct PheKit {
    keys: KeyMaterial,
    codec: Codec,
    config: KitConfig,
    source: Mutex<Source>,
    engine: BatchEngine,
}

impl PheKit {
    /// Generates a fresh key pair with the default parameters of `scheme`.
    pub fn new(scheme: SchemeType) -> Result<Self> {
        Self::with_params(scheme, KitConfig::default())
    }

    pub fn with_params(params: impl Into<SchemeParams>, config: KitConfig) -> Result<Self> {
        Self::generate(params, config, Source::from_entropy())
    }

    /// Generates a key pair drawing all randomness, key generation included, from `source`.
    pub fn generate(params: impl Into<SchemeParams>, config: KitConfig, mut source: Source) -> Result<Self> {
        config.validate()?;
        let keys: KeyMaterial = KeyMaterial::generate(&params.into(), &mut source)?;
        Self::assemble(keys, config, source)
    }

    /// Builds an encrypt-only kit. Every decryption fails with [PheError::NoPrivateKey].
    pub fn from_public_key(handle: &PublicKeyHandle) -> Result<Self> {
        Self::from_public_key_with(handle, KitConfig::default())
    }

    pub fn from_public_key_with(handle: &PublicKeyHandle, config: KitConfig) -> Result<Self> {
        config.validate()?;
        let keys: KeyMaterial = KeyMaterial::from_public_key(handle)?;
        Self::assemble(keys, config, Source::from_entropy())
    }

    fn assemble(keys: KeyMaterial, config: KitConfig, source: Source) -> Result<Self> {
        let codec: Codec = Codec::new(keys.capacity_bits(), config.scale, config.headroom_bits);
        if codec.single_bits() == 0 {
            return Err(PheError::InvalidConfig(format!(
                "headroom_bits={} leaves no plaintext range in capacity_bits={}",
                config.headroom_bits,
                keys.capacity_bits()
            )));
        }
        let engine: BatchEngine = BatchEngine::new(&config)?;
        info!(
            scheme = %keys.scheme(),
            key_size = keys.key_size(),
            capacity_bits = keys.capacity_bits(),
            public_only = !keys.has_private_key(),
            threads = engine.threads(),
            "phe kit ready"
        );
        Ok(Self {
            keys,
            codec,
            config,
            source: Mutex::new(source),
            engine,
        })
    }

    pub fn scheme(&self) -> SchemeType {
        self.keys.scheme()
    }

    pub fn public_key(&self) -> PublicKeyHandle {
        self.keys.public_key()
    }

    pub fn has_private_key(&self) -> bool {
        self.keys.has_private_key()
    }

    pub fn key_material(&self) -> &KeyMaterial {
        &self.keys
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    pub fn config(&self) -> &KitConfig {
        &self.config
    }

    /// Handle to cancel the batch calls of this kit.
    pub fn abort_handle(&self) -> AbortHandle {
        self.engine.abort_handle()
    }

    fn branch_source(&self) -> Source {
        self.source.lock().unwrap_or_else(PoisonError::into_inner).branch()
    }

    fn seal(&self, arity: Arity, m: &Integer, source: &mut Source) -> Result<Ciphertext> {
        Ok(Ciphertext {
            arity,
            key_fingerprint: self.keys.fingerprint(),
            payload: self.keys.encrypt(m, source)?,
        })
    }

    /// Checks that `ct` has the given arity and was produced under this kit's key.
    fn check_owned(&self, ct: &Ciphertext, arity: Arity) -> Result<()> {
        if ct.scheme() != self.scheme() {
            return Err(PheError::SchemeMismatch(format!(
                "{} ciphertext given to a {} kit",
                ct.scheme(),
                self.scheme()
            )));
        }
        if ct.arity != arity {
            return Err(PheError::SchemeMismatch(format!(
                "expected a {:?} ciphertext, got a {:?} one",
                arity, ct.arity
            )));
        }
        if ct.key_fingerprint != self.keys.fingerprint() {
            return Err(PheError::SchemeMismatch(format!(
                "ciphertext key {:016x} differs from kit key {:016x}",
                ct.key_fingerprint,
                self.keys.fingerprint()
            )));
        }
        Ok(())
    }

    fn check_operands(&self, a: &Ciphertext, b: &Ciphertext) -> Result<()> {
        self.check_owned(a, a.arity)?;
        self.check_owned(b, a.arity)
    }
}

impl fmt::Debug for PheKit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PheKit")
            .field("scheme", &self.scheme())
            .field("key_size", &self.keys.key_size())
            .field("has_private_key", &self.has_private_key())
            .field("codec", &self.codec)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
