use backend::{
    Backend, ElGamal, ElGamalPublicKey, Integer, Ou, OuPublicKey, ReaderFrom, WriterTo,
};
use sampling::source::Source;
use utils::hash::fingerprint;

use crate::{PheError, Result, SchemeParams, SchemeType, ciphertext::Payload};

/// Transferable public view of a key pair: scheme tag followed by the scheme-native public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKeyHandle {
    scheme: SchemeType,
    bytes: Vec<u8>,
}

impl PublicKeyHandle {
    fn new<P: WriterTo>(scheme: SchemeType, pk: &P) -> Self {
        let mut bytes: Vec<u8> = vec![scheme.tag()];
        bytes.extend_from_slice(&pk.to_bytes());
        Self { scheme, bytes }
    }

    /// Wraps serialized bytes, checking only the scheme tag.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes: Vec<u8> = bytes.into();
        match bytes.first().copied().and_then(SchemeType::from_tag) {
            Some(scheme) => Ok(Self { scheme, bytes }),
            None => Err(PheError::InvalidConfig("public key handle has no valid scheme tag".into())),
        }
    }

    pub fn scheme(&self) -> SchemeType {
        self.scheme
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    fn body(&self) -> &[u8] {
        &self.bytes[1..]
    }
}

impl AsRef<[u8]> for PublicKeyHandle {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

pub struct KeyPair<B: Backend> {
    pub(crate) pk: B::PublicKey,
    pub(crate) sk: Option<B::SecretKey>,
}

impl<B: Backend> KeyPair<B> {
    pub fn generate(params: &B::Params, source: &mut Source) -> Result<Self> {
        let (sk, pk) = B::keygen(params, source)?;
        Ok(Self { pk, sk: Some(sk) })
    }

    pub fn public_only(pk: B::PublicKey) -> Self {
        Self { pk, sk: None }
    }

    pub fn public_key(&self) -> &B::PublicKey {
        &self.pk
    }

    pub(crate) fn secret(&self) -> Result<&B::SecretKey> {
        self.sk.as_ref().ok_or(PheError::NoPrivateKey)
    }

    fn read_public(body: &[u8]) -> Result<Self> {
        let mut reader: &[u8] = body;
        let pk: B::PublicKey = <B::PublicKey as ReaderFrom>::read_from(&mut reader)
            .map_err(|err| PheError::InvalidConfig(format!("malformed {} public key: {}", B::NAME, err)))?;
        if !reader.is_empty() {
            return Err(PheError::InvalidConfig(format!(
                "{} trailing bytes after {} public key",
                reader.len(),
                B::NAME
            )));
        }
        Ok(Self::public_only(pk))
    }
}

pub(crate) enum Keys {
    Ou(KeyPair<Ou>),
    ElGamal(KeyPair<ElGamal>),
}

/// Key pair of one scheme, or its public half only.
///
/// Immutable once built; every read goes through `&self`, so a single
/// instance serves any number of concurrent operations.
pub struct KeyMaterial {
    keys: Keys,
    handle: PublicKeyHandle,
    fingerprint: u64,
}

impl KeyMaterial {
    pub fn generate(params: &SchemeParams, source: &mut Source) -> Result<Self> {
        let keys: Keys = match params {
            SchemeParams::Ou(params) => Keys::Ou(KeyPair::generate(params, source)?),
            SchemeParams::ElGamal(params) => Keys::ElGamal(KeyPair::generate(params, source)?),
        };
        Ok(Self::from_keys(keys))
    }

    pub fn from_public_key(handle: &PublicKeyHandle) -> Result<Self> {
        let keys: Keys = match handle.scheme() {
            SchemeType::Ou => Keys::Ou(KeyPair::read_public(handle.body())?),
            SchemeType::ElGamal => Keys::ElGamal(KeyPair::read_public(handle.body())?),
        };
        Ok(Self::from_keys(keys))
    }

    fn from_keys(keys: Keys) -> Self {
        let handle: PublicKeyHandle = match &keys {
            Keys::Ou(kp) => PublicKeyHandle::new::<OuPublicKey>(SchemeType::Ou, &kp.pk),
            Keys::ElGamal(kp) => PublicKeyHandle::new::<ElGamalPublicKey>(SchemeType::ElGamal, &kp.pk),
        };
        let fingerprint: u64 = fingerprint(handle.as_bytes());
        Self {
            keys,
            handle,
            fingerprint,
        }
    }

    pub fn scheme(&self) -> SchemeType {
        match &self.keys {
            Keys::Ou(_) => SchemeType::Ou,
            Keys::ElGamal(_) => SchemeType::ElGamal,
        }
    }

    pub fn has_private_key(&self) -> bool {
        match &self.keys {
            Keys::Ou(kp) => kp.sk.is_some(),
            Keys::ElGamal(kp) => kp.sk.is_some(),
        }
    }

    pub fn key_size(&self) -> u32 {
        match &self.keys {
            Keys::Ou(kp) => Ou::key_size(&kp.pk),
            Keys::ElGamal(kp) => ElGamal::key_size(&kp.pk),
        }
    }

    pub fn capacity_bits(&self) -> u32 {
        match &self.keys {
            Keys::Ou(kp) => Ou::capacity_bits(&kp.pk),
            Keys::ElGamal(kp) => ElGamal::capacity_bits(&kp.pk),
        }
    }

    pub fn public_key(&self) -> PublicKeyHandle {
        self.handle.clone()
    }

    /// FNV digest of the public key handle, carried by every ciphertext made under this key.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub(crate) fn encrypt(&self, m: &Integer, source: &mut Source) -> Result<Payload> {
        Ok(match &self.keys {
            Keys::Ou(kp) => Payload::Ou(Ou::encrypt(&kp.pk, m, source)?),
            Keys::ElGamal(kp) => Payload::ElGamal(ElGamal::encrypt(&kp.pk, m, source)?),
        })
    }

    pub(crate) fn decrypt(&self, ct: &Payload) -> Result<Integer> {
        match (&self.keys, ct) {
            (Keys::Ou(kp), Payload::Ou(c)) => Ok(Ou::decrypt(kp.secret()?, &kp.pk, c)?),
            (Keys::ElGamal(kp), Payload::ElGamal(c)) => Ok(ElGamal::decrypt(kp.secret()?, &kp.pk, c)?),
            _ => Err(self.mismatch(ct)),
        }
    }

    pub(crate) fn add(&self, a: &Payload, b: &Payload) -> Result<Payload> {
        let (scheme_a, scheme_b) = (a.scheme(), b.scheme());
        match (&self.keys, a, b) {
            (Keys::Ou(kp), Payload::Ou(a), Payload::Ou(b)) => Ok(Payload::Ou(Ou::add(&kp.pk, a, b))),
            (Keys::ElGamal(kp), Payload::ElGamal(a), Payload::ElGamal(b)) => {
                Ok(Payload::ElGamal(ElGamal::add(&kp.pk, a, b)))
            }
            _ => Err(self.pair_mismatch(scheme_a, scheme_b)),
        }
    }

    pub(crate) fn sub(&self, a: &Payload, b: &Payload) -> Result<Payload> {
        let (scheme_a, scheme_b) = (a.scheme(), b.scheme());
        match (&self.keys, a, b) {
            (Keys::Ou(kp), Payload::Ou(a), Payload::Ou(b)) => Ok(Payload::Ou(Ou::sub(&kp.pk, a, b)?)),
            (Keys::ElGamal(kp), Payload::ElGamal(a), Payload::ElGamal(b)) => {
                Ok(Payload::ElGamal(ElGamal::sub(&kp.pk, a, b)?))
            }
            _ => Err(self.pair_mismatch(scheme_a, scheme_b)),
        }
    }

    pub(crate) fn add_inplace(&self, a: &mut Payload, b: &Payload) -> Result<()> {
        let (scheme_a, scheme_b) = (a.scheme(), b.scheme());
        match (&self.keys, a, b) {
            (Keys::Ou(kp), Payload::Ou(a), Payload::Ou(b)) => Ou::add_inplace(&kp.pk, a, b),
            (Keys::ElGamal(kp), Payload::ElGamal(a), Payload::ElGamal(b)) => ElGamal::add_inplace(&kp.pk, a, b),
            _ => return Err(self.pair_mismatch(scheme_a, scheme_b)),
        }
        Ok(())
    }

    pub(crate) fn sub_inplace(&self, a: &mut Payload, b: &Payload) -> Result<()> {
        let (scheme_a, scheme_b) = (a.scheme(), b.scheme());
        match (&self.keys, a, b) {
            (Keys::Ou(kp), Payload::Ou(a), Payload::Ou(b)) => Ou::sub_inplace(&kp.pk, a, b)?,
            (Keys::ElGamal(kp), Payload::ElGamal(a), Payload::ElGamal(b)) => ElGamal::sub_inplace(&kp.pk, a, b)?,
            _ => return Err(self.pair_mismatch(scheme_a, scheme_b)),
        }
        Ok(())
    }

    pub(crate) fn validate(&self, ct: &Payload) -> Result<()> {
        match (&self.keys, ct) {
            (Keys::Ou(kp), Payload::Ou(c)) => Ok(Ou::validate(&kp.pk, c)?),
            (Keys::ElGamal(kp), Payload::ElGamal(c)) => Ok(ElGamal::validate(&kp.pk, c)?),
            _ => Err(self.mismatch(ct)),
        }
    }

    fn mismatch(&self, ct: &Payload) -> PheError {
        PheError::SchemeMismatch(format!(
            "{} ciphertext given to a {} kit",
            ct.scheme(),
            self.scheme()
        ))
    }

    fn pair_mismatch(&self, a: SchemeType, b: SchemeType) -> PheError {
        PheError::SchemeMismatch(format!(
            "cannot combine {} and {} ciphertexts under a {} kit",
            a,
            b,
            self.scheme()
        ))
    }
}
