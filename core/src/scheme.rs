use std::fmt;
use std::str::FromStr;

use backend::{Backend, ElGamal, ElGamalParams, Ou, OuParams};

use crate::PheError;

/// Supported cryptosystems.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemeType {
    Ou,
    ElGamal,
}

impl SchemeType {
    pub const ALL: [SchemeType; 2] = [SchemeType::Ou, SchemeType::ElGamal];

    pub fn name(&self) -> &'static str {
        match self {
            SchemeType::Ou => Ou::NAME,
            SchemeType::ElGamal => ElGamal::NAME,
        }
    }

    pub fn default_params(&self) -> SchemeParams {
        match self {
            SchemeType::Ou => SchemeParams::Ou(OuParams::default()),
            SchemeType::ElGamal => SchemeParams::ElGamal(ElGamalParams::default()),
        }
    }

    pub(crate) fn tag(&self) -> u8 {
        match self {
            SchemeType::Ou => 1,
            SchemeType::ElGamal => 2,
        }
    }

    pub(crate) fn from_tag(tag: u8) -> Option<Self> {
        SchemeType::ALL.into_iter().find(|scheme| scheme.tag() == tag)
    }
}

impl fmt::Display for SchemeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SchemeType {
    type Err = PheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemeType::ALL
            .into_iter()
            .find(|scheme| scheme.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| PheError::InvalidConfig(format!("unknown scheme: {}", s)))
    }
}

/// Scheme together with its key generation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemeParams {
    Ou(OuParams),
    ElGamal(ElGamalParams),
}

impl SchemeParams {
    pub fn scheme(&self) -> SchemeType {
        match self {
            SchemeParams::Ou(_) => SchemeType::Ou,
            SchemeParams::ElGamal(_) => SchemeType::ElGamal,
        }
    }
}

impl From<SchemeType> for SchemeParams {
    fn from(scheme: SchemeType) -> Self {
        scheme.default_params()
    }
}

impl From<OuParams> for SchemeParams {
    fn from(params: OuParams) -> Self {
        SchemeParams::Ou(params)
    }
}

impl From<ElGamalParams> for SchemeParams {
    fn from(params: ElGamalParams) -> Self {
        SchemeParams::ElGamal(params)
    }
}
