use backend::BackendError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PheError>;

/// Coarse classification of a [PheError], stable across wrapping by [PheError::AtIndex].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    SchemeMismatch,
    NoPrivateKey,
    EncodingOverflow,
    InvalidCiphertext,
    InvalidConfig,
    Aborted,
    Backend,
    ThreadPool,
}

#[derive(Debug, Error)]
pub enum PheError {
    /// Operands or kit disagree on scheme, arity or public key.
    #[error("scheme mismatch: {0}")]
    SchemeMismatch(String),
    #[error("no private key: the kit only holds a public key")]
    NoPrivateKey,
    #[error("encoding overflow: {0}")]
    EncodingOverflow(String),
    #[error("invalid ciphertext: {0}")]
    InvalidCiphertext(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("batch aborted")]
    Aborted,
    /// Failure of one element of a batch call.
    #[error("batch item {index}: {source}")]
    AtIndex {
        index: usize,
        #[source]
        source: Box<PheError>,
    },
    #[error("backend: {0}")]
    Backend(BackendError),
    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl PheError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PheError::SchemeMismatch(_) => ErrorKind::SchemeMismatch,
            PheError::NoPrivateKey => ErrorKind::NoPrivateKey,
            PheError::EncodingOverflow(_) => ErrorKind::EncodingOverflow,
            PheError::InvalidCiphertext(_) => ErrorKind::InvalidCiphertext,
            PheError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            PheError::Aborted => ErrorKind::Aborted,
            PheError::AtIndex { source, .. } => source.kind(),
            PheError::Backend(_) => ErrorKind::Backend,
            PheError::ThreadPool(_) => ErrorKind::ThreadPool,
        }
    }

    /// Index of the failing batch element, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            PheError::AtIndex { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub(crate) fn at(self, index: usize) -> PheError {
        PheError::AtIndex {
            index,
            source: Box::new(self),
        }
    }
}

impl From<BackendError> for PheError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::DiscreteLogOutOfRange { .. } => PheError::EncodingOverflow(err.to_string()),
            BackendError::CiphertextOutOfRange => PheError::InvalidCiphertext(err.to_string()),
            _ => PheError::Backend(err),
        }
    }
}
