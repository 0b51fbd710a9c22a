use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("invalid scheme parameters: {0}")]
    InvalidParams(String),
    #[error("element is not invertible modulo the group modulus")]
    NotInvertible,
    #[error("discrete logarithm outside the decodable range |m| < 2^{bits}")]
    DiscreteLogOutOfRange { bits: u32 },
    #[error("ciphertext component outside the group")]
    CiphertextOutOfRange,
}
