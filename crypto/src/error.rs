use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("malformed armor: {0}")]
    MalformedArmor(String),

    #[error("invalid public key: {0}")]
    InvalidKey(String),

    #[error("envelope too short to contain a signature ({0} bytes)")]
    TruncatedEnvelope(usize),

    #[error("signature did not verify against any key in the ring")]
    SignatureInvalid,
}
