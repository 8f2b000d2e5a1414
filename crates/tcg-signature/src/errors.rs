//! Signature oracle error types.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("public key is malformed")]
    InvalidPublicKey,

    #[error("signature is malformed")]
    InvalidSignature,

    #[error("signature does not verify against the given key and payload")]
    VerificationFailed,
}
