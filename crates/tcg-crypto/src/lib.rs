//! # tcg-crypto
//!
//! P-256 ECDSA primitives and SHA-256 hashing — the cryptographic base the
//! signature oracle, mempool, ledger, and miner build on.

mod ecdsa;
mod errors;
mod hashing;

pub use ecdsa::{P256KeyPair, P256PublicKey, P256Signature};
pub use errors::CryptoError;
pub use hashing::sha256;
