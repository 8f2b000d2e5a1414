//! # ECDSA Signatures (NIST P-256)
//!
//! Client-facing transaction signing uses P-256, matching the curve the
//! original client menu signs with. Signature encoding is the raw `R || S`
//! pair, each component padded to 32 bytes; public keys are uncompressed
//! SEC1 points (`0x04 || X || Y`, 65 bytes).

use crate::CryptoError;
use p256::ecdsa::{
    signature::hazmat::{PrehashSigner, PrehashVerifier},
    Signature, SigningKey, VerifyingKey,
};

/// An uncompressed P-256 public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct P256PublicKey(VerifyingKey);

impl P256PublicKey {
    /// Parse from SEC1 bytes (accepts both compressed and uncompressed
    /// encodings; the wire format used by this system is uncompressed).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        VerifyingKey::from_sec1_bytes(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidPublicKey)
    }

    /// Uncompressed SEC1 encoding (65 bytes).
    pub fn to_sec1_bytes(&self) -> Vec<u8> {
        self.0.to_encoded_point(false).as_bytes().to_vec()
    }

    /// Verify a signature over a pre-computed digest. The caller hashes the
    /// message exactly once (per the canonical signing contract) and passes
    /// that digest here directly — this does not hash again internally.
    pub fn verify(&self, digest: &[u8], signature: &P256Signature) -> Result<(), CryptoError> {
        self.0
            .verify_prehash(digest, &signature.0)
            .map_err(|_| CryptoError::VerificationFailed)
    }
}

/// A P-256 ECDSA signature, `R || S` with each component 32 bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct P256Signature(Signature);

impl P256Signature {
    /// Parse from the 64-byte `R || S` wire encoding. Returns
    /// `InvalidSignature` for anything shorter than 64 bytes or that fails
    /// the underlying curve-order check — never panics on attacker input.
    pub fn from_r_s_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 64 {
            return Err(CryptoError::InvalidSignature);
        }
        Signature::from_slice(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidSignature)
    }

    /// Re-encode as the 64-byte `R || S` wire format.
    pub fn to_r_s_bytes(&self) -> Vec<u8> {
        self.0.to_bytes().to_vec()
    }
}

/// A P-256 keypair, used by test fixtures and the (out-of-scope) client to
/// produce transaction signatures this node verifies.
pub struct P256KeyPair {
    signing_key: SigningKey,
}

impl P256KeyPair {
    /// Generate a random keypair (test/tooling use only — production
    /// signing happens on the client, outside this crate's scope).
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut rand_core::OsRng),
        }
    }

    pub fn public_key(&self) -> P256PublicKey {
        P256PublicKey(*self.signing_key.verifying_key())
    }

    /// Sign a pre-computed digest directly (no internal re-hashing) — the
    /// caller is responsible for hashing the canonical bytes exactly once,
    /// per the signing contract (see `tcg-signature`).
    pub fn sign(&self, digest: &[u8]) -> P256Signature {
        P256Signature(
            self.signing_key
                .sign_prehash(digest)
                .expect("digest-length signing never fails"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_round_trips() {
        let keypair = P256KeyPair::generate();
        let digest = crate::sha256(b"hello trading card game");
        let sig = keypair.sign(&digest);
        keypair.public_key().verify(&digest, &sig).unwrap();
    }

    #[test]
    fn tampered_message_fails_verification() {
        let keypair = P256KeyPair::generate();
        let digest_one = crate::sha256(b"message one");
        let digest_two = crate::sha256(b"message two");
        let sig = keypair.sign(&digest_one);
        assert!(keypair.public_key().verify(&digest_two, &sig).is_err());
    }

    #[test]
    fn public_key_round_trips_through_sec1_bytes() {
        let keypair = P256KeyPair::generate();
        let bytes = keypair.public_key().to_sec1_bytes();
        assert_eq!(bytes.len(), 65);
        let parsed = P256PublicKey::from_sec1_bytes(&bytes).unwrap();
        assert_eq!(parsed, keypair.public_key());
    }

    #[test]
    fn signature_round_trips_through_r_s_bytes() {
        let keypair = P256KeyPair::generate();
        let sig = keypair.sign(&crate::sha256(b"payload"));
        let bytes = sig.to_r_s_bytes();
        assert_eq!(bytes.len(), 64);
        let parsed = P256Signature::from_r_s_bytes(&bytes).unwrap();
        assert_eq!(parsed, sig);
    }

    #[test]
    fn malformed_signature_bytes_rejected_not_panicking() {
        assert!(P256Signature::from_r_s_bytes(&[0u8; 3]).is_err());
        assert!(P256Signature::from_r_s_bytes(&[0u8; 64]).is_err());
    }
}
