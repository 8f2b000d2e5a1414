//! # Signature Oracle
//!
//! `verify(publicKey, userDataTuple, signature) -> bool`, the one function
//! every ingress path (mempool, battle/trade registration) calls before
//! trusting a client's claim.
//!
//! The canonical encoding is frozen: JSON-array-encode the ordered
//! `[payload, timestamp, userID, type]` tuple with `serde_json`'s default
//! (whitespace-free) writer, SHA-256 the bytes, then ECDSA-P256 verify.
//! Any client library must reproduce this exact byte sequence before
//! signing, or every signature it produces will fail here.

use tcg_crypto::{sha256, P256PublicKey, P256Signature};

use crate::errors::SignatureError;

/// Canonical bytes signed by the client: the compact JSON encoding of the
/// ordered string tuple, with no extra whitespace.
pub fn canonical_bytes(user_data: &[String]) -> Vec<u8> {
    serde_json::to_vec(user_data).expect("string vec always serializes")
}

/// Verify a signature over `user_data`, returning the reason on failure.
/// Malformed keys or signatures are reported distinctly from a
/// mathematically-failed verification so callers can log/metric them apart,
/// but all three collapse to a single boolean for [`verify`].
pub fn try_verify(
    public_key: &[u8],
    user_data: &[String],
    signature: &[u8],
) -> Result<(), SignatureError> {
    let key = P256PublicKey::from_sec1_bytes(public_key)
        .map_err(|_| SignatureError::InvalidPublicKey)?;
    let sig =
        P256Signature::from_r_s_bytes(signature).map_err(|_| SignatureError::InvalidSignature)?;
    let digest = sha256(&canonical_bytes(user_data));
    key.verify(&digest, &sig)
        .map_err(|_| SignatureError::VerificationFailed)
}

/// `verify(publicKey, userDataTuple, signature) -> bool` per the oracle
/// contract: any failure mode — bad key encoding, bad signature encoding,
/// or a mathematically invalid signature — collapses to `false`.
pub fn verify(public_key: &[u8], user_data: &[String], signature: &[u8]) -> bool {
    try_verify(public_key, user_data, signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcg_crypto::P256KeyPair;

    fn sample_tuple() -> Vec<String> {
        vec![
            "{\"intent\":\"buy_booster_standard\"}".to_string(),
            "1000".to_string(),
            "alice".to_string(),
            "PURCHASE".to_string(),
        ]
    }

    fn sign_tuple(keypair: &P256KeyPair, user_data: &[String]) -> Vec<u8> {
        let digest = sha256(&canonical_bytes(user_data));
        keypair.sign(&digest).to_r_s_bytes()
    }

    #[test]
    fn valid_signature_verifies() {
        let keypair = P256KeyPair::generate();
        let user_data = sample_tuple();
        let sig = sign_tuple(&keypair, &user_data);
        let pk = keypair.public_key().to_sec1_bytes();
        assert!(verify(&pk, &user_data, &sig));
    }

    #[test]
    fn bit_flip_in_payload_fails() {
        let keypair = P256KeyPair::generate();
        let mut user_data = sample_tuple();
        let sig = sign_tuple(&keypair, &user_data);
        user_data[0] = "{\"intent\":\"buy_booster_deluxe\"}".to_string();
        let pk = keypair.public_key().to_sec1_bytes();
        assert!(!verify(&pk, &user_data, &sig));
    }

    #[test]
    fn bit_flip_in_timestamp_fails() {
        let keypair = P256KeyPair::generate();
        let mut user_data = sample_tuple();
        let sig = sign_tuple(&keypair, &user_data);
        user_data[1] = "1001".to_string();
        let pk = keypair.public_key().to_sec1_bytes();
        assert!(!verify(&pk, &user_data, &sig));
    }

    #[test]
    fn bit_flip_in_user_id_fails() {
        let keypair = P256KeyPair::generate();
        let mut user_data = sample_tuple();
        let sig = sign_tuple(&keypair, &user_data);
        user_data[2] = "mallory".to_string();
        let pk = keypair.public_key().to_sec1_bytes();
        assert!(!verify(&pk, &user_data, &sig));
    }

    #[test]
    fn bit_flip_in_type_fails() {
        let keypair = P256KeyPair::generate();
        let mut user_data = sample_tuple();
        let sig = sign_tuple(&keypair, &user_data);
        user_data[3] = "TRADE".to_string();
        let pk = keypair.public_key().to_sec1_bytes();
        assert!(!verify(&pk, &user_data, &sig));
    }

    #[test]
    fn wrong_public_key_fails() {
        let keypair = P256KeyPair::generate();
        let other = P256KeyPair::generate();
        let user_data = sample_tuple();
        let sig = sign_tuple(&keypair, &user_data);
        let pk = other.public_key().to_sec1_bytes();
        assert!(!verify(&pk, &user_data, &sig));
    }

    #[test]
    fn tampered_signature_bytes_fail() {
        let keypair = P256KeyPair::generate();
        let user_data = sample_tuple();
        let mut sig = sign_tuple(&keypair, &user_data);
        sig[0] ^= 0xFF;
        let pk = keypair.public_key().to_sec1_bytes();
        assert!(!verify(&pk, &user_data, &sig));
    }

    #[test]
    fn malformed_key_or_signature_never_panics() {
        assert!(!verify(&[], &sample_tuple(), &[]));
        assert!(!verify(&[1, 2, 3], &sample_tuple(), &[4, 5, 6]));
    }

    proptest::proptest! {
        #[test]
        fn arbitrary_valid_tuples_round_trip(
            payload in "[a-z]{0,32}",
            user_id in "[a-z]{1,16}",
        ) {
            let keypair = P256KeyPair::generate();
            let user_data = vec![payload, "1234".to_string(), user_id, "PURCHASE".to_string()];
            let sig = sign_tuple(&keypair, &user_data);
            let pk = keypair.public_key().to_sec1_bytes();
            proptest::prop_assert!(verify(&pk, &user_data, &sig));
        }
    }
}
