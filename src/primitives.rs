//! Cryptographic primitives consumed by the protocol.
//!
//! This module is intentionally thin: it wraps exactly the four capabilities
//! `Keyed-hash`, `Hash`, `CSPRNG`, and `Sign/Verify` and nothing else. No
//! protocol logic lives here.

#![forbid(unsafe_code)]

use pqcrypto_dilithium::dilithium3;
use pqcrypto_traits::sign::{
    DetachedSignature as _, PublicKey as _, SecretKey as _,
};
use rand::{rngs::OsRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length in bytes of [`SecretKey`] and of every digest produced here.
pub const KEY_LEN: usize = 32;

/// 32-byte secret key shared by prover and verifier out of band.
///
/// Shorter inputs are zero-padded, longer inputs are truncated, per the data
/// model's §3 contract. The key is zeroized on drop and deliberately has no
/// `Debug`/`Display` impl that prints its bytes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; KEY_LEN]);

impl SecretKey {
    /// Build a key from arbitrary bytes, zero-padding or truncating to
    /// [`KEY_LEN`].
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut buf = [0u8; KEY_LEN];
        let n = bytes.len().min(KEY_LEN);
        buf[..n].copy_from_slice(&bytes[..n]);
        Self(buf)
    }

    #[inline]
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// Keyed hash, PRF-secure under the `key`. BLAKE3's native keyed mode is a
/// direct realization of the "keyed, 256-bit" contract and keeps the
/// dependency surface to the single hashing crate already used for the
/// transcript.
pub fn keyed_hash(key: &SecretKey, msg: &[u8]) -> [u8; 32] {
    *blake3::keyed_hash(key.as_bytes(), msg).as_bytes()
}

/// Unkeyed, collision-resistant hash used for transcript digests and
/// challenge derivation.
pub fn hash(msg: &[u8]) -> [u8; 32] {
    *blake3::hash(msg).as_bytes()
}

/// Draw `n` cryptographically secure random bytes.
///
/// Uses a fresh `OsRng` handle per call rather than a shared/global
/// generator, so callers running many proofs concurrently never contend on
/// (or accidentally share state through) a single RNG instance.
pub fn csprng_bytes(n: usize) -> Vec<u8> {
    let mut buf = vec![0u8; n];
    OsRng.fill_bytes(&mut buf);
    buf
}

/// Post-quantum signature errors.
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    #[error("malformed public key")]
    BadPublicKey,
    #[error("malformed secret key")]
    BadSecretKey,
    #[error("malformed signature")]
    BadSignature,
    #[error("signature verification failed")]
    VerifyFailed,
}

/// A Dilithium3 (ML-DSA-65, NIST level 3) key pair.
///
/// Generated fresh per prover; the signer owns its key pair as an explicit
/// value rather than living in module-local or global state.
pub struct Signer {
    public_key: dilithium3::PublicKey,
    secret_key: dilithium3::SecretKey,
}

impl Signer {
    /// Generate a new signing key pair.
    pub fn generate() -> Self {
        let (public_key, secret_key) = dilithium3::keypair();
        Self { public_key, secret_key }
    }

    /// Bytes of the public key, suitable for embedding in a proof or
    /// distributing out of band.
    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.public_key.as_bytes().to_vec()
    }

    /// Sign `msg`, producing a detached signature.
    pub fn sign(&self, msg: &[u8]) -> Vec<u8> {
        dilithium3::detached_sign(msg, &self.secret_key)
            .as_bytes()
            .to_vec()
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("public_key", &hex::encode(self.public_key.as_bytes()))
            .finish_non_exhaustive()
    }
}

/// Verify a detached Dilithium3 signature. Pure function of its three
/// arguments: deterministic, no shared state.
pub fn verify_signature(public_key: &[u8], msg: &[u8], signature: &[u8]) -> Result<(), SignError> {
    let pk = dilithium3::PublicKey::from_bytes(public_key).map_err(|_| SignError::BadPublicKey)?;
    let sig =
        dilithium3::DetachedSignature::from_bytes(signature).map_err(|_| SignError::BadSignature)?;
    dilithium3::verify_detached_signature(&sig, msg, &pk).map_err(|_| SignError::VerifyFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_hash_is_deterministic_and_key_dependent() {
        let k1 = SecretKey::from_bytes(&[0x41; 32]);
        let k2 = SecretKey::from_bytes(&[0x42; 32]);
        let a = keyed_hash(&k1, b"msg");
        let b = keyed_hash(&k1, b"msg");
        let c = keyed_hash(&k2, b"msg");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn secret_key_pads_and_truncates() {
        let short = SecretKey::from_bytes(b"k");
        assert_eq!(short.as_bytes()[0], b'k');
        assert_eq!(short.as_bytes()[1..], [0u8; 31]);

        let long = SecretKey::from_bytes(&[7u8; 64]);
        assert_eq!(long.as_bytes(), &[7u8; 32]);
    }

    #[test]
    fn sign_and_verify_round_trip() {
        let signer = Signer::generate();
        let msg = b"transcript bytes";
        let sig = signer.sign(msg);
        verify_signature(&signer.public_key_bytes(), msg, &sig).expect("valid signature");
    }

    #[test]
    fn verify_rejects_tampered_message() {
        let signer = Signer::generate();
        let sig = signer.sign(b"original");
        assert!(verify_signature(&signer.public_key_bytes(), b"tampered", &sig).is_err());
    }

    #[test]
    fn csprng_bytes_are_not_all_zero_and_correct_length() {
        let b = csprng_bytes(32);
        assert_eq!(b.len(), 32);
        assert!(b.iter().any(|&x| x != 0));
    }
}
