//! Prover / Verifier orchestration.
//!
//! This module wires the five lower layers (encoder, commitment, transcript,
//! challenge, response) into the two protocol-facing entry points: `Prover`
//! and `Verifier`. It keeps the teacher's naming — `scheduler` is the module
//! that assembles the whole per-proof pipeline — even though, unlike the
//! teacher's polynomial scheduler, there is no tile/block scheduling left to
//! do here: the "schedule" is just commit → challenge → respond → sign.

#![forbid(unsafe_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::challenge::{derive_challenges, ChallengeKind, ChallengeParams, ChallengeRecord};
use crate::commitment::{commit, Commitment, Id};
use crate::encoder::{coherence, entropy, ComplexVector};
use crate::primitives::{hash, verify_signature, SecretKey, SignError, Signer};
use crate::response::{build_responses, expected_tag, Response};
use crate::security::SecurityLevel;
use crate::transcript::{FsLabel, Transcript};

/// Public, coarse scalar summaries over `V`, carried in the proof. These
/// leak global statistics by design (spec.md §4.2) but never a coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub entropy: f64,
    pub coherence: f64,
    pub dimension: u32,
}

/// One challenge record in its wire (serializable) form: `params` is an
/// opaque, type-specific byte string rather than a Rust enum, matching
/// spec.md §6.1's `{ index, type, params: bytes }` shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChallengeWire {
    pub index: u64,
    #[serde(rename = "type")]
    pub kind: ChallengeKind,
    #[serde(with = "hex::serde")]
    pub params: Vec<u8>,
}

impl From<&ChallengeRecord> for ChallengeWire {
    fn from(c: &ChallengeRecord) -> Self {
        let params = match c.params {
            ChallengeParams::Measurement { basis } => vec![basis],
            ChallengeParams::Coherence => Vec::new(),
            ChallengeParams::Entanglement { a, b } => {
                let mut v = Vec::with_capacity(8);
                v.extend_from_slice(&a.to_be_bytes());
                v.extend_from_slice(&b.to_be_bytes());
                v
            }
        };
        ChallengeWire { index: c.index, kind: c.kind, params }
    }
}

/// The full, self-contained, serializable proof bundle of spec.md §3/§6.1.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proof {
    #[serde(with = "hex::serde")]
    pub commitment: Commitment,
    pub identifier: String,
    pub security_level: u32,
    pub metadata: Metadata,
    pub challenges: Vec<ChallengeWire>,
    pub responses: Vec<Response>,
    #[serde(with = "hex::serde")]
    pub signature: Vec<u8>,
    #[serde(with = "hex::serde")]
    pub public_key: Vec<u8>,
    pub timestamp: DateTime<Utc>,
}

/// The subset of [`Proof`] that is actually signed: everything except the
/// signature/public-key/timestamp fields that are attached afterward.
#[derive(Serialize)]
struct SignablePayload<'a> {
    #[serde(with = "hex::serde")]
    commitment: &'a Commitment,
    identifier: &'a str,
    security_level: u32,
    metadata: &'a Metadata,
    challenges: &'a [ChallengeWire],
    responses: &'a [Response],
}

fn signable_bytes(
    commitment: &Commitment,
    identifier: &str,
    security_level: u32,
    metadata: &Metadata,
    challenges: &[ChallengeWire],
    responses: &[Response],
) -> Vec<u8> {
    let payload = SignablePayload { commitment, identifier, security_level, metadata, challenges, responses };
    serde_json::to_vec(&payload).expect("signable payload is always representable as JSON")
}

/// Recompute the public transcript digest `T = Hash(C || ID || σ ||
/// serialize(metadata))` from the public parts of a proof.
fn recompute_transcript_digest(commitment: &Commitment, identifier: &str, security_level: u32, metadata: &Metadata) -> [u8; 32] {
    let mut t = Transcript::new();
    t.absorb(FsLabel::Commitment, commitment);
    t.absorb(FsLabel::Identifier, identifier.as_bytes());
    t.absorb_u32(FsLabel::SecurityLevel, security_level);
    let metadata_bytes = serde_json::to_vec(metadata).expect("metadata is always representable as JSON");
    t.absorb(FsLabel::Metadata, &metadata_bytes);
    t.digest()
}

/// Errors raised while constructing a proof.
#[derive(Debug, thiserror::Error)]
pub enum ProveError {
    #[error("identifier must be valid UTF-8 to serialize as the wire format's `identifier` string")]
    NonUtf8Identifier,
    #[error(transparent)]
    SecurityLevel(#[from] crate::security::UnsupportedSecurityLevel),
    #[error("signing failed: {0}")]
    Signing(#[from] SignError),
}

/// A prover: owns a freshly generated post-quantum signing key pair and
/// produces proofs of possession of a secret complex unit vector.
pub struct Prover {
    signer: Signer,
}

impl Prover {
    /// Generate a new prover with a fresh signing key pair.
    pub fn new() -> Self {
        Self { signer: Signer::generate() }
    }

    /// The public key embedded in every proof this prover produces.
    pub fn public_key(&self) -> Vec<u8> {
        self.signer.public_key_bytes()
    }

    /// `Prove(V, ID, K, σ) -> P` (spec.md §4.6).
    pub fn prove(
        &self,
        vector: &ComplexVector,
        id: &Id,
        key: &SecretKey,
        level: SecurityLevel,
    ) -> Result<Proof, ProveError> {
        let identifier = std::str::from_utf8(id.as_bytes())
            .map_err(|_| ProveError::NonUtf8Identifier)?
            .to_owned();

        let metadata = Metadata {
            entropy: entropy(vector),
            coherence: coherence(vector),
            dimension: vector.dimension() as u32,
        };

        let commitment = commit(vector, id, key);
        let security_level = level.bits();
        let transcript_digest = recompute_transcript_digest(&commitment, &identifier, security_level, &metadata);

        let challenge_records = derive_challenges(&transcript_digest, level.challenge_count(), vector.dimension());
        let responses = build_responses(&transcript_digest, &challenge_records, vector, key);
        let challenges: Vec<ChallengeWire> = challenge_records.iter().map(ChallengeWire::from).collect();

        let message = signable_bytes(&commitment, &identifier, security_level, &metadata, &challenges, &responses);
        let signature = self.signer.sign(&message);

        tracing::debug!(
            identifier = %identifier,
            security_level,
            dimension = metadata.dimension,
            "produced proof"
        );

        Ok(Proof {
            commitment,
            identifier,
            security_level,
            metadata,
            challenges,
            responses,
            signature,
            public_key: self.public_key(),
            timestamp: Utc::now(),
        })
    }
}

impl Default for Prover {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for [`Verifier::verify`] beyond the shared secret key.
#[derive(Clone, Copy, Debug, Default)]
pub struct VerifierConfig {
    /// If set, proofs whose `timestamp` is further than this from "now" are
    /// rejected (spec.md §4.6 step 5, optional).
    pub max_clock_skew: Option<chrono::Duration>,
}

/// Local-only diagnostic describing which rejection stage fired. Never
/// serialized and never returned from the public `verify` boolean API —
/// spec.md §7: "implementations MAY log but MUST NOT surface a
/// distinguishing value over untrusted channels."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VerifyFailure {
    UnsupportedSecurityLevel,
    MalformedShape,
    TranscriptMismatch,
    ResponseTagMismatch,
    SignatureInvalid,
    ClockSkew,
}

/// A verifier: checks proofs against the shared secret key.
pub struct Verifier {
    config: VerifierConfig,
}

impl Verifier {
    pub fn new() -> Self {
        Self { config: VerifierConfig::default() }
    }

    pub fn with_config(config: VerifierConfig) -> Self {
        Self { config }
    }

    /// `Verify(P, K) -> bool` (spec.md §4.6). Never returns partial credit;
    /// any failure collapses to `false`.
    pub fn verify(&self, proof: &Proof, key: &SecretKey) -> bool {
        match self.verify_diagnostic(proof, key) {
            Ok(()) => true,
            Err(failure) => {
                tracing::debug!(?failure, "proof rejected");
                false
            }
        }
    }

    fn verify_diagnostic(&self, proof: &Proof, key: &SecretKey) -> Result<(), VerifyFailure> {
        // 1. Shape / security level.
        let level = SecurityLevel::new(proof.security_level).map_err(|_| VerifyFailure::UnsupportedSecurityLevel)?;
        if proof.challenges.len() != level.challenge_count() || proof.responses.len() != proof.challenges.len() {
            return Err(VerifyFailure::MalformedShape);
        }
        for (c, r) in proof.challenges.iter().zip(proof.responses.iter()) {
            if c.index != r.index || c.kind != r.kind {
                return Err(VerifyFailure::MalformedShape);
            }
        }

        // 2. Recompute transcript and challenges; compare element-wise.
        let transcript_digest =
            recompute_transcript_digest(&proof.commitment, &proof.identifier, proof.security_level, &proof.metadata);
        let expected_records =
            derive_challenges(&transcript_digest, level.challenge_count(), proof.metadata.dimension as usize);
        let expected_wires: Vec<ChallengeWire> = expected_records.iter().map(ChallengeWire::from).collect();
        if expected_wires != proof.challenges {
            return Err(VerifyFailure::TranscriptMismatch);
        }

        // 3. Recompute each response tag under the shared key.
        for (record, response) in expected_records.iter().zip(proof.responses.iter()) {
            let expected = expected_tag(&transcript_digest, record, response, key).ok_or(VerifyFailure::ResponseTagMismatch)?;
            if expected != response.tag {
                return Err(VerifyFailure::ResponseTagMismatch);
            }
        }

        // 4. Verify the signature over the same serialized message.
        let message = signable_bytes(
            &proof.commitment,
            &proof.identifier,
            proof.security_level,
            &proof.metadata,
            &proof.challenges,
            &proof.responses,
        );
        verify_signature(&proof.public_key, &message, &proof.signature).map_err(|_| VerifyFailure::SignatureInvalid)?;

        // 5. Optional timestamp skew.
        if let Some(max_skew) = self.config.max_clock_skew {
            let delta = Utc::now().signed_duration_since(proof.timestamp);
            if delta.abs() > max_skew {
                return Err(VerifyFailure::ClockSkew);
            }
        }

        // 6. Accept.
        Ok(())
    }
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience: hash of an arbitrary byte slice, re-exported so callers and
/// tests can compute ad-hoc digests without reaching into `primitives`.
#[inline]
pub fn digest(bytes: &[u8]) -> [u8; 32] {
    hash(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode_bytes;

    fn key(byte: u8) -> SecretKey {
        SecretKey::from_bytes(&[byte; 32])
    }

    #[test]
    fn honest_proof_verifies() {
        let v = encode_bytes(b"Hello, Quantum World!", 8).unwrap();
        let id = Id::from("ctx");
        let k = key(0x41);
        let prover = Prover::new();
        let proof = prover.prove(&v, &id, &k, SecurityLevel::new(32).unwrap()).unwrap();
        assert!(Verifier::new().verify(&proof, &k));
    }

    #[test]
    fn wrong_key_rejected() {
        let v = encode_bytes(b"Hello, Quantum World!", 8).unwrap();
        let id = Id::from("ctx");
        let k = key(0x41);
        let wrong = key(0x42);
        let prover = Prover::new();
        let proof = prover.prove(&v, &id, &k, SecurityLevel::new(32).unwrap()).unwrap();
        assert!(!Verifier::new().verify(&proof, &wrong));
    }

    #[test]
    fn cross_context_identifier_rejected() {
        let v = encode_bytes(b"Hello, Quantum World!", 8).unwrap();
        let k = key(0x41);
        let prover = Prover::new();
        let mut proof = prover.prove(&v, &Id::from("ctx-1"), &k, SecurityLevel::new(32).unwrap()).unwrap();
        proof.identifier = "ctx-2".to_string();
        assert!(!Verifier::new().verify(&proof, &k));
    }

    #[test]
    fn tampering_any_byte_is_rejected() {
        let v = encode_bytes(b"Hello, Quantum World!", 8).unwrap();
        let id = Id::from("ctx");
        let k = key(0x41);
        let prover = Prover::new();
        let proof = prover.prove(&v, &id, &k, SecurityLevel::new(32).unwrap()).unwrap();

        let mut bytes = serde_json::to_vec(&proof).unwrap();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0x01;
        match serde_json::from_slice::<Proof>(&bytes) {
            Ok(tampered) => assert!(!Verifier::new().verify(&tampered, &k)),
            Err(_) => { /* malformed JSON is itself a rejection */ }
        }
    }

    #[test]
    fn security_level_determines_challenge_count() {
        let v = encode_bytes(b"payload", 8).unwrap();
        let id = Id::from("ctx");
        let k = key(0x11);
        let prover = Prover::new();

        let p128 = prover.prove(&v, &id, &k, SecurityLevel::new(128).unwrap()).unwrap();
        assert_eq!(p128.challenges.len(), 128);
        assert_eq!(p128.responses.len(), 128);

        let p256 = prover.prove(&v, &id, &k, SecurityLevel::new(256).unwrap()).unwrap();
        assert_eq!(p256.challenges.len(), 256);
        assert_eq!(p256.responses.len(), 256);
    }

    #[test]
    fn response_type_distribution_is_reasonable_at_sigma_64() {
        let v = encode_bytes(&[1, 2, 3, 4, 5, 6, 7, 8], 2).unwrap();
        let id = Id::from("bell");
        let k = SecretKey::from_bytes(b"k");
        let prover = Prover::new();
        let proof = prover.prove(&v, &id, &k, SecurityLevel::new(64).unwrap()).unwrap();

        let mut counts = [0usize; 3];
        for r in &proof.responses {
            match r.kind {
                ChallengeKind::Measurement => counts[0] += 1,
                ChallengeKind::Coherence => counts[1] += 1,
                ChallengeKind::Entanglement => counts[2] += 1,
            }
        }
        for c in counts {
            assert!((15..=30).contains(&c), "count {c} out of expected band");
        }
    }

    #[test]
    fn parallel_proofs_are_all_mutually_valid() {
        use rayon::prelude::*;

        let k = key(0x77);
        let results: Vec<bool> = (0u8..8)
            .into_par_iter()
            .map(|i| {
                let data = [i; 16];
                let v = encode_bytes(&data, 8).unwrap();
                let id = Id::from("parallel-ctx");
                let prover = Prover::new();
                let proof = prover.prove(&v, &id, &k, SecurityLevel::new(32).unwrap()).unwrap();
                Verifier::new().verify(&proof, &k)
            })
            .collect();
        assert!(results.iter().all(|ok| *ok));
    }
}
