//! Response constructor: builds, for each challenge, a zero-knowledge
//! response that contains only a challenge reference, a type tag, a single
//! derived scalar-or-digest, and a nonce — never a raw coordinate of `V`.

#![forbid(unsafe_code)]

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::challenge::{ChallengeKind, ChallengeParams, ChallengeRecord};
use crate::encoder::{coherence, ComplexVector};
use crate::primitives::{csprng_bytes, keyed_hash, SecretKey};

/// Length in bytes of a response nonce.
pub const NONCE_LEN: usize = 16;

/// A single challenge response. Contains no raw coordinate of `V`: only the
/// challenge reference, a type tag, a keyed-hash digest, and — for
/// coherence challenges — the already-public coarse scalar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub index: u64,
    #[serde(rename = "type")]
    pub kind: ChallengeKind,
    #[serde(with = "hex_32")]
    pub tag: [u8; 32],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scalar: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indices: Option<(u32, u32)>,
    #[serde(with = "hex_nonce")]
    pub nonce: [u8; NONCE_LEN],
}

/// Round a scalar to 6 decimal digits, matching the commitment's fixed
/// float format (spec.md §9 Design Note 2) so prover and verifier agree
/// bit-for-bit on the bytes fed into the response tag.
fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

fn measurement_tag(key: &SecretKey, transcript_digest: &[u8; 32], index: u64, nonce: &[u8]) -> [u8; 32] {
    let mut msg = Vec::from(*b"meas");
    msg.extend_from_slice(transcript_digest);
    msg.extend_from_slice(&index.to_be_bytes());
    msg.extend_from_slice(nonce);
    keyed_hash(key, &msg)
}

fn coherence_tag(
    key: &SecretKey,
    transcript_digest: &[u8; 32],
    rounded_coherence: f64,
    nonce: &[u8],
) -> [u8; 32] {
    let mut msg = Vec::from(*b"coh");
    msg.extend_from_slice(transcript_digest);
    msg.extend_from_slice(format!("{:.6}", rounded_coherence).as_bytes());
    msg.extend_from_slice(nonce);
    keyed_hash(key, &msg)
}

fn entanglement_tag(
    key: &SecretKey,
    transcript_digest: &[u8; 32],
    a: u32,
    b: u32,
    nonce: &[u8],
) -> [u8; 32] {
    let mut msg = Vec::from(*b"ent");
    msg.extend_from_slice(transcript_digest);
    msg.extend_from_slice(&a.to_be_bytes());
    msg.extend_from_slice(&b.to_be_bytes());
    msg.extend_from_slice(nonce);
    keyed_hash(key, &msg)
}

/// Build the response to a single challenge, drawing a fresh CSPRNG nonce.
pub fn build_response(
    transcript_digest: &[u8; 32],
    challenge: &ChallengeRecord,
    vector: &ComplexVector,
    key: &SecretKey,
) -> Response {
    let nonce_bytes = csprng_bytes(NONCE_LEN);
    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&nonce_bytes);
    build_response_with_nonce(transcript_digest, challenge, vector, key, nonce)
}

/// As [`build_response`], but with an explicit nonce — the verifier uses
/// this to recompute the expected tag from the nonce carried in the
/// response it received.
pub fn build_response_with_nonce(
    transcript_digest: &[u8; 32],
    challenge: &ChallengeRecord,
    vector: &ComplexVector,
    key: &SecretKey,
    nonce: [u8; NONCE_LEN],
) -> Response {
    match challenge.params {
        ChallengeParams::Measurement { .. } => {
            let tag = measurement_tag(key, transcript_digest, challenge.index, &nonce);
            Response {
                index: challenge.index,
                kind: ChallengeKind::Measurement,
                tag,
                scalar: None,
                indices: None,
                nonce,
            }
        }
        ChallengeParams::Coherence => {
            let rounded = round6(coherence(vector));
            let tag = coherence_tag(key, transcript_digest, rounded, &nonce);
            Response {
                index: challenge.index,
                kind: ChallengeKind::Coherence,
                tag,
                scalar: Some(rounded),
                indices: None,
                nonce,
            }
        }
        ChallengeParams::Entanglement { a, b } => {
            let tag = entanglement_tag(key, transcript_digest, a, b, &nonce);
            Response {
                index: challenge.index,
                kind: ChallengeKind::Entanglement,
                tag,
                scalar: None,
                indices: Some((a, b)),
                nonce,
            }
        }
    }
}

/// Below this challenge count, responses are built sequentially; at or
/// above it the per-challenge work (independent keyed hashes) is fanned out
/// with `rayon`, since each response depends only on its own challenge and
/// a read-only view of `V`/`K` (spec.md §5: response construction within
/// one proof MAY be parallelized across challenges).
const PARALLEL_THRESHOLD: usize = 64;

/// Build every response for `challenges`, preserving challenge-index order
/// in the output (required so transcripts stay deterministic, spec.md §5).
pub fn build_responses(
    transcript_digest: &[u8; 32],
    challenges: &[ChallengeRecord],
    vector: &ComplexVector,
    key: &SecretKey,
) -> Vec<Response> {
    if challenges.len() < PARALLEL_THRESHOLD {
        challenges
            .iter()
            .map(|c| build_response(transcript_digest, c, vector, key))
            .collect()
    } else {
        challenges
            .par_iter()
            .map(|c| build_response(transcript_digest, c, vector, key))
            .collect()
    }
}

/// Recompute the expected tag for `response` given the challenge it
/// answers. Used by the verifier; does not require `V`.
pub fn expected_tag(
    transcript_digest: &[u8; 32],
    challenge: &ChallengeRecord,
    response: &Response,
    key: &SecretKey,
) -> Option<[u8; 32]> {
    match (challenge.params, response.kind) {
        (ChallengeParams::Measurement { .. }, ChallengeKind::Measurement) => Some(measurement_tag(
            key,
            transcript_digest,
            challenge.index,
            &response.nonce,
        )),
        (ChallengeParams::Coherence, ChallengeKind::Coherence) => {
            let scalar = response.scalar?;
            Some(coherence_tag(key, transcript_digest, scalar, &response.nonce))
        }
        (ChallengeParams::Entanglement { a, b }, ChallengeKind::Entanglement) => {
            let (ra, rb) = response.indices?;
            if ra != a || rb != b {
                return None;
            }
            Some(entanglement_tag(key, transcript_digest, a, b, &response.nonce))
        }
        _ => None,
    }
}

mod hex_32 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(d)?;
        let v = hex::decode(s).map_err(serde::de::Error::custom)?;
        v.try_into().map_err(|_| serde::de::Error::custom("expected 32 bytes"))
    }
}

mod hex_nonce {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; super::NONCE_LEN], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; super::NONCE_LEN], D::Error> {
        let s = String::deserialize(d)?;
        let v = hex::decode(s).map_err(serde::de::Error::custom)?;
        v.try_into().map_err(|_| serde::de::Error::custom("expected 16 bytes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::derive_challenges;
    use crate::encoder::encode_bytes;

    #[test]
    fn honest_response_tag_matches_expected() {
        let v = encode_bytes(b"witness payload", 8).unwrap();
        let key = SecretKey::from_bytes(&[0x41; 32]);
        let transcript_digest = [9u8; 32];
        let challenges = derive_challenges(&transcript_digest, 32, 8);

        for c in &challenges {
            let r = build_response(&transcript_digest, c, &v, &key);
            let expected = expected_tag(&transcript_digest, c, &r, &key).unwrap();
            assert_eq!(expected, r.tag);
        }
    }

    #[test]
    fn response_never_serializes_a_coordinate() {
        let v = encode_bytes(b"SECRET-0.9-bearing input", 8).unwrap();
        let key = SecretKey::from_bytes(&[0x41; 32]);
        let transcript_digest = [5u8; 32];
        let challenges = derive_challenges(&transcript_digest, 128, 8);
        let responses = build_responses(&transcript_digest, &challenges, &v, &key);

        for c in &v.as_slice()[..] {
            let re = format!("{:.6}", c.re);
            let im = format!("{:.6}", c.im);
            for r in &responses {
                let json = serde_json::to_string(r).unwrap();
                assert!(!json.contains(&re));
                assert!(!json.contains(&im));
            }
        }
    }

    #[test]
    fn response_order_matches_challenge_order() {
        let v = encode_bytes(b"ordering payload", 8).unwrap();
        let key = SecretKey::from_bytes(&[0x11; 32]);
        let transcript_digest = [2u8; 32];
        let challenges = derive_challenges(&transcript_digest, 200, 8);
        let responses = build_responses(&transcript_digest, &challenges, &v, &key);
        for (c, r) in challenges.iter().zip(responses.iter()) {
            assert_eq!(c.index, r.index);
        }
    }
}
