//! Challenge generator: deterministic, Fiat–Shamir-derived challenge
//! records expanded from the public transcript digest.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::primitives::hash;

/// The three challenge families of spec.md §3/§4.4.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeKind {
    Measurement,
    Coherence,
    Entanglement,
}

impl ChallengeKind {
    fn from_selector(byte: u8) -> Self {
        match byte % 3 {
            0 => ChallengeKind::Measurement,
            1 => ChallengeKind::Coherence,
            _ => ChallengeKind::Entanglement,
        }
    }
}

/// Type-specific challenge parameters, carried alongside the index and type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChallengeParams {
    /// An opaque measurement-basis tag.
    Measurement { basis: u8 },
    /// No extra parameter: the response is over the global coherence
    /// scalar.
    Coherence,
    /// A pair of coordinate indices, both reduced mod `D`.
    Entanglement { a: u32, b: u32 },
}

/// One challenge in the Fiat–Shamir-derived sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChallengeRecord {
    pub index: u64,
    pub kind: ChallengeKind,
    pub params: ChallengeParams,
}

/// Derive the `i`-th challenge seed: `Hash(T || little-endian u64(i))`.
fn challenge_seed(transcript_digest: &[u8; 32], i: u64) -> [u8; 32] {
    let mut buf = Vec::with_capacity(32 + 8);
    buf.extend_from_slice(transcript_digest);
    buf.extend_from_slice(&i.to_le_bytes());
    hash(&buf)
}

/// Derive `n` distinct challenge records from the public transcript digest
/// `T`, via counter-mode expansion (spec.md §4.4).
///
/// `dimension` is needed only to reduce the entanglement challenge's index
/// pair mod `D`; it is public metadata already carried in the proof, so the
/// verifier can supply the same value.
pub fn derive_challenges(transcript_digest: &[u8; 32], n: usize, dimension: usize) -> Vec<ChallengeRecord> {
    debug_assert!(dimension >= 1, "dimension must be positive");
    (0..n as u64)
        .map(|i| {
            let seed = challenge_seed(transcript_digest, i);
            let kind = ChallengeKind::from_selector(seed[0]);
            let params = match kind {
                ChallengeKind::Measurement => ChallengeParams::Measurement { basis: seed[1] },
                ChallengeKind::Coherence => ChallengeParams::Coherence,
                ChallengeKind::Entanglement => {
                    let a = u32::from_be_bytes(seed[1..5].try_into().unwrap()) % dimension as u32;
                    let b = u32::from_be_bytes(seed[5..9].try_into().unwrap()) % dimension as u32;
                    ChallengeParams::Entanglement { a, b }
                }
            };
            ChallengeRecord { index: i, kind, params }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let t = [7u8; 32];
        let a = derive_challenges(&t, 64, 8);
        let b = derive_challenges(&t, 64, 8);
        assert_eq!(a, b);
    }

    #[test]
    fn count_matches_n() {
        let t = [1u8; 32];
        assert_eq!(derive_challenges(&t, 128, 8).len(), 128);
        assert_eq!(derive_challenges(&t, 256, 8).len(), 256);
    }

    #[test]
    fn entanglement_indices_are_within_dimension() {
        let t = [3u8; 32];
        for c in derive_challenges(&t, 512, 8) {
            if let ChallengeParams::Entanglement { a, b } = c.params {
                assert!((a as usize) < 8);
                assert!((b as usize) < 8);
            }
        }
    }

    #[test]
    fn different_transcripts_diverge() {
        let a = derive_challenges(&[1u8; 32], 64, 8);
        let b = derive_challenges(&[2u8; 32], 64, 8);
        assert_ne!(a, b);
    }
}
