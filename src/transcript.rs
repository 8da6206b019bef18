//! Fiat–Shamir transcript: domain-separated hashing used to derive the
//! public transcript digest `T` that the challenge generator expands.
//!
//! This keeps the teacher's transcript discipline — stable domain-separation
//! tags (DSTs), length-delimited absorbs, a single canonical hash function —
//! generalized from BLAKE3-over-field-elements to BLAKE3-over-protocol-bytes,
//! since this protocol has no polynomial commitments to absorb.

#![forbid(unsafe_code)]

use blake3::Hasher;

/// Canonical labels, to avoid typos across prover/verifier call sites.
/// Stringified labels are part of the transcript's **stable** domain
/// separation: adding variants is backward-compatible, reordering or
/// renaming existing ones is not.
#[derive(Clone, Copy, Debug)]
pub enum FsLabel {
    Commitment,
    Identifier,
    SecurityLevel,
    Metadata,
}

impl FsLabel {
    fn as_str(self) -> &'static str {
        match self {
            FsLabel::Commitment => "commitment",
            FsLabel::Identifier => "identifier",
            FsLabel::SecurityLevel => "security_level",
            FsLabel::Metadata => "metadata",
        }
    }
}

/// A Fiat–Shamir transcript builder. Absorb every public value that the
/// verifier can also recompute, then [`Transcript::digest`] yields `T`.
pub struct Transcript {
    hasher: Hasher,
}

impl Transcript {
    /// Create a fresh transcript with a fixed domain-separation preamble.
    pub fn new() -> Self {
        let mut hasher = Hasher::new();
        hasher.update(b"qzkp.transcript.v1");
        Self { hasher }
    }

    /// Absorb a labeled, length-delimited byte string.
    pub fn absorb(&mut self, label: FsLabel, bytes: &[u8]) {
        self.hasher.update(b"item:");
        self.hasher.update(label.as_str().as_bytes());
        self.hasher.update(b":len:");
        self.hasher.update(&(bytes.len() as u64).to_be_bytes());
        self.hasher.update(b":data:");
        self.hasher.update(bytes);
    }

    /// Absorb a big-endian-encoded counter (e.g. a security level).
    pub fn absorb_u32(&mut self, label: FsLabel, value: u32) {
        self.absorb(label, &value.to_be_bytes());
    }

    /// Finalize the transcript into the public digest `T`.
    pub fn digest(self) -> [u8; 32] {
        *self.hasher.finalize().as_bytes()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
