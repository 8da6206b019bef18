// src/api.rs
//! qzkp "happy-path" crate API.
//!
//! This module wraps the protocol core with a small, ergonomic surface:
//! - one-shot `prove_bytes` / `verify_bytes` for the common "I have a byte
//!   payload, not a hand-built `ComplexVector`" case
//! - `io::write_proof_json` / `io::read_proof_json` proof file helpers
//!
//! Everything here delegates to `scheduler::{Prover, Verifier}` and the
//! `encoder` module; there is no protocol logic in this file, matching the
//! teacher's own `api.rs`, which is a thin ergonomic shell over
//! `scheduler::{Prover, Verifier}`.

#![forbid(unsafe_code)]

use crate::commitment::Id;
use crate::encoder::{encode_bytes, ComplexVector, EncodeError};
use crate::primitives::SecretKey;
use crate::scheduler::{Proof, ProveError, Prover, Verifier};
use crate::security::SecurityLevel;

/// Errors from the one-shot `prove_bytes` helper: either the byte payload
/// failed to encode, or the resulting vector failed to prove over.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Prove(#[from] ProveError),
}

/// Encode `data` into a `ComplexVector` of `dimension` and immediately
/// produce a proof of possession over it. The vector itself is discarded
/// after proving — it never outlives this call.
pub fn prove_bytes(
    data: &[u8],
    dimension: usize,
    id: &Id,
    key: &SecretKey,
    level: SecurityLevel,
) -> Result<Proof, ApiError> {
    let vector = encode_bytes(data, dimension)?;
    let prover = Prover::new();
    Ok(prover.prove(&vector, id, key, level)?)
}

/// Verify `proof` against the shared key. Thin re-export so callers can
/// `use qzkp::api::*` without reaching into `scheduler` directly.
pub fn verify_bytes(proof: &Proof, key: &SecretKey) -> bool {
    Verifier::new().verify(proof, key)
}

/// Encode `data` without proving, surfacing encoding errors directly. Useful
/// for callers who want to inspect `ComplexVector` metadata (entropy,
/// coherence) before deciding whether to prove.
pub fn encode(data: &[u8], dimension: usize) -> Result<ComplexVector, EncodeError> {
    encode_bytes(data, dimension)
}

/// Proof file I/O: read/write the §6.1 JSON wire format to disk.
///
/// This is the only place in the core that touches the filesystem, and it
/// exists only to support the CLI binaries — the library itself has no
/// persistent state (spec.md §6.3).
pub mod io {
    use super::Proof;
    use std::{fs, io as stdio, path::Path};

    /// Write `proof` as canonical JSON to `path`.
    pub fn write_proof_json(path: &Path, proof: &Proof) -> stdio::Result<()> {
        let json = serde_json::to_vec_pretty(proof)
            .map_err(|e| stdio::Error::new(stdio::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }

    /// Read a proof previously written by [`write_proof_json`].
    pub fn read_proof_json(path: &Path) -> stdio::Result<Proof> {
        let bytes = fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| stdio::Error::new(stdio::ErrorKind::InvalidData, e))
    }
}
