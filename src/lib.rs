//! Crate root: public surface and protocol-wide invariants.
//!
//! This module is the **single canonical entry-point** for downstream users
//! of the library. It re-exports the main submodules and centralizes the
//! protocol's invariants.
//!
//! ## Invariants
//!
//! - **Designated verifier.** Every proof is checked against a 32-byte
//!   shared secret key `K`; a verifier without `K` cannot validate a proof,
//!   by construction (response tags are keyed-hash digests).
//! - **Zero-leakage.** No field that ever leaves the prover — commitment,
//!   metadata, challenges, responses, signature — contains a raw coordinate
//!   of the secret complex unit vector. Only coarse scalar summaries
//!   (entropy, coherence) and pseudorandom digests are exposed.
//! - **Fiat–Shamir.** We use BLAKE3 with explicit domain-separation tags and
//!   length-delimited absorbs to derive the public transcript and, from it,
//!   a deterministic sequence of challenges. The prover and verifier replay
//!   the exact same absorb/challenge schedule.
//! - **No unsafe.** `#![forbid(unsafe_code)]` across the crate.
//!
//! These invariants are enforced by design across the submodules. If any is
//! violated at runtime, the failure mode is a precise error (prover side) or
//! a plain `false` from `Verifier::verify` (verifier side) — never
//! undefined behavior and never a partial accept.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

/// Keyed hash, unkeyed hash, CSPRNG, and post-quantum signatures.
pub mod primitives;
/// Deterministic byte → complex unit vector encoding and derived scalars.
pub mod encoder;
/// Binding commitment over a state, an identifier, and a secret key.
pub mod commitment;
/// Fiat–Shamir transcript (domain-separated hashing).
pub mod transcript;
/// Challenge generator: deterministic counter-mode expansion of the
/// transcript.
pub mod challenge;
/// Zero-knowledge response constructor.
pub mod response;
/// Soundness-level bookkeeping (accepted σ values, σ → N).
pub mod security;
/// `Prover` / `Verifier` orchestration and the `Proof` wire type.
pub mod scheduler;
/// Ergonomic builders over the core protocol (no protocol changes).
pub mod api;

pub use commitment::{Commitment, Id};
pub use encoder::{Complex64, ComplexVector, EncodeError, Superposition};
pub use primitives::SecretKey;
pub use scheduler::{Metadata, Proof, ProveError, Prover, Verifier, VerifierConfig};
pub use security::{SecurityLevel, UnsupportedSecurityLevel};
