//! Commitment: binds a state + identifier + secret key to a 32-byte tag.

#![forbid(unsafe_code)]

use rand::RngCore;

use crate::encoder::{deterministic_superposition, random_superposition, ComplexVector, Superposition};
use crate::primitives::{keyed_hash, SecretKey};

/// Opaque byte string naming the statement being proven. Bound into the
/// commitment and the transcript so proofs are not cross-context
/// replayable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Id(Vec<u8>);

impl Id {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::new(s.as_bytes().to_vec())
    }
}

/// A 32-byte keyed-hash commitment tag.
pub type Commitment = [u8; 32];

/// Fixed textual float format used on both sides of the commitment so the
/// encoding is bit-for-bit stable regardless of locale: six fractional
/// digits, trailing zeros retained (the `%f`-equivalent format named in
/// spec.md §9 Design Note 2).
fn format_float(x: f64) -> String {
    format!("{:.6}", x)
}

fn encode_superposition(s: &Superposition) -> Vec<u8> {
    let mut buf = Vec::with_capacity(s.vector.dimension() * 32);
    for c in s.vector.as_slice() {
        buf.extend_from_slice(format_float(c.re).as_bytes());
        buf.extend_from_slice(format_float(c.im).as_bytes());
    }
    for a in &s.amplitudes {
        buf.extend_from_slice(format_float(*a).as_bytes());
    }
    buf
}

/// `commit(V, ID, K) -> C`: build the deterministic superposition of `V`,
/// keyed-hash `encode(S.V) || encode(S.A) || ID` under `K`.
///
/// Binding: under the keyed hash's PRF assumption, `C` determines `(S, ID)`
/// up to collision. Hiding: given `C` and `K` but not `V`, `C` is
/// pseudorandom.
pub fn commit(vector: &ComplexVector, id: &Id, key: &SecretKey) -> Commitment {
    let s = deterministic_superposition(vector);
    let mut msg = encode_superposition(&s);
    msg.extend_from_slice(id.as_bytes());
    keyed_hash(key, &msg)
}

/// Variant of [`commit`] that mixes in an auxiliary, non-reproducible
/// random superposition alongside the deterministic one, for callers who
/// want extra commitment-side entropy beyond what the deterministic
/// superposition provides (spec.md §3's "random" construction mode). Not
/// used by the core protocol's own commit/challenge/response path, which
/// always commits the deterministic superposition so the verifier's
/// recomputation stays a pure function of `(V, ID, K)`.
pub fn commit_with_randomized_aux(
    vector: &ComplexVector,
    id: &Id,
    key: &SecretKey,
    rng: &mut impl RngCore,
) -> Commitment {
    let s = deterministic_superposition(vector);
    let aux = random_superposition(vector, rng);
    let mut msg = encode_superposition(&s);
    msg.extend_from_slice(&encode_superposition(&aux));
    msg.extend_from_slice(id.as_bytes());
    keyed_hash(key, &msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode_bytes;

    #[test]
    fn commitment_is_deterministic() {
        let v = encode_bytes(b"payload", 8).unwrap();
        let id = Id::from("ctx-a");
        let key = SecretKey::from_bytes(&[0x41; 32]);
        assert_eq!(commit(&v, &id, &key), commit(&v, &id, &key));
    }

    #[test]
    fn distinct_vectors_commit_differently() {
        let v1 = encode_bytes(b"payload one", 8).unwrap();
        let v2 = encode_bytes(b"payload two", 8).unwrap();
        let id = Id::from("ctx-a");
        let key = SecretKey::from_bytes(&[0x41; 32]);
        assert_ne!(commit(&v1, &id, &key), commit(&v2, &id, &key));
    }

    #[test]
    fn distinct_identifiers_commit_differently() {
        let v = encode_bytes(b"payload", 8).unwrap();
        let key = SecretKey::from_bytes(&[0x41; 32]);
        assert_ne!(
            commit(&v, &Id::from("ctx-a"), &key),
            commit(&v, &Id::from("ctx-b"), &key)
        );
    }

    #[test]
    fn distinct_keys_commit_differently() {
        let v = encode_bytes(b"payload", 8).unwrap();
        let id = Id::from("ctx-a");
        let k1 = SecretKey::from_bytes(&[0x41; 32]);
        let k2 = SecretKey::from_bytes(&[0x42; 32]);
        assert_ne!(commit(&v, &id, &k1), commit(&v, &id, &k2));
    }
}
