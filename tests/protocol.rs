//! End-to-end protocol properties and the literal seeded scenarios.

use std::time::Instant;

use qzkp::{
    api, encoder, ComplexVector, Id, Prover, SecretKey, SecurityLevel, Verifier,
};

fn key(bytes: &[u8]) -> SecretKey {
    SecretKey::from_bytes(bytes)
}

/// Property 1: correctness, across a spread of dimensions and security
/// levels.
#[test]
fn correctness_across_dimensions_and_levels() {
    let prover = Prover::new();
    let verifier = Verifier::new();
    for &dim in &[2usize, 4, 8, 16, 32] {
        for &sigma in &[32u32, 64, 80, 128, 256] {
            let v = encoder::encode_bytes(format!("payload-{dim}-{sigma}").as_bytes(), dim).unwrap();
            let id = Id::from("correctness-suite");
            let k = key(&[0x33; 32]);
            let level = SecurityLevel::new(sigma).unwrap();
            let proof = prover.prove(&v, &id, &k, level).unwrap();
            assert!(verifier.verify(&proof, &k), "dim={dim} sigma={sigma}");
        }
    }
}

/// Property 4: wrong-key rejection.
#[test]
fn wrong_key_is_rejected() {
    let v = encoder::encode_bytes(b"Hello, Quantum World!", 8).unwrap();
    let id = Id::from("ctx");
    let k = key(&[0x41; 32]);
    let mut k_wrong_bytes = [0x41u8; 32];
    k_wrong_bytes[31] = 0x42;
    let k_wrong = SecretKey::from_bytes(&k_wrong_bytes);

    let prover = Prover::new();
    let proof = prover.prove(&v, &id, &k, SecurityLevel::new(128).unwrap()).unwrap();
    assert!(Verifier::new().verify(&proof, &k));
    assert!(!Verifier::new().verify(&proof, &k_wrong));
}

/// Property 5: flipping any byte of the serialized proof causes rejection
/// (or the bytes no longer parse, which is itself a rejection).
#[test]
fn tampering_any_byte_rejects() {
    let v = encoder::encode_bytes(b"tamper-test payload", 8).unwrap();
    let id = Id::from("ctx");
    let k = key(&[0x20; 32]);
    let prover = Prover::new();
    let proof = prover.prove(&v, &id, &k, SecurityLevel::new(32).unwrap()).unwrap();
    let original = serde_json::to_vec(&proof).unwrap();

    let mut flipped_any = false;
    for i in (0..original.len()).step_by(37) {
        let mut bytes = original.clone();
        bytes[i] ^= 0x01;
        match serde_json::from_slice::<qzkp::Proof>(&bytes) {
            Ok(tampered) => {
                flipped_any = true;
                assert!(!Verifier::new().verify(&tampered, &k), "byte {i} tamper was accepted");
            }
            Err(_) => flipped_any = true,
        }
    }
    assert!(flipped_any, "no byte positions were exercised");
}

/// Property 6: cross-context rejection.
#[test]
fn cross_context_rejects() {
    let v = encoder::encode_bytes(b"cross-context payload", 8).unwrap();
    let k = key(&[0x55; 32]);
    let prover = Prover::new();
    let proof = prover.prove(&v, &Id::from("context-one"), &k, SecurityLevel::new(64).unwrap()).unwrap();

    let mut wrong_context = proof.clone();
    wrong_context.identifier = "context-two".to_string();
    assert!(!Verifier::new().verify(&wrong_context, &k));
}

/// Property 8: commitment hiding — distinct vectors commit differently.
#[test]
fn distinct_vectors_commit_differently() {
    let v1 = encoder::encode_bytes(b"vector one", 8).unwrap();
    let v2 = encoder::encode_bytes(b"vector two", 8).unwrap();
    let id = Id::from("ctx");
    let k = key(&[0x66; 32]);
    let prover = Prover::new();
    let p1 = prover.prove(&v1, &id, &k, SecurityLevel::new(32).unwrap()).unwrap();
    let p2 = prover.prove(&v2, &id, &k, SecurityLevel::new(32).unwrap()).unwrap();
    assert_ne!(p1.commitment, p2.commitment);
}

/// Property 10: thread safety — N parallel proofs over independent inputs
/// are all mutually valid.
#[test]
fn parallel_proofs_are_mutually_valid() {
    use rayon::prelude::*;

    let k = key(&[0x77; 32]);
    let all_ok: bool = (0u8..16)
        .into_par_iter()
        .map(|i| {
            let v = encoder::encode_bytes(&[i; 24], 8).unwrap();
            let id = Id::from("parallel-suite");
            let prover = Prover::new();
            let proof = prover.prove(&v, &id, &k, SecurityLevel::new(64).unwrap()).unwrap();
            Verifier::new().verify(&proof, &k)
        })
        .all(|ok| ok);
    assert!(all_ok);
}

/// S1: the documented sample payload, D=8, σ=128, K = 32 bytes of 0x41.
#[test]
fn scenario_s1_basic_prove_and_verify() {
    let data = b"Hello, Quantum World!";
    let v1 = encoder::encode_bytes(data, 8).unwrap();
    let v2 = encoder::encode_bytes(data, 8).unwrap();
    assert_eq!(v1.as_slice(), v2.as_slice());

    let id = Id::from("s1");
    let k = key(&[0x41; 32]);
    let proof = api::prove_bytes(data, 8, &id, &k, SecurityLevel::new(128).unwrap()).unwrap();
    assert!(api::verify_bytes(&proof, &k));

    let json = serde_json::to_string(&proof).unwrap();
    assert!(!json.contains("Quantum"));
}

/// S2: same inputs as S1, verifier given a key differing in the last byte.
#[test]
fn scenario_s2_wrong_last_byte_rejects() {
    let data = b"Hello, Quantum World!";
    let id = Id::from("s1");
    let mut k_bytes = [0x41u8; 32];
    let k = SecretKey::from_bytes(&k_bytes);
    let proof = api::prove_bytes(data, 8, &id, &k, SecurityLevel::new(128).unwrap()).unwrap();

    k_bytes[31] ^= 0xff;
    let k_wrong = SecretKey::from_bytes(&k_bytes);
    assert!(!api::verify_bytes(&proof, &k_wrong));
}

/// S3: V = [1/sqrt(2), 1/sqrt(2)] (D=2), ID = "bell", σ=64, K = zero-padded
/// "k". Expects 64 challenges, all three response types each within
/// [15, 30].
#[test]
fn scenario_s3_bell_state_response_distribution() {
    let inv_sqrt2 = std::f64::consts::FRAC_1_SQRT_2;
    let v = ComplexVector::from_normalized(vec![
        encoder::Complex64::new(inv_sqrt2, 0.0),
        encoder::Complex64::new(inv_sqrt2, 0.0),
    ])
    .unwrap();
    let id = Id::from("bell");
    let k = SecretKey::from_bytes(b"k");
    let prover = Prover::new();
    let proof = prover.prove(&v, &id, &k, SecurityLevel::new(64).unwrap()).unwrap();

    assert_eq!(proof.challenges.len(), 64);
    let mut counts = std::collections::HashMap::new();
    for r in &proof.responses {
        *counts.entry(format!("{:?}", r.kind)).or_insert(0usize) += 1;
    }
    for (_, count) in counts {
        assert!((15..=30).contains(&count));
    }
    assert_eq!(counts_len(&proof), 3);
}

fn counts_len(proof: &qzkp::Proof) -> usize {
    let mut set = std::collections::HashSet::new();
    for r in &proof.responses {
        set.insert(format!("{:?}", r.kind));
    }
    set.len()
}

/// S4: encoding empty data is InvalidInput.
#[test]
fn scenario_s4_empty_data_is_invalid_input() {
    assert!(matches!(
        encoder::encode_bytes(&[], 4),
        Err(encoder::EncodeError::EmptyData)
    ));
}

/// S5: encoding with a non-power-of-two dimension is InvalidInput.
#[test]
fn scenario_s5_non_power_of_two_dimension_is_invalid_input() {
    assert!(matches!(
        encoder::encode_bytes(b"x", 6),
        Err(encoder::EncodeError::BadDimension(6))
    ));
}

/// S6: σ=256 generation over a 128-byte payload completes in under 1s on
/// reference hardware. Timing-sensitive, so `#[ignore]`d by default (the
/// structural half of this scenario — exact challenge/response count — is
/// covered unconditionally below).
#[test]
#[ignore = "timing-sensitive; run explicitly with `cargo test -- --ignored`"]
fn scenario_s6_ultra_secure_generation_is_fast() {
    let data = vec![0x7au8; 128];
    let id = Id::from("s6");
    let k = key(&[0x41; 32]);
    let started = Instant::now();
    let proof = api::prove_bytes(&data, 16, &id, &k, SecurityLevel::new(256).unwrap()).unwrap();
    let elapsed = started.elapsed();
    assert!(api::verify_bytes(&proof, &k));
    assert!(elapsed.as_secs() < 1, "generation took {elapsed:?}");
}

#[test]
fn scenario_s6_structural_challenge_count() {
    let data = vec![0x7au8; 128];
    let id = Id::from("s6-structural");
    let k = key(&[0x41; 32]);
    let proof = api::prove_bytes(&data, 16, &id, &k, SecurityLevel::new(256).unwrap()).unwrap();
    assert_eq!(proof.challenges.len(), 256);
    assert_eq!(proof.responses.len(), 256);
}
