//! qzkp CLI: standalone proof verifier.
//!
//! Reads a proof JSON file (as written by `prove`) and a 32-byte key
//! (hex-encoded), and exits 0 if the proof verifies, 2 if it does not, 1 on
//! usage/IO errors.

#![forbid(unsafe_code)]

use std::{env, path::PathBuf};

use qzkp::{api, SecretKey};

fn parse_flag(args: &[String], key: &str) -> Option<String> {
    let mut it = args.iter();
    while let Some(a) = it.next() {
        if a == key {
            return it.next().cloned();
        }
    }
    None
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "help" || a == "--help" || a == "-h") {
        println!("USAGE: verify --proof <FILE> --key <HEX32>");
        return Ok(());
    }

    let proof_path = parse_flag(&args, "--proof").ok_or_else(|| anyhow::anyhow!("missing --proof <FILE>"))?;
    let key_hex = parse_flag(&args, "--key").ok_or_else(|| anyhow::anyhow!("missing --key <HEX32>"))?;
    let key_bytes = hex::decode(key_hex.trim())?;
    let key = SecretKey::from_bytes(&key_bytes);

    let proof = api::io::read_proof_json(&PathBuf::from(&proof_path))?;
    let ok = api::verify_bytes(&proof, &key);

    if ok {
        println!("VALID");
        Ok(())
    } else {
        println!("INVALID");
        std::process::exit(2);
    }
}
