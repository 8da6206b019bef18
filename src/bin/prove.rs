//! qzkp CLI: demo driver and proof generator.
//!
//! This is the external-collaborator CLI named in spec.md §6.2. It is a
//! thin, human-facing wrapper around `qzkp::api`/`qzkp::scheduler` — no
//! protocol logic lives here.
//!
//! Subcommands:
//!   demo              run a self-contained prove/verify demo and print the result
//!   security <N>      produce a proof at the given σ and print a summary
//!   security-levels   list the accepted σ values
//!   ultra-secure      alias for `security 256`
//!   benchmark         time proof generation at a given σ (default 128)
//!   examples          print example invocations
//!   help              print usage

#![forbid(unsafe_code)]

use std::{env, fs, path::PathBuf, time::Instant};

use qzkp::{
    api::{self, prove_bytes},
    security::{SecurityLevel, ACCEPTED_LEVELS, ULTRA_SECURE, WARN_BELOW},
    Id, SecretKey,
};

fn parse_flag(args: &[String], key: &str) -> Option<String> {
    let mut it = args.iter();
    while let Some(a) = it.next() {
        if a == key {
            return it.next().cloned();
        }
    }
    None
}

fn default_key() -> SecretKey {
    SecretKey::from_bytes(&[0x41; 32])
}

fn print_usage() {
    println!("qzkp-prove — designated-verifier NIZK prover CLI");
    println!();
    println!("USAGE:");
    println!("    prove <SUBCOMMAND> [OPTIONS]");
    println!();
    println!("SUBCOMMANDS:");
    println!("    demo              run a self-contained prove/verify demo");
    println!("    security <N>      prove at security level N bits");
    println!("    security-levels   list accepted security levels");
    println!("    ultra-secure      prove at σ=256 (alias for `security 256`)");
    println!("    benchmark         time proof generation (--level N, default 128)");
    println!("    examples          print example invocations");
    println!("    help              print this message");
    println!();
    println!("OPTIONS (security/ultra-secure/benchmark):");
    println!("    --data <FILE>       payload to encode (default: a built-in sample)");
    println!("    --dimension <D>     vector dimension, power of two (default: 8)");
    println!("    --identifier <ID>   statement identifier (default: \"qzkp-cli\")");
    println!("    --out <FILE>        write the proof JSON to this path");
}

fn print_examples() {
    println!("EXAMPLES:");
    println!("    prove demo");
    println!("    prove security 128 --data ./payload.bin --out proof.json");
    println!("    prove ultra-secure --dimension 16 --out proof.json");
    println!("    prove benchmark --level 256");
}

fn run_security(args: &[String], level_arg: Option<u32>) -> anyhow::Result<()> {
    let level_bits = level_arg
        .or_else(|| parse_flag(args, "--level").and_then(|s| s.parse().ok()))
        .unwrap_or(128);
    let level = SecurityLevel::new(level_bits)
        .map_err(|e| anyhow::anyhow!("{e}; accepted levels are {:?}", ACCEPTED_LEVELS))?;
    if level.should_warn() {
        tracing::warn!(
            level = level_bits,
            "security level below {WARN_BELOW} bits; not recommended for production use"
        );
    }

    let data = match parse_flag(args, "--data") {
        Some(path) => fs::read(&path)?,
        None => b"qzkp default sample payload".to_vec(),
    };
    let dimension: usize = parse_flag(args, "--dimension").and_then(|s| s.parse().ok()).unwrap_or(8);
    let identifier = parse_flag(args, "--identifier").unwrap_or_else(|| "qzkp-cli".to_string());
    let key = default_key();
    let id = Id::from(identifier.as_str());

    let started = Instant::now();
    let proof = prove_bytes(&data, dimension, &id, &key, level)?;
    let elapsed = started.elapsed();

    println!("security level:   {} bits", level.bits());
    println!("challenge count:  {}", proof.challenges.len());
    println!("commitment:       {}", hex::encode(proof.commitment));
    println!("dimension:        {}", proof.metadata.dimension);
    println!("entropy:          {:.6}", proof.metadata.entropy);
    println!("coherence:        {:.6}", proof.metadata.coherence);
    println!("generated in:     {:?}", elapsed);

    if let Some(out) = parse_flag(args, "--out") {
        api::io::write_proof_json(&PathBuf::from(&out), &proof)?;
        println!("wrote proof to:   {out}");
    }
    Ok(())
}

fn run_benchmark(args: &[String]) -> anyhow::Result<()> {
    let level_bits: u32 = parse_flag(args, "--level").and_then(|s| s.parse().ok()).unwrap_or(128);
    let level = SecurityLevel::new(level_bits)?;
    let data = vec![0x5au8; 128];
    let key = default_key();
    let id = Id::from("qzkp-benchmark");

    let started = Instant::now();
    let proof = prove_bytes(&data, 8, &id, &key, level)?;
    let elapsed = started.elapsed();
    println!("proved σ={} ({} challenges) in {:?}", level.bits(), proof.challenges.len(), elapsed);
    if elapsed.as_secs() >= 1 {
        tracing::warn!(?elapsed, "generation exceeded the 1s reference budget");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let args: Vec<String> = env::args().collect();
    let subcommand = args.get(1).map(String::as_str).unwrap_or("help");

    match subcommand {
        "demo" => {
            let key = default_key();
            let id = Id::from("qzkp-demo");
            let level = SecurityLevel::new(128)?;
            let proof = prove_bytes(b"Hello, Quantum World!", 8, &id, &key, level)?;
            let ok = api::verify_bytes(&proof, &key);
            println!("demo proof generated with {} challenges", proof.challenges.len());
            println!("self-check verify: {ok}");
            if !ok {
                anyhow::bail!("demo proof failed to self-verify");
            }
        }
        "security" => {
            let level_arg = args.get(2).and_then(|s| s.parse().ok());
            run_security(&args[2..], level_arg)?;
        }
        "security-levels" => {
            println!("accepted security levels (bits): {:?}", ACCEPTED_LEVELS);
            println!("levels below {WARN_BELOW} bits are not recommended for production use");
        }
        "ultra-secure" => {
            run_security(&args[2..], Some(ULTRA_SECURE))?;
        }
        "benchmark" => {
            run_benchmark(&args[2..])?;
        }
        "examples" => print_examples(),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("unknown subcommand: {other}");
            print_usage();
            std::process::exit(1);
        }
    }
    Ok(())
}
