//! Sign a sample file with RSA, ElGamal and DSA, and report whether each signature verifies.

use anyhow::{Context, Result};
use clap::Parser;
use classical_sig::{dsa, elgamal, hash, rsa};
use num_bigint::BigUint;
use rand::rngs::StdRng;
use rand::{CryptoRng, Rng, SeedableRng};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SAMPLE_CONTENTS: &[u8] = b"This is a sample file for signature testing.";

#[derive(Debug, Parser)]
#[command(name = "sigdemo", about = "Sign and verify a file with RSA, ElGamal and DSA")]
struct Args {
    /// Message file. Created with sample contents if it does not exist.
    #[arg(long, default_value = "sample.txt")]
    file: PathBuf,

    /// Bit length of the RSA primes, the ElGamal prime and the DSA modulus.
    #[arg(long, default_value_t = 512)]
    bits: usize,

    /// Seed a deterministic generator instead of using the thread rng.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let message = read_or_create(&args.file)?;
    let hashed = hash::digest(&message);
    info!(file = %args.file.display(), bytes = message.len(), "digested message");

    let ok = match args.seed {
        Some(seed) => run_all(&mut StdRng::seed_from_u64(seed), &hashed, args.bits)?,
        None => run_all(&mut rand::thread_rng(), &hashed, args.bits)?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn read_or_create(path: &Path) -> Result<Vec<u8>> {
    match fs::read(path) {
        Ok(data) => Ok(data),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            fs::write(path, SAMPLE_CONTENTS)
                .with_context(|| format!("writing sample message to {}", path.display()))?;
            info!(file = %path.display(), "created sample message");
            Ok(SAMPLE_CONTENTS.to_vec())
        }
        Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
    }
}

fn run_all<R: CryptoRng + Rng>(rng: &mut R, hashed: &BigUint, bits: usize) -> Result<bool> {
    println!("\n--- RSA Digital Signature ---");
    let (public, private) = rsa::keygen(rng, bits).context("rsa key generation")?;
    let signature = rsa::sign(&private, hashed);
    println!("Signature: {}", signature);
    let rsa_ok = report(rsa::verify(&public, hashed, &signature));

    println!("\n--- ElGamal Digital Signature ---");
    let (public, private) = elgamal::keygen(rng, bits).context("elgamal key generation")?;
    let signature = elgamal::sign(rng, &private, hashed).context("elgamal signing")?;
    println!("Signature: ({}, {})", signature.r, signature.s);
    let elgamal_ok = report(elgamal::verify(&public, hashed, &signature));

    println!("\n--- DSS (DSA) Digital Signature ---");
    let (public, private) = dsa::keygen(rng, bits).context("dsa key generation")?;
    let signature = dsa::sign(rng, &private, hashed).context("dsa signing")?;
    println!("Signature: ({}, {})", signature.r, signature.s);
    let dsa_ok = report(dsa::verify(&public, hashed, &signature));

    Ok(rsa_ok && elgamal_ok && dsa_ok)
}

fn report(ok: bool) -> bool {
    println!("Verification: {}", if ok { "Success" } else { "Failed" });
    ok
}
