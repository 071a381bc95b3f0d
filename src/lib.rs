//! Textbook RSA, ElGamal and DSA (DSS) signatures over arbitrary-precision integers.
//!
//! Each scheme exposes the same three operations: `keygen`, `sign` and `verify`. All of
//! them work on a message digest rather than on the message itself; use [`hash::digest`]
//! to get the SHA-256 digest of a message as a big integer.
//!
//! Randomness is always passed in by the caller. Use a cryptographically secure generator
//! such as `rand::thread_rng()` in real use, or a seeded `StdRng` for reproducible runs.
//!
//! These are the classroom constructions. RSA is unpadded, and ElGamal does not validate its
//! generator. Nothing here is constant-time beyond the final comparison in `verify`.
//!
//! ### Example
//! ```
//! use classical_sig::{dsa, hash, rsa};
//!
//! let mut rng = rand::thread_rng();
//! let hashed = hash::digest(b"NEVER GOING TO GIVE YOU UP");
//!
//! // Note: INSECURE sizes, for a quick example
//! let (rsa_pub, rsa_priv) = rsa::keygen(&mut rng, 256).unwrap();
//! let signature = rsa::sign(&rsa_priv, &hashed);
//! assert!(rsa::verify(&rsa_pub, &hashed, &signature));
//!
//! let (dsa_pub, dsa_priv) = dsa::keygen(&mut rng, 384).unwrap();
//! let signature = dsa::sign(&mut rng, &dsa_priv, &hashed).unwrap();
//! assert!(dsa::verify(&dsa_pub, &hashed, &signature));
//! ```

pub mod dsa;
pub mod elgamal;
pub mod hash;
pub mod prime;
pub mod rsa;
mod common;

pub use common::{Config, Error, SIGN_ATTEMPTS};

#[cfg(test)]
mod tests {
    use crate::{dsa, elgamal, hash, rsa, Error};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn all_schemes_test() -> Result<(), Error> {
        // Stage 1: Setup
        // --------------
        let mut rng = StdRng::seed_from_u64(42);
        let message = b"This is a sample file for signature testing.";
        let hashed = hash::digest(message);

        // Stage 2: Each scheme signs the same digest with its own keys
        // ------------------------------------------------------------
        let (rsa_pub, rsa_priv) = rsa::keygen(&mut rng, 256)?;
        let rsa_sig = rsa::sign(&rsa_priv, &hashed);

        let (elg_pub, elg_priv) = elgamal::keygen(&mut rng, 256)?;
        let elg_sig = elgamal::sign(&mut rng, &elg_priv, &hashed)?;

        let (dsa_pub, dsa_priv) = dsa::keygen(&mut rng, 384)?;
        let dsa_sig = dsa::sign(&mut rng, &dsa_priv, &hashed)?;

        // Stage 3: Verification
        // ---------------------
        let check = hash::digest(message);
        assert!(rsa::verify(&rsa_pub, &check, &rsa_sig));
        assert!(elgamal::verify(&elg_pub, &check, &elg_sig));
        assert!(dsa::verify(&dsa_pub, &check, &dsa_sig));

        // A different message must not verify under any scheme.
        let other = hash::digest(b"This is a sample file for signature testing!");
        assert!(!rsa::verify(&rsa_pub, &other, &rsa_sig));
        assert!(!elgamal::verify(&elg_pub, &other, &elg_sig));
        assert!(!dsa::verify(&dsa_pub, &other, &dsa_sig));

        Ok(())
    }

    #[test]
    fn seeded_runs_are_reproducible() -> Result<(), Error> {
        let hashed = hash::digest(b"test-message");
        let run = |seed: u64| -> Result<_, Error> {
            let mut rng = StdRng::seed_from_u64(seed);
            let (pub_key, priv_key) = elgamal::keygen(&mut rng, 128)?;
            let sig = elgamal::sign(&mut rng, &priv_key, &hashed)?;
            Ok((pub_key, sig))
        };

        assert_eq!(run(7)?, run(7)?);
        assert_ne!(run(7)?.0, run(8)?.0);

        Ok(())
    }
}
