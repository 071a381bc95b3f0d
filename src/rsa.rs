//! Textbook RSA signatures.
//!
//! The digest is exponentiated directly, `s = h^d mod n`, with no padding. This is the
//! classroom construction, **not** PKCS#1 v1.5 or PSS, and it is malleable: anyone can
//! multiply two valid signatures to get a valid signature on the product of their digests.

use crate::common::{ct_eq_below, mod_inverse, Config, Error};
use crate::prime::random_prime;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use rand::{CryptoRng, Rng};
use std::fmt;
use zeroize::Zeroize;

/// Public exponent used for every generated key.
pub const PUBLIC_EXPONENT: u32 = 65537;

/// RSA public key `(e, n)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub e: BigUint,
    pub n: BigUint,
}

/// RSA private key `(d, n)`, along with the primes it was built from.
#[derive(Clone)]
pub struct PrivateKey {
    pub d: BigUint,
    pub n: BigUint,
    pub p: BigUint,
    pub q: BigUint,
}

impl PrivateKey {
    /// Euler's totient `(p-1)(q-1)` of the modulus.
    pub fn phi(&self) -> BigUint {
        (&self.p - 1u32) * (&self.q - 1u32)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("n", &self.n)
            .finish_non_exhaustive()
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.d.zeroize();
        self.p.zeroize();
        self.q.zeroize();
    }
}

/// Generate a key pair whose primes are each `bits` bits long.
pub fn keygen<R: CryptoRng + Rng>(
    rng: &mut R,
    bits: usize,
) -> Result<(PublicKey, PrivateKey), Error> {
    keygen_with_config(rng, bits, &Config::default())
}

/// Generate a key pair, bounding every search by `config`.
pub fn keygen_with_config<R: CryptoRng + Rng>(
    rng: &mut R,
    bits: usize,
    config: &Config,
) -> Result<(PublicKey, PrivateKey), Error> {
    let (public, private) = key_from_primes(|| random_prime(rng, bits, config), config)?;
    tracing::debug!(bits, modulus_bits = public.n.bits(), "rsa key generated");

    Ok((public, private))
}

// Pull primes from `next_prime` until two distinct ones each satisfy gcd(e, prime - 1) = 1.
// A failing prime is redrawn on its own.
fn key_from_primes<F>(
    mut next_prime: F,
    config: &Config,
) -> Result<(PublicKey, PrivateKey), Error>
where
    F: FnMut() -> Result<BigUint, Error>,
{
    let e = BigUint::from(PUBLIC_EXPONENT);
    let mut first: Option<BigUint> = None;

    for attempt in 1..=config.max_attempts {
        let prime = next_prime()?;
        if !e.gcd(&(&prime - 1u32)).is_one() {
            tracing::trace!(attempt, "e divides prime - 1, resampling it");
            continue;
        }

        let p = match first.take() {
            Some(p) => p,
            None => {
                first = Some(prime);
                continue;
            }
        };
        if prime == p {
            first = Some(p);
            continue;
        }
        let q = prime;

        let phi = (&p - 1u32) * (&q - 1u32);
        if !e.gcd(&phi).is_one() {
            tracing::trace!(attempt, "e shares a factor with phi(n), resampling q");
            first = Some(p);
            continue;
        }
        let d = match mod_inverse(&e, &phi) {
            Some(d) => d,
            None => {
                first = Some(p);
                continue;
            }
        };

        let n = &p * &q;
        let public = PublicKey { e, n: n.clone() };
        let private = PrivateKey { d, n, p, q };
        return Ok((public, private));
    }

    tracing::warn!(attempts = config.max_attempts, "rsa key search exhausted");
    Err(Error::KeygenFailure("no usable rsa prime pair within the attempt limit"))
}

/// Sign a digest: `(h mod n)^d mod n`.
pub fn sign(priv_key: &PrivateKey, hashed: &BigUint) -> BigUint {
    let m = hashed % &priv_key.n;
    m.modpow(&priv_key.d, &priv_key.n)
}

/// Verifies a signature. Signatures outside `[0, n)` are rejected.
pub fn verify(pub_key: &PublicKey, hashed: &BigUint, sig: &BigUint) -> bool {
    if *sig >= pub_key.n {
        return false;
    }

    let expected = hashed % &pub_key.n;
    let recovered = sig.modpow(&pub_key.e, &pub_key.n);

    ct_eq_below(&recovered, &expected, &pub_key.n)
}
