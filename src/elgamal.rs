//! ElGamal signatures over the multiplicative group of a prime field.
//!
//! Key generation picks `g` uniformly from `[2, p-2]` and does **not** check that it
//! generates a large subgroup. A `g` of small order makes forgeries easy, so keys from
//! this module are for experimentation only.
//!
//! Every call to [`sign`] draws a fresh ephemeral `k`. Two signatures made with the same
//! `k` reveal the private key: from `s1 - s2 = k^-1 (h1 - h2) mod (p-1)` anyone recovers
//! `k` and then `x`. Never build an API on top of this one that lets `k` be chosen or
//! replayed.
//!
//! ### Example
//! ```
//! use classical_sig::{elgamal, hash};
//!
//! let mut rng = rand::thread_rng();
//! let (public, private) = elgamal::keygen(&mut rng, 128).unwrap();
//!
//! let hashed = hash::digest(b"NEVER GOING TO GIVE YOU UP");
//! let signature = elgamal::sign(&mut rng, &private, &hashed).unwrap();
//! assert!(elgamal::verify(&public, &hashed, &signature));
//! ```

use crate::common::{ct_eq_below, mod_inverse, random_between, Config, Error, SIGN_ATTEMPTS};
use crate::prime::random_prime;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, Rng};
use std::fmt;
use zeroize::Zeroize;

const MIN_BITS: usize = 3;

/// ElGamal public key `(p, g, y)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub p: BigUint,
    pub g: BigUint,
    pub y: BigUint,
}

/// ElGamal private key: the exponent `x` and the group it lives in.
#[derive(Clone)]
pub struct PrivateKey {
    pub p: BigUint,
    pub g: BigUint,
    pub x: BigUint,
}

/// ElGamal signature `(r, s)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub r: BigUint,
    pub s: BigUint,
}

impl From<&PrivateKey> for PublicKey {
    fn from(key: &PrivateKey) -> Self {
        PublicKey {
            p: key.p.clone(),
            g: key.g.clone(),
            y: key.g.modpow(&key.x, &key.p),
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("p", &self.p)
            .field("g", &self.g)
            .finish_non_exhaustive()
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.x.zeroize();
    }
}

/// Generate a key pair over a random `bits`-bit prime.
pub fn keygen<R: CryptoRng + Rng>(
    rng: &mut R,
    bits: usize,
) -> Result<(PublicKey, PrivateKey), Error> {
    keygen_with_config(rng, bits, &Config::default())
}

/// Generate a key pair, bounding the prime search by `config`.
pub fn keygen_with_config<R: CryptoRng + Rng>(
    rng: &mut R,
    bits: usize,
    config: &Config,
) -> Result<(PublicKey, PrivateKey), Error> {
    if bits < MIN_BITS {
        return Err(Error::InvalidBitLength { bits, min: MIN_BITS });
    }

    let p = random_prime(rng, bits, config)?;
    let p_minus_2 = &p - 2u32;

    let g = random_between(rng, &BigUint::from(2u32), &p_minus_2);
    let x = random_between(rng, &BigUint::one(), &p_minus_2);

    let private = PrivateKey { p, g, x };
    let public = PublicKey::from(&private);
    tracing::debug!(bits, "elgamal key generated");

    Ok((public, private))
}

/// Sign a digest.
///
/// Resamples `k` until it is invertible mod `p-1` and the resulting `s` is non-zero.
pub fn sign<R: CryptoRng + Rng>(
    rng: &mut R,
    priv_key: &PrivateKey,
    hashed: &BigUint,
) -> Result<Signature, Error> {
    let p = &priv_key.p;
    let p_minus_1 = p - 1u32;
    let p_minus_2 = p - 2u32;
    let h = hashed % &p_minus_1;

    for attempt in 1..=SIGN_ATTEMPTS {
        let mut k = random_between(rng, &BigUint::one(), &p_minus_2);
        if !k.gcd(&p_minus_1).is_one() {
            continue;
        }
        let k_inv = match mod_inverse(&k, &p_minus_1) {
            Some(k_inv) => k_inv,
            None => continue,
        };

        let r = priv_key.g.modpow(&k, p);
        k.zeroize();

        // s = k^-1 (h - x r) mod (p-1)
        let xr = (&priv_key.x * &r) % &p_minus_1;
        let diff = (&h + &p_minus_1 - xr) % &p_minus_1;
        let s = (k_inv * diff) % &p_minus_1;

        if s.is_zero() {
            tracing::trace!(attempt, "s = 0, resampling k");
            continue;
        }

        return Ok(Signature { r, s });
    }

    tracing::warn!(attempts = SIGN_ATTEMPTS, "elgamal ephemeral search exhausted");
    Err(Error::SigningFailure("no usable ephemeral k within the attempt limit"))
}

/// Verifies a signature. Returns false for any `r` outside `(0, p)`.
pub fn verify(pub_key: &PublicKey, hashed: &BigUint, sig: &Signature) -> bool {
    let p = &pub_key.p;
    if sig.r.is_zero() || sig.r >= *p {
        return false;
    }

    let v1 = (pub_key.y.modpow(&sig.r, p) * sig.r.modpow(&sig.s, p)) % p;
    let v2 = pub_key.g.modpow(hashed, p);

    ct_eq_below(&v1, &v2, p)
}
