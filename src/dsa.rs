//! DSA (DSS) signatures.
//!
//! Domain parameters are generated per key: a `q_bits`-bit prime `q` (160 by default), a
//! `bits`-bit prime `p = q k + 1`, and `g = h^((p-1)/q) mod p` for the smallest `h >= 2`
//! that gives `g != 1`. This is a simplified search, not the FIPS 186-4 provable or
//! verifiable generation procedure.
//!
//! Signing rejects `r = 0` and `s = 0` and draws a fresh `k`. As with ElGamal, reusing `k`
//! across two digests discloses `x`.

use crate::common::{ct_eq_below, mod_inverse, random_between, Config, Error, SIGN_ATTEMPTS};
use crate::prime::random_prime;
use num_bigint::prime::probably_prime;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, Rng};
use std::fmt;
use zeroize::Zeroize;

/// Domain parameters shared by a public and private key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Params {
    pub p: BigUint,
    pub q: BigUint,
    pub g: BigUint,
}

/// DSA public key `(p, q, g, y)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub params: Params,
    pub y: BigUint,
}

/// DSA private key `x`, with its domain parameters.
#[derive(Clone)]
pub struct PrivateKey {
    pub params: Params,
    pub x: BigUint,
}

/// DSA signature `(r, s)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub r: BigUint,
    pub s: BigUint,
}

impl From<&PrivateKey> for PublicKey {
    fn from(key: &PrivateKey) -> Self {
        let params = key.params.clone();
        let y = params.g.modpow(&key.x, &params.p);
        PublicKey { params, y }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.x.zeroize();
    }
}

impl Params {
    /// Generate `(p, q, g)` with a `bits`-bit `p` and a `config.dsa_q_bits`-bit `q`.
    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        bits: usize,
        config: &Config,
    ) -> Result<Params, Error> {
        let q_bits = config.dsa_q_bits;
        if bits < q_bits + 2 {
            return Err(Error::InvalidBitLength { bits, min: q_bits + 2 });
        }

        let q = random_prime(rng, q_bits, config)?;
        let p = search_p(rng, &q, bits, config)?;

        let g = find_generator(&p, &q, config)?;
        tracing::debug!(bits, q_bits, "dsa parameters generated");

        Ok(Params { p, q, g })
    }
}

// g = h^((p-1)/q) mod p for the smallest h >= 2 giving g != 1.
fn find_generator(p: &BigUint, q: &BigUint, config: &Config) -> Result<BigUint, Error> {
    let exponent = (p - 1u32) / q;
    let mut h = BigUint::from(2u32);

    for _ in 0..config.max_attempts {
        let g = h.modpow(&exponent, p);
        if !g.is_one() {
            return Ok(g);
        }
        tracing::trace!(%h, "h yields g = 1, trying the next base");
        h += 1u32;
    }

    tracing::warn!(attempts = config.max_attempts, "dsa generator search exhausted");
    Err(Error::KeygenFailure("no dsa generator within the attempt limit"))
}

// Search p = q k + 1 with exactly `bits` bits, k even so that p is odd.
fn search_p<R: Rng + ?Sized>(
    rng: &mut R,
    q: &BigUint,
    bits: usize,
    config: &Config,
) -> Result<BigUint, Error> {
    let low = BigUint::one() << (bits - 1);
    let high = (BigUint::one() << bits) - 1u32;

    // k in [ceil((2^(bits-1) - 1) / q), floor((2^bits - 2) / q)]
    let k_low = (&low - 1u32 + q - 1u32) / q;
    let k_high = (&high - 1u32) / q;

    for attempt in 1..=config.max_attempts {
        let mut k = random_between(rng, &k_low, &k_high);
        if k.is_odd() {
            k += 1u32;
        }

        let p = q * &k + 1u32;
        if p.bits() != bits {
            continue;
        }
        if probably_prime(&p, config.prime_rounds) {
            tracing::trace!(bits, attempt, "found dsa modulus");
            return Ok(p);
        }
    }

    tracing::warn!(bits, attempts = config.max_attempts, "dsa modulus search exhausted");
    Err(Error::KeygenFailure("no dsa modulus within the attempt limit"))
}

/// Generate fresh domain parameters and a key pair with a `bits`-bit `p`.
pub fn keygen<R: CryptoRng + Rng>(
    rng: &mut R,
    bits: usize,
) -> Result<(PublicKey, PrivateKey), Error> {
    keygen_with_config(rng, bits, &Config::default())
}

/// Generate fresh domain parameters and a key pair, bounding every search by `config`.
pub fn keygen_with_config<R: CryptoRng + Rng>(
    rng: &mut R,
    bits: usize,
    config: &Config,
) -> Result<(PublicKey, PrivateKey), Error> {
    let params = Params::generate(rng, bits, config)?;
    keygen_from_params(rng, params)
}

/// Generate a key pair in existing domain parameters.
pub fn keygen_from_params<R: CryptoRng + Rng>(
    rng: &mut R,
    params: Params,
) -> Result<(PublicKey, PrivateKey), Error> {
    if params.q < BigUint::from(2u32) || params.p.is_zero() {
        return Err(Error::KeygenFailure("degenerate dsa domain parameters"));
    }

    let x = random_between(rng, &BigUint::one(), &(&params.q - 1u32));
    let private = PrivateKey { params, x };
    let public = PublicKey::from(&private);

    Ok((public, private))
}

/// Sign a digest.
///
/// Resamples `k` whenever it is not invertible mod `q` or produces `r = 0` or `s = 0`.
pub fn sign<R: CryptoRng + Rng>(
    rng: &mut R,
    priv_key: &PrivateKey,
    hashed: &BigUint,
) -> Result<Signature, Error> {
    let Params { p, q, g } = &priv_key.params;
    let q_minus_1 = q - 1u32;
    let h = hashed % q;

    for attempt in 1..=SIGN_ATTEMPTS {
        let mut k = random_between(rng, &BigUint::one(), &q_minus_1);
        if !k.gcd(q).is_one() {
            continue;
        }
        let k_inv = match mod_inverse(&k, q) {
            Some(k_inv) => k_inv,
            None => continue,
        };

        let r = g.modpow(&k, p) % q;
        k.zeroize();
        if r.is_zero() {
            tracing::trace!(attempt, "r = 0, resampling k");
            continue;
        }

        // s = k^-1 (h + x r) mod q
        let s = (k_inv * ((&h + &priv_key.x * &r) % q)) % q;
        if s.is_zero() {
            tracing::trace!(attempt, "s = 0, resampling k");
            continue;
        }

        return Ok(Signature { r, s });
    }

    tracing::warn!(attempts = SIGN_ATTEMPTS, "dsa ephemeral search exhausted");
    Err(Error::SigningFailure("no usable ephemeral k within the attempt limit"))
}

/// Verifies a signature. Returns false unless `0 < r < q` and `0 < s < q`.
pub fn verify(pub_key: &PublicKey, hashed: &BigUint, sig: &Signature) -> bool {
    let Params { p, q, g } = &pub_key.params;
    if sig.r.is_zero() || sig.r >= *q || sig.s.is_zero() || sig.s >= *q {
        return false;
    }
    if p.is_zero() {
        return false;
    }

    let w = match mod_inverse(&sig.s, q) {
        Some(w) => w,
        None => return false,
    };
    let u1 = (hashed * &w) % q;
    let u2 = (&sig.r * &w) % q;
    let v = ((g.modpow(&u1, p) * pub_key.y.modpow(&u2, p)) % p) % q;

    ct_eq_below(&v, &sig.r, q)
}
