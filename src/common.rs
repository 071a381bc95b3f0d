use num_bigint::{BigInt, BigUint, ModInverse, RandBigInt, Sign};
use num_integer::Integer;
use num_traits::One;
use rand::Rng;
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Upper bound on ephemeral-value draws for a single signature.
pub const SIGN_ATTEMPTS: usize = 10_000;

/// Error types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
  #[error("classical-sig: key generation failed: {0}")]
  KeygenFailure(&'static str),
  #[error("classical-sig: signing failed: {0}")]
  SigningFailure(&'static str),
  #[error("classical-sig: bit length {bits} is too small (minimum {min})")]
  InvalidBitLength { bits: usize, min: usize },
}

/// Tunables for key generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
  /// Miller-Rabin rounds per primality test. 64 rounds bound the error at 2^-128.
  pub prime_rounds: usize,
  /// Candidate cap for every prime, generator and key search.
  pub max_attempts: usize,
  /// Bit length of the DSA subgroup order q.
  pub dsa_q_bits: usize,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      prime_rounds: 64,
      max_attempts: 10_000,
      dsa_q_bits: 160,
    }
  }
}

/// Uniform sample from the inclusive range `[low, high]`.
pub(crate) fn random_between<R: Rng + ?Sized>(
  rng: &mut R,
  low: &BigUint,
  high: &BigUint,
) -> BigUint {
  let upper = high + BigUint::one();
  rng.gen_biguint_range(low, &upper)
}

/// Inverse of `a` modulo `m`, reduced into `[0, m)`. `None` when gcd(a, m) != 1.
pub(crate) fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
  let inv: BigInt = a.clone().mod_inverse(m)?;
  let modulus = BigInt::from_biguint(Sign::Plus, m.clone());
  inv.mod_floor(&modulus).to_biguint()
}

/// Constant-time equality of two integers known to be smaller than `bound`.
pub(crate) fn ct_eq_below(a: &BigUint, b: &BigUint, bound: &BigUint) -> bool {
  let size = (bound.bits() + 7) / 8;
  let a = left_pad(&a.to_bytes_be(), size);
  let b = left_pad(&b.to_bytes_be(), size);

  a.ct_eq(&b).unwrap_u8() == 1
}

// Returns a new vector of the given length, with 0s left padded.
pub fn left_pad(input: &[u8], size: usize) -> Vec<u8> {
  let n = if input.len() > size {
    size
  } else {
    input.len()
  };

  let mut out = vec![0u8; size];
  out[size - n..].copy_from_slice(&input[input.len() - n..]);
  out
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use rand::rngs::StdRng;
  use rand::{CryptoRng, RngCore, SeedableRng};

  /// Entropy source that only ever yields zero bytes. Makes every bounded draw return
  /// its lower bound, which pins the ephemeral value to 1.
  pub(crate) struct ZeroRng;

  impl RngCore for ZeroRng {
    fn next_u32(&mut self) -> u32 {
      0
    }

    fn next_u64(&mut self) -> u64 {
      0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
      dest.iter_mut().for_each(|b| *b = 0);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
      self.fill_bytes(dest);
      Ok(())
    }
  }

  impl CryptoRng for ZeroRng {}

  #[test]
  fn mod_inverse_test() {
    let m = BigUint::from(3120u32);
    let e = BigUint::from(17u32);
    let d = mod_inverse(&e, &m).unwrap();
    assert_eq!(d, BigUint::from(2753u32));
    assert_eq!((&e * &d) % &m, BigUint::one());

    // 6 and 3120 share a factor, so there is no inverse.
    assert!(mod_inverse(&BigUint::from(6u32), &m).is_none());
  }

  #[test]
  fn random_between_test() {
    let mut rng = StdRng::seed_from_u64(7);
    let low = BigUint::from(5u32);
    let high = BigUint::from(9u32);

    let mut seen_high = false;
    for _ in 0..500 {
      let v = random_between(&mut rng, &low, &high);
      assert!(v >= low && v <= high);
      seen_high |= v == high;
    }
    assert!(seen_high, "upper bound must be reachable");
  }

  #[test]
  fn ct_eq_test() {
    let bound = BigUint::from(1u32) << 300;
    let a = BigUint::from(0xdead_beefu32);
    assert!(ct_eq_below(&a, &a.clone(), &bound));
    assert!(!ct_eq_below(&a, &(&a + 1u32), &bound));
    assert!(ct_eq_below(&BigUint::from(0u32), &BigUint::from(0u32), &bound));
  }

  #[test]
  fn zero_rng_draws_lower_bound() {
    let low = BigUint::one();
    let high = BigUint::from(1000u32);
    assert_eq!(random_between(&mut ZeroRng, &low, &high), low);
  }

  #[test]
  fn left_pad_test() {
    assert_eq!(left_pad(&[1, 2], 4), vec![0, 0, 1, 2]);
    assert_eq!(left_pad(&[1, 2, 3], 2), vec![2, 3]);
  }
}
