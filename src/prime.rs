use crate::common::{random_between, Config, Error};
use num_bigint::prime::probably_prime;
use num_bigint::BigUint;
use num_traits::One;
use rand::Rng;

/// Generate a random probable prime with exactly `bits` bits.
///
/// Candidates are drawn uniformly from `[2^(bits-1), 2^bits)` and forced odd. Each is
/// tested with `config.prime_rounds` Miller-Rabin rounds plus Baillie-PSW. Gives up with
/// [`Error::KeygenFailure`] after `config.max_attempts` candidates.
pub fn random_prime<R: Rng + ?Sized>(
    rng: &mut R,
    bits: usize,
    config: &Config,
) -> Result<BigUint, Error> {
    if bits < 2 {
        return Err(Error::InvalidBitLength { bits, min: 2 });
    }

    let low = BigUint::one() << (bits - 1);
    let high = (BigUint::one() << bits) - BigUint::one();

    for attempt in 1..=config.max_attempts {
        let candidate = random_between(rng, &low, &high) | BigUint::one();
        if probably_prime(&candidate, config.prime_rounds) {
            tracing::trace!(bits, attempt, "found prime");
            return Ok(candidate);
        }
    }

    tracing::warn!(bits, attempts = config.max_attempts, "prime search exhausted");
    Err(Error::KeygenFailure("no prime found within the attempt limit"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::ToPrimitive;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn exact_bit_length() -> Result<(), Error> {
        let mut rng = StdRng::seed_from_u64(1);
        let config = Config::default();

        for &bits in &[2usize, 3, 8, 64, 160, 256] {
            let p = random_prime(&mut rng, bits, &config)?;
            assert_eq!(p.bits(), bits);
            assert!(probably_prime(&p, 20));
        }

        Ok(())
    }

    #[test]
    fn small_primes_are_real_primes() -> Result<(), Error> {
        let mut rng = rand::thread_rng();
        let config = Config::default();

        for _ in 0..50 {
            let p = random_prime(&mut rng, 12, &config)?;
            let p = p.to_u64().unwrap();
            assert!((2..p).take_while(|d| d * d <= p).all(|d| p % d != 0));
        }

        Ok(())
    }

    #[test]
    fn attempt_cap() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = Config {
            max_attempts: 0,
            ..Config::default()
        };

        assert!(matches!(
            random_prime(&mut rng, 128, &config),
            Err(Error::KeygenFailure(_))
        ));
        assert_eq!(
            random_prime(&mut rng, 1, &Config::default()),
            Err(Error::InvalidBitLength { bits: 1, min: 2 })
        );
    }
}
