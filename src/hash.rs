//! Message digests as big integers.
//!
//! Every scheme in this crate signs the digest rather than the message. The digest is
//! interpreted as a big-endian unsigned integer and is **not** reduced here; each scheme
//! reduces it by its own modulus where the algorithm calls for it.

use digest::Digest;
use num_bigint::BigUint;
use sha2::Sha256;

/// SHA-256 of `message` as an integer in `[0, 2^256)`.
pub fn digest(message: &[u8]) -> BigUint {
    digest_with::<Sha256>(message)
}

/// Digest `message` with any `digest`-crate hash function.
pub fn digest_with<H: Digest>(message: &[u8]) -> BigUint {
    let mut hasher = H::new();
    hasher.update(message);
    BigUint::from_bytes_be(&hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_hex(s: &str) -> BigUint {
        BigUint::from_bytes_be(&hex::decode(s).unwrap())
    }

    #[test]
    fn known_vectors() {
        assert_eq!(
            digest(b""),
            from_hex("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
        );
        assert_eq!(
            digest(b"abc"),
            from_hex("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
        assert_eq!(
            digest_with::<sha1::Sha1>(b"abc"),
            from_hex("a9993e364706816aba3e25717850c26c9cd0d89d")
        );
    }

    #[test]
    fn deterministic_and_distinct() {
        let corpus: [&[u8]; 5] = [
            b"test-message",
            b"test-messagf",
            b"This is a sample file for signature testing.",
            b"NEVER GOING TO GIVE YOU UP",
            b"",
        ];

        for (i, a) in corpus.iter().enumerate() {
            assert_eq!(digest(a), digest(a));
            assert!(digest(a).bits() <= 256);
            for b in corpus.iter().skip(i + 1) {
                assert_ne!(digest(a), digest(b));
            }
        }
    }
}
