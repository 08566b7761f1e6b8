//! # Hashing Utilities
//!
//! The ledger uses three hash functions and nothing else:
//!
//! - **SHA-512-half**: the first 32 bytes of SHA-512. Signing hashes,
//!   transaction IDs, passphrase expansion and key derivation all go
//!   through it.
//! - **SHA-256**: only as the inner half of the account ID digest.
//! - **RIPEMD-160**: the outer half of the account ID digest.
//!
//! Base58check checksums (double SHA-256) are handled by `bs58` directly.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

/// A 32-byte hash, as used for signing hashes and transaction IDs.
pub type Hash256 = [u8; 32];

/// SHA-512 truncated to its first 256 bits.
///
/// # Example
///
/// ```
/// use ripple_sign_serialize::crypto::hash::sha512_half;
///
/// let digest = sha512_half(b"masterpassphrase");
/// assert_eq!(digest.len(), 32);
/// ```
pub fn sha512_half(data: &[u8]) -> Hash256 {
    sha512_half_multi(&[data])
}

/// SHA-512-half over several parts, hashed as if concatenated.
///
/// Spares the callers that hash `prefix || body || suffix` from building
/// the concatenation first.
pub fn sha512_half_multi(parts: &[&[u8]]) -> Hash256 {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    let digest = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&digest[..32]);
    output
}

/// Compute the SHA-256 hash of the input data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Compute the RIPEMD-160 hash of the input data.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// `RIPEMD-160(SHA-256(data))`, the digest behind every account ID.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha512_half_known_vector() {
        assert_eq!(
            hex::encode(sha512_half(b"abc")),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a"
        );
    }

    #[test]
    fn sha512_half_multi_matches_concatenation() {
        let whole = sha512_half(b"STX\0payload");
        let parts = sha512_half_multi(&[&b"STX\0"[..], &b"pay"[..], &b"load"[..]]);
        assert_eq!(whole, parts);
    }

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn ripemd160_known_vector() {
        assert_eq!(
            hex::encode(ripemd160(b"abc")),
            "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"
        );
    }

    #[test]
    fn hash160_is_ripemd_of_sha256() {
        let data = b"some public key";
        assert_eq!(hash160(data), ripemd160(&sha256(data)));
    }
}
