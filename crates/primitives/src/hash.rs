use dashd_consensus::Hash256;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

pub fn sha256(data: &[u8]) -> Hash256 {
    let digest = Sha256::digest(data);
    digest.into()
}

/// Double SHA-256, the transaction and checksum hash.
pub fn sha256d(data: &[u8]) -> Hash256 {
    sha256(&sha256(data))
}

/// RIPEMD-160 of SHA-256, the public key and script hash.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let digest = Ripemd160::digest(sha256(data));
    digest.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::hex_encode;

    #[test]
    fn sha256d_empty() {
        assert_eq!(
            hex_encode(&sha256d(b"")),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn sha256_abc() {
        assert_eq!(
            hex_encode(&sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn hash160_abc() {
        assert_eq!(
            hex_encode(&hash160(b"abc")),
            "bb1be98c142444d7a56aa3981c3942a978e4dc33"
        );
    }
}
