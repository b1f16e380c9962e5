//! ECDSA key pairs and their WIF / address encodings.

use dashd_consensus::Network;
use dashd_primitives::address::{
    pubkey_hash_to_address, secret_key_to_wif, wif_to_secret_key, AddressError,
};
use dashd_primitives::hash::hash160;
use secp256k1::{PublicKey as SecpPublicKey, SecretKey};

use crate::secp::secp256k1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// A public key must be 33 (compressed) or 65 (uncompressed) bytes.
    InvalidKeyLength(usize),
    /// The bytes are not a valid curve point or scalar.
    InvalidKey,
    Wif(AddressError),
}

impl std::fmt::Display for KeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyError::InvalidKeyLength(len) => write!(f, "invalid key length {len}"),
            KeyError::InvalidKey => write!(f, "invalid key material"),
            KeyError::Wif(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for KeyError {}

impl From<AddressError> for KeyError {
    fn from(err: AddressError) -> Self {
        KeyError::Wif(err)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrivateKey {
    pub secret: SecretKey,
    pub network: Network,
    pub compressed: bool,
}

impl PrivateKey {
    pub fn from_bytes(bytes: &[u8; 32], network: Network) -> Result<Self, KeyError> {
        let secret = SecretKey::from_slice(bytes).map_err(|_| KeyError::InvalidKey)?;
        Ok(Self {
            secret,
            network,
            compressed: true,
        })
    }

    pub fn from_wif(wif: &str, network: Network) -> Result<Self, KeyError> {
        let (bytes, compressed) = wif_to_secret_key(wif, network)?;
        let secret = SecretKey::from_slice(&bytes).map_err(|_| KeyError::InvalidKey)?;
        Ok(Self {
            secret,
            network,
            compressed,
        })
    }

    pub fn to_wif(&self) -> String {
        secret_key_to_wif(&self.secret.secret_bytes(), self.network, self.compressed)
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            inner: SecpPublicKey::from_secret_key(secp256k1(), &self.secret),
            compressed: self.compressed,
        }
    }

    pub fn address(&self) -> String {
        self.public_key().address(self.network)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey {
    pub inner: SecpPublicKey,
    pub compressed: bool,
}

impl PublicKey {
    /// Accepts exactly 33 compressed or 65 uncompressed bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let compressed = match bytes.len() {
            33 => true,
            65 => false,
            len => return Err(KeyError::InvalidKeyLength(len)),
        };
        let inner = SecpPublicKey::from_slice(bytes).map_err(|_| KeyError::InvalidKey)?;
        Ok(Self { inner, compressed })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        if self.compressed {
            self.inner.serialize().to_vec()
        } else {
            self.inner.serialize_uncompressed().to_vec()
        }
    }

    pub fn pubkey_hash(&self) -> [u8; 20] {
        hash160(&self.to_bytes())
    }

    pub fn address(&self, network: Network) -> String {
        pubkey_hash_to_address(&self.pubkey_hash(), network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_secret() -> [u8; 32] {
        let mut bytes = [0u8; 32];
        for (idx, byte) in bytes.iter_mut().enumerate() {
            *byte = idx as u8 + 1;
        }
        bytes
    }

    #[test]
    fn wif_round_trip() {
        let key = PrivateKey::from_bytes(&test_secret(), Network::Mainnet).unwrap();
        let wif = key.to_wif();
        assert_eq!(
            wif,
            "XBKbGVFwYocQFZMJ1cH2BcGYF8ikKtCPexr6YUXbv994KrRvHANR"
        );
        assert_eq!(PrivateKey::from_wif(&wif, Network::Mainnet).unwrap(), key);
    }

    #[test]
    fn public_key_length_enforced() {
        assert_eq!(
            PublicKey::from_bytes(&[0x02; 32]),
            Err(KeyError::InvalidKeyLength(32))
        );
        assert_eq!(
            PublicKey::from_bytes(&[0x02; 34]),
            Err(KeyError::InvalidKeyLength(34))
        );
    }

    #[test]
    fn public_key_round_trip() {
        let key = PrivateKey::from_bytes(&test_secret(), Network::Testnet).unwrap();
        let public = key.public_key();
        let bytes = public.to_bytes();
        assert_eq!(bytes.len(), 33);
        assert_eq!(PublicKey::from_bytes(&bytes).unwrap(), public);
    }

    #[test]
    fn zero_secret_rejected() {
        assert_eq!(
            PrivateKey::from_bytes(&[0u8; 32], Network::Mainnet),
            Err(KeyError::InvalidKey)
        );
    }
}
