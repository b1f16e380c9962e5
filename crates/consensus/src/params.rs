//! Per-network parameter definitions.

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    /// Version byte prefixed to a public key hash in a Base58Check address.
    pub fn pubkey_hash_prefix(self) -> u8 {
        match self {
            Network::Mainnet => 0x4C,
            Network::Testnet => 0x8C,
        }
    }

    /// Version byte prefixed to a script hash in a Base58Check address.
    pub fn script_hash_prefix(self) -> u8 {
        match self {
            Network::Mainnet => 0x10,
            Network::Testnet => 0x13,
        }
    }

    /// Version byte prefixed to a secret key in wallet import format.
    pub fn wif_prefix(self) -> u8 {
        match self {
            Network::Mainnet => 0xCC,
            Network::Testnet => 0xEF,
        }
    }

    /// Looks up the network that uses `prefix` for pubkey-hash addresses.
    pub fn from_pubkey_hash_prefix(prefix: u8) -> Option<Network> {
        match prefix {
            0x4C => Some(Network::Mainnet),
            0x8C => Some(Network::Testnet),
            _ => None,
        }
    }

    /// Looks up the network that uses `prefix` for WIF keys.
    pub fn from_wif_prefix(prefix: u8) -> Option<Network> {
        match prefix {
            0xCC => Some(Network::Mainnet),
            0xEF => Some(Network::Testnet),
            _ => None,
        }
    }
}
