//! Dash wire formats: consensus serialization for transactions and their
//! special payloads, block headers, SPV proofs, and address encodings.

pub mod address;
pub mod block;
pub mod bloom;
pub mod encoding;
pub mod hash;
pub mod hex;
pub mod instantlock;
pub mod merkleblock;
pub mod outpoint;
pub mod payload;
pub mod transaction;

pub use address::{
    address_to_script_pubkey, base58check_decode, base58check_encode, pubkey_hash_to_address,
    script_hash_to_address, script_pubkey_to_address, secret_key_to_wif, wif_to_secret_key,
    AddressError,
};
pub use block::BlockHeader;
pub use bloom::BloomFilter;
pub use encoding::{decode, encode, Decodable, DecodeError, Decoder, Encodable, Encoder};
pub use hash::{hash160, sha256, sha256d};
pub use hex::{hex_decode, hex_encode, HexError};
pub use instantlock::InstantLock;
pub use merkleblock::{MerkleBlock, MerkleProofError, PartialMerkleTree};
pub use outpoint::OutPoint;
pub use payload::{ExtraPayload, PayloadDecodeError};
pub use transaction::{Transaction, TransactionDecodeError, TxIn, TxOut, TxType};
