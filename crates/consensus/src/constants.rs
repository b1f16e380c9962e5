//! Consensus-wide constants shared across serialization and validation.

/// Transaction type tag for a classic transaction without extra payload.
pub const TRANSACTION_NORMAL: u16 = 0;
/// Masternode registration (ProRegTx).
pub const TRANSACTION_PROVIDER_REGISTER: u16 = 1;
/// Masternode service update (ProUpServTx).
pub const TRANSACTION_PROVIDER_UPDATE_SERVICE: u16 = 2;
/// Masternode registrar update (ProUpRegTx).
pub const TRANSACTION_PROVIDER_UPDATE_REGISTRAR: u16 = 3;
/// Masternode revocation (ProUpRevTx).
pub const TRANSACTION_PROVIDER_UPDATE_REVOKE: u16 = 4;
/// Coinbase with masternode/quorum merkle commitments (CbTx).
pub const TRANSACTION_COINBASE: u16 = 5;
/// Quorum finalization commitment carrier (QcTx).
pub const TRANSACTION_QUORUM_COMMITMENT: u16 = 6;
/// Masternode hard-fork signal (MnHfTx).
pub const TRANSACTION_MNHF_SIGNAL: u16 = 7;
/// Platform credit asset lock (AssetLockTx).
pub const TRANSACTION_ASSET_LOCK: u16 = 8;
/// Platform credit asset unlock (AssetUnlockTx).
pub const TRANSACTION_ASSET_UNLOCK: u16 = 9;

/// Lock times below this value are block heights, values at or above it are
/// UNIX timestamps (network rule).
pub const LOCKTIME_THRESHOLD: u32 = 500_000_000;

/// The maximum allowed size for a serialized block, in bytes (network rule).
pub const MAX_BLOCK_SIZE: u32 = 2_000_000;
/// A serialized transaction can never be smaller than this, in bytes.
/// Bounds the transaction count a partial merkle tree may claim.
pub const MIN_SERIALIZED_TX_SIZE: u32 = 60;

/// Default input sequence number.
pub const DEFAULT_SEQUENCE: u32 = 0xFFFF_FFFF;

/// BLS signatures on this chain are always this many bytes.
pub const BLS_SIGNATURE_SIZE: usize = 96;
/// BLS public keys on this chain are always this many bytes.
pub const BLS_PUBLIC_KEY_SIZE: usize = 48;

/// Fee rate used when estimating the cost of a transaction, duffs per byte.
pub const FEE_PER_BYTE: u64 = 1;
/// Smallest fee the network will relay, in duffs.
pub const MIN_RELAY_FEE: u64 = 1_000;
/// Worst-case serialized size of a signed P2PKH input, in bytes.
pub const SIGNED_INPUT_MAX_SIZE: u64 = 148;
/// Serialized size of a P2PKH change output, in bytes.
pub const CHANGE_OUTPUT_MAX_SIZE: u64 = 34;
