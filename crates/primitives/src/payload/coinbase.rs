//! Coinbase payload (CbTx) carrying the masternode list and quorum merkle
//! commitments.

use dashd_consensus::constants::BLS_SIGNATURE_SIZE;
use dashd_consensus::Hash256;

use crate::encoding::{Decoder, Encoder};
use crate::payload::PayloadDecodeError;

/// Chain-lock fields added by CbTx version 3.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CbTxChainLock {
    /// Blocks between this block and the best chain-locked ancestor.
    pub best_cl_height_diff: u64,
    pub best_cl_signature: [u8; BLS_SIGNATURE_SIZE],
    pub credit_pool_balance: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CbTx {
    pub version: u16,
    pub height: u32,
    pub merkle_root_mn_list: Hash256,
    /// Present for version 2 and later.
    pub merkle_root_quorums: Option<Hash256>,
    /// Present for version 3 and later.
    pub chain_lock: Option<CbTxChainLock>,
}

impl CbTx {
    pub const MAX_VERSION: u16 = 3;

    pub fn consensus_encode(&self, encoder: &mut Encoder) {
        encoder.write_u16_le(self.version);
        encoder.write_u32_le(self.height);
        encoder.write_hash_reversed(&self.merkle_root_mn_list);
        if let Some(root) = &self.merkle_root_quorums {
            encoder.write_hash_reversed(root);
        }
        if let Some(lock) = &self.chain_lock {
            encoder.write_compact_size(lock.best_cl_height_diff);
            encoder.write_bytes(&lock.best_cl_signature);
            encoder.write_i64_le(lock.credit_pool_balance);
        }
    }

    pub fn consensus_decode(decoder: &mut Decoder) -> Result<Self, PayloadDecodeError> {
        let version = decoder.read_u16_le()?;
        if version > Self::MAX_VERSION {
            return Err(PayloadDecodeError::UnsupportedVersion {
                payload: "CbTx",
                version,
            });
        }
        let height = decoder.read_u32_le()?;
        let merkle_root_mn_list = decoder.read_hash_reversed()?;
        let merkle_root_quorums = if version >= 2 {
            Some(decoder.read_hash_reversed()?)
        } else {
            None
        };
        let chain_lock = if version >= 3 {
            Some(CbTxChainLock {
                best_cl_height_diff: decoder.read_compact_size()?,
                best_cl_signature: decoder.read_fixed()?,
                credit_pool_balance: decoder.read_i64_le()?,
            })
        } else {
            None
        };
        Ok(Self {
            version,
            height,
            merkle_root_mn_list,
            merkle_root_quorums,
            chain_lock,
        })
    }
}
