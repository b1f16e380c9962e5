//! Platform credit asset lock and unlock payloads.

use dashd_consensus::constants::BLS_SIGNATURE_SIZE;
use dashd_consensus::Hash256;

use crate::encoding::{Decodable, Decoder, Encodable, Encoder};
use crate::payload::PayloadDecodeError;
use crate::transaction::TxOut;

/// Locks value into the credit pool. The credit outputs use the regular
/// output layout but a one-byte count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetLockTx {
    pub version: u8,
    pub credit_outputs: Vec<TxOut>,
}

impl AssetLockTx {
    pub fn consensus_encode(&self, encoder: &mut Encoder) {
        encoder.write_u8(self.version);
        encoder.write_u8(self.credit_outputs.len() as u8);
        for output in &self.credit_outputs {
            output.consensus_encode(encoder);
        }
    }

    pub fn consensus_decode(decoder: &mut Decoder) -> Result<Self, PayloadDecodeError> {
        let version = decoder.read_u8()?;
        let count = decoder.read_u8()?;
        let mut credit_outputs = Vec::with_capacity(count as usize);
        for _ in 0..count {
            credit_outputs.push(TxOut::consensus_decode(decoder)?);
        }
        Ok(Self {
            version,
            credit_outputs,
        })
    }
}

/// Withdraws value from the credit pool, signed by a quorum. 145 bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetUnlockTx {
    pub version: u8,
    pub index: u64,
    pub fee: u32,
    pub requested_height: u32,
    pub quorum_hash: Hash256,
    pub quorum_sig: [u8; BLS_SIGNATURE_SIZE],
}

impl AssetUnlockTx {
    pub const SERIALIZED_SIZE: usize = 145;

    pub fn consensus_encode(&self, encoder: &mut Encoder) {
        encoder.write_u8(self.version);
        encoder.write_u64_le(self.index);
        encoder.write_u32_le(self.fee);
        encoder.write_u32_le(self.requested_height);
        encoder.write_hash_reversed(&self.quorum_hash);
        encoder.write_bytes(&self.quorum_sig);
    }

    pub fn consensus_decode(decoder: &mut Decoder) -> Result<Self, PayloadDecodeError> {
        Ok(Self {
            version: decoder.read_u8()?,
            index: decoder.read_u64_le()?,
            fee: decoder.read_u32_le()?,
            requested_height: decoder.read_u32_le()?,
            quorum_hash: decoder.read_hash_reversed()?,
            quorum_sig: decoder.read_fixed()?,
        })
    }
}
