//! Quorum commitment (QcTx) and hard-fork signal (MnHfTx) payloads.

use dashd_consensus::constants::{BLS_PUBLIC_KEY_SIZE, BLS_SIGNATURE_SIZE};
use dashd_consensus::Hash256;

use crate::encoding::{DecodeError, Decoder, Encoder};
use crate::payload::PayloadDecodeError;

/// A long-living masternode quorum finalization commitment.
///
/// The signer and valid-member bitsets carry an explicit bit count ahead of
/// their packed bytes; the counts are kept verbatim so re-encoding
/// reproduces the input even when a count is not a multiple of eight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuorumFinalizationCommitment {
    pub version: u16,
    pub llmq_type: u8,
    pub quorum_hash: Hash256,
    /// Present for version 2 and later (quorum rotation).
    pub quorum_index: Option<u16>,
    pub signers_bit_count: u64,
    pub signers: Vec<u8>,
    pub valid_members_bit_count: u64,
    pub valid_members: Vec<u8>,
    pub quorum_public_key: [u8; BLS_PUBLIC_KEY_SIZE],
    pub quorum_vvec_hash: Hash256,
    pub quorum_sig: [u8; BLS_SIGNATURE_SIZE],
    pub members_sig: [u8; BLS_SIGNATURE_SIZE],
}

fn read_bitset(decoder: &mut Decoder) -> Result<(u64, Vec<u8>), DecodeError> {
    let bit_count = decoder.read_length()? as u64;
    let byte_count = ((bit_count + 7) / 8) as usize;
    let bytes = decoder.read_bytes(byte_count)?;
    Ok((bit_count, bytes))
}

impl QuorumFinalizationCommitment {
    pub fn consensus_encode(&self, encoder: &mut Encoder) {
        encoder.write_u16_le(self.version);
        encoder.write_u8(self.llmq_type);
        encoder.write_hash_reversed(&self.quorum_hash);
        if let Some(index) = self.quorum_index {
            encoder.write_u16_le(index);
        }
        encoder.write_compact_size(self.signers_bit_count);
        encoder.write_bytes(&self.signers);
        encoder.write_compact_size(self.valid_members_bit_count);
        encoder.write_bytes(&self.valid_members);
        encoder.write_bytes(&self.quorum_public_key);
        encoder.write_hash_reversed(&self.quorum_vvec_hash);
        encoder.write_bytes(&self.quorum_sig);
        encoder.write_bytes(&self.members_sig);
    }

    pub fn consensus_decode(decoder: &mut Decoder) -> Result<Self, PayloadDecodeError> {
        let version = decoder.read_u16_le()?;
        let llmq_type = decoder.read_u8()?;
        let quorum_hash = decoder.read_hash_reversed()?;
        let quorum_index = if version >= 2 {
            Some(decoder.read_u16_le()?)
        } else {
            None
        };
        let (signers_bit_count, signers) = read_bitset(decoder)?;
        let (valid_members_bit_count, valid_members) = read_bitset(decoder)?;
        Ok(Self {
            version,
            llmq_type,
            quorum_hash,
            quorum_index,
            signers_bit_count,
            signers,
            valid_members_bit_count,
            valid_members,
            quorum_public_key: decoder.read_fixed()?,
            quorum_vvec_hash: decoder.read_hash_reversed()?,
            quorum_sig: decoder.read_fixed()?,
            members_sig: decoder.read_fixed()?,
        })
    }
}

/// Carrier transaction payload for a quorum commitment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QcTx {
    pub version: u16,
    pub height: u32,
    pub commitment: QuorumFinalizationCommitment,
}

impl QcTx {
    pub fn consensus_encode(&self, encoder: &mut Encoder) {
        encoder.write_u16_le(self.version);
        encoder.write_u32_le(self.height);
        self.commitment.consensus_encode(encoder);
    }

    pub fn consensus_decode(decoder: &mut Decoder) -> Result<Self, PayloadDecodeError> {
        Ok(Self {
            version: decoder.read_u16_le()?,
            height: decoder.read_u32_le()?,
            commitment: QuorumFinalizationCommitment::consensus_decode(decoder)?,
        })
    }
}

/// A quorum-signed vote on raising a hard-fork bit. 129 bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MnHfSignal {
    pub version_bit: u8,
    pub quorum_hash: Hash256,
    pub sig: [u8; BLS_SIGNATURE_SIZE],
}

impl MnHfSignal {
    pub const SERIALIZED_SIZE: usize = 129;

    fn consensus_encode(&self, encoder: &mut Encoder) {
        encoder.write_u8(self.version_bit);
        encoder.write_hash_reversed(&self.quorum_hash);
        encoder.write_bytes(&self.sig);
    }

    fn consensus_decode(decoder: &mut Decoder) -> Result<Self, DecodeError> {
        Ok(Self {
            version_bit: decoder.read_u8()?,
            quorum_hash: decoder.read_hash_reversed()?,
            sig: decoder.read_fixed()?,
        })
    }
}

/// Masternode hard-fork signal payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MnHfTx {
    pub version: u8,
    pub signal: MnHfSignal,
}

impl MnHfTx {
    pub fn consensus_encode(&self, encoder: &mut Encoder) {
        encoder.write_u8(self.version);
        self.signal.consensus_encode(encoder);
    }

    pub fn consensus_decode(decoder: &mut Decoder) -> Result<Self, PayloadDecodeError> {
        Ok(Self {
            version: decoder.read_u8()?,
            signal: MnHfSignal::consensus_decode(decoder)?,
        })
    }
}
