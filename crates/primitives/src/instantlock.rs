//! InstantSend lock messages: a quorum signature over a transaction and the
//! outpoints it spends.

use dashd_consensus::constants::BLS_SIGNATURE_SIZE;
use dashd_consensus::Hash256;

use crate::encoding::{Decodable, DecodeError, Decoder, Encodable, Encoder};
use crate::outpoint::OutPoint;
use crate::transaction::{read_vec, write_vec};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstantLock {
    pub version: u8,
    /// The outpoints spent by the locked transaction.
    pub inputs: Vec<OutPoint>,
    pub txid: Hash256,
    /// Hash of the quorum rotation cycle block.
    pub cycle_hash: Hash256,
    pub signature: [u8; BLS_SIGNATURE_SIZE],
}

impl Encodable for InstantLock {
    fn consensus_encode(&self, encoder: &mut Encoder) {
        encoder.write_u8(self.version);
        write_vec(encoder, &self.inputs);
        encoder.write_hash_reversed(&self.txid);
        encoder.write_hash_reversed(&self.cycle_hash);
        encoder.write_bytes(&self.signature);
    }
}

impl Decodable for InstantLock {
    fn consensus_decode(decoder: &mut Decoder) -> Result<Self, DecodeError> {
        Ok(Self {
            version: decoder.read_u8()?,
            inputs: read_vec(decoder)?,
            txid: decoder.read_hash_reversed()?,
            cycle_hash: decoder.read_hash_reversed()?,
            signature: decoder.read_fixed()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{decode, encode};

    fn sample_lock() -> InstantLock {
        let mut txid = [0u8; 32];
        txid[0] = 0xab;
        let mut cycle = [0u8; 32];
        cycle[0] = 0xcd;
        InstantLock {
            version: 1,
            inputs: vec![OutPoint::new([0x11; 32], 0), OutPoint::new([0x22; 32], 3)],
            txid,
            cycle_hash: cycle,
            signature: [0x33; 96],
        }
    }

    #[test]
    fn round_trip() {
        let lock = sample_lock();
        let bytes = encode(&lock);
        // version + count + 2 outpoints + 2 hashes + signature
        assert_eq!(bytes.len(), 1 + 1 + 2 * 36 + 32 + 32 + 96);
        assert_eq!(decode::<InstantLock>(&bytes).unwrap(), lock);
    }

    #[test]
    fn txid_is_reversed_on_wire() {
        let bytes = encode(&sample_lock());
        let txid_start = 1 + 1 + 2 * 36;
        assert_eq!(bytes[txid_start + 31], 0xab);
    }

    #[test]
    fn truncated_signature_rejected() {
        let bytes = encode(&sample_lock());
        assert_eq!(
            decode::<InstantLock>(&bytes[..bytes.len() - 1]),
            Err(DecodeError::TruncatedInput)
        );
    }
}
