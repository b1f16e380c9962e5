//! Legacy signature hashing for transparent inputs.

use dashd_consensus::Hash256;
use dashd_primitives::hash::sha256d;
use dashd_primitives::transaction::Transaction;

pub const SIGHASH_ALL: u32 = 0x01;
pub const SIGHASH_NONE: u32 = 0x02;
pub const SIGHASH_SINGLE: u32 = 0x03;
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SighashError {
    InputIndexOutOfRange,
}

impl std::fmt::Display for SighashError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SighashError::InputIndexOutOfRange => write!(f, "input index out of range"),
        }
    }
}

impl std::error::Error for SighashError {}

/// The digest an input signature commits to: the transaction with every
/// input script emptied except the signing input, which carries
/// `script_code`, followed by the 4-byte sighash type.
pub fn legacy_signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    sighash_type: u32,
) -> Result<Hash256, SighashError> {
    if input_index >= tx.vin.len() {
        return Err(SighashError::InputIndexOutOfRange);
    }

    let mut copy = tx.clone();
    for (idx, input) in copy.vin.iter_mut().enumerate() {
        input.script_sig = if idx == input_index {
            script_code.to_vec()
        } else {
            Vec::new()
        };
    }

    let mut preimage = copy.to_bytes();
    preimage.extend_from_slice(&sighash_type.to_le_bytes());
    Ok(sha256d(&preimage))
}
