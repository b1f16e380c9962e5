//! BIP37 partial merkle tree proofs and the merkleblock message body.

use dashd_consensus::constants::{MAX_BLOCK_SIZE, MIN_SERIALIZED_TX_SIZE};
use dashd_consensus::Hash256;

use crate::block::BlockHeader;
use crate::encoding::{Decodable, DecodeError, Decoder, Encodable, Encoder};
use crate::hash::sha256d;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MerkleProofError {
    /// The tree claims zero transactions.
    NoTransactions,
    /// The claimed transaction count exceeds what a block could hold.
    TooManyTransactions,
    /// More hashes than claimed transactions.
    TooManyHashes,
    /// Fewer flag bits than hashes.
    NotEnoughFlags,
    /// Traversal needed a flag bit past the end of the flag list.
    FlagBitsOverrun,
    /// Traversal needed a hash past the end of the hash list.
    HashesOverrun,
    /// A right sibling equals its left sibling, the classic proof forgery.
    DuplicateHashes,
    /// Traversal finished without consuming every flag bit.
    UnconsumedFlagBits,
    /// Traversal finished without consuming every hash.
    UnconsumedHashes,
}

impl std::fmt::Display for MerkleProofError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            MerkleProofError::NoTransactions => "merkle tree contains no transactions",
            MerkleProofError::TooManyTransactions => "merkle tree transaction count too large",
            MerkleProofError::TooManyHashes => "more hashes than transactions",
            MerkleProofError::NotEnoughFlags => "fewer flag bits than hashes",
            MerkleProofError::FlagBitsOverrun => "traversal overran the flag bits",
            MerkleProofError::HashesOverrun => "traversal overran the hashes",
            MerkleProofError::DuplicateHashes => "identical left and right sibling hashes",
            MerkleProofError::UnconsumedFlagBits => "unconsumed flag bits after traversal",
            MerkleProofError::UnconsumedHashes => "unconsumed hashes after traversal",
        };
        write!(f, "{message}")
    }
}

impl std::error::Error for MerkleProofError {}

/// Position of the verifying traversal within the flag and hash streams.
#[derive(Default)]
struct TraversalCursor {
    bits_used: usize,
    hashes_used: usize,
}

/// A pruned merkle tree committing to a subset of a block's transactions.
/// Hashes are kept in wire order, as they feed straight into sha256d.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialMerkleTree {
    pub n_transactions: u32,
    pub bits: Vec<bool>,
    pub hashes: Vec<Hash256>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MerkleBlock {
    pub header: BlockHeader,
    pub txn: PartialMerkleTree,
}

impl Encodable for MerkleBlock {
    fn consensus_encode(&self, encoder: &mut Encoder) {
        self.header.consensus_encode(encoder);
        self.txn.consensus_encode(encoder);
    }
}

impl Decodable for MerkleBlock {
    fn consensus_decode(decoder: &mut Decoder) -> Result<Self, DecodeError> {
        Ok(Self {
            header: BlockHeader::consensus_decode(decoder)?,
            txn: PartialMerkleTree::consensus_decode(decoder)?,
        })
    }
}

impl PartialMerkleTree {
    /// Builds the pruned tree for `txids`, keeping the subtrees needed to
    /// prove the entries flagged in `matches`.
    pub fn from_txids(txids: &[Hash256], matches: &[bool]) -> Result<Self, DecodeError> {
        if txids.len() != matches.len() {
            return Err(DecodeError::InvalidData("txids/matches length mismatch"));
        }
        let n_transactions = u32::try_from(txids.len()).map_err(|_| DecodeError::SizeTooLarge)?;
        let mut tree = Self {
            n_transactions,
            bits: Vec::new(),
            hashes: Vec::new(),
        };

        let height = calc_tree_height(n_transactions);
        tree.traverse_and_build(height, 0, txids, matches);
        Ok(tree)
    }

    /// Verifies the proof and returns the computed root along with the
    /// matched `(position, txid)` pairs in block order.
    pub fn extract_matches(&self) -> Result<(Hash256, Vec<(u32, Hash256)>), MerkleProofError> {
        if self.n_transactions == 0 {
            return Err(MerkleProofError::NoTransactions);
        }
        if self.n_transactions > MAX_BLOCK_SIZE / MIN_SERIALIZED_TX_SIZE {
            return Err(MerkleProofError::TooManyTransactions);
        }
        if self.hashes.len() > self.n_transactions as usize {
            return Err(MerkleProofError::TooManyHashes);
        }
        if self.bits.len() < self.hashes.len() {
            return Err(MerkleProofError::NotEnoughFlags);
        }

        let height = calc_tree_height(self.n_transactions);
        let mut cursor = TraversalCursor::default();
        let mut matches = Vec::new();
        let root = self.traverse_and_extract(height, 0, &mut cursor, &mut matches)?;

        // every flag byte must be justified, though up to 7 pad bits remain
        if (cursor.bits_used + 7) / 8 != (self.bits.len() + 7) / 8 {
            return Err(MerkleProofError::UnconsumedFlagBits);
        }
        if cursor.hashes_used != self.hashes.len() {
            return Err(MerkleProofError::UnconsumedHashes);
        }

        Ok((root, matches))
    }

    fn traverse_and_build(&mut self, height: u32, pos: u32, txids: &[Hash256], matches: &[bool]) {
        let start = (pos as u64) << height;
        let end = ((pos as u64 + 1) << height).min(self.n_transactions as u64);
        let parent_of_match = (start..end).any(|idx| matches[idx as usize]);

        self.bits.push(parent_of_match);

        if height == 0 || !parent_of_match {
            self.hashes.push(self.calc_hash(height, pos, txids));
            return;
        }

        self.traverse_and_build(height - 1, pos * 2, txids, matches);
        if pos * 2 + 1 < calc_tree_width(self.n_transactions, height - 1) {
            self.traverse_and_build(height - 1, pos * 2 + 1, txids, matches);
        }
    }

    fn traverse_and_extract(
        &self,
        height: u32,
        pos: u32,
        cursor: &mut TraversalCursor,
        matches: &mut Vec<(u32, Hash256)>,
    ) -> Result<Hash256, MerkleProofError> {
        if cursor.bits_used >= self.bits.len() {
            return Err(MerkleProofError::FlagBitsOverrun);
        }
        let parent_of_match = self.bits[cursor.bits_used];
        cursor.bits_used += 1;

        if height == 0 || !parent_of_match {
            if cursor.hashes_used >= self.hashes.len() {
                return Err(MerkleProofError::HashesOverrun);
            }
            let hash = self.hashes[cursor.hashes_used];
            cursor.hashes_used += 1;
            if height == 0 && parent_of_match {
                matches.push((pos, hash));
            }
            return Ok(hash);
        }

        let left = self.traverse_and_extract(height - 1, pos * 2, cursor, matches)?;
        let right = if pos * 2 + 1 < calc_tree_width(self.n_transactions, height - 1) {
            let right = self.traverse_and_extract(height - 1, pos * 2 + 1, cursor, matches)?;
            if right == left {
                return Err(MerkleProofError::DuplicateHashes);
            }
            right
        } else {
            left
        };

        Ok(merkle_hash_pair(&left, &right))
    }

    fn calc_hash(&self, height: u32, pos: u32, txids: &[Hash256]) -> Hash256 {
        if height == 0 {
            return txids[pos as usize];
        }

        let left = self.calc_hash(height - 1, pos * 2, txids);
        let right = if pos * 2 + 1 < calc_tree_width(self.n_transactions, height - 1) {
            self.calc_hash(height - 1, pos * 2 + 1, txids)
        } else {
            left
        };

        merkle_hash_pair(&left, &right)
    }
}

impl Encodable for PartialMerkleTree {
    fn consensus_encode(&self, encoder: &mut Encoder) {
        encoder.write_u32_le(self.n_transactions);
        encoder.write_compact_size(self.hashes.len() as u64);
        for hash in &self.hashes {
            encoder.write_hash(hash);
        }

        let mut flag_bytes = vec![0u8; (self.bits.len() + 7) / 8];
        for (idx, bit) in self.bits.iter().copied().enumerate() {
            if bit {
                flag_bytes[idx / 8] |= 1u8 << (idx % 8);
            }
        }
        encoder.write_var_bytes(&flag_bytes);
    }
}

impl Decodable for PartialMerkleTree {
    fn consensus_decode(decoder: &mut Decoder) -> Result<Self, DecodeError> {
        let n_transactions = decoder.read_u32_le()?;
        if n_transactions > MAX_BLOCK_SIZE / MIN_SERIALIZED_TX_SIZE {
            return Err(DecodeError::InvalidData(
                "too many transactions in merkle tree",
            ));
        }

        let hash_count = decoder.read_length()?;
        if hash_count > n_transactions as usize {
            return Err(DecodeError::InvalidData("too many hashes in merkle tree"));
        }
        let mut hashes = Vec::with_capacity(hash_count);
        for _ in 0..hash_count {
            hashes.push(decoder.read_hash()?);
        }

        let bytes = decoder.read_var_bytes()?;
        let max_flag_bytes = (n_transactions as usize)
            .saturating_mul(2)
            .saturating_add(7)
            / 8;
        if bytes.len() > max_flag_bytes {
            return Err(DecodeError::InvalidData(
                "too many flag bytes in merkle tree",
            ));
        }

        let mut bits = Vec::with_capacity(bytes.len().saturating_mul(8));
        for byte in &bytes {
            for bit in 0..8 {
                bits.push((byte & (1u8 << bit)) != 0);
            }
        }

        Ok(Self {
            n_transactions,
            bits,
            hashes,
        })
    }
}

fn calc_tree_height(n_transactions: u32) -> u32 {
    let mut height = 0u32;
    while calc_tree_width(n_transactions, height) > 1 {
        height += 1;
    }
    height
}

/// Nodes in the row at `height`; an odd row's last node pairs with itself.
fn calc_tree_width(n_transactions: u32, height: u32) -> u32 {
    let n = n_transactions as u64;
    let shift = 1u64 << height;
    let width = (n + (shift - 1)) >> height;
    u32::try_from(width).unwrap_or(u32::MAX)
}

fn merkle_hash_pair(left: &Hash256, right: &Hash256) -> Hash256 {
    let mut buf = [0u8; 64];
    buf[0..32].copy_from_slice(left);
    buf[32..64].copy_from_slice(right);
    sha256d(&buf)
}
