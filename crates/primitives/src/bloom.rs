//! BIP37 bloom filters for SPV transaction filtering.

use crate::encoding::{Decodable, DecodeError, Decoder, Encodable, Encoder};

/// Hard cap on the filter bit array, in bytes.
pub const MAX_BLOOM_FILTER_SIZE: usize = 36_000;
/// Hard cap on the number of hash functions.
pub const MAX_HASH_FUNCS: u32 = 50;
/// Per-function murmur seed stride fixed by BIP37.
const SEED_MULTIPLIER: u32 = 0xFBA4_C795;

/// Filter is never updated as matching transactions are seen.
pub const BLOOM_UPDATE_NONE: u8 = 0;
/// Outpoints of all matched outputs are added to the filter.
pub const BLOOM_UPDATE_ALL: u8 = 1;
/// Only outpoints paying to a pubkey or multisig are added.
pub const BLOOM_UPDATE_P2PUBKEY_ONLY: u8 = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BloomFilter {
    pub data: Vec<u8>,
    pub n_hash_funcs: u32,
    pub n_tweak: u32,
    pub n_flags: u8,
}

impl BloomFilter {
    /// Sizes a filter for `n_elements` insertions at the requested false
    /// positive rate, both capped by the BIP37 maxima.
    pub fn new(n_elements: usize, fp_rate: f64, n_tweak: u32, n_flags: u8) -> Self {
        let n = n_elements.max(1) as f64;
        let ln2_squared = std::f64::consts::LN_2 * std::f64::consts::LN_2;

        let size = (-1.0 / ln2_squared * n * fp_rate.ln() / 8.0)
            .min(MAX_BLOOM_FILTER_SIZE as f64) as usize;
        let size = size.max(1);

        let n_hash_funcs = ((size as f64) * 8.0 / n * std::f64::consts::LN_2)
            .min(MAX_HASH_FUNCS as f64) as u32;

        Self {
            data: vec![0u8; size],
            n_hash_funcs,
            n_tweak,
            n_flags,
        }
    }

    fn bit_index(&self, hash_num: u32, item: &[u8]) -> usize {
        let seed = hash_num.wrapping_mul(SEED_MULTIPLIER).wrapping_add(self.n_tweak);
        let bits = (self.data.len() * 8) as u32;
        (murmur3_32(item, seed) % bits) as usize
    }

    pub fn insert(&mut self, item: &[u8]) {
        for hash_num in 0..self.n_hash_funcs {
            let bit = self.bit_index(hash_num, item);
            self.data[bit >> 3] |= 1 << (bit & 7);
        }
    }

    /// Whether the filter may contain `item`. False positives at the
    /// configured rate, never false negatives.
    pub fn contains(&self, item: &[u8]) -> bool {
        (0..self.n_hash_funcs).all(|hash_num| {
            let bit = self.bit_index(hash_num, item);
            self.data[bit >> 3] & (1 << (bit & 7)) != 0
        })
    }
}

impl Encodable for BloomFilter {
    fn consensus_encode(&self, encoder: &mut Encoder) {
        encoder.write_var_bytes(&self.data);
        encoder.write_u32_le(self.n_hash_funcs);
        encoder.write_u32_le(self.n_tweak);
        encoder.write_u8(self.n_flags);
    }
}

impl Decodable for BloomFilter {
    fn consensus_decode(decoder: &mut Decoder) -> Result<Self, DecodeError> {
        let data = decoder.read_var_bytes()?;
        if data.is_empty() || data.len() > MAX_BLOOM_FILTER_SIZE {
            return Err(DecodeError::InvalidData("bloom filter size out of range"));
        }
        let n_hash_funcs = decoder.read_u32_le()?;
        if n_hash_funcs == 0 || n_hash_funcs > MAX_HASH_FUNCS {
            return Err(DecodeError::InvalidData(
                "bloom filter hash function count out of range",
            ));
        }
        Ok(Self {
            data,
            n_hash_funcs,
            n_tweak: decoder.read_u32_le()?,
            n_flags: decoder.read_u8()?,
        })
    }
}

/// MurmurHash3 x86 32-bit.
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    const C1: u32 = 0xcc9e_2d51;
    const C2: u32 = 0x1b87_3593;

    let mut h = seed;
    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        let mut k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        k = k.wrapping_mul(C1);
        k = k.rotate_left(15);
        k = k.wrapping_mul(C2);
        h ^= k;
        h = h.rotate_left(13);
        h = h.wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        let mut k = 0u32;
        for (idx, byte) in tail.iter().enumerate() {
            k ^= (*byte as u32) << (8 * idx);
        }
        k = k.wrapping_mul(C1);
        k = k.rotate_left(15);
        k = k.wrapping_mul(C2);
        h ^= k;
    }

    h ^= data.len() as u32;
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}
