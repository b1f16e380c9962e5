//! Base58Check addresses, WIF secret keys, and the standard scripts they
//! pay to.

use dashd_consensus::Network;

use crate::hash::sha256d;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    InvalidLength,
    InvalidCharacter,
    /// The trailing four checksum bytes do not match the payload.
    ChecksumMismatch,
    /// The version byte belongs to no known network.
    UnknownPrefix,
}

impl std::fmt::Display for AddressError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressError::InvalidLength => write!(f, "payload has invalid length"),
            AddressError::InvalidCharacter => write!(f, "invalid base58 character"),
            AddressError::ChecksumMismatch => write!(f, "checksum mismatch"),
            AddressError::UnknownPrefix => write!(f, "unknown version prefix"),
        }
    }
}

impl std::error::Error for AddressError {}

/// Encodes a P2PKH address for a 20-byte public key hash.
pub fn pubkey_hash_to_address(hash: &[u8; 20], network: Network) -> String {
    let mut payload = Vec::with_capacity(21);
    payload.push(network.pubkey_hash_prefix());
    payload.extend_from_slice(hash);
    base58check_encode(&payload)
}

/// Encodes a P2SH address for a 20-byte script hash.
pub fn script_hash_to_address(hash: &[u8; 20], network: Network) -> String {
    let mut payload = Vec::with_capacity(21);
    payload.push(network.script_hash_prefix());
    payload.extend_from_slice(hash);
    base58check_encode(&payload)
}

pub fn address_to_script_pubkey(address: &str, network: Network) -> Result<Vec<u8>, AddressError> {
    let payload = base58check_decode(address)?;
    if payload.len() != 21 {
        return Err(AddressError::InvalidLength);
    }
    let mut hash = [0u8; 20];
    hash.copy_from_slice(&payload[1..]);

    if payload[0] == network.pubkey_hash_prefix() {
        Ok(p2pkh_script(&hash))
    } else if payload[0] == network.script_hash_prefix() {
        Ok(p2sh_script(&hash))
    } else {
        Err(AddressError::UnknownPrefix)
    }
}

pub fn script_pubkey_to_address(script: &[u8], network: Network) -> Option<String> {
    if is_p2pkh(script) {
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&script[3..23]);
        return Some(pubkey_hash_to_address(&hash, network));
    }
    if is_p2sh(script) {
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&script[2..22]);
        return Some(script_hash_to_address(&hash, network));
    }
    None
}

pub fn secret_key_to_wif(secret: &[u8; 32], network: Network, compressed: bool) -> String {
    let mut payload = Vec::with_capacity(1 + secret.len() + usize::from(compressed));
    payload.push(network.wif_prefix());
    payload.extend_from_slice(secret);
    if compressed {
        payload.push(0x01);
    }
    base58check_encode(&payload)
}

pub fn wif_to_secret_key(wif: &str, network: Network) -> Result<([u8; 32], bool), AddressError> {
    let payload = base58check_decode(wif)?;
    if payload.is_empty() {
        return Err(AddressError::InvalidLength);
    }
    if payload[0] != network.wif_prefix() {
        return Err(AddressError::UnknownPrefix);
    }

    if payload.len() == 33 {
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&payload[1..33]);
        return Ok((secret, false));
    }

    if payload.len() == 34 && payload[33] == 0x01 {
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&payload[1..33]);
        return Ok((secret, true));
    }

    Err(AddressError::InvalidLength)
}

pub fn p2pkh_script(hash: &[u8; 20]) -> Vec<u8> {
    const OP_DUP: u8 = 0x76;
    const OP_HASH160: u8 = 0xa9;
    const OP_EQUALVERIFY: u8 = 0x88;
    const OP_CHECKSIG: u8 = 0xac;

    let mut script = Vec::with_capacity(25);
    script.push(OP_DUP);
    script.push(OP_HASH160);
    script.push(0x14);
    script.extend_from_slice(hash);
    script.push(OP_EQUALVERIFY);
    script.push(OP_CHECKSIG);
    script
}

pub fn p2sh_script(hash: &[u8; 20]) -> Vec<u8> {
    const OP_HASH160: u8 = 0xa9;
    const OP_EQUAL: u8 = 0x87;

    let mut script = Vec::with_capacity(23);
    script.push(OP_HASH160);
    script.push(0x14);
    script.extend_from_slice(hash);
    script.push(OP_EQUAL);
    script
}

pub fn is_p2pkh(script: &[u8]) -> bool {
    script.len() == 25
        && script[0] == 0x76
        && script[1] == 0xa9
        && script[2] == 0x14
        && script[23] == 0x88
        && script[24] == 0xac
}

pub fn is_p2sh(script: &[u8]) -> bool {
    script.len() == 23 && script[0] == 0xa9 && script[1] == 0x14 && script[22] == 0x87
}

/// Appends the first four bytes of sha256d(payload) and encodes base58.
pub fn base58check_encode(payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + 4);
    data.extend_from_slice(payload);
    let checksum = sha256d(payload);
    data.extend_from_slice(&checksum[..4]);
    base58_encode(&data)
}

/// Decodes base58 and strips the checksum after verifying it.
pub fn base58check_decode(input: &str) -> Result<Vec<u8>, AddressError> {
    let bytes = base58_decode(input)?;
    if bytes.len() < 4 {
        return Err(AddressError::InvalidLength);
    }
    let (payload, checksum) = bytes.split_at(bytes.len() - 4);
    let digest = sha256d(payload);
    if checksum != &digest[..4] {
        return Err(AddressError::ChecksumMismatch);
    }
    Ok(payload.to_vec())
}

const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

fn base58_encode(data: &[u8]) -> String {
    let mut digits: Vec<u8> = Vec::new();
    for byte in data {
        let mut carry = *byte as u32;
        for digit in digits.iter_mut().rev() {
            let value = (*digit as u32) * 256 + carry;
            *digit = (value % 58) as u8;
            carry = value / 58;
        }
        while carry > 0 {
            digits.insert(0, (carry % 58) as u8);
            carry /= 58;
        }
    }
    let leading_zeros = data.iter().take_while(|b| **b == 0u8).count();
    let mut out = String::with_capacity(leading_zeros + digits.len());
    for _ in 0..leading_zeros {
        out.push('1');
    }
    for digit in digits {
        out.push(ALPHABET[digit as usize] as char);
    }
    out
}

fn base58_decode(input: &str) -> Result<Vec<u8>, AddressError> {
    if input.is_empty() {
        return Err(AddressError::InvalidLength);
    }
    let mut bytes = Vec::new();
    for ch in input.bytes() {
        let value = base58_value(ch).ok_or(AddressError::InvalidCharacter)? as u32;
        let mut carry = value;
        for byte in bytes.iter_mut().rev() {
            let val = (*byte as u32) * 58 + carry;
            *byte = (val & 0xff) as u8;
            carry = val >> 8;
        }
        while carry > 0 {
            bytes.insert(0, (carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let leading_zeros = input.bytes().take_while(|b| *b == b'1').count();
    let mut out = vec![0u8; leading_zeros];
    out.extend_from_slice(&bytes);
    Ok(out)
}

fn base58_value(byte: u8) -> Option<u8> {
    ALPHABET
        .iter()
        .position(|value| *value == byte)
        .map(|pos| pos as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base58check_round_trip() {
        let payload = [0x4C, 0xde, 0xad, 0xbe, 0xef];
        let text = base58check_encode(&payload);
        assert_eq!(base58check_decode(&text).unwrap(), payload);
    }

    #[test]
    fn base58check_detects_corruption() {
        let text = base58check_encode(&[0x01, 0x02, 0x03]);
        let mut corrupted: Vec<char> = text.chars().collect();
        let last = *corrupted.last().unwrap();
        *corrupted.last_mut().unwrap() = if last == '1' { '2' } else { '1' };
        let corrupted: String = corrupted.into_iter().collect();
        assert_eq!(
            base58check_decode(&corrupted),
            Err(AddressError::ChecksumMismatch)
        );
    }

    #[test]
    fn base58_rejects_foreign_characters() {
        assert_eq!(
            base58check_decode("X0hqDGJH"),
            Err(AddressError::InvalidCharacter)
        );
    }

    #[test]
    fn leading_zero_bytes_become_ones() {
        let text = base58_encode(&[0, 0, 1]);
        assert_eq!(text, "112");
        assert_eq!(base58_decode(&text).unwrap(), vec![0, 0, 1]);
    }
}
