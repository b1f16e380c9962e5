//! Masternode provider payloads (ProRegTx, ProUpServTx, ProUpRegTx,
//! ProUpRevTx).

use std::net::{Ipv4Addr, Ipv6Addr};

use dashd_consensus::constants::{BLS_PUBLIC_KEY_SIZE, BLS_SIGNATURE_SIZE};
use dashd_consensus::Hash256;

use crate::encoding::{DecodeError, Decoder, Encodable, Encoder};
use crate::outpoint::OutPoint;
use crate::payload::PayloadDecodeError;

/// Masternode service endpoint: 16 address octets (IPv4 lives in its
/// v6-mapped form) followed by a big-endian port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServiceAddress {
    pub addr: Ipv6Addr,
    pub port: u16,
}

impl ServiceAddress {
    pub fn from_ipv4(addr: Ipv4Addr, port: u16) -> Self {
        Self {
            addr: addr.to_ipv6_mapped(),
            port,
        }
    }

    /// The IPv4 form, when the address is v4-mapped.
    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        self.addr.to_ipv4_mapped()
    }

    fn consensus_encode(&self, encoder: &mut Encoder) {
        encoder.write_bytes(&self.addr.octets());
        encoder.write_u16_be(self.port);
    }

    fn consensus_decode(decoder: &mut Decoder) -> Result<Self, DecodeError> {
        let octets: [u8; 16] = decoder.read_fixed()?;
        let port = decoder.read_u16_be()?;
        Ok(Self {
            addr: Ipv6Addr::from(octets),
            port,
        })
    }
}

/// Platform fields present in version 2 provider payloads. The node id is
/// stored in display order and reversed on the wire; both ports are
/// little-endian, unlike the service port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlatformFields {
    pub node_id: [u8; 20],
    pub p2p_port: u16,
    pub http_port: u16,
}

impl PlatformFields {
    fn consensus_encode(&self, encoder: &mut Encoder) {
        let mut node_id = self.node_id;
        node_id.reverse();
        encoder.write_bytes(&node_id);
        encoder.write_u16_le(self.p2p_port);
        encoder.write_u16_le(self.http_port);
    }

    fn consensus_decode(decoder: &mut Decoder) -> Result<Self, DecodeError> {
        let mut node_id: [u8; 20] = decoder.read_fixed()?;
        node_id.reverse();
        Ok(Self {
            node_id,
            p2p_port: decoder.read_u16_le()?,
            http_port: decoder.read_u16_le()?,
        })
    }
}

/// Masternode registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProRegTx {
    pub version: u16,
    pub provider_type: u16,
    pub mode: u16,
    pub collateral: OutPoint,
    pub service: ServiceAddress,
    pub owner_key_hash: [u8; 20],
    pub operator_key: [u8; BLS_PUBLIC_KEY_SIZE],
    pub voting_key_hash: [u8; 20],
    /// Share of the reward paid to the operator, in basis points.
    pub operator_reward: u16,
    pub script_payout: Vec<u8>,
    pub inputs_hash: Hash256,
    /// Present for version 2 payloads.
    pub platform: Option<PlatformFields>,
    pub payload_sig: Vec<u8>,
}

impl ProRegTx {
    pub const MAX_VERSION: u16 = 2;

    pub fn consensus_encode(&self, encoder: &mut Encoder) {
        encoder.write_u16_le(self.version);
        encoder.write_u16_le(self.provider_type);
        encoder.write_u16_le(self.mode);
        self.collateral.consensus_encode(encoder);
        self.service.consensus_encode(encoder);
        encoder.write_bytes(&self.owner_key_hash);
        encoder.write_bytes(&self.operator_key);
        encoder.write_bytes(&self.voting_key_hash);
        encoder.write_u16_le(self.operator_reward);
        encoder.write_var_bytes(&self.script_payout);
        encoder.write_hash_reversed(&self.inputs_hash);
        if let Some(platform) = &self.platform {
            platform.consensus_encode(encoder);
        }
        encoder.write_var_bytes(&self.payload_sig);
    }

    pub fn consensus_decode(decoder: &mut Decoder) -> Result<Self, PayloadDecodeError> {
        let version = decoder.read_u16_le()?;
        if version > Self::MAX_VERSION {
            return Err(PayloadDecodeError::UnsupportedVersion {
                payload: "ProRegTx",
                version,
            });
        }
        let provider_type = decoder.read_u16_le()?;
        let mode = decoder.read_u16_le()?;
        let collateral = crate::encoding::Decodable::consensus_decode(decoder)?;
        let service = ServiceAddress::consensus_decode(decoder)?;
        let owner_key_hash = decoder.read_fixed()?;
        let operator_key = decoder.read_fixed()?;
        let voting_key_hash = decoder.read_fixed()?;
        let operator_reward = decoder.read_u16_le()?;
        let script_payout = decoder.read_var_bytes()?;
        let inputs_hash = decoder.read_hash_reversed()?;
        let platform = if version >= 2 {
            Some(PlatformFields::consensus_decode(decoder)?)
        } else {
            None
        };
        let payload_sig = decoder.read_var_bytes()?;
        Ok(Self {
            version,
            provider_type,
            mode,
            collateral,
            service,
            owner_key_hash,
            operator_key,
            voting_key_hash,
            operator_reward,
            script_payout,
            inputs_hash,
            platform,
            payload_sig,
        })
    }
}

/// Masternode service update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProUpServTx {
    pub version: u16,
    pub provider_type: u16,
    pub pro_tx_hash: Hash256,
    pub service: ServiceAddress,
    pub script_operator_payout: Vec<u8>,
    pub inputs_hash: Hash256,
    /// Present for version 2 payloads.
    pub platform: Option<PlatformFields>,
    pub payload_sig: [u8; BLS_SIGNATURE_SIZE],
}

impl ProUpServTx {
    pub const MAX_VERSION: u16 = 2;

    pub fn consensus_encode(&self, encoder: &mut Encoder) {
        encoder.write_u16_le(self.version);
        encoder.write_u16_le(self.provider_type);
        encoder.write_hash_reversed(&self.pro_tx_hash);
        self.service.consensus_encode(encoder);
        encoder.write_var_bytes(&self.script_operator_payout);
        encoder.write_hash_reversed(&self.inputs_hash);
        if let Some(platform) = &self.platform {
            platform.consensus_encode(encoder);
        }
        encoder.write_bytes(&self.payload_sig);
    }

    pub fn consensus_decode(decoder: &mut Decoder) -> Result<Self, PayloadDecodeError> {
        let version = decoder.read_u16_le()?;
        if version > Self::MAX_VERSION {
            return Err(PayloadDecodeError::UnsupportedVersion {
                payload: "ProUpServTx",
                version,
            });
        }
        let provider_type = decoder.read_u16_le()?;
        let pro_tx_hash = decoder.read_hash_reversed()?;
        let service = ServiceAddress::consensus_decode(decoder)?;
        let script_operator_payout = decoder.read_var_bytes()?;
        let inputs_hash = decoder.read_hash_reversed()?;
        let platform = if version >= 2 {
            Some(PlatformFields::consensus_decode(decoder)?)
        } else {
            None
        };
        let payload_sig = decoder.read_fixed()?;
        Ok(Self {
            version,
            provider_type,
            pro_tx_hash,
            service,
            script_operator_payout,
            inputs_hash,
            platform,
            payload_sig,
        })
    }
}

/// Masternode registrar update: rotates the operator key, voting key, or
/// payout script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProUpRegTx {
    pub version: u16,
    pub pro_tx_hash: Hash256,
    pub mode: u16,
    pub operator_key: [u8; BLS_PUBLIC_KEY_SIZE],
    pub voting_key_hash: [u8; 20],
    pub script_payout: Vec<u8>,
    pub inputs_hash: Hash256,
    pub payload_sig: Vec<u8>,
}

impl ProUpRegTx {
    pub fn consensus_encode(&self, encoder: &mut Encoder) {
        encoder.write_u16_le(self.version);
        encoder.write_hash_reversed(&self.pro_tx_hash);
        encoder.write_u16_le(self.mode);
        encoder.write_bytes(&self.operator_key);
        encoder.write_bytes(&self.voting_key_hash);
        encoder.write_var_bytes(&self.script_payout);
        encoder.write_hash_reversed(&self.inputs_hash);
        encoder.write_var_bytes(&self.payload_sig);
    }

    pub fn consensus_decode(decoder: &mut Decoder) -> Result<Self, PayloadDecodeError> {
        Ok(Self {
            version: decoder.read_u16_le()?,
            pro_tx_hash: decoder.read_hash_reversed()?,
            mode: decoder.read_u16_le()?,
            operator_key: decoder.read_fixed()?,
            voting_key_hash: decoder.read_fixed()?,
            script_payout: decoder.read_var_bytes()?,
            inputs_hash: decoder.read_hash_reversed()?,
            payload_sig: decoder.read_var_bytes()?,
        })
    }
}

/// Masternode revocation. Always exactly 164 bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProUpRevTx {
    pub version: u16,
    pub pro_tx_hash: Hash256,
    pub reason: u16,
    pub inputs_hash: Hash256,
    pub payload_sig: [u8; BLS_SIGNATURE_SIZE],
}

impl ProUpRevTx {
    pub const SERIALIZED_SIZE: usize = 164;

    pub fn consensus_encode(&self, encoder: &mut Encoder) {
        encoder.write_u16_le(self.version);
        encoder.write_hash_reversed(&self.pro_tx_hash);
        encoder.write_u16_le(self.reason);
        encoder.write_hash_reversed(&self.inputs_hash);
        encoder.write_bytes(&self.payload_sig);
    }

    pub fn consensus_decode(decoder: &mut Decoder) -> Result<Self, PayloadDecodeError> {
        Ok(Self {
            version: decoder.read_u16_le()?,
            pro_tx_hash: decoder.read_hash_reversed()?,
            reason: decoder.read_u16_le()?,
            inputs_hash: decoder.read_hash_reversed()?,
            payload_sig: decoder.read_fixed()?,
        })
    }
}
