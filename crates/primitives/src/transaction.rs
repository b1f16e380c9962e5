use dashd_consensus::{constants, Hash256};

use crate::encoding::{Decodable, DecodeError, Decoder, Encodable, Encoder};
use crate::hash::sha256d;
use crate::hex::{hex_decode, hex_encode, HexError};
use crate::outpoint::OutPoint;
use crate::payload::{ExtraPayload, PayloadDecodeError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxIn {
    pub prevout: OutPoint,
    pub script_sig: Vec<u8>,
    pub sequence: u32,
}

impl TxIn {
    pub fn new(prevout: OutPoint, script_sig: Vec<u8>) -> Self {
        Self {
            prevout,
            script_sig,
            sequence: constants::DEFAULT_SEQUENCE,
        }
    }
}

impl Encodable for TxIn {
    fn consensus_encode(&self, encoder: &mut Encoder) {
        self.prevout.consensus_encode(encoder);
        encoder.write_var_bytes(&self.script_sig);
        encoder.write_u32_le(self.sequence);
    }
}

impl Decodable for TxIn {
    fn consensus_decode(decoder: &mut Decoder) -> Result<Self, DecodeError> {
        Ok(Self {
            prevout: OutPoint::consensus_decode(decoder)?,
            script_sig: decoder.read_var_bytes()?,
            sequence: decoder.read_u32_le()?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxOut {
    /// Amount in duffs.
    pub value: u64,
    pub script_pubkey: Vec<u8>,
}

impl Encodable for TxOut {
    fn consensus_encode(&self, encoder: &mut Encoder) {
        encoder.write_u64_le(self.value);
        encoder.write_var_bytes(&self.script_pubkey);
    }
}

impl Decodable for TxOut {
    fn consensus_decode(decoder: &mut Decoder) -> Result<Self, DecodeError> {
        Ok(Self {
            value: decoder.read_u64_le()?,
            script_pubkey: decoder.read_var_bytes()?,
        })
    }
}

/// Transaction type tag, carried in the upper 16 bits of the header word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxType {
    Normal,
    ProviderRegister,
    ProviderUpdateService,
    ProviderUpdateRegistrar,
    ProviderUpdateRevoke,
    Coinbase,
    QuorumCommitment,
    MnHfSignal,
    AssetLock,
    AssetUnlock,
}

impl TxType {
    pub fn to_u16(self) -> u16 {
        match self {
            TxType::Normal => constants::TRANSACTION_NORMAL,
            TxType::ProviderRegister => constants::TRANSACTION_PROVIDER_REGISTER,
            TxType::ProviderUpdateService => constants::TRANSACTION_PROVIDER_UPDATE_SERVICE,
            TxType::ProviderUpdateRegistrar => constants::TRANSACTION_PROVIDER_UPDATE_REGISTRAR,
            TxType::ProviderUpdateRevoke => constants::TRANSACTION_PROVIDER_UPDATE_REVOKE,
            TxType::Coinbase => constants::TRANSACTION_COINBASE,
            TxType::QuorumCommitment => constants::TRANSACTION_QUORUM_COMMITMENT,
            TxType::MnHfSignal => constants::TRANSACTION_MNHF_SIGNAL,
            TxType::AssetLock => constants::TRANSACTION_ASSET_LOCK,
            TxType::AssetUnlock => constants::TRANSACTION_ASSET_UNLOCK,
        }
    }

    pub fn from_u16(tag: u16) -> Option<Self> {
        match tag {
            constants::TRANSACTION_NORMAL => Some(TxType::Normal),
            constants::TRANSACTION_PROVIDER_REGISTER => Some(TxType::ProviderRegister),
            constants::TRANSACTION_PROVIDER_UPDATE_SERVICE => Some(TxType::ProviderUpdateService),
            constants::TRANSACTION_PROVIDER_UPDATE_REGISTRAR => {
                Some(TxType::ProviderUpdateRegistrar)
            }
            constants::TRANSACTION_PROVIDER_UPDATE_REVOKE => Some(TxType::ProviderUpdateRevoke),
            constants::TRANSACTION_COINBASE => Some(TxType::Coinbase),
            constants::TRANSACTION_QUORUM_COMMITMENT => Some(TxType::QuorumCommitment),
            constants::TRANSACTION_MNHF_SIGNAL => Some(TxType::MnHfSignal),
            constants::TRANSACTION_ASSET_LOCK => Some(TxType::AssetLock),
            constants::TRANSACTION_ASSET_UNLOCK => Some(TxType::AssetUnlock),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionDecodeError {
    Decode(DecodeError),
    /// The header carried a non-zero type tag this library does not know.
    UnsupportedExtraPayloadType(u16),
    Payload(PayloadDecodeError),
    Hex(HexError),
}

impl std::fmt::Display for TransactionDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionDecodeError::Decode(err) => write!(f, "{err}"),
            TransactionDecodeError::UnsupportedExtraPayloadType(tag) => {
                write!(f, "unsupported extra payload type {tag}")
            }
            TransactionDecodeError::Payload(err) => write!(f, "{err}"),
            TransactionDecodeError::Hex(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TransactionDecodeError {}

impl From<DecodeError> for TransactionDecodeError {
    fn from(err: DecodeError) -> Self {
        TransactionDecodeError::Decode(err)
    }
}

impl From<PayloadDecodeError> for TransactionDecodeError {
    fn from(err: PayloadDecodeError) -> Self {
        TransactionDecodeError::Payload(err)
    }
}

impl From<HexError> for TransactionDecodeError {
    fn from(err: HexError) -> Self {
        TransactionDecodeError::Hex(err)
    }
}

/// A transaction. The type tag is derived from the payload variant, so a
/// special payload on a "normal" transaction (or vice versa) cannot be
/// represented.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub version: u16,
    pub vin: Vec<TxIn>,
    pub vout: Vec<TxOut>,
    pub lock_time: u32,
    pub extra_payload: Option<ExtraPayload>,
}

impl Transaction {
    pub fn tx_type(&self) -> TxType {
        match &self.extra_payload {
            None => TxType::Normal,
            Some(payload) => payload.tx_type(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        crate::encoding::encode(self)
    }

    pub fn to_hex(&self) -> String {
        hex_encode(&self.to_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionDecodeError> {
        let mut decoder = Decoder::new(bytes);
        let tx = Self::decode_from(&mut decoder)?;
        if !decoder.is_empty() {
            return Err(DecodeError::TrailingBytes.into());
        }
        Ok(tx)
    }

    pub fn from_hex(hex: &str) -> Result<Self, TransactionDecodeError> {
        Self::from_bytes(&hex_decode(hex)?)
    }

    pub fn decode_from(decoder: &mut Decoder) -> Result<Self, TransactionDecodeError> {
        let header = decoder.read_u32_le()?;
        let version = (header & 0xffff) as u16;
        let type_tag = (header >> 16) as u16;

        let vin = read_vec::<TxIn>(decoder)?;
        let vout = read_vec::<TxOut>(decoder)?;
        let lock_time = decoder.read_u32_le()?;

        let extra_payload = if type_tag == constants::TRANSACTION_NORMAL {
            None
        } else {
            let tx_type = TxType::from_u16(type_tag)
                .ok_or(TransactionDecodeError::UnsupportedExtraPayloadType(type_tag))?;
            let blob = decoder.read_var_bytes()?;
            Some(ExtraPayload::decode_for_type(tx_type, &blob)?)
        };

        Ok(Self {
            version,
            vin,
            vout,
            lock_time,
            extra_payload,
        })
    }

    /// Double SHA-256 of the serialization, in display order.
    pub fn txid(&self) -> Hash256 {
        let mut hash = sha256d(&self.to_bytes());
        hash.reverse();
        hash
    }

    pub fn txid_hex(&self) -> String {
        hex_encode(&self.txid())
    }

    /// The lock time interpreted as a block height, if it is one.
    pub fn lock_time_as_height(&self) -> Option<u32> {
        (self.lock_time < constants::LOCKTIME_THRESHOLD).then_some(self.lock_time)
    }

    /// The lock time interpreted as a UNIX timestamp, if it is one.
    pub fn lock_time_as_timestamp(&self) -> Option<u32> {
        (self.lock_time >= constants::LOCKTIME_THRESHOLD).then_some(self.lock_time)
    }

    pub fn size(&self) -> usize {
        self.to_bytes().len()
    }

    pub fn output_value(&self) -> u64 {
        self.vout.iter().map(|out| out.value).sum()
    }
}

impl Encodable for Transaction {
    fn consensus_encode(&self, encoder: &mut Encoder) {
        let header = (self.version as u32) | ((self.tx_type().to_u16() as u32) << 16);
        encoder.write_u32_le(header);
        write_vec(encoder, &self.vin);
        write_vec(encoder, &self.vout);
        encoder.write_u32_le(self.lock_time);
        if let Some(payload) = &self.extra_payload {
            let mut body = Encoder::new();
            payload.consensus_encode(&mut body);
            encoder.write_var_bytes(&body.into_inner());
        }
    }
}

pub(crate) fn write_vec<T: Encodable>(encoder: &mut Encoder, items: &[T]) {
    encoder.write_compact_size(items.len() as u64);
    for item in items {
        item.consensus_encode(encoder);
    }
}

pub(crate) fn read_vec<T: Decodable>(decoder: &mut Decoder) -> Result<Vec<T>, DecodeError> {
    let count = decoder.read_length()?;
    let mut items = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        items.push(T::consensus_decode(decoder)?);
    }
    Ok(items)
}
