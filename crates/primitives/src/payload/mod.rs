//! Extra payloads carried by special transactions. Each variant has a fixed
//! type tag and its own byte layout; dispatch is a closed enum keyed by tag.

mod asset;
mod coinbase;
mod provider;
mod quorum;

pub use asset::{AssetLockTx, AssetUnlockTx};
pub use coinbase::{CbTx, CbTxChainLock};
pub use provider::{
    PlatformFields, ProRegTx, ProUpRegTx, ProUpRevTx, ProUpServTx, ServiceAddress,
};
pub use quorum::{MnHfSignal, MnHfTx, QcTx, QuorumFinalizationCommitment};

use crate::encoding::{DecodeError, Decoder, Encoder};
use crate::transaction::TxType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadDecodeError {
    Decode(DecodeError),
    /// The payload version is newer than the layouts this library knows.
    UnsupportedVersion {
        payload: &'static str,
        version: u16,
    },
}

impl std::fmt::Display for PayloadDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadDecodeError::Decode(err) => write!(f, "{err}"),
            PayloadDecodeError::UnsupportedVersion { payload, version } => {
                write!(f, "unsupported {payload} version {version}")
            }
        }
    }
}

impl std::error::Error for PayloadDecodeError {}

impl From<DecodeError> for PayloadDecodeError {
    fn from(err: DecodeError) -> Self {
        PayloadDecodeError::Decode(err)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtraPayload {
    ProviderRegister(ProRegTx),
    ProviderUpdateService(ProUpServTx),
    ProviderUpdateRegistrar(ProUpRegTx),
    ProviderUpdateRevoke(ProUpRevTx),
    Coinbase(CbTx),
    QuorumCommitment(QcTx),
    MnHfSignal(MnHfTx),
    AssetLock(AssetLockTx),
    AssetUnlock(AssetUnlockTx),
}

impl ExtraPayload {
    pub fn tx_type(&self) -> TxType {
        match self {
            ExtraPayload::ProviderRegister(_) => TxType::ProviderRegister,
            ExtraPayload::ProviderUpdateService(_) => TxType::ProviderUpdateService,
            ExtraPayload::ProviderUpdateRegistrar(_) => TxType::ProviderUpdateRegistrar,
            ExtraPayload::ProviderUpdateRevoke(_) => TxType::ProviderUpdateRevoke,
            ExtraPayload::Coinbase(_) => TxType::Coinbase,
            ExtraPayload::QuorumCommitment(_) => TxType::QuorumCommitment,
            ExtraPayload::MnHfSignal(_) => TxType::MnHfSignal,
            ExtraPayload::AssetLock(_) => TxType::AssetLock,
            ExtraPayload::AssetUnlock(_) => TxType::AssetUnlock,
        }
    }

    pub fn consensus_encode(&self, encoder: &mut Encoder) {
        match self {
            ExtraPayload::ProviderRegister(payload) => payload.consensus_encode(encoder),
            ExtraPayload::ProviderUpdateService(payload) => payload.consensus_encode(encoder),
            ExtraPayload::ProviderUpdateRegistrar(payload) => payload.consensus_encode(encoder),
            ExtraPayload::ProviderUpdateRevoke(payload) => payload.consensus_encode(encoder),
            ExtraPayload::Coinbase(payload) => payload.consensus_encode(encoder),
            ExtraPayload::QuorumCommitment(payload) => payload.consensus_encode(encoder),
            ExtraPayload::MnHfSignal(payload) => payload.consensus_encode(encoder),
            ExtraPayload::AssetLock(payload) => payload.consensus_encode(encoder),
            ExtraPayload::AssetUnlock(payload) => payload.consensus_encode(encoder),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut encoder = Encoder::new();
        self.consensus_encode(&mut encoder);
        encoder.into_inner()
    }

    /// Decodes the payload blob for a known non-normal type tag. The blob
    /// must be consumed exactly.
    pub fn decode_for_type(tx_type: TxType, bytes: &[u8]) -> Result<Self, PayloadDecodeError> {
        let mut decoder = Decoder::new(bytes);
        let payload = match tx_type {
            TxType::Normal => {
                return Err(DecodeError::InvalidData("normal transactions carry no payload").into())
            }
            TxType::ProviderRegister => {
                ExtraPayload::ProviderRegister(ProRegTx::consensus_decode(&mut decoder)?)
            }
            TxType::ProviderUpdateService => {
                ExtraPayload::ProviderUpdateService(ProUpServTx::consensus_decode(&mut decoder)?)
            }
            TxType::ProviderUpdateRegistrar => {
                ExtraPayload::ProviderUpdateRegistrar(ProUpRegTx::consensus_decode(&mut decoder)?)
            }
            TxType::ProviderUpdateRevoke => {
                ExtraPayload::ProviderUpdateRevoke(ProUpRevTx::consensus_decode(&mut decoder)?)
            }
            TxType::Coinbase => ExtraPayload::Coinbase(CbTx::consensus_decode(&mut decoder)?),
            TxType::QuorumCommitment => {
                ExtraPayload::QuorumCommitment(QcTx::consensus_decode(&mut decoder)?)
            }
            TxType::MnHfSignal => ExtraPayload::MnHfSignal(MnHfTx::consensus_decode(&mut decoder)?),
            TxType::AssetLock => ExtraPayload::AssetLock(AssetLockTx::consensus_decode(&mut decoder)?),
            TxType::AssetUnlock => {
                ExtraPayload::AssetUnlock(AssetUnlockTx::consensus_decode(&mut decoder)?)
            }
        };
        if !decoder.is_empty() {
            return Err(DecodeError::TrailingBytes.into());
        }
        Ok(payload)
    }
}
