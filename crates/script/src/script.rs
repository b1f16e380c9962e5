//! Script chunk model: parsing, serialization, and ASM rendering.

use dashd_consensus::Network;
use dashd_primitives::address::{pubkey_hash_to_address, script_pubkey_to_address};
use dashd_primitives::encoding::{DecodeError, Decoder, Encoder};
use dashd_primitives::hash::hash160;
use dashd_primitives::hex::{hex_decode, hex_encode};

use crate::opcodes::{self, MAX_PUSHBYTES, OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4};

/// One parsed script element: an opcode, plus the pushed bytes when the
/// opcode is a push.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    pub opcode: u8,
    pub data: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptAsmError {
    UnknownMnemonic(String),
    /// A push mnemonic was not followed by its hex data.
    MissingPushData,
    InvalidHex(String),
    /// The pushed data does not fit the push opcode's width.
    LengthMismatch,
}

impl std::fmt::Display for ScriptAsmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptAsmError::UnknownMnemonic(token) => write!(f, "unknown mnemonic {token:?}"),
            ScriptAsmError::MissingPushData => write!(f, "push mnemonic without data"),
            ScriptAsmError::InvalidHex(token) => write!(f, "invalid hex {token:?}"),
            ScriptAsmError::LengthMismatch => write!(f, "push data length mismatch"),
        }
    }
}

impl std::error::Error for ScriptAsmError {}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Script {
    pub chunks: Vec<ScriptChunk>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses raw script bytes into chunks. A push running past the end of
    /// the buffer is an error rather than a silent short read.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut decoder = Decoder::new(bytes);
        let mut chunks = Vec::new();
        while !decoder.is_empty() {
            let opcode = decoder.read_u8()?;
            let data = match opcode {
                1..=MAX_PUSHBYTES => Some(decoder.read_bytes(opcode as usize)?),
                OP_PUSHDATA1 => {
                    let len = decoder.read_u8()? as usize;
                    Some(decoder.read_bytes(len)?)
                }
                OP_PUSHDATA2 => {
                    let len = decoder.read_u16_le()? as usize;
                    Some(decoder.read_bytes(len)?)
                }
                OP_PUSHDATA4 => {
                    let len = decoder.read_u32_le()? as usize;
                    Some(decoder.read_bytes(len)?)
                }
                _ => None,
            };
            chunks.push(ScriptChunk { opcode, data });
        }
        Ok(Self { chunks })
    }

    /// Exact inverse of [`Script::from_bytes`].
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut encoder = Encoder::new();
        for chunk in &self.chunks {
            encoder.write_u8(chunk.opcode);
            let Some(data) = &chunk.data else {
                continue;
            };
            match chunk.opcode {
                OP_PUSHDATA1 => encoder.write_u8(data.len() as u8),
                OP_PUSHDATA2 => encoder.write_u16_le(data.len() as u16),
                OP_PUSHDATA4 => encoder.write_u32_le(data.len() as u32),
                _ => {}
            }
            encoder.write_bytes(data);
        }
        encoder.into_inner()
    }

    pub fn push_opcode(&mut self, opcode: u8) -> &mut Self {
        self.chunks.push(ScriptChunk { opcode, data: None });
        self
    }

    /// Pushes `data` with the smallest push opcode that can carry it.
    pub fn push_slice(&mut self, data: &[u8]) -> &mut Self {
        let opcode = if data.len() <= MAX_PUSHBYTES as usize {
            data.len() as u8
        } else if data.len() <= u8::MAX as usize {
            OP_PUSHDATA1
        } else if data.len() <= u16::MAX as usize {
            OP_PUSHDATA2
        } else {
            OP_PUSHDATA4
        };
        self.chunks.push(ScriptChunk {
            opcode,
            data: Some(data.to_vec()),
        });
        self
    }

    pub fn to_asm(&self) -> String {
        let mut parts = Vec::with_capacity(self.chunks.len());
        for chunk in &self.chunks {
            match (&chunk.data, opcodes::name(chunk.opcode)) {
                (Some(data), _) if (1..=MAX_PUSHBYTES).contains(&chunk.opcode) => {
                    parts.push(format!("OP_PUSHBYTES_{}", chunk.opcode));
                    parts.push(hex_encode(data));
                }
                (Some(data), Some(mnemonic)) => {
                    parts.push(mnemonic.to_string());
                    parts.push(hex_encode(data));
                }
                (None, Some(mnemonic)) => parts.push(mnemonic.to_string()),
                (_, None) => parts.push(format!("OP_UNKNOWN_0x{:02x}", chunk.opcode)),
            }
        }
        parts.join(" ")
    }

    pub fn from_asm(asm: &str) -> Result<Self, ScriptAsmError> {
        let mut script = Script::new();
        let mut tokens = asm.split_whitespace().peekable();
        while let Some(token) = tokens.next() {
            let Some(opcode) = opcodes::from_name(token) else {
                // a bare hex token is a minimal push
                let data = hex_decode(token)
                    .map_err(|_| ScriptAsmError::UnknownMnemonic(token.to_string()))?;
                script.push_slice(&data);
                continue;
            };

            let takes_data = (1..=MAX_PUSHBYTES).contains(&opcode)
                || matches!(opcode, OP_PUSHDATA1 | OP_PUSHDATA2 | OP_PUSHDATA4);
            if !takes_data {
                script.push_opcode(opcode);
                continue;
            }

            let raw = tokens.next().ok_or(ScriptAsmError::MissingPushData)?;
            let data =
                hex_decode(raw).map_err(|_| ScriptAsmError::InvalidHex(raw.to_string()))?;
            let fits = match opcode {
                OP_PUSHDATA1 => data.len() <= u8::MAX as usize,
                OP_PUSHDATA2 => data.len() <= u16::MAX as usize,
                OP_PUSHDATA4 => data.len() <= u32::MAX as usize,
                count => data.len() == count as usize,
            };
            if !fits {
                return Err(ScriptAsmError::LengthMismatch);
            }
            script.chunks.push(ScriptChunk {
                opcode,
                data: Some(data),
            });
        }
        Ok(script)
    }

    /// The address this script pays to, when it is a standard output or
    /// contains a public key push.
    pub fn to_address(&self, network: Network) -> Option<String> {
        if let Some(address) = script_pubkey_to_address(&self.to_bytes(), network) {
            return Some(address);
        }
        for chunk in &self.chunks {
            let Some(data) = &chunk.data else { continue };
            if data.len() == 33 || data.len() == 65 {
                return Some(pubkey_hash_to_address(&hash160(data), network));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::{OP_CHECKSIG, OP_DUP, OP_EQUALVERIFY, OP_HASH160};

    #[test]
    fn parse_p2pkh() {
        let mut bytes = vec![OP_DUP, OP_HASH160, 0x14];
        bytes.extend_from_slice(&[0xaa; 20]);
        bytes.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);

        let script = Script::from_bytes(&bytes).unwrap();
        assert_eq!(script.chunks.len(), 5);
        assert_eq!(script.chunks[2].data.as_deref(), Some(&[0xaa; 20][..]));
        assert_eq!(script.to_bytes(), bytes);
    }

    #[test]
    fn pushdata_forms_round_trip() {
        let mut script = Script::new();
        script.chunks.push(ScriptChunk {
            opcode: OP_PUSHDATA1,
            data: Some(vec![0x11; 80]),
        });
        script.chunks.push(ScriptChunk {
            opcode: OP_PUSHDATA2,
            data: Some(vec![0x22; 300]),
        });
        let bytes = script.to_bytes();
        assert_eq!(Script::from_bytes(&bytes).unwrap(), script);
    }

    #[test]
    fn truncated_push_rejected() {
        // claims 5 bytes, supplies 2
        assert_eq!(
            Script::from_bytes(&[0x05, 0x01, 0x02]),
            Err(DecodeError::TruncatedInput)
        );
        // OP_PUSHDATA2 with half a length prefix
        assert_eq!(
            Script::from_bytes(&[OP_PUSHDATA2, 0x10]),
            Err(DecodeError::TruncatedInput)
        );
    }

    #[test]
    fn minimal_push_selection() {
        let mut script = Script::new();
        script.push_slice(&[0x01; 75]);
        script.push_slice(&[0x02; 76]);
        script.push_slice(&[0x03; 256]);
        assert_eq!(script.chunks[0].opcode, 75);
        assert_eq!(script.chunks[1].opcode, OP_PUSHDATA1);
        assert_eq!(script.chunks[2].opcode, OP_PUSHDATA2);
    }

    #[test]
    fn asm_round_trip() {
        let mut bytes = vec![OP_DUP, OP_HASH160, 0x03];
        bytes.extend_from_slice(&[0xde, 0xad, 0xbe]);
        bytes.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
        let script = Script::from_bytes(&bytes).unwrap();

        let asm = script.to_asm();
        assert_eq!(
            asm,
            "OP_DUP OP_HASH160 OP_PUSHBYTES_3 deadbe OP_EQUALVERIFY OP_CHECKSIG"
        );
        assert_eq!(Script::from_asm(&asm).unwrap(), script);
    }

    #[test]
    fn asm_unknown_opcode() {
        let script = Script::from_bytes(&[0xfe]).unwrap();
        assert_eq!(script.to_asm(), "OP_UNKNOWN_0xfe");
    }

    #[test]
    fn asm_errors() {
        assert_eq!(
            Script::from_asm("OP_PUSHBYTES_3"),
            Err(ScriptAsmError::MissingPushData)
        );
        assert_eq!(
            Script::from_asm("OP_PUSHBYTES_3 dead"),
            Err(ScriptAsmError::LengthMismatch)
        );
        assert_eq!(
            Script::from_asm("OP_PUSHDATA1 zz"),
            Err(ScriptAsmError::InvalidHex("zz".to_string()))
        );
    }
}
