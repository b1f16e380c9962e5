//! Script parsing, key handling, and transaction signing.

pub mod keys;
pub mod opcodes;
pub mod script;
mod secp;
pub mod sighash;
pub mod signer;
pub mod standard;

pub use keys::{KeyError, PrivateKey, PublicKey};
pub use script::{Script, ScriptAsmError, ScriptChunk};
pub use sighash::{legacy_signature_hash, SighashError, SIGHASH_ALL};
pub use signer::{add_change_output, sign_all_inputs, sign_input, ChangeError, SignError};
pub use standard::{classify_script_pubkey, ScriptType};
