//! Transaction signing and change estimation.

use dashd_consensus::constants::{
    CHANGE_OUTPUT_MAX_SIZE, FEE_PER_BYTE, MIN_RELAY_FEE, SIGNED_INPUT_MAX_SIZE,
};
use dashd_consensus::Network;
use dashd_log::log_debug;
use dashd_primitives::address::{address_to_script_pubkey, p2pkh_script, AddressError};
use dashd_primitives::transaction::{Transaction, TxOut};
use secp256k1::Message;

use crate::keys::PrivateKey;
use crate::script::Script;
use crate::secp::secp256k1;
use crate::sighash::{legacy_signature_hash, SighashError, SIGHASH_ALL};

/// Serialized size of an input whose script is empty: outpoint, one-byte
/// length prefix, sequence.
const UNSIGNED_INPUT_SIZE: u64 = 41;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignError {
    InputIndexOutOfRange,
    /// A DER signature plus sighash byte must be 71, 72, or 73 bytes.
    InvalidSignatureLength(usize),
}

impl std::fmt::Display for SignError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignError::InputIndexOutOfRange => write!(f, "input index out of range"),
            SignError::InvalidSignatureLength(len) => {
                write!(f, "invalid signature length {len}")
            }
        }
    }
}

impl std::error::Error for SignError {}

impl From<SighashError> for SignError {
    fn from(err: SighashError) -> Self {
        match err {
            SighashError::InputIndexOutOfRange => SignError::InputIndexOutOfRange,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeError {
    /// Change cannot be estimated before any input is attached.
    MissingInputs,
    /// Change cannot be estimated before any output is attached.
    MissingOutputs,
    /// The outputs spend more than the inputs provide.
    InsufficientFunds,
    Address(AddressError),
}

impl std::fmt::Display for ChangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeError::MissingInputs => write!(f, "transaction has no inputs"),
            ChangeError::MissingOutputs => write!(f, "transaction has no outputs"),
            ChangeError::InsufficientFunds => write!(f, "outputs exceed available funds"),
            ChangeError::Address(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ChangeError {}

impl From<AddressError> for ChangeError {
    fn from(err: AddressError) -> Self {
        ChangeError::Address(err)
    }
}

/// Signs one P2PKH input and returns the transaction with that input's
/// script filled in; `tx` itself is left untouched.
///
/// The signature is deterministic low-S DER over the legacy sighash, with
/// the sighash byte appended. Its final length picks the push opcode, and
/// anything outside 71..=73 bytes is rejected.
pub fn sign_input(
    tx: &Transaction,
    input_index: usize,
    key: &PrivateKey,
) -> Result<Transaction, SignError> {
    let public_key = key.public_key();
    let script_code = p2pkh_script(&public_key.pubkey_hash());
    let digest = legacy_signature_hash(tx, input_index, &script_code, SIGHASH_ALL)?;

    let message = Message::from_digest(digest);
    let signature = secp256k1().sign_ecdsa(&message, &key.secret);
    let der = signature.serialize_der();

    let mut sig_push = Vec::with_capacity(der.len() + 1);
    sig_push.extend_from_slice(&der);
    sig_push.push(SIGHASH_ALL as u8);
    if !(71..=73).contains(&sig_push.len()) {
        return Err(SignError::InvalidSignatureLength(sig_push.len()));
    }
    log_debug!(
        "signed input {input_index} with a {} byte signature",
        sig_push.len()
    );

    let mut script_sig = Script::new();
    script_sig.push_slice(&sig_push);
    script_sig.push_slice(&public_key.to_bytes());

    let mut signed = tx.clone();
    signed.vin[input_index].script_sig = script_sig.to_bytes();
    Ok(signed)
}

/// Signs every input with the same key, assuming they all spend P2PKH
/// outputs paying that key.
pub fn sign_all_inputs(tx: &Transaction, key: &PrivateKey) -> Result<Transaction, SignError> {
    let mut signed = tx.clone();
    for input_index in 0..tx.vin.len() {
        signed = sign_input(&signed, input_index, key)?;
    }
    Ok(signed)
}

/// Appends a change output paying `change_address` for whatever the inputs
/// provide beyond the outputs and the estimated fee. Returns the
/// transaction unchanged when the remainder would not pay for itself.
///
/// The fee estimate prices each input at its worst-case signed size and
/// reserves room for the change output, then floors at the relay minimum.
pub fn add_change_output(
    tx: &Transaction,
    input_total: u64,
    change_address: &str,
    network: Network,
) -> Result<Transaction, ChangeError> {
    if tx.vin.is_empty() {
        return Err(ChangeError::MissingInputs);
    }
    if tx.vout.is_empty() {
        return Err(ChangeError::MissingOutputs);
    }
    let output_total = tx.output_value();
    if output_total > input_total {
        return Err(ChangeError::InsufficientFunds);
    }
    let change_script = address_to_script_pubkey(change_address, network)?;

    let mut stripped = tx.clone();
    for input in &mut stripped.vin {
        input.script_sig.clear();
    }
    let input_count = tx.vin.len() as u64;
    let estimated_size = stripped.size() as u64 - input_count * UNSIGNED_INPUT_SIZE
        + input_count * SIGNED_INPUT_MAX_SIZE
        + CHANGE_OUTPUT_MAX_SIZE;
    let fee = (estimated_size * FEE_PER_BYTE).max(MIN_RELAY_FEE);

    let available = input_total - output_total;
    if available <= fee {
        log_debug!("no change: {available} duffs available, {fee} needed for fees");
        return Ok(tx.clone());
    }

    let change = available - fee;
    if change <= CHANGE_OUTPUT_MAX_SIZE * FEE_PER_BYTE {
        log_debug!("change of {change} duffs is dust, leaving it to the fee");
        return Ok(tx.clone());
    }

    let mut with_change = tx.clone();
    with_change.vout.push(TxOut {
        value: change,
        script_pubkey: change_script,
    });
    Ok(with_change)
}
