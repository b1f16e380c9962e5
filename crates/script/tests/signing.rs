use dashd_consensus::Network;
use dashd_primitives::address::{address_to_script_pubkey, p2pkh_script};
use dashd_primitives::outpoint::OutPoint;
use dashd_primitives::transaction::{Transaction, TxIn, TxOut};
use dashd_script::{
    add_change_output, classify_script_pubkey, legacy_signature_hash, sign_all_inputs, PrivateKey,
    Script, ScriptType, SIGHASH_ALL,
};

const TEST_WIF: &str = "cMcfH8sRgBgDMfpBNG6H3haaxLkaYXgqMRef8Nev6tWyBSNr6c3n";

fn spending_tx(outputs: Vec<TxOut>) -> Transaction {
    Transaction {
        version: 1,
        vin: vec![
            TxIn::new(OutPoint::new([0x81; 32], 0), Vec::new()),
            TxIn::new(OutPoint::new([0x82; 32], 5), Vec::new()),
        ],
        vout: outputs,
        lock_time: 0,
        extra_payload: None,
    }
}

#[test]
fn sign_spend_with_change_end_to_end() {
    let key = PrivateKey::from_wif(TEST_WIF, Network::Testnet).unwrap();
    let recipient = p2pkh_script(&[0x99; 20]);
    let tx = spending_tx(vec![TxOut {
        value: 150_000,
        script_pubkey: recipient,
    }]);

    let funded = add_change_output(&tx, 400_000, &key.address(), Network::Testnet).unwrap();
    assert_eq!(funded.vout.len(), 2);
    assert_eq!(
        classify_script_pubkey(&funded.vout[1].script_pubkey),
        ScriptType::P2Pkh
    );
    let fee = 400_000 - funded.output_value();
    assert!(fee >= 1_000);

    let signed = sign_all_inputs(&funded, &key).unwrap();
    assert_eq!(signed.vout, funded.vout);

    let script_code = p2pkh_script(&key.public_key().pubkey_hash());
    for (index, input) in signed.vin.iter().enumerate() {
        let script_sig = Script::from_bytes(&input.script_sig).unwrap();
        assert_eq!(script_sig.chunks.len(), 2);

        let sig = script_sig.chunks[0].data.as_ref().unwrap();
        let pubkey = script_sig.chunks[1].data.as_ref().unwrap();
        assert_eq!(pubkey, &key.public_key().to_bytes());

        // existing signatures never feed back into the digest, so the
        // sighash of the signed transaction still matches
        let digest = legacy_signature_hash(&signed, index, &script_code, SIGHASH_ALL).unwrap();
        let message = secp256k1::Message::from_digest(digest);
        let signature = secp256k1::ecdsa::Signature::from_der(&sig[..sig.len() - 1]).unwrap();
        let public = secp256k1::PublicKey::from_slice(pubkey).unwrap();
        secp256k1::Secp256k1::verification_only()
            .verify_ecdsa(&message, &signature, &public)
            .unwrap();
    }

    // the whole thing still round-trips the wire format
    let bytes = signed.to_bytes();
    assert_eq!(Transaction::from_bytes(&bytes).unwrap(), signed);
}

#[test]
fn signed_input_reveals_signer_address() {
    let key = PrivateKey::from_wif(TEST_WIF, Network::Testnet).unwrap();
    let tx = spending_tx(vec![TxOut {
        value: 1_000,
        script_pubkey: p2pkh_script(&[0x77; 20]),
    }]);
    let signed = sign_all_inputs(&tx, &key).unwrap();

    let script_sig = Script::from_bytes(&signed.vin[0].script_sig).unwrap();
    assert_eq!(
        script_sig.to_address(Network::Testnet),
        Some(key.address())
    );
}

#[test]
fn change_script_pays_the_change_address() {
    let key = PrivateKey::from_wif(TEST_WIF, Network::Testnet).unwrap();
    let tx = spending_tx(vec![TxOut {
        value: 10_000,
        script_pubkey: p2pkh_script(&[0x55; 20]),
    }]);
    let address = key.address();
    let funded = add_change_output(&tx, 1_000_000, &address, Network::Testnet).unwrap();
    assert_eq!(
        funded.vout[1].script_pubkey,
        address_to_script_pubkey(&address, Network::Testnet).unwrap()
    );
}
