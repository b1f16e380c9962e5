use dashd_consensus::Network;
use dashd_primitives::address::{
    address_to_script_pubkey, p2pkh_script, p2sh_script, pubkey_hash_to_address,
    script_hash_to_address, script_pubkey_to_address, secret_key_to_wif, wif_to_secret_key,
    AddressError,
};

const HASH160: [u8; 20] = [
    0x62, 0xe9, 0x07, 0xb1, 0x5c, 0xbf, 0x27, 0xd5, 0x42, 0x53, 0x99, 0xeb, 0xf6, 0xf0, 0xfb,
    0x50, 0xeb, 0xb8, 0x8f, 0x18,
];

fn test_secret() -> [u8; 32] {
    std::array::from_fn(|i| i as u8 + 1)
}

#[test]
fn p2pkh_address_fixtures() {
    assert_eq!(
        pubkey_hash_to_address(&HASH160, Network::Mainnet),
        "XjhqDGJH37VEpecoDGmtJrmEB7VoD8Lb39"
    );
    assert_eq!(
        pubkey_hash_to_address(&HASH160, Network::Testnet),
        "yVLSEDNiUf9KAPYLn86HLtBaTPzAhDfksR"
    );
}

#[test]
fn p2sh_address_fixtures() {
    assert_eq!(
        script_hash_to_address(&HASH160, Network::Mainnet),
        "7bRe8kQzSHgfkeFbk6nmDLS2Qr3CXPgTPo"
    );
    assert_eq!(
        script_hash_to_address(&HASH160, Network::Testnet),
        "8oST65JrZq5JCwfrpMnifiFPJMp2hRhLb7"
    );
}

#[test]
fn address_and_script_invert() {
    let address = pubkey_hash_to_address(&HASH160, Network::Mainnet);
    let script = address_to_script_pubkey(&address, Network::Mainnet).unwrap();
    assert_eq!(script, p2pkh_script(&HASH160));
    assert_eq!(
        script_pubkey_to_address(&script, Network::Mainnet),
        Some(address)
    );

    let p2sh_address = script_hash_to_address(&HASH160, Network::Testnet);
    let p2sh = address_to_script_pubkey(&p2sh_address, Network::Testnet).unwrap();
    assert_eq!(p2sh, p2sh_script(&HASH160));
    assert_eq!(
        script_pubkey_to_address(&p2sh, Network::Testnet),
        Some(p2sh_address)
    );
}

#[test]
fn wrong_network_address_rejected() {
    let mainnet = pubkey_hash_to_address(&HASH160, Network::Mainnet);
    assert_eq!(
        address_to_script_pubkey(&mainnet, Network::Testnet),
        Err(AddressError::UnknownPrefix)
    );
}

#[test]
fn wif_fixtures() {
    let secret = test_secret();
    assert_eq!(
        secret_key_to_wif(&secret, Network::Mainnet, true),
        "XBKbGVFwYocQFZMJ1cH2BcGYF8ikKtCPexr6YUXbv994KrRvHANR"
    );
    assert_eq!(
        secret_key_to_wif(&secret, Network::Mainnet, false),
        "7qZJjUhYPcUxZkabfeu7cUvpQbNhBAndQ6re444mAKcMhAnezWG"
    );
    assert_eq!(
        secret_key_to_wif(&secret, Network::Testnet, true),
        "cMcfH8sRgBgDMfpBNG6H3haaxLkaYXgqMRef8Nev6tWyBSNr6c3n"
    );
}

#[test]
fn wif_round_trips() {
    let secret = test_secret();
    for (network, compressed) in [
        (Network::Mainnet, true),
        (Network::Mainnet, false),
        (Network::Testnet, true),
        (Network::Testnet, false),
    ] {
        let wif = secret_key_to_wif(&secret, network, compressed);
        assert_eq!(wif_to_secret_key(&wif, network), Ok((secret, compressed)));
    }
}

#[test]
fn wrong_network_wif_rejected() {
    let wif = secret_key_to_wif(&test_secret(), Network::Mainnet, true);
    assert_eq!(
        wif_to_secret_key(&wif, Network::Testnet),
        Err(AddressError::UnknownPrefix)
    );
}

#[test]
fn corrupted_wif_rejected() {
    let mut wif = secret_key_to_wif(&test_secret(), Network::Mainnet, true).into_bytes();
    let last = *wif.last().unwrap();
    *wif.last_mut().unwrap() = if last == b'2' { b'3' } else { b'2' };
    let wif = String::from_utf8(wif).unwrap();
    assert_eq!(
        wif_to_secret_key(&wif, Network::Mainnet),
        Err(AddressError::ChecksumMismatch)
    );
}
