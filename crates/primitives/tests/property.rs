use dashd_consensus::Hash256;
use dashd_primitives::encoding::{compact_size_len, decode, encode, DecodeError, Decoder, Encoder};
use dashd_primitives::instantlock::InstantLock;
use dashd_primitives::outpoint::OutPoint;
use dashd_primitives::payload::{
    AssetLockTx, AssetUnlockTx, CbTx, CbTxChainLock, MnHfSignal, MnHfTx, PlatformFields, ProRegTx,
    ProUpRegTx, ProUpRevTx, ProUpServTx, QcTx, QuorumFinalizationCommitment, ServiceAddress,
};
use dashd_primitives::transaction::{Transaction, TxIn, TxOut};
use dashd_primitives::ExtraPayload;

struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u16(&mut self) -> u16 {
        self.next_u64() as u16
    }

    fn next_u8(&mut self) -> u8 {
        self.next_u64() as u8
    }

    fn gen_range(&mut self, max: usize) -> usize {
        if max == 0 {
            0
        } else {
            (self.next_u64() % max as u64) as usize
        }
    }
}

fn fill_bytes<const N: usize>(rng: &mut Lcg) -> [u8; N] {
    std::array::from_fn(|_| rng.next_u8())
}

fn random_hash(rng: &mut Lcg) -> Hash256 {
    fill_bytes::<32>(rng)
}

fn random_vec(rng: &mut Lcg, max_len: usize) -> Vec<u8> {
    let len = rng.gen_range(max_len + 1);
    let mut bytes = Vec::with_capacity(len);
    for _ in 0..len {
        bytes.push(rng.next_u8());
    }
    bytes
}

fn random_service(rng: &mut Lcg) -> ServiceAddress {
    ServiceAddress {
        addr: std::net::Ipv6Addr::from(fill_bytes::<16>(rng)),
        port: rng.next_u16(),
    }
}

fn random_platform(rng: &mut Lcg) -> PlatformFields {
    PlatformFields {
        node_id: fill_bytes::<20>(rng),
        p2p_port: rng.next_u16(),
        http_port: rng.next_u16(),
    }
}

fn random_txin(rng: &mut Lcg) -> TxIn {
    TxIn {
        prevout: OutPoint::new(random_hash(rng), rng.next_u32()),
        script_sig: random_vec(rng, 64),
        sequence: rng.next_u32(),
    }
}

fn random_txout(rng: &mut Lcg) -> TxOut {
    TxOut {
        value: rng.next_u64() >> 16,
        script_pubkey: random_vec(rng, 40),
    }
}

fn random_bitset(rng: &mut Lcg) -> (u64, Vec<u8>) {
    let bit_count = rng.gen_range(400) as u64 + 1;
    let bytes = ((bit_count + 7) / 8) as usize;
    let mut packed = Vec::with_capacity(bytes);
    for _ in 0..bytes {
        packed.push(rng.next_u8());
    }
    (bit_count, packed)
}

fn random_payload(rng: &mut Lcg) -> ExtraPayload {
    match rng.gen_range(9) {
        0 => {
            let version = rng.gen_range(2) as u16 + 1;
            ExtraPayload::ProviderRegister(ProRegTx {
                version,
                provider_type: 0,
                mode: 0,
                collateral: OutPoint::new(random_hash(rng), rng.next_u32()),
                service: random_service(rng),
                owner_key_hash: fill_bytes(rng),
                operator_key: fill_bytes(rng),
                voting_key_hash: fill_bytes(rng),
                operator_reward: rng.next_u16() % 10_001,
                script_payout: random_vec(rng, 32),
                inputs_hash: random_hash(rng),
                platform: (version >= 2).then(|| random_platform(rng)),
                payload_sig: random_vec(rng, 80),
            })
        }
        1 => {
            let version = rng.gen_range(2) as u16 + 1;
            ExtraPayload::ProviderUpdateService(ProUpServTx {
                version,
                provider_type: 0,
                pro_tx_hash: random_hash(rng),
                service: random_service(rng),
                script_operator_payout: random_vec(rng, 32),
                inputs_hash: random_hash(rng),
                platform: (version >= 2).then(|| random_platform(rng)),
                payload_sig: fill_bytes(rng),
            })
        }
        2 => ExtraPayload::ProviderUpdateRegistrar(ProUpRegTx {
            version: 1,
            pro_tx_hash: random_hash(rng),
            mode: 0,
            operator_key: fill_bytes(rng),
            voting_key_hash: fill_bytes(rng),
            script_payout: random_vec(rng, 32),
            inputs_hash: random_hash(rng),
            payload_sig: random_vec(rng, 80),
        }),
        3 => ExtraPayload::ProviderUpdateRevoke(ProUpRevTx {
            version: 1,
            pro_tx_hash: random_hash(rng),
            reason: rng.next_u16() % 4,
            inputs_hash: random_hash(rng),
            payload_sig: fill_bytes(rng),
        }),
        4 => {
            let version = rng.gen_range(3) as u16 + 1;
            ExtraPayload::Coinbase(CbTx {
                version,
                height: rng.next_u32() >> 8,
                merkle_root_mn_list: random_hash(rng),
                merkle_root_quorums: (version >= 2).then(|| random_hash(rng)),
                chain_lock: (version >= 3).then(|| CbTxChainLock {
                    best_cl_height_diff: rng.next_u64() >> 40,
                    best_cl_signature: fill_bytes(rng),
                    credit_pool_balance: rng.next_u64() as i64 >> 16,
                }),
            })
        }
        5 => {
            let version = rng.gen_range(2) as u16 + 1;
            let (signers_bit_count, signers) = random_bitset(rng);
            let (valid_members_bit_count, valid_members) = random_bitset(rng);
            ExtraPayload::QuorumCommitment(QcTx {
                version: 1,
                height: rng.next_u32() >> 8,
                commitment: QuorumFinalizationCommitment {
                    version,
                    llmq_type: rng.next_u8(),
                    quorum_hash: random_hash(rng),
                    quorum_index: (version >= 2).then(|| rng.next_u16()),
                    signers_bit_count,
                    signers,
                    valid_members_bit_count,
                    valid_members,
                    quorum_public_key: fill_bytes(rng),
                    quorum_vvec_hash: random_hash(rng),
                    quorum_sig: fill_bytes(rng),
                    members_sig: fill_bytes(rng),
                },
            })
        }
        6 => ExtraPayload::MnHfSignal(MnHfTx {
            version: 1,
            signal: MnHfSignal {
                version_bit: rng.next_u8(),
                quorum_hash: random_hash(rng),
                sig: fill_bytes(rng),
            },
        }),
        7 => {
            let count = rng.gen_range(4) + 1;
            ExtraPayload::AssetLock(AssetLockTx {
                version: 1,
                credit_outputs: (0..count).map(|_| random_txout(rng)).collect(),
            })
        }
        _ => ExtraPayload::AssetUnlock(AssetUnlockTx {
            version: 1,
            index: rng.next_u64(),
            fee: rng.next_u32(),
            requested_height: rng.next_u32() >> 8,
            quorum_hash: random_hash(rng),
            quorum_sig: fill_bytes(rng),
        }),
    }
}

fn random_transaction(rng: &mut Lcg) -> Transaction {
    let vin = (0..rng.gen_range(4) + 1).map(|_| random_txin(rng)).collect();
    let vout = (0..rng.gen_range(4) + 1)
        .map(|_| random_txout(rng))
        .collect();
    let extra_payload = if rng.gen_range(4) == 0 {
        None
    } else {
        Some(random_payload(rng))
    };
    Transaction {
        version: 3,
        vin,
        vout,
        lock_time: rng.next_u32(),
        extra_payload,
    }
}

#[test]
fn compact_size_boundary_encodings() {
    let cases: &[(u64, &[u8])] = &[
        (0, &[0x00]),
        (0xfc, &[0xfc]),
        (0xfd, &[0xfd, 0xfd, 0x00]),
        (0xffff, &[0xfd, 0xff, 0xff]),
        (0x1_0000, &[0xfe, 0x00, 0x00, 0x01, 0x00]),
        (0xffff_ffff, &[0xfe, 0xff, 0xff, 0xff, 0xff]),
        (
            0x1_0000_0000,
            &[0xff, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00],
        ),
    ];
    for (value, expected) in cases {
        let mut encoder = Encoder::new();
        encoder.write_compact_size(*value);
        let bytes = encoder.into_inner();
        assert_eq!(bytes.as_slice(), *expected, "value {value}");
        assert_eq!(compact_size_len(*value), expected.len());

        let mut decoder = Decoder::new(&bytes);
        assert_eq!(decoder.read_compact_size().unwrap(), *value);
        assert!(decoder.is_empty());
    }
}

#[test]
fn non_canonical_compact_sizes_rejected() {
    let cases: &[&[u8]] = &[
        &[0xfd, 0xfc, 0x00],
        &[0xfe, 0xff, 0xff, 0x00, 0x00],
        &[0xff, 0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00],
    ];
    for bytes in cases {
        let mut decoder = Decoder::new(bytes);
        assert_eq!(
            decoder.read_compact_size(),
            Err(DecodeError::NonCanonicalCompactSize)
        );
    }
}

#[test]
fn random_compact_sizes_round_trip() {
    let mut rng = Lcg::new(0x1234_5678);
    for _ in 0..2_000 {
        let shift = rng.gen_range(64) as u32;
        let value = rng.next_u64() >> shift;
        let mut encoder = Encoder::new();
        encoder.write_compact_size(value);
        let bytes = encoder.into_inner();

        let mut decoder = Decoder::new(&bytes);
        assert_eq!(decoder.read_compact_size().unwrap(), value);
        assert!(decoder.is_empty());
    }
}

#[test]
fn random_transactions_round_trip() {
    let mut rng = Lcg::new(0xdead_beef);
    for _ in 0..500 {
        let tx = random_transaction(&mut rng);
        let bytes = tx.to_bytes();
        let decoded = Transaction::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded.to_bytes(), bytes);
    }
}

#[test]
fn random_transactions_reject_truncation() {
    let mut rng = Lcg::new(0x0bad_cafe);
    for _ in 0..100 {
        let tx = random_transaction(&mut rng);
        let bytes = tx.to_bytes();
        let cut = rng.gen_range(bytes.len() - 1) + 1;
        assert!(Transaction::from_bytes(&bytes[..cut]).is_err());
    }
}

#[test]
fn random_instant_locks_round_trip() {
    let mut rng = Lcg::new(0x5151_5151);
    for _ in 0..200 {
        let lock = InstantLock {
            version: 1,
            inputs: (0..rng.gen_range(5) + 1)
                .map(|_| OutPoint::new(random_hash(&mut rng), rng.next_u32()))
                .collect(),
            txid: random_hash(&mut rng),
            cycle_hash: random_hash(&mut rng),
            signature: fill_bytes(&mut rng),
        };
        assert_eq!(decode::<InstantLock>(&encode(&lock)).unwrap(), lock);
    }
}
