use super::*;
use crate::hedera::ledger::{TransactionId, TransactionRecord};
use chrono::TimeZone;
use std::sync::Mutex;

const ED25519_RAW: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

#[derive(Default)]
struct FakeTransport {
    submitted: Mutex<Vec<LedgerTransaction>>,
    status: Option<String>,
    omit_ids: bool,
    closed: AtomicBool,
}

impl FakeTransport {
    fn submitted(&self) -> Vec<LedgerTransaction> {
        self.submitted.lock().unwrap().clone()
    }
}

impl LedgerTransport for FakeTransport {
    fn submit(&self, transaction: &LedgerTransaction) -> Result<TransactionId, HederaError> {
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(transaction.clone());
        Ok(TransactionId(format!("0.0.2@1700000000.{:09}", submitted.len())))
    }

    fn receipt(&self, _id: &TransactionId) -> Result<TransactionReceipt, HederaError> {
        let num = 5000 + self.submitted.lock().unwrap().len() as u64;
        let id = (!self.omit_ids).then_some(EntityId { shard: 0, realm: 0, num });
        Ok(TransactionReceipt {
            status: self
                .status
                .clone()
                .unwrap_or_else(|| STATUS_SUCCESS.to_string()),
            account_id: id,
            topic_id: id,
            token_id: id,
            topic_sequence_number: 0,
        })
    }

    fn record(&self, _id: &TransactionId) -> Result<TransactionRecord, HederaError> {
        Ok(TransactionRecord {
            consensus_timestamp: Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap(),
        })
    }

    fn close(&self) -> Result<(), HederaError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

fn token_spec() -> TokenSpec {
    TokenSpec {
        alias: "points".to_string(),
        name: "Points".to_string(),
        symbol: "PTS".to_string(),
        treasury_account_id: "0.0.5001".to_string(),
        initial_supply: 100,
        max_supply: 1000,
        supply_type: "finite".to_string(),
        supply_key: ED25519_RAW.to_string(),
        ..TokenSpec::default()
    }
}

#[test]
fn account_create_maps_receipt_and_consensus_time() {
    let network = LiveNetwork::new(FakeTransport::default(), "").expect("network");
    assert_eq!(network.network_name(), "testnet");
    let record = network
        .create_account(
            &RunContext::background(),
            &AccountSpec {
                alias: "treasury".to_string(),
                public_key: ED25519_RAW.to_string(),
                initial_balance_tinybar: 10,
                tags: vec!["ops".to_string()],
                ..AccountSpec::default()
            },
        )
        .expect("create account");
    assert_eq!(record.account_id, "0.0.5001");
    assert_eq!(record.public_key, ED25519_RAW);
    assert_eq!(record.tags, vec!["ops".to_string()]);
    assert_eq!(
        record.created_at,
        Some(Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap())
    );

    let submitted = network.transport.submitted();
    let LedgerTransaction::AccountCreate(tx) = &submitted[0] else {
        panic!("expected account create, got {submitted:?}");
    };
    assert!(matches!(tx.key, Some(PublicKey::Ed25519(_))));
    assert_eq!(tx.initial_balance_tinybar, 10);
}

#[test]
fn token_create_translates_enums_and_optional_fields() {
    let network = LiveNetwork::new(FakeTransport::default(), "mainnet").expect("network");
    let record = network
        .create_token(&RunContext::background(), &token_spec())
        .expect("create token");
    assert_eq!(record.token_id, "0.0.5001");
    assert_eq!(record.supply_type, "finite");

    let submitted = network.transport.submitted();
    let LedgerTransaction::TokenCreate(tx) = &submitted[0] else {
        panic!("expected token create, got {submitted:?}");
    };
    assert_eq!(tx.treasury.to_string(), "0.0.5001");
    assert_eq!(tx.supply_type, SupplyType::Finite);
    assert_eq!(tx.token_type, TokenType::FungibleCommon);
    assert_eq!(tx.max_supply, Some(1000));
    assert!(tx.supply_key.is_some());
    assert!(tx.admin_key.is_none());
}

#[test]
fn invalid_token_fields_fail_before_submission() {
    let network = LiveNetwork::new(FakeTransport::default(), "testnet").expect("network");
    let ctx = RunContext::background();
    let cases = [
        TokenSpec {
            treasury_account_id: " ".to_string(),
            ..token_spec()
        },
        TokenSpec {
            treasury_account_id: "treasury".to_string(),
            ..token_spec()
        },
        TokenSpec {
            supply_type: "capped".to_string(),
            ..token_spec()
        },
        TokenSpec {
            token_type: "nft".to_string(),
            ..token_spec()
        },
        TokenSpec {
            kyc_key: "zz".to_string(),
            ..token_spec()
        },
    ];
    for spec in cases {
        let err = network.create_token(&ctx, &spec).expect_err("invalid token");
        assert!(matches!(err, HederaError::Validation(_)), "{err}");
    }
    assert!(network.transport.submitted().is_empty());
}

#[test]
fn invalid_topic_key_names_the_field() {
    let network = LiveNetwork::new(FakeTransport::default(), "testnet").expect("network");
    let err = network
        .create_topic(
            &RunContext::background(),
            &TopicSpec {
                alias: "events".to_string(),
                submit_key: "0x1234".to_string(),
                ..TopicSpec::default()
            },
        )
        .expect_err("bad key");
    assert!(err.to_string().contains("parse submit key"), "{err}");
    assert!(network.transport.submitted().is_empty());
}

#[test]
fn non_success_receipt_is_a_backend_error() {
    let transport = FakeTransport {
        status: Some("INVALID_SIGNATURE".to_string()),
        ..FakeTransport::default()
    };
    let network = LiveNetwork::new(transport, "testnet").expect("network");
    let err = network
        .create_topic(&RunContext::background(), &TopicSpec::default())
        .expect_err("rejected");
    assert!(matches!(err, HederaError::Backend(_)));
    assert!(err.to_string().contains("INVALID_SIGNATURE"), "{err}");
}

#[test]
fn receipt_without_entity_id_is_a_backend_error() {
    let transport = FakeTransport {
        omit_ids: true,
        ..FakeTransport::default()
    };
    let network = LiveNetwork::new(transport, "testnet").expect("network");
    let err = network
        .create_account(&RunContext::background(), &AccountSpec::default())
        .expect_err("no id");
    assert_eq!(err.to_string(), "backend error: receipt carries no account id");
}

#[test]
fn release_closes_transport_and_blocks_later_calls() {
    let network = LiveNetwork::new(FakeTransport::default(), "testnet").expect("network");
    network.release().expect("release");
    network.release().expect("second release is a no-op");
    assert!(network.transport.closed.load(Ordering::SeqCst));
    let err = network
        .create_account(&RunContext::background(), &AccountSpec::default())
        .expect_err("released");
    assert!(matches!(err, HederaError::Backend(_)));
    assert!(network.transport.submitted().is_empty());
}

#[test]
fn cancelled_context_stops_before_submission() {
    let network = LiveNetwork::new(FakeTransport::default(), "testnet").expect("network");
    let ctx = RunContext::background();
    ctx.cancel_handle().cancel();
    let err = network
        .create_account(&ctx, &AccountSpec::default())
        .expect_err("cancelled");
    assert!(matches!(err, HederaError::Cancelled));
    assert!(network.transport.submitted().is_empty());
}

#[test]
fn unknown_network_is_rejected() {
    assert!(LiveNetwork::new(FakeTransport::default(), "localnet").is_err());
}

#[test]
fn open_requires_valid_operator_credentials() {
    let config = HederaConfig::default();
    let err = LiveNetwork::open(&config).err().expect("no operator");
    assert!(err.to_string().contains("HEDERA_OPERATOR_ID"));

    let config = HederaConfig {
        operator_account_id: "treasury".to_string(),
        operator_private_key: ED25519_RAW.to_string(),
        ..HederaConfig::default()
    };
    let err = LiveNetwork::open(&config).err().expect("bad operator id");
    assert!(err.to_string().contains("parse operator account id"), "{err}");
}

#[test]
fn open_connects_to_the_canonical_network() {
    let config = HederaConfig {
        network: " PreviewNet ".to_string(),
        operator_account_id: "0.0.2".to_string(),
        operator_private_key: ED25519_RAW.to_string(),
        ..HederaConfig::default()
    };
    let network = LiveNetwork::open(&config).expect("open");
    assert_eq!(network.network_name(), "previewnet");
    network.release().expect("release");
}
