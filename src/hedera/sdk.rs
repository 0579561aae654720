//! Transport backed by the Hedera SDK.
//!
//! The SDK is async; every call here blocks on a runtime owned by the
//! transport so the rest of the crate stays synchronous.
use super::config::HederaConfig;
use super::ledger::{
    AccountCreate, EntityId, LedgerTransaction, LedgerTransport, PublicKey, SupplyType,
    TokenCreate, TokenType, TopicCreate, TransactionId, TransactionReceipt, TransactionRecord,
    STATUS_SUCCESS,
};
use super::HederaError;
use chrono::{DateTime, Utc};
use hedera::{
    AccountCreateTransaction, AccountId, Client, Hbar, PrivateKey, Status,
    TokenCreateTransaction, TokenSupplyType, TopicCreateTransaction, TransactionReceiptQuery,
    TransactionRecordQuery,
};
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use tokio::runtime::Runtime;

pub struct SdkTransport {
    runtime: Runtime,
    client: Mutex<Option<Client>>,
}

impl SdkTransport {
    /// Build a client for `network` paying with the configured operator.
    ///
    /// A non-blank mirror URL replaces the network's default mirror nodes.
    pub fn connect(config: &HederaConfig, network: &str) -> Result<Self, HederaError> {
        let operator_id: AccountId = config
            .operator_account_id
            .trim()
            .parse()
            .map_err(|err| {
                HederaError::validation(format!("parse operator account id: {err}"))
            })?;
        let operator_key = parse_operator_key(&config.operator_private_key)?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|err| HederaError::backend(format!("start async runtime: {err}")))?;

        let client = {
            let _guard = runtime.enter();
            let client = match network {
                "mainnet" => Client::for_mainnet(),
                "previewnet" => Client::for_previewnet(),
                _ => Client::for_testnet(),
            };
            let mirror = config.mirror_network_url.trim();
            if !mirror.is_empty() {
                client.set_mirror_network([mirror.to_string()]);
            }
            client.set_operator(operator_id, operator_key);
            client
        };
        tracing::debug!(
            network,
            operator = %operator_id,
            mirror = %config.mirror_network_url,
            "hedera client ready"
        );
        Ok(Self {
            runtime,
            client: Mutex::new(Some(client)),
        })
    }

    fn client(&self) -> Result<Client, HederaError> {
        self.client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| HederaError::backend("hedera client is closed"))
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

impl LedgerTransport for SdkTransport {
    fn submit(&self, transaction: &LedgerTransaction) -> Result<TransactionId, HederaError> {
        let client = self.client()?;
        let response = match transaction {
            LedgerTransaction::AccountCreate(body) => {
                let mut tx = account_transaction(body)?;
                self.block_on(tx.execute(&client))
            }
            LedgerTransaction::TopicCreate(body) => {
                let mut tx = topic_transaction(body)?;
                self.block_on(tx.execute(&client))
            }
            LedgerTransaction::TokenCreate(body) => {
                let mut tx = token_transaction(body)?;
                self.block_on(tx.execute(&client))
            }
        }
        .map_err(sdk_error)?;
        Ok(TransactionId(response.transaction_id.to_string()))
    }

    fn receipt(&self, id: &TransactionId) -> Result<TransactionReceipt, HederaError> {
        let client = self.client()?;
        let transaction_id = sdk_transaction_id(id)?;
        let receipt = self
            .block_on(
                TransactionReceiptQuery::new()
                    .transaction_id(transaction_id)
                    .execute(&client),
            )
            .map_err(sdk_error)?;
        Ok(TransactionReceipt {
            status: status_name(receipt.status),
            account_id: receipt.account_id.map(|id| EntityId {
                shard: id.shard,
                realm: id.realm,
                num: id.num,
            }),
            topic_id: receipt.topic_id.map(|id| EntityId {
                shard: id.shard,
                realm: id.realm,
                num: id.num,
            }),
            token_id: receipt.token_id.map(|id| EntityId {
                shard: id.shard,
                realm: id.realm,
                num: id.num,
            }),
            topic_sequence_number: receipt.topic_sequence_number,
        })
    }

    fn record(&self, id: &TransactionId) -> Result<TransactionRecord, HederaError> {
        let client = self.client()?;
        let transaction_id = sdk_transaction_id(id)?;
        let record = self
            .block_on(
                TransactionRecordQuery::new()
                    .transaction_id(transaction_id)
                    .execute(&client),
            )
            .map_err(sdk_error)?;
        let consensus = record.consensus_timestamp;
        Ok(TransactionRecord {
            consensus_timestamp: consensus_time(
                consensus.unix_timestamp(),
                consensus.nanosecond(),
            )?,
        })
    }

    fn close(&self) -> Result<(), HederaError> {
        let client = self
            .client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(client) = client {
            let _guard = self.runtime.enter();
            drop(client);
        }
        Ok(())
    }
}

/// Parse the operator's private key from DER or raw hex.
///
/// DER carries the algorithm, so both ED25519 and ECDSA secp256k1 keys are
/// accepted in that form; bare 32-byte hex is read as ED25519.
pub fn parse_operator_key(value: &str) -> Result<PrivateKey, HederaError> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    digits
        .parse()
        .map_err(|err| HederaError::validation(format!("parse operator private key: {err}")))
}

fn account_transaction(body: &AccountCreate) -> Result<AccountCreateTransaction, HederaError> {
    let mut tx = AccountCreateTransaction::new();
    if let Some(key) = &body.key {
        tx.key(sdk_key(key)?);
    }
    if body.initial_balance_tinybar > 0 {
        tx.initial_balance(Hbar::from_tinybars(body.initial_balance_tinybar));
    }
    if !body.memo.is_empty() {
        tx.account_memo(body.memo.clone());
    }
    Ok(tx)
}

fn topic_transaction(body: &TopicCreate) -> Result<TopicCreateTransaction, HederaError> {
    let mut tx = TopicCreateTransaction::new();
    if !body.memo.is_empty() {
        tx.topic_memo(body.memo.clone());
    }
    if let Some(key) = &body.admin_key {
        tx.admin_key(sdk_key(key)?);
    }
    if let Some(key) = &body.submit_key {
        tx.submit_key(sdk_key(key)?);
    }
    Ok(tx)
}

fn token_transaction(body: &TokenCreate) -> Result<TokenCreateTransaction, HederaError> {
    let treasury: AccountId = body
        .treasury
        .to_string()
        .parse()
        .map_err(|err| HederaError::validation(format!("parse treasury account id: {err}")))?;
    let mut tx = TokenCreateTransaction::new();
    tx.name(body.name.clone())
        .symbol(body.symbol.clone())
        .treasury_account_id(treasury)
        .decimals(body.decimals)
        .initial_supply(body.initial_supply)
        .token_supply_type(match body.supply_type {
            SupplyType::Infinite => TokenSupplyType::Infinite,
            SupplyType::Finite => TokenSupplyType::Finite,
        })
        .token_type(match body.token_type {
            TokenType::FungibleCommon => hedera::TokenType::FungibleCommon,
            TokenType::NonFungibleUnique => hedera::TokenType::NonFungibleUnique,
        });
    if !body.memo.is_empty() {
        tx.token_memo(body.memo.clone());
    }
    if let Some(max) = body.max_supply {
        let max = u64::try_from(max).map_err(|_| {
            HederaError::validation(format!("max supply must not be negative, got {max}"))
        })?;
        tx.max_supply(max);
    }
    if let Some(key) = &body.admin_key {
        tx.admin_key(sdk_key(key)?);
    }
    if let Some(key) = &body.supply_key {
        tx.supply_key(sdk_key(key)?);
    }
    if let Some(key) = &body.kyc_key {
        tx.kyc_key(sdk_key(key)?);
    }
    if let Some(key) = &body.freeze_key {
        tx.freeze_key(sdk_key(key)?);
    }
    if let Some(key) = &body.wipe_key {
        tx.wipe_key(sdk_key(key)?);
    }
    if let Some(key) = &body.pause_key {
        tx.pause_key(sdk_key(key)?);
    }
    if let Some(freeze) = body.freeze_default {
        tx.freeze_default(freeze);
    }
    Ok(tx)
}

fn sdk_key(key: &PublicKey) -> Result<hedera::PublicKey, HederaError> {
    match key {
        PublicKey::Ed25519(bytes) => hedera::PublicKey::from_bytes_ed25519(bytes),
        PublicKey::EcdsaSecp256k1(bytes) => hedera::PublicKey::from_bytes_ecdsa(bytes),
    }
    .map_err(|err| HederaError::validation(format!("parse public key: {err}")))
}

fn sdk_transaction_id(id: &TransactionId) -> Result<hedera::TransactionId, HederaError> {
    id.0.parse()
        .map_err(|err| HederaError::backend(format!("parse transaction id {id}: {err}")))
}

fn status_name(status: Status) -> String {
    if status == Status::Success {
        STATUS_SUCCESS.to_string()
    } else {
        format!("{status:?}")
    }
}

fn consensus_time(seconds: i64, nanos: u32) -> Result<DateTime<Utc>, HederaError> {
    DateTime::from_timestamp(seconds, nanos).ok_or_else(|| {
        HederaError::backend(format!("consensus timestamp {seconds}.{nanos} is out of range"))
    })
}

fn sdk_error(err: hedera::Error) -> HederaError {
    HederaError::backend(err.to_string())
}
