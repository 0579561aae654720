//! Network backend that provisions artifacts on a real ledger.
use super::config::canonical_network;
use super::ledger::{
    AccountCreate, EntityId, LedgerTransaction, LedgerTransport, PublicKey, SupplyType,
    TokenCreate, TokenType, TopicCreate, TransactionReceipt, STATUS_SUCCESS,
};
use super::network::require_treasury;
use super::sdk::SdkTransport;
use super::{
    AccountRecord, AccountSpec, HederaConfig, HederaError, Network, RunContext, TokenRecord,
    TokenSpec, TopicRecord, TopicSpec,
};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Submits typed transactions through a [`LedgerTransport`] and waits for
/// consensus before reporting a record.
pub struct LiveNetwork<T: LedgerTransport> {
    transport: T,
    network_name: String,
    released: AtomicBool,
}

impl LiveNetwork<SdkTransport> {
    /// Connect to the network named in `config` as the configured operator.
    pub fn open(config: &HederaConfig) -> Result<Self, HederaError> {
        config.validate()?;
        if !config.has_operator() {
            return Err(HederaError::validation(
                "live mode requires HEDERA_OPERATOR_ID and HEDERA_OPERATOR_KEY",
            ));
        }
        let network = canonical_network(&config.network)?;
        let transport = SdkTransport::connect(config, network)?;
        Self::new(transport, network)
    }
}

impl<T: LedgerTransport> LiveNetwork<T> {
    pub fn new(transport: T, network: &str) -> Result<Self, HederaError> {
        Ok(Self {
            transport,
            network_name: canonical_network(network)?.to_string(),
            released: AtomicBool::new(false),
        })
    }

    /// Submit, wait for the receipt, then fetch the consensus timestamp.
    fn execute(
        &self,
        ctx: &RunContext,
        transaction: LedgerTransaction,
    ) -> Result<(TransactionReceipt, DateTime<Utc>), HederaError> {
        if self.released.load(Ordering::SeqCst) {
            return Err(HederaError::backend("network backend already released"));
        }
        let label = transaction.label();
        let started = Instant::now();
        ctx.check()?;
        let id = self
            .transport
            .submit(&transaction)
            .map_err(|err| step_failed(&format!("execute {label}"), err))?;
        ctx.check()?;
        let receipt = self
            .transport
            .receipt(&id)
            .map_err(|err| step_failed(&format!("fetch {label} receipt"), err))?;
        if receipt.status != STATUS_SUCCESS {
            return Err(HederaError::backend(format!(
                "{label} {id} finished with status {}",
                receipt.status
            )));
        }
        ctx.check()?;
        let record = self
            .transport
            .record(&id)
            .map_err(|err| step_failed(&format!("fetch {label} record"), err))?;
        tracing::info!(
            transaction = %id,
            kind = label,
            elapsed_ms = started.elapsed().as_millis(),
            remaining_ms = ctx.remaining().map(|left| left.as_millis()),
            "transaction reached consensus"
        );
        Ok((receipt, record.consensus_timestamp))
    }
}

impl<T: LedgerTransport> Network for LiveNetwork<T> {
    fn network_name(&self) -> &str {
        &self.network_name
    }

    fn create_account(
        &self,
        ctx: &RunContext,
        spec: &AccountSpec,
    ) -> Result<AccountRecord, HederaError> {
        let transaction = LedgerTransaction::AccountCreate(AccountCreate {
            key: PublicKey::parse_optional("public key", &spec.public_key)?,
            initial_balance_tinybar: spec.initial_balance_tinybar.max(0),
            memo: spec.memo.clone(),
        });
        let (receipt, consensus) = self.execute(ctx, transaction)?;
        let account_id = created_id(receipt.account_id, "account")?;
        Ok(AccountRecord {
            alias: spec.alias.clone(),
            account_id,
            public_key: spec.public_key.clone(),
            memo: spec.memo.clone(),
            tags: spec.tags.clone(),
            created_at: Some(consensus),
        })
    }

    fn create_topic(&self, ctx: &RunContext, spec: &TopicSpec) -> Result<TopicRecord, HederaError> {
        let transaction = LedgerTransaction::TopicCreate(TopicCreate {
            memo: spec.memo.clone(),
            admin_key: PublicKey::parse_optional("admin key", &spec.admin_key)?,
            submit_key: PublicKey::parse_optional("submit key", &spec.submit_key)?,
        });
        let (receipt, consensus) = self.execute(ctx, transaction)?;
        let topic_id = created_id(receipt.topic_id, "topic")?;
        Ok(TopicRecord {
            alias: spec.alias.clone(),
            topic_id,
            memo: spec.memo.clone(),
            sequence: receipt.topic_sequence_number,
            tags: spec.tags.clone(),
            created_at: Some(consensus),
        })
    }

    fn create_token(&self, ctx: &RunContext, spec: &TokenSpec) -> Result<TokenRecord, HederaError> {
        require_treasury(spec)?;
        let transaction = LedgerTransaction::TokenCreate(token_transaction(spec)?);
        let (receipt, consensus) = self.execute(ctx, transaction)?;
        let token_id = created_id(receipt.token_id, "token")?;
        Ok(TokenRecord {
            alias: spec.alias.clone(),
            token_id,
            name: spec.name.clone(),
            symbol: spec.symbol.clone(),
            memo: spec.memo.clone(),
            treasury_account_id: spec.treasury_account_id.trim().to_string(),
            decimals: spec.decimals,
            initial_supply: spec.initial_supply,
            max_supply: spec.max_supply,
            supply_type: spec.supply_type.clone(),
            token_type: spec.token_type.clone(),
            tags: spec.tags.clone(),
            created_at: Some(consensus),
        })
    }

    fn release(&self) -> Result<(), HederaError> {
        if self.released.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.transport.close()
    }
}

fn token_transaction(spec: &TokenSpec) -> Result<TokenCreate, HederaError> {
    Ok(TokenCreate {
        name: spec.name.clone(),
        symbol: spec.symbol.clone(),
        memo: spec.memo.clone(),
        treasury: EntityId::parse("treasury account id", &spec.treasury_account_id)?,
        decimals: spec.decimals,
        initial_supply: spec.initial_supply,
        max_supply: (spec.max_supply != 0).then_some(spec.max_supply),
        supply_type: SupplyType::parse(&spec.supply_type)?,
        token_type: TokenType::parse(&spec.token_type)?,
        admin_key: PublicKey::parse_optional("admin key", &spec.admin_key)?,
        supply_key: PublicKey::parse_optional("supply key", &spec.supply_key)?,
        kyc_key: PublicKey::parse_optional("kyc key", &spec.kyc_key)?,
        freeze_key: PublicKey::parse_optional("freeze key", &spec.freeze_key)?,
        wipe_key: PublicKey::parse_optional("wipe key", &spec.wipe_key)?,
        pause_key: PublicKey::parse_optional("pause key", &spec.pause_key)?,
        freeze_default: spec.freeze_default,
    })
}

fn created_id(id: Option<EntityId>, kind: &str) -> Result<String, HederaError> {
    id.map(|id| id.to_string())
        .ok_or_else(|| HederaError::backend(format!("receipt carries no {kind} id")))
}

/// Prefix backend failures with the step that produced them.
fn step_failed(step: &str, err: HederaError) -> HederaError {
    match err {
        HederaError::Backend(message) => HederaError::backend(format!("{step}: {message}")),
        other => other,
    }
}

#[cfg(test)]
#[path = "live_tests.rs"]
mod tests;
