//! Records produced by network backends and the aggregate run result.
//!
//! Records are write-once: a backend mints one per created artifact and the
//! orchestrator only ever backfills a blank alias before storing it.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifiers needed to reference a created account.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountRecord {
    pub alias: String,
    pub account_id: String,
    pub public_key: String,
    pub memo: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Metadata about a created consensus topic.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopicRecord {
    pub alias: String,
    pub topic_id: String,
    pub memo: String,
    pub sequence: u64,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Metadata about a minted token.
///
/// `treasury_account_id` is always a concrete account id, never an alias.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenRecord {
    pub alias: String,
    pub token_id: String,
    pub name: String,
    pub symbol: String,
    pub memo: String,
    pub treasury_account_id: String,
    pub decimals: u32,
    pub initial_supply: u64,
    pub max_supply: i64,
    pub supply_type: String,
    pub token_type: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Artifacts created during one bootstrap run, in creation order per kind.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BootstrapResult {
    pub network: String,
    pub accounts: Vec<AccountRecord>,
    pub topics: Vec<TopicRecord>,
    pub tokens: Vec<TokenRecord>,
}

impl BootstrapResult {
    /// Total number of records across all kinds.
    pub fn len(&self) -> usize {
        self.accounts.len() + self.topics.len() + self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
