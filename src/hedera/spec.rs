//! Declarative bootstrap specification types.
//!
//! A spec lists the accounts, topics, and tokens one run should create. It is
//! read-only input: the orchestrator resolves aliases into its own copies and
//! never writes back into the spec.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Artifacts that one bootstrap run should create.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BootstrapSpec {
    pub network: String,
    pub ledger: String,
    pub accounts: Vec<AccountSpec>,
    pub topics: Vec<TopicSpec>,
    pub tokens: Vec<TokenSpec>,
}

/// How an account should be provisioned.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountSpec {
    pub alias: String,
    pub memo: String,
    pub public_key: String,
    pub initial_balance_tinybar: i64,
    pub tags: Vec<String>,
}

/// A consensus topic to create.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopicSpec {
    pub alias: String,
    pub memo: String,
    pub admin_key: String,
    pub submit_key: String,
    pub tags: Vec<String>,
}

/// A token to mint.
///
/// `treasury_account_id` wins over `treasury_alias` when both are set; the
/// alias is resolved against accounts created earlier in the same run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenSpec {
    pub alias: String,
    pub name: String,
    pub symbol: String,
    pub memo: String,
    pub treasury_alias: String,
    pub treasury_account_id: String,
    pub decimals: u32,
    pub initial_supply: u64,
    pub max_supply: i64,
    pub supply_type: String,
    pub token_type: String,
    pub admin_key: String,
    pub supply_key: String,
    pub kyc_key: String,
    pub freeze_key: String,
    pub wipe_key: String,
    pub pause_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeze_default: Option<bool>,
    pub tags: Vec<String>,
}

impl BootstrapSpec {
    /// Parse a spec from JSON text, trimming the global network and ledger.
    pub fn from_json(text: &str) -> Result<Self> {
        let mut spec: BootstrapSpec =
            serde_json::from_str(text).context("decode bootstrap spec")?;
        spec.network = spec.network.trim().to_string();
        spec.ledger = spec.ledger.trim().to_string();
        Ok(spec)
    }

    /// Apply caller-supplied overrides; blank overrides keep the spec value.
    pub fn with_overrides(mut self, network: Option<&str>, ledger: Option<&str>) -> Self {
        if let Some(network) = non_blank(network) {
            self.network = network.to_string();
        }
        if let Some(ledger) = non_blank(ledger) {
            self.ledger = ledger.to_string();
        }
        self
    }
}

/// Read a bootstrap spec from disk.
pub fn load_bootstrap_spec(path: &Path) -> Result<BootstrapSpec> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read spec {}", path.display()))?;
    BootstrapSpec::from_json(&text).with_context(|| format!("load spec {}", path.display()))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
