//! Bootstrap orchestration.
//!
//! Artifacts are created in a fixed order: every account, then every topic,
//! then every token. Tokens may name a treasury account by alias; only
//! accounts created earlier in the same run are visible to that lookup. The
//! run is fail-fast: the first error aborts it and artifacts already created
//! stay on the network.
use super::{
    AccountRecord, ArtifactKind, BootstrapResult, BootstrapSpec, HederaError, Network, RunContext,
    TokenSpec,
};
use std::collections::HashMap;
use std::time::Instant;

/// Drives artifact creation against a network backend.
pub struct Bootstrapper<'a> {
    network: &'a dyn Network,
}

impl<'a> Bootstrapper<'a> {
    pub fn new(network: &'a dyn Network) -> Self {
        Self { network }
    }

    /// Provision everything described by `spec` and collect the records.
    pub fn execute(
        &self,
        ctx: &RunContext,
        spec: &BootstrapSpec,
    ) -> Result<BootstrapResult, HederaError> {
        let started = Instant::now();
        let network = if spec.network.is_empty() {
            self.network.network_name()
        } else {
            spec.network.as_str()
        };
        let mut result = BootstrapResult {
            network: network.to_string(),
            ..BootstrapResult::default()
        };

        // Later duplicates overwrite earlier entries.
        let mut account_by_alias: HashMap<String, AccountRecord> = HashMap::new();
        for account in &spec.accounts {
            let mut record = ctx
                .check()
                .and_then(|()| self.network.create_account(ctx, account))
                .map_err(|err| HederaError::creating(ArtifactKind::Account, &account.alias, err))?;
            backfill_alias(&mut record.alias, &account.alias);
            log_created(ArtifactKind::Account, &record.alias, &record.account_id);
            if !record.alias.is_empty() {
                account_by_alias.insert(record.alias.clone(), record.clone());
            }
            result.accounts.push(record);
        }

        for topic in &spec.topics {
            let mut record = ctx
                .check()
                .and_then(|()| self.network.create_topic(ctx, topic))
                .map_err(|err| HederaError::creating(ArtifactKind::Topic, &topic.alias, err))?;
            backfill_alias(&mut record.alias, &topic.alias);
            log_created(ArtifactKind::Topic, &record.alias, &record.topic_id);
            result.topics.push(record);
        }

        for token in &spec.tokens {
            let resolved = resolve_treasury(token, &account_by_alias)?;
            let mut record = ctx
                .check()
                .and_then(|()| self.network.create_token(ctx, &resolved))
                .map_err(|err| HederaError::creating(ArtifactKind::Token, &token.alias, err))?;
            backfill_alias(&mut record.alias, &token.alias);
            log_created(ArtifactKind::Token, &record.alias, &record.token_id);
            result.tokens.push(record);
        }

        tracing::info!(
            network = %result.network,
            accounts = result.accounts.len(),
            topics = result.topics.len(),
            tokens = result.tokens.len(),
            artifacts = result.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "bootstrap complete"
        );
        Ok(result)
    }
}

/// Produce a copy of `token` whose treasury is a concrete account id.
///
/// A direct id is used as-is. Otherwise a non-blank alias must match an
/// account created earlier in this run.
fn resolve_treasury(
    token: &TokenSpec,
    account_by_alias: &HashMap<String, AccountRecord>,
) -> Result<TokenSpec, HederaError> {
    let mut resolved = token.clone();
    if resolved.treasury_account_id.is_empty() && !resolved.treasury_alias.is_empty() {
        let account = account_by_alias
            .get(&resolved.treasury_alias)
            .ok_or_else(|| HederaError::UnresolvedAlias {
                alias: resolved.treasury_alias.clone(),
            })?;
        resolved.treasury_account_id = account.account_id.clone();
    }
    Ok(resolved)
}

fn backfill_alias(record_alias: &mut String, spec_alias: &str) {
    if record_alias.is_empty() {
        *record_alias = spec_alias.to_string();
    }
}

fn log_created(kind: ArtifactKind, alias: &str, id: &str) {
    tracing::info!(kind = kind.as_str(), alias, id, "artifact created");
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
