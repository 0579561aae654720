//! Capability interface implemented by every network backend.
use super::{
    AccountRecord, AccountSpec, HederaError, RunContext, TokenRecord, TokenSpec, TopicRecord,
    TopicSpec,
};

/// The subset of ledger operations the bootstrap workflow needs.
///
/// Implementations must be safe to share across threads. `create_token`
/// rejects a blank `treasury_account_id`: the orchestrator resolves aliases
/// first, and backends enforce it again at their own boundary.
pub trait Network: Send + Sync {
    /// Network name used when the spec does not name one.
    fn network_name(&self) -> &str;

    fn create_account(
        &self,
        ctx: &RunContext,
        spec: &AccountSpec,
    ) -> Result<AccountRecord, HederaError>;

    fn create_topic(&self, ctx: &RunContext, spec: &TopicSpec) -> Result<TopicRecord, HederaError>;

    fn create_token(&self, ctx: &RunContext, spec: &TokenSpec) -> Result<TokenRecord, HederaError>;

    /// Free connections held by the backend. Callers release exactly once,
    /// after the last create call.
    fn release(&self) -> Result<(), HederaError> {
        Ok(())
    }
}

/// Shared treasury precondition for `create_token`.
pub(crate) fn require_treasury(spec: &TokenSpec) -> Result<(), HederaError> {
    if spec.treasury_account_id.trim().is_empty() {
        return Err(HederaError::validation(format!(
            "treasury account id is required for token {:?}",
            spec.alias
        )));
    }
    Ok(())
}
