//! Deterministic in-memory network.
//!
//! Identifiers come from three per-kind counters and timestamps from an
//! injectable clock. Counters and the clock read share one lock, so concurrent
//! callers never observe the same identifier and ids grow monotonically per
//! kind. Each instance owns its state; two simulators never interfere.
use super::network::require_treasury;
use super::{
    AccountRecord, AccountSpec, HederaError, Network, RunContext, TokenRecord, TokenSpec,
    TopicRecord, TopicSpec,
};
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Default seed for account numbers.
pub const DEFAULT_ACCOUNT_SEED: u64 = 1000;
/// Default seed for topic numbers.
pub const DEFAULT_TOPIC_SEED: u64 = 2000;
/// Default seed for token numbers.
pub const DEFAULT_TOKEN_SEED: u64 = 3000;

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

struct MockState {
    next_account: u64,
    next_topic: u64,
    next_token: u64,
    now: Clock,
}

impl MockState {
    fn allocate(counter: &mut u64, kind: &str) -> Result<String, HederaError> {
        let id = *counter;
        *counter = id
            .checked_add(1)
            .ok_or_else(|| HederaError::backend(format!("simulated {kind} ids exhausted")))?;
        Ok(format!("0.0.{id}"))
    }
}

/// Simulated network used for local runs and tests.
pub struct MockNetwork {
    network_name: String,
    state: Mutex<MockState>,
}

impl MockNetwork {
    /// Build a simulator seeded at 1000/2000/3000 with a wall clock.
    pub fn new(network_name: impl Into<String>) -> Self {
        Self {
            network_name: network_name.into(),
            state: Mutex::new(MockState {
                next_account: DEFAULT_ACCOUNT_SEED,
                next_topic: DEFAULT_TOPIC_SEED,
                next_token: DEFAULT_TOKEN_SEED,
                now: Box::new(Utc::now),
            }),
        }
    }

    /// Reseed the per-kind counters.
    pub fn with_starting_ids(self, account: u64, topic: u64, token: u64) -> Self {
        {
            let mut state = self.lock();
            state.next_account = account;
            state.next_topic = topic;
            state.next_token = token;
        }
        self
    }

    /// Replace the clock used for `created_at`.
    pub fn with_clock<F>(self, now: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.lock().now = Box::new(now);
        self
    }

    // Counters stay consistent across a panic in another holder: every
    // mutation is a single increment.
    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Network for MockNetwork {
    fn network_name(&self) -> &str {
        &self.network_name
    }

    fn create_account(
        &self,
        ctx: &RunContext,
        spec: &AccountSpec,
    ) -> Result<AccountRecord, HederaError> {
        ctx.check()?;
        let mut state = self.lock();
        let account_id = MockState::allocate(&mut state.next_account, "account")?;
        Ok(AccountRecord {
            alias: spec.alias.clone(),
            account_id,
            public_key: spec.public_key.clone(),
            memo: spec.memo.clone(),
            tags: spec.tags.clone(),
            created_at: Some((state.now)()),
        })
    }

    fn create_topic(&self, ctx: &RunContext, spec: &TopicSpec) -> Result<TopicRecord, HederaError> {
        ctx.check()?;
        let mut state = self.lock();
        let topic_id = MockState::allocate(&mut state.next_topic, "topic")?;
        Ok(TopicRecord {
            alias: spec.alias.clone(),
            topic_id,
            memo: spec.memo.clone(),
            sequence: 0,
            tags: spec.tags.clone(),
            created_at: Some((state.now)()),
        })
    }

    fn create_token(&self, ctx: &RunContext, spec: &TokenSpec) -> Result<TokenRecord, HederaError> {
        require_treasury(spec)?;
        ctx.check()?;
        let mut state = self.lock();
        let token_id = MockState::allocate(&mut state.next_token, "token")?;
        Ok(TokenRecord {
            alias: spec.alias.clone(),
            token_id,
            name: spec.name.clone(),
            symbol: spec.symbol.clone(),
            memo: spec.memo.clone(),
            treasury_account_id: spec.treasury_account_id.clone(),
            decimals: spec.decimals,
            initial_supply: spec.initial_supply,
            max_supply: spec.max_supply,
            supply_type: spec.supply_type.clone(),
            token_type: spec.token_type.clone(),
            tags: spec.tags.clone(),
            created_at: Some((state.now)()),
        })
    }
}
