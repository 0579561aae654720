//! Typed ledger transactions and the transport seam used by the live backend.
//!
//! Spec strings (ids, keys, enum names) are parsed here, so a malformed
//! value is a validation error raised before anything leaves the process.
use super::HederaError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

const ED25519_PUBLIC_DER_PREFIX: &str = "302a300506032b6570032100";
const ECDSA_SECP256K1_PUBLIC_DER_PREFIX: &str = "302d300706052b8104000a032200";

/// Receipt status reported for a transaction that reached consensus cleanly.
pub const STATUS_SUCCESS: &str = "SUCCESS";

/// A `shard.realm.num` entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

impl EntityId {
    /// Parse `value`, naming `field` in the error.
    pub fn parse(field: &str, value: &str) -> Result<Self, HederaError> {
        value
            .parse()
            .map_err(|err| HederaError::validation(format!("parse {field}: {err}")))
    }
}

impl FromStr for EntityId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let parts: Vec<&str> = trimmed.split('.').collect();
        let [shard, realm, num] = parts.as_slice() else {
            return Err(format!("expected shard.realm.num, got {value:?}"));
        };
        let number = |part: &str| {
            part.parse::<u64>()
                .map_err(|_| format!("expected shard.realm.num, got {value:?}"))
        };
        Ok(Self {
            shard: number(*shard)?,
            realm: number(*realm)?,
            num: number(*num)?,
        })
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

/// A public key accepted for account, topic, and token keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    Ed25519([u8; 32]),
    /// Compressed SEC1 point.
    EcdsaSecp256k1([u8; 33]),
}

impl PublicKey {
    /// Parse raw or DER-encoded hex, with or without a `0x` prefix.
    pub fn parse(field: &str, value: &str) -> Result<Self, HederaError> {
        let invalid = |reason: &str| HederaError::validation(format!("parse {field}: {reason}"));
        let trimmed = value.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed)
            .to_ascii_lowercase();
        let hex_body = if let Some(rest) = digits.strip_prefix(ED25519_PUBLIC_DER_PREFIX) {
            rest
        } else if let Some(rest) = digits.strip_prefix(ECDSA_SECP256K1_PUBLIC_DER_PREFIX) {
            rest
        } else {
            digits.as_str()
        };
        let bytes = hex::decode(hex_body).map_err(|err| invalid(&err.to_string()))?;
        match bytes.len() {
            32 => {
                let mut key = [0u8; 32];
                key.copy_from_slice(&bytes);
                Ok(PublicKey::Ed25519(key))
            }
            33 if matches!(bytes[0], 0x02 | 0x03) => {
                let mut key = [0u8; 33];
                key.copy_from_slice(&bytes);
                Ok(PublicKey::EcdsaSecp256k1(key))
            }
            33 => Err(invalid("ECDSA key is not a compressed point")),
            len => Err(invalid(&format!("unexpected key length {len} bytes"))),
        }
    }

    /// Parse an optional key field; blank means "not set".
    pub fn parse_optional(field: &str, value: &str) -> Result<Option<Self>, HederaError> {
        if value.trim().is_empty() {
            return Ok(None);
        }
        Self::parse(field, value).map(Some)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SupplyType {
    #[default]
    Infinite,
    Finite,
}

impl SupplyType {
    pub fn parse(value: &str) -> Result<Self, HederaError> {
        match value.trim().to_ascii_uppercase().as_str() {
            "" | "INFINITE" | "TOKEN_SUPPLY_TYPE_INFINITE" => Ok(SupplyType::Infinite),
            "FINITE" | "TOKEN_SUPPLY_TYPE_FINITE" => Ok(SupplyType::Finite),
            _ => Err(HederaError::validation(format!(
                "unsupported token supply type {value:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenType {
    #[default]
    FungibleCommon,
    NonFungibleUnique,
}

impl TokenType {
    pub fn parse(value: &str) -> Result<Self, HederaError> {
        match value.trim().to_ascii_uppercase().as_str() {
            "" | "FUNGIBLE_COMMON" | "TOKEN_TYPE_FUNGIBLE_COMMON" => Ok(TokenType::FungibleCommon),
            "NON_FUNGIBLE_UNIQUE" | "TOKEN_TYPE_NON_FUNGIBLE_UNIQUE" => {
                Ok(TokenType::NonFungibleUnique)
            }
            _ => Err(HederaError::validation(format!(
                "unsupported token type {value:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountCreate {
    pub key: Option<PublicKey>,
    pub initial_balance_tinybar: i64,
    pub memo: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicCreate {
    pub memo: String,
    pub admin_key: Option<PublicKey>,
    pub submit_key: Option<PublicKey>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCreate {
    pub name: String,
    pub symbol: String,
    pub memo: String,
    pub treasury: EntityId,
    pub decimals: u32,
    pub initial_supply: u64,
    pub max_supply: Option<i64>,
    pub supply_type: SupplyType,
    pub token_type: TokenType,
    pub admin_key: Option<PublicKey>,
    pub supply_key: Option<PublicKey>,
    pub kyc_key: Option<PublicKey>,
    pub freeze_key: Option<PublicKey>,
    pub wipe_key: Option<PublicKey>,
    pub pause_key: Option<PublicKey>,
    pub freeze_default: Option<bool>,
}

/// A create transaction ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerTransaction {
    AccountCreate(AccountCreate),
    TopicCreate(TopicCreate),
    TokenCreate(TokenCreate),
}

impl LedgerTransaction {
    /// Short label used in logs and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            LedgerTransaction::AccountCreate(_) => "account create",
            LedgerTransaction::TopicCreate(_) => "topic create",
            LedgerTransaction::TokenCreate(_) => "token create",
        }
    }
}

/// Identifier the transport assigns to a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionId(pub String);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub status: String,
    pub account_id: Option<EntityId>,
    pub topic_id: Option<EntityId>,
    pub token_id: Option<EntityId>,
    pub topic_sequence_number: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub consensus_timestamp: DateTime<Utc>,
}

/// Moves transactions to the ledger and reads back their outcome.
///
/// `receipt` blocks until the transaction reaches consensus.
pub trait LedgerTransport: Send + Sync {
    fn submit(&self, transaction: &LedgerTransaction) -> Result<TransactionId, HederaError>;

    fn receipt(&self, id: &TransactionId) -> Result<TransactionReceipt, HederaError>;

    fn record(&self, id: &TransactionId) -> Result<TransactionRecord, HederaError>;

    fn close(&self) -> Result<(), HederaError> {
        Ok(())
    }
}
