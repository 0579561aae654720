//! JSON-LD projection of a bootstrap result into a Fluree transaction.
//!
//! The projection is pure: node ids derive from artifact kind and backend id
//! (`urn:<kind>:<id>`), never from aliases, and objects keep sorted keys, so
//! projecting the same result twice yields byte-identical documents.
use super::{AccountRecord, ArtifactKind, BootstrapResult, TokenRecord, TopicRecord};
use crate::fluree::TransactionRequest;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

const HEDERA_VOCAB: &str = "https://hashgraph.github.io/bhash/hedera#";

/// The fixed vocabulary block, built fresh for every document.
pub fn default_context() -> Map<String, Value> {
    let mut context = Map::new();
    context.insert("@vocab".to_string(), json!(HEDERA_VOCAB));
    context.insert("hedera".to_string(), json!(HEDERA_VOCAB));
    context.insert("prov".to_string(), json!("http://www.w3.org/ns/prov#"));
    context.insert("schema".to_string(), json!("http://schema.org/"));
    context.insert("xsd".to_string(), json!("http://www.w3.org/2001/XMLSchema#"));
    context.insert(
        "prov:generatedAtTime".to_string(),
        json!({"@type": "xsd:dateTime"}),
    );
    for term in [
        "hedera:belongsToNetwork",
        "hedera:accountId",
        "hedera:topicId",
        "hedera:tokenId",
    ] {
        context.insert(term.to_string(), json!({"@type": "xsd:string"}));
    }
    context.insert(
        "hedera:treasuryAccount".to_string(),
        json!({"@type": "@id"}),
    );
    context.insert(
        "schema:keywords".to_string(),
        json!({"@container": "@set"}),
    );
    context
}

impl BootstrapResult {
    /// Build an insert-only transaction for every recorded artifact:
    /// accounts, then topics, then tokens.
    pub fn transaction(&self, ledger: &str) -> TransactionRequest {
        let insert = self
            .accounts
            .iter()
            .map(|account| account_node(account, &self.network))
            .chain(self.topics.iter().map(|topic| topic_node(topic, &self.network)))
            .chain(self.tokens.iter().map(|token| token_node(token, &self.network)))
            .collect();
        TransactionRequest {
            ledger: ledger.to_string(),
            context: Some(default_context()),
            insert,
            ..TransactionRequest::default()
        }
    }
}

/// Derive the node id for an artifact.
pub fn node_id(kind: ArtifactKind, id: &str) -> String {
    format!("urn:{kind}:{id}")
}

struct NodeBuilder {
    node: Map<String, Value>,
}

impl NodeBuilder {
    fn new(kind: ArtifactKind, id: &str, types: [&str; 2], id_term: &str, network: &str) -> Self {
        let mut node = Map::new();
        node.insert("@id".to_string(), json!(node_id(kind, id)));
        node.insert("@type".to_string(), json!(types));
        node.insert(id_term.to_string(), json!(id));
        node.insert("hedera:belongsToNetwork".to_string(), json!(network));
        Self { node }
    }

    fn text(mut self, term: &str, value: &str) -> Self {
        if !value.is_empty() {
            self.node.insert(term.to_string(), json!(value));
        }
        self
    }

    fn created_at(mut self, created_at: Option<&DateTime<Utc>>) -> Self {
        if let Some(created_at) = created_at {
            self.node.insert(
                "prov:generatedAtTime".to_string(),
                json!(format_time(created_at)),
            );
        }
        self
    }

    fn keywords(mut self, tags: &[String]) -> Self {
        if !tags.is_empty() {
            self.node.insert("schema:keywords".to_string(), json!(tags));
        }
        self
    }

    fn value(mut self, term: &str, include: bool, value: Value) -> Self {
        if include {
            self.node.insert(term.to_string(), value);
        }
        self
    }

    fn build(self) -> Map<String, Value> {
        self.node
    }
}

fn account_node(account: &AccountRecord, network: &str) -> Map<String, Value> {
    NodeBuilder::new(
        ArtifactKind::Account,
        &account.account_id,
        ["hedera:Account", "prov:Agent"],
        "hedera:accountId",
        network,
    )
    .created_at(account.created_at.as_ref())
    .text("schema:name", &account.alias)
    .text("schema:description", &account.memo)
    .text("hedera:publicKey", &account.public_key)
    .keywords(&account.tags)
    .build()
}

fn topic_node(topic: &TopicRecord, network: &str) -> Map<String, Value> {
    NodeBuilder::new(
        ArtifactKind::Topic,
        &topic.topic_id,
        ["hedera:ConsensusTopic", "prov:Entity"],
        "hedera:topicId",
        network,
    )
    .created_at(topic.created_at.as_ref())
    .text("schema:name", &topic.alias)
    .text("schema:description", &topic.memo)
    .keywords(&topic.tags)
    .value(
        "hedera:initialSequence",
        topic.sequence > 0,
        json!(topic.sequence),
    )
    .build()
}

fn token_node(token: &TokenRecord, network: &str) -> Map<String, Value> {
    let name = if token.name.is_empty() {
        &token.alias
    } else {
        &token.name
    };
    let treasury = if token.treasury_account_id.is_empty() {
        String::new()
    } else {
        node_id(ArtifactKind::Account, &token.treasury_account_id)
    };
    NodeBuilder::new(
        ArtifactKind::Token,
        &token.token_id,
        ["hedera:Token", "prov:Entity"],
        "hedera:tokenId",
        network,
    )
    .created_at(token.created_at.as_ref())
    .text("schema:name", name)
    .text("schema:identifier", &token.symbol)
    .text("schema:description", &token.memo)
    .text("hedera:treasuryAccount", &treasury)
    .value("hedera:decimals", token.decimals > 0, json!(token.decimals))
    .value(
        "hedera:initialSupply",
        token.initial_supply > 0,
        json!(token.initial_supply),
    )
    // Negative max supply is meaningful; only zero means "unset".
    .value("hedera:maxSupply", token.max_supply != 0, json!(token.max_supply))
    .text("hedera:supplyType", &token.supply_type)
    .text("hedera:tokenType", &token.token_type)
    .keywords(&token.tags)
    .build()
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

#[cfg(test)]
#[path = "jsonld_tests.rs"]
mod tests;
