//! Blocking HTTP client for the Fluree Cloud API.
use super::{FlureeConfig, FlureeError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::time::{Duration, Instant};
use ureq::Agent;

/// Per-request timeout for Fluree calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A ledger transaction: JSON-LD nodes to insert or delete, optionally
/// constrained by a `where` clause.
///
/// Empty clauses are omitted from the wire payload. Objects use sorted keys,
/// so serializing the same request twice yields identical bytes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TransactionRequest {
    pub ledger: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub insert: Vec<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delete: Vec<Map<String, Value>>,
    #[serde(default, rename = "where", skip_serializing_if = "Vec::is_empty")]
    pub where_clause: Vec<Map<String, Value>>,
}

/// Payload for the create-dataset endpoint.
#[derive(Debug, Clone, Default)]
pub struct CreateDatasetRequest {
    pub dataset_name: String,
    pub storage_type: String,
    pub description: String,
    pub visibility: String,
    pub tags: Vec<String>,
}

/// Natural-language request for the generation endpoints.
#[derive(Debug, Clone, Default)]
pub struct PromptRequest {
    pub datasets: Vec<String>,
    pub prompt: String,
}

/// Generation endpoints that share the prompt payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptEndpoint {
    GeneratePrompt,
    GenerateSparql,
    GenerateAnswer,
}

impl PromptEndpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptEndpoint::GeneratePrompt => "generate-prompt",
            PromptEndpoint::GenerateSparql => "generate-sparql",
            PromptEndpoint::GenerateAnswer => "generate-answer",
        }
    }
}

impl fmt::Display for PromptEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can commit a transaction document.
pub trait Transactor {
    fn transact(&self, request: &TransactionRequest) -> Result<Value, FlureeError>;
}

/// Fluree Cloud client.
pub struct FlureeClient {
    agent: Agent,
    config: FlureeConfig,
}

impl FlureeClient {
    pub fn new(config: FlureeConfig) -> Self {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(DEFAULT_TIMEOUT))
            .http_status_as_error(false)
            .build();
        Self {
            agent: Agent::new_with_config(agent_config),
            config,
        }
    }

    /// Create a dataset owned by `owner_handle`.
    pub fn create_dataset(
        &self,
        owner_handle: &str,
        request: &CreateDatasetRequest,
    ) -> Result<Value, FlureeError> {
        require_owner(owner_handle)?;
        let endpoint = format!("api/{owner_handle}/create-dataset");
        self.post(&endpoint, &create_dataset_payload(request))
    }

    /// Call one of the generation endpoints for `owner_handle`.
    pub fn generate(
        &self,
        owner_handle: &str,
        endpoint: PromptEndpoint,
        request: &PromptRequest,
    ) -> Result<Value, FlureeError> {
        require_owner(owner_handle)?;
        let payload = json!({
            "datasets": request.datasets,
            "prompt": request.prompt,
        });
        self.post(&format!("api/{owner_handle}/{endpoint}"), &payload)
    }

    fn post(&self, endpoint: &str, payload: &Value) -> Result<Value, FlureeError> {
        let url = join_url(&self.config.base_url, endpoint)?;
        let body = serde_json::to_vec(payload)?;
        let started = Instant::now();
        let mut response = self
            .agent
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_token))
            .header("x-user-handle", self.config.tenant_handle.as_str())
            .header("Content-Type", "application/json")
            .send(&body[..])
            .map_err(|err| FlureeError::Transport(err.to_string()))?;
        let status = response.status();
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|err| FlureeError::Transport(format!("read response: {err}")))?;
        tracing::info!(
            endpoint,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis(),
            response_bytes = text.len(),
            "fluree request complete"
        );
        if status.as_u16() >= 400 {
            let fallback = status.canonical_reason().unwrap_or("unexpected HTTP status");
            return Err(FlureeError::Api {
                status: status.as_u16(),
                message: parse_error_message(&text, fallback),
            });
        }
        Ok(decode_body(text))
    }
}

impl Transactor for FlureeClient {
    fn transact(&self, request: &TransactionRequest) -> Result<Value, FlureeError> {
        if request.ledger.trim().is_empty() {
            return Err(FlureeError::InvalidRequest("ledger is required".to_string()));
        }
        let payload = serde_json::to_value(request)?;
        self.post("fluree/transact", &payload)
    }
}

fn require_owner(owner_handle: &str) -> Result<(), FlureeError> {
    if owner_handle.trim().is_empty() {
        return Err(FlureeError::InvalidRequest(
            "owner handle is required".to_string(),
        ));
    }
    Ok(())
}

fn create_dataset_payload(request: &CreateDatasetRequest) -> Value {
    let mut payload = Map::new();
    payload.insert("datasetName".to_string(), json!(request.dataset_name));
    payload.insert("storageType".to_string(), json!(request.storage_type));
    payload.insert("description".to_string(), json!(request.description));
    if !request.visibility.is_empty() {
        payload.insert("visibility".to_string(), json!(request.visibility));
    }
    if !request.tags.is_empty() {
        payload.insert("tags".to_string(), json!(request.tags));
    }
    Value::Object(payload)
}

fn join_url(base_url: &str, endpoint: &str) -> Result<String, FlureeError> {
    let base = base_url.trim_end_matches('/');
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(FlureeError::Config(format!("invalid base URL {base_url:?}")));
    }
    Ok(format!("{base}/{}", endpoint.trim_start_matches('/')))
}

/// Empty bodies decode to null; non-JSON bodies come back as a string.
fn decode_body(text: String) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

/// Pull a human-readable message out of an error body.
fn parse_error_message(body: &str, fallback: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => ["message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .filter(|msg| !msg.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Value::Object(map.clone()).to_string()),
        Ok(Value::String(msg)) => msg,
        Ok(other) => other.to_string(),
        Err(_) => fallback.to_string(),
    }
}
