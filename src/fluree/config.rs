//! Fluree Cloud credentials and endpoint configuration.
//!
//! Values come from the environment through an injectable lookup, then
//! caller overrides apply, then `validate` runs once on the merged result.
use super::FlureeError;

/// Default Fluree Cloud API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://data.flur.ee";

const ENV_API_TOKEN: &str = "FLUREE_API_TOKEN";
const ENV_HANDLE: &str = "FLUREE_HANDLE";
const ENV_BASE_URL: &str = "FLUREE_BASE_URL";

/// Credentials and endpoint used by the Fluree client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlureeConfig {
    pub api_token: String,
    pub tenant_handle: String,
    pub base_url: String,
}

impl Default for FlureeConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            tenant_handle: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl FlureeConfig {
    /// Read `FLUREE_*` variables through `lookup`. The result is not validated.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(token) = lookup(ENV_API_TOKEN) {
            config.api_token = token.trim().to_string();
        }
        if let Some(handle) = lookup(ENV_HANDLE) {
            config.tenant_handle = handle.trim().to_string();
        }
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|value| !value.trim().is_empty()) {
            config.base_url = normalize_base_url(&base_url);
        }
        config
    }

    /// Read `FLUREE_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply non-blank overrides on top of the current values.
    pub fn with_overrides(
        mut self,
        api_token: Option<&str>,
        tenant_handle: Option<&str>,
        base_url: Option<&str>,
    ) -> Self {
        if let Some(token) = non_blank(api_token) {
            self.api_token = token.to_string();
        }
        if let Some(handle) = non_blank(tenant_handle) {
            self.tenant_handle = handle.to_string();
        }
        if let Some(base_url) = non_blank(base_url) {
            self.base_url = normalize_base_url(base_url);
        }
        self
    }

    /// Ensure every credential is present, naming each missing variable.
    pub fn validate(&self) -> Result<(), FlureeError> {
        let mut missing = Vec::new();
        if self.api_token.is_empty() {
            missing.push(ENV_API_TOKEN);
        }
        if self.tenant_handle.is_empty() {
            missing.push(ENV_HANDLE);
        }
        if !missing.is_empty() {
            return Err(FlureeError::Config(format!(
                "missing environment variables: {}",
                missing.join(", ")
            )));
        }
        if self.base_url.is_empty() {
            return Err(FlureeError::Config(
                "Fluree base URL cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
