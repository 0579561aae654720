//! Hedera network selection and operator credentials.
//!
//! Environment values load through an injectable lookup, caller overrides
//! apply on top, and `validate` checks the merged result.
use super::HederaError;

/// Network used when nothing else names one.
pub const DEFAULT_NETWORK: &str = "testnet";

const ENV_NETWORK: &str = "HEDERA_NETWORK";
const ENV_OPERATOR_ID: &str = "HEDERA_OPERATOR_ID";
const ENV_OPERATOR_KEY: &str = "HEDERA_OPERATOR_KEY";
const ENV_MIRROR_URL: &str = "HEDERA_MIRROR_URL";

/// Credentials and endpoints for talking to a Hedera network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HederaConfig {
    pub network: String,
    pub operator_account_id: String,
    pub operator_private_key: String,
    pub mirror_network_url: String,
}

impl Default for HederaConfig {
    fn default() -> Self {
        Self {
            network: DEFAULT_NETWORK.to_string(),
            operator_account_id: String::new(),
            operator_private_key: String::new(),
            mirror_network_url: String::new(),
        }
    }
}

/// Caller-supplied values that win over the environment when non-blank.
#[derive(Debug, Clone, Default)]
pub struct HederaOverrides<'a> {
    pub network: Option<&'a str>,
    pub operator_account_id: Option<&'a str>,
    pub operator_private_key: Option<&'a str>,
    pub mirror_network_url: Option<&'a str>,
}

impl HederaConfig {
    /// Read `HEDERA_*` variables through `lookup`. The result is not validated.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|value| value.trim().to_string());
        let mut config = Self::default();
        if let Some(network) = read(ENV_NETWORK).filter(|value| !value.is_empty()) {
            config.network = network;
        }
        if let Some(id) = read(ENV_OPERATOR_ID) {
            config.operator_account_id = id;
        }
        if let Some(key) = read(ENV_OPERATOR_KEY) {
            config.operator_private_key = key;
        }
        if let Some(url) = read(ENV_MIRROR_URL) {
            config.mirror_network_url = url;
        }
        config
    }

    /// Read `HEDERA_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply non-blank overrides on top of the current values.
    pub fn with_overrides(mut self, overrides: &HederaOverrides<'_>) -> Self {
        apply_override(&mut self.network, overrides.network);
        apply_override(&mut self.operator_account_id, overrides.operator_account_id);
        apply_override(&mut self.operator_private_key, overrides.operator_private_key);
        apply_override(&mut self.mirror_network_url, overrides.mirror_network_url);
        self
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), HederaError> {
        if self.network.trim().is_empty() {
            return Err(HederaError::validation("hedera network cannot be empty"));
        }
        if self.operator_account_id.is_empty() != self.operator_private_key.is_empty() {
            return Err(HederaError::validation(
                "hedera operator id and key must both be provided or omitted",
            ));
        }
        Ok(())
    }

    /// Whether operator credentials are configured.
    pub fn has_operator(&self) -> bool {
        !self.operator_account_id.is_empty() && !self.operator_private_key.is_empty()
    }
}

fn apply_override(target: &mut String, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) {
        *target = value.to_string();
    }
}

/// Canonicalize a network name; only the public Hedera networks are known.
pub fn canonical_network(name: &str) -> Result<&'static str, HederaError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "" | "testnet" => Ok("testnet"),
        "mainnet" => Ok("mainnet"),
        "previewnet" => Ok("previewnet"),
        _ => Err(HederaError::validation(format!(
            "unsupported hedera network {name:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_testnet_without_operator() {
        let config = HederaConfig::from_lookup(lookup_from(&[("HEDERA_NETWORK", "  ")]));
        assert_eq!(config.network, "testnet");
        assert!(!config.has_operator());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn reads_trimmed_environment() {
        let config = HederaConfig::from_lookup(lookup_from(&[
            ("HEDERA_NETWORK", " previewnet "),
            ("HEDERA_OPERATOR_ID", "0.0.2"),
            ("HEDERA_OPERATOR_KEY", " abc "),
            ("HEDERA_MIRROR_URL", "mirror:443"),
        ]));
        assert_eq!(config.network, "previewnet");
        assert_eq!(config.operator_private_key, "abc");
        assert_eq!(config.mirror_network_url, "mirror:443");
        assert!(config.has_operator());
    }

    #[test]
    fn half_configured_operator_is_rejected() {
        let config = HederaConfig::from_lookup(lookup_from(&[("HEDERA_OPERATOR_ID", "0.0.2")]));
        let err = config.validate().expect_err("missing key");
        assert!(err.to_string().contains("both be provided or omitted"));
    }

    #[test]
    fn overrides_ignore_blank_values() {
        let config = HederaConfig::from_lookup(lookup_from(&[("HEDERA_NETWORK", "mainnet")]))
            .with_overrides(&HederaOverrides {
                network: Some(" "),
                operator_account_id: Some("0.0.9"),
                operator_private_key: Some("key"),
                ..HederaOverrides::default()
            });
        assert_eq!(config.network, "mainnet");
        assert_eq!(config.operator_account_id, "0.0.9");
        assert!(config.has_operator());
    }

    #[test]
    fn canonical_network_accepts_known_names_only() {
        assert_eq!(canonical_network("").unwrap(), "testnet");
        assert_eq!(canonical_network(" MainNet ").unwrap(), "mainnet");
        assert_eq!(canonical_network("previewnet").unwrap(), "previewnet");
        assert!(matches!(
            canonical_network("localnet"),
            Err(HederaError::Validation(_))
        ));
    }
}
