//! Configuration for the explorer layer.
//!
//! # Environment Variables
//!
//! - `ETHERSCAN_API_URL`: base API URL (default: Etherscan v2 endpoint)
//! - `ETHERSCAN_API_KEY`: API key (required)
//! - `ETHERSCAN_CHAIN_ID`: numeric chain id (default: 1, Ethereum mainnet)

use crate::error::ExplorerError;
use std::env;
use url::Url;

/// Etherscan v2 API endpoint (multi-chain, selected via `chainid`).
const DEFAULT_API_URL: &str = "https://api.etherscan.io/v2/api";

/// Default chain id (Ethereum mainnet).
const DEFAULT_CHAIN_ID: u64 = 1;

/// Connection settings for the block-explorer API.
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    /// Base API URL.
    pub api_url: Url,

    /// API key appended to every request.
    pub api_key: String,

    /// Chain id appended to every request (Etherscan v2).
    pub chain_id: u64,
}

impl ExplorerConfig {
    /// Build a config with the default endpoint and chain id.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            api_key: api_key.into(),
            chain_id: DEFAULT_CHAIN_ID,
        }
    }

    /// Load the config from environment variables.
    ///
    /// Only the API key is required; the URL and chain id fall back to
    /// Ethereum mainnet defaults.
    pub fn from_env() -> Result<Self, ExplorerError> {
        let api_key = env::var("ETHERSCAN_API_KEY")
            .map_err(|_| ExplorerError::Config("missing env ETHERSCAN_API_KEY".to_string()))?;

        let api_url = match env::var("ETHERSCAN_API_URL") {
            Ok(raw) => Url::parse(&raw)
                .map_err(|e| ExplorerError::Config(format!("invalid ETHERSCAN_API_URL: {e}")))?,
            Err(_) => Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
        };

        let chain_id = match env::var("ETHERSCAN_CHAIN_ID") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ExplorerError::Config(format!("invalid ETHERSCAN_CHAIN_ID: {raw}")))?,
            Err(_) => DEFAULT_CHAIN_ID,
        };

        Ok(Self {
            api_url,
            api_key,
            chain_id,
        })
    }

    /// Override the chain id (builder pattern).
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_defaults() {
        let config = ExplorerConfig::new("key");
        assert_eq!(config.chain_id, 1);
        assert_eq!(config.api_url.as_str(), DEFAULT_API_URL);
    }

    #[test]
    fn test_with_chain_id() {
        let config = ExplorerConfig::new("key").with_chain_id(8453);
        assert_eq!(config.chain_id, 8453);
    }
}
