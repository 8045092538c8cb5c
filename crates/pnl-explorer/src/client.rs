//! Etherscan-compatible HTTP client.
//!
//! This module provides a thin client over the block-explorer account API:
//! token transfer history (`tokentx`), normal transaction history
//! (`txlist`) and current token balance (`tokenbalance`).
//!
//! # Design
//!
//! - Client struct holding `reqwest::Client` + base `Url` + config
//! - Every endpoint goes through one request helper that attaches
//!   `chainid`/`apikey` and decodes the `{status, message, result}` envelope
//! - Error propagation via `?`, no retries (retry policy is the caller's
//!   concern; page fetches are pure re-reads by page number)
//!
//! # Envelope quirks
//!
//! The explorer reports "no data" as `status = "0"` with either an empty
//! `result` array or a "No transactions found" message. That case decodes
//! to an empty list rather than an error. Everything else with
//! `status = "0"` is normalized into an [`ExplorerError`] kind.

use crate::config::ExplorerConfig;
use crate::error::ExplorerError;
use alloy::primitives::{Address, U256};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

/// Sort order for history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest first.
    Ascending,
    /// Newest first.
    Descending,
}

impl SortOrder {
    fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// One raw ERC-20 transfer record as returned by the explorer.
///
/// All fields are decimal strings on the wire; accessor methods parse them
/// defensively (bad values become zero, mirroring how records with a bad
/// timestamp or amount are later dropped by the ledger builder).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenTransfer {
    pub block_number: String,
    pub time_stamp: String,
    pub hash: String,
    pub from: String,
    pub contract_address: String,
    pub to: String,
    pub value: String,
    pub token_name: String,
    pub token_symbol: String,
    pub token_decimal: String,
    pub transaction_index: String,
}

impl TokenTransfer {
    /// Transfer timestamp in milliseconds, or 0 when missing/invalid.
    pub fn timestamp_ms(&self) -> i64 {
        match self.time_stamp.parse::<i64>() {
            Ok(secs) if secs > 0 => secs.saturating_mul(1_000),
            _ => 0,
        }
    }

    /// Block number, or 0 when missing/invalid.
    pub fn block_number_u64(&self) -> u64 {
        self.block_number.parse().unwrap_or(0)
    }

    /// Position of the transaction within its block, or 0.
    pub fn transaction_index_u64(&self) -> u64 {
        self.transaction_index.parse().unwrap_or(0)
    }

    /// Raw transfer amount, if it parses as an unsigned 256-bit integer.
    pub fn value_raw(&self) -> Option<U256> {
        self.value.parse().ok()
    }
}

/// One normal (value-carrying) transaction as returned by the explorer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NormalTransaction {
    pub block_number: String,
    pub time_stamp: String,
    pub hash: String,
    pub from: String,
    pub to: String,
    pub value: String,
    pub is_error: String,
}

impl NormalTransaction {
    /// Transaction timestamp in milliseconds, or 0 when missing/invalid.
    pub fn timestamp_ms(&self) -> i64 {
        match self.time_stamp.parse::<i64>() {
            Ok(secs) if secs > 0 => secs.saturating_mul(1_000),
            _ => 0,
        }
    }
}

/// Response envelope shared by all account-module endpoints.
#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    message: String,
    result: serde_json::Value,
}

/// HTTP client for an Etherscan-compatible block explorer.
pub struct EtherscanClient {
    http_client: reqwest::Client,
    config: ExplorerConfig,
}

impl EtherscanClient {
    /// Create a client with the given settings.
    pub fn new(config: ExplorerConfig) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self, ExplorerError> {
        Ok(Self::new(ExplorerConfig::from_env()?))
    }

    /// Fetch one page of ERC-20 transfers of `contract` touching `address`.
    ///
    /// Pages are 1-based. The explorer caps `page * page_size`, so callers
    /// bound the page count themselves (see [`fetch_history`]).
    ///
    /// [`fetch_history`]: crate::paginate::fetch_history
    pub async fn token_transfers(
        &self,
        address: Address,
        contract: Address,
        sort: SortOrder,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<TokenTransfer>, ExplorerError> {
        self.request_list(&[
            ("module", "account".to_string()),
            ("action", "tokentx".to_string()),
            ("address", address.to_string()),
            ("contractaddress", contract.to_string()),
            ("page", page.to_string()),
            ("offset", page_size.to_string()),
            ("startblock", "0".to_string()),
            ("endblock", "99999999".to_string()),
            ("sort", sort.as_param().to_string()),
        ])
        .await
    }

    /// Fetch one page of normal transactions for `address`.
    pub async fn normal_transactions(
        &self,
        address: Address,
        sort: SortOrder,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<NormalTransaction>, ExplorerError> {
        self.request_list(&[
            ("module", "account".to_string()),
            ("action", "txlist".to_string()),
            ("address", address.to_string()),
            ("page", page.to_string()),
            ("offset", page_size.to_string()),
            ("startblock", "0".to_string()),
            ("endblock", "99999999".to_string()),
            ("sort", sort.as_param().to_string()),
        ])
        .await
    }

    /// Read the current raw token balance of `address` for `contract`.
    pub async fn token_balance(
        &self,
        address: Address,
        contract: Address,
    ) -> Result<U256, ExplorerError> {
        let envelope = self
            .send(&[
                ("module", "account".to_string()),
                ("action", "tokenbalance".to_string()),
                ("address", address.to_string()),
                ("contractaddress", contract.to_string()),
                ("tag", "latest".to_string()),
            ])
            .await?;

        if envelope.status != "1" {
            return Err(normalize_api_error(&error_text(&envelope)));
        }

        let raw = envelope
            .result
            .as_str()
            .ok_or_else(|| ExplorerError::Api("unexpected tokenbalance result shape".to_string()))?;
        raw.parse()
            .map_err(|_| ExplorerError::Api(format!("unparseable token balance: {raw}")))
    }

    /// Issue a list-endpoint request, decoding "no data" to an empty list.
    async fn request_list<T: DeserializeOwned>(
        &self,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, ExplorerError> {
        let envelope = self.send(params).await?;

        if envelope.status != "1" {
            if is_no_data(&envelope.result) {
                return Ok(Vec::new());
            }
            return Err(normalize_api_error(&error_text(&envelope)));
        }

        serde_json::from_value(envelope.result)
            .map_err(|e| ExplorerError::Api(format!("unexpected result shape: {e}")))
    }

    async fn send(&self, params: &[(&str, String)]) -> Result<Envelope, ExplorerError> {
        let mut url: Url = self.config.api_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("chainid", &self.config.chain_id.to_string());
            query.append_pair("apikey", &self.config.api_key);
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }

        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExplorerError::Http(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

/// True if a `status = "0"` result actually means "no matching records".
fn is_no_data(result: &serde_json::Value) -> bool {
    match result {
        serde_json::Value::Array(items) => items.is_empty(),
        serde_json::Value::String(text) => text.to_lowercase().contains("no transactions found"),
        _ => false,
    }
}

/// Best-effort error text from a failed envelope.
fn error_text(envelope: &Envelope) -> String {
    if let Some(text) = envelope.result.as_str() {
        if !text.trim().is_empty() {
            return text.to_string();
        }
    }
    if !envelope.message.trim().is_empty() {
        return envelope.message.clone();
    }
    "unknown explorer error".to_string()
}

/// Classify an explorer-reported error string into an error kind.
fn normalize_api_error(message: &str) -> ExplorerError {
    let lower = message.to_lowercase();
    if lower.contains("invalid api key") || lower.contains("missing/invalid api key") {
        return ExplorerError::InvalidApiKey;
    }
    if lower.contains("rate limit") {
        return ExplorerError::RateLimit;
    }
    ExplorerError::Api(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer(time_stamp: &str, value: &str) -> TokenTransfer {
        TokenTransfer {
            time_stamp: time_stamp.to_string(),
            value: value.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_transfer_deserializes_from_explorer_shape() {
        let json = r#"{
            "blockNumber": "19000000",
            "timeStamp": "1704067200",
            "hash": "0xabc",
            "from": "0x1111111111111111111111111111111111111111",
            "contractAddress": "0x2222222222222222222222222222222222222222",
            "to": "0x3333333333333333333333333333333333333333",
            "value": "1000000",
            "tokenName": "USD Coin",
            "tokenSymbol": "USDC",
            "tokenDecimal": "6",
            "transactionIndex": "42",
            "gas": "60000"
        }"#;
        let parsed: TokenTransfer = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.timestamp_ms(), 1_704_067_200_000);
        assert_eq!(parsed.block_number_u64(), 19_000_000);
        assert_eq!(parsed.transaction_index_u64(), 42);
        assert_eq!(parsed.value_raw(), Some(U256::from(1_000_000u64)));
    }

    #[test]
    fn test_timestamp_ms_rejects_bad_values() {
        assert_eq!(transfer("0", "1").timestamp_ms(), 0);
        assert_eq!(transfer("-5", "1").timestamp_ms(), 0);
        assert_eq!(transfer("garbage", "1").timestamp_ms(), 0);
    }

    #[test]
    fn test_value_raw_handles_large_amounts() {
        // Larger than u128: still exact in U256.
        let t = transfer("1", "340282366920938463463374607431768211456");
        assert!(t.value_raw().is_some());
        assert_eq!(transfer("1", "not-a-number").value_raw(), None);
    }

    #[test]
    fn test_is_no_data() {
        assert!(is_no_data(&serde_json::json!([])));
        assert!(is_no_data(&serde_json::json!("No transactions found")));
        assert!(!is_no_data(&serde_json::json!("Max rate limit reached")));
        assert!(!is_no_data(&serde_json::json!([{"value": "1"}])));
    }

    #[test]
    fn test_normalize_api_error() {
        assert!(matches!(
            normalize_api_error("Missing/Invalid API Key"),
            ExplorerError::InvalidApiKey
        ));
        assert!(matches!(
            normalize_api_error("Max rate limit reached"),
            ExplorerError::RateLimit
        ));
        assert!(matches!(
            normalize_api_error("something else"),
            ExplorerError::Api(_)
        ));
    }

    #[test]
    fn test_envelope_no_data_decodes_to_empty_list() {
        let envelope: Envelope = serde_json::from_str(
            r#"{"status":"0","message":"No transactions found","result":[]}"#,
        )
        .unwrap();
        assert_eq!(envelope.status, "0");
        assert!(is_no_data(&envelope.result));
    }
}
