//! HTTP client for an Insight-style block-explorer API.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::UnspentOutput;
use std::time::Duration;

use super::source::{BlockExplorer, ExplorerFuture};
use super::types::*;

/// Block-explorer API client.
#[derive(Debug, Clone)]
pub struct ExplorerClient {
    base_url: String,
    client: reqwest::Client,
}

impl ExplorerClient {
    /// Create a new explorer client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the explorer API (e.g., "https://testnet.litecore.io/api")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.explorer_url.trim())
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Balance of `address` in satoshis.
    pub async fn get_balance_sats(&self, address: &str) -> Result<u64> {
        let url = format!("{}/addr/{}/balance", self.base_url, address);
        let text = self.get_text(&url).await?;

        text.trim()
            .parse::<u64>()
            .map_err(|e| Error::Parse(format!("Invalid balance {:?}: {}", text, e)))
    }

    /// Transaction record by id.
    pub async fn get_tx(&self, txid: &str) -> Result<Transaction> {
        let url = format!("{}/tx/{}", self.base_url, txid);
        self.get_json(&url).await
    }

    /// Transactions of `address` within `range`.
    pub async fn get_txs(&self, address: &str, range: HistoryRange) -> Result<TransactionList> {
        let url = format!(
            "{}/addrs/{}/txs?from={}&to={}",
            self.base_url, address, range.from, range.to
        );
        self.get_json(&url).await
    }

    /// Unspent outputs of `address`.
    pub async fn get_utxo(&self, address: &str) -> Result<Vec<UnspentOutput>> {
        let url = format!("{}/addr/{}/utxo", self.base_url, address);
        let utxos: Vec<ExplorerUtxo> = self.get_json(&url).await?;

        utxos.into_iter().map(ExplorerUtxo::into_unspent).collect()
    }

    /// Submit a raw transaction and return the response body as is.
    ///
    /// The body is returned for error statuses too; the explorer reports
    /// rejected transactions there.
    pub async fn send_raw(&self, raw_tx: &str) -> Result<String> {
        let url = format!("{}/tx/send", self.base_url);
        let response = self
            .client
            .post(&url)
            .form(&BroadcastRequest { rawtx: raw_tx })
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to send request to {}: {}", url, e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Network(format!("Failed to read response: {}", e)))?;

        log::info!("Broadcast to {} returned {}: {}", url, status, text);
        Ok(text)
    }

    // Helper methods

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to send request to {}: {}", url, e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::Network(format!("Explorer error {}: {}", status, text)));
        }

        log::debug!("GET {} response: {}", url, text);
        Ok(text)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let text = self.get_text(url).await?;

        serde_json::from_str(&text)
            .map_err(|e| Error::Parse(format!("Failed to parse response: {}. Body: {}", e, text)))
    }
}

impl BlockExplorer for ExplorerClient {
    fn balance(&self, address: &str) -> ExplorerFuture<'_, u64> {
        let address = address.to_string();
        Box::pin(async move { self.get_balance_sats(&address).await })
    }

    fn transaction(&self, txid: &str) -> ExplorerFuture<'_, Transaction> {
        let txid = txid.to_string();
        Box::pin(async move { self.get_tx(&txid).await })
    }

    fn history(&self, address: &str, range: HistoryRange) -> ExplorerFuture<'_, TransactionList> {
        let address = address.to_string();
        Box::pin(async move { self.get_txs(&address, range).await })
    }

    fn utxos(&self, address: &str) -> ExplorerFuture<'_, Vec<UnspentOutput>> {
        let address = address.to_string();
        Box::pin(async move { self.get_utxo(&address).await })
    }

    fn broadcast_raw(&self, raw_tx: &str) -> ExplorerFuture<'_, String> {
        let raw_tx = raw_tx.to_string();
        Box::pin(async move { self.send_raw(&raw_tx).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::BlockExplorerExt;
    use crate::types::Network;
    use httpmock::prelude::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    const ADDR: &str = "muZpTpBYhxmRFuCjLc7C6BBDF32C8XVJUi";
    const TXID: &str = "91f7f871584ea0050b1adec8c26ff0f38f7fce096a474186b289915464458cdb";

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = ExplorerClient::new("https://testnet.litecore.io/api/");
        assert_eq!(client.base_url(), "https://testnet.litecore.io/api");

        let config = Config::default()
            .with_explorer_url("http://localhost:3001/api//")
            .unwrap();
        assert_eq!(
            ExplorerClient::from_config(&config).base_url(),
            "http://localhost:3001/api"
        );
    }

    #[tokio::test]
    async fn balance_is_parsed_from_bare_integer() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/addr/{ADDR}/balance"));
                then.status(200).body("150000000\n");
            })
            .await;

        let client = ExplorerClient::new(server.base_url());
        assert_eq!(client.balance(ADDR).await.unwrap(), 150_000_000);
        assert_eq!(
            client.get_balance(ADDR, Network::Testnet).await.unwrap(),
            Some(dec!(1.5))
        );
        mock.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn history_requests_exact_range() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(format!("/addrs/{ADDR}/txs"))
                    .query_param("from", "20")
                    .query_param("to", "29");
                then.status(200).json_body(json!({
                    "totalItems": 31,
                    "from": 20,
                    "to": 29,
                    "items": [{"txid": TXID, "confirmations": 2}]
                }));
            })
            .await;

        let client = ExplorerClient::new(server.base_url());
        let page = client.get_history(ADDR, 2, 10).await;

        mock.assert_async().await;
        assert_eq!(page.total_items, 31);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].txid, TXID);
    }

    #[tokio::test]
    async fn transaction_lookup() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/tx/{TXID}"));
                then.status(200)
                    .json_body(json!({"txid": TXID, "version": 1, "confirmations": 7}));
            })
            .await;

        let client = ExplorerClient::new(server.base_url());
        let tx = client.get_transaction(TXID).await;

        mock.assert_async().await;
        assert_eq!(tx.txid, TXID);
        assert_eq!(tx.confirmations, 7);
    }

    #[tokio::test]
    async fn utxos_map_to_unspent_outputs() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/addr/{ADDR}/utxo"));
                then.status(200).json_body(json!([
                    {
                        "address": ADDR,
                        "txid": TXID,
                        "vout": 0,
                        "scriptPubKey": "76a91499d1c8d6e1c4ec4d2f9b0a4c0a2bfa21e1b1f2ba88ac",
                        "amount": 0.2,
                        "satoshis": 20000000,
                        "height": 10,
                        "confirmations": 4
                    },
                    {
                        "address": ADDR,
                        "txid": TXID,
                        "vout": 1,
                        "scriptPubKey": "76a91499d1c8d6e1c4ec4d2f9b0a4c0a2bfa21e1b1f2ba88ac",
                        "amount": 0.0001,
                        "satoshis": 10000,
                        "confirmations": 0
                    }
                ]));
            })
            .await;

        let client = ExplorerClient::new(server.base_url());
        let utxos = client.utxos(ADDR).await.unwrap();
        assert_eq!(utxos.len(), 2);
        assert_eq!(utxos[0].satoshis, 20_000_000);
        assert_eq!(utxos[1].output_index, 1);
        assert_eq!(utxos[1].txid.to_string(), TXID);
    }

    #[tokio::test]
    async fn broadcast_posts_form_and_returns_body_verbatim() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/tx/send")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body("rawtx=0100abcd");
                then.status(400).body("Missing inputs. Code:-25");
            })
            .await;

        let client = ExplorerClient::new(server.base_url());
        let result = client.broadcast("0100abcd").await;

        mock.assert_async().await;
        assert_eq!(result.as_deref(), Some("Missing inputs. Code:-25"));
    }

    #[tokio::test]
    async fn error_status_is_network_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/addr/{ADDR}/balance"));
                then.status(500).body("internal error");
            })
            .await;

        let client = ExplorerClient::new(server.base_url());
        let err = client.balance(ADDR).await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
        assert_eq!(client.get_balance(ADDR, Network::Testnet).await.unwrap(), None);
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/addr/{ADDR}/utxo"));
                then.status(200).body("<html>oops</html>");
            })
            .await;

        let client = ExplorerClient::new(server.base_url());
        let err = client.utxos(ADDR).await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(client.get_utxos(ADDR).await.is_empty());
    }

    #[tokio::test]
    async fn unreachable_explorer_yields_empty_values() {
        let client = ExplorerClient::with_timeout("http://127.0.0.1:9", Duration::from_secs(2))
            .unwrap();

        assert!(matches!(
            client.balance(ADDR).await.unwrap_err(),
            Error::Network(_)
        ));
        assert_eq!(client.get_balance(ADDR, Network::Testnet).await.unwrap(), None);
        assert!(client.get_transaction(TXID).await.is_empty());
        assert!(client.get_history(ADDR, 1, 10).await.is_empty());
        assert!(client.get_utxos(ADDR).await.is_empty());
        assert_eq!(client.broadcast("0100").await, None);
    }

    #[ignore]
    #[tokio::test]
    pub async fn manual_explorer_checks() {
        let client = ExplorerClient::from_config(&Config::default());

        client.balance(ADDR).await.unwrap();

        client.history(ADDR, HistoryRange::for_page(1, 10).unwrap()).await.unwrap();

        client.utxos(ADDR).await.unwrap();
    }
}
