//! API types for the Insight block-explorer API.
//!
//! These types follow the explorer's JSON schema. Every field is optional or
//! defaulted so partial and older responses still decode; the `Default` value
//! of each response type is what callers receive when a request fails.

use crate::error::{Error, Result};
use crate::types::UnspentOutput;
use bitcoin::{ScriptBuf, Txid};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Index range of a history request (`from` and `to` are inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryRange {
    pub from: u64,
    pub to: u64,
}

impl HistoryRange {
    /// Range requested for a history page.
    ///
    /// Page 1 covers `[0, page_size - 1]`. Any other page covers
    /// `[page * page_size, page * page_size + page_size - 1]`, so page 2 starts
    /// at `2 * page_size`. Explorer-side pagination relies on these exact
    /// indices.
    pub fn for_page(page: u32, page_size: u32) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::InvalidPage("page size must be at least 1".into()));
        }

        let size = page_size as u64;
        let from = if page == 1 { 0 } else { page as u64 * size };

        Ok(Self {
            from,
            to: from + size - 1,
        })
    }
}

/// Script signature of a transaction input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptSig {
    pub hex: String,
    pub asm: String,
}

/// Locking script of a transaction output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptPubKey {
    pub hex: String,
    pub asm: String,
    pub addresses: Vec<String>,
    #[serde(rename = "type")]
    pub script_type: Option<String>,
}

/// Transaction input as reported by the explorer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TxInput {
    pub txid: Option<String>,
    pub vout: Option<u32>,
    pub coinbase: Option<String>,
    pub sequence: Option<u64>,
    pub n: u32,
    pub script_sig: Option<ScriptSig>,
    pub addr: Option<String>,
    pub value_sat: Option<u64>,
    pub value: Option<Decimal>,
    #[serde(rename = "doubleSpentTxID")]
    pub double_spent_tx_id: Option<String>,
}

/// Transaction output as reported by the explorer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TxOutput {
    /// Value in coins (the explorer sends it as a decimal string).
    pub value: Option<Decimal>,
    pub n: u32,
    pub script_pub_key: Option<ScriptPubKey>,
    pub spent_tx_id: Option<String>,
    pub spent_index: Option<u32>,
    pub spent_height: Option<i64>,
}

/// A transaction record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Transaction {
    pub txid: String,
    pub version: u32,
    pub locktime: u32,
    pub vin: Vec<TxInput>,
    pub vout: Vec<TxOutput>,
    pub blockhash: Option<String>,
    /// `-1` while unconfirmed.
    pub blockheight: Option<i64>,
    pub confirmations: u64,
    pub time: Option<u64>,
    pub blocktime: Option<u64>,
    pub is_coin_base: bool,
    pub value_out: Option<Decimal>,
    pub size: Option<u64>,
    pub value_in: Option<Decimal>,
    pub fees: Option<Decimal>,
}

impl Transaction {
    /// True for the empty record returned when a lookup failed.
    pub fn is_empty(&self) -> bool {
        self == &Transaction::default()
    }
}

/// A page of an address's transaction history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionList {
    pub total_items: u64,
    pub from: u64,
    pub to: u64,
    pub items: Vec<Transaction>,
}

impl TransactionList {
    /// True for the empty page returned when a lookup failed.
    pub fn is_empty(&self) -> bool {
        self == &TransactionList::default()
    }
}

/// Unspent output as reported by the explorer's UTXO endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerUtxo {
    pub address: String,
    pub txid: String,
    pub vout: u32,
    pub script_pub_key: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    pub satoshis: u64,
    #[serde(default)]
    pub height: Option<u64>,
    #[serde(default)]
    pub confirmations: Option<u64>,
}

impl ExplorerUtxo {
    /// Convert into the SDK's [`UnspentOutput`].
    pub fn into_unspent(self) -> Result<UnspentOutput> {
        let txid = Txid::from_str(&self.txid)
            .map_err(|e| Error::Parse(format!("Invalid UTXO txid {}: {}", self.txid, e)))?;
        let script = ScriptBuf::from_hex(&self.script_pub_key).map_err(|e| {
            Error::Parse(format!(
                "Invalid UTXO script {}: {}",
                self.script_pub_key, e
            ))
        })?;

        Ok(UnspentOutput {
            txid,
            output_index: self.vout,
            address: self.address,
            script,
            satoshis: self.satoshis,
        })
    }
}

/// Form body of the broadcast endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastRequest<'a> {
    pub rawtx: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn first_page_starts_at_zero() {
        assert_eq!(
            HistoryRange::for_page(1, 10).unwrap(),
            HistoryRange { from: 0, to: 9 }
        );
    }

    #[test]
    fn second_page_skips_a_page() {
        assert_eq!(
            HistoryRange::for_page(2, 10).unwrap(),
            HistoryRange { from: 20, to: 29 }
        );
        assert_eq!(
            HistoryRange::for_page(3, 5).unwrap(),
            HistoryRange { from: 15, to: 19 }
        );
    }

    #[test]
    fn page_zero_and_empty_pages() {
        assert_eq!(
            HistoryRange::for_page(0, 10).unwrap(),
            HistoryRange { from: 0, to: 9 }
        );
        assert!(matches!(
            HistoryRange::for_page(1, 0).unwrap_err(),
            Error::InvalidPage(_)
        ));
    }

    #[test]
    fn decodes_insight_transaction() {
        let body = json!({
            "txid": "91f7f871584ea0050b1adec8c26ff0f38f7fce096a474186b289915464458cdb",
            "version": 1,
            "locktime": 0,
            "vin": [{
                "txid": "aa2f0a1ba6d5e7e2c6e5f7b9b1b6f0c2d7a4e2b1c9d8f7e6a5b4c3d2e1f0a9b8",
                "vout": 1,
                "sequence": 4294967295u64,
                "n": 0,
                "scriptSig": {"hex": "4830", "asm": "3045"},
                "addr": "muZpTpBYhxmRFuCjLc7C6BBDF32C8XVJUi",
                "valueSat": 150000000,
                "value": 1.5,
                "doubleSpentTxID": null
            }],
            "vout": [{
                "value": "0.50000000",
                "n": 0,
                "scriptPubKey": {
                    "hex": "76a914",
                    "asm": "OP_DUP",
                    "addresses": ["msboCpAHFWoVrAVTvULxCzPjL5We3rv3r5"],
                    "type": "pubkeyhash"
                },
                "spentTxId": null,
                "spentIndex": null,
                "spentHeight": null
            }],
            "blockhash": "00000000",
            "blockheight": 1234,
            "confirmations": 3,
            "time": 1530000000,
            "blocktime": 1530000000,
            "valueOut": 1.4999,
            "size": 225,
            "valueIn": 1.5,
            "fees": 0.0001
        });

        let tx: Transaction = serde_json::from_value(body).unwrap();
        assert_eq!(tx.confirmations, 3);
        assert_eq!(tx.vin[0].value_sat, Some(150_000_000));
        assert_eq!(tx.vout[0].value, Some(dec!(0.5)));
        assert_eq!(
            tx.vout[0].script_pub_key.as_ref().unwrap().script_type.as_deref(),
            Some("pubkeyhash")
        );
        assert!(!tx.is_empty());
    }

    #[test]
    fn empty_object_is_default() {
        let tx: Transaction = serde_json::from_str("{}").unwrap();
        assert!(tx.is_empty());
        let list: TransactionList = serde_json::from_str("{}").unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn utxo_maps_to_unspent_output() {
        let utxo: ExplorerUtxo = serde_json::from_value(json!({
            "address": "muZpTpBYhxmRFuCjLc7C6BBDF32C8XVJUi",
            "txid": "91f7f871584ea0050b1adec8c26ff0f38f7fce096a474186b289915464458cdb",
            "vout": 1,
            "scriptPubKey": "76a91499d1c8d6e1c4ec4d2f9b0a4c0a2bfa21e1b1f2ba88ac",
            "amount": 0.3,
            "satoshis": 30000000,
            "height": 100,
            "confirmations": 6
        }))
        .unwrap();

        let unspent = utxo.into_unspent().unwrap();
        assert_eq!(unspent.output_index, 1);
        assert_eq!(unspent.satoshis, 30_000_000);
        assert!(unspent.script.is_p2pkh());
        assert_eq!(
            unspent.txid.to_string(),
            "91f7f871584ea0050b1adec8c26ff0f38f7fce096a474186b289915464458cdb"
        );
    }

    #[test]
    fn utxo_with_bad_script_is_parse_error() {
        let utxo = ExplorerUtxo {
            address: String::new(),
            txid: "91f7f871584ea0050b1adec8c26ff0f38f7fce096a474186b289915464458cdb".into(),
            vout: 0,
            script_pub_key: "zz".into(),
            amount: None,
            satoshis: 1,
            height: None,
            confirmations: None,
        };
        assert!(matches!(utxo.into_unspent().unwrap_err(), Error::Parse(_)));
    }
}
