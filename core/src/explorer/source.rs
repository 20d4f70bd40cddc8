//! Async block-explorer abstraction.
//!
//! There are two layers:
//! - `BlockExplorer`: typed access to the explorer. Every call returns a
//!   `Result`, so transport and decoding failures are visible.
//! - `BlockExplorerExt`: lenient projections of the typed calls. Failures are
//!   logged and replaced by an empty value (`None`, an empty record, or an
//!   empty list), so callers cannot tell "nothing there" from "explorer
//!   unreachable". Address validation still fails loudly, before any request.

use super::types::{HistoryRange, Transaction, TransactionList};
use crate::address::Address;
use crate::error::Result;
use crate::types::{Network, UnspentOutput, from_satoshis};
use rust_decimal::Decimal;
use std::future::Future;
use std::pin::Pin;

/// Boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Type alias for explorer futures.
pub type ExplorerFuture<'a, T> = BoxFuture<'a, Result<T>>;

/// Typed access to a block explorer.
///
/// Implementations must not hold on to the borrowed arguments past the call;
/// copy what the returned future needs.
pub trait BlockExplorer: Send + Sync {
    /// Confirmed plus unconfirmed balance of `address`, in satoshis.
    fn balance(&self, address: &str) -> ExplorerFuture<'_, u64>;

    /// Transaction record by id.
    fn transaction(&self, txid: &str) -> ExplorerFuture<'_, Transaction>;

    /// Transactions touching `address` within `range`.
    fn history(&self, address: &str, range: HistoryRange) -> ExplorerFuture<'_, TransactionList>;

    /// Unspent outputs of `address`.
    fn utxos(&self, address: &str) -> ExplorerFuture<'_, Vec<UnspentOutput>>;

    /// Submit a raw transaction. Resolves to the explorer's response body
    /// whatever its HTTP status; only transport failures are errors.
    fn broadcast_raw(&self, raw_tx: &str) -> ExplorerFuture<'_, String>;
}

/// Lenient explorer calls that swallow failures.
///
/// Automatically implemented for every [`BlockExplorer`].
pub trait BlockExplorerExt: BlockExplorer {
    /// Balance of `address` in coins.
    ///
    /// Returns `Err` only if the address is not valid for `network`; a failed
    /// request yields `Ok(None)`.
    fn get_balance<'a>(
        &'a self,
        address: &'a str,
        network: Network,
    ) -> BoxFuture<'a, Result<Option<Decimal>>> {
        Box::pin(async move {
            Address::parse(address, network)?;

            match self.balance(address).await {
                Ok(sats) => Ok(Some(from_satoshis(sats))),
                Err(e) => {
                    log::warn!("Balance lookup for {} failed: {}", address, e);
                    Ok(None)
                }
            }
        })
    }

    /// Transaction by id, or an empty record on failure.
    fn get_transaction<'a>(&'a self, txid: &'a str) -> BoxFuture<'a, Transaction> {
        Box::pin(async move {
            self.transaction(txid).await.unwrap_or_else(|e| {
                log::warn!("Transaction lookup for {} failed: {}", txid, e);
                Transaction::default()
            })
        })
    }

    /// History page of `address`, or an empty page on failure.
    fn get_history<'a>(
        &'a self,
        address: &'a str,
        page: u32,
        page_size: u32,
    ) -> BoxFuture<'a, TransactionList> {
        Box::pin(async move {
            let result = match HistoryRange::for_page(page, page_size) {
                Ok(range) => self.history(address, range).await,
                Err(e) => Err(e),
            };

            result.unwrap_or_else(|e| {
                log::warn!("History lookup for {} failed: {}", address, e);
                TransactionList::default()
            })
        })
    }

    /// Unspent outputs of `address`, or an empty list on failure.
    fn get_utxos<'a>(&'a self, address: &'a str) -> BoxFuture<'a, Vec<UnspentOutput>> {
        Box::pin(async move {
            self.utxos(address).await.unwrap_or_else(|e| {
                log::warn!("UTXO lookup for {} failed: {}", address, e);
                Vec::new()
            })
        })
    }

    /// Broadcast a raw transaction; `None` if the explorer could not be reached.
    fn broadcast<'a>(&'a self, raw_tx: &'a str) -> BoxFuture<'a, Option<String>> {
        Box::pin(async move {
            match self.broadcast_raw(raw_tx).await {
                Ok(body) => Some(body),
                Err(e) => {
                    log::warn!("Broadcast failed: {}", e);
                    None
                }
            }
        })
    }
}

// Blanket implementation for all BlockExplorer types
impl<T: BlockExplorer + ?Sized> BlockExplorerExt for T {}
