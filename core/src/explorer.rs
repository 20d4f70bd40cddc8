//! Block-explorer API client, backend trait and types.
//!
//! This module provides types and an HTTP client for interacting with an
//! Insight-style Litecoin block explorer.

mod client;
mod source;
mod types;

pub use client::ExplorerClient;
pub use source::{BlockExplorer, BlockExplorerExt, BoxFuture, ExplorerFuture};
pub use types::*;

#[cfg(test)]
pub(crate) use source::memory;
