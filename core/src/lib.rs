//! Litewallet Core - Litecoin wallet library
//!
//! Mnemonic wallets, block-explorer queries and signed P2PKH transfers for
//! Litecoin mainnet and testnet.
//!
//! Keys are derived with BIP39/BIP32 through a [`SigningProvider`], balances
//! and UTXOs come from an Insight-style explorer through [`BlockExplorer`],
//! and [`TransferBuilder`] ties both together. Read queries are lenient: a
//! failed request yields an empty value instead of an error (see
//! [`BlockExplorerExt`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use litewallet_core::{Client, Config, Network, TransferRequest};
//! use rust_decimal_macros::dec;
//!
//! let client = Client::from_config(Config::from_env()?);
//!
//! let mnemonic = client.create_mnemonic()?;
//! let wallet = client.derive_wallet(&mnemonic)?;
//! let balance = client.get_balance(&wallet.address).await?;
//!
//! let response = client
//!     .transfer(&TransferRequest {
//!         from_address: wallet.address.clone(),
//!         private_key: wallet.private_key.clone(),
//!         to_address: "msboCpAHFWoVrAVTvULxCzPjL5We3rv3r5".into(),
//!         amount: dec!(0.01),
//!         fee: 10_000,
//!         network: Network::Testnet,
//!     })
//!     .await?;
//! ```

pub mod address;
pub mod client;
pub mod coin_selection;
pub mod config;
pub mod error;
pub mod explorer;
pub mod hd_wallet;
pub mod keys;
pub mod signer;
pub mod transfer;
pub mod types;
pub mod wallet;

pub use address::{Address, AddressKind};
pub use client::Client;
pub use coin_selection::{Selection, select_for_amount};
pub use config::Config;
pub use error::{AddressRole, Error, Result};
pub use explorer::{BlockExplorer, BlockExplorerExt, ExplorerClient, ExplorerFuture};
pub use hd_wallet::HdWallet;
pub use signer::{LitecoinSigner, SignedTransaction, SigningProvider};
pub use transfer::{TransferBuilder, TransferRequest};
pub use types::{Network, UnspentOutput, Wallet};
pub use wallet::WalletDerivation;
