use crate::address::Address;
use crate::config::Config;
use crate::explorer::{BlockExplorer, BlockExplorerExt, ExplorerClient, Transaction, TransactionList};
use crate::signer::{LitecoinSigner, SignedTransaction, SigningProvider};
use crate::transfer::{TransferBuilder, TransferRequest};
use crate::types::{Network, UnspentOutput, Wallet};
use crate::wallet::WalletDerivation;
use rust_decimal::Decimal;
use std::sync::Arc;

/// The main client for a Litecoin wallet.
///
/// The client is parameterized by two backends:
/// - `E`: Block explorer used for queries and broadcasting
/// - `P`: Signing provider used for key derivation and signing
///
/// Queries use the network from the [`Config`]; transfers carry their own.
pub struct Client<E: BlockExplorer, P: SigningProvider> {
    config: Config,
    wallet: WalletDerivation<P>,
    transfers: TransferBuilder<E, P>,
}

impl<E: BlockExplorer, P: SigningProvider> Clone for Client<E, P> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            wallet: self.wallet.clone(),
            transfers: self.transfers.clone(),
        }
    }
}

impl Client<ExplorerClient, LitecoinSigner> {
    /// Create a client talking HTTP to the configured explorer.
    pub fn from_config(config: Config) -> Self {
        let explorer = ExplorerClient::from_config(&config);
        Self::new(config, explorer, LitecoinSigner::new())
    }
}

impl<E: BlockExplorer, P: SigningProvider> Client<E, P> {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `config` - Network, explorer URL and derivation path
    /// * `explorer` - Block explorer backend
    /// * `provider` - Signing provider shared by derivation and transfers
    pub fn new(config: Config, explorer: E, provider: P) -> Self {
        let provider = Arc::new(provider);
        let wallet = WalletDerivation::with_shared_provider(Arc::clone(&provider), &config);
        let transfers = TransferBuilder::with_shared(Arc::new(explorer), provider);

        Self {
            config,
            wallet,
            transfers,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn network(&self) -> Network {
        self.config.network
    }

    pub fn explorer(&self) -> &E {
        self.transfers.explorer()
    }

    pub fn wallet(&self) -> &WalletDerivation<P> {
        &self.wallet
    }

    // =========================================================================
    // Wallet Operations
    // =========================================================================

    pub fn create_mnemonic(&self) -> crate::Result<String> {
        self.wallet.create_mnemonic()
    }

    /// Derive the wallet of `mnemonic` on the configured network.
    pub fn derive_wallet(&self, mnemonic: &str) -> crate::Result<Wallet> {
        self.wallet.derive_wallet(mnemonic, self.config.network)
    }

    pub fn address_from_private_key(&self, private_key: &str) -> crate::Result<Address> {
        self.wallet
            .address_from_private_key(private_key, self.config.network)
    }

    // =========================================================================
    // Explorer Queries
    // =========================================================================

    /// Balance in coins; `Ok(None)` if the explorer could not answer.
    pub async fn get_balance(&self, address: &str) -> crate::Result<Option<Decimal>> {
        self.explorer()
            .get_balance(address, self.config.network)
            .await
    }

    pub async fn get_transaction(&self, txid: &str) -> Transaction {
        self.explorer().get_transaction(txid).await
    }

    pub async fn get_history(&self, address: &str, page: u32, page_size: u32) -> TransactionList {
        self.explorer().get_history(address, page, page_size).await
    }

    pub async fn get_utxos(&self, address: &str) -> Vec<UnspentOutput> {
        self.explorer().get_utxos(address).await
    }

    pub async fn broadcast(&self, raw_tx: &str) -> Option<String> {
        self.explorer().broadcast(raw_tx).await
    }

    // =========================================================================
    // Transfers
    // =========================================================================

    pub async fn prepare_transfer(
        &self,
        request: &TransferRequest,
    ) -> crate::Result<SignedTransaction> {
        self.transfers.prepare(request).await
    }

    pub async fn transfer(&self, request: &TransferRequest) -> crate::Result<Option<String>> {
        self.transfers.transfer(request).await
    }
}
