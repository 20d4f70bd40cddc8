//! Wallet creation and key/address helpers.
//!
//! [`WalletDerivation`] turns mnemonics into [`Wallet`]s at the configured
//! derivation path. It holds no secrets between calls.

use crate::address::Address;
use crate::config::Config;
use crate::error::Result;
use crate::hd_wallet::{DEFAULT_WORD_COUNT, HdWallet};
use crate::keys;
use crate::signer::SigningProvider;
use crate::types::{Network, Wallet};
use bitcoin::bip32::DerivationPath;
use std::sync::Arc;

/// Derives wallets from mnemonics using an injected signing provider.
///
/// # Example
///
/// ```rust,ignore
/// use litewallet_core::{Config, LitecoinSigner, Network, WalletDerivation};
///
/// let derivation = WalletDerivation::new(LitecoinSigner::new(), &Config::default());
/// let mnemonic = derivation.create_mnemonic()?;
/// let wallet = derivation.derive_wallet(&mnemonic, Network::Testnet)?;
/// ```
pub struct WalletDerivation<P: SigningProvider> {
    provider: Arc<P>,
    path: DerivationPath,
}

impl<P: SigningProvider> Clone for WalletDerivation<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            path: self.path.clone(),
        }
    }
}

impl<P: SigningProvider> WalletDerivation<P> {
    /// Create a wallet derivation service using the config's derivation path.
    pub fn new(provider: P, config: &Config) -> Self {
        Self::with_shared_provider(Arc::new(provider), config)
    }

    pub(crate) fn with_shared_provider(provider: Arc<P>, config: &Config) -> Self {
        Self {
            provider,
            path: config.derivation_path.clone(),
        }
    }

    /// The derivation path wallets are derived at.
    pub fn path(&self) -> &DerivationPath {
        &self.path
    }

    /// Generate a fresh random 12-word English mnemonic.
    pub fn create_mnemonic(&self) -> Result<String> {
        self.create_mnemonic_with_words(DEFAULT_WORD_COUNT)
    }

    /// Generate a fresh random mnemonic with the given number of words.
    pub fn create_mnemonic_with_words(&self, word_count: usize) -> Result<String> {
        // The network does not influence the phrase itself.
        let wallet = HdWallet::generate(Network::Mainnet, word_count)?;
        Ok(wallet.mnemonic_phrase())
    }

    /// Derive the wallet for `mnemonic` on `network`.
    ///
    /// Fails with [`crate::Error::InvalidMnemonic`] if the phrase does not pass
    /// the English wordlist checksum.
    pub fn derive_wallet(&self, mnemonic: &str, network: Network) -> Result<Wallet> {
        let wallet = HdWallet::from_mnemonic(mnemonic, network)?;
        wallet.derive_wallet(self.provider.as_ref(), &self.path)
    }

    /// Address controlled by `private_key` (hex or WIF) on `network`.
    pub fn address_from_private_key(&self, private_key: &str, network: Network) -> Result<Address> {
        let key = keys::parse_private_key(private_key, network)?;
        Ok(self.provider.to_address(&key, network))
    }
}
