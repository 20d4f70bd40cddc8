//! Hierarchical Deterministic (HD) wallet implementation.
//!
//! This module provides BIP39/BIP32 key derivation for Litecoin wallets.

use crate::error::{Error, Result};
use crate::keys;
use crate::signer::SigningProvider;
use crate::types::{Network, Wallet};
use anyhow::Context;
use bip39::{Language, Mnemonic};
use bitcoin::PrivateKey;
use bitcoin::bip32::DerivationPath;

/// Default number of words in a generated mnemonic.
pub const DEFAULT_WORD_COUNT: usize = 12;

/// HD Wallet for Litecoin key derivation.
pub struct HdWallet {
    mnemonic: Mnemonic,
    network: Network,
}

impl HdWallet {
    /// Generate a new HD wallet with a random mnemonic.
    ///
    /// # Arguments
    /// * `network` - Litecoin network to use
    /// * `word_count` - Number of words (12, 15, 18, 21, or 24)
    pub fn generate(network: Network, word_count: usize) -> Result<Self> {
        use rand::rngs::OsRng;

        let mnemonic = Mnemonic::generate_in_with(&mut OsRng, Language::English, word_count)
            .map_err(|e| Error::KeyDerivation(format!("Failed to generate mnemonic: {}", e)))?;

        Ok(Self { mnemonic, network })
    }

    /// Create an HD wallet from an existing mnemonic phrase.
    ///
    /// The phrase must pass checksum validation against the English wordlist.
    pub fn from_mnemonic(phrase: &str, network: Network) -> Result<Self> {
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase.trim())
            .map_err(|e| Error::InvalidMnemonic(format!("{}", e)))?;

        Ok(Self { mnemonic, network })
    }

    /// Get the mnemonic phrase as a string.
    pub fn mnemonic_phrase(&self) -> String {
        self.mnemonic.to_string()
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Derive the private key at `path`.
    pub fn derive_key<P: SigningProvider + ?Sized>(
        &self,
        provider: &P,
        path: &DerivationPath,
    ) -> Result<PrivateKey> {
        // No passphrase.
        let seed = self.mnemonic.to_seed("");
        let root = provider.derive_root(&seed, self.network)?;
        let child = provider
            .derive_child(&root, path)
            .context("failed to derive wallet key")
            .map_err(|e| Error::KeyDerivation(format!("{:#}", e)))?;

        Ok(PrivateKey::new(
            child.private_key,
            self.network.network_kind(),
        ))
    }

    /// Derive the wallet (address and hex private key) at `path`.
    pub fn derive_wallet<P: SigningProvider + ?Sized>(
        &self,
        provider: &P,
        path: &DerivationPath,
    ) -> Result<Wallet> {
        let key = self.derive_key(provider, path)?;
        let address = provider.to_address(&key, self.network);

        Ok(Wallet {
            address: address.to_string(),
            private_key: keys::to_hex(&key),
        })
    }
}
