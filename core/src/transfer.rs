//! Building, signing and broadcasting transfers.
//!
//! A transfer validates everything it can before touching the explorer, then
//! checks the balance, picks UTXOs, signs a legacy P2PKH transaction and
//! hands the raw hex to the explorer. Each step awaits the previous one.

use crate::address::Address;
use crate::coin_selection::select_for_amount;
use crate::error::{AddressRole, Error, Result};
use crate::explorer::{BlockExplorer, BlockExplorerExt};
use crate::keys;
use crate::signer::{DUST_THRESHOLD, SignedTransaction, SigningProvider};
use crate::types::{Network, to_satoshis};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Parameters of a single transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Address funding the transfer; change returns here.
    pub from_address: String,
    /// Key controlling `from_address`, as hex or WIF.
    pub private_key: String,
    pub to_address: String,
    /// Amount to send, in coins.
    pub amount: Decimal,
    /// Absolute fee in satoshis.
    pub fee: u64,
    pub network: Network,
}

/// Validated inputs of a transfer.
struct Checked {
    from: Address,
    to: Address,
    key: bitcoin::PrivateKey,
    amount: u64,
}

/// Builds and submits transfers against an explorer and a signing provider.
pub struct TransferBuilder<E: BlockExplorer, P: SigningProvider> {
    explorer: Arc<E>,
    provider: Arc<P>,
}

impl<E: BlockExplorer, P: SigningProvider> Clone for TransferBuilder<E, P> {
    fn clone(&self) -> Self {
        Self {
            explorer: Arc::clone(&self.explorer),
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<E: BlockExplorer, P: SigningProvider> TransferBuilder<E, P> {
    pub fn new(explorer: E, provider: P) -> Self {
        Self::with_shared(Arc::new(explorer), Arc::new(provider))
    }

    pub(crate) fn with_shared(explorer: Arc<E>, provider: Arc<P>) -> Self {
        Self { explorer, provider }
    }

    pub fn explorer(&self) -> &E {
        &self.explorer
    }

    /// Send `request.amount` and return the explorer's broadcast response.
    ///
    /// Address, key and amount problems are reported before any explorer
    /// request. `Ok(None)` means the transaction was signed but the explorer
    /// could not be reached to broadcast it.
    pub async fn transfer(&self, request: &TransferRequest) -> Result<Option<String>> {
        let signed = self.prepare(request).await?;
        let raw = signed.to_hex();

        log::info!(
            "Broadcasting {} ({} bytes, fee {} sat)",
            signed.txid(),
            raw.len() / 2,
            signed.fee()
        );
        Ok(self.explorer.broadcast(&raw).await)
    }

    /// Build and sign the transfer without broadcasting it.
    pub async fn prepare(&self, request: &TransferRequest) -> Result<SignedTransaction> {
        let checked = self.check(request)?;
        let required = checked.amount.checked_add(request.fee).ok_or_else(|| {
            Error::InvalidAmount(format!("{} plus fee overflows", request.amount))
        })?;

        let balance = self.explorer.balance(&request.from_address).await?;
        log::debug!(
            "Balance of {}: {} sat, required {} sat",
            request.from_address,
            balance,
            required
        );
        if required > balance {
            return Err(Error::InsufficientBalance {
                required,
                available: balance,
            });
        }

        let utxos = self.explorer.utxos(&request.from_address).await?;
        let selection = select_for_amount(&utxos, required);
        log::debug!(
            "Selected {} of {} outputs worth {} sat",
            selection.len(),
            utxos.len(),
            selection.total()
        );
        if !selection.covers(required) {
            return Err(Error::InsufficientBalance {
                required,
                available: selection.total(),
            });
        }

        let tx = self.provider.build_transaction(
            &selection.outputs,
            &checked.to,
            checked.amount,
            &checked.from,
            request.fee,
        )?;
        self.provider.sign(tx, &selection.outputs, &checked.key)
    }

    fn check(&self, request: &TransferRequest) -> Result<Checked> {
        let network = request.network;
        let from =
            self.provider
                .validate_address(&request.from_address, network, AddressRole::From)?;
        let to = self
            .provider
            .validate_address(&request.to_address, network, AddressRole::To)?;

        let key = keys::parse_private_key(&request.private_key, network)?;
        if self.provider.to_address(&key, network) != from {
            return Err(Error::InvalidKey(format!(
                "key does not control from address {}",
                request.from_address
            )));
        }

        let amount = to_satoshis(request.amount)?;
        if amount == 0 {
            return Err(Error::InvalidAmount("amount must be positive".into()));
        }
        if amount < DUST_THRESHOLD {
            return Err(Error::InvalidAmount(format!(
                "{} satoshis is below the dust threshold of {}",
                amount, DUST_THRESHOLD
            )));
        }

        Ok(Checked {
            from,
            to,
            key,
            amount,
        })
    }
}
