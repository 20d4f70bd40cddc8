//! Signing provider: the seam to the external key and transaction library.
//!
//! Everything cryptographic (BIP-32 derivation, key hashing, sighash
//! computation, ECDSA) is delegated to the `bitcoin` crate. Litecoin shares
//! Bitcoin's legacy transaction format and sighash algorithm, so only the
//! address and key prefixes differ.

use crate::address::Address;
use crate::error::{AddressRole, Error, Result};
use crate::types::{Network, UnspentOutput};
use bitcoin::absolute::LockTime;
use bitcoin::bip32::{DerivationPath, Xpriv};
use bitcoin::consensus::encode::serialize_hex;
use bitcoin::hashes::Hash;
use bitcoin::key::Secp256k1;
use bitcoin::script::PushBytesBuf;
use bitcoin::secp256k1::{All, Message};
use bitcoin::sighash::{EcdsaSighashType, SighashCache};
use bitcoin::transaction::Version;
use bitcoin::{
    Amount, OutPoint, PrivateKey, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness,
};

/// Payments below this value are refused; change below it goes to the fee.
pub const DUST_THRESHOLD: u64 = 546;

/// A fully signed transaction ready for broadcast.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    tx: Transaction,
    fee: u64,
}

impl SignedTransaction {
    /// Consensus-encoded transaction as lowercase hex.
    pub fn to_hex(&self) -> String {
        serialize_hex(&self.tx)
    }

    pub fn txid(&self) -> Txid {
        self.tx.compute_txid()
    }

    /// Fee paid, in satoshis, including any dust folded into it.
    pub fn fee(&self) -> u64 {
        self.fee
    }

    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }
}

/// Capabilities required from a wallet/signing library.
pub trait SigningProvider: Send + Sync {
    /// Derive the root extended private key from a seed.
    fn derive_root(&self, seed: &[u8], network: Network) -> Result<Xpriv>;

    /// Derive a child key from `root` along `path`.
    fn derive_child(&self, root: &Xpriv, path: &DerivationPath) -> Result<Xpriv>;

    /// P2PKH address controlled by `key`.
    fn to_address(&self, key: &PrivateKey, network: Network) -> Address;

    /// Validate an address for `network`, reporting failures against `role`.
    fn validate_address(
        &self,
        address: &str,
        network: Network,
        role: AddressRole,
    ) -> Result<Address>;

    /// Build an unsigned transaction spending `inputs`, paying `amount` to
    /// `recipient` and returning change to `change`.
    fn build_transaction(
        &self,
        inputs: &[UnspentOutput],
        recipient: &Address,
        amount: u64,
        change: &Address,
        fee: u64,
    ) -> Result<Transaction>;

    /// Sign every input of `tx`. `inputs` are the outputs being spent, in order.
    fn sign(
        &self,
        tx: Transaction,
        inputs: &[UnspentOutput],
        key: &PrivateKey,
    ) -> Result<SignedTransaction>;
}

/// [`SigningProvider`] backed by the `bitcoin` crate.
#[derive(Clone)]
pub struct LitecoinSigner {
    secp: Secp256k1<All>,
}

impl LitecoinSigner {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::new(),
        }
    }
}

impl Default for LitecoinSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LitecoinSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LitecoinSigner").finish_non_exhaustive()
    }
}

impl SigningProvider for LitecoinSigner {
    fn derive_root(&self, seed: &[u8], network: Network) -> Result<Xpriv> {
        Xpriv::new_master(network.network_kind(), seed)
            .map_err(|e| Error::KeyDerivation(format!("Failed to derive master key: {}", e)))
    }

    fn derive_child(&self, root: &Xpriv, path: &DerivationPath) -> Result<Xpriv> {
        root.derive_priv(&self.secp, path)
            .map_err(|e| Error::KeyDerivation(format!("Key derivation failed: {}", e)))
    }

    fn to_address(&self, key: &PrivateKey, network: Network) -> Address {
        Address::p2pkh(&key.public_key(&self.secp), network)
    }

    fn validate_address(
        &self,
        address: &str,
        network: Network,
        role: AddressRole,
    ) -> Result<Address> {
        Address::parse_as(address, network, role)
    }

    fn build_transaction(
        &self,
        inputs: &[UnspentOutput],
        recipient: &Address,
        amount: u64,
        change: &Address,
        fee: u64,
    ) -> Result<Transaction> {
        if inputs.is_empty() {
            return Err(Error::Signing("No inputs to spend".into()));
        }
        if amount < DUST_THRESHOLD {
            return Err(Error::InvalidAmount(format!(
                "{} satoshis is below the dust threshold of {}",
                amount, DUST_THRESHOLD
            )));
        }

        let total: u64 = inputs.iter().map(|u| u.satoshis).sum();
        let required = amount.saturating_add(fee);
        if total < required {
            return Err(Error::InsufficientBalance {
                required,
                available: total,
            });
        }

        let input = inputs
            .iter()
            .map(|utxo| TxIn {
                previous_output: OutPoint::new(utxo.txid, utxo.output_index),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::MAX,
                witness: Witness::new(),
            })
            .collect();

        let mut output = vec![TxOut {
            value: Amount::from_sat(amount),
            script_pubkey: recipient.script_pubkey(),
        }];

        let change_value = total - required;
        if change_value >= DUST_THRESHOLD {
            output.push(TxOut {
                value: Amount::from_sat(change_value),
                script_pubkey: change.script_pubkey(),
            });
        } else if change_value > 0 {
            log::debug!("Dropping {} satoshis of dust change into the fee", change_value);
        }

        Ok(Transaction {
            version: Version::ONE,
            lock_time: LockTime::ZERO,
            input,
            output,
        })
    }

    fn sign(
        &self,
        mut tx: Transaction,
        inputs: &[UnspentOutput],
        key: &PrivateKey,
    ) -> Result<SignedTransaction> {
        if tx.input.len() != inputs.len() {
            return Err(Error::Signing(format!(
                "Transaction has {} inputs but {} spent outputs were given",
                tx.input.len(),
                inputs.len()
            )));
        }

        let public_key = key.public_key(&self.secp);
        let own_script = ScriptBuf::new_p2pkh(&public_key.pubkey_hash());

        let script_sigs = {
            let cache = SighashCache::new(&tx);
            let mut script_sigs = Vec::with_capacity(inputs.len());
            for (index, utxo) in inputs.iter().enumerate() {
                if utxo.script != own_script {
                    return Err(Error::Signing(format!(
                        "Input {}:{} is not locked to the signing key",
                        utxo.txid, utxo.output_index
                    )));
                }

                let sighash = cache
                    .legacy_signature_hash(index, &utxo.script, EcdsaSighashType::All.to_u32())
                    .map_err(|e| Error::Signing(format!("Failed to compute sighash: {}", e)))?;
                let message = Message::from_digest(sighash.to_byte_array());
                let signature =
                    bitcoin::ecdsa::Signature::sighash_all(self.secp.sign_ecdsa(&message, &key.inner));

                let push = PushBytesBuf::try_from(signature.to_vec())
                    .map_err(|e| Error::Signing(format!("Signature too large: {}", e)))?;
                script_sigs.push(
                    ScriptBuf::builder()
                        .push_slice(push)
                        .push_key(&public_key)
                        .into_script(),
                );
            }
            script_sigs
        };

        for (input, script_sig) in tx.input.iter_mut().zip(script_sigs) {
            input.script_sig = script_sig;
        }

        let spent: u64 = inputs.iter().map(|u| u.satoshis).sum();
        let paid: u64 = tx.output.iter().map(|o| o.value.to_sat()).sum();

        Ok(SignedTransaction {
            fee: spent.saturating_sub(paid),
            tx,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::parse_private_key;
    use bitcoin::script::Instruction;
    use std::str::FromStr;

    const KEY_HEX: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const RECIPIENT: &str = "msboCpAHFWoVrAVTvULxCzPjL5We3rv3r5";

    fn utxo(signer: &LitecoinSigner, key: &PrivateKey, byte: u8, satoshis: u64) -> UnspentOutput {
        let address = signer.to_address(key, Network::Testnet);
        UnspentOutput {
            txid: Txid::from_str(&hex::encode([byte; 32])).unwrap(),
            output_index: byte as u32,
            address: address.to_string(),
            script: address.script_pubkey(),
            satoshis,
        }
    }

    #[test]
    fn builds_payment_and_change() {
        let signer = LitecoinSigner::new();
        let key = parse_private_key(KEY_HEX, Network::Testnet).unwrap();
        let from = signer.to_address(&key, Network::Testnet);
        let to = Address::parse(RECIPIENT, Network::Testnet).unwrap();
        let inputs = vec![utxo(&signer, &key, 1, 30_000), utxo(&signer, &key, 2, 40_000)];

        let tx = signer
            .build_transaction(&inputs, &to, 50_000, &from, 1_000)
            .unwrap();

        assert_eq!(tx.input.len(), 2);
        assert_eq!(tx.output.len(), 2);
        assert_eq!(tx.output[0].value.to_sat(), 50_000);
        assert_eq!(tx.output[0].script_pubkey, to.script_pubkey());
        assert_eq!(tx.output[1].value.to_sat(), 19_000);
        assert_eq!(tx.output[1].script_pubkey, from.script_pubkey());
    }

    #[test]
    fn dust_change_is_dropped() {
        let signer = LitecoinSigner::new();
        let key = parse_private_key(KEY_HEX, Network::Testnet).unwrap();
        let from = signer.to_address(&key, Network::Testnet);
        let to = Address::parse(RECIPIENT, Network::Testnet).unwrap();
        let inputs = vec![utxo(&signer, &key, 1, 51_100)];

        let tx = signer
            .build_transaction(&inputs, &to, 50_000, &from, 1_000)
            .unwrap();
        assert_eq!(tx.output.len(), 1);

        let signed = signer.sign(tx, &inputs, &key).unwrap();
        assert_eq!(signed.fee(), 1_100);
    }

    #[test]
    fn short_inputs_are_rejected() {
        let signer = LitecoinSigner::new();
        let key = parse_private_key(KEY_HEX, Network::Testnet).unwrap();
        let from = signer.to_address(&key, Network::Testnet);
        let to = Address::parse(RECIPIENT, Network::Testnet).unwrap();
        let inputs = vec![utxo(&signer, &key, 1, 700)];

        let err = signer
            .build_transaction(&inputs, &to, 1_000, &from, 0)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientBalance {
                required: 1_000,
                available: 700
            }
        ));
    }

    #[test]
    fn dust_payment_is_rejected() {
        let signer = LitecoinSigner::new();
        let key = parse_private_key(KEY_HEX, Network::Testnet).unwrap();
        let from = signer.to_address(&key, Network::Testnet);
        let to = Address::parse(RECIPIENT, Network::Testnet).unwrap();
        let inputs = vec![utxo(&signer, &key, 1, 100_000)];

        let err = signer
            .build_transaction(&inputs, &to, DUST_THRESHOLD - 1, &from, 1_000)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidAmount(_)));

        let tx = signer
            .build_transaction(&inputs, &to, DUST_THRESHOLD, &from, 1_000)
            .unwrap();
        assert_eq!(tx.output[0].value.to_sat(), DUST_THRESHOLD);
    }

    #[test]
    fn signatures_verify_against_legacy_sighash() {
        let signer = LitecoinSigner::new();
        let key = parse_private_key(KEY_HEX, Network::Testnet).unwrap();
        let public_key = key.public_key(&signer.secp);
        let from = signer.to_address(&key, Network::Testnet);
        let to = Address::parse(RECIPIENT, Network::Testnet).unwrap();
        let inputs = vec![utxo(&signer, &key, 1, 30_000), utxo(&signer, &key, 2, 40_000)];

        let unsigned = signer
            .build_transaction(&inputs, &to, 50_000, &from, 1_000)
            .unwrap();
        let signed = signer.sign(unsigned.clone(), &inputs, &key).unwrap();
        assert_eq!(signed.fee(), 1_000);

        let cache = SighashCache::new(&unsigned);
        for (index, input) in signed.transaction().input.iter().enumerate() {
            let pushes: Vec<_> = input
                .script_sig
                .instructions()
                .map(|i| match i.unwrap() {
                    Instruction::PushBytes(bytes) => bytes.as_bytes().to_vec(),
                    Instruction::Op(op) => panic!("unexpected opcode {op:?}"),
                })
                .collect();
            assert_eq!(pushes.len(), 2);
            assert_eq!(pushes[1], public_key.to_bytes());

            let signature = bitcoin::ecdsa::Signature::from_slice(&pushes[0]).unwrap();
            assert_eq!(signature.sighash_type, EcdsaSighashType::All);

            let sighash = cache
                .legacy_signature_hash(index, &inputs[index].script, EcdsaSighashType::All.to_u32())
                .unwrap();
            let message = Message::from_digest(sighash.to_byte_array());
            signer
                .secp
                .verify_ecdsa(&message, &signature.signature, &public_key.inner)
                .unwrap();
        }

        let decoded: Transaction =
            bitcoin::consensus::encode::deserialize(&hex::decode(signed.to_hex()).unwrap())
                .unwrap();
        assert_eq!(decoded.compute_txid(), signed.txid());
    }

    #[test]
    fn foreign_inputs_are_refused() {
        let signer = LitecoinSigner::new();
        let key = parse_private_key(KEY_HEX, Network::Testnet).unwrap();
        let to = Address::parse(RECIPIENT, Network::Testnet).unwrap();
        let mut foreign = utxo(&signer, &key, 1, 100_000);
        foreign.script = to.script_pubkey();

        let tx = signer
            .build_transaction(std::slice::from_ref(&foreign), &to, 50_000, &to, 1_000)
            .unwrap();
        let err = signer.sign(tx, &[foreign], &key).unwrap_err();
        assert!(matches!(err, Error::Signing(_)));
    }
}
