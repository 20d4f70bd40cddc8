//! Litecoin base58check addresses.
//!
//! The `bitcoin` crate's `Address` type is tied to Bitcoin's version bytes, so
//! addresses are encoded here with Litecoin's prefixes while the hashing,
//! base58check and script templates still come from `bitcoin`.

use crate::error::{AddressRole, Error, Result};
use crate::types::Network;
use bitcoin::base58;
use bitcoin::hashes::Hash;
use bitcoin::{PubkeyHash, PublicKey, Script, ScriptBuf, ScriptHash};

/// Address payload type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    /// Pay to public key hash.
    P2pkh,
    /// Pay to script hash.
    P2sh,
}

/// A validated address scoped to a network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    network: Network,
    kind: AddressKind,
    hash: [u8; 20],
}

impl Address {
    /// Parse and validate an address for `network`.
    pub fn parse(address: &str, network: Network) -> Result<Self> {
        Self::parse_as(address, network, AddressRole::Query)
    }

    /// Parse an address, reporting failures against the given role.
    pub fn parse_as(address: &str, network: Network, role: AddressRole) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidAddress(role, format!("{address}: {reason}"));

        let payload = base58::decode_check(address).map_err(|e| invalid(e.to_string()))?;
        if payload.len() != 21 {
            return Err(invalid(format!("unexpected payload length {}", payload.len())));
        }

        let version = payload[0];
        let kind = if version == network.pubkey_hash_version() {
            AddressKind::P2pkh
        } else if network.script_hash_versions().contains(&version) {
            AddressKind::P2sh
        } else {
            return Err(invalid(format!(
                "version byte {version:#04x} does not belong to {network}"
            )));
        };

        let mut hash = [0u8; 20];
        hash.copy_from_slice(&payload[1..]);

        Ok(Self {
            network,
            kind,
            hash,
        })
    }

    /// Returns true if `address` is a valid address for `network`.
    pub fn is_valid(address: &str, network: Network) -> bool {
        Self::parse(address, network).is_ok()
    }

    /// P2PKH address of a public key.
    pub fn p2pkh(public_key: &PublicKey, network: Network) -> Self {
        Self {
            network,
            kind: AddressKind::P2pkh,
            hash: public_key.pubkey_hash().to_byte_array(),
        }
    }

    /// Recover the address a standard locking script pays to.
    pub fn from_script(script: &Script, network: Network) -> Option<Self> {
        let bytes = script.as_bytes();
        let (kind, hash) = if script.is_p2pkh() {
            (AddressKind::P2pkh, &bytes[3..23])
        } else if script.is_p2sh() {
            (AddressKind::P2sh, &bytes[2..22])
        } else {
            return None;
        };

        let mut out = [0u8; 20];
        out.copy_from_slice(hash);
        Some(Self {
            network,
            kind,
            hash: out,
        })
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn kind(&self) -> AddressKind {
        self.kind
    }

    /// Locking script paying to this address.
    pub fn script_pubkey(&self) -> ScriptBuf {
        match self.kind {
            AddressKind::P2pkh => ScriptBuf::new_p2pkh(&PubkeyHash::from_byte_array(self.hash)),
            AddressKind::P2sh => ScriptBuf::new_p2sh(&ScriptHash::from_byte_array(self.hash)),
        }
    }

    fn version(&self) -> u8 {
        match self.kind {
            AddressKind::P2pkh => self.network.pubkey_hash_version(),
            AddressKind::P2sh => self.network.script_hash_versions()[0],
        }
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut payload = Vec::with_capacity(21);
        payload.push(self.version());
        payload.extend_from_slice(&self.hash);
        write!(f, "{}", base58::encode_check(&payload))
    }
}
