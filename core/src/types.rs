//! Shared types for the Litecoin wallet SDK.

use crate::error::{Error, Result};
use bitcoin::{ScriptBuf, Txid};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Satoshis per coin.
pub const COIN: u64 = 100_000_000;

/// Litecoin network type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Litecoin mainnet.
    Mainnet,
    /// Litecoin testnet.
    Testnet,
}

impl Network {
    /// Base58 version byte for pay-to-pubkey-hash addresses.
    pub fn pubkey_hash_version(self) -> u8 {
        match self {
            Network::Mainnet => 0x30,
            Network::Testnet => 0x6f,
        }
    }

    /// Base58 version bytes accepted for pay-to-script-hash addresses.
    ///
    /// The first entry is the one used for encoding; the second is the legacy
    /// prefix shared with Bitcoin, still accepted on input.
    pub fn script_hash_versions(self) -> [u8; 2] {
        match self {
            Network::Mainnet => [0x32, 0x05],
            Network::Testnet => [0x3a, 0xc4],
        }
    }

    /// WIF prefix for private keys.
    pub fn wif_prefix(self) -> u8 {
        match self {
            Network::Mainnet => 0xb0,
            Network::Testnet => 0xef,
        }
    }

    /// BIP-32 network kind used for extended keys.
    pub fn network_kind(self) -> bitcoin::NetworkKind {
        match self {
            Network::Mainnet => bitcoin::NetworkKind::Main,
            Network::Testnet => bitcoin::NetworkKind::Test,
        }
    }
}

impl std::str::FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mainnet" | "livenet" | "litecoin" => Ok(Network::Mainnet),
            "testnet" | "testnet4" => Ok(Network::Testnet),
            _ => Err(Error::Parse(format!("Unknown network: {}", s))),
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

/// A wallet derived from a mnemonic.
///
/// Owned by the caller; the SDK never caches or persists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Base58check P2PKH address.
    pub address: String,
    /// 32-byte secret key, lowercase hex.
    pub private_key: String,
}

/// An unspent output as reported by the explorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnspentOutput {
    pub txid: Txid,
    pub output_index: u32,
    pub address: String,
    /// Locking script of the output.
    pub script: ScriptBuf,
    pub satoshis: u64,
}

/// Convert a coin-denominated amount to satoshis.
///
/// Rejects negative amounts and amounts with sub-satoshi precision.
pub fn to_satoshis(amount: Decimal) -> Result<u64> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::InvalidAmount(format!("{} is negative", amount)));
    }

    let sats = amount
        .checked_mul(Decimal::from(COIN))
        .ok_or_else(|| Error::InvalidAmount(format!("{} is out of range", amount)))?;
    if !sats.fract().is_zero() {
        return Err(Error::InvalidAmount(format!(
            "{} has more than 8 decimal places",
            amount
        )));
    }

    sats.to_u64()
        .ok_or_else(|| Error::InvalidAmount(format!("{} is out of range", amount)))
}

/// Convert satoshis to a coin-denominated amount (scale 8).
pub fn from_satoshis(sats: u64) -> Decimal {
    Decimal::from_i128_with_scale(sats as i128, 8)
}
