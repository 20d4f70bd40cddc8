//! Private key parsing and encoding.

use crate::error::{Error, Result};
use crate::types::Network;
use bitcoin::PrivateKey;
use bitcoin::base58;
use bitcoin::secp256k1::SecretKey;

/// Parse a private key given either as 32-byte hex or as a Litecoin WIF string.
///
/// Hex keys are treated as compressed, matching how wallets derived by this
/// crate encode their keys.
pub fn parse_private_key(input: &str, network: Network) -> Result<PrivateKey> {
    let input = input.trim();

    if input.len() == 64 && input.chars().all(|c| c.is_ascii_hexdigit()) {
        let bytes = hex::decode(input).map_err(|e| Error::InvalidKey(e.to_string()))?;
        let secret =
            SecretKey::from_slice(&bytes).map_err(|e| Error::InvalidKey(e.to_string()))?;
        return Ok(PrivateKey::new(secret, network.network_kind()));
    }

    parse_wif(input, network)
}

fn parse_wif(input: &str, network: Network) -> Result<PrivateKey> {
    let data = base58::decode_check(input)
        .map_err(|e| Error::InvalidKey(format!("not hex or WIF: {}", e)))?;

    let compressed = match data.len() {
        33 => false,
        34 if data[33] == 0x01 => true,
        _ => {
            return Err(Error::InvalidKey(format!(
                "unexpected WIF payload length {}",
                data.len()
            )));
        }
    };

    if data[0] != network.wif_prefix() {
        return Err(Error::InvalidKey(format!(
            "WIF prefix {:#04x} does not belong to {}",
            data[0], network
        )));
    }

    let secret =
        SecretKey::from_slice(&data[1..33]).map_err(|e| Error::InvalidKey(e.to_string()))?;

    Ok(if compressed {
        PrivateKey::new(secret, network.network_kind())
    } else {
        PrivateKey::new_uncompressed(secret, network.network_kind())
    })
}

/// Encode a private key as Litecoin WIF.
pub fn to_wif(key: &PrivateKey, network: Network) -> String {
    let mut data = Vec::with_capacity(34);
    data.push(network.wif_prefix());
    data.extend_from_slice(&key.inner.secret_bytes());
    if key.compressed {
        data.push(0x01);
    }
    base58::encode_check(&data)
}

/// Hex encoding of the raw secret, the format wallets are handed out in.
pub fn to_hex(key: &PrivateKey) -> String {
    hex::encode(key.inner.secret_bytes())
}
