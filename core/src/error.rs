//! Error types for the Litecoin wallet SDK.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Which side of a request an invalid address was supplied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressRole {
    /// Sender of a transfer.
    From,
    /// Recipient of a transfer.
    To,
    /// Address passed to a query (balance, history, UTXOs).
    Query,
}

impl std::fmt::Display for AddressRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressRole::From => write!(f, "From"),
            AddressRole::To => write!(f, "To"),
            AddressRole::Query => write!(f, "Query"),
        }
    }
}

/// Errors that can occur in the Litecoin wallet SDK.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid mnemonic phrase.
    #[error("Invalid mnemonic phrase: {0}")]
    InvalidMnemonic(String),

    /// Address failed network-specific format/checksum validation.
    #[error("{0} address invalid: {1}")]
    InvalidAddress(AddressRole, String),

    /// Malformed private key.
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    /// Requested amount plus fee exceeds what the address can spend.
    #[error("Not enough balance: required {required} satoshis, available {available} satoshis")]
    InsufficientBalance { required: u64, available: u64 },

    /// Amount cannot be expressed in whole satoshis.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Invalid history page parameters.
    #[error("Invalid page: {0}")]
    InvalidPage(String),

    /// Key derivation error.
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// Transaction construction or signing error.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Network/HTTP error.
    #[error("Network error: {0}")]
    Network(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(format!("{:#}", err))
    }
}
