//! Walks through the wallet operations against the configured explorer.
//!
//! Run with: RUST_LOG=debug cargo run --example wallet_demo
//!
//! Honors LTC_NETWORK, LTC_EXPLORER_URL and LTC_DERIVATION_PATH.

use litewallet_core::{Client, Config};

const ADDRESSES: [&str; 3] = [
    "muZpTpBYhxmRFuCjLc7C6BBDF32C8XVJUi",
    "muR6pDgtVxCgGgfYYo1Tr3v48EanW6RaRU",
    "msboCpAHFWoVrAVTvULxCzPjL5We3rv3r5",
];

#[tokio::main]
async fn main() -> litewallet_core::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let client = Client::from_config(Config::from_env()?);
    println!("Network: {}, explorer: {}", client.network(), client.explorer().base_url());

    let mnemonic = client.create_mnemonic()?;
    println!("Created mnemonic: {}", mnemonic);

    let wallet = client.derive_wallet(&mnemonic)?;
    println!("Wallet address: {}", wallet.address);

    let address = client.address_from_private_key(&wallet.private_key)?;
    println!("Address from private key: {}", address);

    for address in ADDRESSES {
        match client.get_balance(address).await {
            Ok(Some(balance)) => println!("Balance of {}: {} LTC", address, balance),
            Ok(None) => println!("Balance of {}: unavailable", address),
            Err(e) => println!("Balance of {}: {}", address, e),
        }
    }

    let history = client.get_history(ADDRESSES[0], 1, 10).await;
    println!(
        "History of {}: {} of {} transactions",
        ADDRESSES[0],
        history.items.len(),
        history.total_items
    );

    Ok(())
}
