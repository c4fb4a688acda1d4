use anyhow::{bail, Result};
use mycoin::formatter::format_amount;
use mycoin::WalletSession;

pub async fn balance(session: &WalletSession) -> Result<()> {
    let Some(wallet) = session.init().await else {
        bail!("No wallet loaded. Create, import or load one first.");
    };

    let Some(stats) = session.wallet_stats().await else {
        bail!(
            "{}",
            session
                .error()
                .await
                .unwrap_or_else(|| "Failed to load wallet stats".to_string())
        );
    };

    println!("Address: {}", wallet.address);
    println!("Balance: {}", format_amount(stats.balance));
    if let Some(network) = &stats.network {
        println!("Network: {} ({})", network.name, network.currency);
    }
    if let Some(status) = &stats.status {
        println!("Status: {status}");
    }
    if let Some(links) = &stats.links {
        println!("Explorer: {}", links.view_on_explorer);
    }

    Ok(())
}
