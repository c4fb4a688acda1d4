use anyhow::Result;
use clap::Args;
use mycoin::formatter::format_amount;
use mycoin::WalletSession;

use crate::utils::user_error;

#[derive(Args)]
pub struct LoadSubCommand {
    /// Wallet address
    address: String,
    /// Fetch the private key and keep the wallet loaded for later commands
    #[arg(long)]
    private_key: bool,
}

pub async fn load(session: &WalletSession, sub_command_args: &LoadSubCommand) -> Result<()> {
    let address = sub_command_args.address.trim();

    if sub_command_args.private_key {
        let wallet = session
            .load_wallet_with_private_key(address)
            .await
            .map_err(user_error)?;
        println!("Loaded wallet {}", wallet.address);
    } else {
        session.load_wallet(address).await.map_err(user_error)?;
        println!("Viewing wallet {address}");
    }

    match session.wallet_stats().await {
        Some(stats) => println!("Balance: {}", format_amount(stats.balance)),
        None => {
            if let Some(err) = session.error().await {
                println!("{err}");
            }
        }
    }

    Ok(())
}
