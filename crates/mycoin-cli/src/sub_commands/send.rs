use anyhow::{bail, Result};
use clap::Args;
use mycoin::formatter::{format_address, format_amount};
use mycoin::forms::SendForm;
use mycoin::WalletSession;

use crate::utils::{confirm, get_user_input, user_error};

#[derive(Args)]
pub struct SendSubCommand {
    /// Recipient address
    #[arg(short, long)]
    to: Option<String>,
    /// Amount to send
    #[arg(short, long)]
    amount: Option<String>,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

pub async fn send(session: &WalletSession, sub_command_args: &SendSubCommand) -> Result<()> {
    if session.init().await.is_none() {
        bail!("No wallet loaded. Create, import or load one first.");
    }

    let balance = session
        .wallet_stats()
        .await
        .map(|stats| stats.balance)
        .unwrap_or_default();

    let to = match &sub_command_args.to {
        Some(to) => to.clone(),
        None => get_user_input("Enter recipient address")?,
    };
    let amount = match &sub_command_args.amount {
        Some(amount) => amount.clone(),
        None => get_user_input(&format!("Enter amount (balance {})", format_amount(balance)))?,
    };

    let amount = SendForm::new(to.clone(), amount).validate(balance)?;

    if !sub_command_args.yes
        && !confirm(&format!(
            "Send {} to {}?",
            format_amount(amount),
            format_address(&to)
        ))?
    {
        println!("Cancelled");
        return Ok(());
    }

    let receipt = session.send_coins(&to, amount).await.map_err(user_error)?;
    tracing::debug!("Send receipt: {}", receipt);

    println!("Sent {} to {}", format_amount(amount), format_address(&to));
    if let Some(stats) = session.wallet_stats().await {
        println!("New balance: {}", format_amount(stats.balance));
    }

    Ok(())
}
