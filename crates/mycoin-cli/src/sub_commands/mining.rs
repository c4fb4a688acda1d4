use anyhow::Result;
use clap::{Args, Subcommand};
use mycoin::formatter::{format_address, format_amount};
use mycoin::types::MiningStatus;
use mycoin::WalletSession;

use crate::utils::user_error;

#[derive(Args)]
pub struct MiningSubCommand {
    #[command(subcommand)]
    command: MiningCommands,
}

#[derive(Subcommand)]
enum MiningCommands {
    /// Show mining status
    Status,
    /// Set the address receiving rewards
    Address {
        /// Miner address
        address: String,
    },
    /// Set the mining difficulty
    Difficulty {
        /// Leading zeros required in a block hash
        difficulty: u32,
    },
    /// Start mining
    Start,
    /// Stop mining
    Stop,
    /// Mine a single block
    MineBlock {
        /// Reward address, defaults to the loaded wallet
        #[arg(short, long)]
        address: Option<String>,
    },
}

fn print_status(status: &MiningStatus) {
    println!("Mining: {}", if status.mining { "on" } else { "off" });
    println!("Difficulty: {}", status.difficulty);
    match &status.mining_address {
        Some(address) => println!("Address: {}", format_address(address)),
        None => println!("Address: not set"),
    }
}

pub async fn mining(session: &WalletSession, sub_command_args: &MiningSubCommand) -> Result<()> {
    let status = match &sub_command_args.command {
        MiningCommands::Status => session.get_mining_status().await,
        MiningCommands::Address { address } => session.set_mining_address(address.trim()).await,
        MiningCommands::Difficulty { difficulty } => {
            session.set_mining_difficulty(*difficulty).await
        }
        MiningCommands::Start => session.start_mining().await,
        MiningCommands::Stop => session.stop_mining().await,
        MiningCommands::MineBlock { address } => {
            session.init().await;
            let block = session
                .mine_block(address.as_deref())
                .await
                .map_err(user_error)?;

            println!("Mined block #{} {}", block.index, format_address(&block.hash));
            for tx in &block.transactions {
                println!(
                    "  {} -> {} {}",
                    format_address(&tx.from_address),
                    format_address(&tx.to_address),
                    format_amount(tx.amount)
                );
            }
            return Ok(());
        }
    }
    .map_err(user_error)?;

    print_status(&status);

    Ok(())
}
