use std::io::{self, Write};
use std::str::FromStr;

use anyhow::Result;
use mycoin::formatter::{format_address, format_amount};
use mycoin::types::Transaction;

/// Helper function to get user input with a prompt
pub fn get_user_input(prompt: &str) -> Result<String> {
    println!("{prompt}");
    let mut user_input = String::new();
    io::stdout().flush()?;
    io::stdin().read_line(&mut user_input)?;
    Ok(user_input.trim().to_string())
}

/// Helper function to get a number from user input with a prompt
pub fn get_number_input<T>(prompt: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let input = get_user_input(prompt)?;
    let number = input.parse::<T>()?;
    Ok(number)
}

/// Ask a yes/no question, defaulting to no
pub fn confirm(prompt: &str) -> Result<bool> {
    let answer = get_user_input(&format!("{prompt} [y/N]"))?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

/// One line per transaction
pub fn print_transactions(transactions: &[Transaction]) {
    if transactions.is_empty() {
        println!("No transactions");
        return;
    }

    for tx in transactions {
        let id = tx.id.as_deref().unwrap_or(tx.hash.as_str());
        println!(
            "{} {:>8} {} -> {} {} [{}]",
            format_address(id),
            tx.kind,
            format_address(&tx.from_address),
            format_address(&tx.to_address),
            format_amount(tx.amount),
            tx.status,
        );
    }
}

/// Turn a wallet error into its user facing message
pub fn user_error(err: mycoin::Error) -> anyhow::Error {
    tracing::debug!("{}", err);
    anyhow::anyhow!(err.user_message())
}
