use anyhow::Result;
use clap::Args;
use mycoin::session::{DEFAULT_PAGE, DEFAULT_PAGE_LIMIT};
use mycoin::WalletSession;

use crate::utils::{print_transactions, user_error};

#[derive(Args)]
pub struct ExplorerSubCommand {
    /// Page number, starting at 1
    #[arg(short, long, default_value_t = DEFAULT_PAGE)]
    page: u32,
    /// Transactions per page
    #[arg(short, long, default_value_t = DEFAULT_PAGE_LIMIT)]
    limit: u32,
}

pub async fn explorer(session: &WalletSession, sub_command_args: &ExplorerSubCommand) -> Result<()> {
    let page = session
        .load_blockchain_transactions(sub_command_args.page, sub_command_args.limit)
        .await
        .map_err(user_error)?;

    print_transactions(&page.transactions);

    let pagination = page.pagination;
    println!(
        "Page {} of {} ({} transactions)",
        pagination.page,
        pagination.pages.max(1),
        pagination.total
    );

    Ok(())
}
