use anyhow::{bail, Result};
use mycoin::WalletSession;

use crate::utils::print_transactions;

pub async fn history(session: &WalletSession) -> Result<()> {
    if session.init().await.is_none() {
        bail!("No wallet loaded. Create, import or load one first.");
    }

    if let Some(err) = session.error().await {
        bail!("{err}");
    }

    print_transactions(&session.transactions().await);

    Ok(())
}
