use anyhow::Result;
use mycoin::WalletSession;

pub async fn logout(session: &WalletSession) -> Result<()> {
    session.clear_wallet().await;
    println!("Wallet cleared");
    Ok(())
}
