use std::sync::Arc;

use mycoin::forms::PasswordForm;
use mycoin::storage::MemoryStorage;
use mycoin::{HttpClient, Onboarding, OnboardingStep, StagingStore, WalletSession};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Backend URL
    let api_url = "http://localhost:4000/api";

    // Session and staging storage live in memory for this example
    let client = HttpClient::from_url_str(api_url)?;
    let session = Arc::new(WalletSession::new(
        Arc::new(client),
        Arc::new(MemoryStorage::new()),
    ));
    let staging = StagingStore::new(Arc::new(MemoryStorage::new()));

    let onboarding = Onboarding::new(session.clone(), staging);

    // Password step stages the generated phrase
    let display = onboarding
        .start(&PasswordForm::new("correct horse", "correct horse"))
        .await?;

    println!("Write these words down:");
    for (i, word) in display.mnemonic.words().iter().enumerate() {
        println!("{:>2}. {}", i + 1, word);
    }

    // Answer the quiz from the phrase we just showed
    let mut verification = onboarding.begin_verification().await;
    let items = verification
        .challenge()
        .map(|c| c.items().to_vec())
        .unwrap_or_default();

    for item in items {
        println!("Word #{}: {}", item.position + 1, item.options.join(" / "));
        let word = display.mnemonic.word(item.position)?.to_string();
        verification.select_word(item.position, &word)?;
    }

    match onboarding.complete(&mut verification).await {
        Ok(OnboardingStep::Dashboard) => {
            if let Some(wallet) = session.wallet().await {
                println!("Wallet created: {}", wallet.address);
            }
        }
        Ok(_) => println!("Recovery phrase not verified, start again"),
        Err(err) => {
            eprintln!("{}", err.user_message());
            return Err(err.into());
        }
    }

    Ok(())
}
