use anyhow::{bail, Result};
use mycoin::{Error, Onboarding, OnboardingStep, Verification, VerificationState};

use crate::utils::{confirm, get_number_input, user_error};

/// Resume the verification of a staged phrase
pub async fn verify(onboarding: &Onboarding) -> Result<()> {
    run_quiz(onboarding).await
}

fn ask(verification: &mut Verification) -> Result<()> {
    let items = verification
        .challenge()
        .map(|c| c.items().to_vec())
        .unwrap_or_default();

    for item in items {
        println!();
        println!("Select word #{}", item.position + 1);
        for (i, option) in item.options.iter().enumerate() {
            println!("  {}: {}", i + 1, option);
        }

        let word = loop {
            let choice = get_number_input::<usize>("Enter option number")?;
            match choice.checked_sub(1).and_then(|i| item.options.get(i)) {
                Some(word) => break word.clone(),
                None => println!("Choose 1 to {}", item.options.len()),
            }
        };

        verification
            .select_word(item.position, &word)
            .map_err(user_error)?;
    }

    Ok(())
}

pub async fn run_quiz(onboarding: &Onboarding) -> Result<()> {
    let mut verification = onboarding.begin_verification().await;

    if verification.state() == VerificationState::Error {
        bail!(
            "{}",
            verification
                .message()
                .unwrap_or("No wallet data found. Please start the wallet creation again.")
        );
    }

    loop {
        if !verification.is_complete() || verification.state() == VerificationState::Mismatched {
            ask(&mut verification)?;
        }

        match onboarding.complete(&mut verification).await {
            Ok(OnboardingStep::Dashboard) => {
                let wallet = onboarding.finalizer().session().wallet().await;
                println!();
                println!("Recovery phrase verified.");
                if let Some(wallet) = wallet {
                    println!("Wallet created: {}", wallet.address);
                }
                return Ok(());
            }
            Ok(OnboardingStep::Restart) => {
                bail!("No wallet data found. Please start the wallet creation again.")
            }
            Ok(_) => continue,
            Err(Error::VerificationMismatch) => {
                println!();
                println!("{}", Error::VerificationMismatch.user_message());
            }
            Err(err) if verification.state() == VerificationState::Ready => {
                println!("{}", err.user_message());
                if !confirm("Try again?")? {
                    println!("Run `mycoin-cli verify` to retry before the staged phrase expires.");
                    return Ok(());
                }
            }
            Err(err) => return Err(user_error(err)),
        }
    }
}
