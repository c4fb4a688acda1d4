use anyhow::Result;
use clap::Args;
use mycoin::forms::PasswordForm;
use mycoin::Onboarding;

use crate::sub_commands::verify::run_quiz;
use crate::utils::{get_user_input, user_error};

#[derive(Args)]
pub struct CreateSubCommand {
    /// Stage the phrase and exit, verify later with `verify`
    #[arg(long)]
    no_verify: bool,
}

pub async fn create(onboarding: &Onboarding, sub_command_args: &CreateSubCommand) -> Result<()> {
    let password = get_user_input("Enter a password")?;
    let confirm = get_user_input("Confirm the password")?;

    let display = onboarding
        .start(&PasswordForm::new(password, confirm))
        .await
        .map_err(user_error)?;

    println!();
    println!("Your recovery phrase:");
    for (i, word) in display.mnemonic.words().iter().enumerate() {
        println!("{:>2}. {}", i + 1, word);
    }
    println!();
    println!("Write these words down in order. They are the only way to recover the wallet.");

    let ttl_minutes = onboarding.staging().ttl().as_secs() / 60;

    if sub_command_args.no_verify {
        println!("Run `mycoin-cli verify` within {ttl_minutes} minutes to finish.");
        return Ok(());
    }

    get_user_input("Press enter once the words are written down")?;

    run_quiz(onboarding).await
}
