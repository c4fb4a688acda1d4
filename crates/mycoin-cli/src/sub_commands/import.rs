use anyhow::Result;
use clap::Args;
use mycoin::forms::ImportPhraseForm;
use mycoin::Onboarding;

use crate::utils::{get_user_input, user_error};

#[derive(Args)]
pub struct ImportSubCommand {
    /// Recovery phrase, prompted for when omitted
    #[arg(long)]
    phrase: Option<String>,
}

pub async fn import(onboarding: &Onboarding, sub_command_args: &ImportSubCommand) -> Result<()> {
    let phrase = match &sub_command_args.phrase {
        Some(phrase) => phrase.clone(),
        None => get_user_input("Enter your 12 or 24 word recovery phrase")?,
    };
    let password = get_user_input("Enter a password")?;
    let confirm = get_user_input("Confirm the password")?;

    let wallet = onboarding
        .import_phrase(&ImportPhraseForm::new(phrase, password, confirm))
        .await
        .map_err(user_error)?;

    println!("Wallet imported: {}", wallet.address);

    Ok(())
}
