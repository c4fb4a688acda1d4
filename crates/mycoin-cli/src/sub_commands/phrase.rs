use anyhow::Result;
use mycoin::Onboarding;

use crate::utils::user_error;

/// Show the staged recovery phrase again
pub async fn phrase(onboarding: &Onboarding) -> Result<()> {
    let mnemonic = onboarding.phrase().await.map_err(user_error)?;

    for (i, word) in mnemonic.words().iter().enumerate() {
        println!("{:>2}. {}", i + 1, word);
    }

    Ok(())
}
