//! Input validation for the onboarding and send forms

use std::fmt;
use std::str::FromStr;

use mycoin_common::{Mnemonic, PhraseLength};
use thiserror::Error;
use zeroize::Zeroize;

/// Minimum password length on the import flow
pub const MIN_PASSWORD_LEN: usize = 8;

/// Length of a `0x` prefixed address
pub const ADDRESS_LEN: usize = 42;

/// Form validation error
///
/// Display strings are shown to the user as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Password is blank
    #[error("Please enter a password")]
    EmptyPassword,
    /// Password and confirmation differ
    #[error("Passwords do not match")]
    PasswordMismatch,
    /// Password shorter than [`MIN_PASSWORD_LEN`]
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
    /// Recovery phrase is blank
    #[error("Please enter your recovery phrase")]
    EmptyPhrase,
    /// Recovery phrase has an unsupported word count
    #[error("Recovery phrase must be 12 or 24 words")]
    PhraseLength,
    /// Recipient is blank
    #[error("Please enter a recipient address")]
    EmptyRecipient,
    /// Recipient is not a `0x` address
    #[error("Please enter a valid address")]
    InvalidAddress,
    /// Amount is not a positive number
    #[error("Please enter a valid amount")]
    InvalidAmount,
    /// Amount exceeds the balance
    #[error("Insufficient balance for this transaction")]
    InsufficientBalance,
}

/// Password step of the create flow
#[derive(Default)]
pub struct PasswordForm {
    /// Password
    pub password: String,
    /// Confirmation
    pub confirm: String,
}

impl PasswordForm {
    /// Create new [`PasswordForm`]
    pub fn new(password: impl Into<String>, confirm: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            confirm: confirm.into(),
        }
    }

    /// Password must be non blank and equal to its confirmation
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.password.trim().is_empty() {
            return Err(ValidationError::EmptyPassword);
        }

        if self.password != self.confirm {
            return Err(ValidationError::PasswordMismatch);
        }

        Ok(())
    }
}

impl fmt::Debug for PasswordForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordForm").finish_non_exhaustive()
    }
}

impl Drop for PasswordForm {
    fn drop(&mut self) {
        self.password.zeroize();
        self.confirm.zeroize();
    }
}

/// Import wallet from a recovery phrase
#[derive(Default)]
pub struct ImportPhraseForm {
    /// Recovery phrase as typed
    pub phrase: String,
    /// Password
    pub password: String,
    /// Confirmation
    pub confirm: String,
}

impl ImportPhraseForm {
    /// Create new [`ImportPhraseForm`]
    pub fn new(
        phrase: impl Into<String>,
        password: impl Into<String>,
        confirm: impl Into<String>,
    ) -> Self {
        Self {
            phrase: phrase.into(),
            password: password.into(),
            confirm: confirm.into(),
        }
    }

    /// Validate and parse the phrase
    ///
    /// Checks run in order: phrase present, 12 or 24 words, passwords match,
    /// password long enough.
    pub fn validate(&self) -> Result<Mnemonic, ValidationError> {
        if self.phrase.trim().is_empty() {
            return Err(ValidationError::EmptyPhrase);
        }

        let mnemonic =
            Mnemonic::from_str(&self.phrase).map_err(|_| ValidationError::EmptyPhrase)?;

        if PhraseLength::try_from(mnemonic.len()).is_err() {
            return Err(ValidationError::PhraseLength);
        }

        if self.password != self.confirm {
            return Err(ValidationError::PasswordMismatch);
        }

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }

        Ok(mnemonic)
    }
}

impl fmt::Debug for ImportPhraseForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportPhraseForm").finish_non_exhaustive()
    }
}

impl Drop for ImportPhraseForm {
    fn drop(&mut self) {
        self.phrase.zeroize();
        self.password.zeroize();
        self.confirm.zeroize();
    }
}

/// Send coins form
#[derive(Debug, Clone, Default)]
pub struct SendForm {
    /// Recipient address
    pub recipient: String,
    /// Amount as typed
    pub amount: String,
}

impl SendForm {
    /// Create new [`SendForm`]
    pub fn new(recipient: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            amount: amount.into(),
        }
    }

    /// Validate against `balance` and return the parsed amount
    pub fn validate(&self, balance: f64) -> Result<f64, ValidationError> {
        let recipient = self.recipient.trim();

        if recipient.is_empty() {
            return Err(ValidationError::EmptyRecipient);
        }

        if !recipient.starts_with("0x") || recipient.len() != ADDRESS_LEN {
            return Err(ValidationError::InvalidAddress);
        }

        let amount = self
            .amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite() && *a > 0.0)
            .ok_or(ValidationError::InvalidAmount)?;

        if amount > balance {
            return Err(ValidationError::InsufficientBalance);
        }

        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWELVE: &str =
        "abandon ability able about above absent absorb abstract absurd abuse access accident";
    const ADDRESS: &str = "0x71C7656EC7ab88b098defB751B7401B5f6d8976F";

    #[test]
    fn test_password_form() {
        assert_eq!(
            PasswordForm::new("   ", "   ").validate(),
            Err(ValidationError::EmptyPassword)
        );
        assert_eq!(
            PasswordForm::new("secret", "secreT").validate(),
            Err(ValidationError::PasswordMismatch)
        );
        // The create flow has no minimum length
        assert!(PasswordForm::new("pw", "pw").validate().is_ok());
    }

    #[test]
    fn test_import_form_order() {
        assert_eq!(
            ImportPhraseForm::new("", "short", "other").validate().unwrap_err(),
            ValidationError::EmptyPhrase
        );
        assert_eq!(
            ImportPhraseForm::new("abandon ability", "short", "other")
                .validate()
                .unwrap_err(),
            ValidationError::PhraseLength
        );
        assert_eq!(
            ImportPhraseForm::new(TWELVE, "short", "other")
                .validate()
                .unwrap_err(),
            ValidationError::PasswordMismatch
        );
        assert_eq!(
            ImportPhraseForm::new(TWELVE, "short", "short")
                .validate()
                .unwrap_err(),
            ValidationError::PasswordTooShort
        );
    }

    #[test]
    fn test_import_form_accepts_messy_whitespace() {
        let phrase = format!("  {}\n", TWELVE.replace(' ', "   "));
        let mnemonic = ImportPhraseForm::new(phrase, "password1", "password1")
            .validate()
            .unwrap();
        assert_eq!(mnemonic.len(), 12);
        assert_eq!(mnemonic.phrase(), TWELVE);

        let twenty_four = format!("{TWELVE} {TWELVE}");
        let mnemonic = ImportPhraseForm::new(twenty_four, "password1", "password1")
            .validate()
            .unwrap();
        assert_eq!(mnemonic.len(), 24);
    }

    #[test]
    fn test_send_form() {
        assert_eq!(
            SendForm::new("", "1").validate(10.0),
            Err(ValidationError::EmptyRecipient)
        );
        assert_eq!(
            SendForm::new("0x123", "1").validate(10.0),
            Err(ValidationError::InvalidAddress)
        );
        assert_eq!(
            SendForm::new(ADDRESS, "abc").validate(10.0),
            Err(ValidationError::InvalidAmount)
        );
        assert_eq!(
            SendForm::new(ADDRESS, "-1").validate(10.0),
            Err(ValidationError::InvalidAmount)
        );
        assert_eq!(
            SendForm::new(ADDRESS, "11").validate(10.0),
            Err(ValidationError::InsufficientBalance)
        );
        assert_eq!(SendForm::new(ADDRESS, " 2.5 ").validate(10.0), Ok(2.5));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::PhraseLength.to_string(),
            "Recovery phrase must be 12 or 24 words"
        );
        assert_eq!(
            ValidationError::PasswordTooShort.to_string(),
            "Password must be at least 8 characters"
        );
    }
}
