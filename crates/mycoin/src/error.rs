//! Errors

use thiserror::Error;

use crate::connector;
use crate::forms::ValidationError;

/// MyCoin Error
#[derive(Debug, Error)]
pub enum Error {
    /// Vocabulary has no words
    #[error("Vocabulary is empty")]
    EmptyVocabulary,
    /// Vocabulary word contains whitespace
    #[error("Vocabulary word `{0}` contains whitespace")]
    InvalidVocabularyWord(String),
    /// Requested phrase length is not usable
    #[error("Invalid phrase length `{0}`")]
    InvalidPhraseLength(usize),
    /// Quiz must challenge at least one position
    #[error("Invalid quiz size `{0}`")]
    InvalidQuizSize(usize),
    /// Not enough words left to build distractors
    #[error("Vocabulary has `{available}` usable distractor words, `{needed}` needed")]
    InsufficientVocabulary {
        /// Distractors needed per position
        needed: usize,
        /// Usable words after excluding the phrase
        available: usize,
    },
    /// No staged wallet, or it expired
    #[error("No wallet data found")]
    NoStagedWallet,
    /// Selected words do not match the phrase
    #[error("Selected words do not match the recovery phrase")]
    VerificationMismatch,
    /// Not every challenged position has a selection
    #[error("Select a word for every position")]
    IncompleteSelection,
    /// Position is not part of the challenge
    #[error("Position `{0}` is not being verified")]
    UnknownPosition(usize),
    /// Word is not one of the options for the position
    #[error("Word is not an option for position `{0}`")]
    InvalidOption(usize),
    /// Operation is not allowed in the current verification state
    #[error("Operation not allowed in state `{0}`")]
    InvalidState(crate::verify::VerificationState),
    /// A finalize call is already in flight
    #[error("Wallet creation already in progress")]
    FinalizeInProgress,
    /// Wallet has no private key loaded
    #[error("Wallet not loaded with private key")]
    PrivateKeyMissing,
    /// Mining address could not be resolved
    #[error("No mining address provided or wallet not loaded")]
    NoMiningAddress,
    /// Form validation
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Connector Error
    #[error(transparent)]
    Connector(#[from] connector::Error),
    /// Common Error
    #[error(transparent)]
    Common(#[from] mycoin_common::Error),
    /// Database Error
    #[error(transparent)]
    Database(#[from] mycoin_common::database::Error),
    /// Serde Error
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

impl Error {
    /// Short message safe to show to the user
    ///
    /// Internal details (transport errors, parse errors) are collapsed into generic
    /// text; validation and flow errors keep their own wording.
    pub fn user_message(&self) -> String {
        match self {
            Error::EmptyVocabulary
            | Error::InvalidVocabularyWord(_)
            | Error::InvalidPhraseLength(_)
            | Error::InvalidQuizSize(_)
            | Error::InsufficientVocabulary { .. } => {
                "Recovery phrase settings are invalid".to_string()
            }
            Error::NoStagedWallet => {
                "No wallet data found. Please start the wallet creation again.".to_string()
            }
            Error::VerificationMismatch => {
                "The selected words don't match your recovery phrase. Please try again."
                    .to_string()
            }
            Error::Common(mycoin_common::Error::EmptyMnemonic)
            | Error::Common(mycoin_common::Error::PositionOutOfRange(_)) => {
                "No wallet data found. Please start the wallet creation again.".to_string()
            }
            Error::Common(mycoin_common::Error::UnsupportedPhraseLength(_)) => {
                "Recovery phrase must be 12 or 24 words".to_string()
            }
            Error::Validation(err) => err.to_string(),
            Error::Connector(err) => err.user_message(),
            Error::Database(_) | Error::Serde(_) | Error::Common(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_internal_errors() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");

        let err: Error = mycoin_common::database::Error::Unavailable.into();
        assert!(!err.user_message().contains("Storage"));
    }

    #[test]
    fn test_user_message_mismatch_is_generic() {
        let msg = Error::VerificationMismatch.user_message();
        assert!(!msg.chars().any(|c| c.is_ascii_digit()));
    }
}
