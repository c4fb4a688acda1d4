//! Errors

use thiserror::Error;

/// MyCoin common Error
#[derive(Debug, Error)]
pub enum Error {
    /// Mnemonic has no words
    #[error("Mnemonic is empty")]
    EmptyMnemonic,
    /// Unsupported phrase length
    #[error("Recovery phrase must be 12 or 24 words, got `{0}`")]
    UnsupportedPhraseLength(usize),
    /// Word index outside of the phrase
    #[error("Word position `{0}` is out of range")]
    PositionOutOfRange(usize),
    /// Word contains whitespace
    #[error("Word at position `{0}` contains whitespace")]
    InvalidWord(usize),
    /// Serde Error
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}
