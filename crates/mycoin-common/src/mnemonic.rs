//! Recovery phrase types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::Error;

/// Supported recovery phrase lengths
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum PhraseLength {
    /// 12 words
    #[default]
    Twelve,
    /// 24 words
    TwentyFour,
}

impl PhraseLength {
    /// Number of words in the phrase
    pub fn word_count(&self) -> usize {
        match self {
            PhraseLength::Twelve => 12,
            PhraseLength::TwentyFour => 24,
        }
    }
}

impl TryFrom<usize> for PhraseLength {
    type Error = Error;

    fn try_from(count: usize) -> Result<Self, Self::Error> {
        match count {
            12 => Ok(PhraseLength::Twelve),
            24 => Ok(PhraseLength::TwentyFour),
            other => Err(Error::UnsupportedPhraseLength(other)),
        }
    }
}

impl From<PhraseLength> for usize {
    fn from(length: PhraseLength) -> Self {
        length.word_count()
    }
}

impl FromStr for PhraseLength {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let count = s
            .trim()
            .parse::<usize>()
            .map_err(|_| Error::UnsupportedPhraseLength(0))?;
        Self::try_from(count)
    }
}

impl fmt::Display for PhraseLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.word_count())
    }
}

/// Ordered recovery phrase
///
/// Position is significant: the index of a word is what the verification quiz asks for.
/// Words are wiped from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic {
    words: Vec<String>,
}

impl Mnemonic {
    /// Create [`Mnemonic`] from words
    ///
    /// Words are trimmed; an empty list or an empty word is rejected, as is a word
    /// with inner whitespace since the phrase would split differently when re-read.
    pub fn from_words<I, S>(words: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.into().trim().to_string())
            .collect();

        if words.is_empty() || words.iter().any(|w| w.is_empty()) {
            return Err(Error::EmptyMnemonic);
        }

        if let Some(position) = words
            .iter()
            .position(|w| w.chars().any(char::is_whitespace))
        {
            return Err(Error::InvalidWord(position));
        }

        Ok(Self { words })
    }

    /// Words of the phrase in order
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Never true for a parsed mnemonic
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Word at `position`
    pub fn word(&self, position: usize) -> Result<&str, Error> {
        self.words
            .get(position)
            .map(String::as_str)
            .ok_or(Error::PositionOutOfRange(position))
    }

    /// Whether `word` appears anywhere in the phrase
    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Space-joined phrase, as sent to the backend and staged in storage
    pub fn phrase(&self) -> String {
        self.words.join(" ")
    }
}

impl FromStr for Mnemonic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_words(s.split_whitespace())
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mnemonic")
            .field("words", &format!("<{} words redacted>", self.words.len()))
            .finish()
    }
}

impl Drop for Mnemonic {
    fn drop(&mut self) {
        self.words.zeroize();
    }
}
