//! Passphrase generator
//!
//! Draws recovery phrase words independently and uniformly from a fixed
//! [`Vocabulary`], with replacement. This is a uniform sampler over a word list, not a
//! BIP-39 entropy/checksum encoding: repeated words are possible and accepted.

use std::collections::HashSet;
use std::sync::Arc;

use mycoin_common::{Mnemonic, PhraseLength};
use rand::Rng;

use crate::Error;

/// Fixed word list used for phrase generation and quiz distractors
///
/// Words are unique and non-empty. Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    words: Arc<[String]>,
}

impl Vocabulary {
    /// Create [`Vocabulary`] from a custom word list
    ///
    /// Words are trimmed, empty entries are skipped and duplicates are collapsed
    /// keeping the first occurrence, so sampling stays uniform over distinct words.
    /// A word with inner whitespace is rejected.
    pub fn new<I, S>(words: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut unique: Vec<String> = Vec::new();

        for word in words {
            let word = word.as_ref().trim();
            if word.is_empty() {
                continue;
            }
            if word.chars().any(char::is_whitespace) {
                return Err(Error::InvalidVocabularyWord(word.to_string()));
            }
            if seen.insert(word.to_string()) {
                unique.push(word.to_string());
            }
        }

        if unique.is_empty() {
            return Err(Error::EmptyVocabulary);
        }

        Ok(Self {
            words: unique.into(),
        })
    }

    /// Standard 2048 word English list
    pub fn bip39_english() -> Self {
        Self {
            words: bip39::Language::English
                .word_list()
                .iter()
                .map(|w| w.to_string())
                .collect(),
        }
    }

    /// Number of words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Never true for a constructed vocabulary
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words in the list
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Whether `word` is part of the list
    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Uniformly random word
    pub fn random_word<R: Rng>(&self, rng: &mut R) -> &str {
        &self.words[rng.random_range(0..self.words.len())]
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::bip39_english()
    }
}

/// Recovery phrase generator
#[derive(Debug, Clone, Default)]
pub struct PassphraseGenerator {
    vocabulary: Vocabulary,
}

impl PassphraseGenerator {
    /// Create new [`PassphraseGenerator`]
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Vocabulary words are drawn from
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Generate a phrase of `length` words using the thread RNG
    pub fn generate(&self, length: usize) -> Result<Mnemonic, Error> {
        self.generate_with_rng(length, &mut rand::rng())
    }

    /// Generate a phrase with one of the supported lengths
    pub fn generate_phrase(&self, length: PhraseLength) -> Result<Mnemonic, Error> {
        self.generate(length.word_count())
    }

    /// Generate a phrase of `length` words from `rng`
    pub fn generate_with_rng<R: Rng>(&self, length: usize, rng: &mut R) -> Result<Mnemonic, Error> {
        if length == 0 {
            return Err(Error::InvalidPhraseLength(length));
        }

        let words: Vec<&str> = (0..length)
            .map(|_| self.vocabulary.random_word(rng))
            .collect();

        Ok(Mnemonic::from_words(words)?)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_empty_vocabulary_rejected() {
        assert!(matches!(
            Vocabulary::new(Vec::<String>::new()),
            Err(Error::EmptyVocabulary)
        ));
        assert!(matches!(
            Vocabulary::new(vec!["", "  "]),
            Err(Error::EmptyVocabulary)
        ));
    }

    #[test]
    fn test_vocabulary_dedup() {
        let vocabulary = Vocabulary::new(vec!["abandon", "ability", "abandon", " able "]).unwrap();
        assert_eq!(vocabulary.len(), 3);
        assert!(vocabulary.contains("able"));
    }

    #[test]
    fn test_vocabulary_word_with_inner_whitespace_rejected() {
        assert!(matches!(
            Vocabulary::new(vec!["big apple", "pear", "plum", "fig", "kiwi"]),
            Err(Error::InvalidVocabularyWord(ref word)) if word == "big apple"
        ));
    }

    #[test]
    fn test_generated_phrase_reparses_to_same_words() {
        let vocabulary = Vocabulary::new(vec![" apple ", "pear", "plum", "fig", "kiwi"]).unwrap();
        let generator = PassphraseGenerator::new(vocabulary);
        let mut rng = StdRng::seed_from_u64(7);

        let mnemonic = generator
            .generate_with_rng(PhraseLength::Twelve.word_count(), &mut rng)
            .unwrap();
        let reparsed: Mnemonic = mnemonic.phrase().parse().unwrap();

        assert_eq!(reparsed.len(), 12);
        assert_eq!(reparsed, mnemonic);
    }

    #[test]
    fn test_bip39_vocabulary() {
        let vocabulary = Vocabulary::bip39_english();
        assert_eq!(vocabulary.len(), 2048);
        assert_eq!(vocabulary.words()[0], "abandon");
        assert!(vocabulary.contains("zoo"));
    }

    #[test]
    fn test_generate_lengths() {
        let generator = PassphraseGenerator::default();

        let twelve = generator.generate_phrase(PhraseLength::Twelve).unwrap();
        assert_eq!(twelve.len(), 12);

        let twenty_four = generator.generate_phrase(PhraseLength::TwentyFour).unwrap();
        assert_eq!(twenty_four.len(), 24);

        assert!(twenty_four
            .words()
            .iter()
            .all(|w| generator.vocabulary().contains(w)));
    }

    #[test]
    fn test_generate_zero_length() {
        let generator = PassphraseGenerator::default();
        assert!(matches!(
            generator.generate(0),
            Err(Error::InvalidPhraseLength(0))
        ));
    }

    #[test]
    fn test_generate_samples_with_replacement() {
        // A single word vocabulary still yields a full length phrase
        let generator = PassphraseGenerator::new(Vocabulary::new(vec!["abandon"]).unwrap());
        let mnemonic = generator.generate(12).unwrap();
        assert_eq!(mnemonic.len(), 12);
        assert!(mnemonic.words().iter().all(|w| w == "abandon"));
    }

    #[test]
    fn test_generate_is_deterministic_for_seed() {
        let generator = PassphraseGenerator::default();
        let a = generator
            .generate_with_rng(12, &mut StdRng::seed_from_u64(7))
            .unwrap();
        let b = generator
            .generate_with_rng(12, &mut StdRng::seed_from_u64(7))
            .unwrap();
        assert_eq!(a, b);
    }
}
