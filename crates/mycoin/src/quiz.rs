//! Quiz selector
//!
//! Picks the recovery phrase positions the user must re-identify and builds three
//! shuffled options for each: the correct word and two distractors that appear
//! nowhere in the phrase.

use std::collections::BTreeSet;

use mycoin_common::Mnemonic;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::passphrase::Vocabulary;
use crate::Error;

/// Default number of challenged positions
pub const DEFAULT_QUIZ_SIZE: usize = 4;

/// Distractors offered next to the correct word
pub const DISTRACTORS_PER_POSITION: usize = 2;

/// Options per challenged position
pub const OPTIONS_PER_POSITION: usize = DISTRACTORS_PER_POSITION + 1;

/// Quiz settings
#[derive(Debug, Clone)]
pub struct QuizConfig {
    /// Positions to challenge, clamped to the phrase length
    pub size: usize,
    /// Distractor source
    pub vocabulary: Vocabulary,
}

impl QuizConfig {
    /// Create new [`QuizConfig`]
    pub fn new(size: usize, vocabulary: Vocabulary) -> Result<Self, Error> {
        if size == 0 {
            return Err(Error::InvalidQuizSize(size));
        }

        Ok(Self { size, vocabulary })
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_QUIZ_SIZE,
            vocabulary: Vocabulary::default(),
        }
    }
}

/// One challenged position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeItem {
    /// Zero based index into the phrase
    pub position: usize,
    /// Shuffled options, exactly one of which is correct
    pub options: [String; OPTIONS_PER_POSITION],
}

impl ChallengeItem {
    /// Whether `word` is one of the options
    pub fn has_option(&self, word: &str) -> bool {
        self.options.iter().any(|o| o == word)
    }
}

/// Verification challenge
///
/// Items are ordered by ascending position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    items: Vec<ChallengeItem>,
}

impl Challenge {
    /// Challenged positions with their options
    pub fn items(&self) -> &[ChallengeItem] {
        &self.items
    }

    /// Item for `position`
    pub fn item(&self, position: usize) -> Option<&ChallengeItem> {
        self.items.iter().find(|item| item.position == position)
    }

    /// Challenged positions in ascending order
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.items.iter().map(|item| item.position)
    }

    /// Number of challenged positions
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there is nothing to verify
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Build a challenge over `k` positions of `mnemonic`
pub fn select_challenge<R: Rng>(
    mnemonic: &Mnemonic,
    k: usize,
    vocabulary: &Vocabulary,
    rng: &mut R,
) -> Result<Challenge, Error> {
    if mnemonic.is_empty() {
        return Err(mycoin_common::Error::EmptyMnemonic.into());
    }

    if k == 0 {
        return Err(Error::InvalidQuizSize(k));
    }

    // Checked up front so distractor sampling always terminates
    let available = vocabulary
        .words()
        .iter()
        .filter(|word| !mnemonic.contains(word))
        .count();

    if available < DISTRACTORS_PER_POSITION {
        return Err(Error::InsufficientVocabulary {
            needed: DISTRACTORS_PER_POSITION,
            available,
        });
    }

    let k = k.min(mnemonic.len());

    let mut positions = BTreeSet::new();
    while positions.len() < k {
        positions.insert(rng.random_range(0..mnemonic.len()));
    }

    let mut items = Vec::with_capacity(k);

    for position in positions {
        let correct = mnemonic.word(position)?;

        let mut distractors: Vec<&str> = Vec::with_capacity(DISTRACTORS_PER_POSITION);
        while distractors.len() < DISTRACTORS_PER_POSITION {
            let candidate = vocabulary.random_word(rng);

            if candidate == correct
                || mnemonic.contains(candidate)
                || distractors.contains(&candidate)
            {
                continue;
            }

            distractors.push(candidate);
        }

        let mut options = [
            correct.to_string(),
            distractors[0].to_string(),
            distractors[1].to_string(),
        ];
        shuffle(&mut options, rng);

        items.push(ChallengeItem { position, options });
    }

    tracing::debug!("Selected {} verification positions", items.len());

    Ok(Challenge { items })
}

/// Fisher-Yates shuffle
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::str::FromStr;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    const PHRASE: &str =
        "abandon ability able about above absent absorb abstract absurd abuse access accident";

    fn mnemonic() -> Mnemonic {
        Mnemonic::from_str(PHRASE).unwrap()
    }

    #[test]
    fn test_fixed_phrase_four_positions() {
        let mnemonic = mnemonic();
        let vocabulary = Vocabulary::bip39_english();
        let mut rng = StdRng::seed_from_u64(42);

        let challenge = select_challenge(&mnemonic, 4, &vocabulary, &mut rng).unwrap();

        assert_eq!(challenge.len(), 4);
        let positions: HashSet<usize> = challenge.positions().collect();
        assert_eq!(positions.len(), 4);

        for item in challenge.items() {
            assert!(item.position < 12);
            let correct = mnemonic.word(item.position).unwrap();

            let options: HashSet<&str> = item.options.iter().map(String::as_str).collect();
            assert_eq!(options.len(), 3);
            assert!(options.contains(correct));

            let distractors: Vec<&String> =
                item.options.iter().filter(|o| *o != correct).collect();
            assert_eq!(distractors.len(), 2);
            assert!(distractors.iter().all(|d| !mnemonic.contains(d)));
            assert!(distractors.iter().all(|d| vocabulary.contains(d)));
        }
    }

    #[test]
    fn test_positions_sorted() {
        let mut rng = StdRng::seed_from_u64(1);
        let challenge =
            select_challenge(&mnemonic(), 6, &Vocabulary::default(), &mut rng).unwrap();

        let positions: Vec<usize> = challenge.positions().collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_every_k_up_to_length() {
        let mnemonic = mnemonic();
        let vocabulary = Vocabulary::default();

        for k in 1..=mnemonic.len() {
            let mut rng = StdRng::seed_from_u64(k as u64);
            let challenge = select_challenge(&mnemonic, k, &vocabulary, &mut rng).unwrap();
            assert_eq!(challenge.len(), k);
            assert_eq!(challenge.positions().collect::<HashSet<_>>().len(), k);
        }
    }

    #[test]
    fn test_k_clamped_to_length() {
        let mut rng = StdRng::seed_from_u64(3);
        let challenge =
            select_challenge(&mnemonic(), 50, &Vocabulary::default(), &mut rng).unwrap();

        assert_eq!(
            challenge.positions().collect::<Vec<_>>(),
            (0..12).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_zero_k_rejected() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(matches!(
            select_challenge(&mnemonic(), 0, &Vocabulary::default(), &mut rng),
            Err(Error::InvalidQuizSize(0))
        ));
    }

    #[test]
    fn test_insufficient_vocabulary() {
        let mnemonic = Mnemonic::from_str("apple banana").unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        // Only one word outside the phrase
        let vocabulary = Vocabulary::new(vec!["apple", "banana", "cherry"]).unwrap();
        let err = select_challenge(&mnemonic, 2, &vocabulary, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientVocabulary {
                needed: 2,
                available: 1
            }
        ));

        // Two are enough
        let vocabulary = Vocabulary::new(vec!["apple", "banana", "cherry", "date"]).unwrap();
        let challenge = select_challenge(&mnemonic, 2, &vocabulary, &mut rng).unwrap();
        for item in challenge.items() {
            assert!(item.has_option("cherry"));
            assert!(item.has_option("date"));
        }
    }

    #[test]
    fn test_repeated_words_in_phrase() {
        let mnemonic = Mnemonic::from_str("apple apple apple").unwrap();
        let vocabulary = Vocabulary::new(vec!["apple", "banana", "cherry"]).unwrap();
        let mut rng = StdRng::seed_from_u64(9);

        let challenge = select_challenge(&mnemonic, 3, &vocabulary, &mut rng).unwrap();
        for item in challenge.items() {
            assert!(item.has_option("apple"));
            assert!(item.has_option("banana"));
            assert!(item.has_option("cherry"));
        }
    }

    #[test]
    fn test_correct_slot_is_unbiased() {
        let mnemonic = mnemonic();
        let vocabulary = Vocabulary::default();
        let mut rng = StdRng::seed_from_u64(2024);
        let mut slots = [0usize; OPTIONS_PER_POSITION];

        for _ in 0..3000 {
            let challenge = select_challenge(&mnemonic, 1, &vocabulary, &mut rng).unwrap();
            let item = &challenge.items()[0];
            let correct = mnemonic.word(item.position).unwrap();
            let slot = item
                .options
                .iter()
                .position(|o| o == correct)
                .unwrap();
            slots[slot] += 1;
        }

        // Expected 1000 per slot
        for count in slots {
            assert!((850..=1150).contains(&count), "slot counts {slots:?}");
        }
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut items = vec![1, 2, 3, 4, 5];
        shuffle(&mut items, &mut rng);
        items.sort_unstable();
        assert_eq!(items, vec![1, 2, 3, 4, 5]);

        let mut empty: Vec<u8> = Vec::new();
        shuffle(&mut empty, &mut rng);
    }
}
