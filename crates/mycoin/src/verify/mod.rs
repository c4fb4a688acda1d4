//! Recovery phrase verification
//!
//! Drives the quiz: sources the phrase, builds the [`Challenge`], records one
//! selection per challenged position and checks the answers. A successful check on a
//! staged wallet moves to [`VerificationState::Submitting`] and waits for
//! [`Verification::finalize`].

use std::collections::BTreeMap;

use mycoin_common::wallet::Wallet;
use mycoin_common::{Mnemonic, StagedWallet};
use rand::Rng;
use tracing::instrument;

use crate::finalize::Finalizer;
use crate::onboarding::OnboardingStep;
use crate::quiz::{select_challenge, Challenge, QuizConfig};
use crate::staging::{DisplayPhraseStore, StagingStore};
use crate::Error;

mod state;

pub use state::{check_state_transition, VerificationState};

/// Where the phrase under verification comes from
#[derive(Debug, Clone)]
pub enum PhraseSource {
    /// Staged wallet; a passed check leads to wallet creation
    Staged(StagingStore),
    /// Phrase kept for display only; a passed check ends the flow
    Display(DisplayPhraseStore),
}

impl PhraseSource {
    async fn load(&self) -> Option<(Option<StagedWallet>, Mnemonic)> {
        match self {
            PhraseSource::Staged(store) => {
                let staged = store.retrieve().await?;
                match staged.mnemonic() {
                    Ok(mnemonic) => Some((Some(staged), mnemonic)),
                    Err(err) => {
                        tracing::warn!("Staged wallet has no usable phrase: {}", err);
                        None
                    }
                }
            }
            PhraseSource::Display(store) => store.get().await.map(|m| (None, m)),
        }
    }
}

/// Outcome of a passed check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Staged wallet to hand to [`Verification::finalize`]
    Finalize(StagedWallet),
    /// Phrase verified, nothing to create
    Verified,
}

/// Verification state machine
#[derive(Debug)]
pub struct Verification {
    state: VerificationState,
    staged: Option<StagedWallet>,
    mnemonic: Option<Mnemonic>,
    challenge: Option<Challenge>,
    selections: BTreeMap<usize, String>,
    message: Option<String>,
}

impl Verification {
    /// Source the phrase and build a challenge using the thread RNG
    pub async fn load(source: &PhraseSource, config: &QuizConfig) -> Self {
        let sourced = source.load().await;
        Self::from_sourced(sourced, config, &mut rand::rng())
    }

    /// Source the phrase and build a challenge from `rng`
    pub async fn load_with_rng<R: Rng>(
        source: &PhraseSource,
        config: &QuizConfig,
        rng: &mut R,
    ) -> Self {
        let sourced = source.load().await;
        Self::from_sourced(sourced, config, rng)
    }

    fn from_sourced<R: Rng>(
        sourced: Option<(Option<StagedWallet>, Mnemonic)>,
        config: &QuizConfig,
        rng: &mut R,
    ) -> Self {
        let mut verification = Self {
            state: VerificationState::Loading,
            staged: None,
            mnemonic: None,
            challenge: None,
            selections: BTreeMap::new(),
            message: None,
        };

        let Some((staged, mnemonic)) = sourced else {
            tracing::debug!("No phrase to verify");
            verification.fail(Error::NoStagedWallet);
            return verification;
        };

        match select_challenge(&mnemonic, config.size, &config.vocabulary, rng) {
            Ok(challenge) => {
                verification.staged = staged;
                verification.mnemonic = Some(mnemonic);
                verification.challenge = Some(challenge);
                verification.state = VerificationState::Ready;
            }
            Err(err) => {
                tracing::error!("Could not build verification challenge: {}", err);
                verification.fail(err);
            }
        }

        verification
    }

    fn fail(&mut self, err: Error) {
        self.state = VerificationState::Error;
        self.message = Some(err.user_message());
    }

    fn transition(&mut self, new_state: VerificationState) -> Result<(), Error> {
        check_state_transition(self.state, new_state)?;
        self.state = new_state;
        Ok(())
    }

    /// Current state
    pub fn state(&self) -> VerificationState {
        self.state
    }

    /// Challenge, once loaded
    pub fn challenge(&self) -> Option<&Challenge> {
        self.challenge.as_ref()
    }

    /// Selected word for `position`
    pub fn selection(&self, position: usize) -> Option<&str> {
        self.selections.get(&position).map(String::as_str)
    }

    /// All selections
    pub fn selections(&self) -> &BTreeMap<usize, String> {
        &self.selections
    }

    /// Message to show the user
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Staged wallet under verification
    pub fn staged(&self) -> Option<&StagedWallet> {
        self.staged.as_ref()
    }

    /// Where the flow goes from the current state
    pub fn next_step(&self) -> OnboardingStep {
        match self.state {
            VerificationState::Error => OnboardingStep::Restart,
            VerificationState::Done => OnboardingStep::Dashboard,
            _ => OnboardingStep::Verify,
        }
    }

    /// Select `word` for `position`, replacing any earlier selection
    pub fn select_word(&mut self, position: usize, word: &str) -> Result<(), Error> {
        if !self.state.accepts_selection() {
            return Err(Error::InvalidState(self.state));
        }

        let item = self
            .challenge
            .as_ref()
            .and_then(|c| c.item(position))
            .ok_or(Error::UnknownPosition(position))?;

        if !item.has_option(word) {
            return Err(Error::InvalidOption(position));
        }

        self.transition(VerificationState::Ready)?;
        self.selections.insert(position, word.to_string());
        self.message = None;

        Ok(())
    }

    /// Every challenged position has a selection
    pub fn is_complete(&self) -> bool {
        self.challenge.as_ref().is_some_and(|challenge| {
            challenge
                .positions()
                .all(|position| self.selections.contains_key(&position))
        })
    }

    /// Check the selections against the phrase
    ///
    /// A mismatch never tells which position was wrong; selections are kept so the
    /// user can change some and submit again.
    pub fn submit(&mut self) -> Result<Submission, Error> {
        if !self.state.accepts_selection() {
            return Err(Error::InvalidState(self.state));
        }

        if !self.is_complete() {
            return Err(Error::IncompleteSelection);
        }

        let (Some(mnemonic), Some(challenge)) = (&self.mnemonic, &self.challenge) else {
            return Err(Error::InvalidState(self.state));
        };

        let all_match = challenge.positions().all(|position| {
            match (mnemonic.word(position), self.selections.get(&position)) {
                (Ok(word), Some(selected)) => word == selected.as_str(),
                _ => false,
            }
        });

        if !all_match {
            self.transition(VerificationState::Mismatched)?;
            let err = Error::VerificationMismatch;
            self.message = Some(err.user_message());
            return Err(err);
        }

        match self.staged.clone() {
            Some(staged) => {
                self.transition(VerificationState::Submitting)?;
                Ok(Submission::Finalize(staged))
            }
            None => {
                self.transition(VerificationState::Done)?;
                Ok(Submission::Verified)
            }
        }
    }

    /// Create the wallet for a passed check
    ///
    /// On failure the machine returns to [`VerificationState::Ready`] with the
    /// selections intact and the staged wallet untouched, so submitting again
    /// retries.
    #[instrument(skip_all)]
    pub async fn finalize(&mut self, finalizer: &Finalizer) -> Result<Wallet, Error> {
        if self.state != VerificationState::Submitting {
            return Err(Error::InvalidState(self.state));
        }

        let Some(staged) = self.staged.clone() else {
            return Err(Error::NoStagedWallet);
        };

        match finalizer.finalize(&staged).await {
            Ok(wallet) => {
                self.transition(VerificationState::Done)?;
                self.message = None;
                Ok(wallet)
            }
            Err(err) => {
                self.transition(VerificationState::Ready)?;
                self.message = Some(err.user_message());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::passphrase::Vocabulary;
    use crate::storage::MemoryStorage;

    const PHRASE: &str =
        "abandon ability able about above absent absorb abstract absurd abuse access accident";

    async fn staged_source() -> (PhraseSource, StagingStore) {
        let store = StagingStore::new(Arc::new(MemoryStorage::new()));
        store.store("user-1", PHRASE, "hunter22").await.unwrap();
        (PhraseSource::Staged(store.clone()), store)
    }

    fn correct_word(position: usize) -> String {
        PHRASE.split_whitespace().nth(position).unwrap().to_string()
    }

    fn wrong_word(verification: &Verification, position: usize) -> String {
        let correct = correct_word(position);
        verification
            .challenge()
            .unwrap()
            .item(position)
            .unwrap()
            .options
            .iter()
            .find(|o| **o != correct)
            .unwrap()
            .clone()
    }

    fn answer_all(verification: &mut Verification) {
        let positions: Vec<usize> = verification.challenge().unwrap().positions().collect();
        for position in positions {
            verification
                .select_word(position, &correct_word(position))
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_load_without_staged_wallet() {
        let store = StagingStore::new(Arc::new(MemoryStorage::new()));
        let verification =
            Verification::load(&PhraseSource::Staged(store), &QuizConfig::default()).await;

        assert_eq!(verification.state(), VerificationState::Error);
        assert!(verification.challenge().is_none());
        assert_eq!(verification.next_step(), OnboardingStep::Restart);
        assert!(verification
            .message()
            .unwrap()
            .starts_with("No wallet data found"));
    }

    #[tokio::test]
    async fn test_error_state_rejects_operations() {
        let store = StagingStore::new(Arc::new(MemoryStorage::new()));
        let mut verification =
            Verification::load(&PhraseSource::Staged(store), &QuizConfig::default()).await;

        assert!(matches!(
            verification.select_word(0, "abandon"),
            Err(Error::InvalidState(VerificationState::Error))
        ));
        assert!(matches!(
            verification.submit(),
            Err(Error::InvalidState(VerificationState::Error))
        ));
    }

    #[tokio::test]
    async fn test_load_builds_challenge() {
        let (source, _) = staged_source().await;
        let mut rng = StdRng::seed_from_u64(11);
        let verification =
            Verification::load_with_rng(&source, &QuizConfig::default(), &mut rng).await;

        assert_eq!(verification.state(), VerificationState::Ready);
        assert_eq!(verification.challenge().unwrap().len(), 4);
        assert_eq!(verification.staged().unwrap().user_id, "user-1");
        assert!(!verification.is_complete());
    }

    #[tokio::test]
    async fn test_select_word_rules() {
        let (source, _) = staged_source().await;
        let mut verification = Verification::load(&source, &QuizConfig::default()).await;

        let challenge = verification.challenge().unwrap().clone();
        let position = challenge.items()[0].position;
        let unchallenged = (0..12).find(|p| challenge.item(*p).is_none()).unwrap();

        assert!(matches!(
            verification.select_word(unchallenged, "abandon"),
            Err(Error::UnknownPosition(p)) if p == unchallenged
        ));
        assert!(matches!(
            verification.select_word(position, "not-an-option"),
            Err(Error::InvalidOption(_))
        ));

        // Last selection wins
        let wrong = wrong_word(&verification, position);
        verification.select_word(position, &wrong).unwrap();
        verification
            .select_word(position, &correct_word(position))
            .unwrap();
        assert_eq!(
            verification.selection(position),
            Some(correct_word(position).as_str())
        );
        assert_eq!(verification.selections().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_requires_complete_selection() {
        let (source, _) = staged_source().await;
        let mut verification = Verification::load(&source, &QuizConfig::default()).await;

        assert!(matches!(
            verification.submit(),
            Err(Error::IncompleteSelection)
        ));
        assert_eq!(verification.state(), VerificationState::Ready);
    }

    #[tokio::test]
    async fn test_mismatch_then_retry() {
        let (source, store) = staged_source().await;
        let mut verification = Verification::load(&source, &QuizConfig::default()).await;

        answer_all(&mut verification);
        let position = verification.challenge().unwrap().items()[2].position;
        let wrong = wrong_word(&verification, position);
        verification.select_word(position, &wrong).unwrap();

        assert!(matches!(
            verification.submit(),
            Err(Error::VerificationMismatch)
        ));
        assert_eq!(verification.state(), VerificationState::Mismatched);
        assert!(verification.is_complete());

        let message = verification.message().unwrap();
        assert!(!message.chars().any(|c| c.is_ascii_digit()));

        // Staged data untouched
        assert!(store.retrieve().await.is_some());

        verification
            .select_word(position, &correct_word(position))
            .unwrap();
        assert_eq!(verification.state(), VerificationState::Ready);
        assert!(verification.message().is_none());

        let submission = verification.submit().unwrap();
        assert!(matches!(submission, Submission::Finalize(ref s) if s.user_id == "user-1"));
        assert_eq!(verification.state(), VerificationState::Submitting);

        // No changes while the wallet is being created
        assert!(verification.select_word(position, &wrong).is_err());
    }

    #[tokio::test]
    async fn test_display_source_finishes_without_finalize() {
        let storage = Arc::new(MemoryStorage::new());
        let display = DisplayPhraseStore::new(storage);
        display
            .put(&PHRASE.parse::<Mnemonic>().unwrap())
            .await
            .unwrap();

        let mut verification =
            Verification::load(&PhraseSource::Display(display), &QuizConfig::default()).await;
        answer_all(&mut verification);

        assert_eq!(verification.submit().unwrap(), Submission::Verified);
        assert_eq!(verification.state(), VerificationState::Done);
        assert_eq!(verification.next_step(), OnboardingStep::Dashboard);
        assert!(verification.select_word(0, "abandon").is_err());
    }

    #[tokio::test]
    async fn test_insufficient_vocabulary_is_error_state() {
        let (source, _) = staged_source().await;
        let config = QuizConfig::new(4, Vocabulary::new(vec!["abandon", "zoo"]).unwrap()).unwrap();

        let verification = Verification::load(&source, &config).await;
        assert_eq!(verification.state(), VerificationState::Error);
        assert_eq!(
            verification.message(),
            Some("Recovery phrase settings are invalid")
        );
    }
}
