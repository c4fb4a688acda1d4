//! Onboarding flow
//!
//! Wires the generator, staging store, quiz and finalization bridge into the
//! create wallet flow (password, phrase display, verification) and the import
//! flow.

use std::sync::Arc;

use mycoin_common::wallet::Wallet;
use mycoin_common::{Mnemonic, PhraseLength};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::finalize::Finalizer;
use crate::forms::{ImportPhraseForm, PasswordForm};
use crate::passphrase::PassphraseGenerator;
use crate::quiz::QuizConfig;
use crate::session::WalletSession;
use crate::staging::StagingStore;
use crate::verify::{PhraseSource, Submission, Verification};
use crate::Error;

/// Screen the flow should show next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    /// Choose a password
    Password,
    /// Show the recovery phrase
    PhraseDisplay,
    /// Verify the recovery phrase
    Verify,
    /// Wallet ready
    Dashboard,
    /// Staged data is gone, start over
    Restart,
}

/// Phrase to show after the password step
#[derive(Debug, Clone)]
pub struct PhraseDisplay {
    /// Generated user id
    pub user_id: String,
    /// Generated phrase
    pub mnemonic: Mnemonic,
}

/// Create and import flows
#[derive(Debug)]
pub struct Onboarding {
    generator: PassphraseGenerator,
    phrase_length: PhraseLength,
    quiz: QuizConfig,
    staging: StagingStore,
    finalizer: Finalizer,
}

impl Onboarding {
    /// Create new [`Onboarding`] with default generator and quiz settings
    pub fn new(session: Arc<WalletSession>, staging: StagingStore) -> Self {
        Self {
            generator: PassphraseGenerator::default(),
            phrase_length: PhraseLength::default(),
            quiz: QuizConfig::default(),
            finalizer: Finalizer::new(session, staging.clone()),
            staging,
        }
    }

    /// Set the generated phrase length
    pub fn with_phrase_length(mut self, phrase_length: PhraseLength) -> Self {
        self.phrase_length = phrase_length;
        self
    }

    /// Set the quiz settings
    pub fn with_quiz(mut self, quiz: QuizConfig) -> Self {
        self.quiz = quiz;
        self
    }

    /// Set the phrase generator
    pub fn with_generator(mut self, generator: PassphraseGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Staging store
    pub fn staging(&self) -> &StagingStore {
        &self.staging
    }

    /// Finalization bridge
    pub fn finalizer(&self) -> &Finalizer {
        &self.finalizer
    }

    /// Password step: validate, generate a phrase and stage it
    #[instrument(skip_all)]
    pub async fn start(&self, form: &PasswordForm) -> Result<PhraseDisplay, Error> {
        form.validate()?;

        let user_id = Uuid::new_v4().to_string();
        let mnemonic = self.generator.generate_phrase(self.phrase_length)?;

        self.staging
            .store(&user_id, &mnemonic.phrase(), &form.password)
            .await?;

        tracing::info!("Started wallet creation for user {}", user_id);

        Ok(PhraseDisplay { user_id, mnemonic })
    }

    /// Staged phrase, for the display step
    pub async fn phrase(&self) -> Result<Mnemonic, Error> {
        let staged = self.staging.retrieve().await.ok_or(Error::NoStagedWallet)?;
        Ok(staged.mnemonic()?)
    }

    /// Build the verification for the staged phrase
    pub async fn begin_verification(&self) -> Verification {
        Verification::load(&PhraseSource::Staged(self.staging.clone()), &self.quiz).await
    }

    /// Submit the verification and create the wallet when it passes
    ///
    /// A mismatch or a creation failure leaves `verification` ready for another
    /// attempt.
    #[instrument(skip_all)]
    pub async fn complete(&self, verification: &mut Verification) -> Result<OnboardingStep, Error> {
        match verification.submit()? {
            Submission::Finalize(_) => {
                verification.finalize(&self.finalizer).await?;
            }
            Submission::Verified => {}
        }

        Ok(verification.next_step())
    }

    /// Import a wallet from an existing phrase
    #[instrument(skip_all)]
    pub async fn import_phrase(&self, form: &ImportPhraseForm) -> Result<Wallet, Error> {
        let mnemonic = form.validate()?;
        let user_id = Uuid::new_v4().to_string();

        self.finalizer
            .session()
            .create_wallet(&user_id, &mnemonic.phrase())
            .await
    }

    /// Drop staged data and go back to the password step
    pub async fn restart(&self) -> OnboardingStep {
        self.staging.clear().await;
        OnboardingStep::Password
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::ValidationError;
    use crate::storage::MemoryStorage;
    use crate::test_utils::MockWalletConnector;
    use crate::verify::VerificationState;

    fn onboarding(connector: Arc<MockWalletConnector>) -> Onboarding {
        let session = Arc::new(WalletSession::new(
            connector,
            Arc::new(MemoryStorage::new()),
        ));
        Onboarding::new(session, StagingStore::new(Arc::new(MemoryStorage::new())))
    }

    async fn answer_correctly(onboarding: &Onboarding, verification: &mut Verification) {
        let mnemonic = onboarding.phrase().await.unwrap();
        let positions: Vec<usize> = verification.challenge().unwrap().positions().collect();
        for position in positions {
            verification
                .select_word(position, mnemonic.word(position).unwrap())
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_start_stages_phrase() {
        let flow = onboarding(Arc::new(MockWalletConnector::new()));

        let display = flow
            .start(&PasswordForm::new("hunter22", "hunter22"))
            .await
            .unwrap();

        assert_eq!(display.mnemonic.len(), 12);
        let staged = flow.staging().retrieve().await.unwrap();
        assert_eq!(staged.user_id, display.user_id);
        assert_eq!(staged.passphrase, display.mnemonic.phrase());
        assert_eq!(staged.password, "hunter22");
        assert_eq!(flow.phrase().await.unwrap(), display.mnemonic);
    }

    #[tokio::test]
    async fn test_start_rejects_mismatched_passwords() {
        let flow = onboarding(Arc::new(MockWalletConnector::new()));

        let err = flow
            .start(&PasswordForm::new("hunter22", "hunter23"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Validation(ValidationError::PasswordMismatch)
        ));
        assert!(flow.staging().retrieve().await.is_none());
    }

    #[tokio::test]
    async fn test_twenty_four_words() {
        let flow = onboarding(Arc::new(MockWalletConnector::new()))
            .with_phrase_length(PhraseLength::TwentyFour);

        let display = flow.start(&PasswordForm::new("pw", "pw")).await.unwrap();
        assert_eq!(display.mnemonic.len(), 24);

        let verification = flow.begin_verification().await;
        assert_eq!(verification.challenge().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_complete_creates_wallet() {
        let connector = Arc::new(MockWalletConnector::new());
        let flow = onboarding(connector.clone());

        let display = flow.start(&PasswordForm::new("pw", "pw")).await.unwrap();
        let mut verification = flow.begin_verification().await;
        answer_correctly(&flow, &mut verification).await;

        let step = flow.complete(&mut verification).await.unwrap();

        assert_eq!(step, OnboardingStep::Dashboard);
        assert_eq!(verification.state(), VerificationState::Done);
        assert_eq!(
            connector.create_calls(),
            vec![(display.user_id.clone(), display.mnemonic.phrase())]
        );
        assert!(flow.staging().retrieve().await.is_none());
        assert!(flow.finalizer().session().wallet().await.is_some());
    }

    #[tokio::test]
    async fn test_restart_clears_staging() {
        let flow = onboarding(Arc::new(MockWalletConnector::new()));
        flow.start(&PasswordForm::new("pw", "pw")).await.unwrap();

        assert_eq!(flow.restart().await, OnboardingStep::Password);
        assert!(matches!(flow.phrase().await, Err(Error::NoStagedWallet)));

        let verification = flow.begin_verification().await;
        assert_eq!(verification.next_step(), OnboardingStep::Restart);
    }

    #[tokio::test]
    async fn test_import_phrase() {
        let connector = Arc::new(MockWalletConnector::new());
        let flow = onboarding(connector.clone());

        let phrase = "abandon ability able about above absent absorb abstract absurd abuse access accident";
        let wallet = flow
            .import_phrase(&ImportPhraseForm::new(phrase, "password1", "password1"))
            .await
            .unwrap();

        assert_eq!(wallet.address, "0xmock");
        assert_eq!(connector.create_calls()[0].1, phrase);

        let err = flow
            .import_phrase(&ImportPhraseForm::new("abandon", "password1", "password1"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Recovery phrase must be 12 or 24 words");
    }
}
