//! MyCoin wallet onboarding
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(rustdoc::bare_urls)]

pub mod connector;
pub mod error;
pub mod finalize;
pub mod formatter;
pub mod forms;
pub mod onboarding;
pub mod passphrase;
pub mod quiz;
pub mod session;
pub mod staging;
pub mod storage;
pub mod verify;

mod test_utils;

/// Re-export common types
#[doc(hidden)]
pub use mycoin_common::{
    database, mnemonic, staged, util, wallet as types, Mnemonic, PhraseLength, StagedWallet,
};

pub use error::Error;
pub use finalize::Finalizer;
pub use onboarding::{Onboarding, OnboardingStep};
pub use passphrase::{PassphraseGenerator, Vocabulary};
pub use quiz::{select_challenge, Challenge, QuizConfig};
pub use session::WalletSession;
pub use staging::StagingStore;
pub use verify::{Verification, VerificationState};

#[doc(hidden)]
#[cfg(feature = "http")]
pub use self::connector::HttpClient;
