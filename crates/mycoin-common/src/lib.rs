//! MyCoin shared types and functions.
//!
//! This crate is the base foundation to build things that can interact with the MyCoin wallet
//! backend and the onboarding flow.
//!
//! This is meant to contain the shared types, traits and common functions that are used across the
//! internal crates.

pub mod database;
pub mod error;
pub mod mnemonic;
pub mod staged;
pub mod util;
pub mod wallet;

pub use error::Error;
pub use mnemonic::{Mnemonic, PhraseLength};
pub use staged::StagedWallet;
