//! Storage backends

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
pub mod memory;

/// re-export types
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;
pub use memory::{DetachedStorage, MemoryStorage};
pub use mycoin_common::database::{
    Error, SessionStorage, DISPLAY_PHRASE_KEY, STAGED_WALLET_KEY, WALLET_KEY,
};
