//! Verification states and transition rules

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Verification state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationState {
    /// Phrase not sourced yet
    Loading,
    /// Challenge built, accepting selections
    Ready,
    /// All answers matched, wallet creation pending
    Submitting,
    /// Last submission had a wrong answer
    Mismatched,
    /// Verified (and finalized, when a wallet was staged)
    Done,
    /// No phrase to verify
    Error,
}

impl VerificationState {
    /// No further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, VerificationState::Done | VerificationState::Error)
    }

    /// Selections may be changed
    pub fn accepts_selection(&self) -> bool {
        matches!(
            self,
            VerificationState::Ready | VerificationState::Mismatched
        )
    }
}

impl fmt::Display for VerificationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VerificationState::Loading => "loading",
            VerificationState::Ready => "ready",
            VerificationState::Submitting => "submitting",
            VerificationState::Mismatched => "mismatched",
            VerificationState::Done => "done",
            VerificationState::Error => "error",
        };
        write!(f, "{s}")
    }
}

#[inline]
/// Check if the verification state transition is allowed
///
/// Valid transitions:
/// - Loading -> Ready, Error
/// - Ready -> Ready, Submitting, Mismatched, Done
/// - Mismatched -> Ready, Submitting, Mismatched, Done
/// - Submitting -> Ready, Done
/// - Done, Error -> (no transitions allowed)
pub fn check_state_transition(
    current_state: VerificationState,
    new_state: VerificationState,
) -> Result<(), Error> {
    use VerificationState::*;

    let is_valid_transition = match current_state {
        Loading => matches!(new_state, Ready | Error),
        Ready | Mismatched => matches!(new_state, Ready | Submitting | Mismatched | Done),
        Submitting => matches!(new_state, Ready | Done),
        Done | Error => false,
    };

    if !is_valid_transition {
        Err(crate::Error::InvalidState(current_state))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states_reject_everything() {
        for next in [
            VerificationState::Loading,
            VerificationState::Ready,
            VerificationState::Submitting,
            VerificationState::Mismatched,
            VerificationState::Done,
            VerificationState::Error,
        ] {
            assert!(check_state_transition(VerificationState::Done, next).is_err());
            assert!(check_state_transition(VerificationState::Error, next).is_err());
        }
    }

    #[test]
    fn test_valid_transitions() {
        use VerificationState::*;

        assert!(check_state_transition(Loading, Ready).is_ok());
        assert!(check_state_transition(Loading, Error).is_ok());
        assert!(check_state_transition(Ready, Submitting).is_ok());
        assert!(check_state_transition(Ready, Mismatched).is_ok());
        assert!(check_state_transition(Mismatched, Ready).is_ok());
        assert!(check_state_transition(Submitting, Done).is_ok());
        assert!(check_state_transition(Submitting, Ready).is_ok());

        assert!(check_state_transition(Loading, Done).is_err());
        assert!(check_state_transition(Submitting, Mismatched).is_err());
    }
}
