//! Harness run state machine

use crate::{Error, Result};

/// Phase a harness run is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    /// Nothing opened yet
    Init,

    /// Driver `open` in progress
    Opening,

    /// Connection established
    Opened,

    /// Liveness check in progress
    Verifying,

    /// Liveness check succeeded
    Verified,

    /// Statement submitted
    Querying,

    /// Reading rows from the cursor
    Iterating,

    /// Cursor exhausted and released
    Done,

    /// Resources released
    Closed,
}

impl HarnessState {
    /// Check if transition is valid
    pub fn can_transition_to(&self, next: HarnessState) -> bool {
        use HarnessState::*;

        matches!(
            (self, next),
            (Init, Opening)
                | (Opening, Opened)
                | (Opened, Verifying)
                | (Verifying, Verified)
                | (Verified, Querying)
                | (Querying, Iterating)
                | (Iterating, Done)
                | (_, Closed)
        )
    }

    /// Transition to new state
    pub fn transition(&mut self, next: HarnessState) -> Result<()> {
        if !self.can_transition_to(next) {
            return Err(Error::InvalidState {
                expected: format!("valid transition from {:?}", self),
                actual: format!("{:?}", next),
            });
        }
        *self = next;
        Ok(())
    }
}

impl std::fmt::Display for HarnessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::Opening => write!(f, "opening"),
            Self::Opened => write!(f, "opened"),
            Self::Verifying => write!(f, "verifying"),
            Self::Verified => write!(f, "verified"),
            Self::Querying => write!(f, "querying"),
            Self::Iterating => write!(f, "iterating"),
            Self::Done => write!(f, "done"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_only_path() {
        let mut state = HarnessState::Init;
        assert!(state.transition(HarnessState::Opening).is_ok());
        assert!(state.transition(HarnessState::Opened).is_ok());
        assert!(state.transition(HarnessState::Verifying).is_ok());
        assert!(state.transition(HarnessState::Verified).is_ok());
        assert!(state.transition(HarnessState::Closed).is_ok());
    }

    #[test]
    fn test_query_path() {
        let mut state = HarnessState::Verified;
        assert!(state.transition(HarnessState::Querying).is_ok());
        assert!(state.transition(HarnessState::Iterating).is_ok());
        assert!(state.transition(HarnessState::Done).is_ok());
        assert!(state.transition(HarnessState::Closed).is_ok());
    }

    #[test]
    fn test_cannot_query_before_verify() {
        let mut state = HarnessState::Opened;
        assert!(state.transition(HarnessState::Querying).is_err());
        assert_eq!(state, HarnessState::Opened);
    }

    #[test]
    fn test_close_from_any_state() {
        let mut state = HarnessState::Iterating;
        assert!(state.transition(HarnessState::Closed).is_ok());

        let mut state = HarnessState::Opening;
        assert!(state.transition(HarnessState::Closed).is_ok());
    }

    #[test]
    fn test_closed_is_terminal() {
        let mut state = HarnessState::Closed;
        assert!(state.transition(HarnessState::Opening).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(HarnessState::Verified.to_string(), "verified");
        assert_eq!(HarnessState::Closed.to_string(), "closed");
    }
}
