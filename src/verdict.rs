//! Final classification of a session run

use crate::automaton::AutomatonState;
use std::fmt;

/// Verdict derived from the state a run ended in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionVerdict {
    /// Ended in `Closed`: full open/close lifecycle observed
    Validated,
    /// Ended in `Trap`: protocol violation
    Rejected,
    /// Ended in `Listen` or `Active`: stream stopped before a FIN
    Incomplete,
}

impl SessionVerdict {
    pub fn from_state(state: AutomatonState) -> Self {
        match state {
            AutomatonState::Closed => SessionVerdict::Validated,
            AutomatonState::Trap => SessionVerdict::Rejected,
            AutomatonState::Listen | AutomatonState::Active => SessionVerdict::Incomplete,
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            SessionVerdict::Validated => "validated, clean close",
            SessionVerdict::Rejected => "rejected, security violation",
            SessionVerdict::Incomplete => "incomplete session",
        }
    }

    /// One-line banner printed under a text report
    pub fn banner(self) -> &'static str {
        match self {
            SessionVerdict::Validated => {
                "[SUCCESS] Traffic Pattern Validated. Session Closed Cleanly."
            }
            SessionVerdict::Rejected => "[ALERT]   Security Violation Detected. Packet Dropped.",
            SessionVerdict::Incomplete => "[WARN]    Incomplete Session (Did not close).",
        }
    }

    pub fn is_clean(self) -> bool {
        self == SessionVerdict::Validated
    }

    pub fn is_rejected(self) -> bool {
        self == SessionVerdict::Rejected
    }
}

impl fmt::Display for SessionVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.summary())
    }
}
