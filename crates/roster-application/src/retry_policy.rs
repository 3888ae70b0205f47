//! Silent re-login policy.
//!
//! Decides what happens when an authenticated call fails. The policy is a
//! pure function of the attempt number, the error and whether credentials
//! are cached, so the single-retry bound can be checked in isolation:
//! `decide(Attempt::Retried, ..)` never asks for another re-login.

use roster_core::error::RosterError;

/// Which call of a chain failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// The original call with the current token.
    First,
    /// The single retry after a silent re-login.
    Retried,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Hand the error to the caller unchanged.
    Propagate,
    /// Log in again with the cached credentials and retry once.
    SilentRelogin,
    /// End the session and absorb the error.
    Logout,
}

/// Decides how to react to a failed authenticated call.
pub fn decide(attempt: Attempt, error: &RosterError, credentials_cached: bool) -> RetryDecision {
    if !error.is_unauthorized() {
        return RetryDecision::Propagate;
    }
    match attempt {
        Attempt::First if credentials_cached => RetryDecision::SilentRelogin,
        Attempt::First | Attempt::Retried => RetryDecision::Logout,
    }
}

/// Result of an authenticated call that went through the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorized<T> {
    /// Succeeded with the token that was current.
    Fresh(T),
    /// Succeeded on the retry after a silent re-login.
    Recovered(T),
    /// The token was rejected and could not be renewed; the session is over.
    SessionEnded,
}

impl<T> Authorized<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Fresh(value) | Self::Recovered(value) => Some(value),
            Self::SessionEnded => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Authorized<U> {
        match self {
            Self::Fresh(value) => Authorized::Fresh(f(value)),
            Self::Recovered(value) => Authorized::Recovered(f(value)),
            Self::SessionEnded => Authorized::SessionEnded,
        }
    }

    pub fn is_session_ended(&self) -> bool {
        matches!(self, Self::SessionEnded)
    }
}
