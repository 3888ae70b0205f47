//! Application layer for the roster client.
//!
//! Owns the client state (session, cached roster data, locale, start list, current route)
//! and coordinates it with the remote gateway and durable storage.

pub mod day_cache;
pub mod locale_state;
pub mod navigation;
pub mod retry_policy;
pub mod roster_usecase;
pub mod session_state;
pub mod start_list_state;

#[cfg(test)]
mod test_support;

pub use day_cache::{CacheOutcome, DayCache, DayState};
pub use locale_state::LocaleState;
pub use navigation::{NavigationDecision, NavigationGuard, Navigator};
pub use retry_policy::{Attempt, Authorized, RetryDecision};
pub use roster_usecase::RosterUseCase;
pub use session_state::SessionState;
pub use start_list_state::StartListState;
