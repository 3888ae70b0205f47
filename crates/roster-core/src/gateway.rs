//! Remote gateway trait.
//!
//! Defines the contract between the client state machine and the roster
//! backend, decoupling session and cache logic from the transport.

use crate::error::Result;
use crate::model::{DayOverview, Member, Reservation, RosterDay, User};
use async_trait::async_trait;
use chrono::NaiveDate;

/// One operation per backend capability.
///
/// # Implementation Notes
///
/// Implementations must:
/// - Reject an empty token with [`RosterError::Unauthenticated`] before any
///   network call is made (every operation except `login`)
/// - Map a 401 answer to [`RosterError::Unauthorized`]
/// - Map transport failures to [`RosterError::Network`]
/// - Never retry; retry policy belongs to the session layer
///
/// [`RosterError::Unauthenticated`]: crate::error::RosterError::Unauthenticated
/// [`RosterError::Unauthorized`]: crate::error::RosterError::Unauthorized
/// [`RosterError::Network`]: crate::error::RosterError::Network
#[async_trait]
pub trait RosterGateway: Send + Sync {
    /// Exchanges credentials for an opaque bearer token.
    async fn login(&self, username: &str, password: &str) -> Result<String>;

    async fn fetch_me(&self, token: &str) -> Result<User>;

    async fn fetch_calendar(&self, token: &str) -> Result<Vec<DayOverview>>;

    async fn fetch_reservations(&self, token: &str) -> Result<Vec<Reservation>>;

    async fn fetch_members(&self, token: &str) -> Result<Vec<Member>>;

    async fn fetch_day(&self, date: NaiveDate, token: &str) -> Result<RosterDay>;

    /// Sends the full record of a day back to the backend.
    async fn update_day(&self, date: NaiveDate, token: &str, day: &RosterDay) -> Result<()>;
}
