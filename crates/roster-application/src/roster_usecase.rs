//! Roster use case.
//!
//! `RosterUseCase` is the context object handed to every front end. It owns
//! the session, the day cache, the locale, the start list and the navigator,
//! and routes every mutation through them so that a logout, explicit or
//! forced by a rejected token, always leaves the client without token or
//! cached data.

use crate::day_cache::{CacheOutcome, DayCache};
use crate::locale_state::LocaleState;
use crate::navigation::Navigator;
use crate::retry_policy::Authorized;
use crate::session_state::SessionState;
use crate::start_list_state::StartListState;
use chrono::NaiveDate;
use roster_core::config::ClientConfig;
use roster_core::error::Result;
use roster_core::gateway::RosterGateway;
use roster_core::model::{Member, Reservation, RosterEntryType};
use roster_core::storage::{PreferenceStore, SessionStore, StartListStore};
use std::sync::Arc;

/// Use case for the roster client.
///
/// # Responsibilities
///
/// - Logging in and out, restoring a persisted session at start-up
/// - Keeping the calendar and day records consistent with the backend
/// - Reading reference data (reservations, member directory) on demand
/// - Clearing cached data whenever the session ends
pub struct RosterUseCase {
    gateway: Arc<dyn RosterGateway>,
    session: Arc<SessionState>,
    days: Arc<DayCache>,
    locale: Arc<LocaleState>,
    start_list: Arc<StartListState>,
    navigator: Arc<Navigator>,
}

impl RosterUseCase {
    pub fn new(
        gateway: Arc<dyn RosterGateway>,
        session_store: Arc<dyn SessionStore>,
        preference_store: Arc<dyn PreferenceStore>,
        start_list_store: Arc<dyn StartListStore>,
        config: &ClientConfig,
    ) -> Self {
        let session = Arc::new(SessionState::new(gateway.clone(), session_store, config));
        Self {
            days: Arc::new(DayCache::new(gateway.clone(), session.clone())),
            locale: Arc::new(LocaleState::new(preference_store)),
            start_list: Arc::new(StartListState::new(start_list_store)),
            navigator: Arc::new(Navigator::new(session.clone())),
            gateway,
            session,
        }
    }

    /// Loads the persisted session, preferences and start list.
    pub async fn restore(&self) -> Result<()> {
        self.session.restore().await?;
        self.locale.restore().await?;
        self.start_list.restore().await?;
        self.navigator.sync().await;
        Ok(())
    }

    /// Logs in; data cached for a previous user is dropped.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        self.session.login(username, password).await?;
        self.days.clear().await;
        Ok(())
    }

    /// Idempotent. Cached data is dropped even when clearing storage fails.
    pub async fn logout(&self) -> Result<()> {
        // the session ends first so no in-flight fetch can refill the cache
        let result = self.session.logout().await;
        self.days.clear().await;
        result
    }

    pub async fn check_identity(&self) -> Result<()> {
        self.session.check_identity().await?;
        if !self.session.is_authenticated() {
            self.days.clear().await;
        }
        Ok(())
    }

    pub async fn refresh_calendar(&self) -> Result<CacheOutcome> {
        self.days.refresh_calendar().await
    }

    pub async fn load_day(&self, date: NaiveDate) -> Result<CacheOutcome> {
        self.days.load_day(date).await
    }

    pub async fn update_day(
        &self,
        date: NaiveDate,
        entry_type: RosterEntryType,
        remarks: Option<String>,
    ) -> Result<CacheOutcome> {
        self.days.update_day(date, entry_type, remarks).await
    }

    /// All aircraft reservations. Not cached.
    pub async fn reservations(&self) -> Result<Authorized<Vec<Reservation>>> {
        let gateway = &self.gateway;
        let result = self
            .session
            .authorized(|token| async move { gateway.fetch_reservations(&token).await })
            .await?;
        Ok(self.settle(result).await)
    }

    /// Reservations with any part of their period on `date`.
    pub async fn reservations_on(&self, date: NaiveDate) -> Result<Authorized<Vec<Reservation>>> {
        let all = self.reservations().await?;
        Ok(all.map(|reservations| {
            reservations
                .into_iter()
                .filter(|reservation| reservation.period.overlaps(&date))
                .collect()
        }))
    }

    /// The member directory. Not cached.
    pub async fn members(&self) -> Result<Authorized<Vec<Member>>> {
        let gateway = &self.gateway;
        let result = self
            .session
            .authorized(|token| async move { gateway.fetch_members(&token).await })
            .await?;
        Ok(self.settle(result).await)
    }

    pub fn session(&self) -> &Arc<SessionState> {
        &self.session
    }

    pub fn days(&self) -> &Arc<DayCache> {
        &self.days
    }

    pub fn locale(&self) -> &Arc<LocaleState> {
        &self.locale
    }

    pub fn start_list(&self) -> &Arc<StartListState> {
        &self.start_list
    }

    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.navigator
    }

    async fn settle<T>(&self, result: Authorized<T>) -> Authorized<T> {
        if result.is_session_ended() {
            self.days.clear().await;
        }
        result
    }
}
