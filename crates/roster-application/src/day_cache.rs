//! Day Cache - calendar overview and per-date roster records.
//!
//! The overview is replaced wholesale on every refresh. Day records are keyed
//! by date and overwritten by every completed fetch, so the cached record is
//! always the result of the last fetch that finished.
//!
//! Contents are tagged with the session generation they were fetched under.
//! A result whose session ended while it was in flight is dropped, and
//! contents of an earlier session read as empty.

use crate::retry_policy::Authorized;
use crate::session_state::SessionState;
use chrono::NaiveDate;
use roster_core::error::{Result, RosterError};
use roster_core::gateway::RosterGateway;
use roster_core::model::{DayOverview, RosterDay, RosterEntryType};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Synchronization state of a cached day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayState {
    /// Matches the last fetch.
    Loaded,
    /// Carries a local edit the backend has not confirmed.
    Edited,
}

/// How a cache operation ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Updated,
    /// The session ended during the call; the cache has been cleared.
    SessionEnded,
    /// The session was replaced while the call was in flight; its result
    /// was dropped.
    Stale,
}

#[derive(Debug, Clone)]
struct CachedDay {
    day: RosterDay,
    state: DayState,
}

#[derive(Debug, Default)]
struct Contents {
    generation: u64,
    calendar: Vec<DayOverview>,
    days: HashMap<NaiveDate, CachedDay>,
}

pub struct DayCache {
    gateway: Arc<dyn RosterGateway>,
    session: Arc<SessionState>,
    contents: RwLock<Contents>,
    write_locks: Mutex<HashMap<NaiveDate, Arc<Mutex<()>>>>,
}

impl DayCache {
    pub fn new(gateway: Arc<dyn RosterGateway>, session: Arc<SessionState>) -> Self {
        Self {
            gateway,
            session,
            contents: RwLock::new(Contents::default()),
            write_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Refetches the calendar overview and replaces the cached one.
    pub async fn refresh_calendar(&self) -> Result<CacheOutcome> {
        let generation = self.session.generation();
        let gateway = &self.gateway;
        let result = self
            .session
            .authorized(|token| async move { gateway.fetch_calendar(&token).await })
            .await?;

        match result {
            Authorized::Fresh(calendar) | Authorized::Recovered(calendar) => {
                tracing::debug!(days = calendar.len(), "Calendar refreshed");
                Ok(self
                    .store(generation, |contents| contents.calendar = calendar)
                    .await)
            }
            Authorized::SessionEnded => {
                self.clear().await;
                Ok(CacheOutcome::SessionEnded)
            }
        }
    }

    /// Fetches the record of `date` and stores it, replacing any cached copy.
    pub async fn load_day(&self, date: NaiveDate) -> Result<CacheOutcome> {
        self.fetch_day(self.session.generation(), date).await
    }

    /// Sets the caller's own status for a cached date, sends the record and
    /// reloads it.
    ///
    /// Fails with `Validation` without any network call when `date` was never
    /// loaded. If the send fails, the local edit is kept and the day stays
    /// `Edited`. Updates of the same date run one at a time.
    pub async fn update_day(
        &self,
        date: NaiveDate,
        entry_type: RosterEntryType,
        remarks: Option<String>,
    ) -> Result<CacheOutcome> {
        let generation = self.session.generation();
        if self.day(date).await.is_none() {
            return Err(not_loaded(date));
        }

        let lock = self.write_lock(date).await;
        let result = {
            let _guard = lock.lock().await;
            self.send_update(generation, date, entry_type, remarks).await
        };
        self.release_write_lock(date, lock).await;
        result
    }

    pub async fn calendar(&self) -> Vec<DayOverview> {
        self.view(|contents| contents.calendar.clone()).await
    }

    pub async fn day(&self, date: NaiveDate) -> Option<RosterDay> {
        self.view(|contents| contents.days.get(&date).map(|cached| cached.day.clone()))
            .await
    }

    pub async fn day_state(&self, date: NaiveDate) -> Option<DayState> {
        self.view(|contents| contents.days.get(&date).map(|cached| cached.state))
            .await
    }

    /// Dates with a cached record, in ascending order.
    pub async fn cached_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .view(|contents| contents.days.keys().copied().collect())
            .await;
        dates.sort();
        dates
    }

    /// Drops the overview and every cached day.
    pub async fn clear(&self) {
        let mut contents = self.contents.write().await;
        contents.calendar.clear();
        contents.days.clear();
    }

    async fn fetch_day(&self, generation: u64, date: NaiveDate) -> Result<CacheOutcome> {
        let gateway = &self.gateway;
        let result = self
            .session
            .authorized(|token| async move { gateway.fetch_day(date, &token).await })
            .await?;

        match result {
            Authorized::Fresh(day) | Authorized::Recovered(day) => {
                tracing::debug!(%date, entries = day.entries.len(), "Day loaded");
                let cached = CachedDay {
                    day,
                    state: DayState::Loaded,
                };
                Ok(self
                    .store(generation, |contents| {
                        contents.days.insert(date, cached);
                    })
                    .await)
            }
            Authorized::SessionEnded => {
                self.clear().await;
                Ok(CacheOutcome::SessionEnded)
            }
        }
    }

    async fn send_update(
        &self,
        generation: u64,
        date: NaiveDate,
        entry_type: RosterEntryType,
        remarks: Option<String>,
    ) -> Result<CacheOutcome> {
        let edited = {
            let mut contents = self.contents.write().await;
            if self.session.generation() != generation {
                return Ok(CacheOutcome::Stale);
            }
            // a logout may have cleared the cache while waiting for the lock
            if contents.generation != generation {
                return Err(not_loaded(date));
            }
            let cached = contents.days.get_mut(&date).ok_or_else(|| not_loaded(date))?;
            cached.day.apply_edit(entry_type, remarks);
            cached.state = DayState::Edited;
            cached.day.clone()
        };
        tracing::info!(%date, %entry_type, "Sending roster update");

        let gateway = &self.gateway;
        let day = &edited;
        let result = self
            .session
            .authorized(|token| async move { gateway.update_day(date, &token, day).await })
            .await;

        match result {
            Ok(Authorized::Fresh(())) | Ok(Authorized::Recovered(())) => {
                self.fetch_day(generation, date).await
            }
            Ok(Authorized::SessionEnded) => {
                self.clear().await;
                Ok(CacheOutcome::SessionEnded)
            }
            Err(e) => {
                tracing::warn!(%date, error = %e, "Roster update not sent, keeping local edit");
                Err(e)
            }
        }
    }

    /// Reads the contents, which count as empty once their session is over.
    async fn view<R: Default>(&self, read: impl FnOnce(&Contents) -> R) -> R {
        let contents = self.contents.read().await;
        if contents.generation != self.session.generation() {
            return R::default();
        }
        read(&*contents)
    }

    /// Writes a result fetched under `generation`, unless that session is over.
    async fn store(&self, generation: u64, write: impl FnOnce(&mut Contents)) -> CacheOutcome {
        let mut contents = self.contents.write().await;
        if self.session.generation() != generation {
            tracing::debug!("Session changed during fetch, dropping result");
            return CacheOutcome::Stale;
        }
        if contents.generation != generation {
            *contents = Contents {
                generation,
                ..Contents::default()
            };
        }
        write(&mut *contents);
        CacheOutcome::Updated
    }

    async fn write_lock(&self, date: NaiveDate) -> Arc<Mutex<()>> {
        self.write_locks
            .lock()
            .await
            .entry(date)
            .or_default()
            .clone()
    }

    /// Drops the lock of `date` once no other update holds or awaits it.
    async fn release_write_lock(&self, date: NaiveDate, lock: Arc<Mutex<()>>) {
        let mut locks = self.write_locks.lock().await;
        let unused = locks
            .get(&date)
            .is_some_and(|current| Arc::ptr_eq(current, &lock) && Arc::strong_count(&lock) == 2);
        if unused {
            locks.remove(&date);
        }
    }
}

fn not_loaded(date: NaiveDate) -> RosterError {
    RosterError::validation(format!("day {} is not loaded", date))
}
