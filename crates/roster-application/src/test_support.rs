//! In-memory gateway and stores shared by the application tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use roster_core::error::{Result, RosterError};
use roster_core::gateway::RosterGateway;
use roster_core::model::{
    DayOverview, EditAction, Member, ParticipantType, Reservation, RosterDay, RosterEntry,
    StartList, Stats, User,
};
use roster_core::preferences::Preferences;
use roster_core::session::{Credentials, PersistedSession};
use roster_core::storage::{PreferenceStore, SessionStore, StartListStore};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub fn may_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

pub fn sample_overview() -> Vec<DayOverview> {
    vec![DayOverview {
        date: may_first(),
        registered_pilots: Stats::from((2, 1)),
        entries: Vec::new(),
        note: None,
        reservations: Vec::new(),
    }]
}

pub fn sample_day() -> RosterDay {
    RosterDay {
        entries: vec![
            RosterEntry {
                name: "Bob".to_string(),
                message: String::new(),
                entry_type: roster_core::model::RosterEntryType::Definite,
            },
            RosterEntry {
                name: "Carla".to_string(),
                message: "after lunch".to_string(),
                entry_type: roster_core::model::RosterEntryType::Tentative,
            },
        ],
        action: EditAction::Add,
        id: None,
        participant_type: ParticipantType::GliderPilot,
        format: "text".to_string(),
        remarks: None,
        entry_type: None,
        reservations: Vec::new(),
    }
}

/// Scriptable backend.
///
/// Accounts map usernames to passwords; every successful login issues a new
/// token `T1`, `T2`, ... Authenticated calls with a token that was not issued
/// (or was revoked) fail with `Unauthorized`.
#[derive(Default)]
pub struct MockGateway {
    calls: Mutex<Vec<&'static str>>,
    accounts: Mutex<HashMap<String, String>>,
    issued: Mutex<u32>,
    valid_tokens: Mutex<HashSet<String>>,
    always_reject_tokens: Mutex<bool>,
    network_failures: Mutex<HashSet<&'static str>>,
    calendar: Mutex<Vec<DayOverview>>,
    days: Mutex<HashMap<NaiveDate, RosterDay>>,
    reservations: Mutex<Vec<Reservation>>,
    members: Mutex<Vec<Member>>,
    me: Mutex<Option<User>>,
}

impl MockGateway {
    pub fn new() -> Self {
        let gateway = Self::default();
        gateway.add_account("alice", "pw1");
        *gateway.calendar.lock().unwrap() = sample_overview();
        gateway.days.lock().unwrap().insert(may_first(), sample_day());
        *gateway.me.lock().unwrap() = Some(User {
            id: "alice".to_string(),
            name: "Alice Example".to_string(),
            settings: Default::default(),
        });
        gateway
    }

    pub fn add_account(&self, username: &str, password: &str) {
        self.accounts
            .lock()
            .unwrap()
            .insert(username.to_string(), password.to_string());
    }

    pub fn remove_account(&self, username: &str) {
        self.accounts.lock().unwrap().remove(username);
    }

    /// Makes the given token acceptable without a login (restored sessions).
    pub fn accept_token(&self, token: &str) {
        self.valid_tokens.lock().unwrap().insert(token.to_string());
    }

    /// Simulates expiry of every issued token.
    pub fn revoke_tokens(&self) {
        self.valid_tokens.lock().unwrap().clear();
    }

    /// Rejects every token, including freshly issued ones.
    pub fn reject_all_tokens(&self) {
        *self.always_reject_tokens.lock().unwrap() = true;
    }

    /// Makes the next call of `operation` fail at the transport level.
    pub fn fail_next(&self, operation: &'static str) {
        self.network_failures.lock().unwrap().insert(operation);
    }

    pub fn set_calendar(&self, calendar: Vec<DayOverview>) {
        *self.calendar.lock().unwrap() = calendar;
    }

    pub fn set_day(&self, date: NaiveDate, day: RosterDay) {
        self.days.lock().unwrap().insert(date, day);
    }

    pub fn set_me(&self, user: User) {
        *self.me.lock().unwrap() = Some(user);
    }

    pub fn set_reservations(&self, reservations: Vec<Reservation>) {
        *self.reservations.lock().unwrap() = reservations;
    }

    pub fn set_members(&self, members: Vec<Member>) {
        *self.members.lock().unwrap() = members;
    }

    pub fn stored_day(&self, date: NaiveDate) -> Option<RosterDay> {
        self.days.lock().unwrap().get(&date).cloned()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| **call == operation)
            .count()
    }

    fn record(&self, operation: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(operation);
        if self.network_failures.lock().unwrap().remove(operation) {
            return Err(RosterError::network("connection refused"));
        }
        Ok(())
    }

    fn check(&self, operation: &'static str, token: &str) -> Result<()> {
        if token.is_empty() {
            return Err(RosterError::Unauthenticated);
        }
        self.record(operation)?;
        if *self.always_reject_tokens.lock().unwrap()
            || !self.valid_tokens.lock().unwrap().contains(token)
        {
            return Err(RosterError::Unauthorized);
        }
        Ok(())
    }
}

#[async_trait]
impl RosterGateway for MockGateway {
    async fn login(&self, username: &str, password: &str) -> Result<String> {
        self.record("login")?;
        let accounts = self.accounts.lock().unwrap();
        if accounts.get(username).map(String::as_str) != Some(password) {
            return Err(RosterError::Unauthorized);
        }
        let mut issued = self.issued.lock().unwrap();
        *issued += 1;
        let token = format!("T{}", *issued);
        self.valid_tokens.lock().unwrap().insert(token.clone());
        Ok(token)
    }

    async fn fetch_me(&self, token: &str) -> Result<User> {
        self.check("fetch_me", token)?;
        self.me
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| RosterError::from_status(404, "no such user"))
    }

    async fn fetch_calendar(&self, token: &str) -> Result<Vec<DayOverview>> {
        self.check("fetch_calendar", token)?;
        Ok(self.calendar.lock().unwrap().clone())
    }

    async fn fetch_reservations(&self, token: &str) -> Result<Vec<Reservation>> {
        self.check("fetch_reservations", token)?;
        Ok(self.reservations.lock().unwrap().clone())
    }

    async fn fetch_members(&self, token: &str) -> Result<Vec<Member>> {
        self.check("fetch_members", token)?;
        Ok(self.members.lock().unwrap().clone())
    }

    async fn fetch_day(&self, date: NaiveDate, token: &str) -> Result<RosterDay> {
        self.check("fetch_day", token)?;
        self.days
            .lock()
            .unwrap()
            .get(&date)
            .cloned()
            .ok_or_else(|| RosterError::from_status(404, "no such day"))
    }

    /// Stores the record and, like the real backend, turns an add into an
    /// edit and records the caller as a participant.
    async fn update_day(&self, date: NaiveDate, token: &str, day: &RosterDay) -> Result<()> {
        self.check("update_day", token)?;
        let mut stored = day.clone();
        stored.action = EditAction::Edit;
        stored.id = Some(stored.id.unwrap_or(1));
        if let Some(entry_type) = day.entry_type {
            stored.entries.push(RosterEntry {
                name: "Alice".to_string(),
                message: day.remarks.clone().unwrap_or_default(),
                entry_type,
            });
        }
        self.days.lock().unwrap().insert(date, stored);
        Ok(())
    }
}

/// Delegates to a [`MockGateway`] but yields to the scheduler a few times
/// after login and each read, so other tasks run while a response is in
/// flight.
pub struct YieldingGateway {
    inner: Arc<MockGateway>,
    yields: usize,
}

impl YieldingGateway {
    pub fn new(inner: Arc<MockGateway>, yields: usize) -> Self {
        Self { inner, yields }
    }

    async fn pause(&self) {
        for _ in 0..self.yields {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl RosterGateway for YieldingGateway {
    async fn login(&self, username: &str, password: &str) -> Result<String> {
        let result = self.inner.login(username, password).await;
        self.pause().await;
        result
    }

    async fn fetch_me(&self, token: &str) -> Result<User> {
        self.inner.fetch_me(token).await
    }

    async fn fetch_calendar(&self, token: &str) -> Result<Vec<DayOverview>> {
        let result = self.inner.fetch_calendar(token).await;
        self.pause().await;
        result
    }

    async fn fetch_reservations(&self, token: &str) -> Result<Vec<Reservation>> {
        self.inner.fetch_reservations(token).await
    }

    async fn fetch_members(&self, token: &str) -> Result<Vec<Member>> {
        self.inner.fetch_members(token).await
    }

    async fn fetch_day(&self, date: NaiveDate, token: &str) -> Result<RosterDay> {
        let result = self.inner.fetch_day(date, token).await;
        self.pause().await;
        result
    }

    async fn update_day(&self, date: NaiveDate, token: &str, day: &RosterDay) -> Result<()> {
        self.inner.update_day(date, token, day).await
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<PersistedSession>,
}

impl MemorySessionStore {
    pub fn with_session(token: Option<&str>, credentials: Option<Credentials>) -> Self {
        Self {
            session: Mutex::new(PersistedSession {
                token: token.map(str::to_string),
                credentials,
            }),
        }
    }

    pub fn snapshot(&self) -> PersistedSession {
        self.session.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<PersistedSession> {
        Ok(self.snapshot())
    }

    async fn save(&self, session: &PersistedSession) -> Result<()> {
        *self.session.lock().unwrap() = session.clone();
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.session.lock().unwrap() = PersistedSession::default();
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryPreferenceStore {
    preferences: Mutex<Preferences>,
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn load(&self) -> Result<Preferences> {
        Ok(self.preferences.lock().unwrap().clone())
    }

    async fn save(&self, preferences: &Preferences) -> Result<()> {
        *self.preferences.lock().unwrap() = preferences.clone();
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStartListStore {
    start_list: Mutex<StartList>,
}

impl MemoryStartListStore {
    pub fn snapshot(&self) -> StartList {
        self.start_list.lock().unwrap().clone()
    }
}

#[async_trait]
impl StartListStore for MemoryStartListStore {
    async fn load(&self) -> Result<StartList> {
        Ok(self.snapshot())
    }

    async fn save(&self, start_list: &StartList) -> Result<()> {
        *self.start_list.lock().unwrap() = start_list.clone();
        Ok(())
    }
}
