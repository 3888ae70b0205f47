//! Start list of the current flying day, persisted across restarts.
//!
//! Like the locale it is device state: logging out keeps it.

use chrono::Utc;
use roster_core::error::Result;
use roster_core::model::{FormSlot, Start, StartDraft, StartList};
use roster_core::storage::StartListStore;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct StartListState {
    store: Arc<dyn StartListStore>,
    state: RwLock<StartList>,
}

impl StartListState {
    pub fn new(store: Arc<dyn StartListStore>) -> Self {
        Self {
            store,
            state: RwLock::new(StartList::default()),
        }
    }

    pub async fn restore(&self) -> Result<()> {
        let start_list = self.store.load().await?;
        tracing::debug!(starts = start_list.list.len(), "Restoring start list");
        *self.state.write().await = start_list;
        Ok(())
    }

    pub async fn snapshot(&self) -> StartList {
        self.state.read().await.clone()
    }

    pub async fn list(&self) -> Vec<Start> {
        self.state.read().await.list.clone()
    }

    /// Appends a start stamped with the current time.
    pub async fn add_start(&self, draft: StartDraft) -> Result<Start> {
        let start = draft.complete(Utc::now())?;
        let added = start.clone();
        self.update(|state| state.list.push(added)).await?;
        tracing::info!(plane = %start.plane, from = %start.from, "Start recorded");
        Ok(start)
    }

    pub async fn draft(&self, slot: FormSlot) -> StartDraft {
        self.state.read().await.forms.get(slot).clone()
    }

    pub async fn save_draft(&self, slot: FormSlot, draft: StartDraft) -> Result<()> {
        self.update(|state| *state.forms.get_mut(slot) = draft).await
    }

    /// Records the draft of `slot` as a start and empties the slot.
    pub async fn submit_draft(&self, slot: FormSlot) -> Result<Start> {
        let start = self.draft(slot).await.complete(Utc::now())?;
        let added = start.clone();
        self.update(|state| {
            state.list.push(added);
            *state.forms.get_mut(slot) = StartDraft::default();
        })
        .await?;
        tracing::info!(%slot, plane = %start.plane, "Draft recorded as start");
        Ok(start)
    }

    pub async fn set_pax(&self, pax: Vec<String>) -> Result<()> {
        self.update(|state| state.pax = pax).await
    }

    pub async fn set_planes(&self, planes: Vec<String>) -> Result<()> {
        self.update(|state| state.planes = planes).await
    }

    pub async fn set_pilots(&self, pilots: Vec<String>) -> Result<()> {
        self.update(|state| state.pilots = pilots).await
    }

    /// Applies `change` to a copy, persists it and only then publishes it.
    async fn update(&self, change: impl FnOnce(&mut StartList)) -> Result<()> {
        let mut state = self.state.write().await;
        let mut updated = state.clone();
        change(&mut updated);
        self.store.save(&updated).await?;
        *state = updated;
        Ok(())
    }
}
