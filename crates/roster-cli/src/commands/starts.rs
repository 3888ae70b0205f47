use anyhow::{Context, Result};
use chrono::NaiveTime;
use roster_core::model::{FormSlot, StartDraft};
use serde_json::json;

use super::print_json;
use crate::app::App;

/// `HH:MM` as typed on the start form.
pub fn parse_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .with_context(|| format!("Expected HH:MM, got `{value}`"))
}

pub async fn list(app: &App) -> Result<()> {
    print_json(&app.usecase.start_list().snapshot().await)
}

pub async fn add(app: &App, draft: StartDraft) -> Result<()> {
    let start = app.usecase.start_list().add_start(draft).await?;
    print_json(&start)
}

pub async fn save_draft(app: &App, slot: FormSlot, draft: StartDraft) -> Result<()> {
    app.usecase.start_list().save_draft(slot, draft).await?;
    print_json(&json!({ "slot": slot, "draft": app.usecase.start_list().draft(slot).await }))
}

pub async fn submit(app: &App, slot: FormSlot) -> Result<()> {
    let start = app.usecase.start_list().submit_draft(slot).await?;
    print_json(&start)
}

pub async fn set_pilots(app: &App, pilots: Vec<String>) -> Result<()> {
    app.usecase.start_list().set_pilots(pilots).await?;
    list(app).await
}

pub async fn set_planes(app: &App, planes: Vec<String>) -> Result<()> {
    app.usecase.start_list().set_planes(planes).await?;
    list(app).await
}
