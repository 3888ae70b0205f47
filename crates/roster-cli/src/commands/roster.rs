use anyhow::{Context, Result};
use chrono::NaiveDate;
use roster_core::model::RosterEntryType;

use super::{ensure_session, print_json, unwrap_authorized};
use crate::app::App;

pub async fn calendar(app: &App) -> Result<()> {
    ensure_session(app.usecase.refresh_calendar().await?)?;
    print_json(&app.usecase.days().calendar().await)
}

pub async fn day(app: &App, date: NaiveDate) -> Result<()> {
    ensure_session(app.usecase.load_day(date).await?)?;
    day_from_cache(app, date).await
}

pub async fn update(
    app: &App,
    date: NaiveDate,
    entry_type: RosterEntryType,
    remarks: Option<String>,
) -> Result<()> {
    // every invocation starts with an empty cache
    ensure_session(app.usecase.load_day(date).await?)?;
    ensure_session(app.usecase.update_day(date, entry_type, remarks).await?)?;
    day_from_cache(app, date).await
}

pub async fn reservations(app: &App, date: Option<NaiveDate>) -> Result<()> {
    let result = match date {
        Some(date) => app.usecase.reservations_on(date).await?,
        None => app.usecase.reservations().await?,
    };
    print_json(&unwrap_authorized(result)?)
}

pub async fn members(app: &App, query: Option<&str>) -> Result<()> {
    let mut members = unwrap_authorized(app.usecase.members().await?)?;
    if let Some(query) = query {
        members.retain(|member| member.matches(query));
    }
    print_json(&members)
}

async fn day_from_cache(app: &App, date: NaiveDate) -> Result<()> {
    let day = app
        .usecase
        .days()
        .day(date)
        .await
        .with_context(|| format!("No roster cached for {}", date))?;
    print_json(&day)
}
