use anyhow::Result;
use roster_core::preferences::Locale;
use serde_json::json;

use super::print_json;
use crate::app::App;

pub async fn get(app: &App) -> Result<()> {
    print_json(&json!({ "locale": app.usecase.locale().locale().await }))
}

pub async fn set(app: &App, locale: Locale) -> Result<()> {
    app.usecase.locale().set_locale(locale).await?;
    get(app).await
}
