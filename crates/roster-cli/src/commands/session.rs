use anyhow::Result;
use serde_json::json;

use super::print_json;
use crate::app::App;

pub async fn login(app: &App, username: &str, password: &str) -> Result<()> {
    app.usecase.login(username, password).await?;
    app.usecase.check_identity().await?;
    print_json(&json!({
        "authenticated": app.usecase.session().is_authenticated(),
        "user": app.usecase.session().identity().await,
    }))
}

pub async fn logout(app: &App) -> Result<()> {
    app.usecase.logout().await?;
    print_json(&json!({ "authenticated": false }))
}

pub async fn whoami(app: &App) -> Result<()> {
    app.usecase.check_identity().await?;
    let session = app.usecase.session();
    print_json(&json!({
        "authenticated": session.is_authenticated(),
        "user": session.identity().await,
        "dev": session.is_dev().await,
    }))
}
