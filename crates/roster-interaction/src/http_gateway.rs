//! HttpRosterGateway - REST implementation of the roster backend gateway.
//!
//! Stateless: owns the base URLs and attaches the bearer token per call.
//! No retries and no explicit timeout; whatever the transport defaults to
//! applies.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response};
use roster_core::config::ClientConfig;
use roster_core::error::{Result, RosterError};
use roster_core::gateway::RosterGateway;
use roster_core::model::{DayOverview, Member, Reservation, RosterDay, User};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;

const PATH_LOGIN: &str = "/login";
const PATH_CALENDAR: &str = "/calendar";
const PATH_DAY: &str = "/day";
const PATH_ME: &str = "/@me";
const PATH_RESERVATIONS: &str = "/reservations";
const PATH_MEMBERS: &str = "/members";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Gateway talking JSON over HTTP to the roster backend.
#[derive(Clone)]
pub struct HttpRosterGateway {
    client: Client,
    api_base_url: String,
    members_base_url: String,
}

impl HttpRosterGateway {
    pub fn new(api_base_url: impl Into<String>, members_base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base_url: trim_base(api_base_url.into()),
            members_base_url: trim_base(members_base_url.into()),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.api_base_url, &config.members_base_url)
    }

    /// Replaces the underlying HTTP client (proxies, custom TLS roots).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }

    fn members_url(&self, path: &str) -> String {
        format!("{}{}", self.members_base_url, path)
    }

    /// Attaches the bearer token, rejecting an empty one without any I/O.
    fn authorized(&self, request: RequestBuilder, token: &str) -> Result<RequestBuilder> {
        if token.is_empty() {
            return Err(RosterError::Unauthenticated);
        }
        Ok(request.bearer_auth(token))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String, token: &str) -> Result<T> {
        let request = self.authorized(self.client.get(&url), token)?;
        let response = send(request).await?;
        decode(response).await
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn date_query(date: NaiveDate) -> [(&'static str, String); 1] {
    [("date", date.format("%Y-%m-%d").to_string())]
}

/// Sends the request and maps transport failures and rejected statuses.
async fn send(request: RequestBuilder) -> Result<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| RosterError::network(format!("request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::debug!(status = status.as_u16(), "Backend rejected request");
        return Err(RosterError::from_status(status.as_u16(), body));
    }

    Ok(response)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response
        .bytes()
        .await
        .map_err(|e| RosterError::network(format!("failed to read response body: {}", e)))?;
    Ok(serde_json::from_slice(&body)?)
}

#[async_trait]
impl RosterGateway for HttpRosterGateway {
    #[instrument(skip(self, password))]
    async fn login(&self, username: &str, password: &str) -> Result<String> {
        let request = self
            .client
            .post(self.api_url(PATH_LOGIN))
            .json(&LoginRequest { username, password });
        let response: LoginResponse = decode(send(request).await?).await?;
        if response.token.is_empty() {
            return Err(RosterError::validation("backend returned an empty token"));
        }
        Ok(response.token)
    }

    #[instrument(skip_all)]
    async fn fetch_me(&self, token: &str) -> Result<User> {
        self.get_json(self.api_url(PATH_ME), token).await
    }

    #[instrument(skip_all)]
    async fn fetch_calendar(&self, token: &str) -> Result<Vec<DayOverview>> {
        self.get_json(self.api_url(PATH_CALENDAR), token).await
    }

    #[instrument(skip_all)]
    async fn fetch_reservations(&self, token: &str) -> Result<Vec<Reservation>> {
        self.get_json(self.api_url(PATH_RESERVATIONS), token).await
    }

    #[instrument(skip_all)]
    async fn fetch_members(&self, token: &str) -> Result<Vec<Member>> {
        self.get_json(self.members_url(PATH_MEMBERS), token).await
    }

    #[instrument(skip(self, token))]
    async fn fetch_day(&self, date: NaiveDate, token: &str) -> Result<RosterDay> {
        let request = self.authorized(
            self.client
                .get(self.api_url(PATH_DAY))
                .query(&date_query(date)),
            token,
        )?;
        decode(send(request).await?).await
    }

    #[instrument(skip(self, token, day))]
    async fn update_day(&self, date: NaiveDate, token: &str, day: &RosterDay) -> Result<()> {
        let request = self.authorized(
            self.client
                .post(self.api_url(PATH_DAY))
                .query(&date_query(date))
                .json(day),
            token,
        )?;
        // the body (if any) is not part of the contract
        send(request).await?;
        Ok(())
    }
}
