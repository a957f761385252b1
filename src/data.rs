use crate::error::FetchError;
use crate::model::Schedule;
use reqwest::{Client, StatusCode};
use tracing::debug;

/// Default API root for NHL stats.
pub const DEFAULT_API_ROOT: &str = "https://statsapi.web.nhl.com/api/v1";

/// How much of a raw body goes into the debug log.
const DEBUG_BODY_LIMIT: usize = 2048;

/// An unparsed API response, handed back as-is.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Client for the stats API.
///
/// Holds the most recently decoded schedule. Fetching the schedule needs
/// `&mut self`, so a client shared between tasks has to be wrapped in a lock
/// by the caller.
pub struct DataClient {
    client: Client,
    api_root: String,
    schedule: Schedule,
}

impl Default for DataClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DataClient {
    pub fn new() -> Self {
        Self::with_api_root(DEFAULT_API_ROOT)
    }

    /// Create a client against a different API root (local servers, mirrors).
    pub fn with_api_root(api_root: impl Into<String>) -> Self {
        let api_root: String = api_root.into();
        Self {
            client: Client::new(),
            api_root: api_root.trim_end_matches('/').to_string(),
            schedule: Schedule::default(),
        }
    }

    /// The schedule from the last successful `fetch_schedule`.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Fetches the default schedule view (most recent games) and renders it
    /// as game blocks.
    ///
    /// The stored schedule is only replaced once the body decoded cleanly.
    pub async fn fetch_schedule(&mut self) -> Result<String, FetchError> {
        let body = self.get("schedule").await?.body;
        let schedule: Schedule = serde_json::from_slice(&body).map_err(FetchError::Decode)?;
        debug!(games = schedule.game_count(), "decoded schedule");

        self.schedule = schedule;
        Ok(self.schedule.render())
    }

    /// Fetches every current team. The body is not parsed.
    pub async fn fetch_teams(&self) -> Result<RawResponse, FetchError> {
        let resp = self.get("teams").await?;
        log_body(&resp);
        Ok(resp)
    }

    /// Fetches one team by id. The id is passed through unchecked; the API
    /// decides what an unknown id returns.
    pub async fn fetch_team(&self, id: i64) -> Result<RawResponse, FetchError> {
        let resp = self.get(&format!("teams/{}", id)).await?;
        log_body(&resp);
        Ok(resp)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path)
    }

    async fn get(&self, path: &str) -> Result<RawResponse, FetchError> {
        let url = self.endpoint(path);
        debug!(%url, "GET");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        let body = resp.bytes().await?.to_vec();
        debug!(%url, %status, bytes = body.len(), "response");

        Ok(RawResponse { status, body })
    }
}

fn log_body(resp: &RawResponse) {
    let shown = &resp.body[..resp.body.len().min(DEBUG_BODY_LIMIT)];
    debug!(status = %resp.status, body = %String::from_utf8_lossy(shown), "raw body");
}
