//! ApiClient: access to the study-planner backend.
//!
//! Everything is a read except [`ApiClient::generate_schedule`], which
//! asks the backend scheduler to plan study sessions for an assignment.

use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use super::assignment::Assignment;
use crate::calendar::{ingest, CalendarEvent, Course, EventRecord, Timeblocker};
use crate::error::FeedError;
use crate::storage::ApiConfig;

/// Environment variable holding the bearer token.
pub const API_TOKEN_ENV: &str = "STUDYPLAN_API_TOKEN";

/// Client for the backend REST API.
pub struct ApiClient {
    base_url: Url,
    token: Option<String>,
    config: ApiConfig,
    http_client: Client,
}

impl ApiClient {
    /// Create a client for `config`, honouring `STUDYPLAN_API_URL`.
    pub fn new(config: ApiConfig, token: Option<String>) -> Result<Self, FeedError> {
        let base_url = Url::parse(&config.effective_base_url())?;
        Ok(Self {
            base_url,
            token: token.filter(|t| !t.is_empty()),
            config,
            http_client: Client::new(),
        })
    }

    /// Token from `STUDYPLAN_API_TOKEN`, if set.
    pub fn token_from_env() -> Option<String> {
        std::env::var(API_TOKEN_ENV).ok().filter(|t| !t.is_empty())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, FeedError> {
        Ok(self.base_url.join(path)?)
    }

    fn token(&self) -> Result<&str, FeedError> {
        self.token.as_deref().ok_or(FeedError::NotAuthenticated)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FeedError> {
        let token = self.token()?;
        let url = self.endpoint(path)?;
        tracing::debug!("GET {url}");

        let resp = self.http_client.get(url.clone()).bearer_auth(token).send().await?;
        let resp = check_status(resp, &url)?;
        Ok(resp.json().await?)
    }

    /// Fetch and validate the user's events.
    ///
    /// Records that fail validation are skipped.
    pub async fn try_fetch_events(&self) -> Result<Vec<CalendarEvent>, FeedError> {
        let records: Vec<EventRecord> = self.get_json(&self.config.events_path).await?;
        Ok(ingest(records))
    }

    pub async fn try_fetch_courses(&self) -> Result<Vec<Course>, FeedError> {
        self.get_json(&self.config.courses_path).await
    }

    pub async fn try_fetch_timeblockers(&self) -> Result<Vec<Timeblocker>, FeedError> {
        self.get_json(&self.config.timeblockers_path).await
    }

    pub async fn try_fetch_assignments(&self) -> Result<Vec<Assignment>, FeedError> {
        self.get_json(&self.config.assignments_path).await
    }

    /// Ask the backend to schedule study sessions for `assignment_id`.
    ///
    /// The request has no body; only the status is checked.
    pub async fn generate_schedule(&self, assignment_id: &str) -> Result<(), FeedError> {
        let token = self.token()?;
        let id = assignment_id.trim();
        if id.is_empty() {
            return Err(FeedError::InvalidRequest("assignment id is empty".into()));
        }

        let mut url = self.endpoint(&self.config.scheduler_path)?;
        url.path_segments_mut()
            .map_err(|()| FeedError::InvalidRequest(format!("cannot append id to {}", self.base_url)))?
            .pop_if_empty()
            .push(id);
        tracing::info!("Requesting schedule for assignment {id}");
        tracing::debug!("POST {url}");

        let resp = self.http_client.post(url.clone()).bearer_auth(token).send().await?;
        check_status(resp, &url)?;
        Ok(())
    }

    /// Like [`Self::try_fetch_events`], but a failure yields no events.
    pub async fn fetch_events(&self) -> Vec<CalendarEvent> {
        or_empty("events", self.try_fetch_events().await)
    }

    pub async fn fetch_courses(&self) -> Vec<Course> {
        or_empty("courses", self.try_fetch_courses().await)
    }

    pub async fn fetch_timeblockers(&self) -> Vec<Timeblocker> {
        or_empty("timeblockers", self.try_fetch_timeblockers().await)
    }

    pub async fn fetch_assignments(&self) -> Vec<Assignment> {
        or_empty("assignments", self.try_fetch_assignments().await)
    }
}

fn check_status(resp: reqwest::Response, url: &Url) -> Result<reqwest::Response, FeedError> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(FeedError::Status {
            status: resp.status().as_u16(),
            url: url.to_string(),
        })
    }
}

fn or_empty<T>(what: &str, result: Result<Vec<T>, FeedError>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!("Error fetching {what}: {e}");
        Vec::new()
    })
}
