//! GitLab merge request notes client.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, trace, warn};

use crate::config::GitLabConfig;
use crate::error::{NotifyError, Result, TpsError};

use super::Notifier;

/// Maximum number of attempts for transient failures.
const MAX_RETRIES: u32 = 3;

/// Base delay between attempts in milliseconds.
const RETRY_DELAY_MS: u64 = 1000;

/// Header carrying the access token.
const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Posts notes on GitLab merge requests.
#[derive(Clone)]
pub struct GitLabNotifier {
    /// HTTP client.
    client: Client,
    /// API root.
    api_base: Url,
    /// Access token.
    token: String,
    /// Base delay between attempts.
    retry_delay: Duration,
}

/// Request body for a new note.
#[derive(Debug, Serialize)]
struct NoteRequest<'a> {
    body: &'a str,
}

/// The part of the created note we read back.
#[derive(Debug, Deserialize)]
struct NoteResponse {
    id: u64,
}

impl GitLabNotifier {
    /// Creates a notifier from validated settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: &GitLabConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NotifyError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: config.api_base()?,
            token: config.token.clone(),
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
        })
    }

    /// Overrides the base delay between attempts.
    #[must_use]
    pub const fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Builds the notes endpoint for a merge request.
    ///
    /// Path-style project ids are percent-encoded into one segment.
    fn notes_url(&self, project_id: &str, merge_request_iid: &str) -> Result<Url> {
        if project_id.is_empty() || merge_request_iid.is_empty() {
            return Err(NotifyError::InvalidTarget {
                message: String::from("project id and merge request iid are required"),
            }
            .into());
        }

        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| NotifyError::InvalidTarget {
                message: format!("API URL cannot carry a path: {}", self.api_base),
            })?
            .pop_if_empty()
            .extend([
                "projects",
                project_id,
                "merge_requests",
                merge_request_iid,
                "notes",
            ]);
        Ok(url)
    }

    /// Sends one POST without retrying.
    async fn post_once(&self, url: &Url, body: &str) -> Result<u64> {
        trace!("POST {url}");

        let response = self
            .client
            .post(url.clone())
            .header(TOKEN_HEADER, &self.token)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&NoteRequest { body })
            .send()
            .await
            .map_err(|e| NotifyError::network(format!("Request failed: {e}")))?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(NotifyError::RateLimited {
                retry_after_secs: retry_after,
            }
            .into());
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(NotifyError::AuthenticationFailed {
                message: format!("GitLab rejected the token ({status})"),
            }
            .into());
        }

        if status == StatusCode::NOT_FOUND {
            return Err(NotifyError::InvalidTarget {
                message: format!("merge request not found at {url}"),
            }
            .into());
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::api_error(status.as_u16(), body).into());
        }

        let note: NoteResponse = response.json().await.map_err(|e| NotifyError::InvalidResponse {
            message: format!("Failed to parse note: {e}"),
        })?;
        Ok(note.id)
    }
}

#[async_trait]
impl Notifier for GitLabNotifier {
    async fn post_comment(&self, target_id: &str, thread_id: &str, body: &str) -> Result<()> {
        let url = self.notes_url(target_id, thread_id)?;
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                debug!("Retry attempt {attempt} of {MAX_RETRIES}");
                tokio::time::sleep(self.retry_delay * attempt).await;
            }

            match self.post_once(&url, body).await {
                Ok(note_id) => {
                    debug!("Created note {note_id} on {target_id}!{thread_id}");
                    return Ok(());
                }
                Err(e) if e.is_retryable() => {
                    warn!("Posting note failed, will retry: {e}");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            TpsError::Notify(NotifyError::network("Max retries exceeded"))
        }))
    }
}

impl fmt::Debug for GitLabNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitLabNotifier")
            .field("api_base", &self.api_base.as_str())
            .field("retry_delay", &self.retry_delay)
            .finish_non_exhaustive()
    }
}
