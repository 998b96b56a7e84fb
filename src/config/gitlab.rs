//! GitLab connection settings.

use reqwest::Url;
use std::fmt;

use crate::error::{ConfigError, Result};

/// Default API root for gitlab.com.
pub const DEFAULT_API_URL: &str = "https://gitlab.com/api/v4";

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for posting merge request notes.
#[derive(Clone, PartialEq, Eq)]
pub struct GitLabConfig {
    /// API root, e.g. `https://gitlab.example.com/api/v4`.
    pub api_url: String,
    /// Personal, project or job token sent as `PRIVATE-TOKEN`.
    pub token: String,
    /// Numeric project id or `group/project` path.
    pub project_id: String,
    /// Merge request iid within the project.
    pub merge_request_iid: u64,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

/// Where a comment is posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentTarget {
    /// Project id or path.
    pub project_id: String,
    /// Merge request iid.
    pub merge_request_iid: u64,
}

impl GitLabConfig {
    /// Creates a configuration with the default API URL and timeout.
    #[must_use]
    pub fn new(token: impl Into<String>, project_id: impl Into<String>, merge_request_iid: u64) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            project_id: project_id.into(),
            merge_request_iid,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Overrides the API URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Returns the comment target described by this configuration.
    #[must_use]
    pub fn target(&self) -> CommentTarget {
        CommentTarget {
            project_id: self.project_id.clone(),
            merge_request_iid: self.merge_request_iid,
        }
    }

    /// Parses the API URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or is not http(s).
    pub fn api_base(&self) -> Result<Url> {
        let url = Url::parse(self.api_url.trim_end_matches('/'))
            .map_err(|e| ConfigError::invalid("api_url", e.to_string()))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::invalid("api_url", format!("unsupported scheme `{other}`")).into()),
        }
    }

    /// Checks that every value needed to post a note is usable.
    ///
    /// # Errors
    ///
    /// Returns the first missing or invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::missing("GITLAB_TOKEN").into());
        }
        if self.project_id.trim().is_empty() {
            return Err(ConfigError::missing("CI_PROJECT_ID").into());
        }
        if self.merge_request_iid == 0 {
            return Err(ConfigError::invalid("CI_MERGE_REQUEST_IID", "must be greater than zero").into());
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("timeout_secs", "must be greater than zero").into());
        }
        self.api_base()?;
        Ok(())
    }
}

impl fmt::Debug for GitLabConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitLabConfig")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("merge_request_iid", &self.merge_request_iid)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl fmt::Display for CommentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.project_id, self.merge_request_iid)
    }
}
