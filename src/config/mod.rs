//! Configuration module.
//!
//! Loads the optional `.env` file and holds the settings the GitLab
//! notifier needs. The summary pipeline itself never reads the environment.

mod env;
mod gitlab;

pub use env::{load_dotenv, ENV_FILE_NAME};
pub use gitlab::{CommentTarget, GitLabConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
