//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{GitLabConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use crate::error::{ConfigError, Result};
use crate::summary::ActionClass;

/// tps - Summarize Terraform plans by action and resource type.
#[derive(Parser, Debug)]
#[command(name = "tps")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the plan summary.
    Show {
        /// Plan and table options.
        #[command(flatten)]
        summary: SummaryArgs,

        /// Disable coloured output.
        #[arg(long)]
        no_color: bool,
    },

    /// Print the plan summary and post it on a GitLab merge request.
    Comment {
        /// Plan and table options.
        #[command(flatten)]
        summary: SummaryArgs,

        /// GitLab connection options.
        #[command(flatten)]
        gitlab: GitLabArgs,

        /// Print the comment body instead of posting it.
        #[arg(long)]
        dry_run: bool,
    },
}

/// Options shared by every command that summarizes a plan.
#[derive(Args, Debug, Clone)]
pub struct SummaryArgs {
    /// Path to the plan JSON (`terraform show -json`).
    #[arg(short, long, env = "TPS_PLAN_PATH")]
    pub path: PathBuf,

    /// Only count resource types containing this text.
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Table layout (defaults to grid for `show`, compact for `comment`).
    #[arg(short, long, value_enum)]
    pub table: Option<TableFormat>,

    /// Restrict the table to one action (compact tables only; grid and json always show all actions).
    #[arg(long, value_enum)]
    pub only: Option<ActionFilter>,
}

/// GitLab connection options, usually supplied by CI variables.
#[derive(Args, Debug, Clone)]
pub struct GitLabArgs {
    /// Project id or `group/project` path.
    #[arg(long, env = "CI_PROJECT_ID")]
    pub project_id: Option<String>,

    /// Merge request iid.
    #[arg(long, env = "CI_MERGE_REQUEST_IID")]
    pub merge_request_iid: Option<u64>,

    /// GitLab API root.
    #[arg(long, env = "CI_API_V4_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Access token.
    #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// HTTP timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

/// Table layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TableFormat {
    /// Boxed table with one row per action.
    Grid,
    /// Markdown table of counts per type.
    Compact,
    /// Markdown table of counts per type and name.
    CompactNames,
    /// JSON document.
    Json,
}

/// Action filter for compact tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ActionFilter {
    /// Creates and replacements.
    Create,
    /// In-place updates.
    Update,
    /// Deletions.
    Delete,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl SummaryArgs {
    /// Returns the selected table layout, or `default` when none was given.
    #[must_use]
    pub fn table_or(&self, default: TableFormat) -> TableFormat {
        self.table.unwrap_or(default)
    }

    /// Returns the action class the compact table is restricted to.
    #[must_use]
    pub fn only_class(&self) -> Option<ActionClass> {
        self.only.map(ActionClass::from)
    }
}

impl GitLabArgs {
    /// Builds and validates the GitLab configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is missing or invalid.
    pub fn into_config(self) -> Result<GitLabConfig> {
        let token = self.token.ok_or_else(|| ConfigError::missing("GITLAB_TOKEN"))?;
        let project_id = self
            .project_id
            .ok_or_else(|| ConfigError::missing("CI_PROJECT_ID"))?;
        let merge_request_iid = self
            .merge_request_iid
            .ok_or_else(|| ConfigError::missing("CI_MERGE_REQUEST_IID"))?;

        let config = GitLabConfig {
            api_url: self.api_url,
            token,
            project_id,
            merge_request_iid,
            timeout_secs: self.timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }
}

impl From<ActionFilter> for ActionClass {
    fn from(filter: ActionFilter) -> Self {
        match filter {
            ActionFilter::Create => Self::Create,
            ActionFilter::Update => Self::Update,
            ActionFilter::Delete => Self::Delete,
        }
    }
}
