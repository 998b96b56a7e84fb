//! CLI module for the plan summary tool.
//!
//! This module provides the command-line interface for printing plan
//! summaries and posting them on merge requests.

mod commands;
mod output;

pub use commands::{ActionFilter, Cli, Commands, GitLabArgs, OutputFormat, SummaryArgs, TableFormat};
pub use output::{OutputFormatter, COMMENT_HEADING};
