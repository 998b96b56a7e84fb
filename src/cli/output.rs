//! Output formatting for CLI commands.
//!
//! This module picks the renderer for a command and wraps its table with
//! the plan totals line or the merge request comment frame.

use colored::Colorize;
use std::fmt::Write;

use crate::plan::short_fingerprint;
use crate::render::{CompactTable, GridTable, Grouping, JsonReport, Render};
use crate::summary::{ActionClass, Summary};

use super::commands::{OutputFormat, TableFormat};

/// Heading of merge request comments.
pub const COMMENT_HEADING: &str = "### Terraform Plan Resource Summary";

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
    /// Whether console output may use colours.
    colored: bool,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colored: false,
        }
    }

    /// Enables or disables colours on console output.
    #[must_use]
    pub const fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Returns the renderer for a table layout.
    ///
    /// JSON output overrides the layout. `only` applies to compact tables;
    /// grid and JSON renderers always cover every action.
    #[must_use]
    pub fn renderer(&self, table: TableFormat, only: Option<ActionClass>) -> Box<dyn Render> {
        if matches!(self.format, OutputFormat::Json) {
            return Box::new(JsonReport);
        }
        Self::table_renderer(table, only, self.colored)
    }

    /// Maps a layout to its renderer.
    fn table_renderer(table: TableFormat, only: Option<ActionClass>, colored: bool) -> Box<dyn Render> {
        match table {
            TableFormat::Grid => Box::new(GridTable::new().with_color(colored)),
            TableFormat::Compact => Box::new(CompactTable::new(Grouping::Type).only(only)),
            TableFormat::CompactNames => Box::new(CompactTable::new(Grouping::TypeAndName).only(only)),
            TableFormat::Json => Box::new(JsonReport),
        }
    }

    /// Formats a summary for the console.
    #[must_use]
    pub fn format_summary(&self, summary: &Summary, table: TableFormat, only: Option<ActionClass>) -> String {
        let rendered = self.renderer(table, only).render(summary);
        if matches!(self.format, OutputFormat::Json) || table == TableFormat::Json {
            return format!("{rendered}\n");
        }

        let mut output = String::new();
        let _ = writeln!(output, "{rendered}");
        let _ = write!(output, "\n{}\n", self.plan_line(summary));
        if !summary.query.is_empty() {
            let _ = writeln!(output, "Filtered to resource types containing `{}`", summary.query);
        }
        if summary.unrecognized_count() > 0 {
            let _ = writeln!(output, "{}", self.warning_line(summary));
        }
        output
    }

    /// Formats a summary as a merge request comment.
    ///
    /// Comments are never coloured. Grid and JSON output are fenced so they
    /// keep their layout in markdown.
    #[must_use]
    pub fn format_comment(summary: &Summary, table: TableFormat, only: Option<ActionClass>) -> String {
        let rendered = Self::table_renderer(table, only, false).render(summary);
        let plain = Self::new(OutputFormat::Text);

        let mut output = String::new();
        let _ = write!(output, "{COMMENT_HEADING}\n\n");
        match table {
            TableFormat::Grid => {
                let _ = write!(output, "```text\n{rendered}\n```\n");
            }
            TableFormat::Json => {
                let _ = write!(output, "```json\n{rendered}\n```\n");
            }
            TableFormat::Compact | TableFormat::CompactNames => {
                let _ = writeln!(output, "{rendered}");
            }
        }

        let _ = write!(output, "\n**{}**\n", plain.plan_line(summary));
        if !summary.query.is_empty() {
            let _ = writeln!(
                output,
                "\nFiltered to resource types containing `{}`.",
                summary.query
            );
        }
        if summary.unrecognized_count() > 0 {
            let _ = write!(output, "\n> {}\n", plain.warning_line(summary));
        }
        let _ = write!(
            output,
            "\n<sub>Plan fingerprint `{}`</sub>\n",
            short_fingerprint(&summary.fingerprint)
        );
        output
    }

    /// Formats the totals line.
    #[must_use]
    pub fn plan_line(&self, summary: &Summary) -> String {
        let create = summary.create.count().to_string();
        let update = summary.update.count().to_string();
        let delete = summary.delete.count().to_string();

        if self.colored {
            format!(
                "Plan: {} to add, {} to change, {} to destroy.",
                create.green(),
                update.yellow(),
                delete.red()
            )
        } else {
            format!("Plan: {create} to add, {update} to change, {delete} to destroy.")
        }
    }

    /// Formats the notice about changes that were not counted.
    fn warning_line(&self, summary: &Summary) -> String {
        let count = summary.unrecognized_count();
        let noun = if count == 1 { "change" } else { "changes" };
        let line = format!("{count} resource {noun} with unrecognized actions not counted");
        if self.colored {
            line.yellow().to_string()
        } else {
            line
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures;

    #[test]
    fn test_plan_line() {
        let formatter = OutputFormatter::new(OutputFormat::Text);
        assert_eq!(
            formatter.plan_line(&fixtures::scenario()),
            "Plan: 2 to add, 1 to change, 1 to destroy."
        );
    }

    #[test]
    fn test_text_summary_has_table_and_totals() {
        let output = OutputFormatter::new(OutputFormat::Text).format_summary(
            &fixtures::scenario(),
            TableFormat::Grid,
            None,
        );

        assert!(output.contains("ADD"));
        assert!(output.contains("storage_bucket.a"));
        assert!(output.ends_with("Plan: 2 to add, 1 to change, 1 to destroy.\n"));
    }

    #[test]
    fn test_json_output_overrides_table() {
        let output = OutputFormatter::new(OutputFormat::Json).format_summary(
            &fixtures::scenario(),
            TableFormat::Grid,
            None,
        );

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["totals"]["create"], 2);
    }

    #[test]
    fn test_comment_with_compact_table() {
        let summary = fixtures::scenario();
        let comment = OutputFormatter::format_comment(&summary, TableFormat::Compact, None);

        assert!(comment.starts_with("### Terraform Plan Resource Summary\n\n| Resource Type"));
        assert!(comment.contains("**Plan: 2 to add, 1 to change, 1 to destroy.**"));
        assert!(comment.contains(&format!("`{}`", &summary.fingerprint[..8])));
        assert!(!comment.contains("```"));
    }

    #[test]
    fn test_comment_fences_grid() {
        let comment =
            OutputFormatter::format_comment(&fixtures::scenario(), TableFormat::Grid, None);

        assert!(comment.contains("```text\n"));
        assert!(comment.contains("DESTROY"));
        assert!(!comment.contains('\u{1b}'));
    }

    #[test]
    fn test_comment_mentions_query() {
        let mut summary = fixtures::scenario();
        summary.query = String::from("bucket");

        let comment = OutputFormatter::format_comment(&summary, TableFormat::Compact, None);
        assert!(comment.contains("containing `bucket`"));
    }

    #[test]
    fn test_only_ignored_by_grid_and_json() {
        let summary = fixtures::scenario();
        let formatter = OutputFormatter::new(OutputFormat::Text);

        for table in [TableFormat::Grid, TableFormat::Json] {
            assert_eq!(
                formatter.renderer(table, Some(ActionClass::Create)).render(&summary),
                formatter.renderer(table, None).render(&summary)
            );
        }
        let grid = formatter
            .renderer(TableFormat::Grid, Some(ActionClass::Create))
            .render(&summary);
        assert!(grid.contains("DESTROY") && grid.contains("storage_bucket.c"));
    }

    #[test]
    fn test_renderer_selection() {
        let summary = fixtures::modules();
        let formatter = OutputFormatter::new(OutputFormat::Text);

        let names = formatter.renderer(TableFormat::CompactNames, None).render(&summary);
        assert!(names.contains("Resource Name"));

        let creates = formatter
            .renderer(TableFormat::Compact, Some(ActionClass::Create))
            .render(&summary);
        assert!(!creates.contains("dns_record"));
    }
}
