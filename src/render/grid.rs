//! Grid table renderer.
//!
//! Five columns, one row per action class in the fixed order add, change,
//! destroy. Multi-valued cells hold one value per line.

use colored::Colorize;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::summary::{ActionBucket, ActionClass, Summary};

use super::Render;

/// Column headers.
const HEADERS: [&str; 5] = ["Action", "Addresses", "Resource Count", "Type", "Type Count"];

/// Boxed table with one row per action class.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridTable {
    /// Whether to emit ANSI colours.
    colored: bool,
}

impl GridTable {
    /// Creates a plain grid renderer.
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: false }
    }

    /// Enables or disables ANSI colours.
    #[must_use]
    pub const fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Formats a header cell.
    fn header(self, title: &str) -> String {
        if self.colored {
            title.blue().to_string()
        } else {
            title.to_string()
        }
    }

    /// Formats the action label of a row.
    fn label(self, class: ActionClass) -> String {
        let label = class.label();
        if !self.colored {
            return label.to_string();
        }
        match class {
            ActionClass::Create => label.green().to_string(),
            ActionClass::Update => label.yellow().to_string(),
            ActionClass::Delete => label.red().to_string(),
        }
    }

    /// Builds the cells of one row.
    fn row(self, bucket: &ActionBucket) -> [String; 5] {
        let addresses = bucket.addresses().collect::<Vec<_>>().join("\n");
        let types = bucket
            .types
            .iter()
            .map(|t| t.resource_type.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let type_counts = bucket
            .types
            .iter()
            .map(|t| t.count.to_string())
            .collect::<Vec<_>>()
            .join("\n");

        [
            self.label(bucket.class),
            addresses,
            bucket.count().to_string(),
            types,
            type_counts,
        ]
    }
}

impl Render for GridTable {
    fn render(&self, summary: &Summary) -> String {
        let mut builder = Builder::default();
        builder.push_record(HEADERS.map(|h| self.header(h)));
        for bucket in summary.buckets() {
            builder.push_record(self.row(bucket));
        }

        let mut table = builder.build();
        table.with(Style::extended());
        table.to_string()
    }
}
