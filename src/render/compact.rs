//! Compact table renderer.
//!
//! A markdown table meant for merge request comments. Grouped by type, rows
//! follow the plan's first-occurrence order; grouped by type and name, rows
//! are sorted so the table reads as a lookup table.

use std::collections::BTreeMap;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::summary::{ActionBucket, ActionClass, Summary};

use super::Render;

/// Row granularity of the compact table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Grouping {
    /// One row per resource type.
    #[default]
    Type,
    /// One row per (type, name) pair, sorted.
    TypeAndName,
}

/// Markdown table of counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactTable {
    /// Row granularity.
    grouping: Grouping,
    /// Restrict the table to one action class.
    only: Option<ActionClass>,
}

/// Per-type row.
#[derive(Tabled)]
struct TypeCountRow {
    #[tabled(rename = "Resource Type")]
    resource_type: String,
    #[tabled(rename = "Resource Count")]
    count: usize,
}

/// Per-(type, name) row.
#[derive(Tabled)]
struct TypeNameRow {
    #[tabled(rename = "Resource Type")]
    resource_type: String,
    #[tabled(rename = "Resource Name")]
    name: String,
    #[tabled(rename = "Count")]
    count: usize,
}

impl CompactTable {
    /// Creates a compact renderer with the given grouping.
    #[must_use]
    pub const fn new(grouping: Grouping) -> Self {
        Self {
            grouping,
            only: None,
        }
    }

    /// Restricts the table to one action class, or lifts the restriction.
    #[must_use]
    pub const fn only(mut self, class: Option<ActionClass>) -> Self {
        self.only = class;
        self
    }

    /// Returns the buckets this table counts.
    fn included<'a>(&self, summary: &'a Summary) -> Vec<&'a ActionBucket> {
        summary
            .buckets()
            .into_iter()
            .filter(|b| self.only.is_none_or(|class| class == b.class))
            .collect()
    }

    /// Builds per-type rows in first-occurrence order.
    fn type_rows(&self, summary: &Summary) -> Vec<TypeCountRow> {
        let mut rows: Vec<TypeCountRow> = Vec::new();

        for bucket in self.included(summary) {
            for aggregate in &bucket.types {
                match rows
                    .iter_mut()
                    .find(|r| r.resource_type == aggregate.resource_type)
                {
                    Some(row) => row.count += aggregate.count,
                    None => rows.push(TypeCountRow {
                        resource_type: aggregate.resource_type.clone(),
                        count: aggregate.count,
                    }),
                }
            }
        }

        rows
    }

    /// Builds per-(type, name) rows in sorted order.
    fn name_rows(&self, summary: &Summary) -> Vec<TypeNameRow> {
        let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();

        for bucket in self.included(summary) {
            for member in &bucket.members {
                *counts
                    .entry((member.resource_type.as_str(), member.name.as_str()))
                    .or_default() += 1;
            }
        }

        counts
            .into_iter()
            .map(|((resource_type, name), count)| TypeNameRow {
                resource_type: resource_type.to_string(),
                name: name.to_string(),
                count,
            })
            .collect()
    }
}

impl Render for CompactTable {
    fn render(&self, summary: &Summary) -> String {
        let mut table = match self.grouping {
            Grouping::Type => Table::new(self.type_rows(summary)),
            Grouping::TypeAndName => Table::new(self.name_rows(summary)),
        };
        table.with(Style::markdown());
        table.to_string()
    }
}
