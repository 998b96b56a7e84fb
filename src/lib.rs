// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # tfplan_summary
//!
//! Summarizes Terraform JSON plans into compact, reviewable tables.
//!
//! ## Overview
//!
//! Given the output of `terraform show -json <planfile>`, the crate:
//!
//! - Drops `no-op` entries and classifies every other change as add, change
//!   or destroy (replacements count as adds)
//! - Groups the changes by action and resource type
//! - Renders the groups as a grid table, a markdown table or JSON
//! - Optionally posts the table as a note on a GitLab merge request
//!
//! ## Pipeline
//!
//! 1. **Parse**: [`plan::PlanParser`] validates the document into a [`plan::Plan`]
//! 2. **Summarize**: [`summary::Aggregator`] builds a [`summary::Summary`]
//! 3. **Render**: any [`render::Render`] turns the summary into text
//! 4. **Notify**: a [`notify::Notifier`] posts the text
//!
//! ## Modules
//!
//! - [`plan`]: Plan document model, parser and fingerprint
//! - [`summary`]: Action classification and aggregation
//! - [`render`]: Grid, compact and JSON renderers
//! - [`notify`]: Merge request notes
//! - [`config`]: `.env` loading and GitLab settings
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```no_run
//! use tfplan_summary::plan::PlanParser;
//! use tfplan_summary::render::{GridTable, Render};
//! use tfplan_summary::summary::summarize;
//!
//! let plan = PlanParser::new().load_file("plan.json")?;
//! let summary = summarize(&plan, "");
//! println!("{}", GridTable::new().render(&summary));
//! # Ok::<(), tfplan_summary::TpsError>(())
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod error;
pub mod notify;
pub mod plan;
pub mod render;
pub mod summary;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{CommentTarget, GitLabConfig};
pub use error::{Result, TpsError};
pub use notify::{GitLabNotifier, Notifier};
pub use plan::{Plan, PlanParser, ResourceChange};
pub use render::{CompactTable, GridTable, JsonReport, Render};
pub use summary::{summarize, Aggregator, Summary};
