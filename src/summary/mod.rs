//! Summary module.
//!
//! Classifies resource changes by action and aggregates them into the
//! grouped counts that every renderer draws from.

mod aggregate;
mod classify;

pub use aggregate::{ActionBucket, Aggregator, Member, Summary, TypeAggregate};
pub use classify::{classify, classify_change, ActionClass, UnrecognizedActionWarning};

use crate::plan::Plan;

/// Summarizes a plan, counting only types that contain `query`.
#[must_use]
pub fn summarize(plan: &Plan, query: &str) -> Summary {
    Aggregator::with_query(query).summarize(plan)
}
