//! Plan module for Terraform JSON plans.
//!
//! This module handles everything about the input document:
//! - The typed plan model
//! - Parsing and validating the raw JSON document
//! - Computing plan fingerprints

mod fingerprint;
mod model;
mod parser;

pub use fingerprint::{short as short_fingerprint, PlanHasher, SHORT_FINGERPRINT_LEN};
pub use model::{Plan, PlanAction, ResourceChange, ResourceMode};
pub use parser::PlanParser;
