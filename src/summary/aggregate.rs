//! Aggregation of classified resource changes.
//!
//! The aggregator groups changes by action class and, within each class, by
//! resource type. Types keep the order in which they first appear in the
//! plan, so the same plan always produces the same rows.

use serde::Serialize;
use tracing::{debug, warn};

use crate::plan::{Plan, PlanHasher, ResourceChange};

use super::classify::{classify_change, ActionClass, UnrecognizedActionWarning};

/// A resource counted in a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    /// Full resource address.
    pub address: String,
    /// Resource type.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Local resource name.
    pub name: String,
}

/// Count and members of one resource type within one action class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeAggregate {
    /// Resource type.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Number of members.
    pub count: usize,
    /// Member addresses in plan order.
    pub addresses: Vec<String>,
    /// Member names in plan order.
    pub names: Vec<String>,
}

/// All members of one action class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionBucket {
    /// The action class.
    pub class: ActionClass,
    /// Members in plan order.
    pub members: Vec<Member>,
    /// Per-type aggregates in first-occurrence order.
    pub types: Vec<TypeAggregate>,
}

/// The grouped view of a plan that every renderer works from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Resources to create (including replacements).
    pub create: ActionBucket,
    /// Resources to update in place.
    pub update: ActionBucket,
    /// Resources to destroy.
    pub delete: ActionBucket,
    /// Changes whose actions could not be classified.
    pub warnings: Vec<UnrecognizedActionWarning>,
    /// Type filter the summary was built with.
    pub query: String,
    /// Plan fingerprint.
    pub fingerprint: String,
    /// Version of the tool that produced the plan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,
}

/// Builds summaries from plans.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    /// Substring a resource type must contain to be counted.
    query: String,
}

impl TypeAggregate {
    /// Creates an empty aggregate for a type.
    fn new(resource_type: &str) -> Self {
        Self {
            resource_type: resource_type.to_string(),
            count: 0,
            addresses: Vec::new(),
            names: Vec::new(),
        }
    }
}

impl ActionBucket {
    /// Creates an empty bucket.
    #[must_use]
    pub const fn new(class: ActionClass) -> Self {
        Self {
            class,
            members: Vec::new(),
            types: Vec::new(),
        }
    }

    /// Adds a resource change to the bucket.
    fn push(&mut self, change: &ResourceChange) {
        self.members.push(Member {
            address: change.address.clone(),
            resource_type: change.resource_type.clone(),
            name: change.name.clone(),
        });

        let index = match self
            .types
            .iter()
            .position(|t| t.resource_type == change.resource_type)
        {
            Some(index) => index,
            None => {
                self.types.push(TypeAggregate::new(&change.resource_type));
                self.types.len() - 1
            }
        };

        let aggregate = &mut self.types[index];
        aggregate.count += 1;
        aggregate.addresses.push(change.address.clone());
        aggregate.names.push(change.name.clone());
    }

    /// Returns the number of members.
    #[must_use]
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the bucket has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns member addresses in plan order.
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.address.as_str())
    }

    /// Returns the count for one resource type, zero if absent.
    #[must_use]
    pub fn type_count(&self, resource_type: &str) -> usize {
        self.types
            .iter()
            .find(|t| t.resource_type == resource_type)
            .map_or(0, |t| t.count)
    }
}

impl Summary {
    /// Returns the bucket for an action class.
    #[must_use]
    pub const fn bucket(&self, class: ActionClass) -> &ActionBucket {
        match class {
            ActionClass::Create => &self.create,
            ActionClass::Update => &self.update,
            ActionClass::Delete => &self.delete,
        }
    }

    /// Returns the three buckets in display order.
    #[must_use]
    pub const fn buckets(&self) -> [&ActionBucket; 3] {
        [&self.create, &self.update, &self.delete]
    }

    /// Returns the number of classified changes.
    #[must_use]
    pub fn total_changes(&self) -> usize {
        self.buckets().iter().map(|b| b.count()).sum()
    }

    /// Returns the number of changes that could not be classified.
    #[must_use]
    pub fn unrecognized_count(&self) -> usize {
        self.warnings.len()
    }

    /// Returns true if any change was classified.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.total_changes() > 0
    }
}

impl Aggregator {
    /// Creates an aggregator that counts every change.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            query: String::new(),
        }
    }

    /// Creates an aggregator that only counts types containing `query`.
    #[must_use]
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    /// Returns true if the change passes the type filter.
    fn matches(&self, change: &ResourceChange) -> bool {
        change.resource_type.contains(self.query.as_str())
    }

    /// Classifies and groups the changes of a plan.
    #[must_use]
    pub fn summarize(&self, plan: &Plan) -> Summary {
        let mut create = ActionBucket::new(ActionClass::Create);
        let mut update = ActionBucket::new(ActionClass::Update);
        let mut delete = ActionBucket::new(ActionClass::Delete);
        let mut warnings = Vec::new();

        for change in plan.resource_changes.iter().filter(|c| self.matches(c)) {
            match classify_change(change) {
                Ok(ActionClass::Create) => create.push(change),
                Ok(ActionClass::Update) => update.push(change),
                Ok(ActionClass::Delete) => delete.push(change),
                Err(warning) => {
                    warn!("{warning}");
                    warnings.push(warning);
                }
            }
        }

        debug!(
            "Summarized plan: {} to add, {} to change, {} to destroy, {} unrecognized",
            create.count(),
            update.count(),
            delete.count(),
            warnings.len()
        );

        Summary {
            create,
            update,
            delete,
            warnings,
            query: self.query.clone(),
            fingerprint: PlanHasher::new().hash_plan(plan),
            terraform_version: plan.terraform_version().map(String::from),
        }
    }
}
