//! Plan fingerprints.
//!
//! A fingerprint is a deterministic digest of the kept resource changes of a
//! plan, shown in comments so reviewers can tell which plan a summary
//! describes.

use sha2::{Digest, Sha256};

use super::model::{Plan, ResourceChange};

/// Number of hex characters shown in short fingerprints.
pub const SHORT_FINGERPRINT_LEN: usize = 8;

/// Hasher for computing plan fingerprints.
#[derive(Debug, Default)]
pub struct PlanHasher;

impl PlanHasher {
    /// Creates a new plan hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes the fingerprint of a plan as a lowercase hex string.
    ///
    /// Only addresses and action tokens contribute, in document order.
    #[must_use]
    pub fn hash_plan(&self, plan: &Plan) -> String {
        let mut hasher = Sha256::new();

        for change in &plan.resource_changes {
            Self::update_change(&mut hasher, change);
        }

        hex::encode(hasher.finalize())
    }

    /// Feeds one resource change into the hasher.
    fn update_change(hasher: &mut Sha256, change: &ResourceChange) {
        hasher.update(change.address.as_bytes());
        hasher.update([0u8]);
        for action in &change.actions {
            hasher.update(action.as_str().as_bytes());
            hasher.update([0u8]);
        }
        // Record separator
        hasher.update([0xffu8]);
    }
}

/// Shortens a fingerprint for display.
#[must_use]
pub fn short(fingerprint: &str) -> &str {
    &fingerprint[..SHORT_FINGERPRINT_LEN.min(fingerprint.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlanParser;

    fn plan(actions: &str) -> Plan {
        let json = format!(
            r#"{{"resource_changes": [{{
                "address": "aws_s3_bucket.logs",
                "mode": "managed",
                "type": "aws_s3_bucket",
                "name": "logs",
                "provider_name": "registry.terraform.io/hashicorp/aws",
                "change": {{ "actions": {actions} }}
            }}]}}"#
        );
        PlanParser::new().parse_str(&json).unwrap()
    }

    #[test]
    fn test_hash_deterministic() {
        let hasher = PlanHasher::new();
        let first = hasher.hash_plan(&plan(r#"["create"]"#));
        let second = hasher.hash_plan(&plan(r#"["create"]"#));

        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_hash_changes_with_actions() {
        let hasher = PlanHasher::new();
        let create = hasher.hash_plan(&plan(r#"["create"]"#));
        let replace = hasher.hash_plan(&plan(r#"["delete", "create"]"#));

        assert_ne!(create, replace);
    }

    #[test]
    fn test_short() {
        assert_eq!(short("0123456789abcdef"), "01234567");
        assert_eq!(short("abc"), "abc");
    }
}
