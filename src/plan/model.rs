//! Plan model types.
//!
//! These types represent the subset of a Terraform JSON plan that the
//! summary pipeline needs. Everything else in the document is carried along
//! untouched in [`Plan::metadata`].

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// A single action token from `change.actions`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlanAction {
    /// The resource is unchanged.
    NoOp,
    /// The resource will be created.
    Create,
    /// A data source will be read.
    Read,
    /// The resource will be updated in place.
    Update,
    /// The resource will be destroyed.
    Delete,
    /// The resource will be removed from state without being destroyed.
    Forget,
    /// Any token this tool does not know about, kept verbatim.
    Other(String),
}

/// Resource mode as reported by the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceMode {
    /// A managed resource.
    Managed,
    /// A data source.
    Data,
}

/// One planned mutation to one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceChange {
    /// Full resource address, including the module path.
    pub address: String,
    /// Module address; empty for root-module resources.
    pub module_address: String,
    /// Resource mode.
    pub mode: ResourceMode,
    /// Provider-defined resource type.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Local resource name.
    pub name: String,
    /// Provider that owns this resource.
    pub provider_name: String,
    /// Ordered, non-empty action tokens.
    pub actions: Vec<PlanAction>,
    /// Why the planner chose these actions, when it says.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_reason: Option<String>,
}

/// A parsed plan document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    /// Resource changes in document order, with no-op entries removed.
    pub resource_changes: Vec<ResourceChange>,
    /// Every other top-level key of the document.
    pub metadata: Map<String, Value>,
    /// Number of entries dropped because they were no-ops.
    pub skipped_no_op: usize,
}

impl PlanAction {
    /// Returns the token as it appears in the plan document.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::NoOp => "no-op",
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Forget => "forget",
            Self::Other(token) => token,
        }
    }
}

impl From<&str> for PlanAction {
    fn from(token: &str) -> Self {
        match token {
            "no-op" => Self::NoOp,
            "create" => Self::Create,
            "read" => Self::Read,
            "update" => Self::Update,
            "delete" => Self::Delete,
            "forget" => Self::Forget,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for PlanAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PlanAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl ResourceMode {
    /// Parses a mode string from the plan document.
    #[must_use]
    pub fn parse(mode: &str) -> Option<Self> {
        match mode {
            "managed" => Some(Self::Managed),
            "data" => Some(Self::Data),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResourceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Managed => "managed",
            Self::Data => "data",
        };
        write!(f, "{s}")
    }
}

impl ResourceChange {
    /// Returns true if the resource lives in the root module.
    #[must_use]
    pub fn is_root_module(&self) -> bool {
        self.module_address.is_empty()
    }

    /// Returns true if `action` appears anywhere in the action list.
    #[must_use]
    pub fn has_action(&self, action: &PlanAction) -> bool {
        self.actions.contains(action)
    }

    /// Returns true if the change destroys and recreates the resource.
    #[must_use]
    pub fn is_replacement(&self) -> bool {
        self.has_action(&PlanAction::Create) && self.has_action(&PlanAction::Delete)
    }
}

impl Plan {
    /// Returns the plan format version, if the document has one.
    #[must_use]
    pub fn format_version(&self) -> Option<&str> {
        self.metadata.get("format_version").and_then(Value::as_str)
    }

    /// Returns the version of the tool that produced the plan.
    #[must_use]
    pub fn terraform_version(&self) -> Option<&str> {
        self.metadata.get("terraform_version").and_then(Value::as_str)
    }

    /// Returns the number of kept resource changes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resource_changes.len()
    }

    /// Returns true if the plan has no kept resource changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resource_changes.is_empty()
    }

    /// Returns the number of entries in the source document, no-ops included.
    #[must_use]
    pub fn raw_entry_count(&self) -> usize {
        self.resource_changes.len() + self.skipped_no_op
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(actions: &[&str]) -> ResourceChange {
        ResourceChange {
            address: String::from("aws_s3_bucket.logs"),
            module_address: String::new(),
            mode: ResourceMode::Managed,
            resource_type: String::from("aws_s3_bucket"),
            name: String::from("logs"),
            provider_name: String::from("registry.terraform.io/hashicorp/aws"),
            actions: actions.iter().copied().map(PlanAction::from).collect(),
            action_reason: None,
        }
    }

    #[test]
    fn test_action_tokens() {
        assert_eq!(PlanAction::from("no-op"), PlanAction::NoOp);
        assert_eq!(PlanAction::from("forget"), PlanAction::Forget);
        assert_eq!(
            PlanAction::from("import"),
            PlanAction::Other(String::from("import"))
        );
        assert_eq!(PlanAction::Other(String::from("import")).as_str(), "import");
    }

    #[test]
    fn test_replacement() {
        assert!(change(&["delete", "create"]).is_replacement());
        assert!(change(&["create", "delete"]).is_replacement());
        assert!(!change(&["create"]).is_replacement());
    }

    #[test]
    fn test_serialize_change() {
        let json = serde_json::to_value(change(&["update"])).unwrap();
        assert_eq!(json["type"], "aws_s3_bucket");
        assert_eq!(json["mode"], "managed");
        assert_eq!(json["actions"], serde_json::json!(["update"]));
        assert!(json.get("action_reason").is_none());
    }

    #[test]
    fn test_plan_metadata_accessors() {
        let mut plan = Plan::default();
        plan.metadata
            .insert(String::from("terraform_version"), Value::from("1.9.5"));
        plan.skipped_no_op = 2;
        plan.resource_changes.push(change(&["create"]));

        assert_eq!(plan.terraform_version(), Some("1.9.5"));
        assert_eq!(plan.format_version(), None);
        assert_eq!(plan.raw_entry_count(), 3);
    }
}
