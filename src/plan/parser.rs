//! Plan parser for Terraform JSON plan documents.
//!
//! This module turns the output of `terraform show -json <planfile>` into a
//! [`Plan`]. No-op entries are rejected before any other field is read, and
//! every structural problem is reported with the JSON path that caused it.

use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{PlanError, Result};

use super::model::{Plan, PlanAction, ResourceChange, ResourceMode};

/// Top-level key holding the resource changes.
const RESOURCE_CHANGES: &str = "resource_changes";

/// Parser for plan documents.
#[derive(Debug, Default)]
pub struct PlanParser;

impl PlanParser {
    /// Creates a new plan parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Loads and parses a plan from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, or malformed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Plan> {
        let path = path.as_ref();
        info!("Loading plan from: {}", path.display());

        if !path.exists() {
            return Err(PlanError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = std::fs::read(path)?;
        self.parse_slice(&content)
    }

    /// Parses a plan from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or the document is malformed.
    pub fn parse_str(&self, content: &str) -> Result<Plan> {
        self.parse_slice(content.as_bytes())
    }

    /// Parses a plan from raw JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not JSON or the document is malformed.
    pub fn parse_slice(&self, content: &[u8]) -> Result<Plan> {
        let document: Value = serde_json::from_slice(content)
            .map_err(|e| PlanError::malformed("$", format!("invalid JSON: {e}")))?;
        self.parse_value(document)
    }

    /// Parses a plan from an already decoded JSON document.
    ///
    /// An entry without `module_address` is taken to be in the root module,
    /// as Terraform omits the key there.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or has the wrong type,
    /// if an entry has no actions, or if two entries share an address.
    pub fn parse_value(&self, document: Value) -> Result<Plan> {
        let Value::Object(mut root) = document else {
            return Err(PlanError::malformed("$", "expected a JSON object").into());
        };

        let raw_changes = match root.remove(RESOURCE_CHANGES) {
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                return Err(PlanError::malformed(
                    RESOURCE_CHANGES,
                    format!("expected an array, found {}", kind(&other)),
                )
                .into());
            }
            None => {
                return Err(PlanError::malformed(RESOURCE_CHANGES, "missing required field").into());
            }
        };

        let mut resource_changes = Vec::with_capacity(raw_changes.len());
        let mut seen_addresses = HashSet::new();
        let mut skipped_no_op = 0;

        for (index, entry) in raw_changes.iter().enumerate() {
            let Some(change) = Self::parse_entry(index, entry)? else {
                skipped_no_op += 1;
                continue;
            };

            if !seen_addresses.insert(change.address.clone()) {
                return Err(PlanError::DuplicateAddress {
                    address: change.address,
                }
                .into());
            }

            resource_changes.push(change);
        }

        debug!(
            "Parsed {} resource changes ({skipped_no_op} no-op skipped)",
            resource_changes.len()
        );

        Ok(Plan {
            resource_changes,
            metadata: root,
            skipped_no_op,
        })
    }

    /// Parses one entry of `resource_changes`.
    ///
    /// Returns `None` for no-op entries.
    fn parse_entry(index: usize, entry: &Value) -> std::result::Result<Option<ResourceChange>, PlanError> {
        let prefix = format!("{RESOURCE_CHANGES}[{index}]");
        let object = entry
            .as_object()
            .ok_or_else(|| PlanError::malformed(&prefix, format!("expected an object, found {}", kind(entry))))?;

        let raw_actions = Self::raw_actions(&prefix, object)?;
        if raw_actions.iter().any(|a| a.as_str() == Some("no-op")) {
            return Ok(None);
        }

        let actions = Self::parse_actions(&prefix, raw_actions)?;

        let mode_path = format!("{prefix}.mode");
        let mode_str = required_str(object, "mode", &mode_path)?;
        let mode = ResourceMode::parse(mode_str).ok_or_else(|| {
            PlanError::malformed(&mode_path, format!("unknown resource mode '{mode_str}'"))
        })?;

        let module_address = match object.get("module_address") {
            None => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(PlanError::malformed(
                    format!("{prefix}.module_address"),
                    format!("expected a string, found {}", kind(other)),
                ));
            }
        };

        let action_reason = object
            .get("action_reason")
            .and_then(Value::as_str)
            .map(String::from);

        Ok(Some(ResourceChange {
            address: required_str(object, "address", &format!("{prefix}.address"))?.to_string(),
            module_address,
            mode,
            resource_type: required_str(object, "type", &format!("{prefix}.type"))?.to_string(),
            name: required_str(object, "name", &format!("{prefix}.name"))?.to_string(),
            provider_name: required_str(object, "provider_name", &format!("{prefix}.provider_name"))?
                .to_string(),
            actions,
            action_reason,
        }))
    }

    /// Returns the raw `change.actions` array of an entry.
    fn raw_actions<'a>(
        prefix: &str,
        object: &'a Map<String, Value>,
    ) -> std::result::Result<&'a [Value], PlanError> {
        let change_path = format!("{prefix}.change");
        let change = match object.get("change") {
            Some(Value::Object(change)) => change,
            Some(other) => {
                return Err(PlanError::malformed(
                    change_path,
                    format!("expected an object, found {}", kind(other)),
                ));
            }
            None => return Err(PlanError::malformed(change_path, "missing required field")),
        };

        let actions_path = format!("{change_path}.actions");
        match change.get("actions") {
            Some(Value::Array(actions)) => Ok(actions.as_slice()),
            Some(other) => Err(PlanError::malformed(
                actions_path,
                format!("expected an array, found {}", kind(other)),
            )),
            None => Err(PlanError::malformed(actions_path, "missing required field")),
        }
    }

    /// Converts the raw action array into tokens.
    fn parse_actions(prefix: &str, raw: &[Value]) -> std::result::Result<Vec<PlanAction>, PlanError> {
        if raw.is_empty() {
            return Err(PlanError::malformed(
                format!("{prefix}.change.actions"),
                "expected at least one action",
            ));
        }

        raw.iter()
            .enumerate()
            .map(|(i, value)| {
                value.as_str().map(PlanAction::from).ok_or_else(|| {
                    PlanError::malformed(
                        format!("{prefix}.change.actions[{i}]"),
                        format!("expected a string, found {}", kind(value)),
                    )
                })
            })
            .collect()
    }
}

/// Reads a required string field.
fn required_str<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> std::result::Result<&'a str, PlanError> {
    match object.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(PlanError::malformed(
            path,
            format!("expected a string, found {}", kind(other)),
        )),
        None => Err(PlanError::malformed(path, "missing required field")),
    }
}

/// Names the JSON type of a value for error messages.
const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TpsError;
    use serde_json::json;

    fn entry(address: &str, resource_type: &str, name: &str, actions: &[&str]) -> Value {
        json!({
            "address": address,
            "module_address": "",
            "mode": "managed",
            "type": resource_type,
            "name": name,
            "provider_name": "registry.terraform.io/hashicorp/google",
            "change": { "actions": actions, "before": null, "after": {} }
        })
    }

    fn malformed_path(result: Result<Plan>) -> String {
        match result {
            Err(TpsError::Plan(PlanError::Malformed { path, .. })) => path,
            other => panic!("expected a malformed plan error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_keeps_order_and_drops_no_op() {
        let document = json!({
            "format_version": "1.2",
            "terraform_version": "1.9.5",
            "resource_changes": [
                entry("google_storage_bucket.a", "google_storage_bucket", "a", &["create"]),
                entry("google_storage_bucket.z", "google_storage_bucket", "z", &["no-op"]),
                entry("google_iam_policy.p", "google_iam_policy", "p", &["update"]),
            ]
        });

        let plan = PlanParser::new().parse_value(document).unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.skipped_no_op, 1);
        assert_eq!(plan.resource_changes[0].address, "google_storage_bucket.a");
        assert_eq!(plan.resource_changes[1].address, "google_iam_policy.p");
        assert_eq!(plan.terraform_version(), Some("1.9.5"));
        assert_eq!(plan.format_version(), Some("1.2"));
        assert!(!plan.metadata.contains_key(RESOURCE_CHANGES));
    }

    #[test]
    fn test_no_op_rejected_before_other_fields() {
        let document = json!({
            "resource_changes": [
                { "change": { "actions": ["no-op"] } }
            ]
        });

        let plan = PlanParser::new().parse_value(document).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.skipped_no_op, 1);
    }

    #[test]
    fn test_empty_resource_changes_is_valid() {
        let plan = PlanParser::new()
            .parse_str(r#"{"resource_changes": []}"#)
            .unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.raw_entry_count(), 0);
    }

    #[test]
    fn test_missing_resource_changes() {
        let result = PlanParser::new().parse_str(r#"{"format_version": "1.2"}"#);
        assert_eq!(malformed_path(result), "resource_changes");
    }

    #[test]
    fn test_root_must_be_object() {
        let result = PlanParser::new().parse_str("[1, 2, 3]");
        assert_eq!(malformed_path(result), "$");
    }

    #[test]
    fn test_invalid_json() {
        let result = PlanParser::new().parse_str("{ not json");
        assert_eq!(malformed_path(result), "$");
    }

    #[test]
    fn test_missing_field_reports_path() {
        let mut bad = entry("google_storage_bucket.a", "google_storage_bucket", "a", &["create"]);
        bad.as_object_mut().unwrap().remove("provider_name");
        let document = json!({
            "resource_changes": [
                entry("google_iam_policy.p", "google_iam_policy", "p", &["update"]),
                bad
            ]
        });

        let result = PlanParser::new().parse_value(document);
        assert_eq!(malformed_path(result), "resource_changes[1].provider_name");
    }

    #[test]
    fn test_empty_actions_rejected() {
        let document = json!({
            "resource_changes": [entry("google_storage_bucket.a", "google_storage_bucket", "a", &[])]
        });

        let result = PlanParser::new().parse_value(document);
        assert_eq!(malformed_path(result), "resource_changes[0].change.actions");
    }

    #[test]
    fn test_non_string_action_rejected() {
        let mut bad = entry("google_storage_bucket.a", "google_storage_bucket", "a", &["create"]);
        bad["change"]["actions"] = json!(["create", 7]);
        let document = json!({ "resource_changes": [bad] });

        let result = PlanParser::new().parse_value(document);
        assert_eq!(malformed_path(result), "resource_changes[0].change.actions[1]");
    }

    #[test]
    fn test_wrong_type_rejected() {
        let mut bad = entry("google_storage_bucket.a", "google_storage_bucket", "a", &["create"]);
        bad["name"] = json!(42);
        let document = json!({ "resource_changes": [bad] });

        let result = PlanParser::new().parse_value(document);
        assert_eq!(malformed_path(result), "resource_changes[0].name");
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let mut bad = entry("google_storage_bucket.a", "google_storage_bucket", "a", &["create"]);
        bad["mode"] = json!("ephemeral");
        let document = json!({ "resource_changes": [bad] });

        let result = PlanParser::new().parse_value(document);
        assert_eq!(malformed_path(result), "resource_changes[0].mode");
    }

    #[test]
    fn test_missing_module_address_means_root() {
        let mut root_entry = entry("google_storage_bucket.a", "google_storage_bucket", "a", &["create"]);
        root_entry.as_object_mut().unwrap().remove("module_address");
        let document = json!({ "resource_changes": [root_entry] });

        let plan = PlanParser::new().parse_value(document).unwrap();
        assert!(plan.resource_changes[0].is_root_module());
    }

    #[test]
    fn test_duplicate_address_rejected() {
        let document = json!({
            "resource_changes": [
                entry("google_storage_bucket.a", "google_storage_bucket", "a", &["create"]),
                entry("google_storage_bucket.a", "google_storage_bucket", "a", &["update"]),
            ]
        });

        let result = PlanParser::new().parse_value(document);
        assert!(matches!(
            result,
            Err(TpsError::Plan(PlanError::DuplicateAddress { address })) if address == "google_storage_bucket.a"
        ));
    }

    #[test]
    fn test_falsy_before_state_does_not_drop_change() {
        let mut with_empty_before = entry("google_storage_bucket.a", "google_storage_bucket", "a", &["update"]);
        with_empty_before["change"]["before"] = json!([]);
        with_empty_before["change"]["after"] = json!([]);
        let document = json!({ "resource_changes": [with_empty_before] });

        let plan = PlanParser::new().parse_value(document).unwrap();
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_action_reason_and_unknown_fields() {
        let mut replaced = entry("module.net.google_compute_network.vpc", "google_compute_network", "vpc", &["delete", "create"]);
        replaced["module_address"] = json!("module.net");
        replaced["action_reason"] = json!("replace_because_tainted");
        replaced["some_future_field"] = json!({ "nested": true });
        let document = json!({ "resource_changes": [replaced], "planned_values": {} });

        let plan = PlanParser::new().parse_value(document).unwrap();
        let change = &plan.resource_changes[0];
        assert_eq!(change.module_address, "module.net");
        assert_eq!(change.action_reason.as_deref(), Some("replace_because_tainted"));
        assert_eq!(change.actions, vec![PlanAction::Delete, PlanAction::Create]);
        assert!(plan.metadata.contains_key("planned_values"));
    }

    #[test]
    fn test_load_file_not_found() {
        let result = PlanParser::new().load_file("/nonexistent/plan.json");
        assert!(matches!(
            result,
            Err(TpsError::Plan(PlanError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("plan.json");
        let document = json!({
            "resource_changes": [entry("google_storage_bucket.a", "google_storage_bucket", "a", &["create"])]
        });
        std::fs::write(&path, document.to_string()).expect("Failed to write plan");

        let plan = PlanParser::new().load_file(&path).unwrap();
        assert_eq!(plan.len(), 1);
    }
}
