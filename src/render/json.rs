//! JSON renderer for scripting.

use serde::Serialize;

use crate::summary::{ActionBucket, Summary, UnrecognizedActionWarning};

use super::Render;

/// Renders a summary as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReport;

#[derive(Serialize)]
struct ReportJson<'a> {
    fingerprint: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    terraform_version: Option<&'a str>,
    query: &'a str,
    totals: TotalsJson,
    actions: [&'a ActionBucket; 3],
    warnings: &'a [UnrecognizedActionWarning],
}

#[derive(Serialize)]
struct TotalsJson {
    create: usize,
    update: usize,
    delete: usize,
    unrecognized: usize,
}

impl From<&Summary> for TotalsJson {
    fn from(summary: &Summary) -> Self {
        Self {
            create: summary.create.count(),
            update: summary.update.count(),
            delete: summary.delete.count(),
            unrecognized: summary.unrecognized_count(),
        }
    }
}

impl Render for JsonReport {
    fn render(&self, summary: &Summary) -> String {
        let report = ReportJson {
            fingerprint: &summary.fingerprint,
            terraform_version: summary.terraform_version.as_deref(),
            query: &summary.query,
            totals: TotalsJson::from(summary),
            actions: summary.buckets(),
            warnings: &summary.warnings,
        };
        serde_json::to_string_pretty(&report).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures;
    use serde_json::Value;

    #[test]
    fn test_report_shape() {
        let summary = fixtures::scenario();
        let json: Value = serde_json::from_str(&JsonReport.render(&summary)).unwrap();

        assert_eq!(json["totals"]["create"], 2);
        assert_eq!(json["totals"]["update"], 1);
        assert_eq!(json["totals"]["delete"], 1);
        assert_eq!(json["totals"]["unrecognized"], 0);
        assert_eq!(json["terraform_version"], "1.9.5");
        assert_eq!(json["fingerprint"], summary.fingerprint.as_str());

        let actions = json["actions"].as_array().unwrap();
        assert_eq!(actions.len(), 3);
        assert_eq!(actions[0]["class"], "create");
        assert_eq!(actions[0]["types"][0]["type"], "storage_bucket");
        assert_eq!(actions[0]["types"][0]["count"], 2);
        assert_eq!(actions[2]["class"], "delete");
        assert_eq!(actions[2]["members"][0]["address"], "storage_bucket.c");
    }

    #[test]
    fn test_empty_summary_keeps_all_buckets() {
        let json: Value = serde_json::from_str(&JsonReport.render(&fixtures::empty())).unwrap();

        let actions = json["actions"].as_array().unwrap();
        assert_eq!(actions.len(), 3);
        assert!(actions.iter().all(|a| a["members"].as_array().is_some_and(Vec::is_empty)));
    }
}
