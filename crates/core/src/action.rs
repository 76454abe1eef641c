//! The action schema.
//!
//! Every command resolves to exactly one [`Action`]. Ten variants describe
//! concrete dashboard operations and carry a fixed parameter struct; the
//! eleventh, `UNKNOWN`, is the "no idea" answer and may carry a diagnostic.
//!
//! Parameters that the source text may not determine are `Option<String>`
//! and serialize as JSON `null`; they are never dropped from the payload.
//!
//! On the wire an action is `{"action": "<KIND>", "params": {...} | null}`,
//! plus an `"error"` key on annotated `UNKNOWN` actions. See [`RawAction`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::SchemaViolation;

/// The closed set of action kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    FilterSegment,
    CompareMetrics,
    BulkTag,
    RevokeAccess,
    SimulateProjection,
    ScanAnomalies,
    ScheduleJob,
    TriggerWebhook,
    DataTransformation,
    MergeDuplicates,
    Unknown,
}

impl ActionKind {
    /// Every kind, in rule-priority order with `Unknown` last.
    pub const ALL: [ActionKind; 11] = [
        ActionKind::FilterSegment,
        ActionKind::CompareMetrics,
        ActionKind::BulkTag,
        ActionKind::RevokeAccess,
        ActionKind::SimulateProjection,
        ActionKind::ScanAnomalies,
        ActionKind::ScheduleJob,
        ActionKind::TriggerWebhook,
        ActionKind::DataTransformation,
        ActionKind::MergeDuplicates,
        ActionKind::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::FilterSegment => "FILTER_SEGMENT",
            ActionKind::CompareMetrics => "COMPARE_METRICS",
            ActionKind::BulkTag => "BULK_TAG",
            ActionKind::RevokeAccess => "REVOKE_ACCESS",
            ActionKind::SimulateProjection => "SIMULATE_PROJECTION",
            ActionKind::ScanAnomalies => "SCAN_ANOMALIES",
            ActionKind::ScheduleJob => "SCHEDULE_JOB",
            ActionKind::TriggerWebhook => "TRIGGER_WEBHOOK",
            ActionKind::DataTransformation => "DATA_TRANSFORMATION",
            ActionKind::MergeDuplicates => "MERGE_DUPLICATES",
            ActionKind::Unknown => "UNKNOWN",
        }
    }

    /// Whether executing this action removes capabilities from users.
    ///
    /// Front ends ask for explicit confirmation before running these.
    pub fn is_destructive(self) -> bool {
        matches!(self, ActionKind::RevokeAccess)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = SchemaViolation;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SchemaViolation::UnknownKind(s.to_string()))
    }
}

// --- Parameter shapes ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSegment {
    pub segment: String,
    pub location: Option<String>,
    pub time_range: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareMetrics {
    pub metric: String,
    pub period_a: String,
    pub period_b: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkTag {
    pub criteria: String,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevokeAccess {
    pub role: String,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulateProjection {
    pub variable: String,
    /// Kept as a JSON number so integral values stay integral on the wire.
    pub change_percentage: Number,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanAnomalies {
    #[serde(rename = "type")]
    pub scan_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleJob {
    pub job_type: String,
    pub recurrence: String,
    pub day: Option<String>,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerWebhook {
    pub destination: String,
    pub data_scope: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTransformation {
    pub field: String,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeDuplicates {
    pub match_key: String,
}

/// A classified command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAction", into = "RawAction")]
pub enum Action {
    FilterSegment(FilterSegment),
    CompareMetrics(CompareMetrics),
    BulkTag(BulkTag),
    RevokeAccess(RevokeAccess),
    SimulateProjection(SimulateProjection),
    ScanAnomalies(ScanAnomalies),
    ScheduleJob(ScheduleJob),
    TriggerWebhook(TriggerWebhook),
    DataTransformation(DataTransformation),
    MergeDuplicates(MergeDuplicates),
    Unknown { error: Option<String> },
}

impl Action {
    /// `UNKNOWN` with no diagnostic: nothing matched.
    pub fn unknown() -> Self {
        Action::Unknown { error: None }
    }

    /// `UNKNOWN` annotated with why classification failed.
    pub fn unknown_with_error(error: impl Into<String>) -> Self {
        Action::Unknown {
            error: Some(error.into()),
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::FilterSegment(_) => ActionKind::FilterSegment,
            Action::CompareMetrics(_) => ActionKind::CompareMetrics,
            Action::BulkTag(_) => ActionKind::BulkTag,
            Action::RevokeAccess(_) => ActionKind::RevokeAccess,
            Action::SimulateProjection(_) => ActionKind::SimulateProjection,
            Action::ScanAnomalies(_) => ActionKind::ScanAnomalies,
            Action::ScheduleJob(_) => ActionKind::ScheduleJob,
            Action::TriggerWebhook(_) => ActionKind::TriggerWebhook,
            Action::DataTransformation(_) => ActionKind::DataTransformation,
            Action::MergeDuplicates(_) => ActionKind::MergeDuplicates,
            Action::Unknown { .. } => ActionKind::Unknown,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Action::Unknown { .. })
    }

    /// The diagnostic carried by an annotated `UNKNOWN`.
    pub fn error(&self) -> Option<&str> {
        match self {
            Action::Unknown { error } => error.as_deref(),
            _ => None,
        }
    }

    /// The parameter object, or `None` for `UNKNOWN`.
    pub fn params(&self) -> Option<Value> {
        let value = match self {
            Action::FilterSegment(p) => serde_json::to_value(p),
            Action::CompareMetrics(p) => serde_json::to_value(p),
            Action::BulkTag(p) => serde_json::to_value(p),
            Action::RevokeAccess(p) => serde_json::to_value(p),
            Action::SimulateProjection(p) => serde_json::to_value(p),
            Action::ScanAnomalies(p) => serde_json::to_value(p),
            Action::ScheduleJob(p) => serde_json::to_value(p),
            Action::TriggerWebhook(p) => serde_json::to_value(p),
            Action::DataTransformation(p) => serde_json::to_value(p),
            Action::MergeDuplicates(p) => serde_json::to_value(p),
            Action::Unknown { .. } => return None,
        };
        value.ok()
    }

    /// Validate an untyped reply against the schema.
    pub fn from_raw(raw: RawAction) -> std::result::Result<Self, SchemaViolation> {
        let kind: ActionKind = raw.action.parse()?;
        let params = raw.params;
        let action = match kind {
            ActionKind::FilterSegment => Action::FilterSegment(typed(kind, params)?),
            ActionKind::CompareMetrics => Action::CompareMetrics(typed(kind, params)?),
            ActionKind::BulkTag => Action::BulkTag(typed(kind, params)?),
            ActionKind::RevokeAccess => Action::RevokeAccess(typed(kind, params)?),
            ActionKind::SimulateProjection => Action::SimulateProjection(typed(kind, params)?),
            ActionKind::ScanAnomalies => Action::ScanAnomalies(typed(kind, params)?),
            ActionKind::ScheduleJob => Action::ScheduleJob(typed(kind, params)?),
            ActionKind::TriggerWebhook => Action::TriggerWebhook(typed(kind, params)?),
            ActionKind::DataTransformation => Action::DataTransformation(typed(kind, params)?),
            ActionKind::MergeDuplicates => Action::MergeDuplicates(typed(kind, params)?),
            ActionKind::Unknown => Action::Unknown { error: raw.error },
        };
        Ok(action)
    }
}

fn typed<T: DeserializeOwned>(
    kind: ActionKind,
    params: Option<Value>,
) -> std::result::Result<T, SchemaViolation> {
    let params = params.ok_or(SchemaViolation::MissingParams(kind))?;
    serde_json::from_value(params).map_err(|e| SchemaViolation::InvalidParams {
        kind,
        reason: e.to_string(),
    })
}

/// The untyped wire shape of an action.
///
/// This is what an external provider replies with, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAction {
    pub action: String,
    #[serde(default)]
    pub params: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TryFrom<RawAction> for Action {
    type Error = SchemaViolation;

    fn try_from(raw: RawAction) -> std::result::Result<Self, Self::Error> {
        Action::from_raw(raw)
    }
}

impl From<Action> for RawAction {
    fn from(action: Action) -> Self {
        RawAction {
            action: action.kind().as_str().to_string(),
            params: action.params(),
            error: action.error().map(String::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawAction {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn kind_names_roundtrip_through_from_str() {
        for kind in ActionKind::ALL {
            assert_eq!(kind.as_str().parse::<ActionKind>().unwrap(), kind);
        }
    }

    #[test]
    fn kind_parse_is_case_sensitive() {
        let err = "filter_segment".parse::<ActionKind>().unwrap_err();
        assert_eq!(err, SchemaViolation::UnknownKind("filter_segment".into()));
    }

    #[test]
    fn kind_serializes_screaming_snake() {
        let json = serde_json::to_string(&ActionKind::SimulateProjection).unwrap();
        assert_eq!(json, "\"SIMULATE_PROJECTION\"");
    }

    #[test]
    fn only_revoke_access_is_destructive() {
        let destructive: Vec<_> = ActionKind::ALL
            .into_iter()
            .filter(|k| k.is_destructive())
            .collect();
        assert_eq!(destructive, vec![ActionKind::RevokeAccess]);
    }

    #[test]
    fn nullable_params_serialize_as_null() {
        let action = Action::FilterSegment(FilterSegment {
            segment: "all".into(),
            location: None,
            time_range: None,
        });
        assert_eq!(
            action.params().unwrap(),
            json!({"segment": "all", "location": null, "time_range": null})
        );
    }

    #[test]
    fn scan_type_uses_type_key() {
        let action = Action::ScanAnomalies(ScanAnomalies {
            scan_type: "login_logs".into(),
        });
        assert_eq!(action.params().unwrap(), json!({"type": "login_logs"}));
    }

    #[test]
    fn unknown_has_no_params() {
        assert!(Action::unknown().params().is_none());
        assert_eq!(Action::unknown().error(), None);
        assert_eq!(
            Action::unknown_with_error("boom").error(),
            Some("boom")
        );
    }

    #[test]
    fn from_raw_accepts_valid_reply() {
        let action = Action::from_raw(raw(json!({
            "action": "SCHEDULE_JOB",
            "params": {"job_type": "export_pdf", "recurrence": "weekly", "day": null, "time": "09:00"}
        })))
        .unwrap();
        assert_eq!(action.kind(), ActionKind::ScheduleJob);
        assert_eq!(action.params().unwrap()["day"], Value::Null);
    }

    #[test]
    fn from_raw_accepts_missing_optional_param() {
        let action = Action::from_raw(raw(json!({
            "action": "FILTER_SEGMENT",
            "params": {"segment": "enterprise"}
        })))
        .unwrap();
        assert_eq!(
            action,
            Action::FilterSegment(FilterSegment {
                segment: "enterprise".into(),
                location: None,
                time_range: None,
            })
        );
    }

    #[test]
    fn from_raw_rejects_missing_required_param() {
        let err = Action::from_raw(raw(json!({
            "action": "BULK_TAG",
            "params": {"tag": "VIP"}
        })))
        .unwrap_err();
        assert!(matches!(
            err,
            SchemaViolation::InvalidParams { kind: ActionKind::BulkTag, .. }
        ));
    }

    #[test]
    fn from_raw_rejects_missing_params_object() {
        let err = Action::from_raw(raw(json!({"action": "MERGE_DUPLICATES"}))).unwrap_err();
        assert_eq!(err, SchemaViolation::MissingParams(ActionKind::MergeDuplicates));
    }

    #[test]
    fn from_raw_rejects_kind_outside_schema() {
        let err = Action::from_raw(raw(json!({"action": "DROP_TABLE", "params": {}}))).unwrap_err();
        assert_eq!(err, SchemaViolation::UnknownKind("DROP_TABLE".into()));
    }

    #[test]
    fn from_raw_rejects_string_percentage() {
        let err = Action::from_raw(raw(json!({
            "action": "SIMULATE_PROJECTION",
            "params": {"variable": "price", "change_percentage": "20", "target": "revenue"}
        })))
        .unwrap_err();
        assert!(matches!(err, SchemaViolation::InvalidParams { .. }));
    }

    #[test]
    fn from_raw_keeps_unknown_error() {
        let action = Action::from_raw(raw(json!({"action": "UNKNOWN", "error": "no match"}))).unwrap();
        assert_eq!(action, Action::unknown_with_error("no match"));
    }

    #[test]
    fn action_serializes_as_wire_shape() {
        let action = Action::MergeDuplicates(MergeDuplicates {
            match_key: "email".into(),
        });
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({"action": "MERGE_DUPLICATES", "params": {"match_key": "email"}})
        );
        assert_eq!(
            serde_json::to_value(Action::unknown()).unwrap(),
            json!({"action": "UNKNOWN", "params": null})
        );
    }

    #[test]
    fn action_deserialize_validates() {
        let ok: Action = serde_json::from_value(json!({
            "action": "REVOKE_ACCESS",
            "params": {"role": "admin", "condition": "last_login > 30days"}
        }))
        .unwrap();
        assert_eq!(ok.kind(), ActionKind::RevokeAccess);

        let bad = serde_json::from_value::<Action>(json!({"action": "REVOKE_ACCESS", "params": {}}));
        assert!(bad.is_err());
    }
}
