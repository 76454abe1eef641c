//! Rule-based classifier.
//!
//! A fixed table of rules, each a set of trigger keywords plus a parameter
//! extractor. The input is lowercased and the table is walked top to bottom;
//! the first rule with any trigger occurring as a substring wins. Several
//! trigger sets overlap ("compare ... revoke", "schedule a scan"), so the
//! table order is the tie-break and must not change.
//!
//! Matching is plain substring search, not word-aware: "percentage" fires
//! the `"tag"` trigger.
//!
//! Most extractors fill static defaults. Only a handful of parameters are
//! read from the text (segment, location, time range, metric, tag, change
//! percentage, webhook destination).

use intentgate_core::action::{
    BulkTag, CompareMetrics, DataTransformation, FilterSegment, MergeDuplicates, RevokeAccess,
    ScanAnomalies, ScheduleJob, SimulateProjection, TriggerWebhook,
};
use intentgate_core::{Action, ActionKind};
use tracing::debug;

/// One entry of the rule table.
struct Rule {
    kind: ActionKind,
    triggers: &'static [&'static str],
    /// Receives the already-lowercased input.
    extract: fn(&str) -> Action,
}

/// Evaluated in order; first match wins.
const RULES: &[Rule] = &[
    Rule {
        kind: ActionKind::FilterSegment,
        triggers: &["show me", "filter", "display", "users from"],
        extract: filter_segment,
    },
    Rule {
        kind: ActionKind::CompareMetrics,
        triggers: &["compare", "vs", "versus"],
        extract: compare_metrics,
    },
    Rule {
        kind: ActionKind::BulkTag,
        triggers: &["tag", "label", "mark as"],
        extract: bulk_tag,
    },
    Rule {
        kind: ActionKind::RevokeAccess,
        triggers: &["revoke", "remove access", "disable"],
        extract: revoke_access,
    },
    Rule {
        kind: ActionKind::SimulateProjection,
        triggers: &["simulate", "what if", "what happens", "projection", "forecast"],
        extract: simulate_projection,
    },
    Rule {
        kind: ActionKind::ScanAnomalies,
        triggers: &["scan", "detect", "suspicious", "anomal", "security"],
        extract: scan_anomalies,
    },
    Rule {
        kind: ActionKind::ScheduleJob,
        triggers: &["schedule", "email me", "send me", "every monday", "weekly"],
        extract: schedule_job,
    },
    Rule {
        kind: ActionKind::TriggerWebhook,
        triggers: &["sync", "hubspot", "salesforce", "webhook", "integration"],
        extract: trigger_webhook,
    },
    Rule {
        kind: ActionKind::DataTransformation,
        triggers: &["fix", "format", "normalize", "phone", "e.164"],
        extract: data_transformation,
    },
    Rule {
        kind: ActionKind::MergeDuplicates,
        triggers: &["merge", "duplicate", "dedupe", "dedup"],
        extract: merge_duplicates,
    },
];

/// Location names recognized by FILTER_SEGMENT, in lookup order.
const LOCATIONS: &[&str] = &["japan", "usa", "europe", "asia", "germany", "france", "uk"];

/// Webhook destinations recognized by name, in lookup order.
const DESTINATIONS: &[&str] = &["salesforce", "hubspot"];
const DEFAULT_DESTINATION: &str = "hubspot";

/// Which rule fired for an input, and on which keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch {
    pub kind: ActionKind,
    pub trigger: &'static str,
    /// 1-based position of the rule in the table.
    pub priority: usize,
}

impl std::fmt::Display for RuleMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "rule #{} {} (trigger \"{}\")",
            self.priority, self.kind, self.trigger
        )
    }
}

/// Deterministic keyword classifier. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleClassifier;

impl RuleClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Map `text` to an action; `UNKNOWN` (no error) when no rule matches.
    pub fn classify(&self, text: &str) -> Action {
        let normalized = text.to_lowercase();
        match find(&normalized) {
            Some((rule, hit)) => {
                debug!(kind = %hit.kind, trigger = hit.trigger, "Rule matched");
                (rule.extract)(&normalized)
            }
            None => {
                debug!("No rule matched");
                Action::unknown()
            }
        }
    }

    /// The rule that would fire for `text`, if any.
    pub fn explain(&self, text: &str) -> Option<RuleMatch> {
        find(&text.to_lowercase()).map(|(_, hit)| hit)
    }

    /// Action kinds in evaluation order.
    pub fn rule_order(&self) -> impl Iterator<Item = ActionKind> {
        RULES.iter().map(|rule| rule.kind)
    }
}

fn find(normalized: &str) -> Option<(&'static Rule, RuleMatch)> {
    RULES.iter().enumerate().find_map(|(i, rule)| {
        rule.triggers
            .iter()
            .find(|trigger| normalized.contains(*trigger))
            .map(|trigger| {
                (
                    rule,
                    RuleMatch {
                        kind: rule.kind,
                        trigger: *trigger,
                        priority: i + 1,
                    },
                )
            })
    })
}

/// Upper-case the first character, keep the rest as given.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// --- Extractors ---

fn filter_segment(text: &str) -> Action {
    let segment = if text.contains("enterprise") {
        "enterprise"
    } else {
        "all"
    };

    let location = LOCATIONS
        .iter()
        .find(|loc| text.contains(*loc))
        .map(|loc| capitalize(loc));

    let time_range = if text.contains("last week") {
        Some("last_week")
    } else if text.contains("this month") {
        Some("current_month")
    } else if text.contains("today") {
        Some("today")
    } else {
        None
    };

    Action::FilterSegment(FilterSegment {
        segment: segment.into(),
        location,
        time_range: time_range.map(String::from),
    })
}

fn compare_metrics(text: &str) -> Action {
    let metric = if text.contains("churn") {
        "churn"
    } else if text.contains("growth") {
        "growth"
    } else {
        "revenue"
    };

    Action::CompareMetrics(CompareMetrics {
        metric: metric.into(),
        period_a: "current_month".into(),
        period_b: "2023-11".into(),
    })
}

fn bulk_tag(text: &str) -> Action {
    let tag = if text.contains("vip") { "VIP" } else { "tagged" };
    Action::BulkTag(BulkTag {
        criteria: "spend > 5000".into(),
        tag: tag.into(),
    })
}

fn revoke_access(_text: &str) -> Action {
    Action::RevokeAccess(RevokeAccess {
        role: "admin".into(),
        condition: "last_login > 30days".into(),
    })
}

fn simulate_projection(text: &str) -> Action {
    let change = [("10%", 10), ("30%", 30), ("50%", 50)]
        .into_iter()
        .find(|(literal, _)| text.contains(literal))
        .map_or(20, |(_, pct)| pct);

    Action::SimulateProjection(SimulateProjection {
        variable: "price".into(),
        change_percentage: change.into(),
        target: "revenue".into(),
    })
}

fn scan_anomalies(_text: &str) -> Action {
    Action::ScanAnomalies(ScanAnomalies {
        scan_type: "login_logs".into(),
    })
}

fn schedule_job(_text: &str) -> Action {
    Action::ScheduleJob(ScheduleJob {
        job_type: "export_pdf".into(),
        recurrence: "weekly".into(),
        day: Some("monday".into()),
        time: "09:00".into(),
    })
}

fn trigger_webhook(text: &str) -> Action {
    let destination = DESTINATIONS
        .iter()
        .find(|dest| text.contains(*dest))
        .copied()
        .unwrap_or(DEFAULT_DESTINATION);

    Action::TriggerWebhook(TriggerWebhook {
        destination: destination.into(),
        data_scope: "current_view".into(),
    })
}

fn data_transformation(_text: &str) -> Action {
    Action::DataTransformation(DataTransformation {
        field: "phone_number".into(),
        format: "E.164".into(),
    })
}

fn merge_duplicates(_text: &str) -> Action {
    Action::MergeDuplicates(MergeDuplicates {
        match_key: "email".into(),
    })
}
