//! Generated minutes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Assignee used when the model names nobody
pub const UNASSIGNED: &str = "Unassigned";

/// Due date used when the model gives none
pub const NO_DUE_DATE: &str = "TBD";

/// A single follow-up task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    pub task: String,
    pub assignee: String,
    pub due_date: String,
}

impl ActionItem {
    /// A task with no owner and no due date
    pub fn unassigned(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            assignee: UNASSIGNED.to_string(),
            due_date: NO_DUE_DATE.to_string(),
        }
    }
}

/// Structured minutes produced from one transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedMinutes {
    pub title: String,

    /// Meeting date as returned by the model (requested as YYYY-MM-DD)
    pub date: String,

    #[serde(default)]
    pub attendees: Vec<String>,

    #[serde(default)]
    pub agenda: Vec<String>,

    #[serde(default)]
    pub key_decisions: Vec<String>,

    #[serde(default)]
    pub action_items: Vec<ActionItem>,

    #[serde(default)]
    pub next_steps: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    /// Fields outside the standard schema, such as template custom fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GeneratedMinutes {
    /// Summary line used when the model does not provide one
    pub fn fallback_summary(&self) -> String {
        format!(
            "Meeting covered {} topics with {} decisions and {} action items.",
            self.agenda.len(),
            self.key_decisions.len(),
            self.action_items.len()
        )
    }

    /// True when every list section is empty
    pub fn is_blank(&self) -> bool {
        self.attendees.is_empty()
            && self.agenda.is_empty()
            && self.key_decisions.is_empty()
            && self.action_items.is_empty()
            && self.next_steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_camel_case_keys_and_extra_fields() {
        let mut extra = Map::new();
        extra.insert("location".to_string(), json!("Room 4"));

        let minutes = GeneratedMinutes {
            title: "Sync".to_string(),
            date: "2025-01-11".to_string(),
            attendees: vec!["John".to_string()],
            agenda: vec![],
            key_decisions: vec!["Ship it".to_string()],
            action_items: vec![ActionItem::unassigned("Write notes")],
            next_steps: vec![],
            summary: None,
            duration: None,
            extra,
        };

        let value = serde_json::to_value(&minutes).expect("serialize");
        assert_eq!(value["keyDecisions"], json!(["Ship it"]));
        assert_eq!(value["actionItems"][0]["dueDate"], json!("TBD"));
        assert_eq!(value["location"], json!("Room 4"));
        assert!(value.get("summary").is_none());
    }

    #[test]
    fn fallback_summary_counts_sections() {
        let minutes: GeneratedMinutes = serde_json::from_value(json!({
            "title": "t",
            "date": "d",
            "agenda": ["a", "b"],
            "keyDecisions": ["x"],
            "actionItems": []
        }))
        .expect("deserialize");

        assert_eq!(
            minutes.fallback_summary(),
            "Meeting covered 2 topics with 1 decisions and 0 action items."
        );
        assert!(minutes.extra.is_empty());
    }
}
