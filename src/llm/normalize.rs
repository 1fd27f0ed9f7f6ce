//! Turning raw model text into validated values
//!
//! Cosmetic deviations (wrong container types, aliased keys, missing optional
//! fields) are repaired. Structural ones (unparseable JSON, missing required
//! keys) are errors.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::models::{
    ActionItem, GeneratedMinutes, TemplateFormat, TemplateProfile, TemplateStructure,
    NO_DUE_DATE, UNASSIGNED,
};
use crate::{MinutesError, Result};

/// Keys every minutes reply must carry
pub const REQUIRED_MINUTES_FIELDS: [&str; 7] = [
    "title",
    "date",
    "attendees",
    "agenda",
    "keyDecisions",
    "actionItems",
    "nextSteps",
];

/// Keys every template analysis reply must carry
pub const REQUIRED_ANALYSIS_FIELDS: [&str; 8] = [
    "sections",
    "fieldMappings",
    "format",
    "hasActionItems",
    "hasAttendees",
    "hasAgenda",
    "customFields",
    "analysis",
];

const STANDARD_KEYS: [&str; 9] = [
    "title",
    "date",
    "attendees",
    "agenda",
    "keyDecisions",
    "actionItems",
    "nextSteps",
    "summary",
    "duration",
];

pub const NOT_SPECIFIED: &str = "Not specified";

const UNDEFINED_TASK: &str = "Undefined task";
const DEFAULT_ANALYSIS: &str = "Template analysis completed";

/// Accepted key spellings for one action item field
#[derive(Debug, Clone, Copy)]
pub struct FieldAliases {
    pub keys: &'static [&'static str],
    pub fallback: &'static str,
}

/// Alias table for action item records, in lookup order
pub const TASK_ALIASES: FieldAliases = FieldAliases {
    keys: &["task", "description", "action"],
    fallback: UNDEFINED_TASK,
};

pub const ASSIGNEE_ALIASES: FieldAliases = FieldAliases {
    keys: &["assignee", "owner", "responsible"],
    fallback: UNASSIGNED,
};

pub const DUE_DATE_ALIASES: FieldAliases = FieldAliases {
    keys: &["dueDate", "deadline", "due"],
    fallback: NO_DUE_DATE,
};

impl FieldAliases {
    /// First truthy alias, stringified; the fallback otherwise.
    pub fn resolve(&self, record: &Map<String, Value>) -> String {
        self.keys
            .iter()
            .filter_map(|key| record.get(*key))
            .find(|value| is_truthy(value))
            .map(coerce_string)
            .unwrap_or_else(|| self.fallback.to_string())
    }
}

/// Shapes an action item arrives in
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawActionItem {
    Text(String),
    Record(Map<String, Value>),
    Other(Value),
}

impl RawActionItem {
    pub fn normalize(self) -> ActionItem {
        match self {
            Self::Text(task) => ActionItem::unassigned(task),
            Self::Record(record) => ActionItem {
                task: TASK_ALIASES.resolve(&record),
                assignee: ASSIGNEE_ALIASES.resolve(&record),
                due_date: DUE_DATE_ALIASES.resolve(&record),
            },
            Self::Other(_) => ActionItem::unassigned(UNDEFINED_TASK),
        }
    }
}

/// Remove a surrounding Markdown code fence, with or without a language tag.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // drop an info string such as `json`
    let tag_len = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    let body = &rest[tag_len..];
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim()
}

/// Parse model text as a JSON object.
pub fn parse_json_object(raw: &str) -> Result<Map<String, Value>> {
    let cleaned = strip_code_fences(raw);
    let value: Value =
        serde_json::from_str(cleaned).map_err(|e| MinutesError::InvalidJson(e.to_string()))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(MinutesError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            json_type(&other)
        ))),
    }
}

/// JavaScript-style truthiness of a JSON value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Stringify a scalar; containers become compact JSON.
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Array elements as strings; nulls are dropped and non-arrays become empty.
pub fn coerce_string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(coerce_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Rename template-named keys back to their standard names.
///
/// Applies only when the template key is set and the standard key is not.
pub fn apply_field_mappings(parsed: &mut Map<String, Value>, mappings: &BTreeMap<String, String>) {
    for (standard, template) in mappings {
        if standard == template {
            continue;
        }
        let template_set = parsed.get(template).is_some_and(is_truthy);
        let standard_set = parsed.get(standard).is_some_and(is_truthy);
        if template_set && !standard_set {
            if let Some(value) = parsed.remove(template) {
                parsed.insert(standard.clone(), value);
            }
        }
    }
}

fn action_items(value: Option<Value>) -> Vec<ActionItem> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| {
                serde_json::from_value::<RawActionItem>(item)
                    .map(RawActionItem::normalize)
                    .unwrap_or_else(|_| ActionItem::unassigned(UNDEFINED_TASK))
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn optional_text(value: Option<Value>) -> Option<String> {
    value.filter(is_truthy).map(|v| coerce_string(&v))
}

/// Normalize a minutes reply.
pub fn normalize_minutes(raw: &str, template: Option<&TemplateProfile>) -> Result<GeneratedMinutes> {
    let mut parsed = parse_json_object(raw)?;

    if let Some(profile) = template {
        apply_field_mappings(&mut parsed, &profile.structure.field_mappings);
    }

    if let Some(missing) = REQUIRED_MINUTES_FIELDS
        .iter()
        .find(|field| !parsed.contains_key(**field))
    {
        return Err(MinutesError::MissingField(missing.to_string()));
    }

    let mut minutes = GeneratedMinutes {
        title: parsed.remove("title").map(|v| coerce_string(&v)).unwrap_or_default(),
        date: parsed.remove("date").map(|v| coerce_string(&v)).unwrap_or_default(),
        attendees: coerce_string_list(parsed.get("attendees")),
        agenda: coerce_string_list(parsed.get("agenda")),
        key_decisions: coerce_string_list(parsed.get("keyDecisions")),
        action_items: action_items(parsed.remove("actionItems")),
        next_steps: coerce_string_list(parsed.get("nextSteps")),
        summary: optional_text(parsed.remove("summary")),
        duration: optional_text(parsed.remove("duration")),
        extra: Map::new(),
    };

    for key in STANDARD_KEYS {
        parsed.remove(key);
    }
    minutes.extra = parsed;

    if minutes.summary.is_none() {
        minutes.summary = Some(minutes.fallback_summary());
    }
    if minutes.duration.is_none() {
        minutes.duration = Some(NOT_SPECIFIED.to_string());
    }

    Ok(minutes)
}

/// Normalize a template analysis reply.
pub fn normalize_template_analysis(raw: &str) -> Result<TemplateStructure> {
    let parsed = parse_json_object(raw)?;

    if let Some(missing) = REQUIRED_ANALYSIS_FIELDS
        .iter()
        .find(|field| !parsed.contains_key(**field))
    {
        return Err(MinutesError::MissingField(missing.to_string()));
    }

    let field_mappings = match parsed.get("fieldMappings") {
        Some(Value::Object(map)) => map
            .iter()
            .filter(|(_, value)| is_truthy(value))
            .map(|(standard, template)| (standard.clone(), coerce_string(template)))
            .collect(),
        _ => BTreeMap::new(),
    };

    let format = parsed
        .get("format")
        .and_then(Value::as_str)
        .and_then(TemplateFormat::from_str)
        .unwrap_or_default();

    let flag = |key: &str| parsed.get(key).is_some_and(is_truthy);

    let analysis = parsed
        .get("analysis")
        .filter(|value| is_truthy(value))
        .map(coerce_string)
        .unwrap_or_else(|| DEFAULT_ANALYSIS.to_string());

    Ok(TemplateStructure {
        sections: coerce_string_list(parsed.get("sections")),
        field_mappings,
        format,
        has_action_items: flag("hasActionItems"),
        has_attendees: flag("hasAttendees"),
        has_agenda: flag("hasAgenda"),
        custom_fields: coerce_string_list(parsed.get("customFields")),
        analysis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn complete_reply() -> Value {
        json!({
            "title": "Test Meeting",
            "date": "2025-01-11",
            "attendees": ["John", "Sarah"],
            "agenda": ["Project Update"],
            "keyDecisions": ["Approved budget"],
            "actionItems": [{"task": "Review proposal", "assignee": "John", "dueDate": "2025-01-15"}],
            "nextSteps": ["Follow up next week"],
            "summary": "Productive meeting about project progress",
            "duration": "30 minutes"
        })
    }

    #[test]
    fn strips_json_and_bare_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  ```\n{\"a\":1}\n```  "), "{\"a\":1}");
        assert_eq!(strip_code_fences("```{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn well_formed_reply_passes_through_unchanged() {
        let reply = complete_reply();
        let minutes = normalize_minutes(&reply.to_string(), None).expect("normalize");

        assert_eq!(serde_json::to_value(&minutes).expect("encode"), reply);
    }

    #[test]
    fn fenced_reply_is_accepted() {
        let raw = format!("```json\n{}\n```", complete_reply());
        let minutes = normalize_minutes(&raw, None).expect("normalize");
        assert_eq!(minutes.title, "Test Meeting");
    }

    #[test]
    fn non_array_lists_become_empty() {
        let mut reply = complete_reply();
        reply["attendees"] = json!("not an array");
        reply["nextSteps"] = json!(null);
        reply["actionItems"] = json!({"task": "x"});

        let minutes = normalize_minutes(&reply.to_string(), None).expect("normalize");
        assert!(minutes.attendees.is_empty());
        assert!(minutes.next_steps.is_empty());
        assert!(minutes.action_items.is_empty());
    }

    #[test]
    fn missing_required_field_is_named() {
        let mut reply = complete_reply();
        reply.as_object_mut().expect("object").remove("title");

        match normalize_minutes(&reply.to_string(), None) {
            Err(MinutesError::MissingField(field)) => assert_eq!(field, "title"),
            other => panic!("expected missing title, got {:?}", other),
        }
    }

    #[test]
    fn invalid_json_is_reported_as_such() {
        let err = normalize_minutes("Invalid JSON { this is not valid }", None).unwrap_err();
        assert!(matches!(err, MinutesError::InvalidJson(_)));
        assert!(err.to_string().starts_with("AI returned invalid JSON format"));
    }

    #[test]
    fn non_object_json_is_malformed() {
        let err = normalize_minutes("[1, 2, 3]", None).unwrap_err();
        assert!(matches!(err, MinutesError::MalformedResponse(_)));
    }

    #[test]
    fn action_item_aliases_are_resolved() {
        let item: RawActionItem =
            serde_json::from_value(json!({"description": "x", "owner": "y", "deadline": "z"}))
                .expect("record");
        assert_eq!(
            item.normalize(),
            ActionItem {
                task: "x".to_string(),
                assignee: "y".to_string(),
                due_date: "z".to_string(),
            }
        );

        let item: RawActionItem = serde_json::from_value(json!("do the thing")).expect("text");
        assert_eq!(item.normalize(), ActionItem::unassigned("do the thing"));
    }

    #[test]
    fn action_item_values_are_stringified_and_defaulted() {
        let mut reply = complete_reply();
        reply["actionItems"] = json!([
            {"action": "Call vendor", "responsible": "", "due": 15},
            {"task": "", "description": "Fallback text"},
            42,
            null
        ]);

        let minutes = normalize_minutes(&reply.to_string(), None).expect("normalize");
        assert_eq!(
            minutes.action_items,
            vec![
                ActionItem {
                    task: "Call vendor".to_string(),
                    assignee: "Unassigned".to_string(),
                    due_date: "15".to_string(),
                },
                ActionItem {
                    task: "Fallback text".to_string(),
                    assignee: "Unassigned".to_string(),
                    due_date: "TBD".to_string(),
                },
                ActionItem::unassigned("Undefined task"),
                ActionItem::unassigned("Undefined task"),
            ]
        );
    }

    #[test]
    fn missing_summary_and_duration_are_filled() {
        let mut reply = complete_reply();
        let object = reply.as_object_mut().expect("object");
        object.remove("summary");
        object.insert("duration".to_string(), json!(""));

        let minutes = normalize_minutes(&reply.to_string(), None).expect("normalize");
        assert_eq!(
            minutes.summary.as_deref(),
            Some("Meeting covered 1 topics with 1 decisions and 1 action items.")
        );
        assert_eq!(minutes.duration.as_deref(), Some(NOT_SPECIFIED));
    }

    #[test]
    fn template_names_are_mapped_back_and_custom_fields_kept() {
        let mut structure = TemplateStructure::default();
        structure
            .field_mappings
            .insert("keyDecisions".to_string(), "resolutions".to_string());
        structure
            .field_mappings
            .insert("attendees".to_string(), "present".to_string());
        structure.custom_fields = vec!["quorum".to_string()];
        let profile = TemplateProfile::new("Board", structure, 0.9);

        let reply = json!({
            "title": "Board",
            "date": "2025-02-01",
            "present": ["Ann", "Bo"],
            "attendees": ["Already set"],
            "agenda": [],
            "resolutions": ["Adopt budget"],
            "actionItems": [],
            "nextSteps": [],
            "quorum": "Yes"
        });

        let minutes = normalize_minutes(&reply.to_string(), Some(&profile)).expect("normalize");
        assert_eq!(minutes.key_decisions, vec!["Adopt budget".to_string()]);
        // standard key already present, template key left alone
        assert_eq!(minutes.attendees, vec!["Already set".to_string()]);
        assert_eq!(minutes.extra.get("present"), Some(&json!(["Ann", "Bo"])));
        assert_eq!(minutes.extra.get("quorum"), Some(&json!("Yes")));
        assert!(minutes.extra.get("resolutions").is_none());
    }

    #[test]
    fn mapping_runs_before_required_field_check() {
        let mut structure = TemplateStructure::default();
        structure
            .field_mappings
            .insert("nextSteps".to_string(), "followUps".to_string());
        let profile = TemplateProfile::new("Ops", structure, 0.6);

        let reply = json!({
            "title": "Ops", "date": "2025-02-01", "attendees": [], "agenda": [],
            "keyDecisions": [], "actionItems": [], "followUps": ["Check logs"]
        });

        let minutes = normalize_minutes(&reply.to_string(), Some(&profile)).expect("normalize");
        assert_eq!(minutes.next_steps, vec!["Check logs".to_string()]);
    }

    #[test]
    fn template_analysis_is_coerced() {
        let reply = json!({
            "sections": ["Attendance", "Resolutions"],
            "fieldMappings": {"keyDecisions": "resolutions", "agenda": null},
            "format": "tabular",
            "hasActionItems": 1,
            "hasAttendees": "yes",
            "hasAgenda": false,
            "customFields": "quorum",
            "analysis": ""
        });

        let structure = normalize_template_analysis(&reply.to_string()).expect("normalize");
        assert_eq!(structure.sections, vec!["Attendance", "Resolutions"]);
        assert_eq!(structure.field_mappings.len(), 1);
        assert_eq!(structure.format, TemplateFormat::Structured);
        assert!(structure.has_action_items);
        assert!(structure.has_attendees);
        assert!(!structure.has_agenda);
        assert!(structure.custom_fields.is_empty());
        assert_eq!(structure.analysis, "Template analysis completed");
    }

    #[test]
    fn template_analysis_requires_every_key() {
        let reply = json!({"sections": [], "format": "narrative"});
        match normalize_template_analysis(&reply.to_string()) {
            Err(MinutesError::MissingField(field)) => assert_eq!(field, "fieldMappings"),
            other => panic!("expected missing field, got {:?}", other),
        }
    }
}
