//! Rendering generated minutes for output

use serde_json::Value;
use std::fmt::Write;

use crate::models::GeneratedMinutes;
use crate::{MinutesError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Text,
    Json,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Some(Self::Markdown),
            "txt" | "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

pub fn render(minutes: &GeneratedMinutes, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Markdown => Ok(to_markdown(minutes)),
        ExportFormat::Text => Ok(to_text(minutes)),
        ExportFormat::Json => serde_json::to_string_pretty(minutes)
            .map_err(|e| MinutesError::Config(format!("Failed to serialize minutes: {}", e))),
    }
}

fn extra_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn markdown_list(out: &mut String, heading: &str, items: &[String]) {
    let _ = writeln!(out, "## {}\n", heading);
    if items.is_empty() {
        out.push_str("_None_\n\n");
        return;
    }
    for item in items {
        let _ = writeln!(out, "- {}", item);
    }
    out.push('\n');
}

pub fn to_markdown(minutes: &GeneratedMinutes) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", minutes.title);
    let _ = writeln!(out, "**Date:** {}", minutes.date);
    if let Some(duration) = &minutes.duration {
        let _ = writeln!(out, "**Duration:** {}", duration);
    }
    let _ = writeln!(
        out,
        "**Overview:** {} attendees, {} agenda items, {} decisions, {} action items\n",
        minutes.attendees.len(),
        minutes.agenda.len(),
        minutes.key_decisions.len(),
        minutes.action_items.len()
    );

    if let Some(summary) = &minutes.summary {
        let _ = writeln!(out, "## Summary\n\n{}\n", summary);
    }

    markdown_list(&mut out, "Attendees", &minutes.attendees);
    markdown_list(&mut out, "Agenda", &minutes.agenda);
    markdown_list(&mut out, "Key Decisions", &minutes.key_decisions);

    out.push_str("## Action Items\n\n");
    if minutes.action_items.is_empty() {
        out.push_str("_None_\n\n");
    } else {
        out.push_str("| Task | Assignee | Due |\n|------|----------|-----|\n");
        for item in &minutes.action_items {
            let _ = writeln!(
                out,
                "| {} | {} | {} |",
                item.task.replace('|', "\\|"),
                item.assignee.replace('|', "\\|"),
                item.due_date.replace('|', "\\|")
            );
        }
        out.push('\n');
    }

    markdown_list(&mut out, "Next Steps", &minutes.next_steps);

    for (key, value) in &minutes.extra {
        let _ = writeln!(out, "## {}\n\n{}\n", key, extra_value(value));
    }

    out.trim_end().to_string() + "\n"
}

pub fn to_text(minutes: &GeneratedMinutes) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", minutes.title);
    let _ = writeln!(out, "Date: {}", minutes.date);
    if let Some(duration) = &minutes.duration {
        let _ = writeln!(out, "Duration: {}", duration);
    }
    out.push_str("\n---\n\n");

    if let Some(summary) = &minutes.summary {
        let _ = writeln!(out, "{}\n", summary);
    }

    if minutes.is_blank() {
        out.push_str("(No attendees, topics, decisions or actions were extracted)\n");
    }

    let sections: [(&str, &[String]); 4] = [
        ("ATTENDEES", &minutes.attendees),
        ("AGENDA", &minutes.agenda),
        ("KEY DECISIONS", &minutes.key_decisions),
        ("NEXT STEPS", &minutes.next_steps),
    ];

    for (index, (heading, items)) in sections.iter().enumerate() {
        if !items.is_empty() {
            let _ = writeln!(out, "{}", heading);
            for (n, item) in items.iter().enumerate() {
                let _ = writeln!(out, "  {}. {}", n + 1, item);
            }
            out.push('\n');
        }

        // action items sit between decisions and next steps
        if index == 2 && !minutes.action_items.is_empty() {
            out.push_str("ACTION ITEMS\n");
            for item in &minutes.action_items {
                let _ = writeln!(
                    out,
                    "  - {} (owner: {}, due: {})",
                    item.task, item.assignee, item.due_date
                );
            }
            out.push('\n');
        }
    }

    for (key, value) in &minutes.extra {
        let _ = writeln!(out, "{}: {}", key.to_uppercase(), extra_value(value));
    }

    out.trim_end().to_string() + "\n"
}
