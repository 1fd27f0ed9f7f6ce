//! Reference inputs fed into prompt context

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{MinutesError, Result};

/// A custom term the minutes should use verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryEntry {
    #[serde(default)]
    pub id: String,
    pub term: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl DictionaryEntry {
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            term: term.into(),
            definition: definition.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Instruction priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort weight; higher comes first in prompt context
    pub fn weight(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }
}

/// A standing rule the user wants applied to every generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInstruction {
    #[serde(default)]
    pub id: String,
    pub title: String,
    /// Free-form label, e.g. "Style" or "Content"
    #[serde(default)]
    pub category: String,
    pub instruction: String,
    #[serde(default)]
    pub priority: Priority,
}

impl UserInstruction {
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        instruction: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            category: category.into(),
            instruction: instruction.into(),
            priority,
        }
    }
}

/// An example minutes document used as a style reference or profiling input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleMinute {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,
    /// Size of the content in bytes
    #[serde(default)]
    pub file_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

impl SampleMinute {
    /// Create a sample from raw text
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            file_size: content.len() as u64,
            content,
            tags: Vec::new(),
            date_added: Some(Utc::now()),
            meeting_type: None,
            organization: None,
        }
    }
}

/// Reference data bundled for one generation run.
///
/// Read from a JSON document with `dictionary`, `instructions` and `samples`
/// arrays; every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationContext {
    #[serde(default)]
    pub dictionary: Vec<DictionaryEntry>,
    #[serde(default)]
    pub instructions: Vec<UserInstruction>,
    #[serde(default)]
    pub samples: Vec<SampleMinute>,
}

impl GenerationContext {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            MinutesError::Config(format!(
                "Failed to parse context file {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.dictionary.is_empty() && self.instructions.is_empty() && self.samples.is_empty()
    }
}
