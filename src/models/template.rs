//! Inferred template structure and profiles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::{MinutesError, Result};

/// Overall layout of a minutes document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateFormat {
    #[default]
    Structured,
    Narrative,
    Mixed,
}

impl TemplateFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::Narrative => "narrative",
            Self::Mixed => "mixed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "structured" => Some(Self::Structured),
            "narrative" => Some(Self::Narrative),
            "mixed" => Some(Self::Mixed),
            _ => None,
        }
    }
}

impl fmt::Display for TemplateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structure inferred from a sample document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateStructure {
    /// Section headings in document order
    #[serde(default)]
    pub sections: Vec<String>,

    /// Standard field name -> name used by the template
    #[serde(default)]
    pub field_mappings: BTreeMap<String, String>,

    #[serde(default)]
    pub format: TemplateFormat,

    #[serde(default)]
    pub has_action_items: bool,

    #[serde(default)]
    pub has_attendees: bool,

    #[serde(default)]
    pub has_agenda: bool,

    #[serde(default)]
    pub custom_fields: Vec<String>,

    #[serde(default)]
    pub analysis: String,
}

/// A profiled template ready to steer later generations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateProfile {
    pub id: String,
    pub name: String,
    pub structure: TemplateStructure,
    /// Heuristic score in [0, 1]
    pub confidence: f64,
    pub analysis: String,
    pub created_at: DateTime<Utc>,
}

impl TemplateProfile {
    pub fn new(sample_name: &str, structure: TemplateStructure, confidence: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: format!("Profile for {}", sample_name),
            analysis: structure.analysis.clone(),
            structure,
            confidence,
            created_at: Utc::now(),
        }
    }

    /// Confidence as a whole percentage
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            MinutesError::Config(format!(
                "Failed to parse template profile {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MinutesError::Config(format!("Failed to serialize profile: {}", e)))
    }
}
