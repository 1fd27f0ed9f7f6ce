//! Confidence scoring for inferred template structures
//!
//! The weights are heuristic and tunable; they are kept stable so that scores
//! stay comparable across profiles.

use crate::models::TemplateStructure;

const BASE: f64 = 0.5;
const SECTIONS_FOUND: f64 = 0.2;
const FEATURE_FLAG: f64 = 0.1;
const FIELD_MAPPINGS_FOUND: f64 = 0.15;
const CUSTOM_FIELDS_FOUND: f64 = 0.1;
const LONG_SAMPLE_BONUS: f64 = 0.1;
const SHORT_SAMPLE_PENALTY: f64 = 0.2;

/// Samples longer than this many characters earn a bonus
pub const LONG_SAMPLE_CHARS: usize = 2000;
/// Samples shorter than this many characters are penalized
pub const SHORT_SAMPLE_CHARS: usize = 500;

/// Deterministic score in [0, 1] for a structure inferred from `content`.
pub fn calculate_confidence(structure: &TemplateStructure, content: &str) -> f64 {
    let mut confidence = BASE;

    if !structure.sections.is_empty() {
        confidence += SECTIONS_FOUND;
    }
    for flag in [
        structure.has_action_items,
        structure.has_attendees,
        structure.has_agenda,
    ] {
        if flag {
            confidence += FEATURE_FLAG;
        }
    }
    if !structure.field_mappings.is_empty() {
        confidence += FIELD_MAPPINGS_FOUND;
    }
    if !structure.custom_fields.is_empty() {
        confidence += CUSTOM_FIELDS_FOUND;
    }

    let length = content.chars().count();
    if length > LONG_SAMPLE_CHARS {
        confidence += LONG_SAMPLE_BONUS;
    } else if length < SHORT_SAMPLE_CHARS {
        confidence -= SHORT_SAMPLE_PENALTY;
    }

    confidence.clamp(0.0, 1.0)
}
