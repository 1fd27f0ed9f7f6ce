//! Data model for minutesmaster
//!
//! Reference inputs (terminology, instructions, samples), inferred template
//! profiles, and the generated minutes themselves.

mod context;
mod minutes;
mod template;

pub use context::{DictionaryEntry, GenerationContext, Priority, SampleMinute, UserInstruction};
pub use minutes::{ActionItem, GeneratedMinutes, NO_DUE_DATE, UNASSIGNED};
pub use template::{TemplateFormat, TemplateProfile, TemplateStructure};
