//! Prompt context assembly and prompt composition

use std::fmt::Write;

use crate::models::{DictionaryEntry, SampleMinute, TemplateProfile, UserInstruction};

/// System message sent with every chat request
pub const SYSTEM_PROMPT: &str =
    "You are a professional meeting minutes generator. Always return valid JSON in the specified format.";

/// At most this many style samples are quoted
pub const MAX_STYLE_SAMPLES: usize = 3;

/// Characters quoted from each style sample
pub const SAMPLE_PREVIEW_CHARS: usize = 800;

const SAMPLE_DIVIDER: &str = "\n---\n";

/// Context blocks derived from the user's reference data.
///
/// Each block is `None` when its input was empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptContext {
    pub template: Option<String>,
    pub dictionary: Option<String>,
    pub instructions: Option<String>,
    pub samples: Option<String>,
}

impl PromptContext {
    pub fn is_empty(&self) -> bool {
        self.blocks().next().is_none()
    }

    fn blocks(&self) -> impl Iterator<Item = &str> {
        [
            &self.template,
            &self.dictionary,
            &self.instructions,
            &self.samples,
        ]
        .into_iter()
        .filter_map(|block| block.as_deref())
    }

    /// All blocks joined in a fixed order
    pub fn render(&self) -> String {
        self.blocks().collect::<Vec<_>>().join("\n\n")
    }
}

/// Build prompt context from reference data. Never fails.
pub fn build_context(
    dictionary: &[DictionaryEntry],
    instructions: &[UserInstruction],
    samples: &[SampleMinute],
    template: Option<&TemplateProfile>,
) -> PromptContext {
    PromptContext {
        template: template.map(template_block),
        dictionary: dictionary_block(dictionary),
        instructions: instructions_block(instructions),
        samples: samples_block(samples),
    }
}

fn dictionary_block(dictionary: &[DictionaryEntry]) -> Option<String> {
    if dictionary.is_empty() {
        return None;
    }

    let mut block = String::from(
        "## Custom Terminology\nUse these specific terms and definitions in the minutes:",
    );
    for entry in dictionary {
        let _ = write!(block, "\n- {}: {}", entry.term, entry.definition);
        if let Some(context) = entry.context.as_deref().filter(|c| !c.trim().is_empty()) {
            let _ = write!(block, " ({})", context);
        }
    }
    Some(block)
}

/// Instructions ordered high -> medium -> low; ties keep their input order.
pub fn sort_instructions(instructions: &[UserInstruction]) -> Vec<&UserInstruction> {
    let mut sorted: Vec<&UserInstruction> = instructions.iter().collect();
    sorted.sort_by_key(|inst| std::cmp::Reverse(inst.priority.weight()));
    sorted
}

fn instructions_block(instructions: &[UserInstruction]) -> Option<String> {
    if instructions.is_empty() {
        return None;
    }

    let mut block = String::from(
        "## User Instructions\nFollow these specific rules when generating minutes:",
    );
    for inst in sort_instructions(instructions) {
        let _ = write!(
            block,
            "\n- [{}] {}: {}",
            inst.category, inst.title, inst.instruction
        );
    }
    Some(block)
}

/// First `SAMPLE_PREVIEW_CHARS` characters, with "..." when cut.
pub fn sample_preview(content: &str) -> String {
    match content.char_indices().nth(SAMPLE_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

fn samples_block(samples: &[SampleMinute]) -> Option<String> {
    if samples.is_empty() {
        return None;
    }

    let quoted = samples
        .iter()
        .take(MAX_STYLE_SAMPLES)
        .enumerate()
        .map(|(index, sample)| {
            format!(
                "### Sample {}: {}\n{}",
                index + 1,
                sample.name,
                sample_preview(&sample.content)
            )
        })
        .collect::<Vec<_>>()
        .join(SAMPLE_DIVIDER);

    Some(format!(
        "## Style Guidelines from Sample Library\nMatch the tone, structure, and formatting style of these examples:\n\n{}",
        quoted
    ))
}

fn template_block(profile: &TemplateProfile) -> String {
    let structure = &profile.structure;
    let mut block = format!(
        "## Template Structure Guidelines\nFollow this specific template structure (confidence: {}%):\n- Format Type: {}\n- Required Sections: {}",
        profile.confidence_percent(),
        structure.format,
        structure.sections.join(", ")
    );

    if !structure.field_mappings.is_empty() {
        block.push_str("\n- Field Mappings:");
        for (standard, template) in &structure.field_mappings {
            let _ = write!(block, "\n  - {} → {}", standard, template);
        }
    }

    if !structure.custom_fields.is_empty() {
        let _ = write!(
            block,
            "\n- Custom Fields: {}",
            structure.custom_fields.join(", ")
        );
    }

    let _ = write!(block, "\n\nTemplate Analysis: {}", profile.analysis);
    block
}

/// Which JSON fields the model is asked for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputContract {
    /// The seven required fields only
    Basic,
    /// Required fields plus summary and duration
    #[default]
    Detailed,
}

fn output_format(contract: OutputContract, template: Option<&TemplateProfile>) -> String {
    let mut format = String::from(
        "Return a valid JSON object with these exact fields:\n\
- \"title\": Meeting title/subject (string)\n\
- \"date\": Meeting date in YYYY-MM-DD format (string)\n\
- \"attendees\": Array of participant names extracted from transcript (string[])\n\
- \"agenda\": Array of main topics discussed (string[])\n\
- \"keyDecisions\": Array of important decisions made (string[])\n\
- \"actionItems\": Array of objects with \"task\", \"assignee\", and \"dueDate\" fields\n\
- \"nextSteps\": Array of follow-up items (string[])",
    );

    if contract == OutputContract::Detailed {
        format.push_str(
            "\n- \"summary\": Brief 2-3 sentence summary of the meeting (string)\n\
- \"duration\": Estimated meeting duration if determinable (string)",
        );
    }

    if let Some(profile) = template {
        let structure = &profile.structure;
        let _ = write!(
            format,
            "\n\n## IMPORTANT: Template Structure Requirements\n- Follow the template format: {}\n- Include these sections in order: {}",
            structure.format,
            structure.sections.join(", ")
        );

        if !structure.custom_fields.is_empty() {
            let _ = write!(
                format,
                "\n- Include custom fields: {}",
                structure.custom_fields.join(", ")
            );
        }

        if !structure.field_mappings.is_empty() {
            format.push_str("\n- Use these field names instead of defaults:");
            for (standard, template) in &structure.field_mappings {
                let _ = write!(format, "\n  - {} should be named \"{}\"", standard, template);
            }
        }
    }

    format
}

/// Everything the composer needs for one minutes prompt
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub transcript: &'a str,
    pub context: &'a PromptContext,
    pub meeting_title: Option<&'a str>,
    pub template: Option<&'a TemplateProfile>,
    pub contract: OutputContract,
}

/// Compose the minutes-generation prompt.
pub fn build_minutes_prompt(input: PromptInput<'_>) -> String {
    let mut guidelines = String::from(
        "1. **Accuracy**: Only include information explicitly mentioned in the transcript\n\
2. **Professional Tone**: Use formal business language appropriate for documentation\n\
3. **Clarity**: Make decisions and action items specific and actionable\n\
4. **Organization**: Group related topics logically\n\
5. **Completeness**: Capture all significant discussions and outcomes",
    );
    if input.template.is_some() {
        guidelines.push_str(
            "\n6. **Template Compliance**: Strictly follow the analyzed template structure and format",
        );
    }

    let mut meeting_context = String::new();
    if let Some(title) = input.meeting_title.map(str::trim).filter(|t| !t.is_empty()) {
        let _ = writeln!(meeting_context, "Meeting Title: {}", title);
    }
    if !input.context.is_empty() {
        if !meeting_context.is_empty() {
            meeting_context.push('\n');
        }
        meeting_context.push_str(&input.context.render());
    }

    format!(
        "You are an expert meeting minutes generator. Transform the following transcript into professional, well-structured meeting minutes.\n\
\n\
## Output Requirements\n\
{output}\n\
\n\
## Generation Guidelines\n\
{guidelines}\n\
\n\
## Meeting Context\n\
{meeting_context}\n\
\n\
## Transcript to Process\n\
{transcript}\n\
\n\
Generate professional meeting minutes following the above requirements and return only the JSON object:",
        output = output_format(input.contract, input.template),
        transcript = input.transcript.trim(),
    )
}

/// Prompt asking the model to describe a sample document's structure.
pub fn build_template_analysis_prompt(sample_content: &str) -> String {
    format!(
        "Analyze the following meeting minutes sample to understand its structure and format. Provide a comprehensive template profile.\n\
\n\
## Analysis Requirements\n\
Return a valid JSON object with these exact fields:\n\
- \"sections\": Array of main section headings found (string[])\n\
- \"fieldMappings\": Object mapping standard fields (title, date, attendees, agenda, keyDecisions, actionItems, nextSteps) to the names this template uses (object)\n\
- \"format\": Overall format type - \"structured\", \"narrative\", or \"mixed\" (string)\n\
- \"hasActionItems\": Boolean indicating if action items are present\n\
- \"hasAttendees\": Boolean indicating if attendee list is present\n\
- \"hasAgenda\": Boolean indicating if agenda items are present\n\
- \"customFields\": Array of unique/custom fields specific to this template (string[])\n\
- \"analysis\": Detailed text analysis of the template characteristics (string)\n\
\n\
## Sample to Analyze:\n\
{sample_content}\n\
\n\
Return only the JSON analysis object:"
    )
}

/// Probe prompt for connection tests
pub const CONNECTION_TEST_PROMPT: &str =
    "Test connection with these instructions: Test connection. Please respond with exactly: \"Connection successful\"";
