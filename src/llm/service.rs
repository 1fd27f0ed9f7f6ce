//! Minutes generation and template profiling
//!
//! Each call takes one snapshot of the [`ApiConfig`] at entry and makes at most
//! one network round trip. Calls are independent of each other: the service does
//! not serialize or de-duplicate overlapping requests.

use std::sync::{Arc, RwLock};

use crate::config::{ApiConfig, Settings};
use crate::llm::client::{HttpTransport, ReqwestTransport};
use crate::llm::normalize::{normalize_minutes, normalize_template_analysis};
use crate::llm::openai::ChatClient;
use crate::llm::profiler::calculate_confidence;
use crate::llm::prompts::{
    build_context, build_minutes_prompt, build_template_analysis_prompt, OutputContract,
    PromptInput, CONNECTION_TEST_PROMPT,
};
use crate::models::{
    DictionaryEntry, GeneratedMinutes, GenerationContext, SampleMinute, TemplateProfile,
    UserInstruction,
};
use crate::{MinutesError, Result};

/// Receives coarse progress updates (0-100) with a short status line.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, percent: u8, status: &str);
}

impl<F> ProgressReporter for F
where
    F: Fn(u8, &str) + Send + Sync,
{
    fn report(&self, percent: u8, status: &str) {
        self(percent, status)
    }
}

fn report(progress: Option<&dyn ProgressReporter>, percent: u8, status: &str) {
    if let Some(progress) = progress {
        progress.report(percent, status);
    }
}

/// Inputs for one minutes generation
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub transcript: &'a str,
    pub dictionary: &'a [DictionaryEntry],
    pub instructions: &'a [UserInstruction],
    pub samples: &'a [SampleMinute],
    pub template_profile: Option<&'a TemplateProfile>,
    pub meeting_title: Option<&'a str>,
    pub contract: OutputContract,
}

impl<'a> GenerationRequest<'a> {
    pub fn new(transcript: &'a str) -> Self {
        Self {
            transcript,
            dictionary: &[],
            instructions: &[],
            samples: &[],
            template_profile: None,
            meeting_title: None,
            contract: OutputContract::default(),
        }
    }

    pub fn with_context(mut self, context: &'a GenerationContext) -> Self {
        self.dictionary = &context.dictionary;
        self.instructions = &context.instructions;
        self.samples = &context.samples;
        self
    }

    pub fn with_template_profile(mut self, profile: Option<&'a TemplateProfile>) -> Self {
        self.template_profile = profile;
        self
    }

    pub fn with_meeting_title(mut self, title: Option<&'a str>) -> Self {
        self.meeting_title = title;
        self
    }

    pub fn with_contract(mut self, contract: OutputContract) -> Self {
        self.contract = contract;
        self
    }
}

/// Outcome of a connection probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub success: bool,
    pub message: String,
}

pub struct MinutesService {
    config: RwLock<Arc<ApiConfig>>,
    client: ChatClient,
}

impl MinutesService {
    pub fn new(config: ApiConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config: RwLock::new(Arc::new(config)),
            client: ChatClient::new(transport),
        }
    }

    /// Build a service backed by a `reqwest` client from runtime settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let transport = ReqwestTransport::new(settings.http.timeout())?;
        Ok(Self::new(settings.api.clone(), Arc::new(transport)))
    }

    /// Current configuration snapshot
    pub fn config(&self) -> Arc<ApiConfig> {
        match self.config.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replace the configuration. Calls already running keep their snapshot.
    pub fn update_config(&self, config: ApiConfig) {
        let config = Arc::new(config);
        match self.config.write() {
            Ok(mut guard) => *guard = config,
            Err(poisoned) => *poisoned.into_inner() = config,
        }
        tracing::debug!("API configuration replaced");
    }

    fn require_api_key(config: &ApiConfig, message: &str) -> Result<()> {
        if config.has_api_key() {
            Ok(())
        } else {
            Err(MinutesError::InputValidation(message.to_string()))
        }
    }

    /// Generate minutes from a transcript.
    ///
    /// Input problems are reported before any request is made. On failure after
    /// that point, progress is reset to 0 before the error is returned.
    pub async fn generate_minutes(
        &self,
        request: GenerationRequest<'_>,
        progress: Option<&dyn ProgressReporter>,
    ) -> Result<GeneratedMinutes> {
        let config = self.config();

        if request.transcript.trim().is_empty() {
            return Err(MinutesError::InputValidation(
                "Transcript cannot be empty".to_string(),
            ));
        }
        Self::require_api_key(&config, "API key is required")?;

        report(progress, 10, "Preparing context...");
        let context = build_context(
            request.dictionary,
            request.instructions,
            request.samples,
            request.template_profile,
        );

        report(progress, 30, "Structuring prompt...");
        let prompt = build_minutes_prompt(PromptInput {
            transcript: request.transcript,
            context: &context,
            meeting_title: request.meeting_title,
            template: request.template_profile,
            contract: request.contract,
        });

        report(progress, 50, "Sending to AI...");
        let result = match self.client.complete(&config, &prompt).await {
            Ok(reply) => {
                report(progress, 80, "Processing response...");
                normalize_minutes(&reply, request.template_profile)
            }
            Err(err) => Err(err),
        };

        match result {
            Ok(minutes) => {
                report(progress, 100, "Complete!");
                tracing::info!(
                    attendees = minutes.attendees.len(),
                    action_items = minutes.action_items.len(),
                    "Minutes generated"
                );
                Ok(minutes)
            }
            Err(err) => {
                report(progress, 0, "Failed");
                Err(err)
            }
        }
    }

    /// Infer a template profile from one sample document.
    pub async fn profile_template(
        &self,
        sample: &SampleMinute,
        progress: Option<&dyn ProgressReporter>,
    ) -> Result<TemplateProfile> {
        let config = self.config();

        if sample.content.trim().is_empty() {
            return Err(MinutesError::InputValidation(
                "Sample content cannot be empty".to_string(),
            ));
        }
        Self::require_api_key(&config, "API key is required for template profiling")?;

        report(progress, 10, "Preparing analysis...");
        let prompt = build_template_analysis_prompt(&sample.content);

        report(progress, 30, "Analyzing template structure...");
        report(progress, 50, "Sending to AI...");
        let result = match self.client.complete(&config, &prompt).await {
            Ok(reply) => {
                report(progress, 80, "Creating profile...");
                normalize_template_analysis(&reply)
            }
            Err(err) => Err(err),
        };

        match result {
            Ok(structure) => {
                let confidence = calculate_confidence(&structure, &sample.content);
                let profile = TemplateProfile::new(&sample.name, structure, confidence);
                report(progress, 100, "Profile complete!");
                tracing::info!(
                    profile = %profile.name,
                    confidence = profile.confidence,
                    sections = profile.structure.sections.len(),
                    "Template profiled"
                );
                Ok(profile)
            }
            Err(err) => {
                report(progress, 0, "Failed to profile template");
                Err(err)
            }
        }
    }

    /// Probe the provider with a trivial prompt. Never returns an error.
    pub async fn test_connection(&self) -> ConnectionStatus {
        let config = self.config();

        if !config.has_api_key() {
            return ConnectionStatus {
                success: false,
                message: "API key is required".to_string(),
            };
        }

        match self.client.complete(&config, CONNECTION_TEST_PROMPT).await {
            Ok(reply) if reply.to_lowercase().contains("connection successful") => {
                ConnectionStatus {
                    success: true,
                    message: "API connection successful".to_string(),
                }
            }
            Ok(_) => ConnectionStatus {
                success: false,
                message: "Unexpected response from API".to_string(),
            },
            Err(err) => ConnectionStatus {
                success: false,
                message: err.to_string(),
            },
        }
    }

    /// Model ids offered by the configured provider.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let config = self.config();
        Self::require_api_key(&config, "API key is required")?;
        self.client.list_models(&config).await
    }
}
