//! CLI command implementations

use anyhow::{Context, Result};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

use crate::cli::args::ConfigCommand;
use crate::config::Settings;
use crate::export::{self, ExportFormat};
use crate::llm::{GenerationRequest, MinutesService, OutputContract, ProgressReporter};
use crate::models::{GeneratedMinutes, GenerationContext, SampleMinute, TemplateProfile};

/// Progress lines for interactive runs go to stderr
struct StderrProgress;

impl ProgressReporter for StderrProgress {
    fn report(&self, percent: u8, status: &str) {
        eprintln!("[{:>3}%] {}", percent, status);
    }
}

fn progress_reporter() -> Option<&'static dyn ProgressReporter> {
    if std::io::stderr().is_terminal() {
        Some(&StderrProgress)
    } else {
        None
    }
}

fn parse_format(format: &str) -> Result<ExportFormat> {
    ExportFormat::from_str(format).with_context(|| {
        format!(
            "Unsupported format: {}. Supported: markdown, txt, json",
            format
        )
    })
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read transcript from stdin")?;
        return Ok(buffer);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write_output(content: &str, output: Option<PathBuf>) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("Written to: {}", path.display());
    } else {
        print!("{}", content);
        if !content.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}

/// Generate minutes from a transcript file
#[allow(clippy::too_many_arguments)]
pub async fn generate_minutes(
    settings: &Settings,
    transcript: &Path,
    title: Option<String>,
    context: Option<PathBuf>,
    profile: Option<PathBuf>,
    basic: bool,
    format: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let format = parse_format(format)?;
    let transcript = read_input(transcript)?;

    let context = match context {
        Some(path) => GenerationContext::load(&path)?,
        None => GenerationContext::default(),
    };
    if !context.is_empty() {
        tracing::info!(
            dictionary = context.dictionary.len(),
            instructions = context.instructions.len(),
            samples = context.samples.len(),
            "Loaded reference context"
        );
    }
    let profile = profile
        .map(|path| TemplateProfile::load(&path))
        .transpose()?;

    if let Some(profile) = &profile {
        tracing::info!(
            "Using template profile '{}' ({}% confidence)",
            profile.name,
            profile.confidence_percent()
        );
    }

    let service = MinutesService::from_settings(settings)?;
    let request = GenerationRequest::new(&transcript)
        .with_context(&context)
        .with_template_profile(profile.as_ref())
        .with_meeting_title(title.as_deref())
        .with_contract(if basic {
            OutputContract::Basic
        } else {
            OutputContract::Detailed
        });

    let minutes = service
        .generate_minutes(request, progress_reporter())
        .await?;

    write_output(&export::render(&minutes, format)?, output)
}

/// Profile a sample document
pub async fn profile_sample(
    settings: &Settings,
    sample: &Path,
    name: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let content = read_input(sample)?;
    let name = name.unwrap_or_else(|| {
        sample
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sample".to_string())
    });
    let sample = SampleMinute::new(name, content);

    let service = MinutesService::from_settings(settings)?;
    let profile = service
        .profile_template(&sample, progress_reporter())
        .await
        .context("Template profiling failed")?;

    eprintln!(
        "{} (confidence: {}%)",
        profile.name,
        profile.confidence_percent()
    );
    write_output(&profile.to_json()?, output)
}

/// Re-render saved minutes
pub fn export_minutes(minutes: &Path, format: &str, output: Option<PathBuf>) -> Result<()> {
    let format = parse_format(format)?;
    let content = read_input(minutes)?;
    let minutes: GeneratedMinutes = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse minutes JSON: {}", minutes.display()))?;

    write_output(&export::render(&minutes, format)?, output)
}

/// Probe the configured provider
pub async fn test_connection(settings: &Settings) -> Result<()> {
    let service = MinutesService::from_settings(settings)?;
    let config = service.config();
    println!("Provider: {}", config.provider);
    println!("Endpoint: {}", crate::llm::chat_completions_url(&config));
    println!("Model: {}", config.model);

    let status = service.test_connection().await;
    if status.success {
        println!("{}", status.message);
        Ok(())
    } else {
        anyhow::bail!("Connection test failed: {}", status.message)
    }
}

/// List models offered by the provider
pub async fn list_models(settings: &Settings) -> Result<()> {
    let service = MinutesService::from_settings(settings)?;
    let models = service.list_models().await?;

    if models.is_empty() {
        println!("No models reported by {}", service.config().provider);
        return Ok(());
    }

    for model in models {
        println!("{}", model);
    }
    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let mut shown = settings.clone();
            if shown.api.has_api_key() {
                shown.api.api_key = "********".to_string();
            }
            let toml = toml::to_string_pretty(&shown)?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}
