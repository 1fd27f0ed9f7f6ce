//! minutesmaster - Turn meeting transcripts into structured minutes
//!
//! Entry point for the minutesmaster CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use minutesmaster::cli::{Cli, Commands};
use minutesmaster::config::Settings;

fn init_logging(settings: &Settings, verbose: bool) {
    let fallback = if verbose {
        "debug"
    } else {
        settings.general.log_level.as_str()
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Completions { shell } => {
            minutesmaster::cli::completions::print(shell);
        }
        command => {
            // Load configuration only for runtime commands.
            let settings = Settings::load()?;
            init_logging(&settings, cli.verbose);

            match command {
                Commands::Generate {
                    transcript,
                    title,
                    context,
                    profile,
                    basic,
                    format,
                    output,
                } => {
                    minutesmaster::cli::commands::generate_minutes(
                        &settings,
                        &transcript,
                        title,
                        context,
                        profile,
                        basic,
                        &format,
                        output,
                    )
                    .await?;
                }
                Commands::Profile {
                    sample,
                    name,
                    output,
                } => {
                    minutesmaster::cli::commands::profile_sample(&settings, &sample, name, output)
                        .await?;
                }
                Commands::Export {
                    minutes,
                    format,
                    output,
                } => {
                    minutesmaster::cli::commands::export_minutes(&minutes, &format, output)?;
                }
                Commands::TestConnection => {
                    minutesmaster::cli::commands::test_connection(&settings).await?;
                }
                Commands::Models => {
                    minutesmaster::cli::commands::list_models(&settings).await?;
                }
                Commands::Config(config_cmd) => {
                    minutesmaster::cli::commands::config_command(&settings, config_cmd)?;
                }
                Commands::Completions { .. } => unreachable!(),
            }
        }
    }

    Ok(())
}
