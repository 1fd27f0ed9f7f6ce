//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// minutesmaster - Turn meeting transcripts into structured minutes
#[derive(Parser, Debug)]
#[command(name = "minutesmaster")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate minutes from a transcript
    Generate {
        /// Transcript file, or "-" to read stdin
        transcript: PathBuf,

        /// Meeting title passed to the model as a hint
        #[arg(short, long)]
        title: Option<String>,

        /// JSON file with dictionary, instructions and samples
        #[arg(short, long)]
        context: Option<PathBuf>,

        /// Template profile JSON produced by `profile`
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Ask only for the required fields (no summary or duration)
        #[arg(long)]
        basic: bool,

        /// Output format (markdown, txt, json)
        #[arg(short, long, default_value = "markdown")]
        format: String,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Infer a template profile from a sample minutes document
    Profile {
        /// Sample document (plain text or Markdown)
        sample: PathBuf,

        /// Sample name (defaults to the file name)
        #[arg(short, long)]
        name: Option<String>,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render previously generated minutes JSON in another format
    Export {
        /// Minutes JSON file
        minutes: PathBuf,

        /// Output format (markdown, txt, json)
        #[arg(short, long, default_value = "markdown")]
        format: String,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that the configured provider answers
    TestConnection,

    /// List models offered by the configured provider
    Models,

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
