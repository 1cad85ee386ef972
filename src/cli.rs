//! CLI interface for the resume tailor

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::OutputFormat;
use crate::processing::guardrail::GuardrailTerms;

#[derive(Parser)]
#[command(name = "resume-tailor")]
#[command(about = "Resume bullet extraction, rewrite planning and keyword guardrails")]
#[command(long_about = "Split a pasted resume into jobs and bullets, score bullets against a job posting, \
plan which bullets to rewrite with which keywords, and keep target-company terms out of every suggestion")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Terms that must never be suggested into or injected by a rewrite
#[derive(Args, Debug, Clone, Default)]
pub struct GuardrailArgs {
    /// Target company name
    #[arg(long)]
    pub company: Option<String>,

    /// Target product name (repeatable)
    #[arg(long = "product")]
    pub products: Vec<String>,

    /// Extra blocked term (repeatable)
    #[arg(long = "block")]
    pub blocked: Vec<String>,
}

impl GuardrailArgs {
    pub fn to_terms(&self) -> GuardrailTerms {
        GuardrailTerms {
            target_company: self.company.clone(),
            target_products: self.products.clone(),
            blocked_terms: self.blocked.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a resume against a job posting and build a rewrite plan
    Analyze {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job posting file (TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        #[command(flatten)]
        guardrail: GuardrailArgs,

        /// Comma-separated missing keywords from an external analyzer
        #[arg(long, value_delimiter = ',')]
        missing: Option<Vec<String>>,

        /// Match score reported alongside --missing (0-100)
        #[arg(long, requires = "missing")]
        match_score: Option<f32>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Score the verb strength of a single bullet
    Score {
        /// Bullet text
        bullet: String,
    },

    /// Split keywords into usable and blocked lists
    Sanitize {
        /// Candidate keywords
        #[arg(required = true)]
        keywords: Vec<String>,

        #[command(flatten)]
        guardrail: GuardrailArgs,
    },

    /// Check a rewritten bullet for guardrail injection and quality change
    Review {
        /// Original bullet text
        #[arg(long)]
        original: String,

        /// Rewritten bullet text
        #[arg(long, conflicts_with = "response", required_unless_present = "response")]
        rewritten: Option<String>,

        /// JSON response file from a rewrite generator
        #[arg(long)]
        response: Option<PathBuf>,

        #[command(flatten)]
        guardrail: GuardrailArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "plan.max_items")
        key: String,

        /// Configuration value
        value: String,
    },
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
