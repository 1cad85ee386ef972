//! Resume tailor: bullet extraction, rewrite planning and keyword guardrails

use clap::Parser;
use log::{error, info, warn};
use resume_tailor::cli::{self, Cli, Commands, ConfigAction};
use resume_tailor::config::Config;
use resume_tailor::error::{Result, TailorError};
use resume_tailor::input::InputManager;
use resume_tailor::llm::rewrite::{review_response, review_rewrite};
use resume_tailor::output::formatter::{save_report_to_file, ConsoleFormatter};
use resume_tailor::output::{AnalysisReport, ReportGenerator};
use resume_tailor::processing::{
    sanitize_keywords, score_bullet, AnalysisEngine, KeywordFit, KeywordFitAnalyzer, SkillKeywordAnalyzer,
    StaticKeywordFit,
};
use std::path::PathBuf;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    match run_command(cli.command, config, cli.config).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("Command failed: {}", e);
            process::exit(1);
        }
    }
}

/// Returns the process exit code; 2 signals a blocked rewrite
async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<i32> {
    match command {
        Commands::Analyze {
            resume,
            job,
            guardrail,
            missing,
            match_score,
            output,
            detailed,
            save,
        } => {
            cli::validate_file_extension(&resume, &["pdf", "txt", "md"])
                .map_err(|e| TailorError::InvalidInput(format!("Resume file: {}", e)))?;
            cli::validate_file_extension(&job, &["txt", "md"])
                .map_err(|e| TailorError::InvalidInput(format!("Job posting file: {}", e)))?;

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(TailorError::InvalidInput)?,
                None => config.output.format,
            };

            let mut input_manager = InputManager::new();
            let resume_text = input_manager.extract_text(&resume).await?;
            let job_text = input_manager.extract_text(&job).await?;
            info!(
                "Extracted {} resume characters and {} job posting characters",
                resume_text.len(),
                job_text.len()
            );

            let analyzer: Box<dyn KeywordFitAnalyzer> = match missing {
                Some(missing_keywords) => {
                    info!("Using {} caller-supplied missing keywords", missing_keywords.len());
                    Box::new(StaticKeywordFit(KeywordFit {
                        match_score: match_score.unwrap_or(0.0),
                        missing_keywords,
                    }))
                }
                None => Box::new(SkillKeywordAnalyzer::with_custom_skills(
                    config.analyzer.custom_skills.clone(),
                    config.analyzer.fuzzy_threshold,
                    config.analyzer.max_missing_keywords,
                )?),
            };

            let terms = guardrail.to_terms();
            let engine = AnalysisEngine::new(&config);
            let analysis = engine.analyze_with(&resume_text, &job_text, &terms, analyzer.as_ref())?;
            let report = AnalysisReport::from_analysis(
                analysis,
                &terms,
                &resume.to_string_lossy(),
                &job.to_string_lossy(),
            );

            let detailed = detailed || config.output.detailed;
            let use_colors = config.output.color_output && save.is_none();
            let generator = ReportGenerator::with_options(use_colors, detailed, true, true);
            let rendered = generator.generate_report(&report, &output_format)?;

            match save {
                Some(path) => {
                    save_report_to_file(&rendered, &path)?;
                    println!("✅ Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Score { bullet } => {
            let result = score_bullet(&bullet);
            let formatter = ConsoleFormatter::new(config.output.color_output, false);
            print!("{}", formatter.format_verb_strength(&bullet, &result));
        }

        Commands::Sanitize { keywords, guardrail } => {
            let terms = guardrail.to_terms();
            if terms.is_empty() {
                warn!("No guardrail terms given; every keyword is usable");
            }
            let sanitized = sanitize_keywords(&keywords, &terms);
            println!("Usable:  {}", sanitized.usable_keywords.join(", "));
            println!("Blocked: {}", sanitized.blocked_keywords.join(", "));
        }

        Commands::Review {
            original,
            rewritten,
            response,
            guardrail,
            json,
        } => {
            let terms = guardrail.to_terms();
            let review = match (rewritten, response) {
                (Some(rewritten), _) => review_rewrite(&original, &rewritten, &terms),
                (None, Some(path)) => {
                    let raw = tokio::fs::read_to_string(&path).await?;
                    review_response(&original, &raw, &terms)?
                }
                (None, None) => {
                    return Err(TailorError::InvalidInput(
                        "Provide --rewritten or --response".to_string(),
                    ))
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&review)?);
            } else {
                let formatter = ConsoleFormatter::new(config.output.color_output, false);
                print!("{}", formatter.format_review(&review));
            }

            if !review.accepted {
                return Ok(2);
            }
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    println!("⚙️  Configuration ({})\n", path.display());
                    let content = toml::to_string_pretty(&config)
                        .map_err(|e| TailorError::Configuration(format!("Failed to serialize config: {}", e)))?;
                    println!("{}", content);
                }

                Some(ConfigAction::Reset) => {
                    Config::default().save_to(&path)?;
                    println!("✅ Configuration reset to defaults");
                }

                Some(ConfigAction::Set { key, value }) => {
                    let mut updated = config;
                    updated.set_value(&key, &value)?;
                    updated.save_to(&path)?;
                    println!("✅ Set {} = {}", key, value);
                }
            }
        }
    }

    Ok(0)
}
