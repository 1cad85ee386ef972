//! Configuration management for the resume tailor

use crate::error::{Result, TailorError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub suggestion: SuggestionConfig,
    #[serde(default)]
    pub plan: PlanConfig,
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Minimum bullet lengths per extraction tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub explicit_bullet_min_chars: usize,
    pub bulletish_min_chars: usize,
    pub anchor_min_chars: usize,
    pub fallback_bullet_min_chars: usize,
    pub sentence_min_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    pub max_keywords_per_bullet: usize,
    pub weak_overlap_threshold: f32,
    pub max_weak_bullets: usize,
    pub min_token_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    pub max_items: usize,
    pub max_target_keywords: usize,
    pub fallback_max_bullets: usize,
    pub fallback_keyword_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub fuzzy_threshold: f32,
    pub custom_skills: Vec<String>,
    pub max_missing_keywords: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            explicit_bullet_min_chars: 15,
            bulletish_min_chars: 25,
            anchor_min_chars: 25,
            fallback_bullet_min_chars: 15,
            sentence_min_chars: 20,
        }
    }
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            max_keywords_per_bullet: 5,
            weak_overlap_threshold: 0.12,
            max_weak_bullets: 8,
            min_token_chars: 3,
        }
    }
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            max_items: 8,
            max_target_keywords: 3,
            fallback_max_bullets: 25,
            fallback_keyword_count: 5,
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.85,
            custom_skills: Vec::new(),
            max_missing_keywords: 25,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            TailorError::Configuration(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| TailorError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-tailor")
            .join("config.toml")
    }

    /// Set a single value addressed as `section.key`
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
            value.parse().map_err(|_| {
                TailorError::Configuration(format!("Invalid value '{}' for {}", value, key))
            })
        }

        match key {
            "extraction.explicit_bullet_min_chars" => {
                self.extraction.explicit_bullet_min_chars = parse(key, value)?
            }
            "extraction.bulletish_min_chars" => self.extraction.bulletish_min_chars = parse(key, value)?,
            "extraction.anchor_min_chars" => self.extraction.anchor_min_chars = parse(key, value)?,
            "extraction.fallback_bullet_min_chars" => {
                self.extraction.fallback_bullet_min_chars = parse(key, value)?
            }
            "extraction.sentence_min_chars" => self.extraction.sentence_min_chars = parse(key, value)?,
            "suggestion.max_keywords_per_bullet" => {
                self.suggestion.max_keywords_per_bullet = parse(key, value)?
            }
            "suggestion.weak_overlap_threshold" => {
                self.suggestion.weak_overlap_threshold = parse(key, value)?
            }
            "suggestion.max_weak_bullets" => self.suggestion.max_weak_bullets = parse(key, value)?,
            "suggestion.min_token_chars" => self.suggestion.min_token_chars = parse(key, value)?,
            "plan.max_items" => self.plan.max_items = parse(key, value)?,
            "plan.max_target_keywords" => self.plan.max_target_keywords = parse(key, value)?,
            "plan.fallback_max_bullets" => self.plan.fallback_max_bullets = parse(key, value)?,
            "plan.fallback_keyword_count" => self.plan.fallback_keyword_count = parse(key, value)?,
            "analyzer.fuzzy_threshold" => {
                let threshold: f32 = parse(key, value)?;
                self.analyzer.fuzzy_threshold = threshold.clamp(0.0, 1.0);
            }
            "analyzer.max_missing_keywords" => self.analyzer.max_missing_keywords = parse(key, value)?,
            "analyzer.custom_skills" => {
                self.analyzer.custom_skills = value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            "output.format" => {
                self.output.format = crate::cli::parse_output_format(value)
                    .map_err(TailorError::Configuration)?
            }
            "output.detailed" => self.output.detailed = parse(key, value)?,
            "output.color_output" => self.output.color_output = parse(key, value)?,
            _ => {
                return Err(TailorError::Configuration(format!(
                    "Unknown configuration key: {}",
                    key
                )))
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline_constants() {
        let config = Config::default();
        assert_eq!(config.suggestion.max_keywords_per_bullet, 5);
        assert_eq!(config.suggestion.max_weak_bullets, 8);
        assert_eq!(config.plan.max_items, 8);
        assert_eq!(config.plan.max_target_keywords, 3);
        assert_eq!(config.plan.fallback_max_bullets, 25);
        assert!((config.suggestion.weak_overlap_threshold - 0.12).abs() < f32::EPSILON);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.plan.max_items = 4;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.plan.max_items, 4);
        assert_eq!(loaded.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[plan]\nmax_items = 3\nmax_target_keywords = 2\nfallback_max_bullets = 10\nfallback_keyword_count = 4\n",
        )
        .unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.plan.max_items, 3);
        assert_eq!(loaded.extraction.bulletish_min_chars, 25);
    }

    #[test]
    fn test_set_value() {
        let mut config = Config::default();
        config.set_value("plan.max_items", "12").unwrap();
        config.set_value("output.format", "json").unwrap();
        config.set_value("analyzer.fuzzy_threshold", "3.0").unwrap();

        assert_eq!(config.plan.max_items, 12);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.analyzer.fuzzy_threshold, 1.0);
        assert!(config.set_value("plan.max_items", "many").is_err());
        assert!(config.set_value("nope.key", "1").is_err());
    }
}
