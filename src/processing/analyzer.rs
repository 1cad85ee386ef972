//! Analysis engine composing the pipeline stages

use crate::config::Config;
use crate::error::{Result, TailorError};
use crate::processing::guardrail::{sanitize_keywords, GuardrailTerms};
use crate::processing::keyword_fit::{KeywordFit, KeywordFitAnalyzer};
use crate::processing::normalizer::{normalize_job, normalize_resume};
use crate::processing::rewrite_plan::{build_rewrite_plan, RewritePlanItem};
use crate::processing::section::{locate_experience, LocatorMode};
use crate::processing::segmenter::{extract_bullets, Bullet, ExtractionTier, JobBlock};
use crate::processing::suggester::{suggest_keywords, KeywordSuggestion, WeakBullet};
use crate::processing::verb_strength::{score_bullet, VerbStrengthResult};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Everything the pipeline derives from one resume/job pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub experience_jobs: Vec<JobBlock>,
    pub bullets: Vec<String>,
    /// Parallel to `bullets`
    pub bullet_job_ids: Vec<String>,
    pub bullet_suggestions: Vec<KeywordSuggestion>,
    pub weak_bullets: Vec<WeakBullet>,
    pub rewrite_plan: Vec<RewritePlanItem>,

    /// Keyword-fit score as reported by the analyzer, 0-100
    pub match_score: f32,
    /// Missing keywords that passed the guardrail
    pub missing_keywords: Vec<String>,
    /// Missing keywords withheld by the guardrail
    pub blocked_keywords: Vec<String>,

    pub bullet_scores: Vec<BulletScore>,
    pub debug: AnalysisDebug,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletScore {
    pub bullet_id: String,
    pub verb_strength: VerbStrengthResult,
}

/// Which fallbacks the pipeline took
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDebug {
    pub found_section: bool,
    pub mode: LocatorMode,
    pub tier: ExtractionTier,
    pub plan_degraded: bool,
    pub processing_time_ms: u64,
}

impl ResumeAnalysis {
    pub fn bullet(&self, bullet_id: &str) -> Option<&Bullet> {
        self.experience_jobs
            .iter()
            .flat_map(|job| job.bullets.iter())
            .find(|bullet| bullet.id == bullet_id)
    }

    pub fn suggestion_for(&self, bullet_id: &str) -> Option<&KeywordSuggestion> {
        self.bullet_suggestions.iter().find(|s| s.bullet_id == bullet_id)
    }

    pub fn average_verb_strength(&self) -> Option<f32> {
        if self.bullet_scores.is_empty() {
            return None;
        }
        let total: u32 = self.bullet_scores.iter().map(|s| s.verb_strength.score as u32).sum();
        Some(total as f32 / self.bullet_scores.len() as f32)
    }
}

/// Reject empty inputs before the pipeline ever runs
pub fn validate_inputs(resume_text: &str, job_text: &str) -> Result<()> {
    if resume_text.trim().is_empty() {
        return Err(TailorError::InvalidInput("Resume text is empty".to_string()));
    }
    if job_text.trim().is_empty() {
        return Err(TailorError::InvalidInput("Job description text is empty".to_string()));
    }
    Ok(())
}

pub struct AnalysisEngine {
    config: Config,
}

impl AnalysisEngine {
    pub fn new(config: &Config) -> Self {
        Self { config: config.clone() }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validate inputs, consult the keyword-fit collaborator and run the pipeline
    pub fn analyze_with(
        &self,
        resume_text: &str,
        job_text: &str,
        terms: &GuardrailTerms,
        analyzer: &dyn KeywordFitAnalyzer,
    ) -> Result<ResumeAnalysis> {
        validate_inputs(resume_text, job_text)?;
        let fit = analyzer.analyze(resume_text, job_text)?;
        info!(
            "Keyword fit: {:.1}% with {} missing keywords",
            fit.match_score,
            fit.missing_keywords.len()
        );
        Ok(self.analyze(resume_text, job_text, terms, &fit))
    }

    /// Run stages 1-4 and 6-9 over already-obtained keyword fit.
    ///
    /// Total over any input: degenerate text yields empty lists, never an error.
    pub fn analyze(&self, resume_text: &str, job_text: &str, terms: &GuardrailTerms, fit: &KeywordFit) -> ResumeAnalysis {
        let start_time = Instant::now();
        let config = &self.config;

        // 1. Normalize
        let resume = normalize_resume(resume_text);
        let job = normalize_job(job_text);

        // 2. Locate the experience section
        let section = locate_experience(&resume, config.extraction.anchor_min_chars);
        info!("Experience section located (mode: {:?})", section.mode);

        // 3-4. Segment jobs and classify bullets
        let extraction = extract_bullets(&resume, &section.experience_text, &config.extraction);
        info!(
            "Extracted {} bullets across {} job blocks ({:?})",
            extraction.bullet_count(),
            extraction.jobs.len(),
            extraction.tier
        );
        let bullets: Vec<Bullet> = extraction.bullets().cloned().collect();

        // 7. Guardrail checkpoint before any suggestion is made
        let sanitized_missing = sanitize_keywords(&fit.missing_keywords, terms);
        if !sanitized_missing.blocked_keywords.is_empty() {
            info!(
                "Guardrail withheld {} missing keywords",
                sanitized_missing.blocked_keywords.len()
            );
        }

        // 6. Bullet-keyword suggestions (sanitized again per bullet)
        let suggestions = suggest_keywords(
            &bullets,
            &job,
            &sanitized_missing.usable_keywords,
            terms,
            &config.suggestion,
        );
        debug!(
            "{} bullets received keyword suggestions, {} flagged weak",
            suggestions
                .bullet_suggestions
                .iter()
                .filter(|s| !s.suggested_keywords.is_empty())
                .count(),
            suggestions.weak_bullets.len()
        );

        // 8. Rewrite plan
        let plan = build_rewrite_plan(
            &suggestions.bullet_suggestions,
            &bullets,
            &sanitized_missing.usable_keywords,
            &config.plan,
        );
        info!("Rewrite plan has {} items (degraded: {})", plan.items.len(), plan.degraded);

        // 9. Verb strength of every original bullet
        let bullet_scores = bullets
            .iter()
            .map(|bullet| BulletScore {
                bullet_id: bullet.id.clone(),
                verb_strength: score_bullet(&bullet.text),
            })
            .collect();

        let match_score = if fit.match_score.is_finite() {
            fit.match_score.clamp(0.0, 100.0)
        } else {
            0.0
        };

        ResumeAnalysis {
            bullets: extraction.bullet_texts(),
            bullet_job_ids: extraction.bullet_job_ids(),
            experience_jobs: extraction.jobs,
            bullet_suggestions: suggestions.bullet_suggestions,
            weak_bullets: suggestions.weak_bullets,
            rewrite_plan: plan.items,
            match_score,
            missing_keywords: sanitized_missing.usable_keywords,
            blocked_keywords: sanitized_missing.blocked_keywords,
            bullet_scores,
            debug: AnalysisDebug {
                found_section: section.found_section,
                mode: section.mode,
                tier: extraction.tier,
                plan_degraded: plan.degraded,
                processing_time_ms: start_time.elapsed().as_millis() as u64,
            },
        }
    }
}
