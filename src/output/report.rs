//! Report structure wrapping one analysis with summary and metadata

use crate::processing::analyzer::ResumeAnalysis;
use crate::processing::guardrail::GuardrailTerms;
use crate::processing::section::LocatorMode;
use crate::processing::segmenter::ExtractionTier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub summary: ReportSummary,
    pub analysis: ResumeAnalysis,
    pub metadata: ReportMetadata,
}

/// Headline numbers and plain-language notes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// 0-100
    pub match_score_percentage: u8,
    pub verdict: String,
    pub job_count: usize,
    pub bullet_count: usize,
    pub weak_bullet_count: usize,
    pub plan_item_count: usize,
    pub blocked_keyword_count: usize,
    pub average_verb_strength: Option<f32>,
    /// Degraded-extraction notices; informational, never failures
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub resume_file: String,
    pub job_file: String,
    pub processing_time_ms: u64,
    pub guardrail_terms: Vec<String>,
}

impl AnalysisReport {
    pub fn from_analysis(
        analysis: ResumeAnalysis,
        terms: &GuardrailTerms,
        resume_file: &str,
        job_file: &str,
    ) -> Self {
        let summary = Self::create_summary(&analysis);
        let metadata = ReportMetadata {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            resume_file: resume_file.to_string(),
            job_file: job_file.to_string(),
            processing_time_ms: analysis.debug.processing_time_ms,
            guardrail_terms: terms.all_terms().into_iter().map(str::to_string).collect(),
        };

        Self {
            summary,
            analysis,
            metadata,
        }
    }

    fn create_summary(analysis: &ResumeAnalysis) -> ReportSummary {
        let match_score_percentage = analysis.match_score.round().clamp(0.0, 100.0) as u8;

        let verdict = match match_score_percentage {
            80..=100 => "Strong keyword fit - polish the weakest bullets".to_string(),
            60..=79 => "Good fit - work the planned keywords into a few bullets".to_string(),
            40..=59 => "Partial fit - several bullets need rewriting toward the posting".to_string(),
            _ => "Weak fit - most bullets do not speak to this posting".to_string(),
        };

        let mut notes = Vec::new();
        match analysis.debug.mode {
            LocatorMode::Heading => {}
            LocatorMode::Heuristic => notes.push(
                "No \"Professional Experience\" heading; experience located from the first date range".to_string(),
            ),
            LocatorMode::None => {
                notes.push("No experience section found; the whole resume was scanned".to_string())
            }
        }
        match analysis.debug.tier {
            ExtractionTier::Segmented => {}
            ExtractionTier::GlyphFallback => notes.push(
                "No dated job entries with bullets; bullets were taken from list items anywhere in the resume"
                    .to_string(),
            ),
            ExtractionTier::SentenceFallback => notes.push(
                "No job entries or list items recognized; bullets were split from plain sentences".to_string(),
            ),
            ExtractionTier::Empty => notes.push("No usable bullet text was found".to_string()),
        }
        if analysis.debug.plan_degraded {
            notes.push(
                "No bullet overlapped a missing keyword; the plan pairs every bullet with the top keywords".to_string(),
            );
        }

        ReportSummary {
            match_score_percentage,
            verdict,
            job_count: analysis.experience_jobs.len(),
            bullet_count: analysis.bullets.len(),
            weak_bullet_count: analysis.weak_bullets.len(),
            plan_item_count: analysis.rewrite_plan.len(),
            blocked_keyword_count: analysis.blocked_keywords.len(),
            average_verb_strength: analysis.average_verb_strength(),
            notes,
        }
    }
}
