//! Bullet-keyword suggestion (pipeline stage 6)

use crate::config::SuggestionConfig;
use crate::processing::guardrail::{sanitize_keywords, GuardrailTerms};
use crate::processing::segmenter::Bullet;
use crate::processing::text_processor::{overlap_ratio, token_set};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordSuggestion {
    pub bullet_id: String,
    pub bullet_text: String,
    /// Guardrail-clean keywords, best overlap first
    pub suggested_keywords: Vec<String>,
    /// Overlapping keywords withheld by the guardrail
    pub blocked_keywords: Vec<String>,
    pub bullet_job_overlap: f32,
}

/// A bullet sharing almost no vocabulary with the posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeakBullet {
    pub bullet_id: String,
    pub bullet_text: String,
    pub overlap: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionSet {
    pub bullet_suggestions: Vec<KeywordSuggestion>,
    pub weak_bullets: Vec<WeakBullet>,
}

/// Score every bullet against the job text and the missing keywords.
///
/// `missing_keywords` is expected to be guardrail-clean already; each
/// bullet's list is sanitized again before it leaves this stage.
pub fn suggest_keywords(
    bullets: &[Bullet],
    job_text: &str,
    missing_keywords: &[String],
    terms: &GuardrailTerms,
    config: &SuggestionConfig,
) -> SuggestionSet {
    let job_tokens = token_set(job_text, config.min_token_chars);
    let keyword_tokens: Vec<(&String, HashSet<String>)> = missing_keywords
        .iter()
        .map(|keyword| (keyword, token_set(keyword, config.min_token_chars)))
        .collect();

    let mut bullet_suggestions = Vec::with_capacity(bullets.len());
    let mut weak_bullets = Vec::new();

    for bullet in bullets {
        let bullet_tokens = token_set(&bullet.text, config.min_token_chars);
        let bullet_job_overlap = overlap_ratio(&bullet_tokens, &job_tokens);

        let mut scored: Vec<(&String, f32)> = keyword_tokens
            .iter()
            .map(|(keyword, tokens)| (*keyword, overlap_ratio(tokens, &bullet_tokens)))
            .filter(|(_, overlap)| *overlap > 0.0)
            .collect();
        // Stable sort keeps the analyzer's ordering among ties
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(config.max_keywords_per_bullet);

        let candidates: Vec<&String> = scored.into_iter().map(|(keyword, _)| keyword).collect();
        let sanitized = sanitize_keywords(&candidates, terms);

        if bullet_job_overlap < config.weak_overlap_threshold {
            weak_bullets.push(WeakBullet {
                bullet_id: bullet.id.clone(),
                bullet_text: bullet.text.clone(),
                overlap: bullet_job_overlap,
            });
        }

        bullet_suggestions.push(KeywordSuggestion {
            bullet_id: bullet.id.clone(),
            bullet_text: bullet.text.clone(),
            suggested_keywords: sanitized.usable_keywords,
            blocked_keywords: sanitized.blocked_keywords,
            bullet_job_overlap,
        });
    }

    weak_bullets.sort_by(|a, b| a.overlap.partial_cmp(&b.overlap).unwrap_or(Ordering::Equal));
    weak_bullets.truncate(config.max_weak_bullets);

    SuggestionSet {
        bullet_suggestions,
        weak_bullets,
    }
}
