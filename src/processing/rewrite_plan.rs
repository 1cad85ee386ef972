//! Rewrite plan ranking (pipeline stage 8)

use crate::config::PlanConfig;
use crate::processing::segmenter::Bullet;
use crate::processing::suggester::KeywordSuggestion;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewritePlanItem {
    pub bullet_id: String,
    pub original: String,
    pub target_keywords: Vec<String>,
    pub suggestion_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewritePlan {
    pub items: Vec<RewritePlanItem>,
    /// True when the plan was synthesized from global keywords because no
    /// bullet had a suggestion of its own
    pub degraded: bool,
}

impl RewritePlan {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Human-readable instruction attached to every plan item
pub fn suggestion_text(keywords: &[String]) -> String {
    if keywords.is_empty() {
        return "Rewrite in Action+Scope+Result format: lead with a strong verb, name the system you worked on, and quantify the outcome.".to_string();
    }
    format!(
        "Add: {}. Rewrite in Action+Scope+Result format: lead with a strong verb, name the system you worked on, and quantify the outcome.",
        keywords.join(", ")
    )
}

/// Rank per-bullet suggestions into a bounded plan.
///
/// `usable_missing` feeds the degraded fallback and must already be sanitized.
pub fn build_rewrite_plan(
    suggestions: &[KeywordSuggestion],
    bullets: &[Bullet],
    usable_missing: &[String],
    config: &PlanConfig,
) -> RewritePlan {
    let mut ranked: Vec<(&KeywordSuggestion, f32)> = suggestions
        .iter()
        .filter(|s| !s.suggested_keywords.is_empty())
        .map(|s| (s, 2.0 * s.suggested_keywords.len() as f32 + s.bullet_job_overlap))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked.truncate(config.max_items);

    if !ranked.is_empty() || bullets.is_empty() {
        let items = ranked
            .into_iter()
            .map(|(s, _)| {
                let target_keywords: Vec<String> = s
                    .suggested_keywords
                    .iter()
                    .take(config.max_target_keywords)
                    .cloned()
                    .collect();
                RewritePlanItem {
                    bullet_id: s.bullet_id.clone(),
                    original: s.bullet_text.clone(),
                    suggestion_text: suggestion_text(&target_keywords),
                    target_keywords,
                }
            })
            .collect();
        return RewritePlan { items, degraded: false };
    }

    debug!("No bullet earned a suggestion; building fallback plan over {} bullets", bullets.len());
    let global: Vec<String> = usable_missing
        .iter()
        .take(config.fallback_keyword_count)
        .cloned()
        .collect();
    let target_keywords: Vec<String> = global.iter().take(config.max_target_keywords).cloned().collect();
    let text = suggestion_text(&global);

    let items = bullets
        .iter()
        .take(config.fallback_max_bullets)
        .map(|bullet| RewritePlanItem {
            bullet_id: bullet.id.clone(),
            original: bullet.text.clone(),
            target_keywords: target_keywords.clone(),
            suggestion_text: text.clone(),
        })
        .collect();

    RewritePlan { items, degraded: true }
}
