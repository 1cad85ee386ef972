//! Rewrite generator seam and the output guardrail (pipeline stage 10)
//!
//! A generator receives one bullet and a sanitized keyword list and answers
//! with JSON. Its self-reported `blockedKeywords` are never trusted: the
//! review recomputes injected terms from the raw text.

use crate::error::{Result, TailorError};
use crate::llm::prompts::{PromptParams, PromptTemplates};
use crate::processing::guardrail::{check_rewrite, sanitize_keywords, GuardrailTerms, InjectionCheck};
use crate::processing::verb_strength::{score_bullet, VerbStrengthResult};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Request handed to a generator; `keywords` are always guardrail-clean
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteRequest {
    pub bullet: String,
    pub keywords: Vec<String>,
    pub guardrail: GuardrailTerms,
}

impl RewriteRequest {
    pub fn prompt(&self, templates: &PromptTemplates) -> String {
        templates.render_bullet_rewrite(&PromptParams {
            bullet: self.bullet.clone(),
            keywords: self.keywords.clone(),
            forbidden_terms: self.guardrail.all_terms().into_iter().map(str::to_string).collect(),
        })
    }
}

/// Wire shape of a generator answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorResponse {
    pub rewritten_bullet: String,
    /// Reported by the generator, informational only
    #[serde(default)]
    pub blocked_keywords: Vec<String>,
}

/// External service turning a request into raw JSON text
pub trait RewriteGenerator {
    fn generate(&self, request: &RewriteRequest) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteReview {
    pub original: String,
    pub rewritten_bullet: String,
    pub injection: InjectionCheck,
    /// False whenever the rewrite introduced a guardrail term
    pub accepted: bool,
    pub before: VerbStrengthResult,
    pub after: VerbStrengthResult,
    pub delta: i16,
    /// What the generator claimed to have withheld
    pub reported_blocked_keywords: Vec<String>,
}

/// Sanitize keywords before they ever reach a generator
pub fn prepare_rewrite_request<S: AsRef<str>>(bullet: &str, keywords: &[S], terms: &GuardrailTerms) -> RewriteRequest {
    let sanitized = sanitize_keywords(keywords, terms);
    if !sanitized.blocked_keywords.is_empty() {
        info!(
            "Withholding {} keywords from the rewrite request",
            sanitized.blocked_keywords.len()
        );
    }

    RewriteRequest {
        bullet: bullet.trim().to_string(),
        keywords: sanitized.usable_keywords,
        guardrail: terms.clone(),
    }
}

/// Parse a generator answer, tolerating a fenced code block around the JSON
pub fn parse_generator_response(raw: &str) -> Result<GeneratorResponse> {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    let response: GeneratorResponse = serde_json::from_str(body)
        .map_err(|e| TailorError::InvalidGeneratorResponse(format!("expected JSON with rewrittenBullet: {}", e)))?;

    if response.rewritten_bullet.trim().is_empty() {
        return Err(TailorError::InvalidGeneratorResponse(
            "rewrittenBullet is empty".to_string(),
        ));
    }

    Ok(response)
}

/// Re-scan a rewrite for injected guardrail terms and score it
pub fn review_rewrite(original: &str, rewritten: &str, terms: &GuardrailTerms) -> RewriteReview {
    let injection = check_rewrite(original, rewritten, terms);
    let before = score_bullet(original);
    let after = score_bullet(rewritten);

    if injection.is_blocked() {
        warn!(
            "Rejecting rewrite: introduced {}",
            injection.blocked_keywords.join(", ")
        );
    }

    RewriteReview {
        original: original.to_string(),
        rewritten_bullet: rewritten.to_string(),
        accepted: !injection.is_blocked(),
        injection,
        delta: after.score as i16 - before.score as i16,
        before,
        after,
        reported_blocked_keywords: Vec::new(),
    }
}

/// Review a raw generator answer for `original`
pub fn review_response(original: &str, raw: &str, terms: &GuardrailTerms) -> Result<RewriteReview> {
    let response = parse_generator_response(raw)?;
    let mut review = review_rewrite(original, response.rewritten_bullet.trim(), terms);
    review.reported_blocked_keywords = response.blocked_keywords;
    Ok(review)
}

/// Full round trip: call the generator, then run the output guardrail
pub async fn rewrite_bullet<G: RewriteGenerator>(generator: &G, request: &RewriteRequest) -> Result<RewriteReview> {
    let raw = generator.generate(request).await?;
    review_response(&request.bullet, &raw, &request.guardrail)
}
