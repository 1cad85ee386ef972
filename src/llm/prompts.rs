//! Prompt template for single-bullet rewrites

use serde::{Deserialize, Serialize};

/// Rewrite prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub bullet_rewrite: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            bullet_rewrite: BULLET_REWRITE_TEMPLATE.to_string(),
        }
    }
}

/// Parameters for prompt template substitution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptParams {
    pub bullet: String,
    /// Guardrail-clean keywords to work in
    pub keywords: Vec<String>,
    /// Terms the rewrite must not introduce
    pub forbidden_terms: Vec<String>,
}

impl PromptTemplates {
    pub fn render_bullet_rewrite(&self, params: &PromptParams) -> String {
        let keywords = if params.keywords.is_empty() {
            "(none, improve phrasing only)".to_string()
        } else {
            params.keywords.join(", ")
        };
        let forbidden = if params.forbidden_terms.is_empty() {
            "(none)".to_string()
        } else {
            params.forbidden_terms.join(", ")
        };

        let prompt = self
            .bullet_rewrite
            .replace("{bullet}", &params.bullet)
            .replace("{keywords}", &keywords)
            .replace("{forbidden}", &forbidden);

        log::debug!("Rendered rewrite prompt ({} chars)", prompt.len());
        prompt
    }
}

const BULLET_REWRITE_TEMPLATE: &str = r#"TASK: Rewrite one resume bullet so it reads stronger for the target job.

<BULLET>
{bullet}
</BULLET>

KEYWORDS TO WORK IN (only where they are truthful): {keywords}
FORBIDDEN TERMS (never add these unless they already appear in the bullet): {forbidden}

Rules:
- Keep the facts of the original bullet. Do not invent employers, products, or numbers.
- Use Action+Scope+Result: a strong past-tense verb, the system or area, the outcome.
- One sentence, at most 30 words.

Respond with JSON only, in this exact shape:
{"rewrittenBullet": "<the rewritten bullet>", "blockedKeywords": ["<any keyword you refused to use>"]}"#;
