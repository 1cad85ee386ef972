//! Keyword guardrails (pipeline stages 7 and 10)
//!
//! A keyword is blocked when its comparison form contains a guardrail term
//! or is contained by one. The same check runs on missing keywords, on
//! per-bullet suggestions, before a generator request and on generator
//! output; no checkpoint trusts an earlier one.

use crate::processing::normalizer::comparison_form;
use crate::processing::text_processor::tokenize;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Caller-supplied terms that must never be suggested or injected
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardrailTerms {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_company: Option<String>,
    #[serde(default)]
    pub target_products: Vec<String>,
    #[serde(default)]
    pub blocked_terms: Vec<String>,
}

impl GuardrailTerms {
    /// Every non-empty term, in company, products, blocked order
    pub fn all_terms(&self) -> Vec<&str> {
        self.target_company
            .iter()
            .chain(self.target_products.iter())
            .chain(self.blocked_terms.iter())
            .map(String::as_str)
            .filter(|term| !comparison_form(term).is_empty())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.all_terms().is_empty()
    }

    /// First guardrail term overlapping `keyword` in either direction
    pub fn matching_term(&self, keyword: &str) -> Option<&str> {
        let candidate = comparison_form(keyword);
        if candidate.is_empty() {
            return None;
        }
        self.all_terms().into_iter().find(|term| {
            let term_form = comparison_form(term);
            candidate.contains(&term_form) || term_form.contains(&candidate)
        })
    }

    pub fn blocks(&self, keyword: &str) -> bool {
        self.matching_term(keyword).is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedKeywords {
    pub usable_keywords: Vec<String>,
    pub blocked_keywords: Vec<String>,
}

/// Split keywords into usable and blocked lists.
///
/// Both lists are deduplicated case-insensitively, keeping the first-seen
/// casing and the input order. Blank keywords are dropped.
pub fn sanitize_keywords<S: AsRef<str>>(keywords: &[S], terms: &GuardrailTerms) -> SanitizedKeywords {
    let mut seen = HashSet::new();
    let mut result = SanitizedKeywords::default();

    for keyword in keywords {
        let keyword = keyword.as_ref().trim();
        let key = comparison_form(keyword);
        if key.is_empty() || !seen.insert(key) {
            continue;
        }

        match terms.matching_term(keyword) {
            Some(term) => {
                warn!("Blocked keyword '{}' (matches guardrail term '{}')", keyword, term);
                result.blocked_keywords.push(keyword.to_string());
            }
            None => result.usable_keywords.push(keyword.to_string()),
        }
    }

    result
}

/// Outcome of re-scanning generator output against the guardrail terms
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectionCheck {
    /// Terms present in the rewrite but absent from the original
    pub blocked_keywords: Vec<String>,
    /// Terms present in both; carried over, not injected
    pub preserved_terms: Vec<String>,
}

impl InjectionCheck {
    pub fn is_blocked(&self) -> bool {
        !self.blocked_keywords.is_empty()
    }
}

/// Shortest term fragment that counts as a mention on its own
const MIN_FRAGMENT_CHARS: usize = 3;

/// Space-padded word form, so phrase lookups only match whole words
fn word_form(text: &str) -> String {
    format!(" {} ", tokenize(text, 1).join(" "))
}

fn mentioned(words: &str, fragment: &str) -> bool {
    words.contains(&format!(" {} ", fragment))
}

/// The whole term plus every contiguous run of its words, longest first.
/// "Monopoly GO" yields "monopoly go" and "monopoly"; "go" is too short.
fn term_fragments(term: &str) -> Vec<String> {
    let words = tokenize(term, 1);
    let mut fragments = Vec::new();
    for len in (1..=words.len()).rev() {
        for window in words.windows(len) {
            let fragment = window.join(" ");
            if fragment.chars().count() >= MIN_FRAGMENT_CHARS && !fragments.contains(&fragment) {
                fragments.push(fragment);
            }
        }
    }
    fragments
}

/// Compare guardrail-term presence in the original and rewritten bullet.
///
/// A term counts as present when the text mentions it or any word run of it,
/// mirroring the two-way containment used by [`sanitize_keywords`]. Any term
/// with a fragment that appears only in the rewrite is an injection.
pub fn check_rewrite(original: &str, rewritten: &str, terms: &GuardrailTerms) -> InjectionCheck {
    let original_words = word_form(original);
    let rewritten_words = word_form(rewritten);
    let mut seen = HashSet::new();
    let mut check = InjectionCheck::default();

    for term in terms.all_terms() {
        if !seen.insert(comparison_form(term)) {
            continue;
        }

        let fragments = term_fragments(term);
        let injected = fragments
            .iter()
            .find(|fragment| mentioned(&rewritten_words, fragment) && !mentioned(&original_words, fragment));
        if let Some(fragment) = injected {
            warn!("Rewrite injected guardrail term '{}' (as '{}')", term, fragment);
            check.blocked_keywords.push(term.to_string());
        } else if fragments
            .iter()
            .any(|fragment| mentioned(&original_words, fragment) && mentioned(&rewritten_words, fragment))
        {
            check.preserved_terms.push(term.to_string());
        }
    }

    check
}
