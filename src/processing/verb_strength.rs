//! Verb strength scoring (pipeline stage 9)
//!
//! A deterministic phrasing heuristic applied to a bullet before and after
//! rewriting, so the two scores are directly comparable.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const BASE_SCORE: i32 = 62;
const WEAK_OPENER_PENALTY: i32 = 10;
const PASSIVE_OPENER_PENALTY: i32 = 8;
const VAGUE_PENALTY: i32 = 6;
const STRONG_VERB_BONUS: i32 = 22;
const SOLID_VERB_BONUS: i32 = 10;
const GENERIC_VERB_BONUS: i32 = 6;
const NO_VERB_PENALTY: i32 = 4;
const SCOPE_BONUS: i32 = 10;
const OUTCOME_BONUS: i32 = 12;
const QUANTIFIED_BONUS: i32 = 12;

const OPENING_WORDS: usize = 10;
const VERB_SCAN_WORDS: usize = 8;
const MAX_REASONS: usize = 3;

const WEAK_OPENERS: &[&str] = &[
    "worked with",
    "worked on",
    "helped",
    "assisted",
    "was responsible for",
    "responsible for",
    "duties included",
    "participated in",
    "involved in",
    "in charge of",
    "tasked with",
    "handled",
    "did",
];

const PASSIVE_OPENERS: &[&str] = &[
    "was involved in",
    "was tasked with",
    "was responsible for",
    "was assigned",
    "was given",
    "was part of",
    "were responsible for",
    "were tasked with",
    "has been",
    "have been",
];

const VAGUE_WORDS: &[&str] = &[
    "various", "several", "stuff", "etc", "things", "misc", "miscellaneous", "numerous", "some",
];

const FILLER_WORDS: &[&str] = &[
    "i", "we", "my", "our", "the", "a", "an", "also", "successfully", "actively", "personally",
];

const STRONG_VERBS: &[&str] = &[
    "led", "owned", "drove", "shipped", "automated", "optimized", "launched", "spearheaded", "architected",
    "established", "streamlined", "delivered", "championed", "pioneered", "directed", "overhauled",
    "scaled", "transformed", "mentored", "founded",
];

const SOLID_VERBS: &[&str] = &[
    "tested", "validated", "built", "documented", "developed", "implemented", "created", "verified",
    "executed", "maintained", "coordinated", "analyzed", "managed", "triaged", "reviewed", "wrote",
    "configured", "designed", "investigated", "reproduced", "reported", "trained", "integrated",
];

const SCOPE_WORDS: &[&str] = &[
    "api", "apis", "pipeline", "pipelines", "release", "releases", "automation", "framework", "platform",
    "infrastructure", "backend", "database", "service", "services", "system", "systems", "architecture",
    "regression", "build", "builds", "deployment", "sdk", "cloud", "microservices", "cicd", "tooling",
    "suite", "server", "servers", "engine",
];

const OUTCOME_WORDS: &[&str] = &[
    "increased", "reduced", "improved", "prevented", "decreased", "cut", "saved", "accelerated", "boosted",
    "grew", "eliminated", "raised", "lowered", "shortened", "achieved", "doubled", "tripled", "minimized",
    "maximized",
];

static QUANTIFIED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\d\s*%|\$\s*\d|\b\d+(?:\.\d+)?\s*(?:ms|milliseconds?|s|secs?|seconds?|mins?|minutes?|hrs?|hours?|days?|weeks?|months?|years?)\b|\b\d+(?:\.\d+)?x\b|\b\d{2,}",
    )
    .expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerbStrengthLabel {
    Weak,
    OK,
    Strong,
}

impl VerbStrengthLabel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=49 => VerbStrengthLabel::Weak,
            50..=79 => VerbStrengthLabel::OK,
            _ => VerbStrengthLabel::Strong,
        }
    }
}

impl std::fmt::Display for VerbStrengthLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerbStrengthLabel::Weak => write!(f, "Weak"),
            VerbStrengthLabel::OK => write!(f, "OK"),
            VerbStrengthLabel::Strong => write!(f, "Strong"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerbStrengthResult {
    pub score: u8,
    pub label: VerbStrengthLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_verb: Option<String>,
    pub reasons: Vec<String>,
}

enum VerbKind {
    Strong,
    Solid,
    Generic,
}

/// Score a bullet's phrasing on a 0-100 scale
pub fn score_bullet(text: &str) -> VerbStrengthResult {
    let words = clean_words(text);
    let opening = words
        .iter()
        .take(OPENING_WORDS)
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");

    let mut score = BASE_SCORE;
    let mut reasons: Vec<String> = Vec::new();

    if WEAK_OPENERS.iter().any(|phrase| starts_with_phrase(&opening, phrase)) {
        score -= WEAK_OPENER_PENALTY;
        reasons.push("Opens with a weak phrase".to_string());
    }

    if PASSIVE_OPENERS.iter().any(|phrase| starts_with_phrase(&opening, phrase)) {
        score -= PASSIVE_OPENER_PENALTY;
        reasons.push("Passive-voice opener".to_string());
    }

    if words.iter().any(|word| VAGUE_WORDS.contains(&word.as_str())) {
        score -= VAGUE_PENALTY;
        reasons.push("Vague wording".to_string());
    }

    let detected = detect_verb(&words);
    match &detected {
        Some((verb, VerbKind::Strong)) => {
            score += STRONG_VERB_BONUS;
            reasons.push(format!("Strong lead verb: {}", verb));
        }
        Some((verb, VerbKind::Solid)) => {
            score += SOLID_VERB_BONUS;
            reasons.push(format!("Solid action verb: {}", verb));
        }
        Some((verb, VerbKind::Generic)) => {
            score += GENERIC_VERB_BONUS;
            reasons.push(format!("Action verb: {}", verb));
        }
        None => {
            score -= NO_VERB_PENALTY;
            reasons.push("No clear action verb".to_string());
        }
    }

    let lower = text.to_lowercase();
    if lower.contains("ci/cd") || words.iter().any(|word| SCOPE_WORDS.contains(&word.as_str())) {
        score += SCOPE_BONUS;
        reasons.push("Names a system or scope".to_string());
    }

    if words.iter().any(|word| OUTCOME_WORDS.contains(&word.as_str())) {
        score += OUTCOME_BONUS;
        reasons.push("States an outcome".to_string());
    }

    if QUANTIFIED.is_match(text) {
        score += QUANTIFIED_BONUS;
        reasons.push("Quantified impact".to_string());
    }

    let score = score.clamp(0, 100) as u8;
    reasons.truncate(MAX_REASONS);

    VerbStrengthResult {
        score,
        label: VerbStrengthLabel::from_score(score),
        detected_verb: detected.map(|(verb, _)| verb),
        reasons,
    }
}

/// Lowercased words with surrounding punctuation and bullet glyphs removed
fn clean_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric() && c != '/')
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

fn starts_with_phrase(opening: &str, phrase: &str) -> bool {
    opening == phrase
        || opening
            .strip_prefix(phrase)
            .is_some_and(|rest| rest.starts_with(' '))
}

fn detect_verb(words: &[String]) -> Option<(String, VerbKind)> {
    let candidates: Vec<&String> = words
        .iter()
        .filter(|word| !FILLER_WORDS.contains(&word.as_str()))
        .take(VERB_SCAN_WORDS)
        .collect();

    for word in &candidates {
        if STRONG_VERBS.contains(&word.as_str()) {
            return Some((word.to_string(), VerbKind::Strong));
        }
        if SOLID_VERBS.contains(&word.as_str()) {
            return Some((word.to_string(), VerbKind::Solid));
        }
    }

    candidates
        .iter()
        .find(|word| {
            word.chars().count() >= 5 && word.ends_with("ed") && word.chars().all(|c| c.is_alphabetic())
        })
        .map(|word| (word.to_string(), VerbKind::Generic))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_quantified_bullet() {
        let result = score_bullet("Led migration of the release pipeline, reducing build times by 40%.");
        // 62 + 22 strong + 10 scope + 12 quantified
        assert_eq!(result.score, 100);
        assert_eq!(result.label, VerbStrengthLabel::Strong);
        assert_eq!(result.detected_verb.as_deref(), Some("led"));
    }

    #[test]
    fn test_solid_verb_with_scope_and_numbers() {
        let result =
            score_bullet("Tested nightly builds across three platforms, filing 120+ defects per release.");
        // 62 + 10 solid + 10 scope + 12 quantified
        assert_eq!(result.score, 94);
        assert_eq!(result.detected_verb.as_deref(), Some("tested"));
    }

    #[test]
    fn test_weak_passive_vague_bullet() {
        let result = score_bullet("Was responsible for various things on the team.");
        // 62 - 10 weak - 8 passive - 6 vague - 4 no verb
        assert_eq!(result.score, 34);
        assert_eq!(result.label, VerbStrengthLabel::Weak);
        assert_eq!(
            result.reasons,
            vec!["Opens with a weak phrase", "Passive-voice opener", "Vague wording"]
        );
    }

    #[test]
    fn test_helped_opener() {
        let result = score_bullet("Helped the team with testing.");
        // 62 - 10 weak + 6 generic "-ed" verb
        assert_eq!(result.score, 58);
        assert_eq!(result.label, VerbStrengthLabel::OK);
        assert_eq!(result.detected_verb.as_deref(), Some("helped"));
    }

    #[test]
    fn test_generic_ed_verb_and_outcome() {
        let result = score_bullet("Partnered with designers and improved onboarding flow");
        // 62 + 6 generic ("partnered") + 12 outcome
        assert_eq!(result.score, 80);
        assert_eq!(result.detected_verb.as_deref(), Some("partnered"));
    }

    #[test]
    fn test_filler_words_are_skipped() {
        let result = score_bullet("I successfully automated smoke tests");
        assert_eq!(result.detected_verb.as_deref(), Some("automated"));
    }

    #[test]
    fn test_empty_and_garbage_inputs_stay_in_bounds() {
        assert_eq!(score_bullet("").score, 58);
        assert!(score_bullet("\u{0}\u{1}%%%$$$").score <= 100);
    }

    #[test]
    fn test_label_thresholds() {
        assert_eq!(VerbStrengthLabel::from_score(49), VerbStrengthLabel::Weak);
        assert_eq!(VerbStrengthLabel::from_score(50), VerbStrengthLabel::OK);
        assert_eq!(VerbStrengthLabel::from_score(79), VerbStrengthLabel::OK);
        assert_eq!(VerbStrengthLabel::from_score(80), VerbStrengthLabel::Strong);
    }
}
