//! Keyword fit analysis (pipeline stage 5)
//!
//! The pipeline treats keyword fit as an external collaborator behind
//! [`KeywordFitAnalyzer`]. [`SkillKeywordAnalyzer`] is the bundled local
//! implementation: an Aho-Corasick skill dictionary run over the job posting,
//! with exact and Jaro-Winkler fuzzy matching against the resume.

use crate::error::{Result, TailorError};
use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use strsim::jaro_winkler;

/// Opaque output of a keyword-fit collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordFit {
    /// 0-100
    pub match_score: f32,
    /// Job keywords absent from the resume, most important first
    pub missing_keywords: Vec<String>,
}

pub trait KeywordFitAnalyzer {
    fn analyze(&self, resume_text: &str, job_text: &str) -> Result<KeywordFit>;
}

/// Fixed fit supplied by the caller, e.g. from a remote scoring service
#[derive(Debug, Clone, Default)]
pub struct StaticKeywordFit(pub KeywordFit);

impl KeywordFitAnalyzer for StaticKeywordFit {
    fn analyze(&self, _resume_text: &str, _job_text: &str) -> Result<KeywordFit> {
        Ok(self.0.clone())
    }
}

/// Dictionary-driven keyword matcher
pub struct SkillKeywordAnalyzer {
    matcher: AhoCorasick,
    skills: Vec<String>,
    fuzzy_threshold: f32,
    max_missing: usize,
}

impl SkillKeywordAnalyzer {
    pub fn new() -> Result<Self> {
        Self::with_custom_skills(Vec::new(), 0.85, 25)
    }

    pub fn with_custom_skills(additional: Vec<String>, fuzzy_threshold: f32, max_missing: usize) -> Result<Self> {
        let mut skills: Vec<String> = Self::default_skill_database()
            .into_iter()
            .chain(additional.into_iter().map(|s| s.trim().to_lowercase()))
            .filter(|s| !s.is_empty())
            .collect();
        skills.sort();
        skills.dedup();
        // Longest first so "test automation" beats "automation"
        skills.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&skills)
            .map_err(|e| TailorError::KeywordAnalysis(format!("Failed to build skill matcher: {}", e)))?;

        Ok(Self {
            matcher,
            skills,
            fuzzy_threshold: fuzzy_threshold.clamp(0.0, 1.0),
            max_missing,
        })
    }

    /// Skills found in `text` with their occurrence counts, whole words only
    pub fn find_skills(&self, text: &str) -> HashMap<String, usize> {
        let bytes = text.as_bytes();
        let mut counts = HashMap::new();

        for mat in self.matcher.find_iter(text) {
            let before_ok = mat.start() == 0 || !bytes[mat.start() - 1].is_ascii_alphanumeric();
            let after_ok = mat.end() == bytes.len() || !bytes[mat.end()].is_ascii_alphanumeric();
            if before_ok && after_ok {
                *counts.entry(self.skills[mat.pattern().as_usize()].clone()).or_insert(0) += 1;
            }
        }

        counts
    }

    /// True when some resume word is close enough to a single-word skill
    fn fuzzy_present(&self, skill: &str, resume_words: &HashSet<String>) -> bool {
        if skill.contains(' ') || skill.len() < 4 {
            return false;
        }
        resume_words
            .iter()
            .any(|word| jaro_winkler(word, skill) as f32 >= self.fuzzy_threshold)
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    fn default_skill_database() -> Vec<String> {
        [
            // QA and testing
            "qa", "quality assurance", "test automation", "automation", "regression testing",
            "functional testing", "performance testing", "load testing", "compatibility testing",
            "certification testing", "localization testing", "exploratory testing", "test plans",
            "test cases", "bug triage", "defect tracking", "selenium", "cypress", "appium", "pytest",
            "junit", "testrail", "jira", "confluence",
            // Engineering
            "python", "javascript", "typescript", "java", "c++", "c#", "golang", "rust", "sql", "bash",
            "api", "rest api", "graphql", "ci/cd", "jenkins", "github actions", "docker", "kubernetes",
            "aws", "azure", "gcp", "git", "linux", "unity", "unreal engine", "perforce",
            // Games and live products
            "live ops", "liveops", "mobile games", "free-to-play", "monetization", "telemetry",
            "a/b testing", "analytics", "game design", "playtesting", "console certification",
            "ios", "android",
            // Ways of working
            "agile", "scrum", "kanban", "stakeholder management", "cross-functional", "mentoring",
            "leadership", "communication", "documentation", "release management", "project management",
            "data analysis", "sla",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

impl KeywordFitAnalyzer for SkillKeywordAnalyzer {
    fn analyze(&self, resume_text: &str, job_text: &str) -> Result<KeywordFit> {
        let job_skills = self.find_skills(job_text);
        if job_skills.is_empty() {
            return Ok(KeywordFit::default());
        }

        let resume_skills = self.find_skills(resume_text);
        let resume_words: HashSet<String> = resume_text
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .filter(|w| w.len() >= 4)
            .collect();

        let mut missing: Vec<(&String, usize)> = Vec::new();
        let mut matched = 0usize;
        for (skill, count) in &job_skills {
            if resume_skills.contains_key(skill) || self.fuzzy_present(skill, &resume_words) {
                matched += 1;
            } else {
                missing.push((skill, *count));
            }
        }

        // Most frequent in the posting first, then alphabetical for determinism
        missing.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        Ok(KeywordFit {
            match_score: matched as f32 / job_skills.len() as f32 * 100.0,
            missing_keywords: missing
                .into_iter()
                .take(self.max_missing)
                .map(|(skill, _)| skill.clone())
                .collect(),
        })
    }
}
