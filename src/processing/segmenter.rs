//! Job block segmentation (pipeline stage 3)
//!
//! Date-range anchor lines are the only delimiter trusted between jobs. The
//! segmenter is a single left-to-right fold over normalized lines carrying a
//! `NoJob | InJob` state, plus the two most recent header-candidate lines.
//!
//! When the fold yields no bullets at all, two fallback tiers run over the
//! whole document: glyph-marked lines anywhere, then plain sentence splitting.

use crate::config::ExtractionConfig;
use crate::processing::classifier::{contact_rejection, is_bullet};
use crate::processing::normalizer::{comparison_form, normalized_lines, strip_bullet_glyph};
use crate::processing::patterns::{is_date_range_line, is_section_heading, DATE_RANGE, ROLE_WORDS};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Id of the synthetic block that holds bullets seen before any anchor
pub const DEFAULT_JOB_ID: &str = "default";
pub const DEFAULT_JOB_TITLE: &str = "Experience";

/// Lines at most this long can be job header context
const HEADER_CONTEXT_MAX_CHARS: usize = 60;

static EMPTY_BRACKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s*\)|\[\s*\]").expect("valid regex"));
static STRONG_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*(?:[—–|·•]|\s-\s)\s*").expect("valid regex"));
/// A `City, ST` or remote marker closing the inline header, set off by a
/// strong separator or wrapped in parentheses
static TRAILING_LOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:[|•·—–]\s*|\(\s*)((?:[A-Z][A-Za-z.'\-]*\s){0,2}[A-Z][A-Za-z.'\-]*,\s*[A-Z]{2}|(?i:remote|hybrid))\s*\)?\s*$",
    )
    .expect("valid regex")
});
static LOCATION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:[A-Z][A-Za-z.'\-]*\s){0,2}[A-Z][A-Za-z.'\-]*,\s*[A-Z]{2}|(?i:remote|hybrid))$")
        .expect("valid regex")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobBlock {
    pub id: String,
    pub company: String,
    pub title: String,
    pub dates: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub bullets: Vec<Bullet>,
}

impl JobBlock {
    pub fn is_synthetic(&self) -> bool {
        self.id == DEFAULT_JOB_ID
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bullet {
    pub id: String,
    pub text: String,
    pub owner_job_id: String,
}

/// Which extraction tier produced the bullets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtractionTier {
    /// Anchor/bullet state machine over the experience slice
    Segmented,
    /// Glyph-marked lines anywhere in the document
    GlyphFallback,
    /// Sentences split out of every content line
    SentenceFallback,
    /// Nothing usable in the input
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletExtraction {
    pub jobs: Vec<JobBlock>,
    pub tier: ExtractionTier,
}

impl BulletExtraction {
    /// All bullets in document order
    pub fn bullets(&self) -> impl Iterator<Item = &Bullet> {
        self.jobs.iter().flat_map(|job| job.bullets.iter())
    }

    pub fn bullet_texts(&self) -> Vec<String> {
        self.bullets().map(|b| b.text.clone()).collect()
    }

    /// Parallel to [`bullet_texts`](Self::bullet_texts): owning job id per bullet
    pub fn bullet_job_ids(&self) -> Vec<String> {
        self.bullets().map(|b| b.owner_job_id.clone()).collect()
    }

    pub fn bullet_count(&self) -> usize {
        self.jobs.iter().map(|job| job.bullets.len()).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct JobHeader {
    company: String,
    title: String,
    dates: String,
    location: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct PendingJob {
    header: Option<JobHeader>,
    bullets: Vec<String>,
}

enum Mode {
    NoJob(Vec<String>),
    InJob(PendingJob),
}

struct Segmenter<'a> {
    config: &'a ExtractionConfig,
    mode: Mode,
    finished: Vec<PendingJob>,
    prev1: Option<String>,
    prev2: Option<String>,
    /// Header-context lines that would pass as bullets if the next anchor
    /// turns out to carry its own header
    deferred: Vec<String>,
    seen: HashSet<String>,
}

impl<'a> Segmenter<'a> {
    fn new(config: &'a ExtractionConfig) -> Self {
        Self {
            config,
            mode: Mode::NoJob(Vec::new()),
            finished: Vec::new(),
            prev1: None,
            prev2: None,
            deferred: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn step(mut self, line: &str, header_context: bool) -> Self {
        if is_date_range_line(line) {
            let inline = InlineHeader::parse(line);
            let deferred = std::mem::take(&mut self.deferred);
            if inline.is_complete() {
                for text in &deferred {
                    self.push_bullet(text);
                }
            }
            let header = inline.resolve(self.prev2.take(), self.prev1.take());
            self.finish_current();
            self.mode = Mode::InJob(PendingJob {
                header: Some(header),
                bullets: Vec::new(),
            });
            return self;
        }

        if is_section_heading(line) {
            return self;
        }

        if let Some(stripped) = strip_bullet_glyph(line) {
            if is_bullet(stripped, self.config.explicit_bullet_min_chars) {
                self.push_bullet(stripped);
            }
            return self;
        }

        if is_bullet(line, self.config.bulletish_min_chars) {
            if !header_context {
                self.push_bullet(line);
                return self;
            }
            self.deferred.push(line.to_string());
        }

        if contact_rejection(line).is_none() {
            self.prev2 = self.prev1.replace(line.to_string());
        }
        self
    }

    fn push_bullet(&mut self, text: &str) {
        if !self.seen.insert(comparison_form(text)) {
            return;
        }
        match &mut self.mode {
            Mode::NoJob(bullets) => bullets.push(text.to_string()),
            Mode::InJob(job) => job.bullets.push(text.to_string()),
        }
    }

    /// Close the open block; blocks without bullets are dropped as noise
    fn finish_current(&mut self) {
        let pending = match std::mem::replace(&mut self.mode, Mode::NoJob(Vec::new())) {
            Mode::NoJob(bullets) => PendingJob { header: None, bullets },
            Mode::InJob(job) => job,
        };
        if !pending.bullets.is_empty() {
            self.finished.push(pending);
        } else if let Some(header) = pending.header {
            debug!("Discarding job header without bullets: {:?}", header);
        }
    }

    fn finish(mut self) -> Vec<PendingJob> {
        self.finish_current();
        self.finished
    }
}

/// Segment an experience slice into job blocks (the primary tier only)
pub fn segment_jobs(experience_text: &str, config: &ExtractionConfig) -> Vec<JobBlock> {
    let lines: Vec<String> = normalized_lines(experience_text)
        .into_iter()
        .map(|line| line.text)
        .collect();
    let header_context = header_context_flags(&lines);

    let segmenter = lines
        .iter()
        .zip(header_context)
        .fold(Segmenter::new(config), |state, (line, is_header)| state.step(line, is_header));

    assign_ids(segmenter.finish())
}

/// Run the segmenter, falling back through the glyph and sentence tiers
/// over `full_text` when no anchored job collected a bullet.
pub fn extract_bullets(full_text: &str, experience_text: &str, config: &ExtractionConfig) -> BulletExtraction {
    let jobs = segment_jobs(experience_text, config);
    if jobs.iter().any(|job| !job.is_synthetic()) {
        return BulletExtraction {
            jobs,
            tier: ExtractionTier::Segmented,
        };
    }

    let lines: Vec<String> = normalized_lines(full_text)
        .into_iter()
        .map(|line| line.text)
        .filter(|line| !is_date_range_line(line))
        .collect();

    let glyph_bullets = collect_unique(lines.iter().filter_map(|line| {
        strip_bullet_glyph(line)
            .filter(|stripped| is_bullet(stripped, config.fallback_bullet_min_chars))
            .map(str::to_string)
    }));
    if !glyph_bullets.is_empty() {
        debug!("Segmenter found no bullets, using {} glyph lines", glyph_bullets.len());
        return BulletExtraction {
            jobs: assign_ids(vec![PendingJob {
                header: None,
                bullets: glyph_bullets,
            }]),
            tier: ExtractionTier::GlyphFallback,
        };
    }

    let sentences = collect_unique(
        lines
            .iter()
            .filter(|line| !is_section_heading(line))
            .flat_map(|line| {
                let content = strip_bullet_glyph(line).unwrap_or(line);
                content
                    .unicode_sentences()
                    .map(|s| s.trim().to_string())
                    .collect::<Vec<_>>()
            })
            .filter(|sentence| is_bullet(sentence, config.sentence_min_chars)),
    );
    if !sentences.is_empty() {
        debug!("Falling back to {} split sentences", sentences.len());
        return BulletExtraction {
            jobs: assign_ids(vec![PendingJob {
                header: None,
                bullets: sentences,
            }]),
            tier: ExtractionTier::SentenceFallback,
        };
    }

    BulletExtraction {
        jobs: Vec::new(),
        tier: ExtractionTier::Empty,
    }
}

fn collect_unique(candidates: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    candidates
        .filter(|text| seen.insert(comparison_form(text)))
        .collect()
}

/// Marks short unpunctuated lines right above an anchor as header context
/// so titles such as "Senior Quality Assurance Engineer" never become bullets.
fn header_context_flags(lines: &[String]) -> Vec<bool> {
    let is_anchor: Vec<bool> = lines.iter().map(|line| is_date_range_line(line)).collect();
    let plain = |line: &str| {
        strip_bullet_glyph(line).is_none()
            && !is_section_heading(line)
            && line.chars().count() <= HEADER_CONTEXT_MAX_CHARS
            && !line.ends_with('.')
    };

    (0..lines.len())
        .map(|idx| {
            if is_anchor[idx] || !plain(&lines[idx]) {
                return false;
            }
            let next_is_anchor = is_anchor.get(idx + 1).copied().unwrap_or(false);
            let second_is_anchor = is_anchor.get(idx + 2).copied().unwrap_or(false)
                && lines.get(idx + 1).is_some_and(|next| plain(next) && !is_anchor[idx + 1]);
            next_is_anchor || second_is_anchor
        })
        .collect()
}

/// What the anchor line itself says about the job
struct InlineHeader {
    dates: String,
    parts: Vec<String>,
    location: Option<String>,
}

fn trim_separators(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || matches!(c, '|' | '•' | '·' | '—' | '–' | '-' | ',' | ':' | ';'))
}

impl InlineHeader {
    fn parse(anchor_line: &str) -> Self {
        let dates = DATE_RANGE
            .find(anchor_line)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        let without_dates = DATE_RANGE.replace(anchor_line, "");
        let without_brackets = EMPTY_BRACKETS.replace_all(&without_dates, "");
        let mut rest = trim_separators(&without_brackets).to_string();

        let mut location = None;
        let trailing = TRAILING_LOCATION.captures(&rest).and_then(|caps| {
            let whole = caps.get(0)?;
            let found = caps.get(1)?.as_str().trim().to_string();
            (!has_role_word(&found)).then_some((whole.start(), found))
        });
        if let Some((start, found)) = trailing {
            location = Some(found);
            rest = trim_separators(&rest[..start]).to_string();
        }

        Self {
            dates,
            parts: split_header_parts(&rest),
            location,
        }
    }

    /// Company and title both present on the anchor line
    fn is_complete(&self) -> bool {
        self.parts.len() >= 2
    }

    /// Fill the header, borrowing up to two preceding lines when the anchor
    /// line alone does not name both company and title
    fn resolve(self, prev2: Option<String>, prev1: Option<String>) -> JobHeader {
        let InlineHeader {
            dates,
            parts,
            mut location,
        } = self;

        if parts.len() >= 2 {
            let mut parts = parts.into_iter();
            let company = parts.next().unwrap_or_default();
            let title = parts.next().unwrap_or_default();
            return JobHeader {
                company,
                title,
                dates,
                location,
            };
        }

        let mut candidates: Vec<String> = Vec::new();
        for candidate in [prev2, prev1].into_iter().flatten() {
            if location.is_none() && LOCATION_LINE.is_match(&candidate) {
                location = Some(candidate);
            } else {
                candidates.push(candidate);
            }
        }

        let (mut company, mut title) = match candidates.as_slice() {
            [company, title] => (company.clone(), title.clone()),
            [single] if has_role_word(single) => (String::new(), single.clone()),
            [single] => (single.clone(), String::new()),
            _ => (String::new(), String::new()),
        };

        // A lone inline part fills whichever slot the context lines left empty
        if let Some(inline) = parts.into_iter().next() {
            if company.is_empty() {
                company = inline;
            } else if title.is_empty() {
                title = inline;
            }
        }

        JobHeader {
            company,
            title,
            dates,
            location,
        }
    }
}

fn split_header_parts(rest: &str) -> Vec<String> {
    let clean = |part: &str| {
        part.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '(' | ')' | '[' | ']' | ':' | ';' | '-'))
            .to_string()
    };

    let strong: Vec<String> = STRONG_SEPARATOR
        .split(rest)
        .map(clean)
        .filter(|part| !part.is_empty())
        .collect();
    if strong.len() >= 2 {
        return strong;
    }

    rest.split(',').map(clean).filter(|part| !part.is_empty()).collect()
}

fn has_role_word(text: &str) -> bool {
    text.split_whitespace()
        .any(|word| ROLE_WORDS.contains(&word.to_lowercase().trim_matches(|c: char| !c.is_alphanumeric())))
}

/// Stable ids: hash of the normalized header plus its ordinal
fn job_id(header: &JobHeader, ordinal: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(comparison_form(&header.company).as_bytes());
    hasher.update(b"|");
    hasher.update(comparison_form(&header.title).as_bytes());
    hasher.update(b"|");
    hasher.update(comparison_form(&header.dates).as_bytes());
    hasher.update(b"|");
    hasher.update(ordinal.to_string().as_bytes());
    let hash = format!("{:x}", hasher.finalize());
    format!("job-{}", &hash[..12])
}

fn assign_ids(pending: Vec<PendingJob>) -> Vec<JobBlock> {
    let mut bullet_index = 0usize;

    pending
        .into_iter()
        .enumerate()
        .map(|(ordinal, job)| {
            let (id, header) = match job.header {
                Some(header) => (job_id(&header, ordinal), header),
                None => (
                    DEFAULT_JOB_ID.to_string(),
                    JobHeader {
                        title: DEFAULT_JOB_TITLE.to_string(),
                        ..JobHeader::default()
                    },
                ),
            };

            let bullets = job
                .bullets
                .into_iter()
                .map(|text| {
                    let bullet = Bullet {
                        id: format!("b{}", bullet_index),
                        text,
                        owner_job_id: id.clone(),
                    };
                    bullet_index += 1;
                    bullet
                })
                .collect();

            JobBlock {
                id,
                company: header.company,
                title: header.title,
                dates: header.dates,
                location: header.location,
                bullets,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ExtractionConfig {
        ExtractionConfig::default()
    }

    #[test]
    fn test_inline_header_with_parenthesized_dates() {
        let text = "ABC Studios — QA Lead (Jan 2021 – Dec 2022)\n• Tested nightly builds across three platforms, filing 120+ defects per release.";
        let jobs = segment_jobs(text, &config());

        assert_eq!(jobs.len(), 1);
        let job = &jobs[0];
        assert_eq!(job.company, "ABC Studios");
        assert_eq!(job.title, "QA Lead");
        assert_eq!(job.dates, "Jan 2021 – Dec 2022");
        assert_eq!(job.bullets.len(), 1);
        assert_eq!(
            job.bullets[0].text,
            "Tested nightly builds across three platforms, filing 120+ defects per release."
        );
        assert_eq!(job.bullets[0].owner_job_id, job.id);
    }

    #[test]
    fn test_stacked_header_lines() {
        let text = "Professional Experience\nKing Digital\nSenior Quality Assurance Engineer\nMar 2019 - Present\n- Automated smoke tests for every release candidate build\n- Triaged crash reports with the engine team weekly\nZynga\nQA Tester\nJune 2016 - Feb 2019\n• Executed regression passes on mobile slot titles";
        let jobs = segment_jobs(text, &config());

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].company, "King Digital");
        assert_eq!(jobs[0].title, "Senior Quality Assurance Engineer");
        assert_eq!(jobs[0].dates, "Mar 2019 - Present");
        assert_eq!(jobs[0].bullets.len(), 2);
        assert_eq!(jobs[1].company, "Zynga");
        assert_eq!(jobs[1].title, "QA Tester");
        assert_eq!(jobs[1].bullets[0].id, "b2");
    }

    #[test]
    fn test_location_split_from_inline_header() {
        let text = "Riot Games | Test Lead | Los Angeles, CA | Feb 2020 – Present\n• Led a team of six testers through two champion launches";
        let jobs = segment_jobs(text, &config());

        assert_eq!(jobs[0].company, "Riot Games");
        assert_eq!(jobs[0].title, "Test Lead");
        assert_eq!(jobs[0].location.as_deref(), Some("Los Angeles, CA"));
    }

    #[test]
    fn test_role_suffix_is_not_a_location() {
        let text = "Google — Software Engineer, QA (Jan 2020 – Dec 2022)\n• Built load-test harnesses for the matchmaking service\nInitech | Manager, IT | Jan 2018 - Dec 2019\n• Ran vendor reviews for the help desk tooling";
        let jobs = segment_jobs(text, &config());

        assert_eq!(jobs[0].company, "Google");
        assert_eq!(jobs[0].title, "Software Engineer, QA");
        assert_eq!(jobs[0].location, None);
        assert_eq!(jobs[1].company, "Initech");
        assert_eq!(jobs[1].title, "Manager, IT");
        assert_eq!(jobs[1].location, None);
    }

    #[test]
    fn test_parenthesized_location() {
        let text = "Acme Games — QA Lead (Austin, TX) (Jan 2020 – Present)\n• Led certification passes for four console launches";
        let jobs = segment_jobs(text, &config());

        assert_eq!(jobs[0].company, "Acme Games");
        assert_eq!(jobs[0].title, "QA Lead");
        assert_eq!(jobs[0].location.as_deref(), Some("Austin, TX"));
    }

    #[test]
    fn test_unmarked_bullet_above_inline_anchor_stays_with_previous_job() {
        let text = "ABC Studios — QA Lead (Jan 2021 – Dec 2022)\nOwned the smoke test checklist for releases\nNorthwind Games | QA Tester | Mar 2018 - Dec 2020\n• Wrote test plans for console certification submissions.";
        let jobs = segment_jobs(text, &config());

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].company, "ABC Studios");
        assert_eq!(jobs[0].bullets.len(), 1);
        assert_eq!(jobs[0].bullets[0].text, "Owned the smoke test checklist for releases");
        assert_eq!(jobs[1].company, "Northwind Games");
        assert_eq!(jobs[1].title, "QA Tester");
        assert_eq!(jobs[1].bullets[0].text, "Wrote test plans for console certification submissions.");
    }

    #[test]
    fn test_job_without_bullets_is_dropped() {
        let text = "Acme\nIntern\nJan 2015 - May 2015\nGlobex\nQA Analyst\nJun 2015 - Dec 2018\n• Documented test plans for the billing platform";
        let jobs = segment_jobs(text, &config());

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].company, "Globex");
    }

    #[test]
    fn test_bullets_before_anchor_go_to_default_block() {
        let text = "• Wrote onboarding docs for new contractors\nGlobex — QA Analyst — Jun 2015 - Dec 2018\n• Documented test plans for the billing platform";
        let jobs = segment_jobs(text, &config());

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id, DEFAULT_JOB_ID);
        assert_eq!(jobs[0].title, DEFAULT_JOB_TITLE);
        assert!(jobs[1].id.starts_with("job-"));
    }

    #[test]
    fn test_unmarked_paragraph_lines_are_bullets() {
        let text = "Globex — QA Analyst — Jun 2015 - Dec 2018\nOwned the regression plan for quarterly billing releases.\nShort line";
        let jobs = segment_jobs(text, &config());

        assert_eq!(jobs[0].bullets.len(), 1);
        assert_eq!(jobs[0].bullets[0].text, "Owned the regression plan for quarterly billing releases.");
    }

    #[test]
    fn test_duplicates_removed_case_insensitively() {
        let text = "Globex — QA Analyst — Jun 2015 - Dec 2018\n• Documented test plans for billing\n• documented   TEST plans for billing";
        let jobs = segment_jobs(text, &config());

        assert_eq!(jobs[0].bullets.len(), 1);
        assert_eq!(jobs[0].bullets[0].text, "Documented test plans for billing");
    }

    #[test]
    fn test_ids_are_stable_across_calls() {
        let text = "ABC Studios — QA Lead (Jan 2021 – Dec 2022)\n• Tested nightly builds across three platforms";
        let first = segment_jobs(text, &config());
        let second = segment_jobs(text, &config());
        assert_eq!(first[0].id, second[0].id);
    }

    #[test]
    fn test_contact_lines_never_become_bullets_or_headers() {
        let text = "jane@example.com\n(555) 123-4567\nGlobex — QA Analyst — Jun 2015 - Dec 2018\n• Call me at 555-123-4567 for details\n• Documented test plans for the billing platform";
        let jobs = segment_jobs(text, &config());

        assert_eq!(jobs[0].bullets.len(), 1);
        assert_eq!(jobs[0].company, "Globex");
    }

    #[test]
    fn test_glyph_fallback() {
        let full = "Jane Doe\nSkills\n• Automated regression suites with Python";
        let extraction = extract_bullets(full, "Jane Doe", &config());

        assert_eq!(extraction.tier, ExtractionTier::GlyphFallback);
        assert_eq!(extraction.bullet_texts(), vec!["Automated regression suites with Python"]);
        assert_eq!(extraction.bullet_job_ids(), vec![DEFAULT_JOB_ID]);
    }

    #[test]
    fn test_sentence_fallback() {
        let full = "Tested games. Wrote many detailed bug reports for producers. Helped team.";
        let extraction = extract_bullets(full, "", &config());

        assert_eq!(extraction.tier, ExtractionTier::SentenceFallback);
        assert_eq!(extraction.bullet_texts(), vec!["Wrote many detailed bug reports for producers."]);
    }

    #[test]
    fn test_unanchored_text_skips_primary_tier() {
        let full = "Tested mobile games for several studios. Wrote automation scripts for nightly builds.";
        let extraction = extract_bullets(full, full, &config());

        assert_eq!(extraction.tier, ExtractionTier::SentenceFallback);
        assert_eq!(extraction.bullet_count(), 2);
    }

    #[test]
    fn test_empty_input() {
        let extraction = extract_bullets("", "", &config());
        assert_eq!(extraction.tier, ExtractionTier::Empty);
        assert_eq!(extraction.bullet_count(), 0);
    }
}
