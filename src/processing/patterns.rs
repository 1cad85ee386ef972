//! Lexical patterns shared across pipeline stages

use once_cell::sync::Lazy;
use regex::Regex;

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";

/// `Mon YYYY – Mon YYYY|Present`, with hyphen, en dash, em dash or "to"
pub static DATE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b{m}\s+\d{{4}}\s*(?:[-–—]|to)\s*(?:{m}\s+\d{{4}}|present|current)\b",
        m = MONTH
    ))
    .expect("valid regex")
});

pub static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid regex"));

pub static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://|www\.)\S+|linkedin\.com/in/\S*|github\.com/\S+").expect("valid regex")
});

pub static NA_PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?1[-. ]?)?\(?\b[0-9]{3}\)?[-. ][0-9]{3}[-. ][0-9]{4}\b").expect("valid regex")
});

/// Digit runs joined by phone-style separators
pub static DIGIT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\(?\d[\d\s().\-]*\d").expect("valid regex"));

pub static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:19|20)\d{2}$").expect("valid regex"));

pub static STREET_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\d+\s+\w+(?:\s+\w+){0,4}\s+(?:st|street|ave|avenue|rd|road|blvd|boulevard|dr|drive|ln|lane|ct|court|pl|place|pkwy|parkway|hwy|highway|ter|terrace|cir|circle)\b\.?",
    )
    .expect("valid regex")
});

pub static REFERENCES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\breferences?\b.*\b(?:available|upon request|on request)\b|\bavailable\s+(?:up)?on\s+request\b")
        .expect("valid regex")
});

/// Section headings that end the experience section
pub const TERMINAL_HEADINGS: &[&str] = &[
    "skills",
    "certificates",
    "certifications",
    "education",
    "projects",
    "references",
    "areas of expertise",
    "summary",
    "technical skills",
];

/// Every heading the pipeline recognizes as a section label rather than content
pub const SECTION_HEADINGS: &[&str] = &[
    "professional experience",
    "experience",
    "work experience",
    "work history",
    "employment",
    "employment history",
    "career history",
    "relevant experience",
    "skills",
    "technical skills",
    "core competencies",
    "competencies",
    "areas of expertise",
    "education",
    "certificates",
    "certifications",
    "licenses",
    "projects",
    "references",
    "summary",
    "professional summary",
    "profile",
    "objective",
    "contact",
    "contact information",
    "languages",
    "awards",
    "interests",
    "tools",
    "volunteer experience",
    "achievements",
    "key achievements",
    "highlights",
    "publications",
    "training",
    "professional development",
];

/// Words that mark a short capitalized line as a role rather than a person
pub const ROLE_WORDS: &[&str] = &[
    "qa", "engineer", "manager", "lead", "analyst", "director", "producer", "designer", "tester",
];

/// Heading comparison form: lowercase, no trailing colon, no decoration
fn heading_key(line: &str) -> String {
    line.trim()
        .trim_end_matches(':')
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// A line that is only a section label
pub fn is_section_heading(line: &str) -> bool {
    let key = heading_key(line);
    if key.is_empty() {
        return false;
    }
    if SECTION_HEADINGS.contains(&key.as_str()) {
        return true;
    }

    // Ad-hoc labels such as "Key Achievements:"
    line.trim_end().ends_with(':')
        && key.split_whitespace().count() <= 3
        && !key.chars().any(|c| c.is_ascii_digit())
}

/// A short line starting with one of the terminal headings
pub fn is_terminal_heading(line: &str) -> bool {
    let key = heading_key(line);
    if key.split_whitespace().count() > 4 {
        return false;
    }
    TERMINAL_HEADINGS.iter().any(|heading| {
        key == *heading
            || key
                .strip_prefix(heading)
                .is_some_and(|rest| rest.starts_with(|c: char| !c.is_alphanumeric()))
    })
}

/// Max words on a line still read as the experience heading; longer lines
/// are prose that merely mentions "professional experience"
const EXPERIENCE_HEADING_MAX_WORDS: usize = 6;

/// A short line containing "professional experience" in any case, with any
/// decoration around it
pub fn is_experience_heading(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("professional experience") && line.split_whitespace().count() <= EXPERIENCE_HEADING_MAX_WORDS
}

pub fn is_date_range_line(line: &str) -> bool {
    DATE_RANGE.is_match(line)
}
