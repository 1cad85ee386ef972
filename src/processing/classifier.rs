//! Bullet line classification (pipeline stage 4)
//!
//! One gatekeeper predicate decides whether a line may become a bullet.
//! Every acceptance path (glyph bullets, unmarked sentences, fallbacks)
//! goes through [`classify`] so the exclusion rules live in one place.

use crate::processing::patterns::{
    is_section_heading, DIGIT_RUN, EMAIL, NA_PHONE, REFERENCES, ROLE_WORDS, STREET_ADDRESS, URL, YEAR,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    TooShort,
    Email,
    Url,
    Phone,
    References,
    PersonName,
    Address,
    Heading,
}

/// Accept `line` as a bullet if it is at least `min_chars` long and carries
/// no contact details, references, names, addresses or headings.
pub fn classify(line: &str, min_chars: usize) -> Result<(), Rejection> {
    let line = line.trim();
    if line.chars().count() < min_chars {
        return Err(Rejection::TooShort);
    }
    match content_rejection(line) {
        Some(reason) => Err(reason),
        None => Ok(()),
    }
}

pub fn is_bullet(line: &str, min_chars: usize) -> bool {
    classify(line, min_chars).is_ok()
}

/// Content-based rejection, independent of length
pub fn content_rejection(line: &str) -> Option<Rejection> {
    if let Some(reason) = contact_rejection(line) {
        return Some(reason);
    }
    if is_section_heading(line) {
        return Some(Rejection::Heading);
    }
    if looks_like_person_name(line) {
        return Some(Rejection::PersonName);
    }
    None
}

/// Rejections that also disqualify a line from being a job header.
///
/// Person names are deliberately absent: company names such as
/// "Ubisoft Montreal" share their shape.
pub fn contact_rejection(line: &str) -> Option<Rejection> {
    if EMAIL.is_match(line) {
        Some(Rejection::Email)
    } else if URL.is_match(line) {
        Some(Rejection::Url)
    } else if has_phone_like_run(line) {
        Some(Rejection::Phone)
    } else if REFERENCES.is_match(line) {
        Some(Rejection::References)
    } else if STREET_ADDRESS.is_match(line.trim()) {
        Some(Rejection::Address)
    } else {
        None
    }
}

fn has_phone_like_run(line: &str) -> bool {
    if NA_PHONE.is_match(line) {
        return true;
    }

    DIGIT_RUN.find_iter(line).any(|run| {
        let groups: Vec<&str> = run
            .as_str()
            .split(|c: char| !c.is_ascii_digit())
            .filter(|g| !g.is_empty())
            .collect();

        // "2019-2022" and similar year ranges are dates, not phones
        if groups.iter().all(|g| YEAR.is_match(g)) {
            return false;
        }

        let digits: usize = groups.iter().map(|g| g.len()).sum();
        (7..=15).contains(&digits)
    })
}

/// 2-3 capitalized words, nothing but letters, no role vocabulary
fn looks_like_person_name(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    if !(2..=3).contains(&words.len()) {
        return false;
    }

    let shaped_like_name = words.iter().all(|word| {
        let mut chars = word.chars();
        let starts_upper = chars.next().is_some_and(|c| c.is_uppercase());
        starts_upper && word.chars().all(|c| c.is_alphabetic() || c == '-' || c == '\'')
    });
    if !shaped_like_name {
        return false;
    }

    !words
        .iter()
        .any(|word| ROLE_WORDS.contains(&word.to_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_real_bullet() {
        assert!(is_bullet(
            "Tested nightly builds across three platforms, filing 120+ defects per release.",
            15
        ));
    }

    #[test]
    fn test_short_line_rejected() {
        assert_eq!(classify("Helped team.", 15), Err(Rejection::TooShort));
    }

    #[test]
    fn test_contact_lines_rejected() {
        assert_eq!(classify("Reach me at jane.doe@example.com anytime", 15), Err(Rejection::Email));
        assert_eq!(classify("Portfolio: https://janedoe.dev/work", 15), Err(Rejection::Url));
        assert_eq!(classify("linkedin.com/in/janedoe", 15), Err(Rejection::Url));
        assert_eq!(classify("Phone: (555) 123-4567", 15), Err(Rejection::Phone));
        assert_eq!(classify("Mobile +44 7700 900123", 15), Err(Rejection::Phone));
        assert_eq!(classify("References available upon request", 15), Err(Rejection::References));
        assert_eq!(classify("1234 Maple Street, Springfield", 15), Err(Rejection::Address));
    }

    #[test]
    fn test_year_ranges_are_not_phones() {
        assert!(is_bullet("Shipped five console titles between 2019-2022 on schedule", 15));
        assert!(is_bullet("Maintained regression suites from 2015 - 2018 for two studios", 15));
    }

    #[test]
    fn test_person_names() {
        assert_eq!(content_rejection("Jane Doe"), Some(Rejection::PersonName));
        assert_eq!(content_rejection("Mary Anne Smith"), Some(Rejection::PersonName));
        assert_eq!(content_rejection("Senior QA Lead"), None);
        assert_eq!(content_rejection("Game Tester"), None);
        assert_eq!(contact_rejection("Ubisoft Montreal"), None);
    }

    #[test]
    fn test_headings_rejected() {
        assert_eq!(content_rejection("Professional Experience"), Some(Rejection::Heading));
        assert_eq!(content_rejection("Technical Skills:"), Some(Rejection::Heading));
    }
}
