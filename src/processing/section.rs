//! Experience section location (pipeline stage 2)

use crate::processing::patterns::{is_date_range_line, is_experience_heading, is_terminal_heading};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocatorMode {
    /// Found a "Professional Experience" heading
    Heading,
    /// Started at the first long date-range line
    Heuristic,
    /// Nothing found, the whole text is used
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceSection {
    pub experience_text: String,
    pub found_section: bool,
    pub mode: LocatorMode,
}

/// Find the employment-history slice of normalized resume text.
///
/// Priority: heading, then the first date-range line of at least
/// `anchor_min_chars` characters, then the full text unchanged.
pub fn locate_experience(text: &str, anchor_min_chars: usize) -> ExperienceSection {
    let lines: Vec<&str> = text.lines().collect();

    let start = lines
        .iter()
        .position(|line| is_experience_heading(line))
        .map(|idx| (idx, LocatorMode::Heading))
        .or_else(|| {
            lines
                .iter()
                .position(|line| is_date_range_line(line) && line.chars().count() >= anchor_min_chars)
                .map(|idx| (idx, LocatorMode::Heuristic))
        });

    let Some((start_idx, mode)) = start else {
        debug!("No experience heading or date anchor found, using full text");
        return ExperienceSection {
            experience_text: text.to_string(),
            found_section: false,
            mode: LocatorMode::None,
        };
    };

    let end_idx = lines
        .iter()
        .enumerate()
        .skip(start_idx + 1)
        .find(|(_, line)| is_terminal_heading(line))
        .map(|(idx, _)| idx)
        .unwrap_or(lines.len());

    debug!(
        "Experience section located by {:?}: lines {}..{} of {}",
        mode,
        start_idx,
        end_idx,
        lines.len()
    );

    ExperienceSection {
        experience_text: lines[start_idx..end_idx].join("\n"),
        found_section: true,
        mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WITH_HEADING: &str = "Jane Doe\nSummary\nSeasoned QA lead.\nProfessional Experience\nABC Studios\nQA Lead\nJan 2021 – Dec 2022\n• Tested nightly builds across platforms\nEducation\nBSc Computer Science";

    #[test]
    fn test_heading_mode_slices_to_terminal_heading() {
        let section = locate_experience(WITH_HEADING, 25);
        assert_eq!(section.mode, LocatorMode::Heading);
        assert!(section.found_section);
        assert!(section.experience_text.starts_with("Professional Experience"));
        assert!(section.experience_text.ends_with("• Tested nightly builds across platforms"));
        assert!(!section.experience_text.contains("Education"));
    }

    #[test]
    fn test_decorated_heading() {
        let text = "Jane Doe\nPROFESSIONAL EXPERIENCE —\nABC Studios — QA Lead (Jan 2021 – Dec 2022)\n• Tested nightly builds\nSKILLS\nJira";
        let section = locate_experience(text, 25);
        assert_eq!(section.mode, LocatorMode::Heading);
        assert!(section.experience_text.starts_with("PROFESSIONAL EXPERIENCE —"));
        assert!(!section.experience_text.contains("Jira"));
    }

    #[test]
    fn test_heuristic_mode_uses_long_anchor() {
        let text = "Jane Doe\nJan 2021 – Dec 2022\nABC Studios — QA Lead (Jan 2021 – Dec 2022)\n• Tested builds\nSkills\nJira";
        let section = locate_experience(text, 25);
        assert_eq!(section.mode, LocatorMode::Heuristic);
        assert!(section.experience_text.starts_with("ABC Studios"));
        assert!(!section.experience_text.contains("Jira"));
    }

    #[test]
    fn test_no_anchor_returns_full_text() {
        let text = "Jane Doe\nI like testing games and writing detailed reports.";
        let section = locate_experience(text, 25);
        assert_eq!(section.mode, LocatorMode::None);
        assert!(!section.found_section);
        assert_eq!(section.experience_text, text);
    }

    #[test]
    fn test_empty_text() {
        let section = locate_experience("", 25);
        assert_eq!(section.mode, LocatorMode::None);
        assert_eq!(section.experience_text, "");
    }
}
