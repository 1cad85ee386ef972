//! Output formatters: console, JSON and Markdown

use crate::config::OutputFormat;
use crate::error::Result;
use crate::llm::rewrite::RewriteReview;
use crate::output::report::AnalysisReport;
use crate::processing::verb_strength::{VerbStrengthLabel, VerbStrengthResult};
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting analysis reports
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that dispatches to the formatter for a format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u8) -> String {
        let (badge, color) = match score {
            80..=100 => ("STRONG", Color::Green),
            60..=79 => ("GOOD", Color::Yellow),
            40..=59 => ("PARTIAL", Color::BrightYellow),
            _ => ("WEAK", Color::Red),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_verb_label(&self, result: &VerbStrengthResult) -> String {
        let color = match result.label {
            VerbStrengthLabel::Strong => Color::Green,
            VerbStrengthLabel::OK => Color::Yellow,
            VerbStrengthLabel::Weak => Color::Red,
        };
        self.colorize(&format!("{} {}", result.score, result.label), color)
    }

    /// Verb strength of a single bullet
    pub fn format_verb_strength(&self, bullet: &str, result: &VerbStrengthResult) -> String {
        let mut output = String::new();
        output.push_str(&format!("Bullet: {}\n", bullet));
        output.push_str(&format!("Verb strength: {}\n", self.format_verb_label(result)));
        if let Some(verb) = &result.detected_verb {
            output.push_str(&format!("Detected verb: {}\n", verb));
        }
        for reason in &result.reasons {
            output.push_str(&format!("  • {}\n", reason));
        }
        output
    }

    /// Outcome of the output guardrail plus the before/after quality change
    pub fn format_review(&self, review: &RewriteReview) -> String {
        let mut output = String::new();

        output.push_str(&self.format_header("Rewrite Review", 2));
        output.push_str(&format!("Original:  {}\n", review.original));
        output.push_str(&format!("Rewritten: {}\n\n", review.rewritten_bullet));

        if review.accepted {
            output.push_str(&format!("{}\n", self.colorize("✅ Accepted: no guardrail terms introduced", Color::Green)));
        } else {
            output.push_str(&format!(
                "{} {}\n",
                self.colorize("🚫 Blocked: rewrite introduced", Color::Red),
                self.colorize(&review.injection.blocked_keywords.join(", "), Color::Red)
            ));
        }
        if !review.injection.preserved_terms.is_empty() {
            output.push_str(&format!(
                "Carried over from the original: {}\n",
                review.injection.preserved_terms.join(", ")
            ));
        }

        let delta = if review.delta >= 0 {
            self.colorize(&format!("+{}", review.delta), Color::Green)
        } else {
            self.colorize(&review.delta.to_string(), Color::Red)
        };
        output.push_str(&format!(
            "\nVerb strength: {} → {} ({})\n",
            self.format_verb_label(&review.before),
            self.format_verb_label(&review.after),
            delta
        ));

        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let summary = &report.summary;
        let analysis = &report.analysis;
        let mut output = String::new();

        // Header
        output.push_str(&self.format_header("📊 RESUME REWRITE PLAN", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));

        // Summary
        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "Keyword fit: {}% {}\n",
            summary.match_score_percentage,
            self.format_score_badge(summary.match_score_percentage)
        ));
        output.push_str(&format!("Verdict: {}\n", self.colorize(&summary.verdict, Color::Cyan)));
        output.push_str(&format!(
            "Jobs: {} | Bullets: {} | Weak bullets: {} | Plan items: {}\n",
            summary.job_count, summary.bullet_count, summary.weak_bullet_count, summary.plan_item_count
        ));
        if let Some(average) = summary.average_verb_strength {
            output.push_str(&format!("Average verb strength: {:.0}\n", average));
        }
        for note in &summary.notes {
            output.push_str(&format!("  {} {}\n", self.colorize("ℹ", Color::Blue), note));
        }

        // Guardrail
        if !report.metadata.guardrail_terms.is_empty() {
            output.push_str(&self.format_header("🛡 Guardrail", 3));
            output.push_str(&format!("Protected terms: {}\n", report.metadata.guardrail_terms.join(", ")));
            if !analysis.blocked_keywords.is_empty() {
                output.push_str(&format!(
                    "Withheld keywords: {}\n",
                    self.colorize(&analysis.blocked_keywords.join(", "), Color::Red)
                ));
            }
        }

        if !analysis.missing_keywords.is_empty() {
            output.push_str(&self.format_header("🔍 Missing Keywords", 3));
            output.push_str(&format!("{}\n", analysis.missing_keywords.join(", ")));
        }

        // Rewrite plan
        output.push_str(&self.format_header("📋 Rewrite Plan", 2));
        if analysis.rewrite_plan.is_empty() {
            output.push_str("Nothing to rewrite.\n");
        }
        for (i, item) in analysis.rewrite_plan.iter().enumerate() {
            output.push_str(&format!(
                "{}. {} {}\n",
                i + 1,
                item.original,
                self.colorize(&format!("({})", item.bullet_id), Color::BrightBlack)
            ));
            if !item.target_keywords.is_empty() {
                output.push_str(&format!(
                    "   Keywords: {}\n",
                    self.colorize(&item.target_keywords.join(", "), Color::Green)
                ));
            }
            output.push_str(&format!("   {}\n", item.suggestion_text));
        }

        // Weak bullets
        if !analysis.weak_bullets.is_empty() {
            output.push_str(&self.format_header("⚠️ Weak Bullets", 2));
            for weak in &analysis.weak_bullets {
                output.push_str(&format!(
                    "  • {} {}\n",
                    weak.bullet_text,
                    self.colorize(&format!("(overlap {:.2})", weak.overlap), Color::BrightBlack)
                ));
            }
        }

        if self.detailed {
            output.push_str(&self.format_header("📄 Experience", 2));
            for job in &analysis.experience_jobs {
                let mut heading = [job.company.as_str(), job.title.as_str(), job.dates.as_str()]
                    .iter()
                    .filter(|part| !part.is_empty())
                    .copied()
                    .collect::<Vec<_>>()
                    .join(" | ");
                if let Some(location) = &job.location {
                    heading.push_str(&format!(" | {}", location));
                }
                output.push_str(&self.format_header(&heading, 3));

                for bullet in &job.bullets {
                    let score = analysis
                        .bullet_scores
                        .iter()
                        .find(|s| s.bullet_id == bullet.id)
                        .map(|s| self.format_verb_label(&s.verb_strength))
                        .unwrap_or_default();
                    output.push_str(&format!("  • {} [{}]\n", bullet.text, score));

                    if let Some(suggestion) = analysis.suggestion_for(&bullet.id) {
                        if !suggestion.suggested_keywords.is_empty() {
                            output.push_str(&format!(
                                "    + {}\n",
                                self.colorize(&suggestion.suggested_keywords.join(", "), Color::Green)
                            ));
                        }
                        if !suggestion.blocked_keywords.is_empty() {
                            output.push_str(&format!(
                                "    - {}\n",
                                self.colorize(&suggestion.blocked_keywords.join(", "), Color::Red)
                            ));
                        }
                    }
                }
            }

            output.push_str(&format!(
                "\nLocator: {:?} | Extraction: {:?}\n",
                analysis.debug.mode, analysis.debug.tier
            ));
        }

        // Footer
        output.push_str(&format!(
            "\n{} Generated by resume-tailor v{}\n",
            self.colorize("ℹ️", Color::Blue),
            report.metadata.tool_version
        ));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let summary = &report.summary;
        let analysis = &report.analysis;
        let mut output = String::new();

        output.push_str("# Resume Rewrite Plan\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!(
                "**Resume:** `{}` | **Job:** `{}`\n\n",
                file_name(&report.metadata.resume_file),
                file_name(&report.metadata.job_file)
            ));
        }

        output.push_str("## Summary\n\n");
        output.push_str(&format!("**Keyword fit:** {}%\n\n", summary.match_score_percentage));
        output.push_str(&format!("**Verdict:** {}\n\n", summary.verdict));
        output.push_str("| Jobs | Bullets | Weak bullets | Plan items | Withheld keywords |\n");
        output.push_str("|------|---------|--------------|------------|-------------------|\n");
        output.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n\n",
            summary.job_count,
            summary.bullet_count,
            summary.weak_bullet_count,
            summary.plan_item_count,
            summary.blocked_keyword_count
        ));
        for note in &summary.notes {
            output.push_str(&format!("> {}\n", note));
        }
        if !summary.notes.is_empty() {
            output.push('\n');
        }

        if !analysis.missing_keywords.is_empty() {
            output.push_str(&format!("**Missing keywords:** `{}`\n\n", analysis.missing_keywords.join("`, `")));
        }

        output.push_str("## Rewrite Plan\n\n");
        for (i, item) in analysis.rewrite_plan.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, item.original));
            output.push_str(&format!("   - {}\n", item.suggestion_text));
        }
        output.push('\n');

        if !analysis.weak_bullets.is_empty() {
            output.push_str("## Weak Bullets\n\n");
            for weak in &analysis.weak_bullets {
                output.push_str(&format!("- {} _(overlap {:.2})_\n", weak.bullet_text, weak.overlap));
            }
            output.push('\n');
        }

        output.push_str("## Experience\n\n");
        for job in &analysis.experience_jobs {
            output.push_str(&format!("### {} — {}\n\n", job.company, job.title));
            if !job.dates.is_empty() {
                output.push_str(&format!("_{}_\n\n", job.dates));
            }
            for bullet in &job.bullets {
                output.push_str(&format!("- {}\n", bullet.text));
            }
            output.push('\n');
        }

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!("*Generated by resume-tailor v{}*\n", report.metadata.tool_version));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_plan{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_plan{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_plan{}.md", base_name, timestamp_suffix),
    }
}
