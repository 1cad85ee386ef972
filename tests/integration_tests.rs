//! Integration tests for the resume tailor

use resume_tailor::config::{Config, OutputFormat};
use resume_tailor::error::TailorError;
use resume_tailor::input::manager::InputManager;
use resume_tailor::llm::rewrite::{prepare_rewrite_request, rewrite_bullet, RewriteGenerator, RewriteRequest};
use resume_tailor::output::{AnalysisReport, ReportGenerator};
use resume_tailor::processing::guardrail::GuardrailTerms;
use resume_tailor::processing::section::LocatorMode;
use resume_tailor::processing::segmenter::ExtractionTier;
use resume_tailor::processing::{AnalysisEngine, KeywordFit, SkillKeywordAnalyzer, StaticKeywordFit};
use std::path::Path;

fn scopely_terms() -> GuardrailTerms {
    GuardrailTerms {
        target_company: Some("Scopely".to_string()),
        target_products: vec!["Monopoly GO".to_string()],
        blocked_terms: vec![],
    }
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let result = manager.extract_text(path).await;
    assert!(result.is_ok());

    let text = result.unwrap();
    assert!(text.contains("Jordan Rivera"));
    assert!(text.contains("PROFESSIONAL EXPERIENCE"));
    assert!(text.contains("• Tested nightly builds"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.md");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("Jordan Rivera"));
    assert!(text.contains("• Tested nightly builds across three platforms, filing 120+ defects per release."));
    // Should not contain markdown formatting
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let result = manager.extract_text(Path::new("tests/fixtures/unsupported.xyz")).await;
    assert!(matches!(result, Err(TailorError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let result = manager.extract_text(Path::new("tests/fixtures/nonexistent.txt")).await;
    assert!(matches!(result, Err(TailorError::InvalidInput(_))));
}

#[tokio::test]
async fn test_docx_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resume.docx");
    std::fs::write(&path, b"PK\x03\x04").unwrap();

    let mut manager = InputManager::new();
    let result = manager.extract_text(&path).await;
    assert!(matches!(result, Err(TailorError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_fixture_resume_end_to_end() {
    let mut manager = InputManager::new();
    let resume = manager.extract_text(Path::new("tests/fixtures/sample_resume.txt")).await.unwrap();
    let job = manager.extract_text(Path::new("tests/fixtures/job_posting.txt")).await.unwrap();

    let config = Config::default();
    let analyzer = SkillKeywordAnalyzer::new().unwrap();
    let analysis = AnalysisEngine::new(&config)
        .analyze_with(&resume, &job, &scopely_terms(), &analyzer)
        .unwrap();

    assert_eq!(analysis.debug.mode, LocatorMode::Heading);
    assert_eq!(analysis.debug.tier, ExtractionTier::Segmented);

    assert_eq!(analysis.experience_jobs.len(), 2);
    assert_eq!(analysis.experience_jobs[0].company, "ABC Studios");
    assert_eq!(analysis.experience_jobs[0].title, "QA Lead");
    assert_eq!(analysis.experience_jobs[1].company, "Northwind Games");
    assert_eq!(analysis.experience_jobs[1].title, "Senior QA Tester");
    assert_eq!(analysis.experience_jobs[1].dates, "Mar 2018 - Dec 2020");

    assert_eq!(analysis.bullets.len(), 5);
    assert!(!analysis.bullets.iter().any(|b| b == "Helped team."));
    assert!(!analysis.bullets.iter().any(|b| b.contains('@') || b.contains("References")));
    assert!(analysis
        .bullets
        .contains(&"Owned the smoke test checklist used by every release candidate.".to_string()));

    assert!(analysis.missing_keywords.contains(&"telemetry".to_string()));
    assert!(analysis.missing_keywords.contains(&"test automation".to_string()));
    assert!(analysis.match_score > 0.0 && analysis.match_score < 100.0);
}

#[test]
fn test_external_fit_is_sanitized_end_to_end() {
    let resume = std::fs::read_to_string("tests/fixtures/sample_resume.txt").unwrap();
    let job = std::fs::read_to_string("tests/fixtures/job_posting.txt").unwrap();
    let fit = StaticKeywordFit(KeywordFit {
        match_score: 61.0,
        missing_keywords: vec![
            "Monopoly GO live ops".to_string(),
            "live ops".to_string(),
            "scopely".to_string(),
            "regression testing".to_string(),
        ],
    });

    let analysis = AnalysisEngine::new(&Config::default())
        .analyze_with(&resume, &job, &scopely_terms(), &fit)
        .unwrap();

    assert_eq!(analysis.missing_keywords, vec!["live ops", "regression testing"]);
    assert_eq!(analysis.blocked_keywords, vec!["Monopoly GO live ops", "scopely"]);
    for item in &analysis.rewrite_plan {
        for keyword in &item.target_keywords {
            assert!(!scopely_terms().blocks(keyword), "plan leaked {}", keyword);
        }
    }
    assert!(!analysis.rewrite_plan.is_empty());
    assert!(!analysis.debug.plan_degraded);

    let report = AnalysisReport::from_analysis(analysis, &scopely_terms(), "sample_resume.txt", "job_posting.txt");
    let json = ReportGenerator::with_options(false, false, false, true)
        .generate_report(&report, &OutputFormat::Json)
        .unwrap();
    assert!(json.contains("\"blockedKeywords\""));
    assert!(!json.contains("\"suggestedKeywords\":[\"scopely\""));
}

struct EchoKeywordsGenerator;

impl RewriteGenerator for EchoKeywordsGenerator {
    async fn generate(&self, request: &RewriteRequest) -> resume_tailor::Result<String> {
        // A careless generator that name-drops the target product
        let rewritten = format!(
            "Drove {} for Monopoly GO across 4 release trains.",
            request.keywords.join(" and ")
        );
        Ok(serde_json::json!({ "rewrittenBullet": rewritten, "blockedKeywords": [] }).to_string())
    }
}

#[tokio::test]
async fn test_generator_injection_is_caught() {
    let request = prepare_rewrite_request(
        "Helped the team with regression testing for live events.",
        &["regression testing", "Monopoly GO events"],
        &scopely_terms(),
    );
    assert_eq!(request.keywords, vec!["regression testing"]);

    let review = rewrite_bullet(&EchoKeywordsGenerator, &request).await.unwrap();
    assert!(!review.accepted);
    assert_eq!(review.injection.blocked_keywords, vec!["Monopoly GO"]);
    assert!(review.after.score > review.before.score);
}
