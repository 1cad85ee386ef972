//! End-to-end scenarios run through the analysis engine

use resume_tailor::config::Config;
use resume_tailor::processing::guardrail::GuardrailTerms;
use resume_tailor::processing::section::LocatorMode;
use resume_tailor::processing::segmenter::ExtractionTier;
use resume_tailor::processing::{sanitize_keywords, AnalysisEngine, KeywordFit, ResumeAnalysis};

const JOB: &str = "QA Lead for a live ops mobile game. Own regression testing, test automation and telemetry.";

fn run(resume: &str, terms: &GuardrailTerms, missing: &[&str]) -> ResumeAnalysis {
    let fit = KeywordFit {
        match_score: 50.0,
        missing_keywords: missing.iter().map(|k| k.to_string()).collect(),
    };
    AnalysisEngine::new(&Config::default()).analyze(resume, JOB, terms, &fit)
}

fn scopely_terms() -> GuardrailTerms {
    GuardrailTerms {
        target_company: Some("Scopely".to_string()),
        target_products: vec!["Monopoly GO".to_string()],
        blocked_terms: vec![],
    }
}

#[test]
fn test_clean_anchor_yields_one_job() {
    let resume = "ABC Studios — QA Lead (Jan 2021 – Dec 2022)\n• Tested nightly builds across three platforms, filing 120+ defects per release.";
    let analysis = run(resume, &GuardrailTerms::default(), &[]);

    assert_eq!(analysis.debug.tier, ExtractionTier::Segmented);
    assert_eq!(analysis.experience_jobs.len(), 1);
    let job = &analysis.experience_jobs[0];
    assert_eq!(job.company, "ABC Studios");
    assert_eq!(job.title, "QA Lead");
    assert_eq!(job.dates, "Jan 2021 – Dec 2022");
    assert_eq!(
        analysis.bullets,
        vec!["Tested nightly builds across three platforms, filing 120+ defects per release."]
    );
    assert_eq!(analysis.bullet_job_ids, vec![job.id.clone()]);
}

#[test]
fn test_guardrail_blocks_company_and_product_keywords() {
    let resume = "Northwind Games — QA Tester (Mar 2018 - Dec 2020)\n• Collaborated with the Scopely team on Monopoly GO live-ops.";
    let analysis = run(
        resume,
        &scopely_terms(),
        &["Scopely live ops", "monopoly go events", "live ops", "MONOPOLY"],
    );

    assert_eq!(analysis.missing_keywords, vec!["live ops"]);
    assert_eq!(
        analysis.blocked_keywords,
        vec!["Scopely live ops", "monopoly go events", "MONOPOLY"]
    );

    let suggestion = &analysis.bullet_suggestions[0];
    assert_eq!(suggestion.suggested_keywords, vec!["live ops"]);
    for keyword in &suggestion.suggested_keywords {
        let lowered = keyword.to_lowercase();
        assert!(!lowered.contains("scopely") && !lowered.contains("monopoly go"));
    }

    // The sanitizer on its own agrees with the pipeline
    let sanitized = sanitize_keywords(&["Scopely QA", "live ops"], &scopely_terms());
    assert_eq!(sanitized.blocked_keywords, vec!["Scopely QA"]);
    assert_eq!(sanitized.usable_keywords, vec!["live ops"]);
}

#[test]
fn test_short_bullet_rejected_in_every_tier() {
    let anchored = "ABC Studios — QA Lead (Jan 2021 – Dec 2022)\n• Helped team.\n• Owned release sign-off for weekly live events.";
    let glyph_only = "• Helped team.\n• Owned release sign-off for weekly live events.";
    let plain = "Helped team. Owned release sign-off for weekly live events.";

    for resume in [anchored, glyph_only, plain] {
        let analysis = run(resume, &GuardrailTerms::default(), &[]);
        assert!(
            !analysis.bullets.iter().any(|b| b.contains("Helped team")),
            "short bullet survived in {:?}",
            analysis.debug.tier
        );
        assert_eq!(analysis.bullets, vec!["Owned release sign-off for weekly live events."]);
    }
}

#[test]
fn test_no_anchors_uses_sentence_fallback() {
    let resume = "Tested mobile games for several studios. Wrote automation scripts for nightly builds.";
    let analysis = run(resume, &GuardrailTerms::default(), &["test automation"]);

    assert!(!analysis.debug.found_section);
    assert_eq!(analysis.debug.mode, LocatorMode::None);
    assert_eq!(analysis.debug.tier, ExtractionTier::SentenceFallback);
    assert_eq!(
        analysis.bullets,
        vec![
            "Tested mobile games for several studios.",
            "Wrote automation scripts for nightly builds."
        ]
    );
}

#[test]
fn test_glyph_fallback_without_anchors() {
    let resume = "Jordan Rivera\n• Built a device lab covering forty handsets.\n• Triaged crash reports from the public beta.";
    let analysis = run(resume, &GuardrailTerms::default(), &[]);

    assert_eq!(analysis.debug.tier, ExtractionTier::GlyphFallback);
    assert_eq!(analysis.bullets.len(), 2);
    assert!(analysis.experience_jobs.iter().all(|job| job.is_synthetic()));
}

#[test]
fn test_repeated_runs_are_identical() {
    let resume = std::fs::read_to_string("tests/fixtures/sample_resume.txt").unwrap();
    let missing = ["live ops", "test automation", "telemetry", "regression testing"];

    let first = run(&resume, &scopely_terms(), &missing);
    let second = run(&resume, &scopely_terms(), &missing);

    assert_eq!(first.bullets, second.bullets);
    assert_eq!(first.bullet_suggestions, second.bullet_suggestions);
    assert_eq!(first.rewrite_plan, second.rewrite_plan);
    assert_eq!(first.experience_jobs, second.experience_jobs);
}

#[test]
fn test_plan_never_targets_blocked_keywords() {
    let resume = std::fs::read_to_string("tests/fixtures/sample_resume.txt").unwrap();
    let analysis = run(
        &resume,
        &scopely_terms(),
        &["Monopoly GO live ops", "live ops", "regression testing", "scopely"],
    );

    assert!(!analysis.rewrite_plan.is_empty());
    for item in &analysis.rewrite_plan {
        assert!(item.target_keywords.len() <= 3);
        for keyword in &item.target_keywords {
            assert!(!scopely_terms().blocks(keyword));
        }
        assert!(analysis.bullet(&item.bullet_id).is_some());
    }
}

#[test]
fn test_empty_resume_yields_empty_result() {
    let analysis = run("", &GuardrailTerms::default(), &["live ops"]);

    assert_eq!(analysis.debug.tier, ExtractionTier::Empty);
    assert!(analysis.bullets.is_empty());
    assert!(analysis.experience_jobs.is_empty());
    assert!(analysis.rewrite_plan.is_empty());
    assert!(analysis.bullet_scores.is_empty());
}
