//! Resume text analysis pipeline

pub mod normalizer;
pub mod patterns;
pub mod classifier;
pub mod section;
pub mod segmenter;
pub mod text_processor;
pub mod keyword_fit;
pub mod suggester;
pub mod guardrail;
pub mod rewrite_plan;
pub mod verb_strength;
pub mod analyzer;

pub use analyzer::{AnalysisEngine, ResumeAnalysis};
pub use guardrail::{sanitize_keywords, GuardrailTerms, SanitizedKeywords};
pub use keyword_fit::{KeywordFit, KeywordFitAnalyzer, SkillKeywordAnalyzer, StaticKeywordFit};
pub use verb_strength::{score_bullet, VerbStrengthResult};
