//! Rewrite generator integration

pub mod prompts;
pub mod rewrite;

pub use rewrite::{RewriteGenerator, RewriteRequest, RewriteReview};
