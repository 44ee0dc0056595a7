//! Scorer — pluggable, trait-based scoring of a resume against a job description.
//!
//! Default: `FilenameOverlapScorer`, which counts resume file-name tokens that
//! also appear in the job description's file name. The file contents are never
//! read; this is a naive keyword overlap, not relevance ranking.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

/// Score every resume starts from, matches or not.
pub const BASE_SCORE: u32 = 50;
/// Points added per matching resume token.
pub const POINTS_PER_MATCH: u32 = 10;
pub const MAX_SCORE: u32 = 100;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Fixed advice shown next to a score, one per score tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Suggestion {
    /// score ≥ 90
    Excellent,
    /// 70 ≤ score < 90
    Good,
    /// score < 70
    Tailor,
}

impl Suggestion {
    pub fn for_score(score: u32) -> Self {
        if score >= 90 {
            Suggestion::Excellent
        } else if score >= 70 {
            Suggestion::Good
        } else {
            Suggestion::Tailor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Suggestion::Excellent => "Excellent match!",
            Suggestion::Good => "Good match. Add more relevant keywords.",
            Suggestion::Tailor => "Consider tailoring your resume to the job title.",
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of scoring one resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    pub score: u32, // 50 – 100
    pub suggestion: Suggestion,
    /// Resume tokens found in the job description, counted with repetition.
    pub matched: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching the pipeline,
/// the session layer or the handlers.
///
/// Carried in `AppState` as `Arc<dyn ResumeScorer>`.
pub trait ResumeScorer: Send + Sync {
    /// Short backend label, surfaced by the JSON API.
    fn backend(&self) -> &'static str;

    fn score(&self, jd_tokens: &[String], resume_tokens: &[String]) -> Assessment;
}

// ────────────────────────────────────────────────────────────────────────────
// FilenameOverlapScorer
// ────────────────────────────────────────────────────────────────────────────

/// Membership-based overlap: each resume token present anywhere in the JD
/// tokens adds `POINTS_PER_MATCH`, capped at `MAX_SCORE`.
pub struct FilenameOverlapScorer;

impl ResumeScorer for FilenameOverlapScorer {
    fn backend(&self) -> &'static str {
        "filename-overlap"
    }

    fn score(&self, jd_tokens: &[String], resume_tokens: &[String]) -> Assessment {
        score_overlap(jd_tokens, resume_tokens)
    }
}

/// Counts resume tokens that appear in `jd_tokens`. Duplicates on the resume
/// side each count; duplicates on the JD side do not add anything.
pub fn count_matches(jd_tokens: &[String], resume_tokens: &[String]) -> usize {
    let jd: HashSet<&str> = jd_tokens.iter().map(String::as_str).collect();
    resume_tokens
        .iter()
        .filter(|token| jd.contains(token.as_str()))
        .count()
}

/// `min(100, 50 + matched * 10)`.
pub fn score_for_matches(matched: usize) -> u32 {
    let matched = u32::try_from(matched).unwrap_or(u32::MAX);
    BASE_SCORE
        .saturating_add(matched.saturating_mul(POINTS_PER_MATCH))
        .min(MAX_SCORE)
}

fn score_overlap(jd_tokens: &[String], resume_tokens: &[String]) -> Assessment {
    let matched = count_matches(jd_tokens, resume_tokens);
    let score = score_for_matches(matched);
    Assessment {
        score,
        suggestion: Suggestion::for_score(score),
        matched,
    }
}
