use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::{AppError, MissingInput};
use crate::models::upload::{UploadForm, JOB_DESCRIPTION_FIELD, RESUMES_FIELD};
use crate::ranking::ranker::{rank, Medal};
use crate::ranking::scorer::Suggestion;
use crate::ranking::score_batch;
use crate::ranking::tokenizer::tokenize;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct JobDescriptionSummary {
    pub name: String,
    pub tokens: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RankingEntry {
    pub rank: usize,
    pub medal: Option<Medal>,
    pub name: String,
    pub score: u32,
    pub tier: Suggestion,
    pub suggestion: &'static str,
    pub matched_keywords: usize,
}

#[derive(Debug, Serialize)]
pub struct RankingResponse {
    pub scorer: &'static str,
    pub job_description: JobDescriptionSummary,
    pub results: Vec<RankingEntry>,
}

/// POST /api/v1/rankings
/// Stateless: ranks the uploaded resumes against the uploaded job description
/// without touching any session. No links are issued.
pub async fn handle_rank(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<RankingResponse>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let job_description = form
        .take_first(JOB_DESCRIPTION_FIELD)
        .ok_or(MissingInput::JobDescription)?;
    let resumes = form.take_all(RESUMES_FIELD);
    if resumes.is_empty() {
        return Err(MissingInput::Resumes.into());
    }

    let ranked = rank(score_batch(state.scorer.as_ref(), &job_description, &resumes));
    info!(
        job_description = %job_description.name,
        resumes = ranked.len(),
        "Ranked resumes via API"
    );

    let results = ranked
        .iter()
        .map(|r| RankingEntry {
            rank: r.rank,
            medal: r.medal(),
            name: r.item.name.clone(),
            score: r.item.assessment.score,
            tier: r.item.assessment.suggestion,
            suggestion: r.item.assessment.suggestion.label(),
            matched_keywords: r.item.assessment.matched,
        })
        .collect();

    Ok(Json(RankingResponse {
        scorer: state.scorer.backend(),
        job_description: JobDescriptionSummary {
            tokens: tokenize(&job_description.name),
            name: job_description.name,
        },
        results,
    }))
}
