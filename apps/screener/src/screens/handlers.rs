//! Screen flow: home → job description upload → resumes upload → results.

use askama::Template;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::info;

use crate::errors::{AppError, MissingInput};
use crate::models::upload::{UploadForm, JOB_DESCRIPTION_FIELD, RESUMES_FIELD};
use crate::screens::templates::{
    HomeTemplate, ResultRow, ResultsTemplate, UploadJdTemplate, UploadResumesTemplate,
};
use crate::session::flow_id;
use crate::session::flows::Results;
use crate::state::AppState;

/// GET /
pub async fn handle_home() -> Result<Html<String>, AppError> {
    Ok(Html(HomeTemplate {}.render()?))
}

/// POST /start
pub async fn handle_start(
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, AppError> {
    let flow = flow_id(&session).await?;
    state.flows.start(flow);
    Ok(Redirect::to("/upload-jd"))
}

/// GET /upload-jd
pub async fn handle_upload_jd_form(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let flow = flow_id(&session).await?;
    let page = UploadJdTemplate {
        uploaded: state.flows.snapshot(flow).job_description,
        prompt: None,
    };
    Ok(Html(page.render()?))
}

/// POST /upload-jd
pub async fn handle_upload_jd(
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let flow = flow_id(&session).await?;
    let mut form = UploadForm::read(multipart).await?;

    let Some(file) = form.take_first(JOB_DESCRIPTION_FIELD) else {
        let page = UploadJdTemplate {
            uploaded: state.flows.snapshot(flow).job_description,
            prompt: Some(MissingInput::JobDescription.to_string()),
        };
        return prompt_response(page.render()?);
    };

    state.flows.set_job_description(flow, file);
    Ok(Redirect::to("/upload-resumes").into_response())
}

/// GET /upload-resumes
pub async fn handle_upload_resumes_form(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let flow = flow_id(&session).await?;
    let page = UploadResumesTemplate {
        resumes: state.flows.snapshot(flow).resumes,
        prompt: None,
    };
    Ok(Html(page.render()?))
}

/// POST /upload-resumes
pub async fn handle_upload_resumes(
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let flow = flow_id(&session).await?;
    let mut form = UploadForm::read(multipart).await?;
    let resumes = form.take_all(RESUMES_FIELD);

    match state.flows.set_resumes(flow, resumes) {
        Ok(_) => Ok(Redirect::to("/results").into_response()),
        Err(missing) => {
            info!(%flow, "Resumes step blocked: {missing}");
            let page = UploadResumesTemplate {
                resumes: state.flows.snapshot(flow).resumes,
                prompt: Some(missing.to_string()),
            };
            prompt_response(page.render()?)
        }
    }
}

/// GET /results
pub async fn handle_results(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let flow = flow_id(&session).await?;
    let rows = match state.flows.results(flow, state.scorer.as_ref()) {
        Results::Empty => Vec::new(),
        Results::Ranked(batch) => batch.iter().map(ResultRow::from).collect(),
    };
    Ok(Html(ResultsTemplate { rows }.render()?))
}

/// Re-rendered upload screen carrying a missing-input prompt.
fn prompt_response(html: String) -> Result<Response, AppError> {
    Ok((StatusCode::BAD_REQUEST, Html(html)).into_response())
}
