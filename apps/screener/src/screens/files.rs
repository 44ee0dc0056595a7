use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::session::links::LinkId;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    #[serde(default)]
    pub download: bool,
}

/// GET /files/:link_id
/// Serves the bytes behind a live transient link, inline or as an attachment.
pub async fn handle_file(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(query): Query<FileQuery>,
) -> Result<Response, AppError> {
    let not_found = || AppError::NotFound(format!("Link {raw_id} is not available"));
    let id: LinkId = raw_id.parse().map_err(|_| not_found())?;
    let target = state.flows.links().resolve(&id).ok_or_else(not_found)?;

    let content_type = mime_guess::from_path(&target.name)
        .first_or_octet_stream()
        .to_string();
    let disposition = content_disposition(query.download, &target.name);

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        target.content,
    )
        .into_response())
}

/// RFC 6266 disposition: an ASCII `filename` fallback plus the exact name as
/// a percent-encoded UTF-8 `filename*`.
fn content_disposition(download: bool, name: &str) -> String {
    format!(
        "{}; filename=\"{}\"; filename*=UTF-8''{}",
        if download { "attachment" } else { "inline" },
        ascii_fallback(name),
        urlencoding::encode(name)
    )
}

/// Drops characters that cannot appear inside a quoted header parameter and
/// replaces non-ASCII ones with `_`.
fn ascii_fallback(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect()
}
