//! Axum route handlers for the Candidates API.

use axum::{
    extract::{
        multipart::{Field, MultipartError},
        Multipart, Path, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::blob::content_type_for;
use crate::candidates::validation::{CandidateForm, CvUpload};
use crate::errors::AppError;
use crate::models::candidate::Candidate;
use crate::state::AppState;

/// Fetch body: the candidate, or `{}` when the id is well-formed but unknown.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FetchResponse {
    Found(Candidate),
    Absent {},
}

/// GET /api/candidates
pub async fn handle_list(State(state): State<AppState>) -> Result<Json<Vec<Candidate>>, AppError> {
    Ok(Json(state.candidates.list().await?))
}

/// GET /api/candidates/:id
pub async fn handle_fetch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FetchResponse>, AppError> {
    let response = match state.candidates.fetch(&id).await? {
        Some(candidate) => FetchResponse::Found(candidate),
        None => FetchResponse::Absent {},
    };
    Ok(Json(response))
}

/// POST /api/candidates
///
/// Multipart form with text fields `name`, `email`, `phone` and a file field `cv`.
pub async fn handle_create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Candidate>, AppError> {
    let form = read_candidate_form(multipart).await?;
    let candidate = state.candidates.create(form).await?;
    Ok(Json(candidate))
}

/// DELETE /api/candidates/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.candidates.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/candidates/:id/cv
///
/// Streams back the stored résumé as an attachment.
pub async fn handle_download_cv(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (reference, data) = state.candidates.fetch_cv(&id).await?;

    let file_name = reference.rsplit('/').next().unwrap_or(&reference).to_string();
    let headers = [
        (header::CONTENT_TYPE, content_type_for(&reference).to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ),
    ];
    Ok((headers, data))
}

/// Collects the known parts of a create request. Unknown parts are drained and
/// ignored; a repeated part overrides the earlier one.
async fn read_candidate_form(mut multipart: Multipart) -> Result<CandidateForm, AppError> {
    let mut form = CandidateForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Malformed multipart body", e))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "name" => form.name = Some(field_text(field).await?),
            "email" => form.email = Some(field_text(field).await?),
            "phone" => form.phone = Some(field_text(field).await?),
            "cv" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error("Unreadable cv upload", e))?;
                form.cv = Some(CvUpload {
                    file_name,
                    content_type,
                    data,
                });
            }
            _ => {
                let _ = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error("Malformed multipart body", e))?;
            }
        }
    }

    Ok(form)
}

async fn field_text(field: Field<'_>) -> Result<String, AppError> {
    let field_name = field.name().unwrap_or("").to_string();
    field
        .text()
        .await
        .map_err(|e| multipart_error(&format!("Unreadable field '{field_name}'"), e))
}

/// A body cut off by the upload limit is a 413; anything else is a malformed request.
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("{context}: {}", e.body_text()))
    } else {
        AppError::Validation(format!("{context}: {e}"))
    }
}
