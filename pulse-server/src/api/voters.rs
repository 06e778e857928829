use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};

use crate::{
    api::{operator_from_headers, ApiError, ApiResult},
    db::repositories::VoterRepository,
    roster::{self, RosterError},
    state::AppState,
};
use pulse_types::VoterUploadResponse;

/// POST /api/voters - Bulk upload a voter roster as a CSV body.
///
/// The whole file is validated before anything is written; a missing
/// required column fails the upload with no rows inserted.
pub async fn upload_voters(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> ApiResult<Json<VoterUploadResponse>> {
    operator_from_headers(&state, &headers)?;

    let import = roster::parse_roster(body.as_bytes()).map_err(|e| match e {
        RosterError::MissingColumns(_) => ApiError::BadRequest(e.to_string()),
        RosterError::Parse(_) => ApiError::BadRequest(e.to_string()),
    })?;

    let repo = VoterRepository::new(state.db.pool.clone());
    let inserted = repo
        .insert_batch(&import.voters)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    tracing::info!(
        inserted,
        skipped = import.skipped,
        "Imported voter roster"
    );

    Ok(Json(VoterUploadResponse {
        inserted,
        skipped: import.skipped,
    }))
}

/// GET /api/voters/template - Download the upload template.
pub async fn download_template() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"voter_template.csv\"",
            ),
        ],
        roster::CSV_TEMPLATE,
    )
}
