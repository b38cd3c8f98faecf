//! W-2 download endpoint.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use hr_core::W2Statement;

use crate::error::{ApiError, ApiResult};
use crate::routes::employees::lookup;
use crate::state::AppState;

/// GET /api/download-w2/{identifier}: the employee's W-2 for the configured
/// tax year, rendered from the current record on every request.
pub async fn download_w2(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> ApiResult<Response> {
    let employee = lookup(&state, &identifier).await?;
    let year = state.config.tax_year;

    let statement = W2Statement::for_employee(&employee, year)
        .ok_or_else(|| ApiError::NotFound(format!("no salary on record for '{identifier}'")))?;
    let path = state
        .tax_forms
        .generate(&statement)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let body = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| ApiError::Internal(format!("failed to read W-2: {e}")))?;
    let file_name = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response())
}
