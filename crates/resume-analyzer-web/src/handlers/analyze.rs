use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use resume_analyzer_core::AnalysisError;

use crate::models::{AnalysisResponse, ErrorResponse};
use crate::state::AppState;
use crate::upload;

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

pub async fn analyze_resume(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => return error_response(rejection.status(), rejection.body_text()),
    };

    let fields = match upload::parse_multipart(multipart).await {
        Ok(fields) => fields,
        Err(e) => {
            tracing::warn!(error = %e, "rejected upload");
            return error_response(e.status(), e.to_string());
        }
    };

    tracing::info!(
        filename = %fields.file.filename,
        bytes = fields.file.data.len(),
        job_description = fields.job_description.is_some(),
        "analyzing resume"
    );

    match state
        .analyzer
        .analyze(fields.file.data, fields.job_description.as_deref())
        .await
    {
        Ok(analysis) => {
            tracing::info!(filename = %fields.file.filename, chars = analysis.len(), "analysis complete");
            Json(AnalysisResponse { analysis }).into_response()
        }
        Err(AnalysisError::NoText) => {
            error_response(StatusCode::BAD_REQUEST, AnalysisError::NoText.to_string())
        }
        Err(e) => {
            tracing::error!(filename = %fields.file.filename, error = %e, "analysis failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
