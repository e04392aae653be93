//! Catalogue sheet upload handler.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Serialize;

use crate::api::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
struct UploadData {
    url: String,
}

/// `PUT /catalogue` — store the master catalogue sheet.
///
/// The raw request body is stored under the configured source name; the next
/// triggered run picks it up.
pub(super) async fn upload_catalogue(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> axum::response::Response {
    if body.is_empty() {
        return ApiError::new(req_id.0, "bad_request", "empty catalogue upload").into_response();
    }

    match state.files.upload(&state.source_name, &body).await {
        Ok(url) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: UploadData { url },
                meta: ResponseMeta::new(req_id.0),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "catalogue upload failed");
            ApiError::new(req_id.0, "internal_error", "catalogue upload failed").into_response()
        }
    }
}
