//! Trigger/poll handlers for the badge status run.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Serialize;

use badgewatch_core::RunResult;
use badgewatch_pipeline::{PollOutcome, TriggerOutcome};

use crate::api::{ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
struct RunStatus {
    status: &'static str,
}

/// `POST /trigger` — start a background run.
///
/// Always answers `202 Accepted` immediately: either the run was started or
/// one is already in progress. The caller observes completion via
/// `GET /result`.
pub(super) async fn trigger_run(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let status = match state.coordinator.trigger().await {
        TriggerOutcome::Started => "started",
        TriggerOutcome::AlreadyRunning => "already running",
    };

    (
        StatusCode::ACCEPTED,
        Json(ApiResponse {
            data: RunStatus { status },
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}

/// `GET /result` — serve the latest run outcome.
///
/// `200` with the run result document when a run has completed or failed;
/// `202` with a "not ready" marker while idle or running. Never blocks on
/// the pipeline.
pub(super) async fn latest_result(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> axum::response::Response {
    let meta = ResponseMeta::new(req_id.0);

    match state.coordinator.poll().await {
        PollOutcome::NotReady => (
            StatusCode::ACCEPTED,
            Json(ApiResponse {
                data: RunStatus {
                    status: "not ready",
                },
                meta,
            }),
        )
            .into_response(),
        PollOutcome::Completed(report) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: RunResult::Completed(report),
                meta,
            }),
        )
            .into_response(),
        PollOutcome::Failed(error) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: RunResult::Failed { error },
                meta,
            }),
        )
            .into_response(),
    }
}
