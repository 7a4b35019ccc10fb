use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use lodging_shared::errors::AppResult;
use lodging_shared::types::api::ApiResponse;

use crate::models::BellNotification;
use crate::AppState;

/// GET /notification/bell/:user_id
/// Bell notifications of a user, newest first.
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<BellNotification>>>> {
    let items = state.notifications.get_all_by_user(user_id)?;

    Ok(Json(ApiResponse::ok(items)))
}

/// GET /notification/bell/:user_id/unread-count
pub async fn unread_count(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<UnreadCountResponse>>> {
    let count = state.notifications.unread_count(user_id)?;

    Ok(Json(ApiResponse::ok(UnreadCountResponse { count })))
}

#[derive(Debug, serde::Serialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}

/// PUT /notification/bell/:user_id/seen
/// Mark every notification of the user seen.
pub async fn mark_all_seen(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<ApiResponse<()>>)> {
    state.notifications.mark_all_seen(user_id)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::done("notifications marked as seen")),
    ))
}

/// PUT /notification/bell/:user_id/:notification_id/seen
/// Mark one notification seen. 404 unless it belongs to the user.
pub async fn mark_seen(
    State(state): State<Arc<AppState>>,
    Path((user_id, notification_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<BellNotification>>> {
    let notification = state.notifications.mark_seen(user_id, notification_id)?;

    Ok(Json(ApiResponse::ok(notification)))
}
