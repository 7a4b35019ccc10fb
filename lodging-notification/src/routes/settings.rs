use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use lodging_shared::errors::{AppError, AppResult, ErrorCode};
use lodging_shared::types::api::ApiResponse;
use lodging_shared::types::UserRole;

use crate::models::{NotificationType, SubscriptionSetting};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SettingEntry {
    #[serde(rename = "type")]
    #[validate(range(min = 0, max = 4, message = "type must be between 0 and 4"))]
    pub notification_type: i64,
    pub active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    #[validate]
    pub settings: Vec<SettingEntry>,
    #[validate(
        required(message = "role is required"),
        length(min = 1, message = "role is required")
    )]
    pub role: Option<String>,
}

impl TryFrom<SettingEntry> for SubscriptionSetting {
    type Error = AppError;

    fn try_from(entry: SettingEntry) -> Result<Self, Self::Error> {
        let notification_type = NotificationType::try_from(entry.notification_type)
            .map_err(|e| AppError::new(ErrorCode::InvalidNotificationType, e.to_string()))?;
        Ok(SubscriptionSetting::new(notification_type, entry.active))
    }
}

/// GET /notification/:user_id
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<SubscriptionSetting>>>> {
    let settings = state.settings.get(user_id)?;

    Ok(Json(ApiResponse::ok(settings)))
}

/// PUT /notification/:user_id
/// Replace the user's subscriptions with the ones their role may manage.
/// Bodies that do not deserialize answer 400 in the error envelope.
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    payload: Result<Json<UpdateSettingsRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Vec<SubscriptionSetting>>>)> {
    let Json(req) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    req.validate().map_err(|e| {
        AppError::with_details(
            ErrorCode::ValidationError,
            "invalid settings request",
            serde_json::to_value(&e).unwrap_or_default(),
        )
    })?;

    let role = UserRole::from(req.role.unwrap_or_default());
    let requested = req
        .settings
        .into_iter()
        .map(SubscriptionSetting::try_from)
        .collect::<AppResult<Vec<_>>>()?;

    let stored = state.settings.update_settings(user_id, &role, requested)?;

    Ok((StatusCode::ACCEPTED, Json(ApiResponse::ok(stored))))
}

/// DELETE /notification/:user_id
pub async fn delete_settings(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.settings.delete(user_id)?;

    Ok(Json(ApiResponse::done("notification settings deleted")))
}
