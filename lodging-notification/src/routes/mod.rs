use std::sync::Arc;

use axum::routing::{get, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::socket::handlers::ws_upgrade;
use crate::AppState;

pub mod health;
pub mod notifications;
pub mod settings;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health & metrics
        .route("/notification/health/check", get(health::health_check))
        .route("/notification/metrics", get(health::metrics))
        // Bell
        .route("/notification/bell/:user_id", get(notifications::list_notifications))
        .route("/notification/bell/:user_id/seen", put(notifications::mark_all_seen))
        .route("/notification/bell/:user_id/unread-count", get(notifications::unread_count))
        .route(
            "/notification/bell/:user_id/:notification_id/seen",
            put(notifications::mark_seen),
        )
        // Subscription settings
        .route(
            "/notification/:user_id",
            get(settings::get_settings)
                .put(settings::update_settings)
                .delete(settings::delete_settings),
        )
        // Live push
        .route("/ws", get(ws_upgrade))
        .layer(axum::middleware::from_fn(
            lodging_shared::middleware::metrics_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use lodging_shared::types::UserRole;

    use crate::test_support::memory_state;

    async fn send(
        state: &Arc<AppState>,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        send_raw(state, method, uri, body.map(|json| json.to_string())).await
    }

    async fn send_raw(
        state: &Arc<AppState>,
        method: Method,
        uri: &str,
        body: Option<String>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(text) => {
                builder = builder.header("content-type", "application/json");
                Body::from(text)
            }
            None => Body::empty(),
        };

        let response = router(state.clone())
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        });
        (status, value)
    }

    #[tokio::test]
    async fn health_check_reports_text() {
        let state = memory_state();
        let (status, body) = send(&state, Method::GET, "/notification/health/check", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::String("NOTIFICATION SERVICE IS HEALTH".into()));
    }

    #[tokio::test]
    async fn bell_lists_newest_first_and_marks_seen() {
        let state = memory_state();
        let user = Uuid::now_v7();
        let older = state.notifications.add(user, "older", "", false).unwrap();
        let newer = state.notifications.add(user, "newer", "accommodation/1", true).unwrap();
        assert!(newer.time_stamp >= older.time_stamp);

        let (status, body) =
            send(&state, Method::GET, &format!("/notification/bell/{user}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let items = body["data"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["message"], "newer");
        assert_eq!(items[0]["id"], newer.id.to_string());
        assert_eq!(items[1]["message"], "older");
        assert_eq!(items[0]["userId"], user.to_string());
        assert!(items.iter().all(|n| n["seen"] == false));

        let (status, _) =
            send(&state, Method::PUT, &format!("/notification/bell/{user}/seen"), None).await;
        assert_eq!(status, StatusCode::ACCEPTED);

        let (_, body) = send(
            &state,
            Method::GET,
            &format!("/notification/bell/{user}/unread-count"),
            None,
        )
        .await;
        assert_eq!(body["data"]["count"], 0);
    }

    #[tokio::test]
    async fn mark_single_notification_seen() {
        let state = memory_state();
        let user = Uuid::now_v7();
        let stored = state.notifications.add(user, "hello", "", false).unwrap();

        let (status, body) = send(
            &state,
            Method::PUT,
            &format!("/notification/bell/{user}/{}/seen", stored.id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["seen"], true);

        let stranger = Uuid::now_v7();
        let (status, body) = send(
            &state,
            Method::PUT,
            &format!("/notification/bell/{stranger}/{}/seen", stored.id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "E5001");
    }

    #[tokio::test]
    async fn settings_round_trip_is_role_gated() {
        let state = memory_state();
        let host = Uuid::now_v7();
        state.settings.provision_defaults(host, &UserRole::Host).unwrap();

        let (status, body) = send(
            &state,
            Method::PUT,
            &format!("/notification/{host}"),
            Some(json!({
                "role": "host",
                "settings": [
                    { "type": 0, "active": false },
                    { "type": 4, "active": true }
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["data"], json!([{ "type": 0, "active": false }]));

        let (status, body) = send(&state, Method::GET, &format!("/notification/{host}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([{ "type": 0, "active": false }]));
    }

    #[tokio::test]
    async fn settings_update_rejects_bad_input() {
        let state = memory_state();
        let user = Uuid::now_v7();
        state.settings.provision_defaults(user, &UserRole::Guest).unwrap();
        let uri = format!("/notification/{user}");

        let (status, body) = send(
            &state,
            Method::PUT,
            &uri,
            Some(json!({ "role": "guest", "settings": [{ "type": 7, "active": true }] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "E0002");

        let (status, _) = send(
            &state,
            Method::PUT,
            &uri,
            Some(json!({ "settings": [{ "type": 4, "active": false }] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn settings_update_undecodable_body_uses_error_envelope() {
        let state = memory_state();
        let user = Uuid::now_v7();
        state.settings.provision_defaults(user, &UserRole::Guest).unwrap();
        let uri = format!("/notification/{user}");

        let overflowing_type =
            r#"{"role":"guest","settings":[{"type":99999999999999999999,"active":true}]}"#;
        let null_role = r#"{"role":null,"settings":[{"type":4,"active":false}]}"#;
        let truncated = r#"{"role":"guest","settings":["#;

        for raw in [overflowing_type, null_role, truncated] {
            let (status, body) = send_raw(&state, Method::PUT, &uri, Some(raw.to_string())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {raw}");
            assert_eq!(body["success"], false);
            assert_eq!(body["error"]["code"], "E0002");
        }

        let (status, body) = send(
            &state,
            Method::PUT,
            &uri,
            Some(json!({ "role": "", "settings": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "E0002");

        // Stored settings are untouched by rejected requests.
        let (_, body) = send(&state, Method::GET, &uri, None).await;
        assert_eq!(body["data"], json!([{ "type": 4, "active": true }]));
    }

    #[tokio::test]
    async fn settings_missing_and_deleted() {
        let state = memory_state();
        let user = Uuid::now_v7();
        let uri = format!("/notification/{user}");

        let (status, body) = send(&state, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "E5002");

        state.settings.provision_defaults(user, &UserRole::Guest).unwrap();
        let (status, _) = send(&state, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&state, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_uuid_user_id_is_rejected() {
        let state = memory_state();
        let (status, _) = send(&state, Method::GET, "/notification/bell/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
