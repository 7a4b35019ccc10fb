use std::sync::Arc;

use metrics::counter;
use uuid::Uuid;

use lodging_shared::errors::{AppError, AppResult, ErrorCode};

use crate::events::NotificationEvent;
use crate::models::{BellNotification, NewBellNotification};
use crate::services::settings_service::SettingsService;
use crate::socket::LiveRegistry;
use crate::store::NotificationStore;

/// How a single notification event ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The receiver is not subscribed to this type; nothing was written.
    Suppressed,
    /// Persisted and pushed to `recipients` live connections.
    Delivered { notification_id: Uuid, recipients: usize },
    /// The receiver was subscribed but the insert failed; nothing was pushed.
    PersistFailed,
}

impl DispatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Suppressed => "suppressed",
            Self::Delivered { .. } => "delivered",
            Self::PersistFailed => "persist_failed",
        }
    }
}

#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    settings: SettingsService,
    live: Arc<LiveRegistry>,
}

impl NotificationService {
    pub fn new(
        store: Arc<dyn NotificationStore>,
        settings: SettingsService,
        live: Arc<LiveRegistry>,
    ) -> Self {
        Self { store, settings, live }
    }

    /// Turn a business event into a bell notification for its receiver.
    ///
    /// Never fails: store and socket errors are logged and reflected in the
    /// returned outcome.
    pub fn dispatch(&self, event: &NotificationEvent) -> DispatchOutcome {
        let receiver_id = event.receiver_id();
        let notification_type = event.notification_type();

        let outcome = if !self.settings.is_subscribed(receiver_id, notification_type) {
            tracing::debug!(
                receiver_id = %receiver_id,
                notification_type = %notification_type,
                "receiver not subscribed, notification suppressed"
            );
            DispatchOutcome::Suppressed
        } else {
            let new = NewBellNotification::unseen(
                receiver_id,
                event.message(),
                event.redirect_id(),
                event.should_redirect(),
            );

            match self.store.insert(new) {
                Ok(stored) => DispatchOutcome::Delivered {
                    notification_id: stored.id,
                    recipients: self.push(&stored),
                },
                Err(e) => {
                    tracing::error!(
                        receiver_id = %receiver_id,
                        notification_type = %notification_type,
                        error = %e,
                        "failed to persist notification"
                    );
                    DispatchOutcome::PersistFailed
                }
            }
        };

        counter!(
            "notifications_dispatched_total",
            "type" => notification_type.as_str(),
            "outcome" => outcome.as_str()
        )
        .increment(1);

        if let DispatchOutcome::Delivered { notification_id, recipients } = outcome {
            tracing::info!(
                notification_id = %notification_id,
                receiver_id = %receiver_id,
                notification_type = %notification_type,
                recipients,
                "notification dispatched"
            );
        }

        outcome
    }

    /// Persist a notification without any subscription check.
    pub fn add(
        &self,
        user_id: Uuid,
        message: &str,
        redirect_id: &str,
        should_redirect: bool,
    ) -> AppResult<BellNotification> {
        self.store
            .insert(NewBellNotification::unseen(user_id, message, redirect_id, should_redirect))
    }

    pub fn get_all_by_user(&self, user_id: Uuid) -> AppResult<Vec<BellNotification>> {
        self.store.get_all_by_user(user_id)
    }

    pub fn unread_count(&self, user_id: Uuid) -> AppResult<i64> {
        self.store.count_unseen(user_id)
    }

    pub fn mark_seen(&self, user_id: Uuid, notification_id: Uuid) -> AppResult<BellNotification> {
        self.store.mark_seen(notification_id, user_id)?.ok_or_else(|| {
            AppError::new(
                ErrorCode::NotificationNotFound,
                format!("notification {notification_id} not found"),
            )
        })
    }

    pub fn mark_all_seen(&self, user_id: Uuid) -> AppResult<()> {
        let updated = self.store.mark_all_seen(user_id)?;
        tracing::debug!(user_id = %user_id, updated, "notifications marked seen");
        Ok(())
    }

    fn push(&self, notification: &BellNotification) -> usize {
        match serde_json::to_string(notification) {
            Ok(payload) => self.live.broadcast(&payload),
            Err(e) => {
                tracing::error!(
                    notification_id = %notification.id,
                    error = %e,
                    "failed to serialize notification for live push"
                );
                0
            }
        }
    }
}
