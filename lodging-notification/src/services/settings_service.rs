use std::sync::Arc;

use uuid::Uuid;

use lodging_shared::errors::{AppError, AppResult, ErrorCode};
use lodging_shared::types::UserRole;

use crate::models::{NotificationType, SubscriptionSetting, UserSettings};
use crate::store::SettingsStore;

/// Subscriptions a freshly created user starts with.
///
/// Roles other than guest and host start with nothing.
pub fn default_settings(role: &UserRole) -> Vec<SubscriptionSetting> {
    use NotificationType::*;

    match role {
        UserRole::Guest => vec![SubscriptionSetting::new(ReviewReservation, true)],
        UserRole::Host => vec![
            SubscriptionSetting::new(NewReservationRequest, true),
            SubscriptionSetting::new(CancelReservation, true),
            SubscriptionSetting::new(NewHostReview, true),
            SubscriptionSetting::new(NewAccommodationReview, true),
        ],
        UserRole::Other(_) => Vec::new(),
    }
}

/// Restrict a requested settings list to what `role` may manage.
///
/// Hosts manage everything except `ReviewReservation`, which the platform
/// controls for them. Everyone else may only toggle `ReviewReservation`.
pub fn settings_allowed_for(
    role: &UserRole,
    requested: Vec<SubscriptionSetting>,
) -> Vec<SubscriptionSetting> {
    let host = role.is_host();
    requested
        .into_iter()
        .filter(|s| (s.notification_type == NotificationType::ReviewReservation) != host)
        .collect()
}

/// Owns subscription provisioning and updates. Never caches: every call
/// reads the store.
#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn SettingsStore>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Create the default settings record for a new user.
    pub fn provision_defaults(&self, user_id: Uuid, role: &UserRole) -> AppResult<UserSettings> {
        if let UserRole::Other(name) = role {
            tracing::warn!(user_id = %user_id, role = %name, "unrecognized role, provisioning empty settings");
        }

        let record = self.store.insert(user_id, &default_settings(role))?;

        tracing::info!(
            user_id = %user_id,
            role = %role,
            subscriptions = record.settings.len(),
            "notification settings provisioned"
        );

        Ok(record)
    }

    /// Replace a user's settings with the role-filtered `requested` list and
    /// return what was stored.
    pub fn update_settings(
        &self,
        user_id: Uuid,
        role: &UserRole,
        requested: Vec<SubscriptionSetting>,
    ) -> AppResult<Vec<SubscriptionSetting>> {
        let existing = self.fetch(user_id)?;

        let requested_len = requested.len();
        let allowed = settings_allowed_for(role, requested);
        if allowed.len() != requested_len {
            tracing::debug!(
                user_id = %user_id,
                role = %role,
                dropped = requested_len - allowed.len(),
                "dropped settings the role may not manage"
            );
        }

        self.store.replace(existing.id, &allowed)?;

        Ok(allowed)
    }

    pub fn get(&self, user_id: Uuid) -> AppResult<Vec<SubscriptionSetting>> {
        Ok(self.fetch(user_id)?.settings)
    }

    pub fn delete(&self, user_id: Uuid) -> AppResult<()> {
        let deleted = self.store.delete_by_user(user_id)?;
        tracing::info!(user_id = %user_id, deleted, "notification settings deleted");
        Ok(())
    }

    /// Whether the user has an active subscription to `notification_type`.
    ///
    /// Store failures and missing records both count as not subscribed.
    pub fn is_subscribed(&self, user_id: Uuid, notification_type: NotificationType) -> bool {
        match self.store.get_by_user(user_id) {
            Ok(Some(record)) => record
                .settings
                .iter()
                .any(|s| s.active && s.notification_type == notification_type),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    error = %e,
                    "settings lookup failed, treating as unsubscribed"
                );
                false
            }
        }
    }

    fn fetch(&self, user_id: Uuid) -> AppResult<UserSettings> {
        self.store.get_by_user(user_id)?.ok_or_else(|| {
            AppError::new(
                ErrorCode::SettingsNotFound,
                format!("notification settings not found for user {user_id}"),
            )
        })
    }
}
