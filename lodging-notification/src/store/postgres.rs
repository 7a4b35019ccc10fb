use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use uuid::Uuid;

use lodging_shared::clients::db::{checkout, DbPool};
use lodging_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{
    BellNotification, NewBellNotification, NewSettingsRow, SettingsRow, SubscriptionSetting,
    UserSettings,
};
use crate::schema::{notification_settings, notifications};

use super::{NotificationStore, SettingsStore};

pub struct PgNotificationStore {
    pool: DbPool,
}

impl PgNotificationStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl NotificationStore for PgNotificationStore {
    fn insert(&self, notification: NewBellNotification) -> AppResult<BellNotification> {
        let mut conn = checkout(&self.pool)?;

        let stored = diesel::insert_into(notifications::table)
            .values(&notification)
            .get_result::<BellNotification>(&mut conn)?;

        tracing::debug!(
            notification_id = %stored.id,
            user_id = %stored.user_id,
            "notification created"
        );

        Ok(stored)
    }

    fn get_all_by_user(&self, user_id: Uuid) -> AppResult<Vec<BellNotification>> {
        let mut conn = checkout(&self.pool)?;

        let items = notifications::table
            .filter(notifications::user_id.eq(user_id))
            .order((notifications::time_stamp.desc(), notifications::id.desc()))
            .load::<BellNotification>(&mut conn)?;

        Ok(items)
    }

    fn count_unseen(&self, user_id: Uuid) -> AppResult<i64> {
        let mut conn = checkout(&self.pool)?;

        let count: i64 = notifications::table
            .filter(notifications::user_id.eq(user_id))
            .filter(notifications::seen.eq(false))
            .count()
            .get_result(&mut conn)?;

        Ok(count)
    }

    fn mark_seen(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<BellNotification>> {
        let mut conn = checkout(&self.pool)?;

        let updated = diesel::update(
            notifications::table
                .filter(notifications::id.eq(id))
                .filter(notifications::user_id.eq(user_id)),
        )
        .set(notifications::seen.eq(true))
        .get_result::<BellNotification>(&mut conn)
        .optional()?;

        Ok(updated)
    }

    fn mark_all_seen(&self, user_id: Uuid) -> AppResult<usize> {
        let mut conn = checkout(&self.pool)?;

        let updated = diesel::update(
            notifications::table
                .filter(notifications::user_id.eq(user_id))
                .filter(notifications::seen.eq(false)),
        )
        .set(notifications::seen.eq(true))
        .execute(&mut conn)?;

        Ok(updated)
    }
}

pub struct PgSettingsStore {
    pool: DbPool,
}

impl PgSettingsStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn encode_settings(settings: &[SubscriptionSetting]) -> AppResult<serde_json::Value> {
    serde_json::to_value(settings).map_err(|e| {
        tracing::error!(error = %e, "failed to encode subscription settings");
        AppError::internal("failed to encode subscription settings")
    })
}

impl TryFrom<SettingsRow> for UserSettings {
    type Error = AppError;

    fn try_from(row: SettingsRow) -> Result<Self, Self::Error> {
        let settings = serde_json::from_value(row.settings).map_err(|e| {
            tracing::error!(error = %e, settings_id = %row.id, "stored subscription settings are malformed");
            AppError::internal("stored subscription settings are malformed")
        })?;

        Ok(UserSettings {
            id: row.id,
            user_id: row.user_id,
            settings,
        })
    }
}

impl SettingsStore for PgSettingsStore {
    fn get_by_user(&self, user_id: Uuid) -> AppResult<Option<UserSettings>> {
        let mut conn = checkout(&self.pool)?;

        let row = notification_settings::table
            .filter(notification_settings::user_id.eq(user_id))
            .first::<SettingsRow>(&mut conn)
            .optional()?;

        row.map(UserSettings::try_from).transpose()
    }

    fn insert(&self, user_id: Uuid, settings: &[SubscriptionSetting]) -> AppResult<UserSettings> {
        let mut conn = checkout(&self.pool)?;

        let new_row = NewSettingsRow {
            user_id,
            settings: encode_settings(settings)?,
        };

        let row = diesel::insert_into(notification_settings::table)
            .values(&new_row)
            .get_result::<SettingsRow>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    AppError::new(
                        ErrorCode::SettingsAlreadyExist,
                        format!("notification settings already exist for user {user_id}"),
                    )
                }
                other => AppError::Database(other),
            })?;

        UserSettings::try_from(row)
    }

    fn replace(&self, id: Uuid, settings: &[SubscriptionSetting]) -> AppResult<()> {
        let mut conn = checkout(&self.pool)?;

        let updated = diesel::update(notification_settings::table.find(id))
            .set(notification_settings::settings.eq(encode_settings(settings)?))
            .execute(&mut conn)?;

        if updated == 0 {
            return Err(AppError::new(ErrorCode::SettingsNotFound, "notification settings not found"));
        }

        Ok(())
    }

    fn delete_by_user(&self, user_id: Uuid) -> AppResult<usize> {
        let mut conn = checkout(&self.pool)?;

        let deleted = diesel::delete(
            notification_settings::table.filter(notification_settings::user_id.eq(user_id)),
        )
        .execute(&mut conn)?;

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    const CREATE_NOTIFICATIONS: &str =
        include_str!("../../migrations/2024-06-01-000000_create_notifications/up.sql");

    #[test]
    fn redirect_column_has_no_length_limit() {
        let ddl = CREATE_NOTIFICATIONS.to_lowercase();

        assert!(ddl.contains("redirect_id text not null"));
        assert!(!ddl.contains("varchar"));
    }
}
