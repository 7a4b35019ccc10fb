//! Storage boundary for notifications and subscription settings.
//!
//! Services only see these traits; the Postgres implementations live in
//! [`postgres`] and an in-memory double backs the unit tests.

use uuid::Uuid;

use lodging_shared::errors::AppResult;

use crate::models::{BellNotification, NewBellNotification, SubscriptionSetting, UserSettings};

pub mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::{PgNotificationStore, PgSettingsStore};

pub trait NotificationStore: Send + Sync {
    /// Persist a notification and return it with its store-assigned id.
    fn insert(&self, notification: NewBellNotification) -> AppResult<BellNotification>;

    /// All notifications owned by a user, newest first.
    fn get_all_by_user(&self, user_id: Uuid) -> AppResult<Vec<BellNotification>>;

    fn count_unseen(&self, user_id: Uuid) -> AppResult<i64>;

    /// Mark one notification seen. Returns `None` when no notification with
    /// that id belongs to the user.
    fn mark_seen(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<BellNotification>>;

    /// Mark every notification of a user seen and return how many changed.
    fn mark_all_seen(&self, user_id: Uuid) -> AppResult<usize>;
}

pub trait SettingsStore: Send + Sync {
    fn get_by_user(&self, user_id: Uuid) -> AppResult<Option<UserSettings>>;

    /// Create the settings record for a user.
    ///
    /// Fails with `ErrorCode::SettingsAlreadyExist` if the user already has one.
    fn insert(&self, user_id: Uuid, settings: &[SubscriptionSetting]) -> AppResult<UserSettings>;

    /// Replace the whole settings list of an existing record.
    fn replace(&self, id: Uuid, settings: &[SubscriptionSetting]) -> AppResult<()>;

    /// Delete the settings record of a user, returning how many rows went away.
    fn delete_by_user(&self, user_id: Uuid) -> AppResult<usize>;
}
