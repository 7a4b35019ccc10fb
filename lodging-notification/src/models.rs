use chrono::{DateTime, SubsecRound, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{notification_settings, notifications};

/// Kind of business event a user can subscribe to.
///
/// The discriminants are persisted and sent over the wire as integers, so
/// variants must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum NotificationType {
    NewReservationRequest = 0,
    CancelReservation = 1,
    NewHostReview = 2,
    NewAccommodationReview = 3,
    ReviewReservation = 4,
}

impl NotificationType {
    pub const ALL: [NotificationType; 5] = [
        Self::NewReservationRequest,
        Self::CancelReservation,
        Self::NewHostReview,
        Self::NewAccommodationReview,
        Self::ReviewReservation,
    ];

    /// Stable label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewReservationRequest => "new_reservation_request",
            Self::CancelReservation => "cancel_reservation",
            Self::NewHostReview => "new_host_review",
            Self::NewAccommodationReview => "new_accommodation_review",
            Self::ReviewReservation => "review_reservation",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown notification type {0}, expected 0..=4")]
pub struct UnknownNotificationType(pub i64);

impl TryFrom<i64> for NotificationType {
    type Error = UnknownNotificationType;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|t| i64::from(*t) == value)
            .ok_or(UnknownNotificationType(value))
    }
}

impl From<NotificationType> for i64 {
    fn from(t: NotificationType) -> Self {
        t as i64
    }
}

/// Whether a user wants notifications of one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionSetting {
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub active: bool,
}

impl SubscriptionSetting {
    pub fn new(notification_type: NotificationType, active: bool) -> Self {
        Self { notification_type, active }
    }
}

/// A user's full subscription list. One record per user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSettings {
    pub id: Uuid,
    pub user_id: Uuid,
    pub settings: Vec<SubscriptionSetting>,
}

#[derive(Debug, Queryable)]
#[diesel(table_name = notification_settings)]
pub struct SettingsRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub settings: serde_json::Value,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = notification_settings)]
pub struct NewSettingsRow {
    pub user_id: Uuid,
    pub settings: serde_json::Value,
}

/// A notification shown in the user's bell menu.
///
/// `redirect_id` is only meaningful while `should_redirect` is set; it is
/// left as-is otherwise.
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Serialize, Deserialize)]
#[diesel(table_name = notifications)]
#[serde(rename_all = "camelCase")]
pub struct BellNotification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub time_stamp: DateTime<Utc>,
    pub seen: bool,
    pub should_redirect: bool,
    pub redirect_id: String,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = notifications)]
pub struct NewBellNotification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub time_stamp: DateTime<Utc>,
    pub seen: bool,
    pub should_redirect: bool,
    pub redirect_id: String,
}

impl NewBellNotification {
    /// Build an unseen notification stamped with the current time.
    ///
    /// The timestamp is truncated to microseconds, the precision Postgres keeps.
    /// The id is a UUIDv7, so it breaks ties between equal timestamps in
    /// creation order.
    pub fn unseen(
        user_id: Uuid,
        message: impl Into<String>,
        redirect_id: impl Into<String>,
        should_redirect: bool,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            message: message.into(),
            time_stamp: Utc::now().trunc_subsecs(6),
            seen: false,
            should_redirect,
            redirect_id: redirect_id.into(),
        }
    }

    pub fn into_stored(self) -> BellNotification {
        BellNotification {
            id: self.id,
            user_id: self.user_id,
            message: self.message,
            time_stamp: self.time_stamp,
            seen: self.seen,
            should_redirect: self.should_redirect,
            redirect_id: self.redirect_id,
        }
    }
}
