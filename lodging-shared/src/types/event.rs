/// Topics published by the booking platform.
///
/// Each topic is bound as a routing key on the shared topic exchange. The
/// names are fixed by the publishing services and must not change.
pub mod topics {
    // User events
    pub const USER_CREATED: &str = "user.created";

    // Reservation events
    pub const RESERVATION_REQUEST_CREATED: &str = "reservation-request.created";
    pub const RESERVATION_CANCELED: &str = "reservation.canceled";
    pub const HOST_REVIEWED_RESERVATION_REQUEST: &str = "host-reviewed-reservation-request";

    // Review events
    pub const HOST_REVIEW_CREATED: &str = "host-review.created";
    pub const ACCOMMODATION_REVIEW_CREATED: &str = "accommodation-review.created";

    /// Every topic the notification service consumes.
    pub const NOTIFICATION_SERVICE: [&str; 6] = [
        USER_CREATED,
        RESERVATION_REQUEST_CREATED,
        RESERVATION_CANCELED,
        HOST_REVIEW_CREATED,
        ACCOMMODATION_REVIEW_CREATED,
        HOST_REVIEWED_RESERVATION_REQUEST,
    ];
}

/// Event payloads as they appear on the wire.
///
/// Publishers send these bodies directly, without an outer envelope.
pub mod payloads {
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    /// Body of `user.created`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct UserCreated {
        pub user_id: Uuid,
        pub role: String,
    }

    /// Body shared by every reservation and review topic.
    ///
    /// Only `receiver_id` is mandatory; the remaining fields are filled in by
    /// the publishers that have them.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct NotificationMessage {
        pub receiver_id: Uuid,
        #[serde(default)]
        pub status: String,
        #[serde(default)]
        pub start_action_user_name: String,
        #[serde(default)]
        pub accommodation_id: String,
        #[serde(default)]
        pub reservation_id: String,
    }
}
