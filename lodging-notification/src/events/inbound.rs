use lodging_shared::types::event::{payloads, topics};
use lodging_shared::types::UserRole;
use uuid::Uuid;

use crate::models::NotificationType;

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("no handler bound for topic {0}")]
    UnknownTopic(String),

    #[error("malformed {topic} payload: {source}")]
    Decode {
        topic: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {topic} payload: {reason}")]
    Invalid { topic: String, reason: &'static str },
}

/// A decoded delivery from one of the consumed topics.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    UserCreated { user_id: Uuid, role: UserRole },
    Notify(NotificationEvent),
}

impl InboundEvent {
    pub fn decode(topic: &str, data: &[u8]) -> Result<Self, EventError> {
        let notify = |wrap: fn(payloads::NotificationMessage) -> NotificationEvent| {
            parse::<payloads::NotificationMessage>(topic, data).map(|m| Self::Notify(wrap(m)))
        };

        match topic {
            topics::USER_CREATED => {
                let payload = parse::<payloads::UserCreated>(topic, data)?;
                if payload.role.trim().is_empty() {
                    return Err(EventError::Invalid {
                        topic: topic.to_string(),
                        reason: "role must not be empty",
                    });
                }
                Ok(Self::UserCreated {
                    user_id: payload.user_id,
                    role: UserRole::from(payload.role),
                })
            }
            topics::RESERVATION_REQUEST_CREATED => notify(NotificationEvent::ReservationRequestCreated),
            topics::RESERVATION_CANCELED => notify(NotificationEvent::ReservationCanceled),
            topics::HOST_REVIEW_CREATED => notify(NotificationEvent::HostReviewCreated),
            topics::ACCOMMODATION_REVIEW_CREATED => notify(NotificationEvent::AccommodationReviewCreated),
            topics::HOST_REVIEWED_RESERVATION_REQUEST => {
                notify(NotificationEvent::HostReviewedReservationRequest)
            }
            other => Err(EventError::UnknownTopic(other.to_string())),
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(topic: &str, data: &[u8]) -> Result<T, EventError> {
    serde_json::from_slice(data).map_err(|source| EventError::Decode {
        topic: topic.to_string(),
        source,
    })
}

/// A business event that may turn into a bell notification.
#[derive(Debug, Clone)]
pub enum NotificationEvent {
    ReservationRequestCreated(payloads::NotificationMessage),
    ReservationCanceled(payloads::NotificationMessage),
    HostReviewCreated(payloads::NotificationMessage),
    AccommodationReviewCreated(payloads::NotificationMessage),
    HostReviewedReservationRequest(payloads::NotificationMessage),
}

impl NotificationEvent {
    pub fn payload(&self) -> &payloads::NotificationMessage {
        match self {
            Self::ReservationRequestCreated(m)
            | Self::ReservationCanceled(m)
            | Self::HostReviewCreated(m)
            | Self::AccommodationReviewCreated(m)
            | Self::HostReviewedReservationRequest(m) => m,
        }
    }

    pub fn receiver_id(&self) -> Uuid {
        self.payload().receiver_id
    }

    pub fn notification_type(&self) -> NotificationType {
        match self {
            Self::ReservationRequestCreated(_) => NotificationType::NewReservationRequest,
            Self::ReservationCanceled(_) => NotificationType::CancelReservation,
            Self::HostReviewCreated(_) => NotificationType::NewHostReview,
            Self::AccommodationReviewCreated(_) => NotificationType::NewAccommodationReview,
            Self::HostReviewedReservationRequest(_) => NotificationType::ReviewReservation,
        }
    }

    /// Every event kind links to the entity it is about.
    pub fn should_redirect(&self) -> bool {
        true
    }

    /// Frontend route the notification links to.
    pub fn redirect_id(&self) -> String {
        match self {
            Self::ReservationRequestCreated(m)
            | Self::ReservationCanceled(m)
            | Self::HostReviewedReservationRequest(m) => {
                format!("reservation/view/{}", m.reservation_id)
            }
            Self::HostReviewCreated(m) => format!("auth/view-profile/{}", m.receiver_id),
            Self::AccommodationReviewCreated(m) => format!("accommodation/{}", m.accommodation_id),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::ReservationRequestCreated(m) if m.status == "automatic" => format!(
                "Reservation request #{} is automatically accepted.",
                m.reservation_id
            ),
            Self::ReservationRequestCreated(_) => "You have a new reservation request.".to_string(),
            Self::ReservationCanceled(m) => {
                format!("A reservation #{} has been cancelled.", m.reservation_id)
            }
            Self::HostReviewCreated(m) => format!(
                "{} has reviewed your profile. Check for more details.",
                m.start_action_user_name
            ),
            Self::AccommodationReviewCreated(m) => format!(
                "{} has reviewed your accommodation. Check for more details.",
                m.start_action_user_name
            ),
            Self::HostReviewedReservationRequest(m) if m.status == "accept-request" => format!(
                "The host has confirmed your reservation #{}",
                m.reservation_id
            ),
            Self::HostReviewedReservationRequest(m) => format!(
                "The host has canceled your reservation #{}",
                m.reservation_id
            ),
        }
    }
}
