pub mod inbound;
pub mod subscriber;

pub use inbound::{EventError, InboundEvent, NotificationEvent};
