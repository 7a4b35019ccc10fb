use std::sync::Arc;

use futures_lite::StreamExt;
use lapin::options::BasicAckOptions;
use metrics::counter;

use lodging_shared::clients::rabbitmq::{QueueBinding, RabbitMQClient};
use lodging_shared::types::event::topics;

use crate::events::inbound::InboundEvent;
use crate::services::DispatchOutcome;
use crate::AppState;

/// What became of one delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Provisioned,
    Dispatched(DispatchOutcome),
    /// Undecodable, unknown or failed; logged and acknowledged anyway.
    Dropped,
}

/// Decode and handle a single delivery.
pub fn handle_event(state: &AppState, topic: &str, data: &[u8]) -> EventOutcome {
    let event = match InboundEvent::decode(topic, data) {
        Ok(event) => event,
        Err(e) => {
            tracing::error!(topic = %topic, error = %e, "failed to decode event");
            return EventOutcome::Dropped;
        }
    };

    match event {
        InboundEvent::UserCreated { user_id, role } => {
            tracing::info!(user_id = %user_id, role = %role, "received user.created event");

            match state.settings.provision_defaults(user_id, &role) {
                Ok(_) => EventOutcome::Provisioned,
                Err(e) => {
                    tracing::error!(user_id = %user_id, error = %e, "failed to provision notification settings");
                    EventOutcome::Dropped
                }
            }
        }
        InboundEvent::Notify(event) => {
            tracing::info!(
                topic = %topic,
                receiver_id = %event.receiver_id(),
                "received notification event"
            );

            EventOutcome::Dispatched(state.notifications.dispatch(&event))
        }
    }
}

/// Consume every platform topic from one queue, one delivery at a time.
///
/// Deliveries are always acknowledged: a failed event is dropped, never
/// redelivered.
pub async fn listen_platform_events(
    state: Arc<AppState>,
    rabbitmq: RabbitMQClient,
) -> anyhow::Result<()> {
    let binding = QueueBinding::sequential(&state.config.queue_name, &topics::NOTIFICATION_SERVICE);
    let mut consumer = rabbitmq.subscribe(binding).await?;

    tracing::info!(queue = %state.config.queue_name, "listening for platform events");

    while let Some(delivery) = consumer.next().await {
        match delivery {
            Ok(delivery) => {
                let topic = delivery.routing_key.to_string();
                counter!("notification_events_total", "topic" => topic.clone()).increment(1);

                let outcome = handle_event(&state, &topic, &delivery.data);
                tracing::debug!(topic = %topic, outcome = ?outcome, "event handled");

                if let Err(e) = delivery.ack(BasicAckOptions::default()).await {
                    tracing::error!(topic = %topic, error = %e, "failed to ack delivery");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "platform event consumer error");
            }
        }
    }

    tracing::warn!("platform event consumer stream ended");
    Ok(())
}
