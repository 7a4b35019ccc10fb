use std::sync::Arc;

use dashmap::DashMap;
use metrics::counter;
use uuid::Uuid;

/// Returned by a connection that can no longer accept payloads.
#[derive(Debug, thiserror::Error)]
#[error("live connection is closed")]
pub struct SendError;

/// One open push connection.
///
/// `send` must not block: transports that can stall are expected to queue or
/// to enforce their own write timeout.
pub trait LiveConnection: Send + Sync {
    fn send(&self, payload: &str) -> Result<(), SendError>;

    fn close(&self);
}

/// Every open push connection of this process.
///
/// Broadcasts are untargeted: each connection receives every payload,
/// whichever user it belongs to.
#[derive(Default)]
pub struct LiveRegistry {
    connections: DashMap<Uuid, Arc<dyn LiveConnection>>,
}

impl LiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection and return the id it is tracked under.
    ///
    /// Registering the same connection twice tracks it twice.
    pub fn register(&self, connection: Arc<dyn LiveConnection>) -> Uuid {
        let id = Uuid::now_v7();
        self.connections.insert(id, connection);
        tracing::debug!(conn_id = %id, live = self.connections.len(), "live connection registered");
        id
    }

    pub fn unregister(&self, id: Uuid) {
        if self.connections.remove(&id).is_some() {
            tracing::debug!(conn_id = %id, "live connection unregistered");
        }
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Send `payload` to every connection and return how many accepted it.
    ///
    /// The set is snapshotted first so no map lock is held while sending.
    /// Connections that fail are closed and pruned.
    pub fn broadcast(&self, payload: &str) -> usize {
        let snapshot: Vec<(Uuid, Arc<dyn LiveConnection>)> = self
            .connections
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        let mut delivered = 0;
        for (id, connection) in snapshot {
            match connection.send(payload) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::debug!(conn_id = %id, error = %e, "pruning dead live connection");
                    connection.close();
                    self.connections.remove(&id);
                    counter!("live_broadcast_pruned_total").increment(1);
                }
            }
        }

        delivered
    }
}
