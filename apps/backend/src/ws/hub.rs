use actix::prelude::*;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{ConnectionId, SyncSnapshot};
use crate::services::registry::LobbyEntry;

/// Events the coordinator publishes; websocket sessions render them.
#[derive(Message, Clone, Debug)]
#[rtype(result = "()")]
pub enum HubEvent {
    /// Fresh snapshot of the receiving connection's own group.
    Snapshot(SyncSnapshot),
    Lobby(Vec<LobbyEntry>),
    GameStarted,
    SessionReset,
}

/// Live websocket subscribers, keyed by connection identity. One connection
/// may hold several sockets (tabs reconnecting, for instance).
#[derive(Default)]
pub struct SyncHub {
    connections: DashMap<ConnectionId, DashMap<Uuid, Recipient<HubEvent>>>,
}

impl SyncHub {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    pub fn register(&self, connection: ConnectionId, recipient: Recipient<HubEvent>) -> Uuid {
        let token = Uuid::new_v4();
        let entry = self
            .connections
            .entry(connection)
            .or_insert_with(DashMap::new);
        entry.insert(token, recipient);
        token
    }

    /// Returns how many sockets the connection still has open.
    pub fn unregister(&self, connection: ConnectionId, token: Uuid) -> usize {
        let remaining = match self.connections.get(&connection) {
            Some(entry) => {
                entry.remove(&token);
                entry.len()
            }
            None => 0,
        };
        if remaining == 0 {
            self.connections
                .remove_if(&connection, |_, sockets| sockets.is_empty());
        }
        remaining
    }

    pub fn is_connected(&self, connection: ConnectionId) -> bool {
        self.connections
            .get(&connection)
            .is_some_and(|sockets| !sockets.is_empty())
    }

    pub fn send_to(&self, connection: ConnectionId, event: HubEvent) {
        if let Some(entry) = self.connections.get(&connection) {
            for recipient in entry.iter() {
                if recipient.value().try_send(event.clone()).is_err() {
                    debug!(connection_id = %connection, "Dropped hub event for closed socket");
                }
            }
        }
    }

    pub fn broadcast(&self, event: HubEvent) {
        for entry in self.connections.iter() {
            for recipient in entry.value().iter() {
                let _ = recipient.value().try_send(event.clone());
            }
        }
    }

    pub fn socket_count(&self) -> usize {
        self.connections.iter().map(|entry| entry.value().len()).sum()
    }
}
