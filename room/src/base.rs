//! Behaviour shared by every kind of room

use parley_protocol::{ClientCommand, ClientMessage, RoomId, TokenEvent};
use tokio::sync::broadcast;

use crate::events::{RoomUpdate, Subscription, UPDATE_CAPACITY};
use crate::host::HostHandle;

/// Generic capability set of a room, as seen by panels and hosts
pub trait Room {
    fn id(&self) -> &RoomId;

    fn title(&self) -> &str;

    fn is_connected(&self) -> bool;

    fn connect(&mut self);

    /// Send a line typed by the user. `direct` skips local command handling.
    fn send(&mut self, line: &str, direct: bool);

    /// Apply a token event addressed to this room
    fn receive_line(&mut self, event: TokenEvent);

    fn subscribe(&self) -> Subscription;

    fn destroy(&mut self);
}

/// State and plumbing every room embeds: identity, title, connection flag,
/// the host handle and the update channel.
#[derive(Debug)]
pub struct RoomCore {
    pub id: RoomId,
    pub title: String,
    pub connected: bool,
    host: HostHandle,
    updates: broadcast::Sender<RoomUpdate>,
}

impl RoomCore {
    pub fn new(id: RoomId, title: Option<String>, host: HostHandle) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CAPACITY);
        let title = title.unwrap_or_else(|| id.to_string());
        Self {
            id,
            title,
            connected: false,
            host,
            updates,
        }
    }

    pub fn host(&self) -> &HostHandle {
        &self.host
    }

    pub fn subscribe(&self) -> Subscription {
        self.updates.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.updates.receiver_count()
    }

    /// Notify observers that room state changed
    pub fn update(&self) {
        // No subscribers is fine
        let _ = self.updates.send(RoomUpdate::Changed);
    }

    /// Hand a token event to the message log subscribers
    pub fn publish_line(&self, event: TokenEvent) {
        let _ = self.updates.send(RoomUpdate::Line(event));
    }

    /// Send a line scoped to this room: `ROOMID|LINE`
    pub fn send_direct(&self, line: &str) {
        self.host.send(ClientMessage::in_room(
            self.id.clone(),
            ClientCommand::Chat(line.to_string()),
        ));
    }

    /// Generic teardown: leave the room on the server if still connected
    pub fn teardown(&mut self) {
        if self.connected {
            self.host
                .send(ClientMessage::global(ClientCommand::LeaveRoom(self.id.clone())));
            self.connected = false;
        }
        tracing::debug!(room = %self.id, "Room destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::drain;
    use crate::host::HostRequest;

    #[test]
    fn test_title_defaults_to_id() {
        let (host, _rx) = HostHandle::channel();
        let core = RoomCore::new(RoomId::from("lobby"), None, host);
        assert_eq!(core.title, "lobby");
    }

    #[test]
    fn test_send_direct_is_room_scoped() {
        let (host, mut rx) = HostHandle::channel();
        let core = RoomCore::new(RoomId::from("lobby"), None, host);

        core.send_direct("/me waves");

        match rx.try_recv().unwrap() {
            HostRequest::Send(msg) => assert_eq!(msg.to_wire_format(), "lobby|/me waves"),
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_teardown_leaves_only_when_connected() {
        let (host, mut rx) = HostHandle::channel();
        let mut core = RoomCore::new(RoomId::from("lobby"), None, host);

        core.teardown();
        assert!(rx.try_recv().is_err());

        core.connected = true;
        core.teardown();
        assert!(!core.connected);
        match rx.try_recv().unwrap() {
            HostRequest::Send(msg) => assert_eq!(msg.to_wire_format(), "|/noreply /leave lobby"),
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_unsubscribe_by_drop() {
        let (host, _rx) = HostHandle::channel();
        let core = RoomCore::new(RoomId::from("lobby"), None, host);

        let mut updates = core.subscribe();
        assert_eq!(core.subscriber_count(), 1);

        core.update();
        assert_eq!(drain(&mut updates), vec![RoomUpdate::Changed]);

        drop(updates);
        assert_eq!(core.subscriber_count(), 0);
        core.update();
    }
}
