//! ChatPanel - binds a text entry to a room

use crate::base::Room;
use crate::entry::{ChatTextEntry, KeyEvent};
use crate::events::{RoomUpdate, Subscription, drain};

/// Presentation-side state for one open room.
///
/// Holds the room's text entry and a subscription to its updates. Submitted
/// lines go to [`Room::send`] with `direct = false`, so local commands apply.
#[derive(Debug)]
pub struct ChatPanel {
    entry: ChatTextEntry,
    updates: Subscription,
}

impl ChatPanel {
    pub fn attach<R: Room + ?Sized>(room: &R) -> Self {
        Self {
            entry: ChatTextEntry::new(),
            updates: room.subscribe(),
        }
    }

    pub fn entry(&self) -> &ChatTextEntry {
        &self.entry
    }

    pub fn entry_mut(&mut self) -> &mut ChatTextEntry {
        &mut self.entry
    }

    /// Feed a key press through the entry; true if consumed
    pub fn key_down<R, K>(&mut self, room: &mut R, event: &KeyEvent, on_key: K) -> bool
    where
        R: Room + ?Sized,
        K: FnOnce(&KeyEvent) -> bool,
    {
        self.entry
            .key_down(event, |line| room.send(line, false), on_key)
    }

    /// Updates published since the last poll
    pub fn poll(&mut self) -> Vec<RoomUpdate> {
        drain(&mut self.updates)
    }
}
