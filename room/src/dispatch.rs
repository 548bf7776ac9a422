//! Routing of incoming token events into room state

use parley_protocol::{RoomMessage, TokenEvent, parse_room_message};

use crate::room::ChatRoom;

/// Whether an event should still reach the message log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forward {
    Log,
    Skip,
}

/// Apply one token event to a room's roster.
///
/// Never fails: unknown tags are left for the log, and roster events with
/// missing fields are reported and logged as-is.
pub fn dispatch(room: &mut ChatRoom, event: &TokenEvent) -> Forward {
    let message = match parse_room_message(event) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(room = %room.id(), tag = event.tag(), error = %e, "Malformed roster event");
            return Forward::Log;
        }
    };

    match message {
        RoomMessage::Users { declared, names } => {
            room.set_users(declared, names);
            // The snapshot is state, not a log line
            return Forward::Skip;
        }
        RoomMessage::Join(name) => room.add_user(&name),
        RoomMessage::Leave(name) => room.remove_user(&name, false),
        RoomMessage::Name { new_name, old_name } => room.rename_user(&new_name, &old_name),
        RoomMessage::Other => {}
    }
    Forward::Log
}

impl ChatRoom {
    /// Process a token event addressed to this room, in arrival order
    pub fn receive_line(&mut self, event: TokenEvent) {
        if dispatch(self, &event) == Forward::Log {
            self.core.publish_line(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{RoomUpdate, drain};
    use crate::room::RoomOptions;
    use crate::testing::host_as;
    use parley_protocol::{RoomId, tokenize_line};

    fn lobby() -> ChatRoom {
        let (host, _rx) = host_as(Some("alice"));
        ChatRoom::new(RoomId::from("lobby"), RoomOptions::default(), host)
    }

    #[test]
    fn test_users_replaces_roster_without_logging() {
        let mut room = lobby();
        let mut updates = room.subscribe();

        room.receive_line(tokenize_line("|users|3, Alice,@Bob,+Carol@!"));

        assert_eq!(room.user_count(), 3);
        assert_eq!(drain(&mut updates), vec![RoomUpdate::Changed]);
    }

    #[test]
    fn test_join_leave_rename() {
        let mut room = lobby();
        room.receive_line(tokenize_line("|users|1, Alice"));

        assert_eq!(dispatch(&mut room, &TokenEvent::new(["j", " Bob"])), Forward::Log);
        assert_eq!(room.user_count(), 2);

        dispatch(&mut room, &TokenEvent::new(["J", " Carol"]));
        dispatch(&mut room, &TokenEvent::new(["L", " Carol"]));
        assert_eq!(room.user_count(), 2);

        dispatch(&mut room, &TokenEvent::new(["n", " Robert", "bob"]));
        assert!(room.roster().contains("Robert"));
        assert!(!room.roster().contains("bob"));

        dispatch(&mut room, &TokenEvent::new(["leave", " Alice"]));
        assert_eq!(room.user_count(), 1);
    }

    #[test]
    fn test_roster_events_are_logged() {
        let mut room = lobby();
        let mut updates = room.subscribe();

        let join = TokenEvent::new(["join", " Bob"]);
        room.receive_line(join.clone());

        assert_eq!(
            drain(&mut updates),
            vec![RoomUpdate::Changed, RoomUpdate::Line(join)]
        );
    }

    #[test]
    fn test_unknown_tags_are_inert() {
        let mut room = lobby();
        let mut updates = room.subscribe();

        let chat = TokenEvent::new(["c", " Bob", "hello|world"]);
        room.receive_line(chat.clone());
        room.receive_line(TokenEvent::new(Vec::<String>::new()));

        assert_eq!(room.user_count(), 0);
        assert_eq!(
            drain(&mut updates),
            vec![
                RoomUpdate::Line(chat),
                RoomUpdate::Line(TokenEvent::new(Vec::<String>::new())),
            ]
        );
    }

    #[test]
    fn test_malformed_roster_event_is_logged_untouched() {
        let mut room = lobby();

        assert_eq!(dispatch(&mut room, &TokenEvent::new(["n", " Bob"])), Forward::Log);
        assert_eq!(dispatch(&mut room, &TokenEvent::new(["j"])), Forward::Log);
        assert_eq!(room.user_count(), 0);
    }

    #[test]
    fn test_users_with_bad_count_uses_names() {
        let mut room = lobby();

        room.receive_line(tokenize_line("|users|lots, Alice, Bob"));

        assert_eq!(room.user_count(), 2);
    }
}
