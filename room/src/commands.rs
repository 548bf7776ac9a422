//! Local slash-command interception

use parley_protocol::{RoomId, id::CHALLENGE_PREFIX, to_id};

use crate::room::ChatRoom;

impl ChatRoom {
    /// Try to handle a typed line locally.
    ///
    /// Returns true if the line must not be sent to the server. Only lines
    /// starting with a single `/` are candidates; `//` escapes a literal slash.
    pub fn handle_message(&mut self, line: &str) -> bool {
        let Some(body) = line.strip_prefix('/') else {
            return false;
        };
        if body.starts_with('/') {
            return false;
        }

        let (cmd, target) = body.split_once(' ').unwrap_or((body, ""));
        match cmd {
            "j" | "join" => {
                let room = RoomId::from_user_input(target);
                if room.is_empty() {
                    tracing::debug!(room = %self.core.id, "Ignoring /join without a room");
                } else {
                    self.core.host().join(room);
                }
                true
            }
            "part" | "leave" => {
                let room = RoomId::from_user_input(target);
                let room = if room.is_empty() {
                    self.core.id.clone()
                } else {
                    room
                };
                self.core.host().leave(room);
                true
            }
            "chall" | "challenge" => {
                if !target.is_empty() {
                    let user = to_id(target);
                    if user.is_empty() {
                        tracing::debug!(room = %self.core.id, "Ignoring /challenge without a valid user");
                    } else {
                        let room = RoomId::new(format!("{}{}", CHALLENGE_PREFIX, user));
                        self.core.host().join(room);
                    }
                    return true;
                }
                self.open_challenge();
                true
            }
            "cchall" | "cancelchallenge" => {
                self.cancel_challenge();
                true
            }
            "reject" => {
                // The server still needs to see /reject
                self.challenged_format = None;
                self.core.update();
                false
            }
            _ => false,
        }
    }
}
