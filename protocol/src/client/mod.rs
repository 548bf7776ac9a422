use crate::id::RoomId;

/// A team in the server's packed format, as sent with `/utm`.
///
/// An empty team is valid and means "no team" (random formats).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedTeam(pub String);

impl PackedTeam {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Commands that clients can send to server
#[derive(Debug, Clone, PartialEq)]
pub enum ClientCommand {
    /// /join ROOMID
    JoinRoom(RoomId),

    /// /noreply /leave ROOMID
    LeaveRoom(RoomId),

    /// /pm USERNAME, MESSAGE
    Pm { target: String, message: String },

    /// /challenge USERNAME, FORMAT
    Challenge { username: String, format: String },

    /// /utm TEAM
    UpdateTeam(PackedTeam),

    /// Raw chat message
    Chat(String),
}

impl ClientCommand {
    /// Serialize command to protocol format
    pub fn to_protocol_string(&self) -> String {
        match self {
            Self::JoinRoom(room) => format!("/join {}", room),
            Self::LeaveRoom(room) => format!("/noreply /leave {}", room),
            Self::Pm { target, message } => format!("/pm {}, {}", target, message),
            Self::Challenge { username, format } => format!("/challenge {}, {}", username, format),
            Self::UpdateTeam(team) => format!("/utm {}", team.as_str()),
            Self::Chat(message) => message.clone(),
        }
    }
}

/// Client message with optional room context
#[derive(Debug, Clone, PartialEq)]
pub struct ClientMessage {
    pub room_id: Option<RoomId>,
    pub command: ClientCommand,
}

impl ClientMessage {
    /// Message not scoped to any room
    pub fn global(command: ClientCommand) -> Self {
        Self {
            room_id: None,
            command,
        }
    }

    pub fn in_room(room_id: RoomId, command: ClientCommand) -> Self {
        Self {
            room_id: Some(room_id),
            command,
        }
    }

    /// Serialize to wire format: ROOMID|TEXT or |TEXT
    pub fn to_wire_format(&self) -> String {
        let text = self.command.to_protocol_string();
        match &self.room_id {
            Some(room) => format!("{}|{}", room, text),
            None => format!("|{}", text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_wire_format() {
        let msg = ClientMessage::global(ClientCommand::JoinRoom(RoomId::from("lobby")));
        assert_eq!(msg.to_wire_format(), "|/join lobby");
    }

    #[test]
    fn test_leave_wire_format() {
        let msg = ClientMessage::global(ClientCommand::LeaveRoom(RoomId::from("lobby")));
        assert_eq!(msg.to_wire_format(), "|/noreply /leave lobby");
    }

    #[test]
    fn test_pm_wire_format() {
        let msg = ClientMessage::global(ClientCommand::Pm {
            target: "bob".into(),
            message: "/cancelchallenge".into(),
        });
        assert_eq!(msg.to_wire_format(), "|/pm bob, /cancelchallenge");
    }

    #[test]
    fn test_challenge_wire_format() {
        let team = ClientMessage::global(ClientCommand::UpdateTeam(PackedTeam::default()));
        assert_eq!(team.to_wire_format(), "|/utm ");

        let chall = ClientMessage::global(ClientCommand::Challenge {
            username: "bob".into(),
            format: "gen9ou".into(),
        });
        assert_eq!(chall.to_wire_format(), "|/challenge bob, gen9ou");
    }

    #[test]
    fn test_room_chat_wire_format() {
        let msg = ClientMessage::in_room(RoomId::from("lobby"), ClientCommand::Chat("hi".into()));
        assert_eq!(msg.to_wire_format(), "lobby|hi");
    }
}
