use super::TokenEvent;
use crate::ParseError;
use anyhow::Result;

/// Roster-affecting room messages
#[derive(Debug, Clone, PartialEq)]
pub enum RoomMessage {
    /// Full roster snapshot. `declared` is the leading count as sent by the
    /// server, `None` when it is not a number.
    Users {
        declared: Option<usize>,
        names: Vec<String>,
    },
    Join(String),
    Leave(String),
    Name {
        new_name: String,
        old_name: String,
    },
    /// Tag with no roster meaning
    Other,
}

/// Classify a room token event.
///
/// Unknown tags map to [`RoomMessage::Other`]; only recognized tags with
/// missing fields are errors.
pub fn parse_room_message(event: &TokenEvent) -> Result<RoomMessage> {
    match event.tag() {
        "users" => parse_users(event),
        "join" | "j" | "J" => parse_join(event),
        "leave" | "l" | "L" => parse_leave(event),
        "name" | "n" | "N" => parse_name(event),
        _ => Ok(RoomMessage::Other),
    }
}

fn parse_users(event: &TokenEvent) -> Result<RoomMessage> {
    let user_list = event
        .get(1)
        .ok_or_else(|| ParseError::MissingField("users field".to_string()))?;

    // User list is comma-separated, first entry is the user count
    let mut entries = user_list.split(',');
    let declared = entries.next().and_then(|count| count.trim().parse().ok());
    let names = entries
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    Ok(RoomMessage::Users { declared, names })
}

fn parse_join(event: &TokenEvent) -> Result<RoomMessage> {
    let name = event
        .get(1)
        .ok_or_else(|| ParseError::MissingField("join user".to_string()))?;

    Ok(RoomMessage::Join(name.to_string()))
}

fn parse_leave(event: &TokenEvent) -> Result<RoomMessage> {
    let name = event
        .get(1)
        .ok_or_else(|| ParseError::MissingField("leave user".to_string()))?;

    Ok(RoomMessage::Leave(name.to_string()))
}

fn parse_name(event: &TokenEvent) -> Result<RoomMessage> {
    if event.len() < 3 {
        return Err(ParseError::MissingField("name fields".to_string()).into());
    }

    Ok(RoomMessage::Name {
        new_name: event.0[1].clone(),
        old_name: event.0[2].clone(),
    })
}
