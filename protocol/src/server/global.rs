use super::{ChallengeState, DisplayName, ServerMessage, TokenEvent};
use crate::ParseError;
use anyhow::Result;

pub fn parse_updateuser(event: &TokenEvent) -> Result<ServerMessage> {
    // |updateuser|USER|NAMED|AVATAR|SETTINGS
    if event.len() < 3 {
        return Err(ParseError::MissingField("updateuser fields".to_string()).into());
    }

    let user = event
        .get(1)
        .and_then(DisplayName::parse)
        .ok_or_else(|| ParseError::InvalidFormat("invalid user format".to_string()))?;

    let named = event.get(2) == Some("1");
    let avatar = event.get(3).unwrap_or_default().to_string();

    Ok(ServerMessage::UpdateUser { user, named, avatar })
}

pub fn parse_pm(event: &TokenEvent) -> Result<ServerMessage> {
    // |pm|SENDER|RECEIVER|MESSAGE
    if event.len() < 4 {
        return Err(ParseError::MissingField("pm fields".to_string()).into());
    }

    let sender = event
        .get(1)
        .and_then(DisplayName::parse)
        .ok_or_else(|| ParseError::InvalidFormat("invalid sender format".to_string()))?;
    let receiver = event
        .get(2)
        .and_then(DisplayName::parse)
        .ok_or_else(|| ParseError::InvalidFormat("invalid receiver format".to_string()))?;

    // MESSAGE can contain | characters
    let message = event.rest(3).unwrap_or_default();

    Ok(ServerMessage::Pm {
        sender,
        receiver,
        message,
    })
}

pub fn parse_updatechallenges(event: &TokenEvent) -> Result<ServerMessage> {
    let json_str = event
        .rest(1)
        .filter(|json| !json.is_empty())
        .ok_or_else(|| ParseError::MissingField("updatechallenges json".to_string()))?;

    let state: ChallengeState = serde_json::from_str(&json_str).map_err(|e| {
        ParseError::InvalidFormat(format!("invalid updatechallenges json: {}", e))
    })?;

    Ok(ServerMessage::UpdateChallenges(state))
}

pub fn parse_popup(event: &TokenEvent) -> Result<ServerMessage> {
    let message = event
        .rest(1)
        .ok_or_else(|| ParseError::MissingField("popup message".to_string()))?;

    // Popups use || as a line break
    Ok(ServerMessage::Popup(message.replace("||", "\n")))
}
