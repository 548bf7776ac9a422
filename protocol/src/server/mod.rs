mod global;
mod room;

use std::collections::HashMap;

use crate::ParseError;
use crate::id::{RoomId, to_id};
use anyhow::Result;
use serde::Deserialize;

pub use room::{RoomMessage, parse_room_message};

/// One server-pushed message split into its fields.
///
/// The first token is the lowercase type tag (`users`, `j`, `c`, ...). Plain
/// text lines that do not start with `|` carry an empty tag: `["", text]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenEvent(pub Vec<String>);

impl TokenEvent {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    /// Locally synthesized error notice: `["error", message]`
    pub fn error(message: impl Into<String>) -> Self {
        Self(vec!["error".to_string(), message.into()])
    }

    pub fn tag(&self) -> &str {
        self.get(0).unwrap_or_default()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Fields from `index` onward joined back with `|`
    pub fn rest(&self, index: usize) -> Option<String> {
        self.0.get(index..).map(|fields| fields.join("|"))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }
}

/// A user as shown in a roster or chat line: `@Alice@!`
///
/// The first character is the rank/group symbol (a space for unranked users).
/// A trailing `@!` marks the user as away; it only affects rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName {
    pub rank: char,
    pub name: String,
    pub away: bool,
}

impl DisplayName {
    pub const AWAY_SUFFIX: &'static str = "@!";

    pub fn parse(raw: &str) -> Option<Self> {
        let mut chars = raw.chars();
        let rank = chars.next()?;
        let rest = chars.as_str();
        let (name, away) = match rest.strip_suffix(Self::AWAY_SUFFIX) {
            Some(name) => (name, true),
            None => (rest, false),
        };

        Some(Self {
            rank,
            name: name.to_string(),
            away,
        })
    }

    pub fn id(&self) -> String {
        to_id(&self.name)
    }
}

/// Pending challenges as reported by `|updatechallenges|`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeState {
    /// Challenger id to format
    #[serde(default)]
    pub challenges_from: HashMap<String, String>,
    #[serde(default)]
    pub challenge_to: Option<ChallengeTo>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChallengeTo {
    pub to: String,
    pub format: String,
}

/// Typed view of the messages the room host acts on directly
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    UpdateUser {
        user: DisplayName,
        named: bool,
        avatar: String,
    },
    Pm {
        sender: DisplayName,
        receiver: DisplayName,
        message: String,
    },
    UpdateChallenges(ChallengeState),
    Popup(String),
    Deinit,
    /// Anything else, left for the room it was addressed to
    Raw(TokenEvent),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerFrame {
    pub room_id: Option<RoomId>,
    pub events: Vec<TokenEvent>,
}

/// Parse a complete WebSocket frame into token events
pub fn parse_server_frame(frame: &str) -> Result<ServerFrame> {
    if frame.trim().is_empty() {
        return Err(ParseError::EmptyMessage.into());
    }

    let mut lines = frame.lines();
    let mut room_id = None;

    // Check if first line is >ROOMID
    if let Some(first_line) = lines.clone().next()
        && let Some(room) = first_line.strip_prefix('>')
    {
        room_id = Some(RoomId::new(room.trim()));
        lines.next();
    }

    let events = lines
        .filter(|line| !line.trim().is_empty())
        .map(tokenize_line)
        .collect();

    Ok(ServerFrame { room_id, events })
}

/// Split a single protocol line into tokens
pub fn tokenize_line(line: &str) -> TokenEvent {
    let line = line.trim_end_matches('\r');

    match line.strip_prefix('|') {
        Some(body) => TokenEvent::new(body.split('|')),
        None => TokenEvent::new(["", line]),
    }
}

/// Classify a token event into the messages the host handles itself
pub fn parse_server_message(event: &TokenEvent) -> Result<ServerMessage> {
    match event.tag() {
        "updateuser" => global::parse_updateuser(event),
        "pm" => global::parse_pm(event),
        "updatechallenges" => global::parse_updatechallenges(event),
        "popup" => global::parse_popup(event),
        "deinit" => Ok(ServerMessage::Deinit),
        _ => Ok(ServerMessage::Raw(event.clone())),
    }
}
