use thiserror::Error;

pub mod client;
pub mod id;
pub mod server;

pub use client::{ClientCommand, ClientMessage, PackedTeam};
pub use id::{RoomId, to_id};
pub use server::{
    ChallengeState, ChallengeTo, DisplayName, RoomMessage, ServerFrame, ServerMessage, TokenEvent,
    parse_room_message, parse_server_frame, parse_server_message, tokenize_line,
};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid message format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Empty message")]
    EmptyMessage,
}
