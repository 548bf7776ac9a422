//! Room state for Showdown-style chat clients.
//!
//! This crate turns token events from the server into per-room state and
//! turns user input into outgoing protocol lines.
//!
//! # Overview
//!
//! `parley-room` sits between `parley-protocol` (wire format) and whatever
//! routes frames to rooms:
//!
//! ```text
//! parley-protocol (wire format)
//!        │
//!        ▼
//! parley-room (rooms + text entry) ← THIS CRATE
//!        │
//!        └─> parley-client (websocket host, routing)
//! ```
//!
//! # Main Types
//!
//! - [`ChatRoom`] - channel or PM room: roster, PM target, local commands, challenges
//! - [`Roster`] - user id to display name map with an incrementally tracked count
//! - [`dispatch`] - applies one token event to a room
//! - [`ChatTextEntry`] - input history and inline formatting toggles
//! - [`ChatPanel`] - glue between a text entry and any [`Room`]
//! - [`HostHandle`] - how rooms reach the transport and the multi-room host
//!
//! # Example Usage
//!
//! ```ignore
//! use parley_room::{ChatRoom, HostHandle, RoomOptions};
//! use parley_protocol::{RoomId, TokenEvent};
//!
//! let (host, requests) = HostHandle::channel();
//! host.set_user_id(Some("alice".into()));
//!
//! let mut room = ChatRoom::new(RoomId::from("pm-alice-bob"), RoomOptions::default(), host);
//! assert_eq!(room.pm_target(), Some("bob"));
//!
//! room.receive_line(TokenEvent::new(["j", " Carol"]));
//! room.send("hi", false); // queued as "|/pm bob, hi"
//! ```

mod challenge;
mod commands;
mod base;
mod dispatch;
pub mod entry;
mod error;
mod events;
mod host;
mod panel;
mod room;
mod roster;
#[cfg(test)]
mod testing;

pub use base::{Room, RoomCore};
pub use dispatch::{Forward, dispatch};
pub use entry::{ChatTextEntry, FormatMarker, InputHistory, Key, KeyEvent, Modifiers, TextBuffer};
pub use error::RoomError;
pub use events::{RoomUpdate, Subscription, UPDATE_CAPACITY, drain};
pub use host::{HostHandle, HostRequest};
pub use panel::ChatPanel;
pub use room::{ChatRoom, RoomOptions};
pub use roster::Roster;

// Re-export commonly used protocol types
pub use parley_protocol::{ChallengeState, PackedTeam, RoomId, TokenEvent, to_id};
