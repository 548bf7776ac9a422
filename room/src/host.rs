//! Handle rooms use to reach the transport and the multi-room host

use std::sync::{Arc, RwLock};

use parley_protocol::{ClientMessage, RoomId};
use tokio::sync::mpsc;

use crate::error::RoomError;

/// Requests a room (or a UI) makes of the host that owns it
#[derive(Debug, Clone, PartialEq)]
pub enum HostRequest {
    /// Put a line on the wire
    Send(ClientMessage),
    /// Open a room (and focus it if already open)
    Join(RoomId),
    /// Close a room
    Leave(RoomId),
    /// A line the user typed into a room's text entry
    Submit { room: RoomId, line: String },
}

/// Cloneable, fire-and-forget connection from a room to its host.
///
/// Also carries the local user's canonical id, which resolves some time
/// after connecting and may change on rename.
#[derive(Clone, Debug)]
pub struct HostHandle {
    tx: mpsc::UnboundedSender<HostRequest>,
    user_id: Arc<RwLock<Option<String>>>,
}

impl HostHandle {
    pub fn new(tx: mpsc::UnboundedSender<HostRequest>) -> Self {
        Self {
            tx,
            user_id: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a handle together with the receiving end the host drains
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<HostRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Queue any request; fails once the host is gone
    pub fn request(&self, request: HostRequest) -> Result<(), RoomError> {
        self.tx.send(request).map_err(|_| RoomError::HostClosed)
    }

    /// Queue an outgoing message; a closed host only gets a warning
    pub fn send(&self, message: ClientMessage) {
        if let Err(e) = self.request(HostRequest::Send(message)) {
            tracing::warn!(error = %e, "Dropping outgoing message");
        }
    }

    pub fn join(&self, room: RoomId) {
        if let Err(e) = self.request(HostRequest::Join(room)) {
            tracing::warn!(error = %e, "Dropping join request");
        }
    }

    pub fn leave(&self, room: RoomId) {
        if let Err(e) = self.request(HostRequest::Leave(room)) {
            tracing::warn!(error = %e, "Dropping leave request");
        }
    }

    /// Hand a typed line to a room owned by the host
    pub fn submit(&self, room: &RoomId, line: &str) -> Result<(), RoomError> {
        self.request(HostRequest::Submit {
            room: room.clone(),
            line: line.to_string(),
        })
    }

    pub fn user_id(&self) -> Option<String> {
        self.user_id.read().ok()?.clone()
    }

    pub fn set_user_id(&self, user_id: Option<String>) {
        if let Ok(mut current) = self.user_id.write() {
            *current = user_id;
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
