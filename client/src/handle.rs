use anyhow::{Result, anyhow};
use parley_protocol::{ClientCommand, ClientMessage, RoomId};
use parley_room::{HostHandle, HostRequest};

/// Cloneable handle for driving a running [`crate::ParleyClient`] from
/// other tasks (input loops, bots).
#[derive(Clone, Debug)]
pub struct ParleyHandle {
    host: HostHandle,
}

impl ParleyHandle {
    pub fn new(host: HostHandle) -> Self {
        Self { host }
    }

    fn request(&self, request: HostRequest) -> Result<()> {
        self.host
            .request(request)
            .map_err(|_| anyhow!("Client disconnected"))
    }

    /// Open a room, as typed by a user
    pub fn join_room(&self, room: &str) -> Result<()> {
        self.request(HostRequest::Join(RoomId::from_user_input(room)))
    }

    pub fn leave_room(&self, room: &RoomId) -> Result<()> {
        self.request(HostRequest::Leave(room.clone()))
    }

    /// Hand a typed line to a room, as if entered in its text box
    pub fn submit(&self, room: &RoomId, line: &str) -> Result<()> {
        self.request(HostRequest::Submit {
            room: room.clone(),
            line: line.to_string(),
        })
    }

    /// Send a chat line to a room, bypassing local commands
    pub fn send_chat(&self, room: &RoomId, message: &str) -> Result<()> {
        self.request(HostRequest::Send(ClientMessage::in_room(
            room.clone(),
            ClientCommand::Chat(message.to_string()),
        )))
    }

    /// Open the PM room with `user`
    pub fn open_pm(&self, user: &str) -> Result<()> {
        let me = self
            .user_id()
            .ok_or_else(|| anyhow!("Not identified yet"))?;
        self.request(HostRequest::Join(RoomId::pm(&me, user)))
    }

    /// Local user's canonical id, once the server has told us
    pub fn user_id(&self) -> Option<String> {
        self.host.user_id()
    }

    pub fn is_connected(&self) -> bool {
        !self.host.is_closed()
    }
}
