use parley_protocol::RoomId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// A PM-only action reached a room without a PM target
    #[error("Not a PM room: {0}")]
    NotPm(RoomId),

    #[error("Room host disconnected")]
    HostClosed,
}
