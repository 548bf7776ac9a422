//! Change notifications published by rooms

use parley_protocol::TokenEvent;
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Buffered updates per subscriber before it starts lagging
pub const UPDATE_CAPACITY: usize = 256;

/// What a room tells its observers
#[derive(Debug, Clone, PartialEq)]
pub enum RoomUpdate {
    /// Room state (roster, target, challenge slots, ...) changed; re-render
    Changed,
    /// A token event for the message log
    Line(TokenEvent),
}

/// Dropping the receiver unsubscribes
pub type Subscription = broadcast::Receiver<RoomUpdate>;

/// Take every update currently queued on a subscription without waiting
pub fn drain(updates: &mut Subscription) -> Vec<RoomUpdate> {
    let mut drained = Vec::new();
    loop {
        match updates.try_recv() {
            Ok(update) => drained.push(update),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Room subscriber lagged, updates dropped");
            }
        }
    }
    drained
}
