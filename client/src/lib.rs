//! Websocket client driving parley rooms against a Showdown-style server.
//!
//! [`ParleyClient`] owns a [`RoomHost`] and spawns the websocket onto its own
//! task, which handles reconnects. The client loop routes incoming frames to
//! rooms; lines the rooms queue go straight to the connection task.
//!
//! ```ignore
//! let mut client = ParleyClient::connect(SHOWDOWN_URL).await?;
//! let handle = client.handle();
//! let mut events = client.subscribe();
//!
//! handle.join_room("lobby")?;
//! client.run().await?;
//! ```

mod config;
mod connection;
mod handle;
mod host;

use anyhow::Result;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use connection::{Connection, Incoming};

pub use config::{ClientConfig, URL_ENV};
pub use connection::ReconnectPolicy;
pub use handle::ParleyHandle;
pub use host::{DEFAULT_ROOM, HostEvent, RoomHost};

pub use parley_protocol::{ClientCommand, ClientMessage, RoomId, ServerFrame, TokenEvent};
pub use parley_room::{ChatRoom, RoomUpdate};

pub const SHOWDOWN_URL: &str = "wss://sim3.psim.us/showdown/websocket";

/// Frames buffered between the connection task and the room host
const INCOMING_CAPACITY: usize = 64;

pub struct ParleyClient {
    host: RoomHost,
    incoming: mpsc::Receiver<Result<Incoming>>,
    connection_task: Option<JoinHandle<()>>,
}

impl ParleyClient {
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with(ClientConfig::new(url)).await
    }

    /// Connect, then hand the socket to its own task
    pub async fn connect_with(config: ClientConfig) -> Result<Self> {
        let connection = Connection::connect(config.url, config.reconnect).await?;
        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
        let (incoming_tx, incoming) = mpsc::channel(INCOMING_CAPACITY);

        let task = tokio::spawn(connection.run(outgoing_rx, incoming_tx));
        Ok(Self::from_parts(RoomHost::new(outgoing_tx), incoming, Some(task)))
    }

    fn from_parts(
        host: RoomHost,
        incoming: mpsc::Receiver<Result<Incoming>>,
        connection_task: Option<JoinHandle<()>>,
    ) -> Self {
        Self {
            host,
            incoming,
            connection_task,
        }
    }

    pub fn handle(&self) -> ParleyHandle {
        ParleyHandle::new(self.host.handle())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.host.subscribe()
    }

    pub fn host(&self) -> &RoomHost {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut RoomHost {
        &mut self.host
    }

    /// Run until the connection is lost for good
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.host.process_requests();

            tokio::select! {
                incoming = self.incoming.recv() => match incoming {
                    Some(Ok(Incoming::Frame(frame))) => self.host.handle_frame(frame),
                    Some(Ok(Incoming::Reconnected)) => self.host.rejoin(),
                    Some(Err(e)) => return Err(e),
                    None => anyhow::bail!("Connection closed"),
                },
                Some(request) = self.host.next_request() => {
                    self.host.handle_request(request);
                }
            }
        }
    }
}

impl Drop for ParleyClient {
    fn drop(&mut self) {
        if let Some(task) = self.connection_task.take() {
            task.abort();
        }
    }
}
