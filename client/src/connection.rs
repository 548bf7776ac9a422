use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use parley_protocol::{ClientMessage, ServerFrame, parse_server_frame};
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// What the connection task reports to the client
#[derive(Debug)]
pub enum Incoming {
    Frame(ServerFrame),
    /// The socket was replaced; server-side room membership is gone
    Reconnected,
}

/// How hard to try getting a dropped connection back
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectPolicy {
    /// `None` retries forever
    pub max_attempts: Option<usize>,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Some(5),
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl ReconnectPolicy {
    /// Never reconnect; the first drop ends the session
    pub fn disabled() -> Self {
        Self {
            max_attempts: Some(0),
            ..Self::default()
        }
    }

    /// Delay to wait after `delay` failed
    pub fn next_delay(&self, delay: Duration) -> Duration {
        Duration::from_secs_f64(delay.as_secs_f64() * self.backoff_multiplier).min(self.max_delay)
    }

    pub fn allows(&self, attempt: usize) -> bool {
        self.max_attempts.is_none_or(|max| attempt <= max)
    }
}

/// WebSocket connection to the chat server, reconnecting on drops.
///
/// Owned by its own task (see [`Connection::run`]) so a reconnect is never
/// interrupted by other work.
pub struct Connection {
    ws_stream: WsStream,
    url: String,
    reconnect_policy: ReconnectPolicy,
}

impl Connection {
    pub async fn connect(url: String, policy: ReconnectPolicy) -> Result<Self> {
        let ws_stream = Self::establish_connection(&url)
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;

        tracing::debug!(url = %url, "Connected");
        Ok(Self {
            ws_stream,
            url,
            reconnect_policy: policy,
        })
    }

    async fn establish_connection(url: &str) -> Result<WsStream> {
        let (ws_stream, _) = connect_async(url)
            .await
            .with_context(|| "WebSocket handshake failed")?;
        Ok(ws_stream)
    }

    async fn reconnect(&mut self) -> Result<()> {
        let mut delay = self.reconnect_policy.initial_delay;
        let mut attempt = 1;

        loop {
            if !self.reconnect_policy.allows(attempt) {
                anyhow::bail!(
                    "Failed to reconnect after {} attempts to {}",
                    attempt - 1,
                    self.url
                );
            }

            tokio::time::sleep(delay).await;

            match Self::establish_connection(&self.url).await {
                Ok(ws_stream) => {
                    self.ws_stream = ws_stream;
                    tracing::debug!(url = %self.url, attempt, "Reconnected");
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt,
                        max_attempts = ?self.reconnect_policy.max_attempts,
                        error = %e,
                        "Reconnection attempt failed"
                    );
                    attempt += 1;
                    delay = self.reconnect_policy.next_delay(delay);
                }
            }
        }
    }

    /// Drive the socket until the client goes away or reconnection gives up.
    ///
    /// Lines queued on `outgoing` wait in the channel while a reconnect is in
    /// progress. Frames and reconnects are reported on `incoming`; a final
    /// `Err` is sent if the connection is lost for good.
    pub async fn run(
        mut self,
        mut outgoing: mpsc::UnboundedReceiver<ClientMessage>,
        incoming: mpsc::Sender<Result<Incoming>>,
    ) {
        if let Err(e) = self.pump(&mut outgoing, &incoming).await {
            tracing::error!(error = %e, "Connection closed");
            let _ = incoming.send(Err(e)).await;
        }
    }

    async fn pump(
        &mut self,
        outgoing: &mut mpsc::UnboundedReceiver<ClientMessage>,
        incoming: &mpsc::Sender<Result<Incoming>>,
    ) -> Result<()> {
        loop {
            // Both futures are cancel-safe; reconnecting happens in the arms
            let event = tokio::select! {
                message = self.ws_stream.next() => self.handle_ws(message).await?,
                message = outgoing.recv() => {
                    let Some(message) = message else {
                        // Client dropped
                        return Ok(());
                    };
                    self.send(message).await?
                }
            };

            if let Some(event) = event
                && incoming.send(Ok(event)).await.is_err()
            {
                return Ok(());
            }
        }
    }

    async fn handle_ws(
        &mut self,
        message: Option<Result<Message, WsError>>,
    ) -> Result<Option<Incoming>> {
        match message {
            Some(Ok(Message::Text(text))) => match parse_server_frame(&text) {
                Ok(frame) => Ok(Some(Incoming::Frame(frame))),
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping frame");
                    Ok(None)
                }
            },
            Some(Ok(Message::Ping(data))) => {
                if let Err(e) = self.ws_stream.send(Message::Pong(data)).await {
                    tracing::warn!(error = %e, "Failed to send pong, attempting reconnect");
                    self.reconnect()
                        .await
                        .context("Pong failed and reconnection failed")?;
                    return Ok(Some(Incoming::Reconnected));
                }
                Ok(None)
            }
            Some(Ok(Message::Close(_))) | None => {
                self.reconnect()
                    .await
                    .context("Connection lost and reconnection failed")?;
                Ok(Some(Incoming::Reconnected))
            }
            Some(Ok(_)) => Ok(None),
            Some(Err(e)) => {
                tracing::error!(error = %e, "WebSocket error, attempting reconnect");
                self.reconnect()
                    .await
                    .context("WebSocket error and reconnection failed")?;
                Ok(Some(Incoming::Reconnected))
            }
        }
    }

    /// Write one line, reconnecting and retrying once if the socket is dead
    async fn send(&mut self, message: ClientMessage) -> Result<Option<Incoming>> {
        let wire_format = message.to_wire_format();
        tracing::trace!(line = %wire_format, "Sending");

        let Err(e) = self.ws_stream.send(Message::Text(wire_format.clone())).await else {
            return Ok(None);
        };
        tracing::warn!(error = %e, "Send failed, attempting reconnect");
        self.reconnect()
            .await
            .context("Send failed and reconnection failed")?;
        self.ws_stream
            .send(Message::Text(wire_format))
            .await
            .context("Failed to send message")?;
        Ok(Some(Incoming::Reconnected))
    }
}
