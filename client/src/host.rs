//! RoomHost - owns every open room and routes traffic between them and the wire

use std::collections::HashMap;

use parley_protocol::{
    ChallengeState, ClientMessage, DisplayName, RoomId, ServerFrame, ServerMessage, TokenEvent,
    parse_server_message, to_id,
};
use parley_room::{ChatRoom, HostHandle, HostRequest, RoomOptions, RoomUpdate, Subscription, drain};
use tokio::sync::{broadcast, mpsc};

/// Room frames without a `>ROOMID` header belong here
pub const DEFAULT_ROOM: &str = "lobby";

const EVENT_CAPACITY: usize = 256;

/// What the host tells a UI following all rooms
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Opened(RoomId),
    Closed(RoomId),
    Update { room: RoomId, update: RoomUpdate },
    Popup(String),
}

struct HostedRoom {
    room: ChatRoom,
    updates: Subscription,
}

/// Multi-room router.
///
/// Rooms reach the host through a [`HostHandle`]; the host drains those
/// requests, puts outgoing lines on `outgoing` and applies incoming frames
/// room by room, in order.
pub struct RoomHost {
    handle: HostHandle,
    requests: mpsc::UnboundedReceiver<HostRequest>,
    outgoing: mpsc::UnboundedSender<ClientMessage>,
    events: broadcast::Sender<HostEvent>,
    rooms: HashMap<RoomId, HostedRoom>,
}

impl RoomHost {
    pub fn new(outgoing: mpsc::UnboundedSender<ClientMessage>) -> Self {
        let (handle, requests) = HostHandle::channel();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            handle,
            requests,
            outgoing,
            events,
            rooms: HashMap::new(),
        }
    }

    pub fn handle(&self) -> HostHandle {
        self.handle.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.events.subscribe()
    }

    pub fn user_id(&self) -> Option<String> {
        self.handle.user_id()
    }

    pub fn room(&self, id: &RoomId) -> Option<&ChatRoom> {
        self.rooms.get(id).map(|hosted| &hosted.room)
    }

    pub fn room_mut(&mut self, id: &RoomId) -> Option<&mut ChatRoom> {
        self.rooms.get_mut(id).map(|hosted| &mut hosted.room)
    }

    pub fn room_ids(&self) -> Vec<RoomId> {
        let mut ids: Vec<RoomId> = self.rooms.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Wait for the next request from a room or a handle
    pub async fn next_request(&mut self) -> Option<HostRequest> {
        self.requests.recv().await
    }

    /// Handle every request queued so far, including ones queued while
    /// handling, then forward room updates
    pub fn process_requests(&mut self) {
        while let Ok(request) = self.requests.try_recv() {
            self.handle_request(request);
        }
        self.flush_updates();
    }

    pub fn handle_request(&mut self, request: HostRequest) {
        match request {
            HostRequest::Send(message) => {
                if self.outgoing.send(message).is_err() {
                    tracing::warn!("Connection closed, dropping outgoing message");
                }
            }
            HostRequest::Join(id) => self.join(id),
            HostRequest::Leave(id) => self.leave(&id),
            HostRequest::Submit { room, line } => match self.room_mut(&room) {
                Some(target) => target.send(&line, false),
                None => tracing::warn!(room = %room, "Submit to a room that is not open"),
            },
        }
    }

    /// Open (or focus) a room by id.
    ///
    /// `challenge-<user>` opens the PM room with that user with the challenge
    /// menu showing.
    pub fn join(&mut self, id: RoomId) {
        if let Some(target) = id.challenge_target() {
            let Some(me) = self.user_id() else {
                tracing::warn!(room = %id, "Cannot challenge before our identity is known");
                return;
            };
            let pm = RoomId::pm(&me, target);
            let options = RoomOptions::pm(target).with_challenge_menu();
            if self.rooms.contains_key(&pm) {
                if let Some(room) = self.room_mut(&pm) {
                    room.open_challenge();
                }
            } else {
                self.open(pm, options);
            }
            return;
        }

        if !self.rooms.contains_key(&id) {
            self.open(id, RoomOptions::default());
        }
    }

    /// Open a room unless it is already open
    pub fn open(&mut self, id: RoomId, options: RoomOptions) -> &mut ChatRoom {
        let hosted = self.rooms.entry(id.clone()).or_insert_with(|| {
            tracing::debug!(room = %id, "Opening room");
            let room = ChatRoom::new(id.clone(), options, self.handle.clone());
            let updates = room.subscribe();
            let _ = self.events.send(HostEvent::Opened(id.clone()));
            HostedRoom { room, updates }
        });
        &mut hosted.room
    }

    /// Close a room; channels are left on the server
    pub fn leave(&mut self, id: &RoomId) {
        let Some(mut hosted) = self.rooms.remove(id) else {
            tracing::debug!(room = %id, "Leave for a room that is not open");
            return;
        };
        hosted.room.destroy();
        let _ = self.events.send(HostEvent::Closed(id.clone()));
    }

    /// The connection was replaced: join every channel room again
    pub fn rejoin(&mut self) {
        tracing::debug!(rooms = self.rooms.len(), "Rejoining rooms after reconnect");
        for hosted in self.rooms.values_mut() {
            hosted.room.reconnect();
        }
        self.process_requests();
    }

    /// Apply one server frame
    pub fn handle_frame(&mut self, frame: ServerFrame) {
        let room_id = frame
            .room_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| RoomId::new(DEFAULT_ROOM));

        for event in frame.events {
            match parse_server_message(&event) {
                Ok(ServerMessage::Raw(event)) => self.route(&room_id, event),
                Ok(ServerMessage::Deinit) => self.leave(&room_id),
                Ok(message) => self.handle_global(message),
                Err(e) => {
                    tracing::warn!(room = %room_id, tag = event.tag(), error = %e, "Malformed message");
                    self.route(&room_id, event);
                }
            }
        }

        self.process_requests();
    }

    fn route(&mut self, room_id: &RoomId, event: TokenEvent) {
        // The server announces rooms it put us in with |init|
        if event.tag() == "init" && !self.rooms.contains_key(room_id) {
            self.open(room_id.clone(), RoomOptions::default());
        }

        match self.room_mut(room_id) {
            Some(room) => room.receive_line(event),
            None => tracing::debug!(room = %room_id, tag = event.tag(), "Dropping event for closed room"),
        }
    }

    /// Messages that are not about any single room
    pub fn handle_global(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::UpdateUser { user, named, .. } => {
                let id = user.id();
                tracing::debug!(user = %id, named, "Identity updated");
                self.handle.set_user_id(Some(id));
                for hosted in self.rooms.values_mut() {
                    hosted.room.update_target(false);
                }
            }
            ServerMessage::Pm {
                sender,
                receiver,
                message,
            } => self.receive_pm(&sender, &receiver, message),
            ServerMessage::UpdateChallenges(state) => self.update_challenges(&state),
            ServerMessage::Popup(text) => {
                tracing::info!(popup = %text, "Server popup");
                let _ = self.events.send(HostEvent::Popup(text));
            }
            ServerMessage::Deinit | ServerMessage::Raw(_) => {}
        }
    }

    fn receive_pm(&mut self, sender: &DisplayName, receiver: &DisplayName, message: String) {
        let me = self.user_id();
        let other = if me.as_deref() == Some(sender.id().as_str()) {
            receiver
        } else {
            sender
        };

        let id = RoomId::pm(&sender.id(), &receiver.id());
        let room = self.open(id, RoomOptions::pm(other.name.clone()));
        let from = format!("{}{}", sender.rank, sender.name);
        room.receive_line(TokenEvent::new(["c".to_string(), from, message]));
    }

    fn update_challenges(&mut self, state: &ChallengeState) {
        if let Some(me) = self.user_id() {
            for challenger in state.challenges_from.keys() {
                let id = RoomId::pm(&me, challenger);
                if !self.rooms.contains_key(&id) {
                    self.open(id, RoomOptions::pm(to_id(challenger)));
                }
            }
        }

        for hosted in self.rooms.values_mut() {
            hosted.room.sync_challenges(state);
        }
    }

    /// Re-publish room updates as host events
    fn flush_updates(&mut self) {
        for (id, hosted) in self.rooms.iter_mut() {
            for update in drain(&mut hosted.updates) {
                let _ = self.events.send(HostEvent::Update {
                    room: id.clone(),
                    update,
                });
            }
        }
    }
}
