//! ChatRoom - state machine for a single channel or PM room

use parley_protocol::{ClientCommand, ClientMessage, RoomId, TokenEvent, to_id};

use crate::base::{Room, RoomCore};
use crate::events::Subscription;
use crate::host::HostHandle;
use crate::roster::Roster;

/// Options a room is opened with
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomOptions {
    /// Explicit PM target, used until the local identity resolves
    pub pm_target: Option<String>,
    /// Open with the challenge menu showing
    pub challenge_menu_open: bool,
    /// Display title for channel rooms (defaults to the room id)
    pub title: Option<String>,
}

impl RoomOptions {
    pub fn pm(target: impl Into<String>) -> Self {
        Self {
            pm_target: Some(target.into()),
            ..Self::default()
        }
    }

    pub fn with_challenge_menu(mut self) -> Self {
        self.challenge_menu_open = true;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// A chat room: either a channel or a two-party PM session.
///
/// Whether the room is a PM is decided by its id (`pm-<id1>-<id2>`); the
/// other party is re-derived from the id and the local user on construction
/// and before every send.
#[derive(Debug)]
pub struct ChatRoom {
    pub(crate) core: RoomCore,
    pub(crate) roster: Roster,

    // === PM-only state ===
    pub(crate) pm_target: Option<String>,
    pub(crate) challenge_menu_open: bool,
    /// Format of a challenge we issued
    pub(crate) challenging_format: Option<String>,
    /// Format of a challenge the other side issued
    pub(crate) challenged_format: Option<String>,
}

impl ChatRoom {
    /// Open a room and connect it
    pub fn new(id: RoomId, options: RoomOptions, host: HostHandle) -> Self {
        let mut room = Self {
            core: RoomCore::new(id, options.title, host),
            roster: Roster::new(),
            pm_target: options.pm_target,
            challenge_menu_open: options.challenge_menu_open,
            challenging_format: None,
            challenged_format: None,
        };
        room.update_target(true);
        room.connect();
        room
    }

    pub fn id(&self) -> &RoomId {
        &self.core.id
    }

    pub fn title(&self) -> &str {
        &self.core.title
    }

    pub fn is_connected(&self) -> bool {
        self.core.connected
    }

    pub fn is_pm(&self) -> bool {
        self.pm_target.is_some()
    }

    pub fn pm_target(&self) -> Option<&str> {
        self.pm_target.as_deref()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn user_count(&self) -> usize {
        self.roster.user_count()
    }

    pub fn subscribe(&self) -> Subscription {
        self.core.subscribe()
    }

    /// Join the room on the server. PM rooms need no join.
    pub fn connect(&mut self) {
        if self.core.connected {
            return;
        }
        if self.pm_target.is_none() {
            self.core
                .host()
                .send(ClientMessage::global(ClientCommand::JoinRoom(self.core.id.clone())));
        }
        self.core.connected = true;
    }

    /// Join again after the transport was replaced; the server forgot us
    pub fn reconnect(&mut self) {
        self.core.connected = false;
        self.connect();
    }

    /// Re-derive the PM target from the room id and the local user.
    ///
    /// Without `force` the target is left alone when neither id in the room
    /// id is ours (our identity may not have resolved yet). With `force` it
    /// falls back to the first id.
    ///
    /// A stored target that already canonicalizes to the other party is kept
    /// as-is, forced or not, so its display form survives; the roster seed and
    /// title are still refreshed. Falling back to the first id in that case
    /// would target ourselves when we are the first party.
    pub fn update_target(&mut self, force: bool) {
        let Some((first, second)) = self.core.id.pm_parties() else {
            return;
        };
        let first = first.to_string();
        let second = second.map(str::to_string);

        let me = self.core.host().user_id();
        let current = self.pm_target.as_deref().map(to_id);

        let resolved = match (&me, &second) {
            (Some(me), Some(second)) if *me == first => Some(second.clone()),
            (Some(me), Some(second)) if me == second => Some(first.clone()),
            _ => None,
        };
        match resolved {
            // Already talking to the right user; keep the display form we have
            Some(target) if current.as_deref() == Some(target.as_str()) => {}
            Some(target) => self.pm_target = Some(target),
            None if !force => return,
            None => self.pm_target = Some(first.clone()),
        }

        if self.roster.is_empty() {
            // Leading space: unranked
            let seed: Vec<String> = std::iter::once(first)
                .chain(second)
                .map(|id| format!(" {}", id))
                .collect();
            self.set_users(Some(seed.len()), seed);
        }

        self.core.title = format!("[PM] {}", self.pm_target.as_deref().unwrap_or_default());
        tracing::debug!(room = %self.core.id, target = ?self.pm_target, "PM target resolved");
    }

    /// Send a line typed into this room.
    ///
    /// Unless `direct`, empty lines are dropped and local commands get first
    /// refusal. PM rooms wrap the line in `/pm`; channels send it as-is.
    pub fn send(&mut self, line: &str, direct: bool) {
        self.update_target(false);
        if !direct && line.is_empty() {
            return;
        }
        if !direct && self.handle_message(line) {
            return;
        }

        if let Some(target) = &self.pm_target {
            self.core.host().send(ClientMessage::global(ClientCommand::Pm {
                target: target.clone(),
                message: line.to_string(),
            }));
            return;
        }

        self.core.send_direct(line);
    }

    // === Roster ===

    pub fn set_users<I, S>(&mut self, declared: Option<usize>, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roster.set_users(declared, names);
        self.core.update();
    }

    pub fn add_user(&mut self, name: &str) {
        self.roster.add_user(name);
        self.core.update();
    }

    /// Remove a user; `silent` skips the change notification
    pub fn remove_user(&mut self, name: &str, silent: bool) {
        self.roster.remove_user(name);
        if !silent {
            self.core.update();
        }
    }

    pub fn rename_user(&mut self, new_name: &str, old_name: &str) {
        self.roster.rename_user(new_name, old_name);
        self.core.update();
    }

    /// Close the room. PM rooms have nothing to leave on the server.
    pub fn destroy(&mut self) {
        if self.pm_target.is_some() {
            self.core.connected = false;
        }
        self.core.teardown();
    }
}

impl Room for ChatRoom {
    fn id(&self) -> &RoomId {
        ChatRoom::id(self)
    }

    fn title(&self) -> &str {
        ChatRoom::title(self)
    }

    fn is_connected(&self) -> bool {
        ChatRoom::is_connected(self)
    }

    fn connect(&mut self) {
        ChatRoom::connect(self)
    }

    fn send(&mut self, line: &str, direct: bool) {
        ChatRoom::send(self, line, direct)
    }

    fn receive_line(&mut self, event: TokenEvent) {
        ChatRoom::receive_line(self, event)
    }

    fn subscribe(&self) -> Subscription {
        ChatRoom::subscribe(self)
    }

    fn destroy(&mut self) {
        ChatRoom::destroy(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{RoomUpdate, drain};
    use crate::testing::{host_as, sent_lines};

    #[test]
    fn test_channel_joins_on_construction() {
        let (host, mut rx) = host_as(Some("alice"));
        let room = ChatRoom::new(RoomId::from("lobby"), RoomOptions::default(), host);

        assert!(room.is_connected());
        assert!(!room.is_pm());
        assert_eq!(room.title(), "lobby");
        assert_eq!(sent_lines(&mut rx), vec!["|/join lobby"]);
    }

    #[test]
    fn test_connect_is_idempotent() {
        let (host, mut rx) = host_as(None);
        let mut room = ChatRoom::new(RoomId::from("lobby"), RoomOptions::default(), host);

        room.connect();
        room.connect();
        assert_eq!(sent_lines(&mut rx).len(), 1);
    }

    #[test]
    fn test_reconnect_rejoins_channel_only() {
        let (host, mut rx) = host_as(Some("alice"));
        let mut lobby = ChatRoom::new(RoomId::from("lobby"), RoomOptions::default(), host.clone());
        let mut pm = ChatRoom::new(RoomId::from("pm-alice-bob"), RoomOptions::default(), host);
        sent_lines(&mut rx);

        lobby.reconnect();
        pm.reconnect();

        assert!(lobby.is_connected());
        assert!(pm.is_connected());
        assert_eq!(sent_lines(&mut rx), vec!["|/join lobby"]);
    }

    #[test]
    fn test_pm_room_resolves_target_for_first_party() {
        let (host, mut rx) = host_as(Some("alice"));
        let room = ChatRoom::new(RoomId::from("pm-alice-bob"), RoomOptions::default(), host);

        assert_eq!(room.pm_target(), Some("bob"));
        assert_eq!(room.title(), "[PM] bob");
        assert!(room.is_connected());
        // PM rooms are never joined
        assert!(sent_lines(&mut rx).is_empty());
    }

    #[test]
    fn test_pm_room_resolves_target_for_second_party() {
        let (host, _rx) = host_as(Some("bob"));
        let room = ChatRoom::new(RoomId::from("pm-alice-bob"), RoomOptions::default(), host);

        assert_eq!(room.pm_target(), Some("alice"));
    }

    #[test]
    fn test_pm_room_seeds_roster() {
        let (host, _rx) = host_as(Some("alice"));
        let room = ChatRoom::new(RoomId::from("pm-alice-bob"), RoomOptions::default(), host);

        assert_eq!(room.user_count(), 2);
        assert_eq!(room.roster().get("alice"), Some(" alice"));
        assert_eq!(room.roster().get("bob"), Some(" bob"));
    }

    #[test]
    fn test_forced_target_without_identity() {
        let (host, _rx) = host_as(None);
        let room = ChatRoom::new(RoomId::from("pm-alice-bob"), RoomOptions::default(), host);

        assert_eq!(room.pm_target(), Some("alice"));
    }

    #[test]
    fn test_unforced_update_keeps_target_until_identity_resolves() {
        let (host, _rx) = host_as(None);
        let mut room = ChatRoom::new(
            RoomId::from("pm-alice-bob"),
            RoomOptions::pm("Bob"),
            host.clone(),
        );
        // Forced on construction, falls back to the first id
        assert_eq!(room.pm_target(), Some("alice"));

        room.pm_target = Some("Bob".into());
        room.update_target(false);
        assert_eq!(room.pm_target(), Some("Bob"));

        host.set_user_id(Some("bob".into()));
        room.update_target(false);
        assert_eq!(room.pm_target(), Some("alice"));
        assert_eq!(room.title(), "[PM] alice");
    }

    #[test]
    fn test_explicit_target_matching_id_is_kept() {
        let (host, _rx) = host_as(Some("alice"));
        let mut room = ChatRoom::new(
            RoomId::from("pm-alice-bob"),
            RoomOptions::pm("Bob"),
            host,
        );
        assert_eq!(room.pm_target(), Some("Bob"));
        assert_eq!(room.title(), "[PM] Bob");

        room.update_target(false);
        assert_eq!(room.pm_target(), Some("Bob"));
    }

    #[test]
    fn test_send_in_channel() {
        let (host, mut rx) = host_as(Some("alice"));
        let mut room = ChatRoom::new(RoomId::from("lobby"), RoomOptions::default(), host);
        sent_lines(&mut rx);

        room.send("hello", false);
        room.send("/me waves", false);
        room.send("", false);

        assert_eq!(sent_lines(&mut rx), vec!["lobby|hello", "lobby|/me waves"]);
    }

    #[test]
    fn test_send_in_pm_is_wrapped() {
        let (host, mut rx) = host_as(Some("alice"));
        let mut room = ChatRoom::new(RoomId::from("pm-alice-bob"), RoomOptions::default(), host);

        room.send("hi there", false);
        room.send("//literal", false);

        assert_eq!(
            sent_lines(&mut rx),
            vec!["|/pm bob, hi there", "|/pm bob, //literal"]
        );
    }

    #[test]
    fn test_direct_send_skips_commands_and_empty_check() {
        let (host, mut rx) = host_as(Some("alice"));
        let mut room = ChatRoom::new(RoomId::from("lobby"), RoomOptions::default(), host);
        sent_lines(&mut rx);

        room.send("/join foo", true);
        room.send("", true);

        assert_eq!(sent_lines(&mut rx), vec!["lobby|/join foo", "lobby|"]);
    }

    #[test]
    fn test_roster_changes_notify() {
        let (host, _rx) = host_as(None);
        let mut room = ChatRoom::new(RoomId::from("lobby"), RoomOptions::default(), host);
        let mut updates = room.subscribe();

        room.add_user(" Alice");
        room.remove_user(" Alice", true);
        room.add_user(" Bob");
        room.rename_user(" Robert", " Bob");

        let changes = drain(&mut updates);
        assert_eq!(changes, vec![RoomUpdate::Changed; 3]);
        assert_eq!(room.user_count(), 1);
    }

    #[test]
    fn test_destroy_pm_room_sends_nothing() {
        let (host, mut rx) = host_as(Some("alice"));
        let mut room = ChatRoom::new(RoomId::from("pm-alice-bob"), RoomOptions::default(), host);

        room.destroy();

        assert!(!room.is_connected());
        assert!(sent_lines(&mut rx).is_empty());
    }

    #[test]
    fn test_destroy_channel_leaves() {
        let (host, mut rx) = host_as(Some("alice"));
        let mut room = ChatRoom::new(RoomId::from("lobby"), RoomOptions::default(), host);
        sent_lines(&mut rx);

        room.destroy();

        assert!(!room.is_connected());
        assert_eq!(sent_lines(&mut rx), vec!["|/noreply /leave lobby"]);
    }
}
