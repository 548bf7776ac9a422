//! Challenge negotiation inside PM rooms

use parley_protocol::{
    ChallengeState, ClientCommand, ClientMessage, PackedTeam, TokenEvent, to_id,
};

use crate::error::RoomError;
use crate::room::ChatRoom;

const NOT_A_PM: &str = "Can only be used in a PM.";

impl ChatRoom {
    pub fn challenge_menu_open(&self) -> bool {
        self.challenge_menu_open
    }

    /// Format of the challenge we sent, if any
    pub fn challenging_format(&self) -> Option<&str> {
        self.challenging_format.as_deref()
    }

    /// Format of the challenge we received, if any
    pub fn challenged_format(&self) -> Option<&str> {
        self.challenged_format.as_deref()
    }

    /// Show the challenge menu
    pub fn open_challenge(&mut self) {
        if self.pm_target.is_none() {
            self.receive_line(TokenEvent::error(NOT_A_PM));
            return;
        }
        self.challenge_menu_open = true;
        self.core.update();
    }

    /// Withdraw our challenge, or close the menu if there is none
    pub fn cancel_challenge(&mut self) {
        if self.pm_target.is_none() {
            self.receive_line(TokenEvent::error(NOT_A_PM));
            return;
        }
        if self.challenging_format.is_some() {
            self.send("/cancelchallenge", true);
            self.challenging_format = None;
            // Leave the menu up so a new challenge can be made
            self.challenge_menu_open = true;
        } else {
            self.challenge_menu_open = false;
        }
        self.core.update();
    }

    /// Challenge the other party in `format`.
    ///
    /// Only reachable from UI shown in PM rooms; anywhere else it is a
    /// caller bug and fails with [`RoomError::NotPm`].
    pub fn make_challenge(&mut self, format: &str, team: Option<&PackedTeam>) -> Result<(), RoomError> {
        let target = self
            .pm_target
            .clone()
            .ok_or_else(|| RoomError::NotPm(self.core.id.clone()))?;

        let host = self.core.host();
        host.send(ClientMessage::global(ClientCommand::UpdateTeam(
            team.cloned().unwrap_or_default(),
        )));
        host.send(ClientMessage::global(ClientCommand::Challenge {
            username: target,
            format: format.to_string(),
        }));

        self.challenge_menu_open = false;
        self.challenging_format = Some(format.to_string());
        self.core.update();
        Ok(())
    }

    /// Accept the challenge the other party sent
    pub fn accept_challenge(&mut self, team: Option<&PackedTeam>) -> Result<(), RoomError> {
        if self.pm_target.is_none() {
            return Err(RoomError::NotPm(self.core.id.clone()));
        }

        self.core
            .host()
            .send(ClientMessage::global(ClientCommand::UpdateTeam(
                team.cloned().unwrap_or_default(),
            )));
        self.send("/accept", false);

        self.challenged_format = None;
        self.core.update();
        Ok(())
    }

    /// Bring both challenge slots in line with the server's view
    pub fn sync_challenges(&mut self, state: &ChallengeState) {
        let Some(target) = self.pm_target.as_deref().map(to_id) else {
            return;
        };

        let challenged = state.challenges_from.get(&target).cloned();
        let challenging = state
            .challenge_to
            .as_ref()
            .filter(|challenge| to_id(&challenge.to) == target)
            .map(|challenge| challenge.format.clone());

        if challenged == self.challenged_format && challenging == self.challenging_format {
            return;
        }
        if challenging.is_some() {
            self.challenge_menu_open = false;
        }
        self.challenged_format = challenged;
        self.challenging_format = challenging;
        self.core.update();
    }
}
