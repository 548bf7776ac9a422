//! Canonical user ids and room identifiers

use std::fmt;

/// Prefix reserved for private-message rooms: `pm-<id1>-<id2>`
pub const PM_PREFIX: &str = "pm-";

/// Prefix of the pseudo-room that opens a PM with its challenge menu: `challenge-<id>`
pub const CHALLENGE_PREFIX: &str = "challenge-";

/// Normalize a username (or any free text) into its canonical id.
///
/// Lowercases and drops everything outside `[a-z0-9]`, so `" Alice B."` and
/// `"@alicebb"` style display names map onto stable keys.
pub fn to_id(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Identifier of a room as used on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Room id for the PM session between two users.
    ///
    /// The pair is ordered so both sides of the conversation compute the same id.
    pub fn pm(user_a: &str, user_b: &str) -> Self {
        let (a, b) = (to_id(user_a), to_id(user_b));
        if a <= b {
            Self(format!("{PM_PREFIX}{a}-{b}"))
        } else {
            Self(format!("{PM_PREFIX}{b}-{a}"))
        }
    }

    /// Resolve a room id typed by the user (`/join FOO BAR`).
    ///
    /// Input that already looks like a room id (`[a-z0-9-]`) is kept verbatim,
    /// anything else is canonicalized.
    pub fn from_user_input(target: &str) -> Self {
        let is_room_id = target
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if is_room_id {
            Self(target.to_string())
        } else {
            Self(to_id(target))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_pm(&self) -> bool {
        self.0.starts_with(PM_PREFIX)
    }

    /// The two canonical ids encoded in a PM room id.
    ///
    /// The second id is `None` for a truncated id such as `pm-alice`.
    pub fn pm_parties(&self) -> Option<(&str, Option<&str>)> {
        let rest = self.0.strip_prefix(PM_PREFIX)?;
        let mut ids = rest.split('-');
        let first = ids.next().unwrap_or_default();
        let second = ids.next().filter(|id| !id.is_empty());
        Some((first, second))
    }

    /// Target user of a `challenge-<id>` pseudo-room
    pub fn challenge_target(&self) -> Option<&str> {
        self.0
            .strip_prefix(CHALLENGE_PREFIX)
            .filter(|target| !target.is_empty())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoomId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RoomId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
