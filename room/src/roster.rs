//! Users present in a room

use std::collections::HashMap;

use parley_protocol::{DisplayName, to_id};

/// Map of canonical user id to display name.
///
/// Display names are stored verbatim, rank symbol and `@!` away suffix
/// included. `user_count` is adjusted on every mutation rather than
/// recounted, and always equals the number of entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    users: HashMap<String, String>,
    user_count: usize,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.user_count
    }

    pub fn is_empty(&self) -> bool {
        self.user_count == 0
    }

    /// Display name for a user id
    pub fn get(&self, user_id: &str) -> Option<&str> {
        self.users.get(user_id).map(String::as_str)
    }

    /// Whether a user, given by display name or id, is present
    pub fn contains(&self, name: &str) -> bool {
        self.users.contains_key(&to_id(name))
    }

    /// (id, display name) pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.users
            .iter()
            .map(|(id, name)| (id.as_str(), name.as_str()))
    }

    /// Replace the roster wholesale.
    ///
    /// The count is taken from the names actually given; a `declared` count
    /// that disagrees is only reported.
    pub fn set_users<I, S>(&mut self, declared: Option<usize>, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.users.clear();
        self.user_count = 0;
        for name in names {
            self.insert(name.into());
        }

        if declared != Some(self.user_count) {
            tracing::warn!(
                declared = ?declared,
                actual = self.user_count,
                "Roster count does not match user list"
            );
        }
    }

    /// Add or update a user; returns true if the user was not present
    pub fn add_user(&mut self, name: &str) -> bool {
        self.insert(name.to_string())
    }

    /// Remove a user by display name; returns true if the user was present
    pub fn remove_user(&mut self, name: &str) -> bool {
        if self.users.remove(&to_id(name)).is_some() {
            self.user_count -= 1;
            true
        } else {
            false
        }
    }

    /// Replace `old_name` with `new_name`
    pub fn rename_user(&mut self, new_name: &str, old_name: &str) {
        self.remove_user(old_name);
        self.add_user(new_name);
    }

    /// Users in display order: by group order from `group_order` (lower
    /// first), present before away, then by id.
    pub fn sorted<F>(&self, group_order: F) -> Vec<(&str, DisplayName)>
    where
        F: Fn(char) -> i32,
    {
        let mut listing: Vec<(&str, DisplayName)> = self
            .users
            .iter()
            .filter_map(|(id, name)| Some((id.as_str(), DisplayName::parse(name)?)))
            .collect();

        listing.sort_by(|(id_a, a), (id_b, b)| {
            group_order(a.rank)
                .cmp(&group_order(b.rank))
                .then(a.away.cmp(&b.away))
                .then_with(|| id_a.cmp(id_b))
        });
        listing
    }

    fn insert(&mut self, name: String) -> bool {
        let user_id = to_id(&name);
        let added = self.users.insert(user_id, name).is_none();
        if added {
            self.user_count += 1;
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_count_matches(roster: &Roster) {
        assert_eq!(roster.user_count(), roster.iter().count());
    }

    #[test]
    fn test_new_roster() {
        let roster = Roster::new();
        assert!(roster.is_empty());
        assert_eq!(roster.user_count(), 0);
    }

    #[test]
    fn test_set_users() {
        let mut roster = Roster::new();
        roster.set_users(Some(3), [" Alice", "@Bob", "+Carol@!"]);

        assert_eq!(roster.user_count(), 3);
        assert_eq!(roster.get("bob"), Some("@Bob"));
        assert_eq!(roster.get("carol"), Some("+Carol@!"));
        assert_count_matches(&roster);
    }

    #[test]
    fn test_set_users_trusts_names_over_declared_count() {
        let mut roster = Roster::new();

        roster.set_users(Some(5), [" Alice", "@Bob"]);
        assert_eq!(roster.user_count(), 2);

        roster.set_users(None, [" Alice", " alice", " Carol"]);
        assert_eq!(roster.user_count(), 2);
        assert_eq!(roster.get("alice"), Some(" alice"));
        assert_count_matches(&roster);
    }

    #[test]
    fn test_set_users_replaces() {
        let mut roster = Roster::new();
        roster.set_users(Some(2), [" Alice", " Bob"]);
        roster.set_users(Some(1), [" Carol"]);

        assert!(!roster.contains("Alice"));
        assert!(roster.contains("Carol"));
        assert_eq!(roster.user_count(), 1);
    }

    #[test]
    fn test_add_user_is_keyed_by_id() {
        let mut roster = Roster::new();

        assert!(roster.add_user(" Alice"));
        assert!(!roster.add_user("@Alice"));

        assert_eq!(roster.user_count(), 1);
        assert_eq!(roster.get("alice"), Some("@Alice"));
    }

    #[test]
    fn test_remove_user() {
        let mut roster = Roster::new();
        roster.add_user(" Alice");

        assert!(!roster.remove_user(" Bob"));
        assert_eq!(roster.user_count(), 1);

        assert!(roster.remove_user("@Alice"));
        assert_eq!(roster.user_count(), 0);

        // Never goes below zero
        assert!(!roster.remove_user(" Alice"));
        assert_eq!(roster.user_count(), 0);
    }

    #[test]
    fn test_rename_user() {
        let mut roster = Roster::new();
        roster.set_users(Some(2), [" Alice", " Bob"]);

        roster.rename_user(" Alicia", "alice");
        assert!(!roster.contains("alice"));
        assert_eq!(roster.get("alicia"), Some(" Alicia"));
        assert_eq!(roster.user_count(), 2);

        // Renaming onto an existing user merges the entries
        roster.rename_user(" Bob", "alicia");
        assert_eq!(roster.user_count(), 1);

        // Renaming an unknown user still adds the new name
        roster.rename_user(" Dave", "nobody");
        assert_eq!(roster.user_count(), 2);
        assert_count_matches(&roster);
    }

    #[test]
    fn test_count_invariant_over_mixed_operations() {
        let mut roster = Roster::new();
        roster.set_users(Some(2), [" a", " b"]);
        roster.add_user(" c");
        roster.add_user(" c");
        roster.remove_user(" a");
        roster.remove_user(" zz");
        roster.rename_user(" d", " b");
        roster.rename_user(" c", " d");
        roster.add_user("+e@!");

        assert_eq!(roster.user_count(), 2);
        assert_count_matches(&roster);
    }

    #[test]
    fn test_sorted_listing() {
        let mut roster = Roster::new();
        roster.set_users(None, [" zed", " amy@!", " bob", "@mod", "+voice"]);

        let order = |rank: char| match rank {
            '@' => 1,
            '+' => 2,
            _ => 3,
        };
        let ids: Vec<&str> = roster.sorted(order).iter().map(|(id, _)| *id).collect();

        assert_eq!(ids, vec!["mod", "voice", "bob", "zed", "amy"]);
    }
}
