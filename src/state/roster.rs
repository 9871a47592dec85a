//! The Roster - central shared model of characters and channels.
//!
//! The Roster holds every known character, the currently joined channels,
//! the global list memberships, and the channel directory snapshots, in
//! concurrent structures readable from the UI-observation path while the
//! dispatch path mutates them.

use crate::state::list::ListTable;
use crate::state::rank::{self, RankFlags, RelationTier};
use crate::state::{Channel, ChannelKind, ChannelSummary, Character, CharacterStatus, ListKind};
use dashmap::{DashMap, DashSet};
use fennec_wire::fold_name;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

/// Directory snapshots from the public/private room list commands.
#[derive(Debug, Default)]
struct Directory {
    public: Vec<ChannelSummary>,
    private: Vec<ChannelSummary>,
}

/// Central shared state container.
///
/// Absence is never an error here: looking up an unknown character creates
/// an offline placeholder, and list operations on names never seen online
/// work against that placeholder. The protocol delivers membership and
/// presence in arbitrary order, so "unknown character" must always be a
/// representable, non-exceptional state.
pub struct Roster {
    /// All known characters, indexed by folded name.
    characters: DashMap<String, Arc<RwLock<Character>>>,

    /// Folded names of characters currently online.
    online: DashSet<String>,

    /// Global list memberships.
    lists: RwLock<ListTable>,

    /// Joined channels (and private-message surfaces), indexed by folded id.
    channels: DashMap<String, Arc<RwLock<Channel>>>,

    /// Last received room directory snapshots.
    directory: RwLock<Directory>,

    /// Server variables announced at login.
    variables: DashMap<String, serde_json::Value>,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self {
            characters: DashMap::new(),
            online: DashSet::new(),
            lists: RwLock::new(ListTable::new()),
            channels: DashMap::new(),
            directory: RwLock::new(Directory::default()),
            variables: DashMap::new(),
        }
    }

    // ------------------------------------------------------------------
    // Characters
    // ------------------------------------------------------------------

    /// Look up a character, creating an offline placeholder when the name
    /// has never been seen. Never fails.
    pub fn find(&self, name: &str) -> Arc<RwLock<Character>> {
        self.characters
            .entry(fold_name(name))
            .or_insert_with(|| Arc::new(RwLock::new(Character::new(name))))
            .clone()
    }

    /// Look up a character without creating one.
    pub fn get(&self, name: &str) -> Option<Arc<RwLock<Character>>> {
        self.characters.get(&fold_name(name)).map(|r| r.value().clone())
    }

    /// Record a sign-on. Updates the stored record in place and marks the
    /// name online. Returns whether the name was newly online.
    pub fn sign_on(&self, incoming: Character) -> bool {
        let key = fold_name(&incoming.name);
        let record = self.find(&incoming.name);
        {
            let mut ch = record.write();
            ch.name = incoming.name;
            ch.gender = incoming.gender;
            ch.status = incoming.status;
            ch.status_message = incoming.status_message;
        }
        self.online.insert(key)
    }

    /// Record a sign-off: the full logical transaction of removing the name
    /// from the online set, marking the record offline, and sweeping it out
    /// of every joined channel's present set. Returns whether the name was
    /// actually online, so callers can suppress redundant notifications.
    pub fn sign_off(&self, name: &str) -> bool {
        let key = fold_name(name);
        let was_online = self.online.remove(&key).is_some();

        if let Some(record) = self.characters.get(&key) {
            let mut ch = record.write();
            ch.status = CharacterStatus::Offline;
            ch.status_message.clear();
            ch.last_ad = None;
        }

        for entry in self.channels.iter() {
            entry.value().write().roles.sign_off(name);
        }

        was_online
    }

    /// Online classification.
    pub fn is_online(&self, name: &str) -> bool {
        self.online.contains(&fold_name(name))
    }

    /// Number of characters currently online.
    pub fn online_count(&self) -> usize {
        self.online.len()
    }

    // ------------------------------------------------------------------
    // Global lists
    // ------------------------------------------------------------------

    /// Idempotent list add. Creates a placeholder record for unseen names so
    /// membership can be asserted before presence is known. Returns whether
    /// membership actually changed.
    pub fn add(&self, name: &str, kind: ListKind) -> bool {
        self.find(name);
        self.lists.write().add(name, kind)
    }

    /// Idempotent list remove. Returns whether membership actually changed.
    pub fn remove(&self, name: &str, kind: ListKind) -> bool {
        self.lists.write().remove(name, kind)
    }

    /// Replace the entire membership of `kind` with exactly `names`. The
    /// only operation that may shrink a set without individual removes.
    pub fn set(&self, names: &[String], kind: ListKind) {
        for name in names {
            self.find(name);
        }
        self.lists.write().replace(names, kind);
    }

    /// Membership query. With `online_only`, membership of an offline name
    /// reads as false.
    pub fn is_on_list(&self, name: &str, kind: ListKind, online_only: bool) -> bool {
        if !self.lists.read().contains(name, kind) {
            return false;
        }
        !online_only || self.is_online(name)
    }

    /// Display names on a list, optionally restricted to online ones.
    pub fn names(&self, kind: ListKind, online_only: bool) -> HashSet<String> {
        let all = self.lists.read().names(kind);
        if !online_only {
            return all;
        }
        all.into_iter().filter(|n| self.is_online(n)).collect()
    }

    /// Whether events about this character are worth surfacing: on any
    /// important list and not dismissed.
    pub fn is_of_interest(&self, name: &str) -> bool {
        let lists = self.lists.read();
        let important = lists.contains(name, ListKind::Friend)
            || lists.contains(name, ListKind::Bookmark)
            || lists.contains(name, ListKind::Moderator)
            || lists.contains(name, ListKind::Interested);
        let dismissed =
            lists.contains(name, ListKind::Ignored) || lists.contains(name, ListKind::NotInterested);
        important && !dismissed
    }

    /// Whether inbound content from this character should be dropped
    /// outright (server-side or client-local ignore).
    pub fn is_ignored(&self, name: &str) -> bool {
        let lists = self.lists.read();
        lists.contains(name, ListKind::Ignored) || lists.contains(name, ListKind::ClientIgnored)
    }

    // ------------------------------------------------------------------
    // Ranking
    // ------------------------------------------------------------------

    /// Relationship tier for sorting a character within `channel` (or in a
    /// global listing when `channel` is `None`).
    pub fn relationship_rank(&self, name: &str, channel: Option<&str>) -> RelationTier {
        let flags = {
            let lists = self.lists.read();
            RankFlags {
                friend: lists.contains(name, ListKind::Friend),
                bookmark: lists.contains(name, ListKind::Bookmark),
                interested: lists.contains(name, ListKind::Interested),
                global_mod: lists.contains(name, ListKind::Moderator),
                channel_staff: false,
                ignored: lists.contains(name, ListKind::Ignored)
                    || lists.contains(name, ListKind::ClientIgnored),
                not_interested: lists.contains(name, ListKind::NotInterested),
            }
        };

        let channel_staff = channel
            .and_then(|id| self.channel(id))
            .is_some_and(|ch| ch.read().roles.ranks_as_staff(name));

        let status = self
            .get(name)
            .map(|record| record.read().status)
            .unwrap_or(CharacterStatus::Offline);

        rank::tier(status, RankFlags { channel_staff, ..flags })
    }

    /// Sort key for a character listing: tier, then folded name.
    pub fn sort_key(&self, name: &str, channel: Option<&str>) -> (u8, String) {
        rank::sort_key(name, self.relationship_rank(name, channel))
    }

    // ------------------------------------------------------------------
    // Channels
    // ------------------------------------------------------------------

    /// Look up a joined channel by id.
    pub fn channel(&self, id: &str) -> Option<Arc<RwLock<Channel>>> {
        self.channels.get(&fold_name(id)).map(|r| r.value().clone())
    }

    /// Whether a channel id is known.
    pub fn has_channel(&self, id: &str) -> bool {
        self.channels.contains_key(&fold_name(id))
    }

    /// Get or create a channel. Returns the record and whether it was newly
    /// created.
    pub fn create_channel(
        &self,
        id: &str,
        title: &str,
        kind: ChannelKind,
    ) -> (Arc<RwLock<Channel>>, bool) {
        let key = fold_name(id);
        let mut created = false;
        let record = self
            .channels
            .entry(key)
            .or_insert_with(|| {
                created = true;
                Arc::new(RwLock::new(Channel::new(id, title, kind)))
            })
            .clone();
        (record, created)
    }

    /// Remove a channel (local user left or was kicked). Returns whether it
    /// existed.
    pub fn remove_channel(&self, id: &str) -> bool {
        self.channels.remove(&fold_name(id)).is_some()
    }

    /// Ids of all joined channels.
    pub fn channel_ids(&self) -> Vec<String> {
        self.channels.iter().map(|e| e.value().read().id.clone()).collect()
    }

    // ------------------------------------------------------------------
    // Directory and variables
    // ------------------------------------------------------------------

    /// Replace a directory snapshot.
    pub fn set_directory(&self, public: bool, rows: Vec<ChannelSummary>) {
        let mut dir = self.directory.write();
        if public {
            dir.public = rows;
        } else {
            dir.private = rows;
        }
    }

    /// Read back a directory snapshot.
    pub fn directory(&self, public: bool) -> Vec<ChannelSummary> {
        let dir = self.directory.read();
        if public { dir.public.clone() } else { dir.private.clone() }
    }

    /// Store a server variable.
    pub fn set_variable(&self, key: &str, value: serde_json::Value) {
        self.variables.insert(key.to_string(), value);
    }

    /// Read a server variable.
    pub fn variable(&self, key: &str) -> Option<serde_json::Value> {
        self.variables.get(key).map(|v| v.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Gender;

    #[test]
    fn test_find_creates_ghost() {
        let roster = Roster::new();
        let record = roster.find("Mara");
        assert_eq!(record.read().status, CharacterStatus::Offline);
        assert!(!roster.is_online("Mara"));
        // Same record for any casing.
        assert!(Arc::ptr_eq(&record, &roster.find("MARA")));
    }

    #[test]
    fn test_sign_on_off_round_trip() {
        let roster = Roster::new();
        assert!(roster.sign_on(Character::online("Mara", Gender::Female, CharacterStatus::Looking)));
        assert!(!roster.sign_on(Character::online("Mara", Gender::Female, CharacterStatus::Online)));
        assert!(roster.is_online("mara"));

        assert!(roster.sign_off("Mara"));
        assert!(!roster.sign_off("Mara"));
        assert_eq!(roster.find("Mara").read().status, CharacterStatus::Offline);
    }

    #[test]
    fn test_add_remove_idempotence() {
        let roster = Roster::new();
        assert!(roster.add("Bob", ListKind::Friend));
        assert!(!roster.add("bob", ListKind::Friend));
        assert!(roster.remove("BOB", ListKind::Friend));
        assert!(!roster.remove("Bob", ListKind::Friend));
    }

    #[test]
    fn test_set_replaces_exactly() {
        let roster = Roster::new();
        roster.add("Old", ListKind::Ignored);
        roster.set(&["Bob".to_string(), "Carol".to_string()], ListKind::Ignored);
        assert_eq!(
            roster.names(ListKind::Ignored, false),
            HashSet::from(["Bob".to_string(), "Carol".to_string()])
        );
    }

    #[test]
    fn test_online_only_filtering() {
        let roster = Roster::new();
        roster.add("Bob", ListKind::Friend);
        assert!(roster.is_on_list("Bob", ListKind::Friend, false));
        assert!(!roster.is_on_list("Bob", ListKind::Friend, true));
        assert!(roster.names(ListKind::Friend, true).is_empty());

        roster.sign_on(Character::online("Bob", Gender::Male, CharacterStatus::Online));
        assert!(roster.is_on_list("Bob", ListKind::Friend, true));
        assert_eq!(roster.names(ListKind::Friend, true).len(), 1);
    }

    #[test]
    fn test_interest_derivation() {
        let roster = Roster::new();
        roster.add("Mara", ListKind::Bookmark);
        assert!(roster.is_of_interest("Mara"));
        roster.add("Mara", ListKind::NotInterested);
        assert!(!roster.is_of_interest("Mara"));
    }

    #[test]
    fn test_sign_off_sweeps_channels() {
        let roster = Roster::new();
        let (channel, created) = roster.create_channel("dev", "Dev", ChannelKind::Public);
        assert!(created);
        channel.write().roles.sign_on("Mara");
        roster.sign_on(Character::online("Mara", Gender::None, CharacterStatus::Online));

        roster.sign_off("Mara");
        assert!(!channel.read().roles.is_present("Mara"));
    }

    #[test]
    fn test_channel_staff_ranking_scoped_to_channel() {
        let roster = Roster::new();
        roster.sign_on(Character::online("Mara", Gender::None, CharacterStatus::Online));
        let (channel, _) = roster.create_channel("dev", "Dev", ChannelKind::Public);
        {
            let mut ch = channel.write();
            ch.roles.sign_on("Mara");
            ch.roles.add("Mara", ListKind::Moderator);
        }

        assert_eq!(roster.relationship_rank("Mara", Some("dev")), RelationTier::Favored);
        assert_eq!(roster.relationship_rank("Mara", None), RelationTier::Standard);
    }
}
