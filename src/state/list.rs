//! List kinds and the backing membership table.

use fennec_wire::fold_name;
use std::collections::{HashMap, HashSet};

/// The closed set of membership categories a character can belong to.
///
/// Most kinds are global (held by the Roster); `Moderator` and `Banned`
/// additionally apply per channel through the channel's role store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// Mutual friend.
    Friend,
    /// One-way bookmark.
    Bookmark,
    /// Moderator (global when held by the Roster, channel-scoped in a
    /// role store).
    Moderator,
    /// Banned (channel-scoped in a role store).
    Banned,
    /// Server-side ignore.
    Ignored,
    /// Client-local ignore, never synchronized with the server.
    ClientIgnored,
    /// Marked interesting by the local user.
    Interested,
    /// Marked uninteresting by the local user.
    NotInterested,
    /// Current search result set.
    SearchResult,
    /// Outgoing friend request pending.
    FriendRequestSent,
    /// Incoming friend request pending.
    FriendRequestReceived,
    /// Muted status-update notifications.
    IgnoreUpdates,
}

impl ListKind {
    /// Every kind, in declaration order.
    pub const ALL: [ListKind; 12] = [
        ListKind::Friend,
        ListKind::Bookmark,
        ListKind::Moderator,
        ListKind::Banned,
        ListKind::Ignored,
        ListKind::ClientIgnored,
        ListKind::Interested,
        ListKind::NotInterested,
        ListKind::SearchResult,
        ListKind::FriendRequestSent,
        ListKind::FriendRequestReceived,
        ListKind::IgnoreUpdates,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Membership sets for every list kind, keyed by folded name with the
/// display casing preserved as the value.
///
/// Mutations report whether anything actually changed so callers can
/// suppress redundant notifications.
#[derive(Debug, Default)]
pub(crate) struct ListTable {
    sets: [HashMap<String, String>; 12],
}

impl ListTable {
    pub fn new() -> Self {
        Self { sets: std::array::from_fn(|_| HashMap::new()) }
    }

    pub fn add(&mut self, name: &str, kind: ListKind) -> bool {
        let set = &mut self.sets[kind.index()];
        set.insert(fold_name(name), name.to_string()).is_none()
    }

    pub fn remove(&mut self, name: &str, kind: ListKind) -> bool {
        self.sets[kind.index()].remove(&fold_name(name)).is_some()
    }

    pub fn replace(&mut self, names: &[String], kind: ListKind) {
        let set = &mut self.sets[kind.index()];
        set.clear();
        for name in names {
            set.insert(fold_name(name), name.clone());
        }
    }

    pub fn contains(&self, name: &str, kind: ListKind) -> bool {
        self.sets[kind.index()].contains_key(&fold_name(name))
    }

    /// Display names currently on the list.
    pub fn names(&self, kind: ListKind) -> HashSet<String> {
        self.sets[kind.index()].values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let mut table = ListTable::new();
        assert!(table.add("Mara", ListKind::Friend));
        assert!(!table.add("Mara", ListKind::Friend));
        assert!(!table.add("MARA", ListKind::Friend));
        assert_eq!(table.names(ListKind::Friend).len(), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut table = ListTable::new();
        assert!(!table.remove("Mara", ListKind::Ignored));
        table.add("Mara", ListKind::Ignored);
        assert!(table.remove("mara", ListKind::Ignored));
        assert!(!table.remove("mara", ListKind::Ignored));
    }

    #[test]
    fn test_replace_shrinks() {
        let mut table = ListTable::new();
        table.add("Ada", ListKind::SearchResult);
        table.add("Bee", ListKind::SearchResult);
        table.replace(&["Cyn".to_string()], ListKind::SearchResult);
        assert_eq!(table.names(ListKind::SearchResult), HashSet::from(["Cyn".to_string()]));
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut table = ListTable::new();
        table.add("Mara", ListKind::Interested);
        // Interested and NotInterested are not mutually exclusive; both
        // memberships can coexist for the same name.
        table.add("Mara", ListKind::NotInterested);
        assert!(table.contains("Mara", ListKind::Interested));
        assert!(table.contains("Mara", ListKind::NotInterested));
    }
}
