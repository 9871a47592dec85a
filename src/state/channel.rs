//! Channels and the per-channel role store.

use crate::state::ListKind;
use fennec_wire::fold_name;
use std::collections::{HashMap, HashSet};

/// What kind of channel this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Server-created public room.
    Public,
    /// User-created private room.
    Private,
    /// Private room requiring an invite.
    InviteOnly,
    /// One-on-one conversation modeled as a channel.
    PrivateMessage,
    /// Client-local utility surface (console and the like).
    Utility,
}

/// Which message classes the channel accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChannelMode {
    /// Chat messages only.
    Chat,
    /// Ads only.
    Ads,
    /// Both.
    #[default]
    Both,
}

impl ChannelMode {
    /// Parse the wire string form; unknown values read as `Both`.
    pub fn from_wire(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "chat" => Self::Chat,
            "ads" => Self::Ads,
            _ => Self::Both,
        }
    }

    /// The wire string form.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Ads => "ads",
            Self::Both => "both",
        }
    }
}

/// Typing indicator state for one conversation partner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypingStatus {
    /// Not typing.
    #[default]
    Clear,
    /// Actively typing.
    Typing,
    /// Started typing, then stopped without sending.
    Paused,
}

impl TypingStatus {
    /// Parse the wire string form; unknown values read as `Clear`.
    pub fn from_wire(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "typing" => Self::Typing,
            "paused" => Self::Paused,
            _ => Self::Clear,
        }
    }
}

/// Channel-scoped membership and roles.
///
/// Same add/remove/replace contract as the Roster's global lists, scoped to
/// `Moderator` and `Banned`, plus the channel-local present set. Moderator
/// and ban membership persist across presence changes — a banned name stays
/// banned while offline. Transient per-member state (typing) is cleared when
/// the member leaves.
#[derive(Debug, Default)]
pub struct RoleStore {
    present: HashMap<String, String>,
    moderators: HashMap<String, String>,
    banned: HashMap<String, String>,
    typing: HashMap<String, TypingStatus>,
    owner: Option<String>,
}

impl RoleStore {
    /// Mark a name present in the channel. Returns whether it was newly added.
    pub fn sign_on(&mut self, name: &str) -> bool {
        self.present.insert(fold_name(name), name.to_string()).is_none()
    }

    /// Remove a name from the present set, clearing its transient state.
    /// Returns whether it was actually present.
    pub fn sign_off(&mut self, name: &str) -> bool {
        let key = fold_name(name);
        self.typing.remove(&key);
        self.present.remove(&key).is_some()
    }

    /// Whether a name is currently present.
    pub fn is_present(&self, name: &str) -> bool {
        self.present.contains_key(&fold_name(name))
    }

    /// Display names currently present.
    pub fn present_names(&self) -> HashSet<String> {
        self.present.values().cloned().collect()
    }

    /// Number of present members.
    pub fn present_count(&self) -> usize {
        self.present.len()
    }

    /// Replace the present set wholesale (initial channel snapshot).
    pub fn replace_present(&mut self, names: &[String]) {
        let stale: Vec<String> =
            self.typing.keys().filter(|k| !names.iter().any(|n| fold_name(n) == **k)).cloned().collect();
        for key in stale {
            self.typing.remove(&key);
        }
        self.present.clear();
        for name in names {
            self.present.insert(fold_name(name), name.clone());
        }
    }

    /// Idempotent add to a channel-scoped list. Kinds other than
    /// `Moderator`/`Banned` have no channel scope and report no change.
    pub fn add(&mut self, name: &str, kind: ListKind) -> bool {
        match self.set_for(kind) {
            Some(set) => set.insert(fold_name(name), name.to_string()).is_none(),
            None => false,
        }
    }

    /// Idempotent remove from a channel-scoped list.
    pub fn remove(&mut self, name: &str, kind: ListKind) -> bool {
        match self.set_for(kind) {
            Some(set) => set.remove(&fold_name(name)).is_some(),
            None => false,
        }
    }

    /// Replace a channel-scoped list wholesale (roster snapshot).
    pub fn replace(&mut self, names: &[String], kind: ListKind) {
        if let Some(set) = self.set_for(kind) {
            set.clear();
            for name in names {
                set.insert(fold_name(name), name.clone());
            }
        }
    }

    /// Membership query against a channel-scoped list.
    pub fn is_on_list(&self, name: &str, kind: ListKind) -> bool {
        let key = fold_name(name);
        match kind {
            ListKind::Moderator => self.moderators.contains_key(&key),
            ListKind::Banned => self.banned.contains_key(&key),
            _ => false,
        }
    }

    /// Display names on a channel-scoped list.
    pub fn names(&self, kind: ListKind) -> HashSet<String> {
        match kind {
            ListKind::Moderator => self.moderators.values().cloned().collect(),
            ListKind::Banned => self.banned.values().cloned().collect(),
            _ => HashSet::new(),
        }
    }

    /// Set the channel owner.
    pub fn set_owner(&mut self, name: Option<&str>) {
        self.owner = name.filter(|n| !n.is_empty()).map(str::to_string);
    }

    /// The channel owner, if known.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Whether a name is the owner.
    pub fn is_owner(&self, name: &str) -> bool {
        self.owner.as_deref().is_some_and(|o| fold_name(o) == fold_name(name))
    }

    /// Whether a name counts as channel staff while present. Staff rank
    /// requires presence; the persistent moderator membership alone does not
    /// surface a rank for someone who has left.
    pub fn ranks_as_staff(&self, name: &str) -> bool {
        self.is_present(name) && (self.is_owner(name) || self.is_on_list(name, ListKind::Moderator))
    }

    /// Update the typing state of a present member. Reports whether the
    /// state actually changed; updates for absent names are ignored.
    pub fn set_typing(&mut self, name: &str, status: TypingStatus) -> bool {
        let key = fold_name(name);
        if !self.present.contains_key(&key) {
            return false;
        }
        let prev = self.typing.insert(key, status).unwrap_or_default();
        prev != status
    }

    /// Current typing state for a member.
    pub fn typing(&self, name: &str) -> TypingStatus {
        self.typing.get(&fold_name(name)).copied().unwrap_or_default()
    }

    fn set_for(&mut self, kind: ListKind) -> Option<&mut HashMap<String, String>> {
        match kind {
            ListKind::Moderator => Some(&mut self.moderators),
            ListKind::Banned => Some(&mut self.banned),
            _ => None,
        }
    }
}

/// A channel the local user has joined (or a private-message surface).
#[derive(Debug)]
pub struct Channel {
    /// Stable protocol key.
    pub id: String,
    /// Display title; differs from the id for private rooms.
    pub title: String,
    /// Channel kind.
    pub kind: ChannelKind,
    /// Accepted message classes.
    pub mode: ChannelMode,
    /// Server-reported member count (may exceed the locally known present
    /// set for large rooms).
    pub user_count: u32,
    /// Channel description text.
    pub description: String,
    /// Channel-scoped roles and presence.
    pub roles: RoleStore,
    /// Creation timestamp (local sighting time).
    pub created: i64,
}

impl Channel {
    /// Create a channel record.
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            mode: ChannelMode::default(),
            user_count: 0,
            description: String::new(),
            roles: RoleStore::default(),
            created: chrono::Utc::now().timestamp(),
        }
    }
}

/// One row of a channel directory snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSummary {
    /// Protocol key.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Public or private room.
    pub kind: ChannelKind,
    /// Server-reported member count.
    pub user_count: u32,
}
