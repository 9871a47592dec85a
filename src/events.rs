//! Update notifications.
//!
//! Every successful state mutation publishes exactly one [`Update`] on the
//! engine's update channel; no-ops (duplicate list adds, suppressed ads,
//! requeued commands) publish none. The UI layer consumes these — the
//! engine never renders anything itself.

use crate::state::{CharacterStatus, ChannelMode, ListKind, TypingStatus};

/// How a server error/notice text was classified by the sniffing fallback.
///
/// The wire format lacks explicit sub-type tags for these, so classification
/// is substring-based and inherently best-effort; `Unclassified` is the
/// honest default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// "…channel ban…"
    ChannelBan,
    /// "…has been promoted…"
    Promotion,
    /// "…has been demoted…"
    Demotion,
    /// "…has been kicked…"
    Kick,
    /// No sniff rule matched.
    Unclassified,
}

/// Typed payload published after a successful mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// A character came online.
    CharacterOnline {
        /// Who.
        character: String,
    },
    /// A character went offline.
    CharacterOffline {
        /// Who.
        character: String,
    },
    /// A bulk roster page was applied.
    RosterPage {
        /// Number of characters in the page.
        count: usize,
    },
    /// A character's status changed.
    StatusChanged {
        /// Who.
        character: String,
        /// New status.
        status: CharacterStatus,
        /// New status message.
        message: String,
    },
    /// A conversation partner's typing state changed.
    TypingChanged {
        /// Who.
        character: String,
        /// New typing state.
        status: TypingStatus,
    },
    /// A global list's membership changed.
    ListChanged {
        /// Which list.
        kind: ListKind,
    },
    /// A character joined a channel.
    ChannelJoined {
        /// Channel id.
        channel: String,
        /// Who joined.
        character: String,
    },
    /// A character left a channel (or the local user closed it).
    ChannelLeft {
        /// Channel id.
        channel: String,
        /// Who left.
        character: String,
    },
    /// Initial channel snapshot applied (member list, mode).
    ChannelInfo {
        /// Channel id.
        channel: String,
    },
    /// Channel description changed.
    ChannelDescription {
        /// Channel id.
        channel: String,
    },
    /// Channel message-class mode changed.
    ChannelModeChanged {
        /// Channel id.
        channel: String,
        /// New mode.
        mode: ChannelMode,
    },
    /// Channel moderator roster replaced wholesale.
    ChannelRolesChanged {
        /// Channel id.
        channel: String,
    },
    /// A room directory snapshot arrived.
    ChannelDirectory {
        /// Public (true) or private (false) rooms.
        public: bool,
        /// Number of rooms listed.
        count: usize,
    },
    /// Promoted to moderator, channel-scoped or global (`channel: None`).
    Promoted {
        /// Who.
        character: String,
        /// Channel scope, if any.
        channel: Option<String>,
    },
    /// Demoted from moderator, channel-scoped or global.
    Demoted {
        /// Who.
        character: String,
        /// Channel scope, if any.
        channel: Option<String>,
    },
    /// Channel ownership changed.
    OwnerChanged {
        /// Channel id.
        channel: String,
        /// New owner.
        character: String,
    },
    /// A character was kicked from a channel.
    Kicked {
        /// Channel id.
        channel: String,
        /// Who was kicked.
        character: String,
        /// Acting operator.
        operator: String,
    },
    /// A character was banned from a channel.
    Banned {
        /// Channel id.
        channel: String,
        /// Who was banned.
        character: String,
        /// Acting operator.
        operator: String,
    },
    /// A channel ban was lifted.
    Unbanned {
        /// Channel id.
        channel: String,
        /// Who was unbanned.
        character: String,
        /// Acting operator.
        operator: String,
    },
    /// A character was timed out of a channel.
    TimedOut {
        /// Channel id.
        channel: String,
        /// Who was timed out.
        character: String,
        /// Acting operator.
        operator: String,
        /// Timeout length in minutes.
        length: u64,
    },
    /// A channel chat message arrived.
    ChannelMessage {
        /// Channel id.
        channel: String,
        /// Sender.
        character: String,
        /// Message text.
        message: String,
        /// Whether the sender is on an important list (worth surfacing).
        of_interest: bool,
    },
    /// A private message arrived.
    PrivateMessage {
        /// Sender.
        character: String,
        /// Message text.
        message: String,
    },
    /// A broadcast ad arrived (already dedup-filtered).
    Ad {
        /// Channel id.
        channel: String,
        /// Poster.
        character: String,
        /// Ad text.
        message: String,
    },
    /// An admin broadcast arrived.
    Broadcast {
        /// Sender, when attributed.
        character: Option<String>,
        /// Broadcast text.
        message: String,
    },
    /// A system notice arrived.
    SystemNotice {
        /// Channel scope, if any.
        channel: Option<String>,
        /// Notice text.
        message: String,
    },
    /// A staff report was raised.
    Report {
        /// Reporting character.
        character: String,
        /// Report text.
        report: String,
    },
    /// An incoming friend request was recorded.
    FriendRequest {
        /// Requesting character.
        character: String,
    },
    /// Connected-user count changed.
    UserCountChanged {
        /// New count.
        count: u64,
    },
    /// A server variable was announced.
    ServerVariable {
        /// Variable name.
        key: String,
        /// Variable value.
        value: serde_json::Value,
    },
    /// Server uptime snapshot.
    ServerUptime {
        /// Connected users.
        users: u64,
        /// Open channels.
        channels: u64,
        /// Peak users.
        max_users: u64,
    },
    /// Server error text, classified by the sniffing fallback.
    ClassifiedError {
        /// Classification.
        class: ErrorClass,
        /// Original text.
        message: String,
    },
}
