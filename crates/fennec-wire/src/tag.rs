//! Server command tags.
//!
//! The closed set of three-letter tags the server emits, plus the semantic
//! aliases some deployments use for list maintenance. Kept as constants so
//! the routing table and tests never spell a tag twice.

/// Bulk roster page, or single-identity presence assertion.
pub const LIS: &str = "LIS";
/// A character came online.
pub const NLN: &str = "NLN";
/// A character went offline.
pub const FLN: &str = "FLN";
/// Status / status-message change.
pub const STA: &str = "STA";
/// Typing state change in a private conversation.
pub const TPN: &str = "TPN";
/// Connected-user count.
pub const CON: &str = "CON";
/// Server variable announcement.
pub const VAR: &str = "VAR";
/// Server uptime snapshot.
pub const UPT: &str = "UPT";

/// A character joined a channel.
pub const JCH: &str = "JCH";
/// A character left a channel.
pub const LCH: &str = "LCH";
/// Initial channel info: member list and mode.
pub const ICH: &str = "ICH";
/// Channel description.
pub const CDS: &str = "CDS";
/// Channel moderator roster (full set).
pub const COL: &str = "COL";
/// Channel moderator added.
pub const COA: &str = "COA";
/// Channel moderator removed.
pub const COR: &str = "COR";
/// Channel owner change.
pub const CSO: &str = "CSO";
/// Kicked from channel.
pub const CKU: &str = "CKU";
/// Banned from channel.
pub const CBU: &str = "CBU";
/// Unbanned from channel.
pub const CUB: &str = "CUB";
/// Timed out from channel.
pub const CTU: &str = "CTU";
/// Room mode change (chat / ads / both).
pub const RMO: &str = "RMO";
/// Private channel directory snapshot.
pub const ORS: &str = "ORS";
/// Public channel directory snapshot.
pub const CHA: &str = "CHA";

/// Friends and bookmarks initial roster.
pub const FRL: &str = "FRL";
/// Ignore list maintenance (action add/delete/init/list).
pub const IGN: &str = "IGN";
/// Global moderator added.
pub const AOP: &str = "AOP";
/// Global moderator removed.
pub const DOP: &str = "DOP";
/// Global moderator roster (full set).
pub const ADL: &str = "ADL";
/// Real-time bridge event (friend requests, notes), sub-typed by `type`.
pub const RTB: &str = "RTB";
/// Character search results.
pub const FKS: &str = "FKS";

/// Channel message.
pub const MSG: &str = "MSG";
/// Private message.
pub const PRI: &str = "PRI";
/// Roleplay ad broadcast.
pub const LRP: &str = "LRP";
/// Admin broadcast.
pub const BRO: &str = "BRO";
/// System notice.
pub const SYS: &str = "SYS";
/// Staff report.
pub const SFC: &str = "SFC";
/// Server error text.
pub const ERR: &str = "ERR";

/// Semantic alias for ignore maintenance used by some deployments.
pub const IGNORE: &str = "ignore";
/// Semantic alias replacing the whole ignore list in one shot.
pub const IGNORE_LIST_SET: &str = "ignore_list_set";
