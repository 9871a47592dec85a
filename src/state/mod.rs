//! Shared state management.
//!
//! Contains the Roster (shared character/channel model) and related entities.

mod channel;
mod character;
mod list;
pub mod rank;
mod roster;

pub use channel::{Channel, ChannelKind, ChannelMode, ChannelSummary, RoleStore, TypingStatus};
pub use character::{Character, CharacterStatus, Gender};
pub use list::ListKind;
pub use roster::Roster;
