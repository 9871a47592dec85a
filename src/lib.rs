//! # fennec
//!
//! Client-side protocol engine for F-Chat style chat networks.
//!
//! The engine sits between an established transport and a UI: it receives
//! the server's loosely-typed wire commands, reconciles them against a
//! shared model of channels and characters, and validates user-typed slash
//! commands before they leave the client. It tolerates out-of-order
//! arrival, duplicates, and protocol noise; commands that reference a
//! channel the engine does not know yet are parked and replayed, in order,
//! once the channel appears.
//!
//! What the engine does **not** do: transport framing, rendering of any
//! kind, authentication, or reconnection policy. It consumes decoded
//! [`WireCommand`] maps and produces [`Update`] notifications and validated
//! outbound commands — the layers on either side are someone else's.
//!
//! ## Quick start
//!
//! ```rust
//! use fennec::{Engine, Update};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (engine, mut updates, mut outbound) = Engine::with_defaults();
//! engine.set_identity("Mara", false);
//!
//! // Inbound: a sign-on broadcast from the server.
//! engine.receive_line(r#"NLN {"identity": "Dan", "status": "online"}"#).await.unwrap();
//! assert!(matches!(updates.recv().await, Some(Update::CharacterOnline { .. })));
//!
//! // Outbound: user input is validated before it can reach the transport.
//! engine.submit("/status busy writing docs", None).unwrap();
//! assert_eq!(outbound.recv().await.unwrap().tag, "STA");
//! # }
//! ```

pub mod config;
pub mod dedup;
mod engine;
pub mod error;
pub mod events;
pub mod handlers;
pub mod parser;
pub mod queue;
pub mod session;
pub mod state;

pub use config::{CommandDef, CommandTable, ConfigError, PermissionLevel};
pub use engine::Engine;
pub use error::{HandlerError, HandlerResult, ParseError};
pub use events::{ErrorClass, Update};
pub use parser::Outbound;
pub use state::{
    Channel, ChannelKind, ChannelMode, ChannelSummary, Character, CharacterStatus, Gender,
    ListKind, RoleStore, Roster, TypingStatus,
};

pub use fennec_wire::{fold_name, name_eq, WireCommand, WireError};
