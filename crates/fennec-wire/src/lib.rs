//! # fennec-wire
//!
//! Wire-level command representation for F-Chat style chat protocols.
//!
//! Servers speak in lines of the form `TAG {json-object}`: a short command
//! tag followed by an optional JSON payload of loosely-typed fields. This
//! crate owns that shape — parsing and encoding the line form, the
//! [`WireCommand`] map type with typed field accessors, and the ASCII
//! case-folding used for character and channel names — and nothing else.
//! Engine logic (dispatch, state, validation) lives in the `fennec` crate.
//!
//! ## Quick start
//!
//! ```rust
//! use fennec_wire::WireCommand;
//!
//! let cmd = WireCommand::parse_line(r#"NLN {"identity": "Mara", "status": "online"}"#).unwrap();
//! assert_eq!(cmd.tag, "NLN");
//! assert_eq!(cmd.str_field("identity"), Some("Mara"));
//!
//! let out = WireCommand::new("MSG")
//!     .with_str("channel", "Frontier")
//!     .with_str("message", "hello");
//! assert!(out.encode_line().starts_with("MSG {"));
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod casemap;
mod command;
mod error;
pub mod tag;

pub use casemap::{fold_name, name_eq};
pub use command::WireCommand;
pub use error::WireError;
