//! Unified error handling for the engine.
//!
//! Every failure in inbound command processing is recovered inside the
//! dispatch of that one command; nothing here propagates out of the engine,
//! and one bad command never halts processing of subsequent commands.

use crate::config::PermissionLevel;
use fennec_wire::WireError;
use thiserror::Error;

/// Errors that can occur while handling one inbound command.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A required field is missing or malformed. Loud per-command failure;
    /// the stream continues.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// The command references a channel not yet known. The router requeues
    /// the command verbatim and publishes no update.
    #[error("channel not yet known: {0}")]
    UnresolvedChannel(String),

    /// Invariant violation inside a handler.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Static error code for diagnostics labeling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Wire(_) => "wire",
            Self::UnresolvedChannel(_) => "unresolved_channel",
            Self::Internal(_) => "internal_error",
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

/// Errors produced by the outbound slash-command parser.
///
/// `BadSyntax` and `UnknownCommand` are deliberately distinct variants so
/// callers can produce distinct error text. None of these ever reach the
/// transport; they surface to the user as transient messages.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Known command, malformed arguments.
    #[error("bad syntax: /{command} (usage: {usage})")]
    BadSyntax {
        /// Command name as typed.
        command: String,
        /// Usage line assembled from the command definition.
        usage: String,
    },

    /// No such command.
    #[error("unknown command: /{0}")]
    UnknownCommand(String),

    /// Command names containing an underscore are reserved.
    #[error("restricted command name: /{0}")]
    RestrictedName(String),

    /// The command requires a higher permission tier than the caller holds.
    #[error("/{command} requires {required:?} permission")]
    PermissionDenied {
        /// Command name as typed.
        command: String,
        /// Tier the command demands.
        required: PermissionLevel,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(HandlerError::UnresolvedChannel("dev".into()).error_code(), "unresolved_channel");
        assert_eq!(HandlerError::Internal("x".into()).error_code(), "internal_error");
    }

    #[test]
    fn test_bad_syntax_distinct_from_unknown() {
        let bad = ParseError::BadSyntax { command: "status".into(), usage: "status <status> <message>".into() };
        let unknown = ParseError::UnknownCommand("bogus".into());
        assert_ne!(bad, unknown);
        assert!(bad.to_string().contains("bad syntax"));
        assert!(unknown.to_string().contains("unknown command"));
    }
}
