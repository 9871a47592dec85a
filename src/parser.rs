//! Outbound slash-command parsing and validation.
//!
//! Turns raw user text into either plain chat text or a validated
//! [`WireCommand`], consulting the command definition table for spelling,
//! aliases, argument shape, and the permission gate. Everything here is
//! per-call local state; rejection happens before the command can reach
//! the transport.

use crate::config::{CommandDef, CommandTable, PermissionLevel};
use crate::error::ParseError;
use fennec_wire::WireCommand;

/// Result of parsing one line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// Not a command: literal chat or ad text, sent as the UI decides.
    Text(String),
    /// A validated command ready for the transport.
    Command(WireCommand),
}

/// Parse one line of user input against the command table.
///
/// `current_channel` is the id of the channel the user has focused; it is
/// substituted as the default target for channel-scoped commands. `caller`
/// is the local user's permission tier in that channel — commands above it
/// are rejected here, as a hard client-side gate, not advisory.
pub fn parse(
    input: &str,
    current_channel: Option<&str>,
    caller: PermissionLevel,
    table: &CommandTable,
) -> Result<Outbound, ParseError> {
    if !input.starts_with('/') {
        return Ok(Outbound::Text(input.to_string()));
    }

    let line = input[1..].trim_end();
    let (name, remainder) = match line.find(char::is_whitespace) {
        Some(idx) => (&line[..idx], line[idx..].trim_start()),
        None => (line, ""),
    };

    if name.is_empty() {
        return Err(ParseError::UnknownCommand(String::new()));
    }
    // Underscored names are reserved for the wire protocol itself.
    if name.contains('_') {
        return Err(ParseError::RestrictedName(name.to_string()));
    }

    let def = table.resolve(name).ok_or_else(|| ParseError::UnknownCommand(name.to_string()))?;

    if caller < def.permission {
        return Err(ParseError::PermissionDenied {
            command: name.to_string(),
            required: def.permission,
        });
    }

    build_command(def, name, remainder, current_channel)
}

/// Map the argument remainder onto the definition's named slots and stamp
/// the preset fields. The last declared slot is greedy.
fn build_command(
    def: &CommandDef,
    typed_name: &str,
    remainder: &str,
    current_channel: Option<&str>,
) -> Result<Outbound, ParseError> {
    let mut cmd = WireCommand::new(def.tag.clone());
    for (key, value) in &def.presets {
        cmd = cmd.with_str(key.clone(), value.clone());
    }

    let slots: Vec<&String> = def.required.iter().chain(def.optional.iter()).collect();
    let mut rest = remainder;

    for (i, slot) in slots.iter().enumerate() {
        let last = i + 1 == slots.len();
        let (value, after) = if last {
            (rest.trim(), "")
        } else {
            match rest.trim_start().split_once(char::is_whitespace) {
                Some((tok, after)) => (tok, after),
                None => (rest.trim(), ""),
            }
        };
        rest = after;

        if value.is_empty() {
            if i < def.required.len() {
                return Err(ParseError::BadSyntax {
                    command: typed_name.to_string(),
                    usage: def.usage(),
                });
            }
            break;
        }
        cmd = cmd.with_str(slot.as_str(), value);
    }

    if def.channel_target && cmd.channel().is_none() {
        match current_channel {
            Some(channel) => cmd = cmd.with_str("channel", channel),
            None => {
                return Err(ParseError::BadSyntax {
                    command: typed_name.to_string(),
                    usage: def.usage(),
                });
            }
        }
    }

    Ok(Outbound::Command(cmd))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CommandTable {
        CommandTable::defaults()
    }

    fn parse_user(input: &str) -> Result<Outbound, ParseError> {
        parse(input, Some("Frontier"), PermissionLevel::User, &table())
    }

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(parse_user("hello there").unwrap(), Outbound::Text("hello there".to_string()));
        // Only a leading slash marks a command attempt.
        assert!(matches!(parse_user(" /kick Bob").unwrap(), Outbound::Text(_)));
    }

    #[test]
    fn test_status_reshapes_into_fields() {
        let out = parse_user("/status busy afk for a while").unwrap();
        let Outbound::Command(cmd) = out else { panic!("expected command") };
        assert_eq!(cmd.tag, "STA");
        assert_eq!(cmd.str_field("status"), Some("busy"));
        assert_eq!(cmd.str_field("statusmsg"), Some("afk for a while"));
    }

    #[test]
    fn test_status_without_message_is_bad_syntax() {
        let err = parse_user("/status busy").unwrap_err();
        assert!(matches!(err, ParseError::BadSyntax { .. }));
        // Distinct from an unknown command.
        let err = parse_user("/bogus busy").unwrap_err();
        assert!(matches!(err, ParseError::UnknownCommand(_)));
    }

    #[test]
    fn test_underscore_names_are_restricted() {
        let err = parse_user("/ignore_list_set Bob").unwrap_err();
        assert_eq!(err, ParseError::RestrictedName("ignore_list_set".to_string()));
    }

    #[test]
    fn test_permission_gate() {
        let err = parse("/kick Bob", Some("Frontier"), PermissionLevel::User, &table()).unwrap_err();
        assert_eq!(
            err,
            ParseError::PermissionDenied {
                command: "kick".to_string(),
                required: PermissionLevel::Moderator
            }
        );

        let ok = parse("/kick Bob", Some("Frontier"), PermissionLevel::Moderator, &table()).unwrap();
        let Outbound::Command(cmd) = ok else { panic!("expected command") };
        assert_eq!(cmd.tag, "CKU");
        assert_eq!(cmd.character(), Some("Bob"));
        assert_eq!(cmd.channel(), Some("Frontier"));
    }

    #[test]
    fn test_channel_target_requires_focus() {
        let err = parse("/leave", None, PermissionLevel::User, &table()).unwrap_err();
        assert!(matches!(err, ParseError::BadSyntax { .. }));

        let ok = parse("/leave", Some("Frontier"), PermissionLevel::User, &table()).unwrap();
        let Outbound::Command(cmd) = ok else { panic!("expected command") };
        assert_eq!(cmd.tag, "LCH");
        assert_eq!(cmd.channel(), Some("Frontier"));
    }

    #[test]
    fn test_presets_are_stamped() {
        let ok = parse_user("/unignore Bob").unwrap();
        let Outbound::Command(cmd) = ok else { panic!("expected command") };
        assert_eq!(cmd.tag, "IGN");
        assert_eq!(cmd.action(), Some("delete"));
        assert_eq!(cmd.character(), Some("Bob"));
    }

    #[test]
    fn test_alias_resolution() {
        let ok = parse("/cop Bob", Some("Frontier"), PermissionLevel::GlobalMod, &table()).unwrap();
        let Outbound::Command(cmd) = ok else { panic!("expected command") };
        assert_eq!(cmd.tag, "COA");
    }

    #[test]
    fn test_optional_argument_may_be_absent() {
        let ok = parse_user("/roll").unwrap();
        let Outbound::Command(cmd) = ok else { panic!("expected command") };
        assert_eq!(cmd.tag, "RLL");
        assert_eq!(cmd.str_field("dice"), None);
        assert_eq!(cmd.channel(), Some("Frontier"));

        let ok = parse_user("/roll 2d20").unwrap();
        let Outbound::Command(cmd) = ok else { panic!("expected command") };
        assert_eq!(cmd.str_field("dice"), Some("2d20"));
    }

    #[test]
    fn test_greedy_final_argument() {
        let ok = parse("/timeout Bob 30", Some("Frontier"), PermissionLevel::Moderator, &table())
            .unwrap();
        let Outbound::Command(cmd) = ok else { panic!("expected command") };
        assert_eq!(cmd.character(), Some("Bob"));
        assert_eq!(cmd.str_field("length"), Some("30"));
    }
}
