//! Presence and session-state handlers: LIS, NLN, FLN, STA, TPN, CON, VAR, UPT.

use super::{Context, Handler, HandlerResult};
use crate::events::Update;
use crate::state::{Character, CharacterStatus, Gender, ListKind, TypingStatus};
use async_trait::async_trait;
use fennec_wire::WireCommand;
use serde_json::Value;
use tracing::debug;

/// Handler for LIS.
///
/// Two shapes share the tag: the bulk roster page
/// `{"characters": [[name, gender, status, statusmsg], ...]}` sent at login,
/// and the single-identity form `{"identity": ..., "status": ...}`.
pub struct LisHandler;

#[async_trait]
impl Handler for LisHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        if let Some(rows) = cmd.array_field("characters") {
            let mut count = 0;
            for row in rows {
                let Some(cols) = row.as_array() else { continue };
                let Some(name) = cols.first().and_then(Value::as_str) else { continue };
                let gender = cols.get(1).and_then(Value::as_str).map(Gender::from_wire).unwrap_or_default();
                let status = cols
                    .get(2)
                    .and_then(Value::as_str)
                    .map(CharacterStatus::from_wire)
                    .unwrap_or(CharacterStatus::Online);
                let mut character = Character::online(name, gender, status);
                if let Some(msg) = cols.get(3).and_then(Value::as_str) {
                    character.status_message = msg.to_string();
                }
                ctx.roster.sign_on(character);
                count += 1;
            }
            // One page, one update - per-name events would flood the UI.
            ctx.publish(Update::RosterPage { count });
            return Ok(());
        }

        let name = cmd.require_str("identity")?;
        let gender = cmd.str_field("gender").map(Gender::from_wire).unwrap_or_default();
        let status = cmd
            .str_field("status")
            .map(CharacterStatus::from_wire)
            .unwrap_or(CharacterStatus::Online);
        ctx.roster.sign_on(Character::online(name, gender, status));
        ctx.publish(Update::CharacterOnline { character: name.to_string() });
        Ok(())
    }
}

/// Handler for NLN (sign-on broadcast).
pub struct NlnHandler;

#[async_trait]
impl Handler for NlnHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let name = cmd.require_str("identity")?;
        let gender = cmd.str_field("gender").map(Gender::from_wire).unwrap_or_default();
        let status = cmd
            .str_field("status")
            .map(CharacterStatus::from_wire)
            .unwrap_or(CharacterStatus::Online);

        if ctx.roster.sign_on(Character::online(name, gender, status)) {
            ctx.publish(Update::CharacterOnline { character: name.to_string() });
        } else {
            debug!(character = name, "duplicate sign-on absorbed");
        }
        Ok(())
    }
}

/// Handler for FLN (sign-off broadcast).
///
/// The full sign-off transaction: the roster sweeps the name out of every
/// channel's present set, and the ad fingerprint and search-result
/// membership are forgotten with it.
pub struct FlnHandler;

#[async_trait]
impl Handler for FlnHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let name = cmd.require_character()?;

        if !ctx.roster.sign_off(name) {
            debug!(character = name, "sign-off for name not online");
            return Ok(());
        }

        ctx.ads.forget(name);
        ctx.roster.remove(name, ListKind::SearchResult);
        ctx.publish(Update::CharacterOffline { character: name.to_string() });
        Ok(())
    }
}

/// Handler for STA (status change).
pub struct StaHandler;

#[async_trait]
impl Handler for StaHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let name = cmd.require_character()?;
        let status = CharacterStatus::from_wire(cmd.require_str("status")?);
        let message = cmd.str_field("statusmsg").unwrap_or_default().to_string();

        let record = ctx.roster.find(name);
        {
            let mut character = record.write();
            character.status = status;
            character.status_message = message.clone();
        }

        ctx.publish(Update::StatusChanged { character: name.to_string(), status, message });
        Ok(())
    }
}

/// Handler for TPN (typing state in a private conversation).
pub struct TpnHandler;

#[async_trait]
impl Handler for TpnHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let name = cmd.require_character()?;
        let status = TypingStatus::from_wire(cmd.require_str("status")?);

        // The private-message surface carries the typing state; without one
        // open there is nothing to update.
        let Some(surface) = ctx.roster.channel(name) else {
            debug!(character = name, "typing update with no open conversation");
            return Ok(());
        };

        if surface.write().roles.set_typing(name, status) {
            ctx.publish(Update::TypingChanged { character: name.to_string(), status });
        }
        Ok(())
    }
}

/// Handler for CON (connected-user count).
pub struct ConHandler;

#[async_trait]
impl Handler for ConHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let count = cmd.require_u64("count")?;
        ctx.publish(Update::UserCountChanged { count });
        Ok(())
    }
}

/// Handler for VAR (server variable announcement).
pub struct VarHandler;

#[async_trait]
impl Handler for VarHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let key = cmd.require_str("variable")?;
        let value = cmd.body.get("value").cloned().unwrap_or(Value::Null);
        ctx.roster.set_variable(key, value.clone());
        ctx.publish(Update::ServerVariable { key: key.to_string(), value });
        Ok(())
    }
}

/// Handler for UPT (uptime snapshot).
pub struct UptHandler;

#[async_trait]
impl Handler for UptHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        ctx.publish(Update::ServerUptime {
            users: cmd.u64_field("users").unwrap_or_default(),
            channels: cmd.u64_field("channels").unwrap_or_default(),
            max_users: cmd.u64_field("maxusers").unwrap_or_default(),
        });
        Ok(())
    }
}
