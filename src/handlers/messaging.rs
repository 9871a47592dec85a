//! Messaging handlers: channel messages, private messages, ads,
//! broadcasts, system notices, and staff reports.

use super::{Context, Handler, HandlerResult};
use crate::error::HandlerError;
use crate::events::Update;
use crate::state::ChannelKind;
use async_trait::async_trait;
use fennec_wire::WireCommand;
use tracing::debug;

/// Handler for MSG (channel chat message).
pub struct MsgHandler;

#[async_trait]
impl Handler for MsgHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let id = cmd.require_channel()?;
        let who = cmd.require_character()?;
        let message = cmd.require_str("message")?;

        if !ctx.roster.has_channel(id) {
            return Err(HandlerError::UnresolvedChannel(id.to_string()));
        }
        if ctx.roster.is_ignored(who) {
            debug!(character = who, "channel message from ignored character dropped");
            return Ok(());
        }

        ctx.publish(Update::ChannelMessage {
            channel: id.to_string(),
            character: who.to_string(),
            message: message.to_string(),
            of_interest: ctx.roster.is_of_interest(who),
        });
        Ok(())
    }
}

/// Handler for PRI (private message).
///
/// Opens the conversation surface on first contact; the surface is a
/// channel record keyed by the partner's name, which is also where their
/// typing state lives.
pub struct PriHandler;

#[async_trait]
impl Handler for PriHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let who = cmd.require_character()?;
        let message = cmd.require_str("message")?;

        if ctx.roster.is_ignored(who) {
            debug!(character = who, "private message from ignored character dropped");
            return Ok(());
        }

        ctx.roster.find(who);
        let (surface, created) = ctx.roster.create_channel(who, who, ChannelKind::PrivateMessage);
        surface.write().roles.sign_on(who);
        if created {
            ctx.note_channel_created(who);
        }

        ctx.publish(Update::PrivateMessage { character: who.to_string(), message: message.to_string() });
        Ok(())
    }
}

/// Handler for LRP (broadcast ad).
///
/// An ad identical to the poster's previous one is suppressed without an
/// update; anything delivered becomes the poster's new fingerprint.
pub struct LrpHandler;

#[async_trait]
impl Handler for LrpHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let id = cmd.require_channel()?;
        let who = cmd.require_character()?;
        let message = cmd.require_str("message")?;

        if !ctx.roster.has_channel(id) {
            return Err(HandlerError::UnresolvedChannel(id.to_string()));
        }
        if ctx.roster.is_ignored(who) {
            debug!(character = who, "ad from ignored character dropped");
            return Ok(());
        }
        if ctx.ads.suppress(who, message) {
            debug!(character = who, "duplicate ad suppressed");
            return Ok(());
        }

        ctx.roster.find(who).write().last_ad = Some(message.to_string());
        ctx.publish(Update::Ad {
            channel: id.to_string(),
            character: who.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}

/// Handler for BRO (admin broadcast).
pub struct BroHandler;

#[async_trait]
impl Handler for BroHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let message = cmd.require_str("message")?;
        ctx.publish(Update::Broadcast {
            character: cmd.character().map(str::to_string),
            message: message.to_string(),
        });
        Ok(())
    }
}

/// Handler for SYS (system notice). Channel-scoped notices defer like any
/// other channel command; global ones pass straight through.
pub struct SysHandler;

#[async_trait]
impl Handler for SysHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let message = cmd.require_str("message")?;

        if let Some(id) = cmd.channel() {
            if !ctx.roster.has_channel(id) {
                return Err(HandlerError::UnresolvedChannel(id.to_string()));
            }
        }

        ctx.publish(Update::SystemNotice {
            channel: cmd.channel().map(str::to_string),
            message: message.to_string(),
        });
        Ok(())
    }
}

/// Handler for SFC (staff report traffic).
///
/// Only the `report` action carries a new report; the raised report is
/// remembered on the reporting character for replay. Confirmation traffic
/// is absorbed.
pub struct SfcHandler;

#[async_trait]
impl Handler for SfcHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let action = cmd.require_str("action")?;
        if action != "report" {
            debug!(action, "non-report staff traffic absorbed");
            return Ok(());
        }

        let who = cmd.require_character()?;
        let report = cmd.require_str("report")?;

        ctx.roster.find(who).write().last_report = Some(report.to_string());
        ctx.publish(Update::Report { character: who.to_string(), report: report.to_string() });
        Ok(())
    }
}
