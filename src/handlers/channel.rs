//! Channel command handlers.
//!
//! Handles joins, leaves, channel snapshots, roles, moderation actions,
//! and the room directory. Every handler here that targets a channel the
//! engine does not know yet defers via `UnresolvedChannel`; the router
//! parks and replays the command once the channel appears.

use super::{identity_of, Context, Handler, HandlerResult};
use crate::error::HandlerError;
use crate::events::Update;
use crate::state::{Channel, ChannelKind, ChannelMode, ChannelSummary, ListKind};
use async_trait::async_trait;
use fennec_wire::WireCommand;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Ad-hoc (user-created) channel ids carry this prefix on the wire.
const ADHOC_PREFIX: &str = "ADH-";

/// Resolve a channel or defer the command until it exists.
fn channel_or_defer(
    ctx: &Context<'_>,
    id: &str,
) -> Result<Arc<RwLock<Channel>>, HandlerError> {
    ctx.roster.channel(id).ok_or_else(|| HandlerError::UnresolvedChannel(id.to_string()))
}

/// Handler for JCH (channel join).
///
/// A join by the local user brings the channel into existence; a join by
/// anyone else targeting an unknown channel is deferred, since its JCH for
/// the local user may simply not have arrived yet.
pub struct JchHandler;

#[async_trait]
impl Handler for JchHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let id = cmd.require_channel()?;
        let who = identity_of(cmd)?;

        if let Some(channel) = ctx.roster.channel(id) {
            ctx.roster.find(&who);
            if channel.write().roles.sign_on(&who) {
                ctx.publish(Update::ChannelJoined { channel: id.to_string(), character: who });
            } else {
                debug!(channel = id, character = %who, "duplicate join absorbed");
            }
            return Ok(());
        }

        if !ctx.is_self(&who) {
            return Err(HandlerError::UnresolvedChannel(id.to_string()));
        }

        let title = cmd.str_field("title").unwrap_or(id);
        let kind =
            if id.starts_with(ADHOC_PREFIX) { ChannelKind::Private } else { ChannelKind::Public };
        let (channel, created) = ctx.roster.create_channel(id, title, kind);
        channel.write().roles.sign_on(&who);
        if created {
            ctx.note_channel_created(id);
        }
        ctx.publish(Update::ChannelJoined { channel: id.to_string(), character: who });
        Ok(())
    }
}

/// Handler for LCH (channel leave).
pub struct LchHandler;

#[async_trait]
impl Handler for LchHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let id = cmd.require_channel()?;
        let who = identity_of(cmd)?;
        let channel = channel_or_defer(ctx, id)?;

        if ctx.is_self(&who) {
            ctx.roster.remove_channel(id);
            ctx.publish(Update::ChannelLeft { channel: id.to_string(), character: who });
            return Ok(());
        }

        if channel.write().roles.sign_off(&who) {
            ctx.publish(Update::ChannelLeft { channel: id.to_string(), character: who });
        } else {
            debug!(channel = id, character = %who, "leave for name not present");
        }
        Ok(())
    }
}

/// Handler for ICH (initial channel snapshot: members and mode).
pub struct IchHandler;

#[async_trait]
impl Handler for IchHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let id = cmd.require_channel()?;
        let channel = channel_or_defer(ctx, id)?;

        let users: Vec<String> = cmd
            .require_array("users")?
            .iter()
            .filter_map(|u| u.get("identity").and_then(Value::as_str))
            .map(str::to_string)
            .collect();
        for name in &users {
            ctx.roster.find(name);
        }

        {
            let mut guard = channel.write();
            guard.roles.replace_present(&users);
            guard.user_count = users.len() as u32;
            if let Some(mode) = cmd.str_field("mode") {
                guard.mode = ChannelMode::from_wire(mode);
            }
        }

        ctx.publish(Update::ChannelInfo { channel: id.to_string() });
        Ok(())
    }
}

/// Handler for CDS (channel description).
pub struct CdsHandler;

#[async_trait]
impl Handler for CdsHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let id = cmd.require_channel()?;
        let description = cmd.require_str("description")?;
        let channel = channel_or_defer(ctx, id)?;

        channel.write().description = description.to_string();
        ctx.publish(Update::ChannelDescription { channel: id.to_string() });
        Ok(())
    }
}

/// Handler for COL (channel moderator roster).
///
/// The first entry of the oplist is the channel owner; the rest are
/// moderators. Empty entries are padding and skipped.
pub struct ColHandler;

#[async_trait]
impl Handler for ColHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let id = cmd.require_channel()?;
        let oplist = cmd.require_name_list("oplist")?;
        let channel = channel_or_defer(ctx, id)?;

        let owner = oplist.first().filter(|n| !n.is_empty()).cloned();
        let mods: Vec<String> = oplist.into_iter().filter(|n| !n.is_empty()).collect();
        for name in &mods {
            ctx.roster.find(name);
        }

        {
            let mut guard = channel.write();
            guard.roles.set_owner(owner.as_deref());
            guard.roles.replace(&mods, ListKind::Moderator);
        }

        ctx.publish(Update::ChannelRolesChanged { channel: id.to_string() });
        Ok(())
    }
}

/// Handler for COA (channel moderator added).
pub struct CoaHandler;

#[async_trait]
impl Handler for CoaHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let id = cmd.require_channel()?;
        let who = cmd.require_character()?;
        let channel = channel_or_defer(ctx, id)?;

        ctx.roster.find(who);
        if channel.write().roles.add(who, ListKind::Moderator) {
            ctx.publish(Update::Promoted { character: who.to_string(), channel: Some(id.to_string()) });
        } else {
            debug!(channel = id, character = who, "duplicate promotion absorbed");
        }
        Ok(())
    }
}

/// Handler for COR (channel moderator removed).
pub struct CorHandler;

#[async_trait]
impl Handler for CorHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let id = cmd.require_channel()?;
        let who = cmd.require_character()?;
        let channel = channel_or_defer(ctx, id)?;

        if channel.write().roles.remove(who, ListKind::Moderator) {
            ctx.publish(Update::Demoted { character: who.to_string(), channel: Some(id.to_string()) });
        } else {
            debug!(channel = id, character = who, "demotion of non-moderator absorbed");
        }
        Ok(())
    }
}

/// Handler for CSO (channel owner change).
pub struct CsoHandler;

#[async_trait]
impl Handler for CsoHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let id = cmd.require_channel()?;
        let who = cmd.require_character()?;
        let channel = channel_or_defer(ctx, id)?;

        ctx.roster.find(who);
        channel.write().roles.set_owner(Some(who));
        ctx.publish(Update::OwnerChanged { channel: id.to_string(), character: who.to_string() });
        Ok(())
    }
}

/// Remove a moderated-out member: presence (and transient state) go; any
/// persistent role membership stays. Removes the whole channel when the
/// target is the local user.
fn evict(ctx: &mut Context<'_>, channel: &Arc<RwLock<Channel>>, id: &str, who: &str) {
    channel.write().roles.sign_off(who);
    if ctx.is_self(who) {
        ctx.roster.remove_channel(id);
    }
}

/// Handler for CKU (kick).
pub struct CkuHandler;

#[async_trait]
impl Handler for CkuHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let id = cmd.require_channel()?;
        let who = cmd.require_character()?.to_string();
        let operator = cmd.require_str("operator")?.to_string();
        let channel = channel_or_defer(ctx, id)?;

        evict(ctx, &channel, id, &who);
        ctx.publish(Update::Kicked { channel: id.to_string(), character: who, operator });
        Ok(())
    }
}

/// Handler for CBU (channel ban).
pub struct CbuHandler;

#[async_trait]
impl Handler for CbuHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let id = cmd.require_channel()?;
        let who = cmd.require_character()?.to_string();
        let operator = cmd.require_str("operator")?.to_string();
        let channel = channel_or_defer(ctx, id)?;

        channel.write().roles.add(&who, ListKind::Banned);
        evict(ctx, &channel, id, &who);
        ctx.publish(Update::Banned { channel: id.to_string(), character: who, operator });
        Ok(())
    }
}

/// Handler for CUB (channel unban).
pub struct CubHandler;

#[async_trait]
impl Handler for CubHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let id = cmd.require_channel()?;
        let who = cmd.require_character()?.to_string();
        let operator = cmd.require_str("operator")?.to_string();
        let channel = channel_or_defer(ctx, id)?;

        if channel.write().roles.remove(&who, ListKind::Banned) {
            ctx.publish(Update::Unbanned { channel: id.to_string(), character: who, operator });
        } else {
            debug!(channel = id, character = %who, "unban for name not banned");
        }
        Ok(())
    }
}

/// Handler for CTU (channel timeout).
pub struct CtuHandler;

#[async_trait]
impl Handler for CtuHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let id = cmd.require_channel()?;
        let who = cmd.require_character()?.to_string();
        let operator = cmd.require_str("operator")?.to_string();
        let length = cmd.u64_field("length").unwrap_or_default();
        let channel = channel_or_defer(ctx, id)?;

        evict(ctx, &channel, id, &who);
        ctx.publish(Update::TimedOut { channel: id.to_string(), character: who, operator, length });
        Ok(())
    }
}

/// Handler for RMO (room message-class mode).
pub struct RmoHandler;

#[async_trait]
impl Handler for RmoHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let id = cmd.require_channel()?;
        let mode = ChannelMode::from_wire(cmd.require_str("mode")?);
        let channel = channel_or_defer(ctx, id)?;

        channel.write().mode = mode;
        ctx.publish(Update::ChannelModeChanged { channel: id.to_string(), mode });
        Ok(())
    }
}

/// Handler for the room directory snapshots (ORS for private rooms, CHA for
/// public ones).
pub struct DirectoryHandler {
    public: bool,
}

impl DirectoryHandler {
    /// CHA: public room directory.
    pub fn public_rooms() -> Self {
        Self { public: true }
    }

    /// ORS: private room directory.
    pub fn private_rooms() -> Self {
        Self { public: false }
    }
}

#[async_trait]
impl Handler for DirectoryHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let rows: Vec<ChannelSummary> = cmd
            .require_array("channels")?
            .iter()
            .filter_map(|row| {
                let id = row.get("name").and_then(Value::as_str)?;
                let title = row.get("title").and_then(Value::as_str).unwrap_or(id);
                let count = row.get("characters").and_then(Value::as_u64).unwrap_or_default();
                Some(ChannelSummary {
                    id: id.to_string(),
                    title: title.to_string(),
                    kind: if self.public { ChannelKind::Public } else { ChannelKind::Private },
                    user_count: count as u32,
                })
            })
            .collect();

        let count = rows.len();
        ctx.roster.set_directory(self.public, rows);
        ctx.publish(Update::ChannelDirectory { public: self.public, count });
        Ok(())
    }
}
