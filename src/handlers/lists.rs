//! Global list handlers: friends, ignores, global moderators, search
//! results, and the sub-typed real-time bridge events.

use super::{Context, Handler, HandlerResult};
use crate::events::Update;
use crate::state::ListKind;
use async_trait::async_trait;
use fennec_wire::{WireCommand, WireError};
use tracing::debug;

/// Handler for FRL (initial friend roster).
pub struct FrlHandler;

#[async_trait]
impl Handler for FrlHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let names = cmd.require_name_list("characters")?;
        ctx.roster.set(&names, ListKind::Friend);
        ctx.publish(Update::ListChanged { kind: ListKind::Friend });
        Ok(())
    }
}

/// Handler for IGN and its semantic alias `ignore`.
///
/// Action-dispatched: `init`/`list` replace the whole list, `add` and
/// `delete` touch a single name. Redundant mutations are absorbed without
/// an update.
pub struct IgnHandler;

#[async_trait]
impl Handler for IgnHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let action = cmd.action().ok_or_else(|| WireError::MissingField {
            tag: cmd.tag.clone(),
            field: "action".to_string(),
        })?;

        match action {
            "init" | "list" => {
                let names = cmd.require_name_list("characters")?;
                ctx.roster.set(&names, ListKind::Ignored);
                ctx.publish(Update::ListChanged { kind: ListKind::Ignored });
            }
            "add" => {
                let name = cmd.require_character()?;
                if ctx.roster.add(name, ListKind::Ignored) {
                    ctx.publish(Update::ListChanged { kind: ListKind::Ignored });
                } else {
                    debug!(character = name, "already ignored");
                }
            }
            "delete" => {
                let name = cmd.require_character()?;
                if ctx.roster.remove(name, ListKind::Ignored) {
                    ctx.publish(Update::ListChanged { kind: ListKind::Ignored });
                } else {
                    debug!(character = name, "unignore for name not ignored");
                }
            }
            other => {
                debug!(action = other, "unrecognized ignore action");
            }
        }
        Ok(())
    }
}

/// Handler for `ignore_list_set`: wholesale replacement of the ignore list.
pub struct IgnoreListSetHandler;

#[async_trait]
impl Handler for IgnoreListSetHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let names = cmd.require_name_list("names")?;
        ctx.roster.set(&names, ListKind::Ignored);
        ctx.publish(Update::ListChanged { kind: ListKind::Ignored });
        Ok(())
    }
}

/// Handler for AOP (global moderator added).
pub struct AopHandler;

#[async_trait]
impl Handler for AopHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let name = cmd.require_character()?;
        if ctx.roster.add(name, ListKind::Moderator) {
            ctx.publish(Update::Promoted { character: name.to_string(), channel: None });
        } else {
            debug!(character = name, "duplicate global promotion absorbed");
        }
        Ok(())
    }
}

/// Handler for DOP (global moderator removed).
pub struct DopHandler;

#[async_trait]
impl Handler for DopHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let name = cmd.require_character()?;
        if ctx.roster.remove(name, ListKind::Moderator) {
            ctx.publish(Update::Demoted { character: name.to_string(), channel: None });
        } else {
            debug!(character = name, "global demotion of non-moderator absorbed");
        }
        Ok(())
    }
}

/// Handler for ADL (global moderator roster).
pub struct AdlHandler;

#[async_trait]
impl Handler for AdlHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let names = cmd.require_name_list("ops")?;
        ctx.roster.set(&names, ListKind::Moderator);
        ctx.publish(Update::ListChanged { kind: ListKind::Moderator });
        Ok(())
    }
}

/// Handler for FKS (character search results).
pub struct FksHandler;

#[async_trait]
impl Handler for FksHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let names = cmd.require_name_list("characters")?;
        ctx.roster.set(&names, ListKind::SearchResult);
        ctx.publish(Update::ListChanged { kind: ListKind::SearchResult });
        Ok(())
    }
}

/// Handler for RTB (real-time bridge), sub-typed by its `type` field.
///
/// Carries account-level social events: friend requests and list changes
/// made from the website. Unknown sub-types are noise and absorbed.
pub struct RtbHandler;

#[async_trait]
impl Handler for RtbHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let sub = cmd.require_str("type")?;
        let name = cmd.require_str("name")?;

        match sub {
            "friendrequest" => {
                if ctx.roster.add(name, ListKind::FriendRequestReceived) {
                    ctx.publish(Update::FriendRequest { character: name.to_string() });
                }
            }
            "friendadd" => {
                // An accepted request is no longer pending in either direction.
                ctx.roster.remove(name, ListKind::FriendRequestSent);
                ctx.roster.remove(name, ListKind::FriendRequestReceived);
                if ctx.roster.add(name, ListKind::Friend) {
                    ctx.publish(Update::ListChanged { kind: ListKind::Friend });
                }
            }
            "friendremove" => {
                if ctx.roster.remove(name, ListKind::Friend) {
                    ctx.publish(Update::ListChanged { kind: ListKind::Friend });
                }
            }
            "trackadd" => {
                if ctx.roster.add(name, ListKind::Bookmark) {
                    ctx.publish(Update::ListChanged { kind: ListKind::Bookmark });
                }
            }
            "trackrem" => {
                if ctx.roster.remove(name, ListKind::Bookmark) {
                    ctx.publish(Update::ListChanged { kind: ListKind::Bookmark });
                }
            }
            other => {
                debug!(subtype = other, "unrecognized bridge event");
            }
        }
        Ok(())
    }
}
