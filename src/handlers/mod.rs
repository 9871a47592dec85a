//! Inbound command handlers.
//!
//! This module contains the Handler trait and the Router for dispatching
//! incoming wire commands to appropriate handlers. Routing is a static
//! one-to-one map from type tag to handler; tags with no entry fall through
//! to the text-sniffing fallback. A handler that finds its target channel
//! missing returns [`HandlerError::UnresolvedChannel`] and the router parks
//! the command for bounded replay once the channel appears.

mod channel;
mod fallback;
mod lists;
mod messaging;
mod session;

pub use fallback::classify_error_text;

use crate::dedup::AdCache;
use crate::error::{HandlerError, HandlerResult};
use crate::events::Update;
use crate::queue::RequeueQueue;
use crate::session::Session;
use crate::state::Roster;
use async_trait::async_trait;
use fennec_wire::{tag, WireCommand, WireError};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// Shared character/channel model.
    pub roster: &'a Roster,
    /// Local session identity.
    pub session: &'a RwLock<Session>,
    /// Ad fingerprint memory.
    pub ads: &'a AdCache,
    updates: &'a mpsc::UnboundedSender<Update>,
    created_channels: Vec<String>,
}

impl Context<'_> {
    /// Publish the single update for a successful mutation.
    pub fn publish(&self, update: Update) {
        // A dropped receiver means the UI went away; state stays correct.
        let _ = self.updates.send(update);
    }

    /// Whether `name` is the local user.
    pub fn is_self(&self, name: &str) -> bool {
        self.session.read().is_self(name)
    }

    /// Record that this command brought a channel into existence, so the
    /// router can replay anything parked for it.
    pub fn note_channel_created(&mut self, id: &str) {
        self.created_channels.push(id.to_string());
    }
}

/// Trait implemented by all command handlers.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handle one incoming command.
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult;
}

/// Pull the acting character name out of a command. The field is a plain
/// string in most commands but a nested `{"identity": ...}` object in join
/// announcements.
pub(crate) fn identity_of(cmd: &WireCommand) -> Result<String, HandlerError> {
    if let Some(name) = cmd.character() {
        return Ok(name.to_string());
    }
    if let Some(name) = cmd
        .body
        .get("character")
        .and_then(Value::as_object)
        .and_then(|obj| obj.get("identity"))
        .and_then(Value::as_str)
    {
        return Ok(name.to_string());
    }
    Err(WireError::MissingField { tag: cmd.tag.clone(), field: "character".to_string() }.into())
}

/// Registry of command handlers plus the requeue queue.
pub struct Router {
    handlers: HashMap<&'static str, Box<dyn Handler>>,
    fallback: fallback::FallbackHandler,
    queue: RequeueQueue,
}

impl Router {
    /// Create a router with all handlers registered.
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();

        // Presence and session-state handlers
        handlers.insert(tag::LIS, Box::new(session::LisHandler));
        handlers.insert(tag::NLN, Box::new(session::NlnHandler));
        handlers.insert(tag::FLN, Box::new(session::FlnHandler));
        handlers.insert(tag::STA, Box::new(session::StaHandler));
        handlers.insert(tag::TPN, Box::new(session::TpnHandler));
        handlers.insert(tag::CON, Box::new(session::ConHandler));
        handlers.insert(tag::VAR, Box::new(session::VarHandler));
        handlers.insert(tag::UPT, Box::new(session::UptHandler));

        // Channel handlers
        handlers.insert(tag::JCH, Box::new(channel::JchHandler));
        handlers.insert(tag::LCH, Box::new(channel::LchHandler));
        handlers.insert(tag::ICH, Box::new(channel::IchHandler));
        handlers.insert(tag::CDS, Box::new(channel::CdsHandler));
        handlers.insert(tag::COL, Box::new(channel::ColHandler));
        handlers.insert(tag::COA, Box::new(channel::CoaHandler));
        handlers.insert(tag::COR, Box::new(channel::CorHandler));
        handlers.insert(tag::CSO, Box::new(channel::CsoHandler));
        handlers.insert(tag::CKU, Box::new(channel::CkuHandler));
        handlers.insert(tag::CBU, Box::new(channel::CbuHandler));
        handlers.insert(tag::CUB, Box::new(channel::CubHandler));
        handlers.insert(tag::CTU, Box::new(channel::CtuHandler));
        handlers.insert(tag::RMO, Box::new(channel::RmoHandler));
        handlers.insert(tag::ORS, Box::new(channel::DirectoryHandler::private_rooms()));
        handlers.insert(tag::CHA, Box::new(channel::DirectoryHandler::public_rooms()));

        // List handlers
        handlers.insert(tag::FRL, Box::new(lists::FrlHandler));
        handlers.insert(tag::IGN, Box::new(lists::IgnHandler));
        handlers.insert(tag::IGNORE, Box::new(lists::IgnHandler));
        handlers.insert(tag::IGNORE_LIST_SET, Box::new(lists::IgnoreListSetHandler));
        handlers.insert(tag::AOP, Box::new(lists::AopHandler));
        handlers.insert(tag::DOP, Box::new(lists::DopHandler));
        handlers.insert(tag::ADL, Box::new(lists::AdlHandler));
        handlers.insert(tag::FKS, Box::new(lists::FksHandler));
        handlers.insert(tag::RTB, Box::new(lists::RtbHandler));

        // Messaging handlers
        handlers.insert(tag::MSG, Box::new(messaging::MsgHandler));
        handlers.insert(tag::PRI, Box::new(messaging::PriHandler));
        handlers.insert(tag::LRP, Box::new(messaging::LrpHandler));
        handlers.insert(tag::BRO, Box::new(messaging::BroHandler));
        handlers.insert(tag::SYS, Box::new(messaging::SysHandler));
        handlers.insert(tag::SFC, Box::new(messaging::SfcHandler));

        // Server error text gets the sniffing classifier, loudly.
        handlers.insert(tag::ERR, Box::new(fallback::FallbackHandler::strict()));

        Self { handlers, fallback: fallback::FallbackHandler::lenient(), queue: RequeueQueue::new() }
    }

    /// The requeue queue (for stop/diagnostics).
    pub fn queue(&self) -> &RequeueQueue {
        &self.queue
    }

    /// Dispatch one command, then replay anything unblocked by channels the
    /// command created. Replays run iteratively in arrival order and may
    /// themselves create channels. All failures are recovered here: one bad
    /// command never halts processing of subsequent commands.
    pub async fn dispatch(
        &self,
        roster: &Roster,
        session: &RwLock<Session>,
        ads: &AdCache,
        updates: &mpsc::UnboundedSender<Update>,
        cmd: WireCommand,
    ) {
        // Age out stragglers whose channel never materialized.
        self.queue.sweep();

        let mut work: VecDeque<(WireCommand, u8)> = VecDeque::new();
        work.push_back((cmd, 0));

        while let Some((cmd, attempts)) = work.pop_front() {
            let mut ctx = Context { roster, session, ads, updates, created_channels: Vec::new() };

            let outcome = self.route(&mut ctx, &cmd).await;
            let created = std::mem::take(&mut ctx.created_channels);

            match outcome {
                Ok(()) => {
                    for id in created {
                        for pending in self.queue.take_for_channel(&id) {
                            work.push_back((pending.cmd, pending.attempts));
                        }
                    }
                }
                Err(HandlerError::UnresolvedChannel(channel)) => {
                    if self.queue.defer(cmd, attempts + 1) {
                        debug!(%channel, "command parked awaiting channel");
                    }
                }
                Err(err) => {
                    warn!(tag = %cmd.tag, code = err.error_code(), error = %err, "command failed");
                }
            }
        }
    }

    async fn route(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        match self.handlers.get(cmd.tag.as_str()) {
            Some(handler) => handler.handle(ctx, cmd).await,
            None => self.fallback.handle(ctx, cmd).await,
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
