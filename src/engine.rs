//! The engine façade.
//!
//! Owns the shared model, the router and its requeue queue, the ad cache,
//! the command table, and the two outgoing channels: updates toward the UI
//! and validated commands toward the transport. One engine per connection.

use crate::config::{CommandTable, PermissionLevel};
use crate::dedup::AdCache;
use crate::error::ParseError;
use crate::events::Update;
use crate::handlers::Router;
use crate::parser::{self, Outbound};
use crate::session::Session;
use crate::state::{ListKind, Roster};
use fennec_wire::{WireCommand, WireError};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// The client-side protocol engine.
///
/// The receive path is serialized: each inbound command runs as one logical
/// transaction behind the dispatch gate, so the UI-observation path reading
/// the roster never sees a half-applied update. Handlers never block on
/// I/O; slow work lives outside the core and rejoins as ordinary commands.
pub struct Engine {
    roster: Arc<Roster>,
    session: RwLock<Session>,
    ads: AdCache,
    router: Router,
    table: CommandTable,
    updates: mpsc::UnboundedSender<Update>,
    outbound: mpsc::UnboundedSender<WireCommand>,
    gate: tokio::sync::Mutex<()>,
    stopped: AtomicBool,
}

impl Engine {
    /// Create an engine with the given command table. Returns the engine
    /// plus the receivers for UI updates and outbound wire commands.
    pub fn new(
        table: CommandTable,
    ) -> (Self, mpsc::UnboundedReceiver<Update>, mpsc::UnboundedReceiver<WireCommand>) {
        let (updates, update_rx) = mpsc::unbounded_channel();
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let engine = Self {
            roster: Arc::new(Roster::new()),
            session: RwLock::new(Session::default()),
            ads: AdCache::new(),
            router: Router::new(),
            table,
            updates,
            outbound,
            gate: tokio::sync::Mutex::new(()),
            stopped: AtomicBool::new(false),
        };
        (engine, update_rx, outbound_rx)
    }

    /// Create an engine with the built-in command table.
    pub fn with_defaults(
    ) -> (Self, mpsc::UnboundedReceiver<Update>, mpsc::UnboundedReceiver<WireCommand>) {
        Self::new(CommandTable::defaults())
    }

    /// The shared character/channel model.
    pub fn roster(&self) -> &Arc<Roster> {
        &self.roster
    }

    /// Record the logged-in identity (from the connection layer's
    /// login-state events).
    pub fn set_identity(&self, character: impl Into<String>, is_admin: bool) {
        self.session.write().set_identity(character, is_admin);
    }

    /// The logged-in character, once known.
    pub fn identity(&self) -> Option<String> {
        self.session.read().character.clone()
    }

    /// Feed one decoded inbound command through dispatch.
    pub async fn receive(&self, cmd: WireCommand) {
        if self.stopped.load(Ordering::Acquire) {
            debug!(tag = %cmd.tag, "engine stopped; inbound command discarded");
            return;
        }
        let _gate = self.gate.lock().await;
        self.router
            .dispatch(&self.roster, &self.session, &self.ads, &self.updates, cmd)
            .await;
    }

    /// Feed one raw wire line through dispatch.
    pub async fn receive_line(&self, line: &str) -> Result<(), WireError> {
        let cmd = WireCommand::parse_line(line)?;
        self.receive(cmd).await;
        Ok(())
    }

    /// Validate user input and, when it is a command, hand it to the
    /// transport. Plain text is returned for the caller to send as chat or
    /// ad; rejected commands never reach the outbound channel.
    pub fn submit(&self, input: &str, current_channel: Option<&str>) -> Result<Outbound, ParseError> {
        let tier = self.caller_tier(current_channel);
        let parsed = parser::parse(input, current_channel, tier, &self.table)?;
        if let Outbound::Command(cmd) = &parsed {
            let _ = self.outbound.send(cmd.clone());
        }
        Ok(parsed)
    }

    /// The local user's permission tier, in the focused channel when one is
    /// given.
    pub fn caller_tier(&self, channel: Option<&str>) -> PermissionLevel {
        let (name, is_admin) = {
            let session = self.session.read();
            (session.character.clone(), session.is_admin)
        };
        if is_admin {
            return PermissionLevel::Admin;
        }
        let Some(name) = name else {
            return PermissionLevel::User;
        };
        if self.roster.is_on_list(&name, ListKind::Moderator, false) {
            return PermissionLevel::GlobalMod;
        }

        let channel_staff = channel.and_then(|id| self.roster.channel(id)).is_some_and(|ch| {
            let guard = ch.read();
            guard.roles.is_owner(&name) || guard.roles.is_on_list(&name, ListKind::Moderator)
        });
        if channel_staff {
            PermissionLevel::Moderator
        } else {
            PermissionLevel::User
        }
    }

    /// Number of commands parked awaiting a channel.
    pub fn pending_requeues(&self) -> usize {
        self.router.queue().len()
    }

    /// Connection-level stop: no new commands are accepted and parked
    /// requeues are discarded. State stays readable for teardown.
    pub fn shutdown(&self) {
        self.stopped.store(true, Ordering::Release);
        self.router.queue().clear();
    }
}
