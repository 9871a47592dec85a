//! The requeue queue.
//!
//! Commands that reference a channel the engine does not know yet are
//! parked here and replayed, in arrival order, when that channel appears.
//! Growth is bounded two ways: a command is replayed at most
//! [`MAX_ATTEMPTS`] times, and it expires [`TTL`] after first being queued.
//! Either bound tripping drops the command with a diagnostic only — a
//! channel id that never materializes (a bad id, a room closed server-side)
//! must not pin memory or loop forever.

use fennec_wire::{fold_name, WireCommand};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::debug;

/// Maximum number of replay attempts per command.
pub const MAX_ATTEMPTS: u8 = 5;

/// Maximum age of a parked command.
pub const TTL: Duration = Duration::from_secs(90);

/// One parked command.
#[derive(Debug, Clone)]
pub(crate) struct Pending {
    pub cmd: WireCommand,
    pub attempts: u8,
    queued_at: Instant,
}

/// Ordered multiset of commands awaiting their target channel.
#[derive(Debug, Default)]
pub struct RequeueQueue {
    inner: Mutex<VecDeque<Pending>>,
}

impl RequeueQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Park a command after a failed resolution attempt. Returns false when
    /// the attempt cap is exhausted and the command was dropped instead.
    pub(crate) fn defer(&self, cmd: WireCommand, attempts: u8) -> bool {
        if attempts >= MAX_ATTEMPTS {
            debug!(tag = %cmd.tag, attempts, "dropping command: requeue attempt cap reached");
            return false;
        }
        self.inner.lock().push_back(Pending { cmd, attempts, queued_at: Instant::now() });
        true
    }

    /// Drain every parked command referencing `channel`, preserving arrival
    /// order. Expired stragglers encountered on the way are dropped.
    pub(crate) fn take_for_channel(&self, channel: &str) -> Vec<Pending> {
        let key = fold_name(channel);
        let now = Instant::now();
        let mut queue = self.inner.lock();
        let mut taken = Vec::new();

        queue.retain(|pending| {
            if now.duration_since(pending.queued_at) > TTL {
                debug!(tag = %pending.cmd.tag, "dropping command: requeue TTL expired");
                return false;
            }
            let matches = pending.cmd.channel().is_some_and(|c| fold_name(c) == key);
            if matches {
                taken.push(pending.clone());
            }
            !matches
        });

        taken
    }

    /// Drop every expired command. Returns how many were dropped.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut queue = self.inner.lock();
        let before = queue.len();
        queue.retain(|pending| now.duration_since(pending.queued_at) <= TTL);
        let dropped = before - queue.len();
        if dropped > 0 {
            debug!(dropped, "swept expired requeued commands");
        }
        dropped
    }

    /// Number of parked commands.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Discard everything (connection-level stop).
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}
