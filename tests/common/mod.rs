//! Integration test common infrastructure.
//!
//! Builds an engine wired to in-memory update/outbound receivers and
//! provides small helpers for feeding wire commands and draining events.

// Not every test binary uses every helper.
#![allow(dead_code)]

use fennec::{Engine, Update, WireCommand};
use tokio::sync::mpsc::UnboundedReceiver;

/// An engine plus its observation ends.
pub struct TestEngine {
    pub engine: Engine,
    pub updates: UnboundedReceiver<Update>,
    pub outbound: UnboundedReceiver<WireCommand>,
}

/// Build an engine with the default command table, logged in as `Mara`.
pub fn engine() -> TestEngine {
    init_tracing();
    let (engine, updates, outbound) = Engine::with_defaults();
    engine.set_identity("Mara", false);
    TestEngine { engine, updates, outbound }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

impl TestEngine {
    /// Feed one raw wire line.
    pub async fn feed(&self, line: &str) {
        self.engine.receive_line(line).await.expect("well-formed wire line");
    }

    /// Drain every update published so far.
    pub fn drain(&mut self) -> Vec<Update> {
        let mut seen = Vec::new();
        while let Ok(update) = self.updates.try_recv() {
            seen.push(update);
        }
        seen
    }

    /// Drain outbound commands handed to the transport so far.
    pub fn drain_outbound(&mut self) -> Vec<WireCommand> {
        let mut seen = Vec::new();
        while let Ok(cmd) = self.outbound.try_recv() {
            seen.push(cmd);
        }
        seen
    }
}
