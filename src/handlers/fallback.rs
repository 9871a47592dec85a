//! The text-sniffing fallback.
//!
//! The wire format has no explicit sub-type tags for most server error and
//! notice text, so the best available classification is substring matching
//! against an ordered rule list. That is inherently fragile; everything
//! about it is isolated behind [`classify_error_text`] so a future wire
//! format with real sub-type tags replaces one function and nothing else.

use super::{Context, Handler, HandlerResult};
use crate::events::{ErrorClass, Update};
use aho_corasick::{AhoCorasick, MatchKind};
use async_trait::async_trait;
use fennec_wire::{WireCommand, WireError};
use std::sync::OnceLock;
use tracing::debug;

/// Sniff rules, in priority order: the earliest-listed matching rule wins.
const SNIFF_RULES: [(&str, ErrorClass); 4] = [
    ("channel ban", ErrorClass::ChannelBan),
    ("has been promoted", ErrorClass::Promotion),
    ("has been demoted", ErrorClass::Demotion),
    ("has been kicked", ErrorClass::Kick),
];

fn automaton() -> &'static AhoCorasick {
    static AUTOMATON: OnceLock<AhoCorasick> = OnceLock::new();
    AUTOMATON.get_or_init(|| {
        AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(SNIFF_RULES.iter().map(|(pattern, _)| *pattern))
            .expect("static sniff patterns build")
    })
}

/// Classify server error/notice text by its content.
///
/// Returns the class of the highest-priority rule that matches anywhere in
/// the text, or [`ErrorClass::Unclassified`].
pub fn classify_error_text(text: &str) -> ErrorClass {
    automaton()
        .find_iter(text)
        .map(|m| m.pattern().as_usize())
        .min()
        .map(|i| SNIFF_RULES[i].1)
        .unwrap_or(ErrorClass::Unclassified)
}

/// Handler for ERR and for any tag without a routing entry.
///
/// In strict mode (the ERR tag) a missing message field is a loud
/// per-command failure; in lenient mode (unknown tags) the command is
/// treated as protocol noise and absorbed.
pub struct FallbackHandler {
    strict: bool,
}

impl FallbackHandler {
    /// ERR: message text is required.
    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Unknown tags: quietly tolerated.
    pub fn lenient() -> Self {
        Self { strict: false }
    }
}

#[async_trait]
impl Handler for FallbackHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &WireCommand) -> HandlerResult {
        let Some(message) = cmd.message() else {
            if self.strict {
                return Err(WireError::MissingField {
                    tag: cmd.tag.clone(),
                    field: "message".to_string(),
                }
                .into());
            }
            debug!(tag = %cmd.tag, "unhandled command absorbed");
            return Ok(());
        };

        let class = classify_error_text(message);
        ctx.publish(Update::ClassifiedError { class, message: message.to_string() });
        Ok(())
    }
}
