//! Broadcast-ad duplicate suppression.
//!
//! Remembers the most recent ad text per poster and suppresses an incoming
//! ad that exactly matches it. Content equality, not hashing — payloads are
//! small and the memory is one entry per poster, cleared on sign-off. This
//! is best-effort anti-spam, not a correctness guarantee.

use dashmap::DashMap;
use fennec_wire::fold_name;

/// Per-poster last-ad fingerprint memory.
#[derive(Debug, Default)]
pub struct AdCache {
    last: DashMap<String, String>,
}

impl AdCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `text` as the poster's latest ad. Returns true when the ad
    /// matches the previous one and should be suppressed.
    pub fn suppress(&self, poster: &str, text: &str) -> bool {
        let key = fold_name(poster);
        if self.last.get(&key).is_some_and(|prev| prev.value() == text) {
            return true;
        }
        self.last.insert(key, text.to_string());
        false
    }

    /// Forget a poster's fingerprint (sign-off).
    pub fn forget(&self, poster: &str) {
        self.last.remove(&fold_name(poster));
    }

    /// Number of posters currently remembered.
    pub fn len(&self) -> usize {
        self.last.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}
