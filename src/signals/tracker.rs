//! Last emitted signal per symbol
//!
//! Identical consecutive signals for a symbol are suppressed until the kind
//! changes or the symbol is cleared by a neutral reading. State lives for the
//! process lifetime only.

use crate::models::signal::SignalKind;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct SignalTracker {
    last: Arc<RwLock<HashMap<String, SignalKind>>>,
}

impl SignalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `kind` for `symbol` and return true, unless it is already the
    /// stored kind, in which case nothing changes and false is returned.
    pub async fn should_emit(&self, symbol: &str, kind: &SignalKind) -> bool {
        let mut last = self.last.write().await;
        if last.get(symbol) == Some(kind) {
            return false;
        }
        last.insert(symbol.to_string(), kind.clone());
        true
    }

    /// Reset `symbol` to neutral so the next crossing fires again
    pub async fn clear(&self, symbol: &str) {
        self.last.write().await.remove(symbol);
    }

    pub async fn last_signal(&self, symbol: &str) -> Option<SignalKind> {
        self.last.read().await.get(symbol).cloned()
    }

    /// Sorted copy of all non-neutral symbols
    pub async fn snapshot(&self) -> BTreeMap<String, SignalKind> {
        self.last
            .read()
            .await
            .iter()
            .map(|(symbol, kind)| (symbol.clone(), kind.clone()))
            .collect()
    }
}
