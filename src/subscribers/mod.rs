//! Chat subscribers, persisted as a whole-file JSON map `{"<chat_id>": true}`

use crate::error::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

#[derive(Clone)]
pub struct SubscriberStore {
    chats: Arc<RwLock<BTreeSet<i64>>>,
    path: Option<PathBuf>,
    persist_lock: Arc<Mutex<()>>,
}

impl SubscriberStore {
    /// Load subscribers from `path`; a missing file means nobody is subscribed
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let chats = match tokio::fs::read(&path).await {
            Ok(data) => {
                let map: BTreeMap<i64, bool> = serde_json::from_slice(&data)?;
                map.into_iter()
                    .filter(|(_, active)| *active)
                    .map(|(chat_id, _)| chat_id)
                    .collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeSet::new(),
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), count = chats.len(), "Loaded {} subscribers", chats.len());

        Ok(Self {
            chats: Arc::new(RwLock::new(chats)),
            path: Some(path),
            persist_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Empty store that writes to `path` on the first change
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            chats: Arc::new(RwLock::new(BTreeSet::new())),
            path: Some(path.as_ref().to_path_buf()),
            persist_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            chats: Arc::new(RwLock::new(BTreeSet::new())),
            path: None,
            persist_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Copy of the current set, taken fresh on every call
    pub async fn snapshot(&self) -> Vec<i64> {
        self.chats.read().await.iter().copied().collect()
    }

    pub async fn contains(&self, chat_id: i64) -> bool {
        self.chats.read().await.contains(&chat_id)
    }

    pub async fn len(&self) -> usize {
        self.chats.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.chats.read().await.is_empty()
    }

    /// Returns true if the chat was not subscribed before
    pub async fn subscribe(&self, chat_id: i64) -> bool {
        let _guard = self.persist_lock.lock().await;
        let added = self.chats.write().await.insert(chat_id);
        if added {
            info!(chat_id, "Chat subscribed");
            self.persist().await;
        }
        added
    }

    /// Returns true if the chat was subscribed
    pub async fn unsubscribe(&self, chat_id: i64) -> bool {
        let _guard = self.persist_lock.lock().await;
        let removed = self.chats.write().await.remove(&chat_id);
        if removed {
            info!(chat_id, "Chat unsubscribed");
            self.persist().await;
        }
        removed
    }

    async fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };
        let map: BTreeMap<i64, bool> = self
            .snapshot()
            .await
            .into_iter()
            .map(|chat_id| (chat_id, true))
            .collect();

        let result: Result<()> = match serde_json::to_vec_pretty(&map) {
            Ok(data) => tokio::fs::write(path, data).await.map_err(Into::into),
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            warn!(path = %path.display(), error = %e, "Failed to persist subscribers");
        }
    }
}
