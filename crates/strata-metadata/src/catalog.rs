//! The topic catalog: name → descriptor, mirrored to `metadata.json`.

use std::collections::HashMap;
use std::path::PathBuf;

use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{MetadataError, Result};
use crate::persist;
use crate::types::TopicMeta;

pub struct TopicCatalog {
    path: PathBuf,
    topics: RwLock<HashMap<String, TopicMeta>>,
}

impl TopicCatalog {
    /// Load the catalog from `path`. A missing file is an empty catalog.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let topics: HashMap<String, TopicMeta> =
            persist::load_json(&path).await?.unwrap_or_default();
        debug!(path = %path.display(), topics = topics.len(), "loaded topic catalog");
        Ok(Self {
            path,
            topics: RwLock::new(topics),
        })
    }

    /// Register a new topic and durably save the catalog.
    ///
    /// The write lock is held across the save so concurrent registrations
    /// serialize and each save observes a consistent map.
    pub async fn add(&self, meta: TopicMeta) -> Result<()> {
        let mut topics = self.topics.write().await;
        if topics.contains_key(&meta.name) {
            return Err(MetadataError::TopicAlreadyExists(meta.name));
        }
        topics.insert(meta.name.clone(), meta);
        persist::save_json(&self.path, &*topics).await
    }

    pub async fn get(&self, name: &str) -> Option<TopicMeta> {
        self.topics.read().await.get(name).cloned()
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.topics.read().await.contains_key(name)
    }

    /// Snapshot of every topic, sorted by name for stable listings.
    pub async fn list(&self) -> Vec<TopicMeta> {
        let mut topics: Vec<TopicMeta> = self.topics.read().await.values().cloned().collect();
        topics.sort_by(|a, b| a.name.cmp(&b.name));
        topics
    }
}
