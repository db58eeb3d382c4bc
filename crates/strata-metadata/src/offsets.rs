//! Consumer-group committed offsets, mirrored to `offsets.json`.
//!
//! The map is keyed by the `(group, topic, partition)` triple flattened to
//! `"{group}-{topic}-{partition}"`. A commit is an unconditional overwrite;
//! the store does not enforce monotonicity, so a group can rewind itself by
//! committing a smaller offset. Every commit rewrites the whole file; commit
//! rates here are human-scale, not per-record.

use std::collections::HashMap;
use std::path::PathBuf;

use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::persist;

pub struct OffsetStore {
    path: PathBuf,
    offsets: RwLock<HashMap<String, u64>>,
}

impl OffsetStore {
    /// Load committed offsets from `path`. A missing file is an empty map.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let offsets: HashMap<String, u64> = persist::load_json(&path).await?.unwrap_or_default();
        debug!(path = %path.display(), entries = offsets.len(), "loaded offset store");
        Ok(Self {
            path,
            offsets: RwLock::new(offsets),
        })
    }

    /// Overwrite the committed offset for the triple and durably save.
    pub async fn commit(&self, group: &str, topic: &str, partition: u32, offset: u64) -> Result<()> {
        let mut offsets = self.offsets.write().await;
        offsets.insert(offset_key(group, topic, partition), offset);
        persist::save_json(&self.path, &*offsets).await
    }

    /// The committed offset for the triple, if any group member ever
    /// committed one.
    pub async fn get(&self, group: &str, topic: &str, partition: u32) -> Option<u64> {
        self.offsets
            .read()
            .await
            .get(&offset_key(group, topic, partition))
            .copied()
    }
}

fn offset_key(group: &str, topic: &str, partition: u32) -> String {
    format!("{group}-{topic}-{partition}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn absent_entry_is_none() {
        let dir = TempDir::new().unwrap();
        let store = OffsetStore::load(dir.path().join("offsets.json"))
            .await
            .unwrap();
        assert_eq!(store.get("g1", "t", 0).await, None);
    }

    #[tokio::test]
    async fn commit_overwrites_unconditionally() {
        let dir = TempDir::new().unwrap();
        let store = OffsetStore::load(dir.path().join("offsets.json"))
            .await
            .unwrap();

        store.commit("g1", "t", 0, 7).await.unwrap();
        assert_eq!(store.get("g1", "t", 0).await, Some(7));

        // moving backwards is allowed by explicit write
        store.commit("g1", "t", 0, 3).await.unwrap();
        assert_eq!(store.get("g1", "t", 0).await, Some(3));
    }

    #[tokio::test]
    async fn triples_are_independent() {
        let dir = TempDir::new().unwrap();
        let store = OffsetStore::load(dir.path().join("offsets.json"))
            .await
            .unwrap();

        store.commit("g1", "t", 0, 5).await.unwrap();
        store.commit("g2", "t", 0, 9).await.unwrap();
        store.commit("g1", "t", 1, 2).await.unwrap();

        assert_eq!(store.get("g1", "t", 0).await, Some(5));
        assert_eq!(store.get("g2", "t", 0).await, Some(9));
        assert_eq!(store.get("g1", "t", 1).await, Some(2));
        assert_eq!(store.get("g1", "u", 0).await, None);
    }

    #[tokio::test]
    async fn commits_survive_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("offsets.json");

        {
            let store = OffsetStore::load(&path).await.unwrap();
            store.commit("g1", "t", 0, 7).await.unwrap();
        }

        let store = OffsetStore::load(&path).await.unwrap();
        assert_eq!(store.get("g1", "t", 0).await, Some(7));
    }
}
