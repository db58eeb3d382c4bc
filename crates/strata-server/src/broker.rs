//! The broker façade.
//!
//! One `Broker` value owns everything: the topic catalog and offset store
//! (JSON mirrors) and the live topics with their partition logs. The entry
//! point constructs it once and hands the transport a shared reference;
//! there is no global state and no back-reference from a partition to the
//! broker that owns it.
//!
//! ## Lock order
//!
//! The live-topic map's read lock is taken briefly to resolve a topic and
//! released before partition work; per-partition write locks serialize
//! appends; the offset store's lock is independent and never nested under
//! either.
//!
//! ## Recovery
//!
//! `open` reloads the catalog, reopens every partition log it lists (each
//! open rescans frames and recomputes the partition's next offset from the
//! count of intact records), and reloads committed offsets.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use strata_core::StoredRecord;
use strata_metadata::{OffsetStore, TopicCatalog, TopicMeta};
use strata_storage::Topic;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{BrokerError, Result};
use crate::router;

pub struct Broker {
    data_dir: PathBuf,
    catalog: TopicCatalog,
    offsets: OffsetStore,
    topics: RwLock<HashMap<String, Arc<Topic>>>,
}

impl Broker {
    /// Open the broker over `data_dir`, creating the directory if needed and
    /// recovering all durable state.
    pub async fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .map_err(|e| BrokerError::Storage(e.into()))?;

        let catalog = TopicCatalog::load(data_dir.join("metadata.json")).await?;
        let offsets = OffsetStore::load(data_dir.join("offsets.json")).await?;

        let mut topics = HashMap::new();
        for meta in catalog.list().await {
            let topic = Topic::open(&data_dir, &meta.name, meta.num_partitions).await?;
            topics.insert(meta.name.clone(), Arc::new(topic));
        }

        if !topics.is_empty() {
            info!(topics = topics.len(), data_dir = %data_dir.display(), "recovered broker state");
        }

        Ok(Self {
            data_dir,
            catalog,
            offsets,
            topics: RwLock::new(topics),
        })
    }

    /// Create a topic with a fixed partition count. Fails if the name is
    /// already taken.
    pub async fn create_topic(&self, name: &str, num_partitions: u32) -> Result<()> {
        if self.catalog.contains(name).await {
            return Err(BrokerError::TopicAlreadyExists(name.to_string()));
        }

        let topic = Topic::open(&self.data_dir, name, num_partitions).await?;
        self.catalog
            .add(TopicMeta::new(name, num_partitions))
            .await?;
        self.topics
            .write()
            .await
            .insert(name.to_string(), Arc::new(topic));

        info!(topic = name, partitions = num_partitions, "created topic");
        Ok(())
    }

    /// Create the topic if it does not exist yet; reopening an existing one
    /// is a no-op. Used by startup bootstrap so restarts are idempotent.
    pub async fn ensure_topic(&self, name: &str, num_partitions: u32) -> Result<()> {
        if self.catalog.contains(name).await {
            return Ok(());
        }
        match self.create_topic(name, num_partitions).await {
            Err(BrokerError::TopicAlreadyExists(_)) => Ok(()),
            other => other,
        }
    }

    /// Route and durably append one event. Returns the chosen partition and
    /// the record offset the event was assigned.
    pub async fn publish(&self, topic: &str, key: &str, payload: Bytes) -> Result<(u32, u64)> {
        let partition = {
            let topics = self.topics.read().await;
            let t = topics
                .get(topic)
                .ok_or_else(|| BrokerError::TopicNotFound(topic.to_string()))?;
            let id = router::choose_partition(t, key);
            t.partition(id)?.clone()
        };

        let offset = partition.append(key.to_string(), payload).await?;
        Ok((partition.id(), offset))
    }

    /// Read records from a partition starting at a record offset. An offset
    /// past the end yields an empty list; an unknown topic or partition is
    /// an error.
    pub async fn fetch(
        &self,
        topic: &str,
        partition_id: u32,
        offset: u64,
        max_bytes: usize,
    ) -> Result<Vec<StoredRecord>> {
        let partition = {
            let topics = self.topics.read().await;
            let t = topics
                .get(topic)
                .ok_or_else(|| BrokerError::TopicNotFound(topic.to_string()))?;
            t.partition(partition_id)?.clone()
        };

        Ok(partition.read(offset, max_bytes).await?)
    }

    /// Durably record a consumer group's position.
    pub async fn commit_offset(
        &self,
        group: &str,
        topic: &str,
        partition: u32,
        offset: u64,
    ) -> Result<()> {
        self.offsets.commit(group, topic, partition, offset).await?;
        Ok(())
    }

    /// The committed offset for a group, or 0 if the group never committed.
    pub async fn committed_offset(&self, group: &str, topic: &str, partition: u32) -> u64 {
        self.offsets.get(group, topic, partition).await.unwrap_or(0)
    }

    /// Snapshot of the topic catalog for the metadata endpoint.
    pub async fn list_topics(&self) -> Vec<TopicMeta> {
        self.catalog.list().await
    }
}
