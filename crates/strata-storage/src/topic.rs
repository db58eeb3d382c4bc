//! A topic: a fixed-cardinality set of partitions.
//!
//! The partition count is set at creation and never changes; it is what
//! keyed routing hashes against, so resizing it would silently break
//! key → partition stability.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::partition::Partition;

#[derive(Debug)]
pub struct Topic {
    name: String,
    partitions: Vec<Arc<Partition>>,
    /// Cursor for empty-key round-robin placement.
    round_robin: AtomicUsize,
}

impl Topic {
    /// Open (or create) every partition log for this topic under
    /// `data_dir/{name}/partition-{id}.log`.
    pub async fn open(data_dir: &Path, name: &str, num_partitions: u32) -> Result<Self> {
        let topic_dir = data_dir.join(name);
        tokio::fs::create_dir_all(&topic_dir).await?;

        let mut partitions = Vec::with_capacity(num_partitions as usize);
        for id in 0..num_partitions {
            let path = topic_dir.join(format!("partition-{id}.log"));
            partitions.push(Arc::new(Partition::open(name, id, path).await?));
        }

        Ok(Self {
            name: name.to_string(),
            partitions,
            round_robin: AtomicUsize::new(0),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_partitions(&self) -> u32 {
        self.partitions.len() as u32
    }

    pub fn partition(&self, id: u32) -> Result<&Arc<Partition>> {
        self.partitions
            .get(id as usize)
            .ok_or_else(|| Error::PartitionNotFound {
                topic: self.name.clone(),
                partition: id,
            })
    }

    /// Next partition in round-robin order, for events without a key.
    pub fn next_round_robin(&self) -> u32 {
        (self.round_robin.fetch_add(1, Ordering::Relaxed) % self.partitions.len()) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn open_creates_partition_logs() {
        let dir = TempDir::new().unwrap();
        let topic = Topic::open(dir.path(), "orders", 3).await.unwrap();

        assert_eq!(topic.num_partitions(), 3);
        for id in 0..3 {
            assert!(dir.path().join("orders").join(format!("partition-{id}.log")).exists());
            assert_eq!(topic.partition(id).unwrap().id(), id);
        }
        assert!(topic.partition(3).is_err());
    }

    #[tokio::test]
    async fn round_robin_cycles_evenly() {
        let dir = TempDir::new().unwrap();
        let topic = Topic::open(dir.path(), "e", 3).await.unwrap();

        let mut counts = [0u32; 3];
        for _ in 0..300 {
            counts[topic.next_round_robin() as usize] += 1;
        }
        assert_eq!(counts, [100, 100, 100]);
    }
}
