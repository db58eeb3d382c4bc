//! A partition: one log segment plus its record-offset counter.
//!
//! The partition owns the only write lock on the append path. Appends
//! serialize behind it; reads never take it, because the segment's unwritten
//! tail is the only mutable region and reads are bounded by the last durable
//! byte.
//!
//! Offsets assigned to successful appends are contiguous from 0 and increase
//! by exactly 1; a failed append leaves the counter untouched. The
//! record-offset → byte-position index is rebuilt by the recovery scan on
//! open and extended after each durable append, so a reader can only ever
//! resolve offsets whose frames are already on disk.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use strata_core::StoredRecord;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::Result;
use crate::segment::{self, LogSegment};

#[derive(Debug)]
pub struct Partition {
    topic: String,
    id: u32,
    path: PathBuf,
    /// Write path: the segment's append handle, serialized per partition.
    log: Mutex<LogSegment>,
    /// Byte position of each record's frame, indexed by record offset.
    index: RwLock<Vec<u64>>,
    /// Last byte known to be on durable media; bounds every read.
    durable_len: AtomicU64,
}

impl Partition {
    /// Open (or create) the partition log at `path` and recover its state.
    pub async fn open(topic: &str, id: u32, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let recovered = LogSegment::open(&path).await?;

        if !recovered.positions.is_empty() || recovered.truncated > 0 {
            info!(
                topic,
                partition = id,
                records = recovered.positions.len(),
                discarded_bytes = recovered.truncated,
                "recovered partition"
            );
        }

        let durable_len = recovered.segment.len();
        Ok(Self {
            topic: topic.to_string(),
            id,
            path,
            log: Mutex::new(recovered.segment),
            index: RwLock::new(recovered.positions),
            durable_len: AtomicU64::new(durable_len),
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn log_path(&self) -> &Path {
        &self.path
    }

    /// The offset the next successful append will receive.
    pub fn next_offset(&self) -> u64 {
        self.index.read().expect("partition index poisoned").len() as u64
    }

    /// Append one record, assigning it the partition's next offset and the
    /// current wall-clock timestamp. Returns the assigned record offset.
    pub async fn append(&self, key: String, payload: Bytes) -> Result<u64> {
        let mut log = self.log.lock().await;

        // Safe to read without racing: only the holder of the log lock pushes.
        let offset = self.index.read().expect("partition index poisoned").len() as u64;
        let record = StoredRecord {
            offset,
            timestamp: now_nanos(),
            key,
            payload,
        };

        let pos = log.append(&record).await?;

        // Publish durability before visibility: a reader that sees the new
        // index entry must also see the extended durable bound.
        self.durable_len.store(log.len(), Ordering::Release);
        self.index
            .write()
            .expect("partition index poisoned")
            .push(pos);

        Ok(offset)
    }

    /// Read records starting at the given record offset, up to `max_bytes`
    /// of frames. An offset at or past the end of the partition yields an
    /// empty list.
    pub async fn read(&self, start_offset: u64, max_bytes: usize) -> Result<Vec<StoredRecord>> {
        let start_pos = {
            let index = self.index.read().expect("partition index poisoned");
            match index.get(start_offset as usize) {
                Some(pos) => *pos,
                None => return Ok(Vec::new()),
            }
        };
        let durable = self.durable_len.load(Ordering::Acquire);
        segment::read_frames(&self.path, start_pos, max_bytes, durable).await
    }
}

fn now_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or(0)
}
