//! One partition's append-only log file.
//!
//! `LogSegment` is the exclusive owner of a partition file. It supports
//! exactly three things: a recovery scan on open, durable appends, and
//! bounded range reads from a byte position.
//!
//! ## Recovery scan
//!
//! Opening a segment reads the file and decodes frames from byte zero until
//! the first incomplete or checksum-failing frame. The number of intact
//! frames is the partition's next record offset, never the file's byte
//! length, which would conflate record count with byte count and assign
//! wrong offsets after a restart. Whatever trails the last intact frame is a
//! torn write from a crash; it is truncated away so the next append starts
//! on a clean boundary.
//!
//! ## Reads
//!
//! Reads open a fresh read-only handle, so they never contend with the
//! writer. Callers bound reads by the durable length; the unwritten tail of
//! the file is the only mutable region.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use strata_core::{frame, StoredRecord};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tracing::{debug, warn};

use crate::error::Result;

/// Append handle for one partition log file.
#[derive(Debug)]
pub struct LogSegment {
    path: PathBuf,
    file: File,
    len: u64,
}

/// What a recovery scan found when opening a segment.
#[derive(Debug)]
pub struct RecoveredSegment {
    pub segment: LogSegment,
    /// Byte position at which each intact frame begins, in offset order.
    pub positions: Vec<u64>,
    /// Bytes discarded from the tail (torn write or checksum failure).
    pub truncated: u64,
}

impl LogSegment {
    /// Open the segment file, creating it if absent, and scan its frames.
    pub async fn open(path: impl Into<PathBuf>) -> Result<RecoveredSegment> {
        let path = path.into();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)
            .await?;

        let mut data = Vec::new();
        file.read_to_end(&mut data).await?;

        let mut positions = Vec::new();
        let mut consumed = 0usize;
        while consumed < data.len() {
            match frame::decode(&data[consumed..]) {
                frame::Deframed::Record { len, .. } => {
                    positions.push(consumed as u64);
                    consumed += len;
                }
                frame::Deframed::Incomplete | frame::Deframed::Corrupt => break,
            }
        }

        let truncated = (data.len() - consumed) as u64;
        if truncated > 0 {
            warn!(
                path = %path.display(),
                valid_bytes = consumed,
                discarded_bytes = truncated,
                "discarding torn tail of partition log"
            );
            file.set_len(consumed as u64).await?;
            file.sync_all().await?;
        }
        file.seek(SeekFrom::Start(consumed as u64)).await?;

        debug!(
            path = %path.display(),
            records = positions.len(),
            bytes = consumed,
            "opened partition log"
        );

        Ok(RecoveredSegment {
            segment: LogSegment {
                path,
                file,
                len: consumed as u64,
            },
            positions,
            truncated,
        })
    }

    /// Append one record and flush it to durable media.
    ///
    /// Returns the byte position at which the frame begins. The write is a
    /// single call with the complete frame buffer; success means the bytes
    /// have hit disk.
    pub async fn append(&mut self, record: &StoredRecord) -> Result<u64> {
        let buf = frame::encode(record);
        self.file.write_all(&buf).await?;
        self.file.sync_all().await?;

        let pos = self.len;
        self.len += buf.len() as u64;
        Ok(pos)
    }

    /// Durable length in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Read up to `max_bytes` from `start` and deframe as many complete records
/// as fit.
///
/// `durable_len` bounds the read so it never observes bytes still in flight.
/// A `start` at or past `durable_len` yields an empty list, as does a read
/// window that ends mid-frame: the trailing partial frame is silently
/// dropped and the consumer refetches from the next offset.
pub async fn read_frames(
    path: &Path,
    start: u64,
    max_bytes: usize,
    durable_len: u64,
) -> Result<Vec<StoredRecord>> {
    if start >= durable_len {
        return Ok(Vec::new());
    }

    let window = (durable_len - start).min(max_bytes as u64) as usize;
    let mut file = File::open(path).await?;
    file.seek(SeekFrom::Start(start)).await?;

    let mut buf = vec![0u8; window];
    let mut filled = 0;
    while filled < window {
        let n = file.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    buf.truncate(filled);

    let (records, _) = frame::decode_all(&buf);
    Ok(records)
}
