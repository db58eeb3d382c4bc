//! Partition log storage engine for Strata.
//!
//! One [`LogSegment`] owns one partition's append-only file on disk. A
//! [`Partition`] binds a segment to the partition's record-offset counter and
//! write lock, and a [`Topic`] is the fixed set of partitions created
//! together.
//!
//! ## Durability
//!
//! `append` does not return until the frame has been flushed to durable
//! media (`sync_all`). Readers never observe a record whose append has not
//! returned: reads are bounded by the last durable byte, not the file length.
//!
//! ## Recovery
//!
//! Opening a segment scans its frames from byte zero, rebuilding the
//! record-offset → byte-position index and recomputing the next offset from
//! the count of intact frames. A torn or checksum-failing tail is truncated
//! away; everything before it survives.

pub mod error;
pub mod partition;
pub mod segment;
pub mod topic;

pub use error::{Error, Result};
pub use partition::Partition;
pub use segment::LogSegment;
pub use topic::Topic;
