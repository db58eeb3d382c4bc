//! Durable broker metadata for Strata.
//!
//! Two small stores, each an in-memory map mirrored to a single JSON file:
//!
//! - [`TopicCatalog`]: topic name → descriptor, mirrored to `metadata.json`
//! - [`OffsetStore`]: `(group, topic, partition)` → committed offset,
//!   mirrored to `offsets.json`
//!
//! Both persist with write-to-temp-then-rename so a crash mid-save can never
//! leave a half-written file at the primary path, and both treat a missing
//! file on load as empty state: a fresh data directory, not a failure.

pub mod catalog;
pub mod error;
pub mod offsets;
pub mod types;

mod persist;

pub use catalog::TopicCatalog;
pub use error::{MetadataError, Result};
pub use offsets::OffsetStore;
pub use types::TopicMeta;
