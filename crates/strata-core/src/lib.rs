//! Core types for the Strata event broker.
//!
//! This crate holds what every other Strata crate agrees on:
//! - [`StoredRecord`]: the unit of data a partition log stores
//! - [`frame`]: the on-disk binary framing (encode, decode, checksums)
//!
//! Nothing in here touches the filesystem; the storage crate owns files,
//! this crate owns bytes. Decoding cannot fail in a way callers must
//! propagate: a frame is either intact, incomplete, or corrupt, and
//! [`frame::Deframed`] says which.

pub mod frame;
pub mod record;

pub use record::StoredRecord;
