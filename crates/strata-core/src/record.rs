//! The stored record type.
//!
//! A record is one event as a partition log stores it:
//! - **offset**: logical index of the record within its partition (0, 1, 2, …)
//! - **timestamp**: nanoseconds since epoch, assigned at append time
//! - **key**: producer-supplied routing key, may be empty
//! - **payload**: opaque bytes; the transport serializes structured data
//!   before it reaches the core
//!
//! Payloads use `bytes::Bytes` so fetch paths can slice without copying.

use bytes::Bytes;

/// A single record as persisted in a partition log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    /// Logical offset of this record within its partition.
    pub offset: u64,

    /// Nanoseconds since epoch, assigned when the record was appended.
    pub timestamp: i64,

    /// Routing key. Empty when the producer supplied none.
    pub key: String,

    /// Opaque payload bytes.
    pub payload: Bytes,
}

impl StoredRecord {
    pub fn new(offset: u64, timestamp: i64, key: impl Into<String>, payload: Bytes) -> Self {
        Self {
            offset,
            timestamp,
            key: key.into(),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_preserves_fields() {
        let rec = StoredRecord::new(7, 1_700_000_000_000_000_000, "user-42", Bytes::from("{}"));
        assert_eq!(rec.offset, 7);
        assert_eq!(rec.timestamp, 1_700_000_000_000_000_000);
        assert_eq!(rec.key, "user-42");
        assert_eq!(rec.payload, Bytes::from("{}"));
    }

    #[test]
    fn empty_key_and_payload_are_valid() {
        let rec = StoredRecord::new(0, 0, "", Bytes::new());
        assert!(rec.key.is_empty());
        assert!(rec.payload.is_empty());
    }
}
