//! Binary frame codec for partition log files.
//!
//! A log file is a plain sequence of frames with no file header and no
//! inter-frame delimiter; framing is purely length-prefixed. Every integer
//! is big-endian.
//!
//! ```text
//! ┌───────────┬────────────┬──────────┬─────────┬──────────────┬──────────┬──────────┐
//! │ offset    │ timestamp  │ key_len  │ key     │ payload_len  │ payload  │ crc32    │
//! │ (8 bytes) │ (8 bytes)  │ (4 bytes)│ (N)     │ (4 bytes)    │ (M)      │ (4 bytes)│
//! └───────────┴────────────┴──────────┴─────────┴──────────────┴──────────┴──────────┘
//! ```
//!
//! The trailing CRC32 covers every preceding byte of the frame. A frame that
//! fails its checksum is indistinguishable from a torn write, so scanners
//! treat it as truncation: stop, keep what came before.
//!
//! [`decode`] never fails hard on short input. A partial frame at the end of
//! a buffer is the normal case for bounded reads, and callers decide whether
//! "incomplete" means "refetch later" (consumers) or "truncated tail"
//! (recovery).

use bytes::Bytes;

use crate::record::StoredRecord;

/// offset (8) + timestamp (8) + key_len (4).
const FIXED_PREFIX: usize = 20;

/// Smallest possible frame: empty key, empty payload.
pub const MIN_FRAME_LEN: usize = FIXED_PREFIX + 4 + 4;

/// Outcome of decoding one frame from the front of a buffer.
#[derive(Debug)]
pub enum Deframed {
    /// A complete, checksum-valid frame. `len` is the total number of bytes
    /// the frame occupies in the buffer.
    Record { record: StoredRecord, len: usize },

    /// The buffer ends before the frame does. More bytes may exist past the
    /// end of the buffer, or the log may simply stop here.
    Incomplete,

    /// The frame is complete but its checksum does not match, or its key is
    /// not valid UTF-8. Scanners must not trust anything at or past this
    /// point.
    Corrupt,
}

/// Encode a record into its on-disk frame.
pub fn encode(record: &StoredRecord) -> Vec<u8> {
    let key = record.key.as_bytes();
    let total = MIN_FRAME_LEN + key.len() + record.payload.len();
    let mut buf = Vec::with_capacity(total);

    buf.extend_from_slice(&record.offset.to_be_bytes());
    buf.extend_from_slice(&record.timestamp.to_be_bytes());
    buf.extend_from_slice(&(key.len() as u32).to_be_bytes());
    buf.extend_from_slice(key);
    buf.extend_from_slice(&(record.payload.len() as u32).to_be_bytes());
    buf.extend_from_slice(&record.payload);

    let crc = crc32fast::hash(&buf);
    buf.extend_from_slice(&crc.to_be_bytes());
    buf
}

/// Decode one frame from the front of `buf`.
pub fn decode(buf: &[u8]) -> Deframed {
    if buf.len() < FIXED_PREFIX {
        return Deframed::Incomplete;
    }

    let offset = u64::from_be_bytes(buf[0..8].try_into().unwrap());
    let timestamp = i64::from_be_bytes(buf[8..16].try_into().unwrap());
    let key_len = u32::from_be_bytes(buf[16..20].try_into().unwrap()) as usize;

    let payload_len_at = FIXED_PREFIX + key_len;
    if buf.len() < payload_len_at + 4 {
        return Deframed::Incomplete;
    }
    let payload_len =
        u32::from_be_bytes(buf[payload_len_at..payload_len_at + 4].try_into().unwrap()) as usize;

    let total = MIN_FRAME_LEN + key_len + payload_len;
    if buf.len() < total {
        return Deframed::Incomplete;
    }

    let stored_crc = u32::from_be_bytes(buf[total - 4..total].try_into().unwrap());
    if crc32fast::hash(&buf[..total - 4]) != stored_crc {
        return Deframed::Corrupt;
    }

    let key = match std::str::from_utf8(&buf[FIXED_PREFIX..FIXED_PREFIX + key_len]) {
        Ok(k) => k.to_string(),
        Err(_) => return Deframed::Corrupt,
    };
    let payload = Bytes::copy_from_slice(&buf[payload_len_at + 4..total - 4]);

    Deframed::Record {
        record: StoredRecord {
            offset,
            timestamp,
            key,
            payload,
        },
        len: total,
    }
}

/// Decode as many complete frames as `buf` holds.
///
/// Stops at the first incomplete or corrupt frame; a trailing partial frame
/// is silently discarded. Returns the records and the number of bytes
/// consumed by intact frames.
pub fn decode_all(buf: &[u8]) -> (Vec<StoredRecord>, usize) {
    let mut records = Vec::new();
    let mut consumed = 0;
    while consumed < buf.len() {
        match decode(&buf[consumed..]) {
            Deframed::Record { record, len } => {
                records.push(record);
                consumed += len;
            }
            Deframed::Incomplete | Deframed::Corrupt => break,
        }
    }
    (records, consumed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StoredRecord {
        StoredRecord::new(
            3,
            1_700_000_000_123_456_789,
            "user-42",
            Bytes::from(r#"{"x":1}"#),
        )
    }

    #[test]
    fn roundtrip() {
        let rec = sample();
        let frame = encode(&rec);
        match decode(&frame) {
            Deframed::Record { record, len } => {
                assert_eq!(record, rec);
                assert_eq!(len, frame.len());
            }
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn roundtrip_empty_key_and_payload() {
        let rec = StoredRecord::new(0, 0, "", Bytes::new());
        let frame = encode(&rec);
        assert_eq!(frame.len(), MIN_FRAME_LEN);
        match decode(&frame) {
            Deframed::Record { record, .. } => assert_eq!(record, rec),
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn layout_is_big_endian_with_trailing_crc() {
        let rec = StoredRecord::new(1, 2, "k", Bytes::from_static(b"v"));
        let frame = encode(&rec);
        assert_eq!(&frame[0..8], &1u64.to_be_bytes());
        assert_eq!(&frame[8..16], &2i64.to_be_bytes());
        assert_eq!(&frame[16..20], &1u32.to_be_bytes());
        assert_eq!(&frame[20..21], b"k");
        assert_eq!(&frame[21..25], &1u32.to_be_bytes());
        assert_eq!(&frame[25..26], b"v");
        let crc = crc32fast::hash(&frame[..26]);
        assert_eq!(&frame[26..30], &crc.to_be_bytes());
    }

    #[test]
    fn truncated_frame_is_incomplete_at_every_cut() {
        let frame = encode(&sample());
        for cut in 0..frame.len() {
            assert!(
                matches!(decode(&frame[..cut]), Deframed::Incomplete),
                "cut at {cut} should be incomplete"
            );
        }
    }

    #[test]
    fn flipped_byte_is_corrupt() {
        let mut frame = encode(&sample());
        // flip one payload byte; the length prefixes still line up
        let idx = frame.len() - 6;
        frame[idx] ^= 0xFF;
        assert!(matches!(decode(&frame), Deframed::Corrupt));
    }

    #[test]
    fn decode_all_stops_at_partial_tail() {
        let a = StoredRecord::new(0, 10, "a", Bytes::from_static(b"first"));
        let b = StoredRecord::new(1, 20, "b", Bytes::from_static(b"second"));
        let mut buf = encode(&a);
        let frame_b = encode(&b);
        buf.extend_from_slice(&frame_b[..frame_b.len() / 2]);

        let (records, consumed) = decode_all(&buf);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], a);
        assert_eq!(consumed, encode(&a).len());
    }

    #[test]
    fn decode_all_stops_at_corrupt_frame() {
        let a = StoredRecord::new(0, 10, "a", Bytes::from_static(b"first"));
        let b = StoredRecord::new(1, 20, "b", Bytes::from_static(b"second"));
        let mut buf = encode(&a);
        let mut frame_b = encode(&b);
        let idx = frame_b.len() - 6;
        frame_b[idx] ^= 0xFF;
        buf.extend_from_slice(&frame_b);

        let (records, consumed) = decode_all(&buf);
        assert_eq!(records.len(), 1);
        assert_eq!(consumed, encode(&a).len());
    }

    #[test]
    fn length_prefix_past_buffer_end_is_incomplete() {
        // a frame whose key_len claims far more bytes than exist
        let mut buf = Vec::new();
        buf.extend_from_slice(&0u64.to_be_bytes());
        buf.extend_from_slice(&0i64.to_be_bytes());
        buf.extend_from_slice(&1_000_000u32.to_be_bytes());
        buf.extend_from_slice(b"short");
        assert!(matches!(decode(&buf), Deframed::Incomplete));
    }
}
