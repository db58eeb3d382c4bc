//! Key → partition placement.
//!
//! Keyed events hash with FNV-1a/32 so the same `(topic, key)` always lands
//! on the same partition for a fixed partition count; clients that need
//! ordering partition by key and rely on exactly this function. Events
//! without a key take the topic's round-robin cursor instead.

use strata_storage::Topic;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a over `data`.
pub fn fnv1a_32(data: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in data {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Pick the partition for an event published to `topic` with `key`.
pub fn choose_partition(topic: &Topic, key: &str) -> u32 {
    if key.is_empty() {
        topic.next_round_robin()
    } else {
        fnv1a_32(key.as_bytes()) % topic.num_partitions()
    }
}
