use serde::{Deserialize, Serialize};

/// Persisted descriptor for one topic.
///
/// The partition count is part of the durable record: a broker restart must
/// reopen exactly the partitions that were created, not rediscover them from
/// whatever directories happen to exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicMeta {
    pub name: String,
    pub num_partitions: u32,
}

impl TopicMeta {
    pub fn new(name: impl Into<String>, num_partitions: u32) -> Self {
        Self {
            name: name.into(),
            num_partitions,
        }
    }
}
