use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrokerError>;

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("topic not found: {0}")]
    TopicNotFound(String),

    #[error("partition not found: {topic}/{partition}")]
    PartitionNotFound { topic: String, partition: u32 },

    #[error("topic already exists: {0}")]
    TopicAlreadyExists(String),

    #[error("storage error: {0}")]
    Storage(strata_storage::Error),

    #[error("metadata error: {0}")]
    Metadata(strata_metadata::MetadataError),
}

impl From<strata_storage::Error> for BrokerError {
    fn from(e: strata_storage::Error) -> Self {
        match e {
            strata_storage::Error::PartitionNotFound { topic, partition } => {
                Self::PartitionNotFound { topic, partition }
            }
            other => Self::Storage(other),
        }
    }
}

impl From<strata_metadata::MetadataError> for BrokerError {
    fn from(e: strata_metadata::MetadataError) -> Self {
        match e {
            strata_metadata::MetadataError::TopicAlreadyExists(name) => {
                Self::TopicAlreadyExists(name)
            }
            other => Self::Metadata(other),
        }
    }
}
