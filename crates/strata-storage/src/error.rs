use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("partition not found: {topic}/{partition}")]
    PartitionNotFound { topic: String, partition: u32 },
}
