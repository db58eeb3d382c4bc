//! Shared atomic-save / lenient-load helpers for the JSON mirrors.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Serialize `value` and atomically replace the file at `path`.
///
/// Writes to a sibling temp file first, fsyncs it, then renames it over the
/// target. A crash at any point leaves either the old file or the new one,
/// never a partial write at the primary path.
pub async fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_vec_pretty(value)?;

    let tmp = path.with_extension("json.tmp");
    {
        let mut file = tokio::fs::File::create(&tmp).await?;
        tokio::io::AsyncWriteExt::write_all(&mut file, &data).await?;
        file.sync_all().await?;
    }
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

/// Load and deserialize the file at `path`. A missing file is empty state:
/// returns `None` rather than an error.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match tokio::fs::read(path).await {
        Ok(data) => Ok(Some(serde_json::from_slice(&data)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
