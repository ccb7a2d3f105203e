use crate::error::{Error, Result};
use serde::Serialize;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::trace;

/// Reads a `.json` file from `path`.
pub async fn read_json<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    trace!("reading file path: {}", path.display());
    let file = tokio::fs::read(path).await?;
    trace!("file read; deserializing bytes ...");
    let data: T = serde_json::from_slice(&file).map_err(Error::Json)?;
    Ok(data)
}

/// Writes `rows` to `path` as JSON lines, replacing any existing file.
///
/// The rows go to a sibling `.tmp` file first, which is then renamed over `path`, so a reader
/// never sees half a table. Parent directories are created as necessary.
pub async fn write_jsonl<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }

    let mut buffer = Vec::new();
    for row in rows {
        serde_json::to_writer(&mut buffer, row).map_err(Error::Json)?;
        buffer.push(b'\n');
    }

    let tmp = path.with_extension("jsonl.tmp");
    trace!("writing {} bytes to {}", buffer.len(), tmp.display());
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(&buffer).await?;
    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
