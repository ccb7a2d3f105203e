use super::Sink;
use crate::error::Result;
use crate::table::Table;
use std::path::PathBuf;
use tracing::debug;

/// Writes each table to `<dir>/<name>.jsonl`, one row per line, overwriting the file.
#[derive(Clone, Debug)]
pub struct JsonDirSink {
    dir: PathBuf,
}

impl JsonDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.jsonl"))
    }
}

impl Sink for JsonDirSink {
    async fn replace(&mut self, name: &str, table: &Table) -> Result<usize> {
        let time = std::time::Instant::now();
        let path = self.path(name);
        crate::fs::write_jsonl(&path, &table.rows).await?;
        debug!(
            "wrote {} rows to {}, {}",
            table.len(),
            path.display(),
            crate::time_elapsed(time)
        );
        Ok(table.len())
    }
}
