use crate::error::Result;
use crate::table::Table;
use std::future::Future;

/// Postgres destination over a [`deadpool_postgres`] pool.
pub mod postgres;

/// One `.jsonl` file per table.
pub mod json;

/// Tables kept in memory.
pub mod memory;

pub use json::JsonDirSink;
pub use memory::MemorySink;
pub use postgres::PgSink;

/// A destination accepting named tables.
///
/// Every write is a full replace: whatever was stored under `name` before is gone afterwards.
/// Tables are written independently of each other.
pub trait Sink: Send {
    /// Replaces `name` with `table` and returns the number of rows stored.
    fn replace(&mut self, name: &str, table: &Table) -> impl Future<Output = Result<usize>> + Send;
}
