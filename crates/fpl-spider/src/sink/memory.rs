use super::Sink;
use crate::error::Result;
use crate::table::Table;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    tables: BTreeMap<String, Table>,
    writes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Number of `replace` calls received, including overwrites.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn into_tables(self) -> BTreeMap<String, Table> {
        self.tables
    }
}

impl Sink for MemorySink {
    async fn replace(&mut self, name: &str, table: &Table) -> Result<usize> {
        self.tables.insert(name.to_string(), table.clone());
        self.writes += 1;
        Ok(table.len())
    }
}
