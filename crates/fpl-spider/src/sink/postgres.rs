use super::Sink;
use crate::error::Result;
use crate::sql::{self, ColumnType};
use crate::table::{Table, NULL};
use deadpool_postgres::Pool;
use tokio_postgres::binary_copy::BinaryCopyInWriter;
use tokio_postgres::types::{ToSql, Type};
use tracing::{debug, error, trace, warn};

/// Default schema for loaded tables.
pub const DEFAULT_SCHEMA: &str = "fpl";

/// Writes each table into `<schema>.<name>`.
///
/// One transaction per table: drop, recreate with column types inferred from the rows, then
/// binary `COPY`. A failure rolls back that table only. Rows of a table without columns cannot be
/// copied, so such a table is created empty and reported as zero rows.
#[derive(Clone)]
pub struct PgSink {
    pool: Pool,
    schema: String,
}

impl PgSink {
    pub fn new(pool: Pool, schema: impl Into<String>) -> Self {
        Self {
            pool,
            schema: schema.into(),
        }
    }

}

impl Sink for PgSink {
    async fn replace(&mut self, name: &str, table: &Table) -> Result<usize> {
        let time = std::time::Instant::now();

        let columns: Vec<(&str, ColumnType)> = table
            .columns
            .iter()
            .map(|column| (column.as_str(), ColumnType::infer(table.column(column))))
            .collect();

        // wait for pg client
        let pg_client = &mut self.pool.get().await?;
        let transaction = pg_client.transaction().await?;

        trace!("replacing {}.{name}", self.schema);
        transaction
            .batch_execute(&format!(
                "{}; {}; {}",
                sql::create_schema(&self.schema),
                sql::drop_table(&self.schema, name),
                sql::create_table(&self.schema, name, &columns),
            ))
            .await
            .map_err(|err| {
                error!("failed to recreate {}.{name}, error({err})", self.schema);
                err
            })?;

        let copied = if columns.is_empty() {
            if !table.is_empty() {
                warn!(
                    "{}.{name} has no columns, {} rows not copied",
                    self.schema,
                    table.len()
                );
            }
            0
        } else {
            let names: Vec<&str> = columns.iter().map(|(column, _)| *column).collect();
            let types: Vec<Type> = columns.iter().map(|(_, ty)| ty.pg_type()).collect();

            let stmt = sql::copy_in(&self.schema, name, &names);
            let sink = transaction.copy_in(stmt.as_str()).await?;
            let writer = BinaryCopyInWriter::new(sink, &types);
            futures::pin_mut!(writer);

            for row in &table.rows {
                let cells: Vec<Box<dyn ToSql + Sync + Send>> = columns
                    .iter()
                    .map(|(column, ty)| ty.cell(row.get(*column).unwrap_or(&NULL)))
                    .collect();
                let cells: Vec<&(dyn ToSql + Sync)> = cells
                    .iter()
                    .map(|cell| cell.as_ref() as &(dyn ToSql + Sync))
                    .collect();
                writer.as_mut().write(&cells).await?;
            }
            writer.finish().await? as usize
        };

        // commit, or drop the transaction and roll back
        transaction.commit().await.map_err(|err| {
            error!("failed to commit {}.{name}, error({err})", self.schema);
            err
        })?;

        debug!(
            "replaced {}.{name} with {copied} rows, {}",
            self.schema,
            crate::time_elapsed(time)
        );

        Ok(copied)
    }
}
