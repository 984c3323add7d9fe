//! Destinations for assembled tables.

use std::io::Write;
use std::time::Duration;

use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder, Transaction};
use tracing::info;

use crate::config::DbCredentials;
use crate::error::SinkError;
use crate::table::{SqlType, Table};

/// Postgres accepts at most 65535 bind parameters per statement.
const MAX_BIND_PARAMS: usize = 65_000;

/// Receives the four tables of a run, in load order.
#[allow(async_fn_in_trait)]
pub trait Sink {
    async fn load(&mut self, tables: &[Table]) -> Result<(), SinkError>;
}

/// Appends to Postgres tables, creating them if needed. All tables of a run
/// are written in one transaction.
pub struct PgSink {
    pool: PgPool,
}

impl PgSink {
    pub async fn connect(creds: &DbCredentials) -> Result<Self, SinkError> {
        let options = PgConnectOptions::new()
            .host(&creds.host)
            .port(creds.port)
            .username(&creds.user)
            .password(&creds.password)
            .database(&creds.name);

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(SinkError::Connect)?;

        info!("Connected to PostgreSQL at {}:{}/{}", creds.host, creds.port, creds.name);
        Ok(Self { pool })
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

impl Sink for PgSink {
    async fn load(&mut self, tables: &[Table]) -> Result<(), SinkError> {
        let mut tx = self.pool.begin().await.map_err(SinkError::Connect)?;

        for table in tables {
            sqlx::query(&create_table_sql(table))
                .execute(&mut *tx)
                .await
                .map_err(|source| SinkError::CreateTable {
                    table: table.name,
                    source,
                })?;

            insert_rows(&mut tx, table).await?;
            info!("Loaded {} rows into {}", table.len(), table.name);
        }

        tx.commit().await.map_err(SinkError::Commit)
    }
}

async fn insert_rows(tx: &mut Transaction<'_, Postgres>, table: &Table) -> Result<(), SinkError> {
    if table.is_empty() {
        return Ok(());
    }

    let rows_per_statement = (MAX_BIND_PARAMS / table.columns.len()).max(1);
    for chunk in table.rows.chunks(rows_per_statement) {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(insert_prefix(table));
        qb.push_values(chunk, |mut b, row| {
            for (column, value) in table.columns.iter().zip(row) {
                match column.sql_type {
                    SqlType::BigInt => {
                        b.push_bind(value.as_i64());
                    }
                    SqlType::Double => {
                        b.push_bind(value.as_f64());
                    }
                    SqlType::Text => {
                        b.push_bind(value.as_str().map(str::to_owned));
                    }
                }
            }
        });

        qb.build()
            .execute(&mut **tx)
            .await
            .map_err(|source| SinkError::Insert {
                table: table.name,
                source,
            })?;
    }

    Ok(())
}

fn create_table_sql(table: &Table) -> String {
    let columns = table
        .columns
        .iter()
        .map(|c| format!("{} {}", c.name, c.sql_type.ddl()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE IF NOT EXISTS {} ({columns})", table.name)
}

fn insert_prefix(table: &Table) -> String {
    let columns = table.column_names().collect::<Vec<_>>().join(", ");
    format!("INSERT INTO {} ({columns}) ", table.name)
}

/// Writes each table's header and first rows instead of loading anything.
pub struct PrintSink<W> {
    out: W,
    preview_rows: usize,
}

impl<W: Write> PrintSink<W> {
    pub fn new(out: W, preview_rows: usize) -> Self {
        Self { out, preview_rows }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for PrintSink<W> {
    async fn load(&mut self, tables: &[Table]) -> Result<(), SinkError> {
        for table in tables {
            writeln!(self.out, "{} ({} rows)", table.name, table.len())?;
            writeln!(self.out, "{}", table.column_names().collect::<Vec<_>>().join("\t"))?;
            for row in table.rows.iter().take(self.preview_rows) {
                let cells = row.iter().map(render).collect::<Vec<_>>();
                writeln!(self.out, "{}", cells.join("\t"))?;
            }
            if table.len() > self.preview_rows {
                writeln!(self.out, "... {} more", table.len() - self.preview_rows)?;
            }
            writeln!(self.out)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
