//! Relational backend: a single `timeseries` table keyed by (ticker, date).

use std::fs;
use std::path::{Path, PathBuf};

use ::duckdb::{params, Connection, ToSql};

use folio_core::{DateRange, Ticker, TradeDate};

use crate::duckdb::ConnectionManager;
use crate::error::StoreError;
use crate::models::{FieldKind, Observation, TimeseriesRow};
use crate::{ReturnStore, StoreKind};

/// Configuration for the relational backend.
#[derive(Debug, Clone)]
pub struct TableStoreConfig {
    /// Path to the `DuckDB` database file.
    pub db_path: PathBuf,
    /// Maximum number of idle connections to keep pooled.
    pub max_pool_size: usize,
}

impl TableStoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            max_pool_size: 4,
        }
    }
}

/// Store adapter over one `timeseries(ticker, date, close, return_1d)` table.
#[derive(Clone)]
pub struct TableStore {
    manager: ConnectionManager,
}

impl TableStore {
    pub fn open(config: TableStoreConfig) -> Result<Self, StoreError> {
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let manager = ConnectionManager::new(config.db_path, config.max_pool_size);
        let store = Self { manager };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<(), StoreError> {
        let connection = self.manager.acquire()?;
        connection.execute_batch(
            "CREATE TABLE IF NOT EXISTS timeseries (
                ticker VARCHAR NOT NULL,
                date DATE NOT NULL,
                close DOUBLE,
                return_1d DOUBLE,
                PRIMARY KEY (ticker, date)
            )",
        )?;
        Ok(())
    }

    pub fn db_path(&self) -> &Path {
        self.manager.db_path()
    }

    /// Ingest rows, replacing any existing (ticker, date) entries.
    pub fn ingest(&self, rows: &[TimeseriesRow]) -> Result<usize, StoreError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let connection = self.manager.acquire()?;
        connection.execute_batch("BEGIN TRANSACTION")?;
        let result = (|| -> Result<usize, StoreError> {
            let mut inserted = 0;
            for row in rows {
                let ticker = row.ticker.as_str();
                let date = row.date.format_iso();
                let values: [&dyn ToSql; 4] = [&ticker, &date, &row.close, &row.return_1d];
                inserted += connection.execute(
                    "INSERT OR REPLACE INTO timeseries (ticker, date, close, return_1d) \
                     VALUES (?, TRY_CAST(? AS DATE), ?, ?)",
                    values.as_slice(),
                )?;
            }
            Ok(inserted)
        })();

        finalize_transaction(&connection, result)
    }
}

impl ReturnStore for TableStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Table
    }

    fn observations(
        &self,
        ticker: &Ticker,
        range: &DateRange,
        field: FieldKind,
    ) -> Result<Vec<Observation>, StoreError> {
        let connection = self.manager.acquire()?;

        // The column name comes from the FieldKind enum, never from input.
        let sql = format!(
            "SELECT CAST(date AS VARCHAR), {column} FROM timeseries \
             WHERE ticker = ? AND date >= TRY_CAST(? AS DATE) AND date <= TRY_CAST(? AS DATE) \
             ORDER BY date ASC",
            column = field.as_column()
        );

        let mut statement = connection.prepare(&sql)?;
        let rows = statement.query_map(
            params![
                ticker.as_str(),
                range.start().format_iso(),
                range.end().format_iso()
            ],
            |row| {
                let date: String = row.get(0)?;
                let value: Option<f64> = row.get(1)?;
                Ok((date, value))
            },
        )?;

        let mut observations = Vec::new();
        for row in rows {
            let (raw_date, value) = row?;
            // NULL cells are absent observations, not zeroes.
            let Some(value) = value else {
                continue;
            };
            let date = TradeDate::parse(&raw_date).map_err(|_| StoreError::InvalidRecord {
                source_name: String::from("timeseries"),
                detail: format!("unreadable date '{raw_date}' for ticker {ticker}"),
            })?;
            observations.push(Observation { date, value });
        }

        if observations.is_empty() {
            return Err(StoreError::DataNotFound {
                ticker: ticker.clone(),
            });
        }

        tracing::debug!(
            ticker = %ticker,
            field = %field,
            rows = observations.len(),
            "fetched observations from table store"
        );
        Ok(observations)
    }
}

/// Commit on success, roll back on failure.
fn finalize_transaction<T>(
    connection: &Connection,
    result: Result<T, StoreError>,
) -> Result<T, StoreError> {
    match result {
        Ok(value) => {
            connection.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(error) => {
            let _ = connection.execute_batch("ROLLBACK");
            Err(error)
        }
    }
}
