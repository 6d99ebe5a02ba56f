//! DuckDB sample repository using Appender API
//!
//! Batch writes of stored records and row decoding for generated queries.

use duckdb::Connection;
use duckdb::params;

use crate::data::duckdb::{DuckdbError, in_transaction};
use crate::data::types::StoredRecord;
use crate::utils::time::millis_to_sql_timestamp;

pub fn insert_batch(
    conn: &Connection,
    table: &str,
    records: &[StoredRecord],
) -> Result<(), DuckdbError> {
    if records.is_empty() {
        return Ok(());
    }

    in_transaction(conn, |conn| {
        let mut appender = conn.appender(table)?;
        for r in records {
            let ts = millis_to_sql_timestamp(r.timestamp_ms)
                .ok_or(DuckdbError::InvalidTimestamp(r.timestamp_ms))?;
            // Column order must match schema.rs CREATE TABLE definition
            appender.append_row(params![r.metric_name.as_str(), r.tags.as_str(), r.value, ts])?;
        }
        appender.flush()?;
        Ok(())
    })
}

/// Run a generated query selecting `(metricname, tags, timestamp_ms, value)`
pub fn query(conn: &Connection, sql: &str) -> Result<Vec<StoredRecord>, DuckdbError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(StoredRecord {
                metric_name: row.get(0)?,
                tags: row.get(1)?,
                timestamp_ms: row.get(2)?,
                value: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
