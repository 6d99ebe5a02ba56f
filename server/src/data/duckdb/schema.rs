//! DuckDB schema definitions
//!
//! Append-only sample storage on the fixed remote-storage layout:
//! `metricname`, `tags` (JSON text), `value`, `timestamp`.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Schema version tracking table
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at BIGINT NOT NULL,
    description VARCHAR
);
"#;

/// Samples table and its lookup index for the given (quoted) table name
pub fn samples_schema(table: &str, index: &str) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS {table} (
    metricname  VARCHAR NOT NULL,   -- Value of the __name__ label
    tags        VARCHAR NOT NULL,   -- Remaining labels as a JSON object
    value       DOUBLE NOT NULL,    -- Finite sample value
    timestamp   TIMESTAMP NOT NULL  -- Sample time (millisecond precision)
);

CREATE INDEX IF NOT EXISTS {index} ON {table}(metricname, timestamp);
"#
    )
}
