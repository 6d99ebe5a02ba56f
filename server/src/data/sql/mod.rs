//! SQL abstraction layer for multi-warehouse support
//!
//! This module provides abstractions for generating SQL that works across
//! the supported warehouse backends (BigQuery, DuckDB).

mod bigquery_dialect;
mod dialect;
mod duckdb_dialect;

pub use bigquery_dialect::BigqueryDialect;
pub use dialect::SqlDialect;
pub use duckdb_dialect::DuckdbDialect;
