//! SQL dialect trait for multi-warehouse support
//!
//! This trait defines the interface for generating warehouse-specific SQL syntax.

/// SQL dialect trait for generating warehouse-specific SQL
///
/// The warehouses differ in:
/// - String literal escaping (backslash vs doubled quotes)
/// - JSON extraction and null fallback functions
/// - Regex containment functions
/// - Epoch millisecond conversions
pub trait SqlDialect: Send + Sync {
    /// Get the dialect name
    fn name(&self) -> &'static str;

    /// Render a string as a complete single-quoted literal
    fn quote_literal(&self, value: &str) -> String;

    /// Render an identifier (or dotted table path) in quoted form
    fn quote_identifier(&self, ident: &str) -> String;

    /// Extract the JSON-encoded value of `key` from a JSON text column
    ///
    /// The result is the JSON text of the value (a string comes back quoted),
    /// or NULL when the key is absent. `key` must already be validated.
    ///
    /// - BigQuery: `JSON_EXTRACT(col, '$.key')`
    /// - DuckDB: `CAST(json_extract(col, '$.key') AS VARCHAR)`
    fn json_extract(&self, col: &str, key: &str) -> String;

    /// Extract the decoded string value of `key` from a JSON text column
    ///
    /// Escapes are resolved, so `"a\tb"` comes back as `a<TAB>b`. NULL when
    /// the key is absent.
    ///
    /// - BigQuery: `JSON_EXTRACT_SCALAR(col, '$.key')`
    /// - DuckDB: `json_extract_string(col, '$.key')`
    fn json_extract_scalar(&self, col: &str, key: &str) -> String;

    /// Replace NULL with a fallback expression
    ///
    /// - BigQuery: `IFNULL(expr, fallback)`
    /// - DuckDB: `COALESCE(expr, fallback)`
    fn if_null(&self, expr: &str, fallback: &str) -> String;

    /// Test whether `expr` contains a match for a regex literal
    ///
    /// - BigQuery: `REGEXP_CONTAINS(expr, re)`
    /// - DuckDB: `regexp_matches(expr, re)`
    fn regex_contains(&self, expr: &str, regex_literal: &str) -> String;

    /// Convert epoch milliseconds to a timestamp expression
    ///
    /// - BigQuery: `TIMESTAMP_MILLIS(ms)`
    /// - DuckDB: `epoch_ms(ms)`
    fn millis_to_timestamp(&self, millis: i64) -> String;

    /// Convert a timestamp column to epoch milliseconds
    ///
    /// - BigQuery: `UNIX_MILLIS(col)`
    /// - DuckDB: `epoch_ms(col)`
    fn timestamp_to_millis(&self, col: &str) -> String;
}
