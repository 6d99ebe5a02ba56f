//! DuckDB SQL dialect implementation

use super::SqlDialect;
use crate::utils::sql::{escape_doubled_quote_literal, escape_identifier};

/// DuckDB SQL dialect
pub struct DuckdbDialect;

impl SqlDialect for DuckdbDialect {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn quote_literal(&self, value: &str) -> String {
        format!("'{}'", escape_doubled_quote_literal(value))
    }

    fn quote_identifier(&self, ident: &str) -> String {
        format!("\"{}\"", escape_identifier(ident))
    }

    fn json_extract(&self, col: &str, key: &str) -> String {
        format!(
            "CAST(json_extract({}, {}) AS VARCHAR)",
            col,
            self.quote_literal(&format!("$.{}", key))
        )
    }

    fn json_extract_scalar(&self, col: &str, key: &str) -> String {
        format!(
            "json_extract_string({}, {})",
            col,
            self.quote_literal(&format!("$.{}", key))
        )
    }

    fn if_null(&self, expr: &str, fallback: &str) -> String {
        format!("COALESCE({}, {})", expr, fallback)
    }

    fn regex_contains(&self, expr: &str, regex_literal: &str) -> String {
        format!("regexp_matches({}, {})", expr, regex_literal)
    }

    fn millis_to_timestamp(&self, millis: i64) -> String {
        format!("epoch_ms({})", millis)
    }

    fn timestamp_to_millis(&self, col: &str) -> String {
        format!("epoch_ms({})", col)
    }
}
