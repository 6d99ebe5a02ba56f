//! BigQuery standard SQL dialect implementation

use super::SqlDialect;
use crate::utils::sql::escape_backslash_literal;

/// BigQuery standard SQL dialect
pub struct BigqueryDialect;

impl SqlDialect for BigqueryDialect {
    fn name(&self) -> &'static str {
        "bigquery"
    }

    fn quote_literal(&self, value: &str) -> String {
        format!("'{}'", escape_backslash_literal(value))
    }

    fn quote_identifier(&self, ident: &str) -> String {
        let escaped = ident.replace('\\', "\\\\").replace('`', "\\`");
        format!("`{}`", escaped)
    }

    fn json_extract(&self, col: &str, key: &str) -> String {
        format!(
            "JSON_EXTRACT({}, {})",
            col,
            self.quote_literal(&format!("$.{}", key))
        )
    }

    fn json_extract_scalar(&self, col: &str, key: &str) -> String {
        format!(
            "JSON_EXTRACT_SCALAR({}, {})",
            col,
            self.quote_literal(&format!("$.{}", key))
        )
    }

    fn if_null(&self, expr: &str, fallback: &str) -> String {
        format!("IFNULL({}, {})", expr, fallback)
    }

    fn regex_contains(&self, expr: &str, regex_literal: &str) -> String {
        format!("REGEXP_CONTAINS({}, {})", expr, regex_literal)
    }

    fn millis_to_timestamp(&self, millis: i64) -> String {
        format!("TIMESTAMP_MILLIS({})", millis)
    }

    fn timestamp_to_millis(&self, col: &str) -> String {
        format!("UNIX_MILLIS({})", col)
    }
}
