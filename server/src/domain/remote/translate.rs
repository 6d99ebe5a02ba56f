//! Matcher translator
//!
//! Turns one remote-read query (label matchers plus an inclusive time range)
//! into warehouse SQL. Matchers on `__name__` compare the `metricname`
//! column; every other matcher reads the label out of the `tags` JSON, with a
//! missing key read as the empty string. Equality compares the JSON-encoded
//! value, regexes run against the decoded string.

use std::sync::OnceLock;

use regex::Regex;

use super::error::RemoteStorageError;
use super::prompb::{LabelMatcher, METRIC_NAME_LABEL, MatchType, Query};
use crate::data::sql::SqlDialect;
use crate::utils::sql::anchor_regex;
use crate::utils::time::clamp_sql_millis;

/// JSON encoding of the empty string, returned for absent tags
const EMPTY_JSON_STRING: &str = "\"\"";

fn is_valid_label_name(name: &str) -> bool {
    static RE_LABEL_NAME: OnceLock<Regex> = OnceLock::new();
    RE_LABEL_NAME
        .get_or_init(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("Invalid regex"))
        .is_match(name)
}

/// Builds query text for one table in one dialect
pub struct QueryTranslator<'a> {
    dialect: &'a dyn SqlDialect,
    table: String,
}

impl<'a> QueryTranslator<'a> {
    /// `table` must already be quoted for the dialect
    pub fn new(dialect: &'a dyn SqlDialect, table: impl Into<String>) -> Self {
        Self {
            dialect,
            table: table.into(),
        }
    }

    /// Translate one query; any bad matcher fails the whole query
    pub fn translate(&self, query: &Query) -> Result<String, RemoteStorageError> {
        let d = self.dialect;
        let mut predicates = Vec::with_capacity(query.matchers.len() + 2);
        for matcher in &query.matchers {
            predicates.push(self.matcher_predicate(matcher)?);
        }
        predicates.push(format!(
            "timestamp >= {}",
            d.millis_to_timestamp(clamp_sql_millis(query.start_timestamp_ms))
        ));
        predicates.push(format!(
            "timestamp <= {}",
            d.millis_to_timestamp(clamp_sql_millis(query.end_timestamp_ms))
        ));

        Ok(format!(
            "SELECT metricname, tags, {} AS timestamp_ms, value FROM {} WHERE {} ORDER BY timestamp ASC",
            d.timestamp_to_millis("timestamp"),
            self.table,
            predicates.join(" AND ")
        ))
    }

    fn matcher_predicate(&self, matcher: &LabelMatcher) -> Result<String, RemoteStorageError> {
        let kind = MatchType::try_from(matcher.r#type)
            .map_err(|_| RemoteStorageError::UnsupportedMatcher(matcher.r#type))?;
        let d = self.dialect;

        if matcher.name == METRIC_NAME_LABEL {
            let column = "metricname";
            return Ok(match kind {
                MatchType::Eq => format!("{} = {}", column, d.quote_literal(&matcher.value)),
                MatchType::Neq => format!("{} != {}", column, d.quote_literal(&matcher.value)),
                MatchType::Re => d.regex_contains(column, &self.anchored(&matcher.value)?),
                MatchType::Nre => {
                    format!("NOT {}", d.regex_contains(column, &self.anchored(&matcher.value)?))
                }
            });
        }

        if !is_valid_label_name(&matcher.name) {
            return Err(RemoteStorageError::InvalidLabelName(matcher.name.clone()));
        }

        let name = &matcher.name;
        Ok(match kind {
            MatchType::Eq => {
                format!("{} = {}", self.encoded(name), self.json_literal(&matcher.value)?)
            }
            MatchType::Neq => {
                format!("{} != {}", self.encoded(name), self.json_literal(&matcher.value)?)
            }
            MatchType::Re => {
                d.regex_contains(&self.decoded(name), &self.anchored(&matcher.value)?)
            }
            MatchType::Nre => format!(
                "NOT {}",
                d.regex_contains(&self.decoded(name), &self.anchored(&matcher.value)?)
            ),
        })
    }

    /// JSON text of a tag, `""` when absent
    fn encoded(&self, name: &str) -> String {
        let d = self.dialect;
        d.if_null(&d.json_extract("tags", name), &d.quote_literal(EMPTY_JSON_STRING))
    }

    /// Decoded string value of a tag, empty when absent
    fn decoded(&self, name: &str) -> String {
        let d = self.dialect;
        d.if_null(&d.json_extract_scalar("tags", name), &d.quote_literal(""))
    }

    /// Regex literal matching the whole value
    fn anchored(&self, pattern: &str) -> Result<String, RemoteStorageError> {
        let anchored =
            anchor_regex(pattern).map_err(|source| RemoteStorageError::InvalidRegex {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(self.dialect.quote_literal(&anchored))
    }

    /// SQL literal holding the JSON encoding of `value`
    fn json_literal(&self, value: &str) -> Result<String, RemoteStorageError> {
        let encoded = serde_json::to_string(value).map_err(RemoteStorageError::TagEncoding)?;
        Ok(self.dialect.quote_literal(&encoded))
    }
}
