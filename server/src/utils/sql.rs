//! SQL escaping helpers
//!
//! Generated warehouse queries embed matcher values as text. Each delimiter
//! class gets its own pure function so the escaping rules can be tested in
//! isolation from query assembly.

/// Escape a value for a single-quoted literal in a dialect that uses
/// backslash escapes (BigQuery standard SQL).
///
/// # Example
///
/// ```
/// use prombq_server::utils::sql::escape_backslash_literal;
///
/// assert_eq!(escape_backslash_literal("it's"), "it\\'s");
/// ```
pub fn escape_backslash_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a value for a single-quoted literal in a dialect that doubles the
/// quote character (DuckDB, ANSI SQL). Backslashes are not special there.
pub fn escape_doubled_quote_literal(s: &str) -> String {
    s.replace('\'', "''")
}

/// Escape a double-quoted identifier (`"name"`) by doubling embedded quotes.
pub fn escape_identifier(s: &str) -> String {
    s.replace('"', "\"\"")
}

/// Wrap a matcher pattern as `^(?:pattern)$` so it must match the whole value.
///
/// The pattern has to parse on its own first; otherwise an unbalanced `)`
/// could close the group early and escape the anchors.
pub fn anchor_regex(pattern: &str) -> Result<String, regex::Error> {
    regex::Regex::new(pattern)?;
    Ok(format!("^(?:{})$", pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_backslash_literal_no_special_chars() {
        assert_eq!(escape_backslash_literal("first_metric"), "first_metric");
    }

    #[test]
    fn test_escape_backslash_literal_quote() {
        assert_eq!(escape_backslash_literal("a'b"), "a\\'b");
    }

    #[test]
    fn test_escape_backslash_literal_backslash_before_quote() {
        // A trailing backslash must not swallow the closing delimiter
        assert_eq!(escape_backslash_literal("x\\"), "x\\\\");
        assert_eq!(escape_backslash_literal("\\'"), "\\\\\\'");
    }

    #[test]
    fn test_escape_backslash_literal_control_chars() {
        assert_eq!(escape_backslash_literal("a\nb\tc"), "a\\nb\\tc");
    }

    #[test]
    fn test_escape_backslash_literal_injection_stays_inside_literal() {
        let escaped = escape_backslash_literal("x' OR '1'='1");
        assert_eq!(escaped, "x\\' OR \\'1\\'=\\'1");
        assert!(!escaped.replace("\\'", "").contains('\''));
    }

    #[test]
    fn test_escape_doubled_quote_literal() {
        assert_eq!(escape_doubled_quote_literal("it's"), "it''s");
        assert_eq!(escape_doubled_quote_literal("a\\b"), "a\\b");
        assert_eq!(escape_doubled_quote_literal(""), "");
    }

    #[test]
    fn test_escape_identifier() {
        assert_eq!(escape_identifier("samples"), "samples");
        assert_eq!(escape_identifier("we\"ird"), "we\"\"ird");
    }

    #[test]
    fn test_anchor_regex_wraps_pattern() {
        assert_eq!(anchor_regex("api|web.*").unwrap(), "^(?:api|web.*)$");
        assert_eq!(anchor_regex("").unwrap(), "^(?:)$");
    }

    #[test]
    fn test_anchor_regex_rejects_group_breakout() {
        assert!(anchor_regex("a)|(.*").is_err());
        assert!(anchor_regex("(unclosed").is_err());
    }

    #[test]
    fn test_anchor_regex_matches_whole_value_only() {
        let re = regex::Regex::new(&anchor_regex("a|b").unwrap()).unwrap();
        assert!(re.is_match("a"));
        assert!(re.is_match("b"));
        assert!(!re.is_match("ab"));
        assert!(!re.is_match("xa"));
    }
}
