//! Remote storage engine errors

use thiserror::Error;

use crate::data::DataError;

#[derive(Error, Debug)]
pub enum RemoteStorageError {
    /// Matcher type outside equal / not-equal / regex / negated regex
    #[error("unsupported matcher type {0}")]
    UnsupportedMatcher(i32),

    /// Label name that cannot be addressed inside the tags JSON
    #[error("invalid label name {0:?}")]
    InvalidLabelName(String),

    /// Regex matcher value that does not parse on its own
    #[error("invalid regex {pattern:?}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Stored tags that are not a JSON object of strings
    #[error("malformed tags {tags:?}: {source}")]
    MalformedTags {
        tags: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode tags: {0}")]
    TagEncoding(#[source] serde_json::Error),

    #[error(transparent)]
    Data(#[from] DataError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_matcher_display() {
        assert_eq!(
            RemoteStorageError::UnsupportedMatcher(9).to_string(),
            "unsupported matcher type 9"
        );
    }

    #[test]
    fn test_data_error_is_transparent() {
        let err: RemoteStorageError = DataError::Config("boom".to_string()).into();
        assert_eq!(err.to_string(), "Configuration error: boom");
    }
}
