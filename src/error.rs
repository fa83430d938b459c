//! Error types for origin-gate.
//!
//! The matching engine itself never errs: classifiers and comparators
//! degrade to `false`/`None` on unparsable input. The only failures that
//! surface are the access-control rejection and configuration problems.

use thiserror::Error;

/// The error type for origin-gate operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Access-control rejection, carrying the first request-derived
    /// candidate (or an empty string if none were extracted). The message
    /// shape is fixed; nothing differentiates "blocked" from
    /// "not allow-listed".
    #[error("{candidate} Not Allowed Access")]
    NotAllowed {
        /// First candidate extracted from the rejected request.
        candidate: String,
    },

    /// Invalid gate configuration.
    #[error("Invalid gate configuration: {0}")]
    Config(String),
}

impl Error {
    /// Create an access-control rejection for a candidate.
    pub fn not_allowed<S: Into<String>>(candidate: S) -> Self {
        Error::NotAllowed {
            candidate: candidate.into(),
        }
    }

    /// Create a configuration error from a message.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }
}

/// Result type alias for origin-gate operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_message_interpolates_the_candidate() {
        let err = Error::not_allowed("https://evil.com");
        assert_eq!(err.to_string(), "https://evil.com Not Allowed Access");
    }

    #[test]
    fn rejection_message_tolerates_an_empty_candidate() {
        let err = Error::not_allowed("");
        assert_eq!(err.to_string(), " Not Allowed Access");
    }

    #[test]
    fn config_error_display() {
        let err = Error::config("both allow and block lists set");
        assert!(err.to_string().contains("both allow and block lists set"));
    }
}
