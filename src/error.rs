// src/error.rs
// =============================================================================
// Error types for gitlab-cli.
//
// Every failure is fatal to the run. The variants are grouped the same way
// the entry point reports them:
// - configuration problems (nothing has touched the network yet) -> exit 2
// - transport problems (connect, DNS, timeout, broken body stream) -> exit 1
// - non-success HTTP statuses from GitLab -> exit 1
// - failures writing to the output sink -> exit 1
//
// Rust concepts:
// - thiserror: derives Display and std::error::Error from #[error(...)]
// - #[source] / #[from]: keep the underlying error for context chains
// - Type aliases: Result<T> saves writing the error type everywhere
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

/// The main error type for gitlab-cli
#[derive(Error, Debug)]
pub enum Error {
    // ------------------------------------------------------------------------
    // Configuration errors
    // ------------------------------------------------------------------------
    #[error("--{flag} must be specified")]
    MissingFlag { flag: &'static str },

    #[error("invalid --timeout value '{value}': {reason}")]
    InvalidTimeout { value: String, reason: String },

    #[error("invalid --url-prefix '{value}': {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("--url-prefix '{value}' cannot be used as a base URL")]
    UnusableBaseUrl { value: String },

    // ------------------------------------------------------------------------
    // Request errors
    // ------------------------------------------------------------------------
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // StatusCode's Display gives "404 Not Found"
    #[error("status={status} from {url}")]
    HttpStatus { url: String, status: StatusCode },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    // ------------------------------------------------------------------------
    // Output errors
    // ------------------------------------------------------------------------
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error), // #[from] lets `?` convert io::Error for us
}

impl Error {
    // True for errors raised while resolving configuration, before any request
    //
    // main.rs uses this to choose between exit code 2 and 1
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::MissingFlag { .. }
                | Error::InvalidTimeout { .. }
                | Error::InvalidUrl { .. }
                | Error::UnusableBaseUrl { .. }
        )
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why thiserror here and anyhow in main.rs?
//    - thiserror: callers can match on each variant (tests do this a lot)
//    - anyhow: fine at the very top where we only print the message
//
// 2. What does matches!() do?
//    - Returns true if the value fits the pattern, like a one-line match
//    - `{ .. }` ignores the fields of a variant
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_flag_message() {
        let err = Error::MissingFlag { flag: "url-prefix" };
        assert_eq!(err.to_string(), "--url-prefix must be specified");
        assert!(err.is_config());
    }

    #[test]
    fn test_status_message_carries_reason() {
        let err = Error::HttpStatus {
            url: "https://gitlab.example.com/api/v4/groups/g/projects".to_string(),
            status: StatusCode::NOT_FOUND,
        };
        assert!(err.to_string().starts_with("status=404 Not Found"));
        assert!(!err.is_config());
    }

    #[test]
    fn test_output_error_is_not_config() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"));
        assert!(!err.is_config());
    }
}
