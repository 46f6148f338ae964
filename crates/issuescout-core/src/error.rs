use thiserror::Error;

/// All the ways a query can go wrong in IssueScout
///
/// Every variant is recoverable at the view boundary. [`Error::is_hard`]
/// decides whether the view should drop what it was showing.
#[derive(Error, Debug)]
pub enum Error {
    /// Bad user input, caught before any network call
    #[error("Invalid input: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Any non-2xx status other than 404
    #[error("Request failed ({status}): {status_text}")]
    FetchError { status: u16, status_text: String },

    /// No response at all
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Asked for a page past the end of the results
    #[error("Page {page} is beyond the available results ({per_page} per page)")]
    OutOfBounds { page: u32, per_page: u32 },

    #[error("Unexpected response: {0}")]
    DecodeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Hard errors invalidate whatever the view had loaded; soft ones
    /// (bad input, paging off the end) leave it in place.
    pub fn is_hard(&self) -> bool {
        !matches!(
            self,
            Error::ValidationError(_) | Error::OutOfBounds { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_errors_preserve_data() {
        assert!(!Error::ValidationError("x".into()).is_hard());
        assert!(!Error::OutOfBounds { page: 3, per_page: 30 }.is_hard());
    }

    #[test]
    fn test_hard_errors_clear_data() {
        assert!(Error::NotFound("o/r".into()).is_hard());
        assert!(Error::FetchError {
            status: 500,
            status_text: "Internal Server Error".into()
        }
        .is_hard());
        assert!(Error::NetworkError("connection refused".into()).is_hard());
        assert!(Error::DecodeError("eof".into()).is_hard());
    }

    #[test]
    fn test_messages_carry_status_text() {
        let err = Error::FetchError {
            status: 502,
            status_text: "Bad Gateway".into(),
        };
        assert_eq!(err.to_string(), "Request failed (502): Bad Gateway");
    }
}
