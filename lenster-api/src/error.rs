use lenster_core::ServiceError;
use reqwest::StatusCode;

/// Errors from the HTTP clients
#[derive(Debug, thiserror::Error)]
pub enum LensApiError {
    /// Transport or body decoding failure
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// Non-success status without a usable body
    #[error("{service} answered with HTTP {status}")]
    Status {
        /// Which service answered
        service: &'static str,
        /// The status code
        status: StatusCode,
    },
}

impl From<LensApiError> for ServiceError {
    fn from(value: LensApiError) -> Self {
        ServiceError::from_other(value)
    }
}
