use std::error::Error as StdError;
use std::fmt::{Debug, Display, Formatter};

/// The result of talking to an external service.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Any error a service client can fail with.
pub trait LensterCustomError: StdError + Send + Sync + 'static {}

impl<E: StdError + Send + Sync + 'static> LensterCustomError for E {}

/// Boxed [`LensterCustomError`] that is itself an error, so `ServiceError`
/// can be transparent over it.
pub struct LensterCustomErrorWrapper(Box<dyn LensterCustomError>);

impl Debug for LensterCustomErrorWrapper {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for LensterCustomErrorWrapper {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl StdError for LensterCustomErrorWrapper {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

/// ServiceError contains errors returned when calling the GraphQL backend,
/// the storage gateways, the relay or the chain.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The service answered with one or more application level errors
    #[error("Service returned errors: {}", .0.join("; "))]
    Api(Vec<String>),
    /// The service answered, but not with anything we can use
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
    /// A value handed to or received from a service could not be converted
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    /// Any other error; does not implement `From` to prevent
    /// conflicting/absorbing other errors.
    #[error(transparent)]
    Other(LensterCustomErrorWrapper),
}

impl ServiceError {
    /// Create a service error from any other existing error
    pub fn from_other<E: LensterCustomError>(err: E) -> Self {
        Self::Other(LensterCustomErrorWrapper(Box::new(err)))
    }

    /// Creates a service error of the other error variant from a static string
    pub fn from_other_str(err: &'static str) -> Self {
        #[derive(Debug)]
        #[repr(transparent)]
        struct StringError(&'static str);
        impl Display for StringError {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.0)
            }
        }
        impl StdError for StringError {}

        Self::from_other(StringError(err))
    }
}

/// A form field failed validation before anything was sent anywhere.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Name shorter than the minimum
    #[error("Name should be at least {min} characters")]
    NameTooShort {
        /// Minimum number of characters
        min: usize,
    },
    /// Name longer than the maximum
    #[error("Name should be less than {} characters", .max + 1)]
    NameTooLong {
        /// Maximum number of characters
        max: usize,
    },
    /// Description longer than the maximum
    #[error("Description should not exceed {max} characters")]
    DescriptionTooLong {
        /// Maximum number of characters
        max: usize,
    },
}
