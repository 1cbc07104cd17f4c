use super::Error;

/// Error when a required argument to a public entry point is missing or
/// malformed.
///
/// This occurs when:
/// - A dependency bundle is built without one of its factories
/// - A query model is built without a main from clause or select clause
/// - A clause receives an expression of the wrong shape (a from clause over a
///   non-sequence)
///
/// Argument validation happens before any expression tree is walked.
#[derive(Debug)]
pub(super) struct InvalidArgument {
    message: Box<str>,
}

impl std::error::Error for InvalidArgument {}

impl core::fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid argument: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidArgument(InvalidArgument {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid argument error.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidArgument(_))
    }
}
