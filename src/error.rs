//! Errors reported by registry operations.

use std::io;

/// Win32-compatible error codes, as reported through
/// [`get_last_error`](crate::compat::get_last_error).
pub mod code {
    /// The operation completed successfully.
    pub const ERROR_SUCCESS: u32 = 0;
    /// No object is registered under the requested name.
    pub const ERROR_FILE_NOT_FOUND: u32 = 2;
    /// The handle lacks the access right the operation needs.
    pub const ERROR_ACCESS_DENIED: u32 = 5;
    /// The handle is closed, stale or was issued by another registry.
    pub const ERROR_INVALID_HANDLE: u32 = 6;
    /// An argument is malformed.
    pub const ERROR_INVALID_PARAMETER: u32 = 87;
    /// The object name has an unsupported namespace prefix or separator.
    pub const ERROR_INVALID_NAME: u32 = 123;
    /// A live object already uses the name.
    pub const ERROR_ALREADY_EXISTS: u32 = 183;
    /// The object name exceeds the configured maximum length.
    pub const ERROR_FILENAME_EXCED_RANGE: u32 = 206;
}

/// Error of a registry operation.
///
/// A failed operation never changes the registry. Timing out is not an error,
/// see [`WaitStatus`](crate::WaitStatus).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// `open` against a name with no live object.
    #[error("no event named {0:?}")]
    NotFound(String),

    /// `create` against a live name under [`NameCollision::Fail`](crate::NameCollision::Fail).
    #[error("an event named {0:?} already exists")]
    AlreadyExists(String),

    /// Operation on a closed, stale or foreign handle.
    #[error("invalid handle")]
    InvalidHandle,

    /// The handle was opened without the right the operation requires.
    #[error("access denied")]
    AccessDenied,

    /// The name has an unknown namespace prefix or a stray separator.
    #[error("invalid event name {0:?}")]
    InvalidName(String),

    /// The name is longer than the registry accepts.
    #[error("event name is {len} characters long, the maximum is {max}")]
    NameTooLong {
        /// Length of the rejected name, in characters.
        len: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Malformed argument, such as opening an empty name.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
}

impl Error {
    /// The Win32 error code matching this error.
    pub fn code(&self) -> u32 {
        match self {
            Self::NotFound(_) => code::ERROR_FILE_NOT_FOUND,
            Self::AlreadyExists(_) => code::ERROR_ALREADY_EXISTS,
            Self::InvalidHandle => code::ERROR_INVALID_HANDLE,
            Self::AccessDenied => code::ERROR_ACCESS_DENIED,
            Self::InvalidName(_) => code::ERROR_INVALID_NAME,
            Self::NameTooLong { .. } => code::ERROR_FILENAME_EXCED_RANGE,
            Self::InvalidParameter(_) => code::ERROR_INVALID_PARAMETER,
        }
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        let kind = match &e {
            Error::NotFound(_) => io::ErrorKind::NotFound,
            Error::AlreadyExists(_) => io::ErrorKind::AlreadyExists,
            Error::AccessDenied => io::ErrorKind::PermissionDenied,
            Error::InvalidHandle
            | Error::InvalidName(_)
            | Error::NameTooLong { .. }
            | Error::InvalidParameter(_) => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, e)
    }
}

/// Result type of registry operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
