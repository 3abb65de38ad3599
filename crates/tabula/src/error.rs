//! Error types for table operations.

use std::fmt::Display;

use tabula_storage::{StoreError, encoding::DecodeError};

/// An error returned by a table or view operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote store reported a failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A field read from the store was not produced by the key encoding.
    #[error(transparent)]
    Encoding(#[from] DecodeError),

    /// A value could not be converted between its visible and backing
    /// representations.
    #[error("cannot convert a value of type `{type_name}`: {reason}")]
    Conversion {
        /// The type that was being produced or consumed.
        type_name: &'static str,

        /// What went wrong.
        reason: String,
    },

    /// The view does not support the requested operation.
    #[error("operation `{operation}` is not supported by this view")]
    Unsupported {
        /// The name of the rejected operation.
        operation: &'static str,
    },
}

impl Error {
    /// Creates a [`Error::Conversion`] for type `T`.
    pub fn conversion<T: ?Sized>(reason: impl Display) -> Self {
        Self::Conversion {
            type_name: std::any::type_name::<T>(),
            reason: reason.to_string(),
        }
    }

    /// Creates a [`Error::Unsupported`] for the named operation.
    #[must_use]
    pub const fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation }
    }

    /// Returns `true` if this is a [`Error::Conversion`].
    #[must_use]
    pub const fn is_conversion(&self) -> bool {
        matches!(self, Self::Conversion { .. })
    }

    /// Returns `true` if this is a [`Error::Unsupported`].
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

/// A specialized [`Result`](std::result::Result) for table operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Turns a failed conversion of a query argument into "absent".
///
/// Anything that cannot be represented in the backing table cannot be stored
/// there either.
pub(crate) fn absent_on_conversion<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(error) if error.is_conversion() => Ok(None),
        Err(error) => Err(error),
    }
}
