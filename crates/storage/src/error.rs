//! Errors reported by a [`RemoteStore`](crate::RemoteStore).

/// A boxed error produced by a store's transport or service layer.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An error reported by a remote store call.
///
/// The table layer distinguishes exactly one condition, [`NotFound`], and
/// treats it as "absent". Everything else is surfaced to the caller
/// unchanged.
///
/// [`NotFound`]: StoreError::NotFound
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The addressed entity does not exist.
    #[error("the requested entity does not exist")]
    NotFound,

    /// The request failed for any other reason (transport, authentication,
    /// throttling, service error, ...).
    #[error("remote store request failed: {source}")]
    Remote {
        /// The underlying failure.
        source: BoxError,
    },
}

impl StoreError {
    /// Wraps an arbitrary failure as [`StoreError::Remote`].
    pub fn remote(source: impl Into<BoxError>) -> Self {
        Self::Remote { source: source.into() }
    }

    /// Returns `true` if this error reports a missing entity.
    #[must_use]
    pub const fn is_not_found(&self) -> bool { matches!(self, Self::NotFound) }
}
