//! Configuration for [`RemoteTable`](crate::RemoteTable).

use bon::Builder;

/// Configuration options for a [`RemoteTable`](crate::RemoteTable).
///
/// # Example
///
/// ```
/// use tabula::Configuration;
///
/// let configuration = Configuration::builder()
///     .table_name("people")
///     .observe_scans(true)
///     .build();
///
/// assert_eq!(configuration.table_name, "people");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Builder)]
pub struct Configuration {
    /// The name of the remote table every request is addressed to.
    #[builder(into)]
    pub table_name: String,

    /// Whether scans are reported to the
    /// [`Observer`](crate::instrument::Observer) in addition to point
    /// operations.
    ///
    /// Scans are frequent and their duration says little about a single
    /// request, so they are not reported by default.
    #[builder(default = false)]
    pub observe_scans: bool,
}

impl Configuration {
    /// Returns the default configuration for the table named `table_name`.
    pub fn for_table(table_name: impl Into<String>) -> Self {
        Self::builder().table_name(table_name).build()
    }
}
