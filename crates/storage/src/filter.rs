//! Scan predicates.

use crate::entity::Entity;

/// A conjunction of equality predicates narrowing a scan.
///
/// Each field left as `None` matches every entity. [`Filter::all`] therefore
/// selects the whole table, and each `with_*` call adds one more equality the
/// entity has to satisfy.
///
/// The predicates compare encoded strings, so callers pass the output of
/// [`encoding::encode`](crate::encoding::encode).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Filter {
    partition_key: Option<String>,
    row_key: Option<String>,
    value: Option<String>,
}

impl Filter {
    /// A filter that matches every entity.
    #[must_use]
    pub const fn all() -> Self {
        Self { partition_key: None, row_key: None, value: None }
    }

    /// Restricts the scan to a single partition.
    #[must_use]
    pub fn with_partition_key(
        mut self,
        partition_key: impl Into<String>,
    ) -> Self {
        self.partition_key = Some(partition_key.into());
        self
    }

    /// Restricts the scan to entities with the given row key.
    #[must_use]
    pub fn with_row_key(mut self, row_key: impl Into<String>) -> Self {
        self.row_key = Some(row_key.into());
        self
    }

    /// Restricts the scan to entities holding the given value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// The partition key predicate, if any.
    #[must_use]
    pub fn partition_key(&self) -> Option<&str> {
        self.partition_key.as_deref()
    }

    /// The row key predicate, if any.
    #[must_use]
    pub fn row_key(&self) -> Option<&str> { self.row_key.as_deref() }

    /// The value predicate, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> { self.value.as_deref() }

    /// Returns `true` if `entity` satisfies every predicate of this filter.
    #[must_use]
    pub fn matches(&self, entity: &Entity) -> bool {
        self.partition_key().is_none_or(|pk| pk == entity.partition_key())
            && self.row_key().is_none_or(|rk| rk == entity.row_key())
            && self.value().is_none_or(|v| v == entity.value())
    }
}
