//! The remote store's native record.

/// A single record in a remote table store.
///
/// An entity is addressed by the pair `(partition_key, row_key)` and carries
/// one value. In table terms the partition key is the *row key* and the
/// store's row key is the *column key*; the naming here follows the store.
///
/// All three fields hold already-encoded strings (see
/// [`encoding`](crate::encoding)). The store treats them as opaque.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity {
    partition_key: String,
    row_key: String,
    value: String,
}

impl Entity {
    /// Creates a new entity from its encoded fields.
    pub fn new(
        partition_key: impl Into<String>,
        row_key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
            value: value.into(),
        }
    }

    /// The encoded partition key.
    #[must_use]
    pub fn partition_key(&self) -> &str { &self.partition_key }

    /// The encoded row key.
    #[must_use]
    pub fn row_key(&self) -> &str { &self.row_key }

    /// The encoded value.
    #[must_use]
    pub fn value(&self) -> &str { &self.value }

    /// Consumes the entity, returning `(partition_key, row_key, value)`.
    #[must_use]
    pub fn into_parts(self) -> (String, String, String) {
        (self.partition_key, self.row_key, self.value)
    }
}
