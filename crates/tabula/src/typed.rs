//! Typed tables over string tables.
//!
//! A [`Marshaller`] converts one type to and from the strings a
//! [`RemoteTable`](crate::RemoteTable) stores. Three marshallers, one each
//! for row keys, column keys and values, turn a string table into a
//! [`TypedTable`].
//!
//! ```
//! use tabula::{
//!     Configuration, RemoteTable, Table, TypedTable,
//!     storage::remote_store::in_memory::InMemoryStore,
//!     typed::{JsonMarshaller, ParseMarshaller, StringMarshaller},
//! };
//!
//! #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
//! struct Reading {
//!     celsius: f32,
//! }
//!
//! let readings = TypedTable::from_marshallers(
//!     RemoteTable::new(
//!         InMemoryStore::new(),
//!         Configuration::for_table("readings"),
//!     ),
//!     StringMarshaller,
//!     ParseMarshaller::<u32>::new(),
//!     JsonMarshaller::<Reading>::new(),
//! );
//!
//! readings
//!     .insert("kitchen".to_owned(), 1, Reading { celsius: 21.5 })
//!     .unwrap();
//!
//! assert_eq!(
//!     readings.get(&"kitchen".to_owned(), &1).unwrap(),
//!     Some(Reading { celsius: 21.5 })
//! );
//!
//! // a probe of the wrong type is answered without asking the store
//! assert!(!readings.contains_any(&"kitchen".to_owned(), &1i64).unwrap());
//! ```

use std::{
    any::{Any, TypeId},
    fmt::Display,
    marker::PhantomData,
    str::FromStr,
    sync::Arc,
};

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::{Error, Result, absent_on_conversion},
    table::Table,
    transforming::{Bijection, TransformingTable},
};

/// Converts values of type `T` to and from strings.
///
/// `unmarshal(marshal(v))` must equal `v`.
pub trait Marshaller<T: 'static>: Send + Sync {
    /// Converts `value` to its string form.
    fn marshal(&self, value: &T) -> Result<String>;

    /// Parses a string produced by [`Marshaller::marshal`].
    fn unmarshal(&self, marshalled: &str) -> Result<T>;

    /// Returns the type tag of `T`.
    ///
    /// Values of any other type are rejected before conversion is attempted.
    fn marshalled_type(&self) -> TypeId { TypeId::of::<T>() }
}

/// Stores strings as themselves.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StringMarshaller;

impl Marshaller<String> for StringMarshaller {
    fn marshal(&self, value: &String) -> Result<String> { Ok(value.clone()) }

    fn unmarshal(&self, marshalled: &str) -> Result<String> {
        Ok(marshalled.to_owned())
    }
}

/// Stores a value through its [`Display`] and [`FromStr`] implementations.
///
/// Suitable for numbers, booleans, characters and other types whose textual
/// form round-trips.
pub struct ParseMarshaller<T>(PhantomData<fn() -> T>);

impl<T> ParseMarshaller<T> {
    /// Creates the marshaller.
    #[must_use]
    pub const fn new() -> Self { Self(PhantomData) }
}

impl<T> Default for ParseMarshaller<T> {
    fn default() -> Self { Self::new() }
}

impl<T> Clone for ParseMarshaller<T> {
    fn clone(&self) -> Self { *self }
}

impl<T> Copy for ParseMarshaller<T> {}

impl<T> std::fmt::Debug for ParseMarshaller<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ParseMarshaller<{}>", std::any::type_name::<T>())
    }
}

impl<T> Marshaller<T> for ParseMarshaller<T>
where
    T: Display + FromStr + 'static,
    T::Err: Display,
{
    fn marshal(&self, value: &T) -> Result<String> { Ok(value.to_string()) }

    fn unmarshal(&self, marshalled: &str) -> Result<T> {
        marshalled.parse().map_err(Error::conversion::<T>)
    }
}

/// Stores a value as JSON.
pub struct JsonMarshaller<T>(PhantomData<fn() -> T>);

impl<T> JsonMarshaller<T> {
    /// Creates the marshaller.
    #[must_use]
    pub const fn new() -> Self { Self(PhantomData) }
}

impl<T> Default for JsonMarshaller<T> {
    fn default() -> Self { Self::new() }
}

impl<T> Clone for JsonMarshaller<T> {
    fn clone(&self) -> Self { *self }
}

impl<T> Copy for JsonMarshaller<T> {}

impl<T> std::fmt::Debug for JsonMarshaller<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JsonMarshaller<{}>", std::any::type_name::<T>())
    }
}

impl<T> Marshaller<T> for JsonMarshaller<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    fn marshal(&self, value: &T) -> Result<String> {
        serde_json::to_string(value).map_err(Error::conversion::<T>)
    }

    fn unmarshal(&self, marshalled: &str) -> Result<T> {
        serde_json::from_str(marshalled).map_err(Error::conversion::<T>)
    }
}

/// A [`Bijection`] between `T` and strings, driven by a [`Marshaller`].
pub struct MarshallerBijection<T: 'static> {
    marshaller: Arc<dyn Marshaller<T>>,
}

impl<T: 'static> MarshallerBijection<T> {
    /// Wraps `marshaller`.
    pub fn new(marshaller: impl Marshaller<T> + 'static) -> Self {
        Self { marshaller: Arc::new(marshaller) }
    }
}

impl<T: 'static> Clone for MarshallerBijection<T> {
    fn clone(&self) -> Self { Self { marshaller: self.marshaller.clone() } }
}

impl<T: 'static> std::fmt::Debug for MarshallerBijection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MarshallerBijection<{}>", std::any::type_name::<T>())
    }
}

impl<T: 'static> Bijection for MarshallerBijection<T> {
    type Visible = T;
    type Backing = String;

    fn to(&self, visible: &T) -> Result<String> {
        self.marshaller.marshal(visible)
    }

    fn from(&self, backing: &String) -> Result<T> {
        self.marshaller.unmarshal(backing)
    }

    fn to_any(&self, candidate: &dyn Any) -> Result<Option<String>>
    where
        Self::Visible: 'static,
    {
        if (*candidate).type_id() != self.marshaller.marshalled_type() {
            return Ok(None);
        }

        match candidate.downcast_ref::<T>() {
            Some(visible) => absent_on_conversion(self.to(visible)),
            None => Ok(None),
        }
    }
}

/// A table of `R`, `C` and `V` stored in a string table `T`.
pub type TypedTable<T, R, C, V> = TransformingTable<
    T,
    MarshallerBijection<R>,
    MarshallerBijection<C>,
    MarshallerBijection<V>,
>;

impl<T, R, C, V> TypedTable<T, R, C, V>
where
    T: Table<RowKey = String, ColumnKey = String, Value = String>,
    R: 'static,
    C: 'static,
    V: 'static,
{
    /// Wraps `backing`, marshalling row keys, column keys and values with
    /// the given marshallers.
    pub fn from_marshallers(
        backing: T,
        rows: impl Marshaller<R> + 'static,
        columns: impl Marshaller<C> + 'static,
        values: impl Marshaller<V> + 'static,
    ) -> Self {
        Self::new(
            backing,
            MarshallerBijection::new(rows),
            MarshallerBijection::new(columns),
            MarshallerBijection::new(values),
        )
    }
}

#[cfg(test)]
mod test;
