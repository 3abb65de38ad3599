//! # Tabula - Typed Tables over a Remote Key-Value Store
//!
//! Tabula presents a remote, two-dimensional `(row key, column key) -> value`
//! store as a mutable table with live collection views: cell sets, key sets,
//! single rows and columns, and nested row/column maps.
//!
//! ## Key Features
//!
//! - **Remote Truth**: nothing is cached. Every read is a point request or a
//!   fresh scan against the store, and every write is a point request.
//! - **Lazy Views**: asking for a view (a row, the cell set, ...) performs no
//!   remote call; the call happens when the view is iterated, measured or
//!   queried, and happens again the next time.
//! - **Typed Wrapper**: a [`TypedTable`] converts arbitrary key and value
//!   types to and from the store's strings through [`Marshaller`]s.
//! - **Composable Adapters**: the [`transforming`] module lifts any
//!   [`Bijection`] over collections, sets, maps and tables.
//!
//! ## Layering
//!
//! 1. [`storage`] (the `tabula_storage` crate) defines the
//!    [`RemoteStore`](storage::RemoteStore) boundary and the binary-safe key
//!    encoding.
//! 2. [`remote`] implements the string-typed [`Table`] facade,
//!    [`RemoteTable`], together with the lazy views it hands out.
//! 3. [`transforming`] and [`typed`] wrap any table in typed clothing.
//!
//! ## Consistency
//!
//! Tabula adds no locking and no atomicity of its own. Multi-call operations
//! such as [`Table::clear`] or [`Table::insert_all`] are sequences of point
//! calls; a failure partway leaves whatever the completed calls produced.
//! Scans may interleave arbitrarily with concurrent writers.
//!
//! ## Errors
//!
//! Every operation returns [`Result`]. Asking about a value that cannot be
//! converted into the backing representation (a foreign type, an
//! unrepresentable value) answers "absent" rather than failing; remote
//! failures and unsupported view operations are reported as [`Error`].
//!
//! ## Example
//!
//! ```
//! use tabula::{
//!     Configuration, RemoteTable, Table, TypedTable,
//!     storage::remote_store::in_memory::InMemoryStore,
//!     typed::{ParseMarshaller, StringMarshaller},
//! };
//!
//! let table = RemoteTable::new(
//!     InMemoryStore::new(),
//!     Configuration::builder().table_name("people").build(),
//! );
//!
//! let ages = TypedTable::from_marshallers(
//!     table.clone(),
//!     StringMarshaller,
//!     StringMarshaller,
//!     ParseMarshaller::<u32>::new(),
//! );
//!
//! ages.insert("alice".to_owned(), "age".to_owned(), 30).unwrap();
//!
//! assert_eq!(
//!     ages.get(&"alice".to_owned(), &"age".to_owned()).unwrap(),
//!     Some(30)
//! );
//! assert_eq!(
//!     table.get(&"alice".to_owned(), &"age".to_owned()).unwrap(),
//!     Some("30".to_owned())
//! );
//! ```

pub mod collection;
pub mod config;
pub mod error;
pub mod instrument;
pub mod remote;
pub mod table;
pub mod transforming;
pub mod typed;

pub use collection::{Collection, Map, MapEntry, Set};
pub use config::Configuration;
pub use error::{Error, Result};
pub use remote::RemoteTable;
pub use table::{Cell, Table};
pub use tabula_storage as storage;
pub use transforming::Bijection;
pub use typed::{Marshaller, TypedTable};
