//! The remote storage boundary used by `tabula`.
//!
//! `tabula` presents a remote, two-dimensional `(row key, column key) ->
//! value` store as a mutable table. This crate holds everything the table
//! layer needs to know about the store itself, and nothing more:
//!
//! - **Remote Store Abstraction** ([`remote_store`]): the [`RemoteStore`]
//!   trait with point retrieve/upsert/delete and filtered scans. The table
//!   layer is written against this trait only; the wire protocol and
//!   authentication of a concrete service live behind it.
//!
//! - **Entities and Filters** ([`entity`], [`filter`]): the store's native
//!   record, keyed by `(partition key, row key)`, and the equality predicates
//!   a scan can be narrowed with.
//!
//! - **Binary-Safe Encoding** ([`encoding`]): a reversible string encoding so
//!   that arbitrary Unicode identifiers, including characters the store's key
//!   syntax forbids, survive a round trip.
//!
//! - **In-Memory Backend** ([`remote_store::in_memory`]): a thread-safe
//!   reference implementation of [`RemoteStore`], suitable for tests and for
//!   local development.
//!
//! # Consistency Model
//!
//! A store implementation is expected to provide read-after-write consistency
//! for a single key and nothing across keys. Scans observe whatever the store
//! holds when the scan is issued; every scan is a fresh request.
//!
//! # Example
//!
//! ```
//! use tabula_storage::{
//!     RemoteStore, encoding,
//!     entity::Entity,
//!     filter::Filter,
//!     remote_store::in_memory::InMemoryStore,
//! };
//!
//! let store = InMemoryStore::new();
//! let entity = Entity::new(
//!     encoding::encode("alice"),
//!     encoding::encode("age"),
//!     encoding::encode("30"),
//! );
//!
//! assert!(store.upsert("people", entity).unwrap().is_none());
//!
//! let scanned = store
//!     .scan("people", &Filter::all())
//!     .unwrap()
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//!
//! assert_eq!(scanned.len(), 1);
//! ```

pub mod encoding;
pub mod entity;
pub mod error;
pub mod filter;
pub mod remote_store;


pub use error::StoreError;
pub use remote_store::{RemoteStore, Scan};
