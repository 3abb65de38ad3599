//! Bijective adapters over collections, sets, maps and tables.
//!
//! A [`Bijection`] is a pair of conversions between a *visible* type that
//! callers work with and a *backing* type the wrapped container stores. The
//! adapters in this module present a container of backing values as a
//! container of visible values: reads convert backing to visible, writes
//! convert visible to backing, and no state is kept beyond the wrapped
//! container itself.
//!
//! # Probing with Foreign Values
//!
//! Every adapter offers `*_any` probes (for example
//! [`TransformingCollection::contains_any`]) that accept `&dyn Any`. A value
//! of a type the bijection cannot convert answers "absent" without touching
//! the wrapped container.
//!
//! # Conversion Failures
//!
//! A conversion failure on a query argument (`contains`, `get`, `remove`)
//! answers "absent". A conversion failure on a write, or on a value read back
//! from the wrapped container, is reported as
//! [`Error::Conversion`](crate::Error::Conversion).

use std::{any::Any, marker::PhantomData, sync::Arc};

use crate::error::{Result, absent_on_conversion};

mod collection;
mod map;
mod set;
mod table;

pub use collection::TransformingCollection;
pub use map::{EntryBijection, TransformingEntry, TransformingMap};
pub use set::TransformingSet;
pub use table::{CellBijection, TransformingTable};

/// A pair of mutually inverse conversions.
///
/// Implementations must satisfy `from(to(v)) == v` for every visible value
/// `v` that `to` accepts, and `to(from(b)) == b` for every backing value `b`
/// that `from` accepts.
pub trait Bijection: Send + Sync {
    /// The type callers see.
    type Visible;

    /// The type the wrapped container stores.
    type Backing;

    /// Converts a visible value to its backing representation.
    fn to(&self, visible: &Self::Visible) -> Result<Self::Backing>;

    /// Converts a backing value back to its visible representation.
    fn from(&self, backing: &Self::Backing) -> Result<Self::Visible>;

    /// Converts a value of unknown type.
    ///
    /// Returns `Ok(None)` if `candidate` is not a [`Self::Visible`] or cannot
    /// be converted.
    fn to_any(&self, candidate: &dyn Any) -> Result<Option<Self::Backing>>
    where
        Self::Visible: 'static,
    {
        match candidate.downcast_ref::<Self::Visible>() {
            Some(visible) => absent_on_conversion(self.to(visible)),
            None => Ok(None),
        }
    }
}

impl<B: Bijection> Bijection for Arc<B> {
    type Visible = B::Visible;
    type Backing = B::Backing;

    fn to(&self, visible: &B::Visible) -> Result<B::Backing> {
        (**self).to(visible)
    }

    fn from(&self, backing: &B::Backing) -> Result<B::Visible> {
        (**self).from(backing)
    }

    fn to_any(&self, candidate: &dyn Any) -> Result<Option<B::Backing>>
    where
        Self::Visible: 'static,
    {
        (**self).to_any(candidate)
    }
}

/// A [`Bijection`] made of two closures.
pub struct FnBijection<V, B, ToFn, FromFn> {
    to: ToFn,
    from: FromFn,
    _marker: PhantomData<fn(V) -> B>,
}

impl<V, B, ToFn, FromFn> FnBijection<V, B, ToFn, FromFn>
where
    ToFn: Fn(&V) -> Result<B> + Send + Sync,
    FromFn: Fn(&B) -> Result<V> + Send + Sync,
{
    /// Creates a bijection from a forward and a backward conversion.
    pub fn new(to: ToFn, from: FromFn) -> Self {
        Self { to, from, _marker: PhantomData }
    }
}

impl<V, B, ToFn, FromFn> std::fmt::Debug for FnBijection<V, B, ToFn, FromFn> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnBijection").finish_non_exhaustive()
    }
}

impl<V, B, ToFn, FromFn> Bijection for FnBijection<V, B, ToFn, FromFn>
where
    ToFn: Fn(&V) -> Result<B> + Send + Sync,
    FromFn: Fn(&B) -> Result<V> + Send + Sync,
{
    type Visible = V;
    type Backing = B;

    fn to(&self, visible: &V) -> Result<B> { (self.to)(visible) }

    fn from(&self, backing: &B) -> Result<V> { (self.from)(backing) }
}

/// Builds a [`Bijection`] from a forward and a backward closure.
pub fn from_fns<V, B, ToFn, FromFn>(
    to: ToFn,
    from: FromFn,
) -> FnBijection<V, B, ToFn, FromFn>
where
    ToFn: Fn(&V) -> Result<B> + Send + Sync,
    FromFn: Fn(&B) -> Result<V> + Send + Sync,
{
    FnBijection::new(to, from)
}

/// The bijection that maps every value to itself.
pub struct Identity<T>(PhantomData<fn() -> T>);

impl<T> Identity<T> {
    /// Creates the identity bijection.
    #[must_use]
    pub const fn new() -> Self { Self(PhantomData) }
}

impl<T> Default for Identity<T> {
    fn default() -> Self { Self::new() }
}

impl<T> Clone for Identity<T> {
    fn clone(&self) -> Self { *self }
}

impl<T> Copy for Identity<T> {}

impl<T> std::fmt::Debug for Identity<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Identity")
    }
}

impl<T: Clone> Bijection for Identity<T> {
    type Visible = T;
    type Backing = T;

    fn to(&self, visible: &T) -> Result<T> { Ok(visible.clone()) }

    fn from(&self, backing: &T) -> Result<T> { Ok(backing.clone()) }
}

/// Converts every element of `items`, dropping the ones that cannot be
/// represented in the backing type.
fn to_backing_all<B: Bijection>(
    bijection: &B,
    items: &[B::Visible],
) -> Result<Vec<B::Backing>> {
    let mut converted = Vec::with_capacity(items.len());

    for item in items {
        if let Some(item) = absent_on_conversion(bijection.to(item))? {
            converted.push(item);
        }
    }

    Ok(converted)
}
