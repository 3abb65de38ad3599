//! Structural equality and hashing over collection contracts.
//!
//! These compare *contents*, reading both sides through their views. Against
//! remote views every call issues fresh requests, so two equal answers are
//! not guaranteed to describe the same moment.

use std::hash::{Hash, Hasher};

use fxhash::FxHasher64;

use crate::{
    collection::{Collection, Map, MapEntry, Set},
    error::Result,
};

/// Returns `true` if both sets hold the same elements, in any order.
pub fn set_eq<A, B>(a: &A, b: &B) -> Result<bool>
where
    A: Set,
    B: Set<Item = A::Item>,
{
    if a.len()? != b.len()? {
        return Ok(false);
    }

    for item in a.iter()? {
        if !b.contains(&item?)? {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Returns `true` if both collections yield equal elements in the same
/// order.
pub fn sequence_eq<A, B>(a: &A, b: &B) -> Result<bool>
where
    A: Collection,
    B: Collection<Item = A::Item>,
    A::Item: PartialEq,
{
    let mut left = a.iter()?;
    let mut right = b.iter()?;

    loop {
        match (left.next().transpose()?, right.next().transpose()?) {
            (None, None) => return Ok(true),
            (Some(left), Some(right)) if left == right => {}
            _ => return Ok(false),
        }
    }
}

/// Returns `true` if both maps hold the same key-value pairs.
pub fn map_eq<A, B>(a: &A, b: &B) -> Result<bool>
where
    A: Map,
    B: Map<Key = A::Key, Value = A::Value>,
    A::Value: PartialEq,
{
    if a.len()? != b.len()? {
        return Ok(false);
    }

    let entries = a.entries();

    for entry in entries.iter()? {
        let entry = entry?;

        match b.get(entry.key())? {
            Some(value) if &value == entry.value() => {}
            _ => return Ok(false),
        }
    }

    Ok(true)
}

/// Hashes a set independently of iteration order.
pub fn set_hash<S>(set: &S) -> Result<u64>
where
    S: Set,
    S::Item: Hash,
{
    let mut hash = 0u64;

    for item in set.iter()? {
        hash = hash.wrapping_add(fxhash::hash64(&item?));
    }

    Ok(hash)
}

/// Hashes a collection in iteration order.
pub fn sequence_hash<C>(collection: &C) -> Result<u64>
where
    C: Collection,
    C::Item: Hash,
{
    let mut hasher = FxHasher64::default();
    let mut len = 0usize;

    for item in collection.iter()? {
        item?.hash(&mut hasher);
        len += 1;
    }

    len.hash(&mut hasher);

    Ok(hasher.finish())
}
