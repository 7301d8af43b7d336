//! Conversions between stored and domain representations of a field.
//!
//! A [`TypeMapper`] translates between the type a column is stored as (`D`)
//! and the type calling code works with (`V`). Predicates and comparators
//! always operate on `V`; the mapper exists so a storage collaborator can
//! move values across the boundary without runtime casts.

use std::fmt;

/// Bidirectional conversion between a stored type `D` and a value type `V`.
///
/// Implementations must be total, deterministic and free of side effects
/// for every value actually stored.
pub trait TypeMapper<D, V>: Send + Sync {
    /// Converts a stored representation into the domain value.
    fn to_value(&self, stored: D) -> V;

    /// Converts a domain value into its stored representation.
    fn to_stored(&self, value: V) -> D;

    /// Human readable name of this mapping.
    fn label(&self) -> &str {
        "custom"
    }
}

/// Mapper for fields whose stored and domain types are the same.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityMapper;

impl<T> TypeMapper<T, T> for IdentityMapper {
    fn to_value(&self, stored: T) -> T {
        stored
    }

    fn to_stored(&self, value: T) -> T {
        value
    }

    fn label(&self) -> &str {
        "identity"
    }
}

/// Mapper built from a pair of plain conversion functions.
///
/// ```
/// use standout_field::{FnMapper, TypeMapper};
///
/// // cents stored as i64, exposed as whole units
/// let mapper = FnMapper::new("cents", |c: i64| c / 100, |v: i64| v * 100);
/// assert_eq!(mapper.to_value(1200), 12);
/// assert_eq!(mapper.to_stored(3), 300);
/// ```
#[derive(Clone, Copy)]
pub struct FnMapper<D, V> {
    label: &'static str,
    to_value: fn(D) -> V,
    to_stored: fn(V) -> D,
}

impl<D, V> FnMapper<D, V> {
    pub fn new(label: &'static str, to_value: fn(D) -> V, to_stored: fn(V) -> D) -> Self {
        FnMapper {
            label,
            to_value,
            to_stored,
        }
    }
}

impl<D, V> TypeMapper<D, V> for FnMapper<D, V> {
    fn to_value(&self, stored: D) -> V {
        (self.to_value)(stored)
    }

    fn to_stored(&self, value: V) -> D {
        (self.to_stored)(value)
    }

    fn label(&self) -> &str {
        self.label
    }
}

impl<D, V> fmt::Debug for FnMapper<D, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMapper").field("label", &self.label).finish()
    }
}
