//! Field-based orderings.
//!
//! A [`FieldComparator`] orders entities by one field's value, with a
//! [`NullOrder`] deciding where nulls go and a [`Dir`] for the direction.
//! [`EntityComparator`] is the object-safe seam queries sort with.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{FieldError, Result};
use crate::field::FieldRef;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Returns the opposite direction.
    pub fn flip(self) -> Dir {
        match self {
            Dir::Asc => Dir::Desc,
            Dir::Desc => Dir::Asc,
        }
    }

    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where null values sort relative to non-null values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NullOrder {
    /// The field is asserted never to be null. Meeting a null is an error.
    None,
    /// Nulls sort before every value.
    First,
    /// Nulls sort after every value.
    Last,
}

/// Something that can order two entities.
pub trait EntityComparator<E> {
    /// Compares two entities.
    ///
    /// # Panics
    ///
    /// Implementations may panic where [`try_compare`](Self::try_compare)
    /// would return an error.
    fn compare(&self, a: &E, b: &E) -> Ordering;

    /// Compares two entities, reporting values this comparator cannot order.
    fn try_compare(&self, a: &E, b: &E) -> Result<Ordering> {
        Ok(self.compare(a, b))
    }
}

impl<E, F> EntityComparator<E> for F
where
    F: Fn(&E, &E) -> Ordering,
{
    fn compare(&self, a: &E, b: &E) -> Ordering {
        self(a, b)
    }
}

/// Orders entities by the value of one field.
///
/// Nulls are placed according to the [`NullOrder`]. With `NullOrder::None`
/// a null fails fast: [`try_compare`](EntityComparator::try_compare) returns
/// [`FieldError::UnexpectedNull`], [`compare`](EntityComparator::compare)
/// panics with the same message and [`sort`](FieldComparator::sort) refuses
/// to touch the slice. A reversed comparator inverts the whole result, null
/// placement included.
pub struct FieldComparator<E, V> {
    field: FieldRef<E, V>,
    null_order: NullOrder,
    dir: Dir,
}

impl<E, V: Ord> FieldComparator<E, V> {
    /// Creates an ascending comparator.
    pub fn new(field: FieldRef<E, V>, null_order: NullOrder) -> Self {
        FieldComparator {
            field,
            null_order,
            dir: Dir::Asc,
        }
    }

    pub fn field(&self) -> &FieldRef<E, V> {
        &self.field
    }

    pub fn null_order(&self) -> NullOrder {
        self.null_order
    }

    pub fn dir(&self) -> Dir {
        self.dir
    }

    pub fn is_reversed(&self) -> bool {
        self.dir.is_desc()
    }

    /// Returns this comparator with its final result inverted.
    pub fn reversed(mut self) -> Self {
        self.dir = self.dir.flip();
        self
    }

    /// Sorts `items` in place (stable).
    ///
    /// With `NullOrder::None`, returns [`FieldError::UnexpectedNull`] and
    /// leaves `items` untouched if any item holds a null.
    pub fn sort(&self, items: &mut [E]) -> Result<()> {
        if self.null_order == NullOrder::None
            && items.iter().any(|item| self.field.get(item).is_none())
        {
            return Err(self.unexpected_null());
        }
        items.sort_by(|a, b| self.compare(a, b));
        Ok(())
    }

    fn unexpected_null(&self) -> FieldError {
        tracing::debug!(
            column = %self.field.identifier(),
            "null met by an ordering without a null policy"
        );
        FieldError::UnexpectedNull {
            column: self.field.identifier().clone(),
        }
    }

    fn compare_values(&self, a: &E, b: &E) -> Result<Ordering> {
        let ordering = match (self.field.get(a), self.field.get(b)) {
            (Some(a), Some(b)) => a.cmp(&b),
            (None, None) => match self.null_order {
                NullOrder::None => return Err(self.unexpected_null()),
                NullOrder::First | NullOrder::Last => Ordering::Equal,
            },
            (None, Some(_)) => match self.null_order {
                NullOrder::None => return Err(self.unexpected_null()),
                NullOrder::First => Ordering::Less,
                NullOrder::Last => Ordering::Greater,
            },
            (Some(_), None) => match self.null_order {
                NullOrder::None => return Err(self.unexpected_null()),
                NullOrder::First => Ordering::Greater,
                NullOrder::Last => Ordering::Less,
            },
        };
        Ok(self.dir.apply(ordering))
    }
}

impl<E, V: Ord> EntityComparator<E> for FieldComparator<E, V> {
    /// # Panics
    ///
    /// Panics if the comparator has no null policy and either value is null.
    fn compare(&self, a: &E, b: &E) -> Ordering {
        match self.compare_values(a, b) {
            Ok(ordering) => ordering,
            Err(err) => panic!("{}", err),
        }
    }

    fn try_compare(&self, a: &E, b: &E) -> Result<Ordering> {
        self.compare_values(a, b)
    }
}

impl<E, V> Clone for FieldComparator<E, V> {
    fn clone(&self) -> Self {
        FieldComparator {
            field: self.field.clone(),
            null_order: self.null_order,
            dir: self.dir,
        }
    }
}

impl<E, V> fmt::Debug for FieldComparator<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldComparator")
            .field("identifier", self.field.identifier())
            .field("null_order", &self.null_order)
            .field("dir", &self.dir)
            .finish()
    }
}

/// Compares two entities using a list of comparators.
///
/// Uses the first comparator as the primary sort key, the second to break
/// ties, etc. If all comparators return equal, returns `Equal`.
pub fn compare_by<E, C>(a: &E, b: &E, comparators: &[C]) -> Result<Ordering>
where
    C: AsRef<dyn EntityComparator<E> + Send + Sync>,
{
    for comparator in comparators {
        let ordering = comparator.as_ref().try_compare(a, b)?;
        if ordering != Ordering::Equal {
            return Ok(ordering);
        }
    }
    Ok(Ordering::Equal)
}
