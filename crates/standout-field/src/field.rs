//! Typed field accessors.
//!
//! A [`Field`] bundles everything known about one entity property: its
//! [`ColumnIdentifier`], a getter, a setter, the [`TypeMapper`] between its
//! stored and domain types, and whether its values are unique. Fields are
//! built once by whatever owns the entity metadata and shared read-only
//! afterwards.
//!
//! Every comparable field implements [`ComparableField`], which is where
//! predicates and comparators come from.
//!
//! # Example
//!
//! ```
//! use standout_field::{ComparableField, Field, IdentityMapper, Predicate, TableIdentifier};
//!
//! #[derive(Debug, Clone, Default)]
//! struct Order {
//!     id: u64,
//!     total: i64,
//! }
//!
//! let orders = TableIdentifier::named("orders").unwrap();
//! let total: Field<Order, i64, i64> = Field::builder()
//!     .identifier(orders.column("total").unwrap())
//!     .getter(|o: &Order| Some(o.total))
//!     .setter(|o: &mut Order, v| o.total = v)
//!     .type_mapper(IdentityMapper)
//!     .build()
//!     .unwrap();
//!
//! let order = total.with(Order::default(), 250);
//! assert_eq!(total.get(&order), Some(250));
//! assert!(total.greater_than(100).test(&order));
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::error::{FieldError, Result};
use crate::identifier::ColumnIdentifier;
use crate::mapper::TypeMapper;
use crate::op::Inclusion;
use crate::ordering::{FieldComparator, NullOrder};
use crate::predicate::{FieldPredicate, PredicateKind, ValueSet};

/// Reads the domain value of a field. `None` is a null value.
pub type Getter<E, V> = Arc<dyn Fn(&E) -> Option<V> + Send + Sync>;

/// Writes the domain value of a field in place.
pub type Setter<E, V> = Arc<dyn Fn(&mut E, V) + Send + Sync>;

/// A field handle with its stored type erased.
///
/// This is all predicates, comparators and finders need from a field, and
/// is how a foreign key refers to the field it points at.
pub struct FieldRef<E, V> {
    identifier: ColumnIdentifier,
    getter: Getter<E, V>,
    unique: bool,
}

impl<E, V> FieldRef<E, V> {
    pub fn new(identifier: ColumnIdentifier, getter: Getter<E, V>, unique: bool) -> Self {
        FieldRef {
            identifier,
            getter,
            unique,
        }
    }

    pub fn identifier(&self) -> &ColumnIdentifier {
        &self.identifier
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Reads this field from an entity.
    pub fn get(&self, entity: &E) -> Option<V> {
        (self.getter)(entity)
    }
}

impl<E, V> Clone for FieldRef<E, V> {
    fn clone(&self) -> Self {
        FieldRef {
            identifier: self.identifier.clone(),
            getter: Arc::clone(&self.getter),
            unique: self.unique,
        }
    }
}

impl<E, V> fmt::Debug for FieldRef<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRef")
            .field("identifier", &self.identifier)
            .field("unique", &self.unique)
            .finish()
    }
}

/// Operators available on any field whose value type is totally ordered.
///
/// Implementors only supply the identifier, getter and uniqueness flag; the
/// predicate and comparator builders are provided.
pub trait ComparableField<E, V: Ord> {
    /// The column this field reads.
    fn identifier(&self) -> &ColumnIdentifier;

    /// The getter backing this field.
    fn getter(&self) -> &Getter<E, V>;

    /// Returns `true` if at most one entity may carry any given value.
    fn is_unique(&self) -> bool;

    /// Returns a stored-type-erased handle to this field.
    fn field_ref(&self) -> FieldRef<E, V> {
        FieldRef::new(
            self.identifier().clone(),
            Arc::clone(self.getter()),
            self.is_unique(),
        )
    }

    // ========================================================================
    // Comparators
    // ========================================================================

    /// Ascending comparator for fields that are never null.
    ///
    /// Ordering a null with this comparator fails; see [`FieldComparator`].
    fn comparator(&self) -> FieldComparator<E, V> {
        FieldComparator::new(self.field_ref(), NullOrder::None)
    }

    /// Ascending comparator that places nulls before every value.
    fn comparator_nulls_first(&self) -> FieldComparator<E, V> {
        FieldComparator::new(self.field_ref(), NullOrder::First)
    }

    /// Ascending comparator that places nulls after every value.
    fn comparator_nulls_last(&self) -> FieldComparator<E, V> {
        FieldComparator::new(self.field_ref(), NullOrder::Last)
    }

    // ========================================================================
    // Predicates
    // ========================================================================

    fn is_null(&self) -> FieldPredicate<E, V> {
        FieldPredicate::new(self.field_ref(), PredicateKind::IsNull)
    }

    fn is_not_null(&self) -> FieldPredicate<E, V> {
        FieldPredicate::new(self.field_ref(), PredicateKind::IsNotNull)
    }

    /// Matches entities whose value equals `value`. A null never equals it.
    ///
    /// The operand cannot be null; use [`is_null`](Self::is_null) to match
    /// null values.
    fn equal(&self, value: V) -> FieldPredicate<E, V> {
        FieldPredicate::new(self.field_ref(), PredicateKind::Equal(value))
    }

    /// Exact negation of [`equal`](Self::equal): nulls match.
    fn not_equal(&self, value: V) -> FieldPredicate<E, V> {
        FieldPredicate::new(self.field_ref(), PredicateKind::NotEqual(value))
    }

    fn greater_than(&self, value: V) -> FieldPredicate<E, V> {
        FieldPredicate::new(self.field_ref(), PredicateKind::GreaterThan(value))
    }

    fn greater_or_equal(&self, value: V) -> FieldPredicate<E, V> {
        FieldPredicate::new(self.field_ref(), PredicateKind::GreaterOrEqual(value))
    }

    fn less_than(&self, value: V) -> FieldPredicate<E, V> {
        FieldPredicate::new(self.field_ref(), PredicateKind::LessThan(value))
    }

    fn less_or_equal(&self, value: V) -> FieldPredicate<E, V> {
        FieldPredicate::new(self.field_ref(), PredicateKind::LessOrEqual(value))
    }

    /// Matches values between `start` and `end` under `inclusion`.
    fn between(&self, start: V, end: V, inclusion: Inclusion) -> FieldPredicate<E, V> {
        FieldPredicate::new(
            self.field_ref(),
            PredicateKind::Between {
                start,
                end,
                inclusion,
            },
        )
    }

    /// [`between`](Self::between) with the default half-open range.
    fn between_default(&self, start: V, end: V) -> FieldPredicate<E, V> {
        self.between(start, end, Inclusion::default())
    }

    /// Exact negation of [`between`](Self::between): nulls match.
    fn not_between(&self, start: V, end: V, inclusion: Inclusion) -> FieldPredicate<E, V> {
        FieldPredicate::new(
            self.field_ref(),
            PredicateKind::NotBetween {
                start,
                end,
                inclusion,
            },
        )
    }

    /// Matches values contained in `values`. Nulls never match.
    fn in_set(&self, values: impl IntoIterator<Item = V>) -> FieldPredicate<E, V> {
        let set = ValueSet::new(values.into_iter().collect(), false);
        FieldPredicate::new(self.field_ref(), PredicateKind::In(set))
    }

    /// Like [`in_set`](Self::in_set), but a `None` entry makes nulls match.
    fn in_nullable(&self, values: impl IntoIterator<Item = Option<V>>) -> FieldPredicate<E, V> {
        let mut includes_null = false;
        let mut set = BTreeSet::new();
        for value in values {
            match value {
                Some(value) => {
                    set.insert(value);
                }
                None => includes_null = true,
            }
        }
        FieldPredicate::new(
            self.field_ref(),
            PredicateKind::In(ValueSet::new(set, includes_null)),
        )
    }

    /// Matches non-null values absent from `values`. Nulls never match.
    fn not_in(&self, values: impl IntoIterator<Item = V>) -> FieldPredicate<E, V> {
        let set = ValueSet::new(values.into_iter().collect(), false);
        FieldPredicate::new(self.field_ref(), PredicateKind::NotIn(set))
    }
}

impl<E, V: Ord> ComparableField<E, V> for FieldRef<E, V> {
    fn identifier(&self) -> &ColumnIdentifier {
        &self.identifier
    }

    fn getter(&self) -> &Getter<E, V> {
        &self.getter
    }

    fn is_unique(&self) -> bool {
        self.unique
    }

    fn field_ref(&self) -> FieldRef<E, V> {
        self.clone()
    }
}

/// A named, typed accessor for one entity property.
///
/// `E` is the entity type, `D` the stored representation and `V` the domain
/// value type predicates and comparators work on.
pub struct Field<E, D, V> {
    identifier: ColumnIdentifier,
    getter: Getter<E, V>,
    setter: Setter<E, V>,
    type_mapper: Arc<dyn TypeMapper<D, V>>,
    unique: bool,
}

impl<E, D, V> Field<E, D, V> {
    /// Starts building a field. Every component except `unique` is required.
    pub fn builder() -> FieldBuilder<E, D, V> {
        FieldBuilder::new()
    }

    pub fn identifier(&self) -> &ColumnIdentifier {
        &self.identifier
    }

    pub fn getter(&self) -> &Getter<E, V> {
        &self.getter
    }

    pub fn setter(&self) -> &Setter<E, V> {
        &self.setter
    }

    pub fn type_mapper(&self) -> &dyn TypeMapper<D, V> {
        self.type_mapper.as_ref()
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Reads this field from an entity.
    pub fn get(&self, entity: &E) -> Option<V> {
        (self.getter)(entity)
    }

    /// Writes `value` into `entity` in place.
    pub fn set(&self, entity: &mut E, value: V) {
        (self.setter)(entity, value)
    }

    /// Returns `entity` with `value` written into it.
    pub fn with(&self, mut entity: E, value: V) -> E {
        self.set(&mut entity, value);
        entity
    }

    /// Converts a stored representation into this field's value type.
    pub fn to_value(&self, stored: D) -> V {
        self.type_mapper.to_value(stored)
    }

    /// Converts a value into this field's stored representation.
    pub fn to_stored(&self, value: V) -> D {
        self.type_mapper.to_stored(value)
    }
}

impl<E, D, V: Ord> ComparableField<E, V> for Field<E, D, V> {
    fn identifier(&self) -> &ColumnIdentifier {
        &self.identifier
    }

    fn getter(&self) -> &Getter<E, V> {
        &self.getter
    }

    fn is_unique(&self) -> bool {
        self.unique
    }
}

impl<E, D, V> Clone for Field<E, D, V> {
    fn clone(&self) -> Self {
        Field {
            identifier: self.identifier.clone(),
            getter: Arc::clone(&self.getter),
            setter: Arc::clone(&self.setter),
            type_mapper: Arc::clone(&self.type_mapper),
            unique: self.unique,
        }
    }
}

impl<E, D, V> fmt::Debug for Field<E, D, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("identifier", &self.identifier)
            .field("type_mapper", &self.type_mapper.label())
            .field("unique", &self.unique)
            .finish()
    }
}

/// Builder for [`Field`].
///
/// [`build`](FieldBuilder::build) fails with [`FieldError::MissingComponent`]
/// if the identifier, getter, setter or type mapper was never supplied.
pub struct FieldBuilder<E, D, V> {
    identifier: Option<ColumnIdentifier>,
    getter: Option<Getter<E, V>>,
    setter: Option<Setter<E, V>>,
    type_mapper: Option<Arc<dyn TypeMapper<D, V>>>,
    unique: bool,
}

impl<E, D, V> FieldBuilder<E, D, V> {
    pub fn new() -> Self {
        FieldBuilder {
            identifier: None,
            getter: None,
            setter: None,
            type_mapper: None,
            unique: false,
        }
    }

    pub fn identifier(mut self, identifier: ColumnIdentifier) -> Self {
        self.identifier = Some(identifier);
        self
    }

    pub fn getter<F>(mut self, getter: F) -> Self
    where
        F: Fn(&E) -> Option<V> + Send + Sync + 'static,
    {
        self.getter = Some(Arc::new(getter));
        self
    }

    pub fn setter<F>(mut self, setter: F) -> Self
    where
        F: Fn(&mut E, V) + Send + Sync + 'static,
    {
        self.setter = Some(Arc::new(setter));
        self
    }

    pub fn type_mapper<M>(mut self, type_mapper: M) -> Self
    where
        M: TypeMapper<D, V> + 'static,
    {
        self.type_mapper = Some(Arc::new(type_mapper));
        self
    }

    /// Marks the field as unique. Defaults to `false`.
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn build(self) -> Result<Field<E, D, V>> {
        let identifier = require(self.identifier, "identifier")?;
        let getter = require(self.getter, "getter")?;
        let setter = require(self.setter, "setter")?;
        let type_mapper = require(self.type_mapper, "type mapper")?;

        Ok(Field {
            identifier,
            getter,
            setter,
            type_mapper,
            unique: self.unique,
        })
    }
}

impl<E, D, V> Default for FieldBuilder<E, D, V> {
    fn default() -> Self {
        FieldBuilder::new()
    }
}

pub(crate) fn require<T>(component: Option<T>, name: &'static str) -> Result<T> {
    component.ok_or_else(|| {
        tracing::debug!(component = name, "field construction rejected");
        FieldError::MissingComponent { component: name }
    })
}
