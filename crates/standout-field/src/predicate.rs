//! Predicates over entities.
//!
//! A [`FieldPredicate`] is a single filter bound to one field: the field
//! handle, an operator and its operand(s), held together in a
//! [`PredicateKind`]. It is an immutable value and safe to share between
//! queries and threads.
//!
//! Anything implementing [`Predicate`] can be combined with `and`, `or` and
//! `negate`, including plain closures.

use std::collections::BTreeSet;
use std::fmt;

use crate::field::FieldRef;
use crate::identifier::ColumnIdentifier;
use crate::op::{Inclusion, Operator};

/// A boolean test over an entity.
pub trait Predicate<E> {
    /// Returns `true` if `entity` satisfies this predicate.
    fn test(&self, entity: &E) -> bool;

    /// Both this and `other` must match.
    fn and<P>(self, other: P) -> And<Self, P>
    where
        Self: Sized,
        P: Predicate<E>,
    {
        And { left: self, right: other }
    }

    /// This or `other` must match.
    fn or<P>(self, other: P) -> Or<Self, P>
    where
        Self: Sized,
        P: Predicate<E>,
    {
        Or { left: self, right: other }
    }

    /// Matches exactly when this predicate does not.
    fn negate(self) -> Not<Self>
    where
        Self: Sized,
    {
        Not { inner: self }
    }
}

impl<E, F> Predicate<E> for F
where
    F: Fn(&E) -> bool,
{
    fn test(&self, entity: &E) -> bool {
        self(entity)
    }
}

/// Conjunction of two predicates. Short-circuits on the left.
#[derive(Debug, Clone)]
pub struct And<A, B> {
    left: A,
    right: B,
}

impl<E, A: Predicate<E>, B: Predicate<E>> Predicate<E> for And<A, B> {
    fn test(&self, entity: &E) -> bool {
        self.left.test(entity) && self.right.test(entity)
    }
}

/// Disjunction of two predicates. Short-circuits on the left.
#[derive(Debug, Clone)]
pub struct Or<A, B> {
    left: A,
    right: B,
}

impl<E, A: Predicate<E>, B: Predicate<E>> Predicate<E> for Or<A, B> {
    fn test(&self, entity: &E) -> bool {
        self.left.test(entity) || self.right.test(entity)
    }
}

/// Negation of a predicate.
#[derive(Debug, Clone)]
pub struct Not<P> {
    inner: P,
}

impl<E, P: Predicate<E>> Predicate<E> for Not<P> {
    fn test(&self, entity: &E) -> bool {
        !self.inner.test(entity)
    }
}

/// Operand set of an `In` or `NotIn` predicate.
///
/// Membership is by value equality. Null is only a member when explicitly
/// included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSet<V> {
    values: BTreeSet<V>,
    includes_null: bool,
}

impl<V: Ord> ValueSet<V> {
    pub fn new(values: BTreeSet<V>, includes_null: bool) -> Self {
        ValueSet {
            values,
            includes_null,
        }
    }

    pub fn values(&self) -> &BTreeSet<V> {
        &self.values
    }

    pub fn includes_null(&self) -> bool {
        self.includes_null
    }

    /// Tests whether a (possibly null) value is a member.
    pub fn contains(&self, value: Option<&V>) -> bool {
        match value {
            Some(value) => self.values.contains(value),
            None => self.includes_null,
        }
    }
}

/// Operator and operands of a field predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateKind<V> {
    IsNull,
    IsNotNull,
    Equal(V),
    NotEqual(V),
    GreaterThan(V),
    GreaterOrEqual(V),
    LessThan(V),
    LessOrEqual(V),
    Between {
        start: V,
        end: V,
        inclusion: Inclusion,
    },
    NotBetween {
        start: V,
        end: V,
        inclusion: Inclusion,
    },
    In(ValueSet<V>),
    NotIn(ValueSet<V>),
}

impl<V: Ord> PredicateKind<V> {
    /// Returns the operator tag of this kind.
    pub fn operator(&self) -> Operator {
        match self {
            PredicateKind::IsNull => Operator::IsNull,
            PredicateKind::IsNotNull => Operator::IsNotNull,
            PredicateKind::Equal(_) => Operator::Equal,
            PredicateKind::NotEqual(_) => Operator::NotEqual,
            PredicateKind::GreaterThan(_) => Operator::GreaterThan,
            PredicateKind::GreaterOrEqual(_) => Operator::GreaterOrEqual,
            PredicateKind::LessThan(_) => Operator::LessThan,
            PredicateKind::LessOrEqual(_) => Operator::LessOrEqual,
            PredicateKind::Between { .. } => Operator::Between,
            PredicateKind::NotBetween { .. } => Operator::NotBetween,
            PredicateKind::In(_) => Operator::In,
            PredicateKind::NotIn(_) => Operator::NotIn,
        }
    }

    /// Evaluates this kind against a field value, `None` being null.
    ///
    /// Equality, range and null tests are exact negations of their
    /// counterparts. Comparisons never match a null. `In` matches a null
    /// only if the set includes it, `NotIn` never does.
    pub fn eval(&self, value: Option<&V>) -> bool {
        match self {
            PredicateKind::IsNull => value.is_none(),
            PredicateKind::IsNotNull => value.is_some(),
            PredicateKind::Equal(operand) => value == Some(operand),
            PredicateKind::NotEqual(operand) => value != Some(operand),
            PredicateKind::GreaterThan(operand)
            | PredicateKind::GreaterOrEqual(operand)
            | PredicateKind::LessThan(operand)
            | PredicateKind::LessOrEqual(operand) => match value {
                Some(value) => self.operator().eval_ordering(value.cmp(operand)),
                None => false,
            },
            PredicateKind::Between {
                start,
                end,
                inclusion,
            } => value.is_some_and(|v| inclusion.contains(start, end, v)),
            PredicateKind::NotBetween {
                start,
                end,
                inclusion,
            } => !value.is_some_and(|v| inclusion.contains(start, end, v)),
            PredicateKind::In(set) => set.contains(value),
            PredicateKind::NotIn(set) => value.is_some_and(|v| !set.contains(Some(v))),
        }
    }
}

/// A predicate bound to one field.
pub struct FieldPredicate<E, V> {
    field: FieldRef<E, V>,
    kind: PredicateKind<V>,
}

impl<E, V: Ord> FieldPredicate<E, V> {
    pub fn new(field: FieldRef<E, V>, kind: PredicateKind<V>) -> Self {
        FieldPredicate { field, kind }
    }

    /// The field this predicate reads.
    pub fn field(&self) -> &FieldRef<E, V> {
        &self.field
    }

    pub fn identifier(&self) -> &ColumnIdentifier {
        self.field.identifier()
    }

    pub fn operator(&self) -> Operator {
        self.kind.operator()
    }

    /// Operator together with its operands.
    pub fn kind(&self) -> &PredicateKind<V> {
        &self.kind
    }
}

impl<E, V: Ord> Predicate<E> for FieldPredicate<E, V> {
    fn test(&self, entity: &E) -> bool {
        let value = self.field.get(entity);
        self.kind.eval(value.as_ref())
    }
}

impl<E, V: Clone> Clone for FieldPredicate<E, V> {
    fn clone(&self) -> Self {
        FieldPredicate {
            field: self.field.clone(),
            kind: self.kind.clone(),
        }
    }
}

impl<E, V: fmt::Debug> fmt::Debug for FieldPredicate<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldPredicate")
            .field("identifier", self.field.identifier())
            .field("kind", &self.kind)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[i32], includes_null: bool) -> ValueSet<i32> {
        ValueSet::new(values.iter().copied().collect(), includes_null)
    }

    #[test]
    fn equality_is_null_safe() {
        let eq = PredicateKind::Equal(3);
        let ne = PredicateKind::NotEqual(3);

        assert!(eq.eval(Some(&3)));
        assert!(!eq.eval(Some(&4)));
        assert!(!eq.eval(None));

        assert!(!ne.eval(Some(&3)));
        assert!(ne.eval(Some(&4)));
        assert!(ne.eval(None));
    }

    #[test]
    fn comparisons() {
        assert!(PredicateKind::GreaterThan(10).eval(Some(&11)));
        assert!(!PredicateKind::GreaterThan(10).eval(Some(&10)));

        assert!(PredicateKind::GreaterOrEqual(10).eval(Some(&10)));
        assert!(!PredicateKind::GreaterOrEqual(10).eval(Some(&9)));

        assert!(PredicateKind::LessThan(10).eval(Some(&9)));
        assert!(!PredicateKind::LessThan(10).eval(Some(&10)));

        assert!(PredicateKind::LessOrEqual(10).eval(Some(&10)));
        assert!(!PredicateKind::LessOrEqual(10).eval(Some(&11)));
    }

    #[test]
    fn comparisons_never_match_null() {
        assert!(!PredicateKind::GreaterThan(0).eval(None));
        assert!(!PredicateKind::GreaterOrEqual(0).eval(None));
        assert!(!PredicateKind::LessThan(0).eval(None));
        assert!(!PredicateKind::LessOrEqual(0).eval(None));
    }

    #[test]
    fn between_and_not_between_are_negations() {
        let between = PredicateKind::Between {
            start: 2,
            end: 5,
            inclusion: Inclusion::StartInclusiveEndExclusive,
        };
        let not_between = PredicateKind::NotBetween {
            start: 2,
            end: 5,
            inclusion: Inclusion::StartInclusiveEndExclusive,
        };

        assert!(between.eval(Some(&2)));
        assert!(!between.eval(Some(&5)));

        for value in [None, Some(1), Some(2), Some(4), Some(5), Some(6)] {
            assert_eq!(
                between.eval(value.as_ref()),
                !not_between.eval(value.as_ref())
            );
        }
    }

    #[test]
    fn membership() {
        let in_set = PredicateKind::In(set(&[1, 3, 5], false));
        let not_in = PredicateKind::NotIn(set(&[1, 3, 5], false));

        assert!(in_set.eval(Some(&3)));
        assert!(!not_in.eval(Some(&3)));
        assert!(!in_set.eval(Some(&4)));
        assert!(not_in.eval(Some(&4)));

        // Neither matches a null
        assert!(!in_set.eval(None));
        assert!(!not_in.eval(None));
    }

    #[test]
    fn membership_with_explicit_null() {
        let in_set = PredicateKind::In(set(&[1], true));
        let not_in = PredicateKind::NotIn(set(&[1], true));

        assert!(in_set.eval(None));
        assert!(!not_in.eval(None));
    }

    #[test]
    fn null_tests() {
        assert!(PredicateKind::<i32>::IsNull.eval(None));
        assert!(!PredicateKind::IsNull.eval(Some(&1)));
        assert!(PredicateKind::IsNotNull.eval(Some(&1)));
        assert!(!PredicateKind::<i32>::IsNotNull.eval(None));
    }

    #[test]
    fn kind_reports_operator() {
        assert_eq!(PredicateKind::Equal(1).operator(), Operator::Equal);
        assert_eq!(
            PredicateKind::In(set(&[], false)).operator(),
            Operator::In
        );
        assert_eq!(
            PredicateKind::NotBetween {
                start: 1,
                end: 2,
                inclusion: Inclusion::default(),
            }
            .operator(),
            Operator::NotBetween
        );
    }

    #[test]
    fn closures_combine() {
        let even = |n: &i32| n % 2 == 0;
        let positive = |n: &i32| *n > 0;

        let both = even.and(positive);
        assert!(both.test(&4));
        assert!(!both.test(&-4));
        assert!(!both.test(&3));

        let either = even.or(positive);
        assert!(either.test(&-4));
        assert!(either.test(&3));
        assert!(!either.test(&-3));

        let odd = even.negate();
        assert!(odd.test(&3));
        assert!(!odd.test(&4));
    }
}
