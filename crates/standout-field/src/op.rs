//! Operator metadata for field predicates.
//!
//! The [`Operator`] enum tags every predicate kind a field can build, and
//! [`Inclusion`] describes the boundary policy of range predicates. Both are
//! plain data so a downstream layer can inspect a predicate without
//! evaluating it.

use std::cmp::Ordering;

/// Kind of a field predicate.
///
/// Operators are grouped by what they test:
/// - **Null tests**: `IsNull`, `IsNotNull`
/// - **Equality**: `Equal`, `NotEqual` - null-safe, work on every value
/// - **Comparison**: `GreaterThan`, `GreaterOrEqual`, `LessThan`, `LessOrEqual`
/// - **Range**: `Between`, `NotBetween` - carry an [`Inclusion`]
/// - **Membership**: `In`, `NotIn` - test against a set of values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    IsNull,
    IsNotNull,
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Between,
    NotBetween,
    In,
    NotIn,
}

impl Operator {
    /// Returns `true` for the two null tests.
    pub fn is_null_test(self) -> bool {
        matches!(self, Operator::IsNull | Operator::IsNotNull)
    }

    /// Returns `true` if this operator delegates to the value's natural ordering.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Operator::GreaterThan
                | Operator::GreaterOrEqual
                | Operator::LessThan
                | Operator::LessOrEqual
        )
    }

    /// Returns `true` for range operators.
    pub fn is_range(self) -> bool {
        matches!(self, Operator::Between | Operator::NotBetween)
    }

    /// Returns `true` for set membership operators.
    pub fn is_membership(self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }

    /// Evaluates an equality or comparison operator given an ordering result.
    ///
    /// `ordering` is the field value compared to the operand. Operators that
    /// are not ordering based always return `false`.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Operator::Equal => ordering == Ordering::Equal,
            Operator::NotEqual => ordering != Ordering::Equal,
            Operator::GreaterThan => ordering == Ordering::Greater,
            Operator::GreaterOrEqual => ordering != Ordering::Less,
            Operator::LessThan => ordering == Ordering::Less,
            Operator::LessOrEqual => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the display name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::IsNull => "is_null",
            Operator::IsNotNull => "is_not_null",
            Operator::Equal => "equal",
            Operator::NotEqual => "not_equal",
            Operator::GreaterThan => "greater_than",
            Operator::GreaterOrEqual => "greater_or_equal",
            Operator::LessThan => "less_than",
            Operator::LessOrEqual => "less_or_equal",
            Operator::Between => "between",
            Operator::NotBetween => "not_between",
            Operator::In => "in",
            Operator::NotIn => "not_in",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Boundary policy of a range predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Inclusion {
    /// `start < value < end`
    StartExclusiveEndExclusive,
    /// `start <= value < end`
    #[default]
    StartInclusiveEndExclusive,
    /// `start < value <= end`
    StartExclusiveEndInclusive,
    /// `start <= value <= end`
    StartInclusiveEndInclusive,
}

impl Inclusion {
    pub fn is_start_inclusive(self) -> bool {
        matches!(
            self,
            Inclusion::StartInclusiveEndExclusive | Inclusion::StartInclusiveEndInclusive
        )
    }

    pub fn is_end_inclusive(self) -> bool {
        matches!(
            self,
            Inclusion::StartExclusiveEndInclusive | Inclusion::StartInclusiveEndInclusive
        )
    }

    /// Tests whether `value` lies between `start` and `end` under this policy.
    ///
    /// A range whose start lies after its end contains nothing.
    pub fn contains<V: Ord>(self, start: &V, end: &V, value: &V) -> bool {
        let after_start = match value.cmp(start) {
            Ordering::Greater => true,
            Ordering::Equal => self.is_start_inclusive(),
            Ordering::Less => false,
        };
        let before_end = match value.cmp(end) {
            Ordering::Less => true,
            Ordering::Equal => self.is_end_inclusive(),
            Ordering::Greater => false,
        };
        after_start && before_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_groups() {
        assert!(Operator::IsNull.is_null_test());
        assert!(Operator::IsNotNull.is_null_test());
        assert!(!Operator::Equal.is_null_test());

        assert!(Operator::GreaterThan.is_comparison());
        assert!(Operator::LessOrEqual.is_comparison());
        assert!(!Operator::Equal.is_comparison());
        assert!(!Operator::Between.is_comparison());

        assert!(Operator::Between.is_range());
        assert!(Operator::NotBetween.is_range());
        assert!(!Operator::In.is_range());

        assert!(Operator::In.is_membership());
        assert!(Operator::NotIn.is_membership());
        assert!(!Operator::NotEqual.is_membership());
    }

    #[test]
    fn operator_eval_ordering() {
        assert!(Operator::Equal.eval_ordering(Ordering::Equal));
        assert!(!Operator::Equal.eval_ordering(Ordering::Less));

        assert!(Operator::NotEqual.eval_ordering(Ordering::Greater));
        assert!(!Operator::NotEqual.eval_ordering(Ordering::Equal));

        assert!(Operator::GreaterThan.eval_ordering(Ordering::Greater));
        assert!(!Operator::GreaterThan.eval_ordering(Ordering::Equal));

        assert!(Operator::GreaterOrEqual.eval_ordering(Ordering::Equal));
        assert!(!Operator::GreaterOrEqual.eval_ordering(Ordering::Less));

        assert!(Operator::LessThan.eval_ordering(Ordering::Less));
        assert!(!Operator::LessThan.eval_ordering(Ordering::Equal));

        assert!(Operator::LessOrEqual.eval_ordering(Ordering::Equal));
        assert!(!Operator::LessOrEqual.eval_ordering(Ordering::Greater));

        // Not ordering based
        assert!(!Operator::In.eval_ordering(Ordering::Equal));
        assert!(!Operator::IsNull.eval_ordering(Ordering::Equal));
    }

    #[test]
    fn operator_display() {
        assert_eq!(Operator::GreaterOrEqual.to_string(), "greater_or_equal");
        assert_eq!(Operator::NotIn.to_string(), "not_in");
    }

    #[test]
    fn inclusion_default_is_half_open() {
        assert_eq!(Inclusion::default(), Inclusion::StartInclusiveEndExclusive);
    }

    #[test]
    fn inclusion_boundaries() {
        let open = Inclusion::StartExclusiveEndExclusive;
        assert!(!open.contains(&2, &5, &2));
        assert!(open.contains(&2, &5, &3));
        assert!(!open.contains(&2, &5, &5));

        let half = Inclusion::StartInclusiveEndExclusive;
        assert!(half.contains(&2, &5, &2));
        assert!(!half.contains(&2, &5, &5));

        let other_half = Inclusion::StartExclusiveEndInclusive;
        assert!(!other_half.contains(&2, &5, &2));
        assert!(other_half.contains(&2, &5, &5));

        let closed = Inclusion::StartInclusiveEndInclusive;
        assert!(closed.contains(&2, &5, &2));
        assert!(closed.contains(&2, &5, &5));
        assert!(!closed.contains(&2, &5, &1));
        assert!(!closed.contains(&2, &5, &6));
    }

    #[test]
    fn inverted_range_is_empty() {
        let closed = Inclusion::StartInclusiveEndInclusive;
        assert!(!closed.contains(&5, &2, &3));
        assert!(!closed.contains(&5, &2, &5));
    }
}
