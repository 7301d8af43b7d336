//! Text predicates for string-valued fields.
//!
//! Any [`ComparableField`] whose value is string-like gets the
//! [`StringField`] methods. Nulls never match a text predicate.
//!
//! ```
//! use standout_field::{Field, IdentityMapper, Predicate, StringField, TableIdentifier};
//!
//! let name: Field<String, String, String> = Field::builder()
//!     .identifier(TableIdentifier::named("tags").unwrap().column("name").unwrap())
//!     .getter(|s: &String| Some(s.clone()))
//!     .setter(|s: &mut String, v| *s = v)
//!     .type_mapper(IdentityMapper)
//!     .build()
//!     .unwrap();
//!
//! assert!(name.starts_with("rust").test(&"rustacean".to_string()));
//! assert!(name.matches(r"^\d+$").unwrap().test(&"2024".to_string()));
//! assert!(name.matches("(").is_err());
//! ```

use std::fmt;

use regex::Regex;

use crate::error::Result;
use crate::field::{ComparableField, FieldRef};
use crate::identifier::ColumnIdentifier;
use crate::predicate::Predicate;

/// Text test carried by a [`StringPredicate`].
#[derive(Debug, Clone)]
pub enum StringOp {
    StartsWith(String),
    EndsWith(String),
    Contains(String),
    /// Holds the operand already lowercased.
    EqualIgnoreCase(String),
    Matches(Regex),
}

impl StringOp {
    /// Returns the display name of this operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StringOp::StartsWith(_) => "starts_with",
            StringOp::EndsWith(_) => "ends_with",
            StringOp::Contains(_) => "contains",
            StringOp::EqualIgnoreCase(_) => "equal_ignore_case",
            StringOp::Matches(_) => "matches",
        }
    }

    /// Tests a non-null value.
    pub fn eval(&self, value: &str) -> bool {
        match self {
            StringOp::StartsWith(pattern) => value.starts_with(pattern.as_str()),
            StringOp::EndsWith(pattern) => value.ends_with(pattern.as_str()),
            StringOp::Contains(pattern) => value.contains(pattern.as_str()),
            StringOp::EqualIgnoreCase(lowered) => value.to_lowercase() == *lowered,
            StringOp::Matches(regex) => regex.is_match(value),
        }
    }
}

/// A text predicate bound to one field.
pub struct StringPredicate<E, V> {
    field: FieldRef<E, V>,
    op: StringOp,
}

impl<E, V: AsRef<str>> StringPredicate<E, V> {
    pub fn new(field: FieldRef<E, V>, op: StringOp) -> Self {
        StringPredicate { field, op }
    }

    pub fn field(&self) -> &FieldRef<E, V> {
        &self.field
    }

    pub fn identifier(&self) -> &ColumnIdentifier {
        self.field.identifier()
    }

    pub fn op(&self) -> &StringOp {
        &self.op
    }
}

impl<E, V: AsRef<str>> Predicate<E> for StringPredicate<E, V> {
    fn test(&self, entity: &E) -> bool {
        match self.field.get(entity) {
            Some(value) => self.op.eval(value.as_ref()),
            None => false,
        }
    }
}

impl<E, V> Clone for StringPredicate<E, V> {
    fn clone(&self) -> Self {
        StringPredicate {
            field: self.field.clone(),
            op: self.op.clone(),
        }
    }
}

impl<E, V> fmt::Debug for StringPredicate<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringPredicate")
            .field("identifier", self.field.identifier())
            .field("op", &self.op)
            .finish()
    }
}

/// Text operators for string-valued fields.
pub trait StringField<E, V>: ComparableField<E, V>
where
    V: Ord + AsRef<str>,
{
    fn starts_with(&self, prefix: impl Into<String>) -> StringPredicate<E, V> {
        StringPredicate::new(self.field_ref(), StringOp::StartsWith(prefix.into()))
    }

    fn ends_with(&self, suffix: impl Into<String>) -> StringPredicate<E, V> {
        StringPredicate::new(self.field_ref(), StringOp::EndsWith(suffix.into()))
    }

    fn contains(&self, needle: impl Into<String>) -> StringPredicate<E, V> {
        StringPredicate::new(self.field_ref(), StringOp::Contains(needle.into()))
    }

    /// Case-insensitive equality, comparing lowercased text.
    fn equal_ignore_case(&self, value: impl Into<String>) -> StringPredicate<E, V> {
        let lowered = value.into().to_lowercase();
        StringPredicate::new(self.field_ref(), StringOp::EqualIgnoreCase(lowered))
    }

    /// Matches values containing a match of `pattern`.
    ///
    /// Returns [`FieldError::InvalidPattern`](crate::FieldError::InvalidPattern)
    /// if the pattern does not compile.
    fn matches(&self, pattern: &str) -> Result<StringPredicate<E, V>> {
        let regex = Regex::new(pattern)?;
        Ok(StringPredicate::new(self.field_ref(), StringOp::Matches(regex)))
    }
}

impl<E, V, F> StringField<E, V> for F
where
    F: ComparableField<E, V> + ?Sized,
    V: Ord + AsRef<str>,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldError;
    use crate::field::Getter;
    use crate::identifier::TableIdentifier;
    use std::sync::Arc;

    fn title() -> FieldRef<Option<String>, String> {
        let getter: Getter<Option<String>, String> = Arc::new(|v: &Option<String>| v.clone());
        let column = TableIdentifier::named("books")
            .unwrap()
            .column("title")
            .unwrap();
        FieldRef::new(column, getter, false)
    }

    fn book(title: &str) -> Option<String> {
        Some(title.to_string())
    }

    #[test]
    fn prefix_suffix_contains() {
        let field = title();
        let dune = book("Dune Messiah");

        assert!(field.starts_with("Dune").test(&dune));
        assert!(!field.starts_with("Messiah").test(&dune));
        assert!(field.ends_with("Messiah").test(&dune));
        assert!(field.contains("e M").test(&dune));
        assert!(!field.contains("dune").test(&dune));
    }

    #[test]
    fn equal_ignore_case() {
        let field = title();
        let pred = field.equal_ignore_case("DUNE");
        assert!(pred.test(&book("dune")));
        assert!(pred.test(&book("Dune")));
        assert!(!pred.test(&book("Dunes")));
    }

    #[test]
    fn regex_match() {
        let field = title();
        let pred = field.matches(r"^\w+ \w+$").unwrap();
        assert!(pred.test(&book("Dune Messiah")));
        assert!(!pred.test(&book("Dune")));
        assert_eq!(pred.op().as_str(), "matches");
    }

    #[test]
    fn invalid_regex_is_an_error() {
        let result = title().matches("[unclosed");
        assert!(matches!(result, Err(FieldError::InvalidPattern(_))));
    }

    #[test]
    fn null_never_matches() {
        let field = title();
        assert!(!field.starts_with("").test(&None));
        assert!(!field.contains("").test(&None));
        assert!(!field.equal_ignore_case("").test(&None));
        assert!(!field.matches(".*").unwrap().test(&None));
    }
}
