//! Field - Typed fields, predicates, orderings and relationship finders.
//!
//! Field describes entity properties as typed accessors and builds
//! everything needed to query and relate in-memory or streamed collections
//! of those entities. It supports:
//!
//! - Typed fields with getters, setters and stored-type mapping
//! - Null-aware predicates: equality, comparison, ranges, set membership
//! - Text predicates, including regex
//! - Comparators with configurable null placement
//! - Forward and backward foreign-key finders over lazy candidate sequences
//! - Queries with AND, OR, NOT predicate groups, ordering and pagination
//!
//! # Quick Start
//!
//! ```rust
//! use standout_field::{
//!     CandidateSupplier, ComparableField, Field, ForeignKeyField, IdentityMapper, Predicate,
//!     Query, TableIdentifier,
//! };
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Customer {
//!     id: u32,
//!     name: String,
//! }
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Order {
//!     number: u32,
//!     customer_id: Option<u32>,
//! }
//!
//! let customers = TableIdentifier::named("customers").unwrap();
//! let orders = TableIdentifier::named("orders").unwrap();
//!
//! let customer_id: Field<Customer, u32, u32> = Field::builder()
//!     .identifier(customers.column("id").unwrap())
//!     .getter(|c: &Customer| Some(c.id))
//!     .setter(|c: &mut Customer, v| c.id = v)
//!     .type_mapper(IdentityMapper)
//!     .unique(true)
//!     .build()
//!     .unwrap();
//!
//! let order_customer: ForeignKeyField<Order, u32, u32, Customer> = ForeignKeyField::builder()
//!     .identifier(orders.column("customer_id").unwrap())
//!     .getter(|o: &Order| o.customer_id)
//!     .setter(|o: &mut Order, v| o.customer_id = Some(v))
//!     .type_mapper(IdentityMapper)
//!     .referenced(&customer_id)
//!     .build()
//!     .unwrap();
//!
//! let all_customers = vec![
//!     Customer { id: 1, name: "Ada".into() },
//!     Customer { id: 2, name: "Brian".into() },
//! ];
//! let all_orders = vec![
//!     Order { number: 10, customer_id: Some(2) },
//!     Order { number: 11, customer_id: None },
//!     Order { number: 12, customer_id: Some(2) },
//! ];
//!
//! // Order -> Customer
//! let customer_of = order_customer.finder(
//!     customers.clone(),
//!     CandidateSupplier::from_vec(all_customers.clone()),
//! );
//! let brian = customer_of.find_one(&all_orders[0]).unwrap().unwrap();
//! assert_eq!(brian.name, "Brian");
//! assert_eq!(customer_of.find_one(&all_orders[1]).unwrap(), None);
//!
//! // Customer -> Orders
//! let orders_of = order_customer.backward_finder(
//!     orders.clone(),
//!     CandidateSupplier::from_vec(all_orders.clone()),
//! );
//! assert_eq!(orders_of.find(&brian).count(), 2);
//!
//! // Filtering and ordering
//! let query = Query::new()
//!     .and(order_customer.is_not_null())
//!     .order_by(order_customer.comparator_nulls_last().reversed())
//!     .build();
//! assert_eq!(query.count(all_orders.clone()), 2);
//! assert!(order_customer.equal(2).test(&all_orders[2]));
//! ```
//!
//! # Null Semantics
//!
//! A getter returning `None` means the field is null. Predicates treat it
//! as follows:
//!
//! | Operator | Null matches |
//! |----------|--------------|
//! | `IsNull` / `IsNotNull` | yes / no |
//! | `Equal` / `NotEqual` | no / yes |
//! | `GreaterThan`, `GreaterOrEqual`, `LessThan`, `LessOrEqual` | no |
//! | `Between` / `NotBetween` | no / yes |
//! | `In` | only if the set includes null |
//! | `NotIn` | no |
//! | string operators | no |
//!
//! Comparators place nulls first or last. A comparator built without a null
//! policy fails on a null: see [`FieldComparator`].
//!
//! # Query Semantics
//!
//! Queries combine three predicate groups with fixed logic:
//!
//! ```text
//! match = (all AND predicates match)
//!       ∧ (at least one OR predicate matches, OR no OR predicates exist)
//!       ∧ (no NOT predicate matches)
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for identifiers and operator metadata.

mod error;
mod field;
mod finder;
mod foreign_key;
mod identifier;
mod mapper;
mod op;
mod ordering;
mod predicate;
mod query;
mod string;

// Re-export public API
pub use error::{FieldError, Result};
pub use field::{ComparableField, Field, FieldBuilder, FieldRef, Getter, Setter};
pub use finder::{BackwardFinder, CandidateSupplier, EntityStream, FindFrom};
pub use foreign_key::{ForeignKeyField, ForeignKeyFieldBuilder};
pub use identifier::{ColumnIdentifier, TableIdentifier};
pub use mapper::{FnMapper, IdentityMapper, TypeMapper};
pub use op::{Inclusion, Operator};
pub use ordering::{compare_by, Dir, EntityComparator, FieldComparator, NullOrder};
pub use predicate::{And, FieldPredicate, Not, Or, Predicate, PredicateKind, ValueSet};
pub use query::{Query, SharedComparator, SharedPredicate};
pub use string::{StringField, StringOp, StringPredicate};
