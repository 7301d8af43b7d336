//! Property-based tests for fields, predicates, orderings and finders.

use std::cmp::Ordering;

use proptest::prelude::*;
use standout_field::{
    CandidateSupplier, ComparableField, EntityComparator, Field, ForeignKeyField, IdentityMapper,
    Inclusion, Predicate, Query, TableIdentifier,
};

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
struct Item {
    id: usize,
    value: Option<i64>,
    name: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Parent {
    key: i64,
}

#[derive(Debug, Clone, PartialEq)]
struct Child {
    id: usize,
    parent: Option<i64>,
}

fn value_field() -> Field<Item, i64, i64> {
    Field::builder()
        .identifier(TableIdentifier::named("items").unwrap().column("value").unwrap())
        .getter(|i: &Item| i.value)
        .setter(|i: &mut Item, v| i.value = Some(v))
        .type_mapper(IdentityMapper)
        .build()
        .unwrap()
}

fn name_field() -> Field<Item, String, String> {
    Field::builder()
        .identifier(TableIdentifier::named("items").unwrap().column("name").unwrap())
        .getter(|i: &Item| Some(i.name.clone()))
        .setter(|i: &mut Item, v| i.name = v)
        .type_mapper(IdentityMapper)
        .build()
        .unwrap()
}

fn parent_key() -> Field<Parent, i64, i64> {
    Field::builder()
        .identifier(TableIdentifier::named("parents").unwrap().column("key").unwrap())
        .getter(|p: &Parent| Some(p.key))
        .setter(|p: &mut Parent, v| p.key = v)
        .type_mapper(IdentityMapper)
        .unique(true)
        .build()
        .unwrap()
}

fn child_parent() -> ForeignKeyField<Child, i64, i64, Parent> {
    ForeignKeyField::builder()
        .identifier(TableIdentifier::named("children").unwrap().column("parent").unwrap())
        .getter(|c: &Child| c.parent)
        .setter(|c: &mut Child, v| c.parent = Some(v))
        .type_mapper(IdentityMapper)
        .referenced(&parent_key())
        .build()
        .unwrap()
}

fn inclusion_strategy() -> impl Strategy<Value = Inclusion> {
    prop_oneof![
        Just(Inclusion::StartExclusiveEndExclusive),
        Just(Inclusion::StartInclusiveEndExclusive),
        Just(Inclusion::StartExclusiveEndInclusive),
        Just(Inclusion::StartInclusiveEndInclusive),
    ]
}

// Small ranges so that equal values and matches are common
fn item_strategy() -> impl Strategy<Value = Item> {
    (prop::option::of(-20i64..20), "[a-c]{1,3}").prop_map(|(value, name)| Item {
        id: 0,
        value,
        name,
    })
}

fn items_strategy() -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec(item_strategy(), 0..40).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(id, item)| Item { id, ..item })
            .collect()
    })
}

fn children_strategy() -> impl Strategy<Value = Vec<Child>> {
    prop::collection::vec(prop::option::of(0i64..8), 0..30).prop_map(|parents| {
        parents
            .into_iter()
            .enumerate()
            .map(|(id, parent)| Child { id, parent })
            .collect()
    })
}

fn parents_strategy() -> impl Strategy<Value = Vec<Parent>> {
    prop::collection::btree_set(0i64..10, 0..10)
        .prop_map(|keys| keys.into_iter().map(|key| Parent { key }).collect::<Vec<_>>())
        .prop_shuffle()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Writing a value and reading it back yields the same value.
    #[test]
    fn setter_getter_round_trip(item in item_strategy(), v in any::<i64>()) {
        let field = value_field();
        let written = field.with(item, v);
        prop_assert_eq!(field.get(&written), Some(v));
    }

    /// Equal and NotEqual are exact negations, nulls included.
    #[test]
    fn equal_not_equal_negation(item in item_strategy(), x in -20i64..20) {
        let field = value_field();
        prop_assert_eq!(field.equal(x).test(&item), !field.not_equal(x).test(&item));
    }

    /// Between and NotBetween are exact negations, nulls included.
    #[test]
    fn between_not_between_negation(
        item in item_strategy(),
        start in -20i64..20,
        end in -20i64..20,
        inclusion in inclusion_strategy(),
    ) {
        let field = value_field();
        prop_assert_eq!(
            field.between(start, end, inclusion).test(&item),
            !field.not_between(start, end, inclusion).test(&item)
        );
    }

    /// In and NotIn are negations on non-null values and both reject null.
    #[test]
    fn in_not_in_negation(
        item in item_strategy(),
        set in prop::collection::vec(-20i64..20, 0..8),
    ) {
        let field = value_field();
        let in_set = field.in_set(set.clone()).test(&item);
        let not_in = field.not_in(set).test(&item);
        if item.value.is_some() {
            prop_assert_eq!(in_set, !not_in);
        } else {
            prop_assert!(!in_set);
            prop_assert!(!not_in);
        }
    }

    /// Comparisons agree with the natural ordering and never match null.
    #[test]
    fn comparisons_follow_natural_order(item in item_strategy(), x in -20i64..20) {
        let field = value_field();
        let gt = field.greater_than(x).test(&item);
        let ge = field.greater_or_equal(x).test(&item);
        let lt = field.less_than(x).test(&item);
        let le = field.less_or_equal(x).test(&item);
        match item.value {
            Some(v) => {
                prop_assert_eq!(gt, v > x);
                prop_assert_eq!(ge, v >= x);
                prop_assert_eq!(lt, v < x);
                prop_assert_eq!(le, v <= x);
            }
            None => prop_assert!(!(gt || ge || lt || le)),
        }
    }

    /// Swapping comparator operands negates the result.
    #[test]
    fn comparator_is_antisymmetric(a in item_strategy(), b in item_strategy(), reversed in any::<bool>()) {
        let field = value_field();
        for cmp in [field.comparator_nulls_first(), field.comparator_nulls_last()] {
            let cmp = if reversed { cmp.reversed() } else { cmp };
            prop_assert_eq!(cmp.compare(&a, &b), cmp.compare(&b, &a).reverse());
        }
    }

    /// Sorting with nulls first or last groups nulls and orders the rest.
    #[test]
    fn null_ordering_groups_nulls(items in items_strategy()) {
        let field = value_field();
        let nulls = items.iter().filter(|i| i.value.is_none()).count();
        let mut expected: Vec<i64> = items.iter().filter_map(|i| i.value).collect();
        expected.sort();

        let mut first = items.clone();
        field.comparator_nulls_first().sort(&mut first).unwrap();
        prop_assert!(first[..nulls].iter().all(|i| i.value.is_none()));
        let rest: Vec<i64> = first[nulls..].iter().filter_map(|i| i.value).collect();
        prop_assert_eq!(&rest, &expected);

        let mut last = items.clone();
        field.comparator_nulls_last().sort(&mut last).unwrap();
        let split = items.len() - nulls;
        prop_assert!(last[split..].iter().all(|i| i.value.is_none()));
        let rest: Vec<i64> = last[..split].iter().filter_map(|i| i.value).collect();
        prop_assert_eq!(&rest, &expected);
    }

    /// A comparator without null policy sorts exactly when no value is null.
    #[test]
    fn comparator_without_policy_rejects_nulls(items in items_strategy()) {
        let field = value_field();
        let has_null = items.iter().any(|i| i.value.is_none());
        let mut sorted = items.clone();
        let result = field.comparator().sort(&mut sorted);
        prop_assert_eq!(result.is_err(), has_null);
        if has_null {
            prop_assert_eq!(&sorted, &items);
        }
    }

    /// A null foreign key finds nothing, whatever the candidates.
    #[test]
    fn null_key_finds_nothing(parents in parents_strategy()) {
        let finder = child_parent().finder(
            TableIdentifier::named("parents").unwrap(),
            CandidateSupplier::from_vec(parents),
        );
        let orphan = Child { id: 0, parent: None };
        prop_assert_eq!(finder.find(&orphan).count(), 0);
        prop_assert_eq!(finder.find_one(&orphan).unwrap(), None);
    }

    /// The backward finder returns exactly the children the forward finder
    /// maps to the given parent.
    #[test]
    fn forward_backward_symmetry(parents in parents_strategy(), children in children_strategy()) {
        let fk = child_parent();
        let forward = fk.finder(
            TableIdentifier::named("parents").unwrap(),
            CandidateSupplier::from_vec(parents.clone()),
        );
        let backward = fk.backward_finder(
            TableIdentifier::named("children").unwrap(),
            CandidateSupplier::from_vec(children.clone()),
        );

        for parent in &parents {
            let mut via_backward: Vec<usize> = backward.find(parent).map(|c| c.id).collect();
            let mut via_forward: Vec<usize> = children
                .iter()
                .filter(|c| forward.find(c).any(|p| &p == parent))
                .map(|c| c.id)
                .collect();
            via_backward.sort_unstable();
            via_forward.sort_unstable();
            prop_assert_eq!(via_backward, via_forward);
        }
    }

    /// The single-result finder returns the first element of the full stream.
    #[test]
    fn find_one_is_first_of_find(parents in parents_strategy(), children in children_strategy()) {
        let finder = child_parent().finder(
            TableIdentifier::named("parents").unwrap(),
            CandidateSupplier::from_vec(parents),
        );
        for child in &children {
            let first = finder.find(child).next();
            prop_assert_eq!(finder.find_one(child).unwrap(), first);
        }
    }

    /// Query results never exceed the input and respect limit.
    #[test]
    fn query_limit_respects_bound(items in items_strategy(), x in -20i64..20, limit in 0usize..10) {
        let query = Query::new()
            .and(value_field().greater_or_equal(x))
            .limit(limit)
            .build();
        let results = query.filter(&items);
        prop_assert!(results.len() <= limit);
        prop_assert!(results.len() <= items.len());
    }

    /// Count, any and first agree with the filtered results.
    #[test]
    fn query_terminal_operations_agree(items in items_strategy(), x in -20i64..20) {
        let query = Query::new()
            .or(value_field().less_than(x))
            .or(name_field().equal("a".to_string()))
            .not(value_field().is_null())
            .build();
        let filtered = query.filter(&items);

        prop_assert_eq!(query.count(items.clone()), filtered.len());
        prop_assert_eq!(query.any(items.clone()), !filtered.is_empty());
        prop_assert_eq!(query.all(items.clone()), filtered.len() == items.len());
        let first = query.first(items.clone());
        prop_assert_eq!(first.as_ref(), filtered.first().copied());
    }

    /// Query ordering is stable across multiple keys.
    #[test]
    fn query_ordering_is_stable(items in items_strategy()) {
        let query = Query::new()
            .order_by(value_field().comparator_nulls_last())
            .build();
        let results = query.filter(&items);

        for pair in results.windows(2) {
            let (prev, curr) = (pair[0], pair[1]);
            let ordering = value_field().comparator_nulls_last().compare(prev, curr);
            prop_assert_ne!(ordering, Ordering::Greater);
            if ordering == Ordering::Equal {
                prop_assert!(prev.id < curr.id, "stable sort violated");
            }
        }
    }
}
