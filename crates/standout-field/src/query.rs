//! Query builder and executor.
//!
//! A [`Query`] groups typed predicates and orderings over one entity type
//! and runs them against slices or lazy sequences.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::ordering::{compare_by, EntityComparator};
use crate::predicate::Predicate;

/// A predicate shared between queries.
pub type SharedPredicate<E> = Arc<dyn Predicate<E> + Send + Sync>;

/// A comparator shared between queries.
pub type SharedComparator<E> = Arc<dyn EntityComparator<E> + Send + Sync>;

/// A query for filtering and ordering entities.
///
/// Queries consist of three predicate groups:
/// - **AND**: All predicates must match
/// - **OR**: At least one predicate must match (or none if empty)
/// - **NOT**: No predicate may match
///
/// The overall match logic is:
/// ```text
/// match = (all AND predicates match)
///       ∧ (at least one OR predicate matches, OR no OR predicates exist)
///       ∧ (no NOT predicate matches)
/// ```
///
/// Orderings are applied in sequence, later ones breaking ties of earlier
/// ones. Sorting is stable.
///
/// # Example
///
/// ```
/// use standout_field::{ComparableField, Field, IdentityMapper, Query, TableIdentifier};
///
/// #[derive(Debug, Clone, Default)]
/// struct Ticket {
///     priority: i64,
///     assignee: Option<String>,
/// }
///
/// let tickets = TableIdentifier::named("tickets").unwrap();
/// let priority: Field<Ticket, i64, i64> = Field::builder()
///     .identifier(tickets.column("priority").unwrap())
///     .getter(|t: &Ticket| Some(t.priority))
///     .setter(|t: &mut Ticket, v| t.priority = v)
///     .type_mapper(IdentityMapper)
///     .build()
///     .unwrap();
/// let assignee: Field<Ticket, String, String> = Field::builder()
///     .identifier(tickets.column("assignee").unwrap())
///     .getter(|t: &Ticket| t.assignee.clone())
///     .setter(|t: &mut Ticket, v| t.assignee = Some(v))
///     .type_mapper(IdentityMapper)
///     .build()
///     .unwrap();
///
/// let query = Query::new()
///     .and(priority.greater_or_equal(3))
///     .not(assignee.is_not_null())
///     .order_by(priority.comparator().reversed())
///     .limit(10)
///     .build();
///
/// let open = vec![
///     Ticket { priority: 5, assignee: None },
///     Ticket { priority: 1, assignee: None },
///     Ticket { priority: 4, assignee: Some("kim".into()) },
///     Ticket { priority: 9, assignee: None },
/// ];
/// let picked: Vec<i64> = query.filter(&open).iter().map(|t| t.priority).collect();
/// assert_eq!(picked, vec![9, 5]);
/// ```
pub struct Query<E> {
    and_predicates: Vec<SharedPredicate<E>>,
    or_predicates: Vec<SharedPredicate<E>>,
    not_predicates: Vec<SharedPredicate<E>>,
    orderings: Vec<SharedComparator<E>>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl<E> Query<E> {
    /// Creates a new empty query.
    ///
    /// An empty query matches all entities.
    pub fn new() -> Self {
        Query {
            and_predicates: Vec::new(),
            or_predicates: Vec::new(),
            not_predicates: Vec::new(),
            orderings: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    // ========================================================================
    // Predicate builders
    // ========================================================================

    /// Adds an AND predicate.
    ///
    /// All AND predicates must match for an entity to be included.
    pub fn and<P>(mut self, predicate: P) -> Self
    where
        P: Predicate<E> + Send + Sync + 'static,
    {
        self.and_predicates.push(Arc::new(predicate));
        self
    }

    /// Adds an OR predicate.
    ///
    /// At least one OR predicate must match (unless there are none).
    pub fn or<P>(mut self, predicate: P) -> Self
    where
        P: Predicate<E> + Send + Sync + 'static,
    {
        self.or_predicates.push(Arc::new(predicate));
        self
    }

    /// Adds a NOT predicate.
    ///
    /// An entity matching any NOT predicate is excluded.
    pub fn not<P>(mut self, predicate: P) -> Self
    where
        P: Predicate<E> + Send + Sync + 'static,
    {
        self.not_predicates.push(Arc::new(predicate));
        self
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    /// Adds an ordering.
    pub fn order_by<C>(mut self, comparator: C) -> Self
    where
        C: EntityComparator<E> + Send + Sync + 'static,
    {
        self.orderings.push(Arc::new(comparator));
        self
    }

    // ========================================================================
    // Pagination
    // ========================================================================

    /// Sets the maximum number of results.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets the number of results to skip.
    pub fn offset(mut self, n: usize) -> Self {
        self.offset = Some(n);
        self
    }

    /// Finalizes the query.
    pub fn build(self) -> Self {
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    pub fn and_predicates(&self) -> &[SharedPredicate<E>] {
        &self.and_predicates
    }

    pub fn or_predicates(&self) -> &[SharedPredicate<E>] {
        &self.or_predicates
    }

    pub fn not_predicates(&self) -> &[SharedPredicate<E>] {
        &self.not_predicates
    }

    pub fn orderings(&self) -> &[SharedComparator<E>] {
        &self.orderings
    }

    pub fn get_limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn get_offset(&self) -> Option<usize> {
        self.offset
    }

    /// Returns `true` if this query has no predicates (matches everything).
    pub fn is_empty(&self) -> bool {
        self.and_predicates.is_empty()
            && self.or_predicates.is_empty()
            && self.not_predicates.is_empty()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests if a single entity matches this query.
    pub fn matches(&self, entity: &E) -> bool {
        self.and_predicates.iter().all(|p| p.test(entity))
            && (self.or_predicates.is_empty() || self.or_predicates.iter().any(|p| p.test(entity)))
            && !self.not_predicates.iter().any(|p| p.test(entity))
    }

    /// Filters a slice, returning references to matching entities.
    ///
    /// Results are sorted by the query's orderings, then offset and limit
    /// are applied.
    ///
    /// # Panics
    ///
    /// Panics if an ordering cannot compare two matches; use
    /// [`try_filter`](Self::try_filter) to get the error instead.
    pub fn filter<'a>(&self, entities: &'a [E]) -> Vec<&'a E> {
        let mut results: Vec<&'a E> = entities.iter().filter(|e| self.matches(e)).collect();
        if !self.orderings.is_empty() {
            results.sort_by(|a, b| self.compare(a, b));
        }
        self.paginate(results)
    }

    /// Like [`filter`](Self::filter), but reports an ordering that cannot
    /// compare the matches instead of panicking.
    pub fn try_filter<'a>(&self, entities: &'a [E]) -> Result<Vec<&'a E>> {
        let mut results: Vec<&'a E> = entities.iter().filter(|e| self.matches(e)).collect();
        self.try_sort(&mut results, |e| *e)?;
        Ok(self.paginate(results))
    }

    /// Filters and clones matching entities.
    ///
    /// # Panics
    ///
    /// Same as [`filter`](Self::filter).
    pub fn filter_cloned(&self, entities: &[E]) -> Vec<E>
    where
        E: Clone,
    {
        self.filter(entities).into_iter().cloned().collect()
    }

    /// Lazily yields the matching entities of a sequence.
    ///
    /// No ordering, offset or limit is applied.
    pub fn stream<'q, I>(&'q self, entities: I) -> impl Iterator<Item = E> + 'q
    where
        I: IntoIterator<Item = E>,
        I::IntoIter: 'q,
    {
        entities.into_iter().filter(move |e| self.matches(e))
    }

    /// Drains a sequence into the sorted, paginated matches.
    ///
    /// # Panics
    ///
    /// Same as [`filter`](Self::filter).
    pub fn collect<I>(&self, entities: I) -> Vec<E>
    where
        I: IntoIterator<Item = E>,
    {
        let mut results: Vec<E> = self.stream(entities).collect();
        if !self.orderings.is_empty() {
            results.sort_by(|a, b| self.compare(a, b));
        }
        self.paginate(results)
    }

    /// Like [`collect`](Self::collect), but reports an ordering that cannot
    /// compare the matches instead of panicking.
    pub fn try_collect<I>(&self, entities: I) -> Result<Vec<E>>
    where
        I: IntoIterator<Item = E>,
    {
        let mut results: Vec<E> = self.stream(entities).collect();
        self.try_sort(&mut results, |e| e)?;
        Ok(self.paginate(results))
    }

    /// Counts the matching entities.
    pub fn count<I>(&self, entities: I) -> usize
    where
        I: IntoIterator<Item = E>,
    {
        self.stream(entities).count()
    }

    /// Returns `true` if any entity matches.
    pub fn any<I>(&self, entities: I) -> bool
    where
        I: IntoIterator<Item = E>,
    {
        entities.into_iter().any(|e| self.matches(&e))
    }

    /// Returns `true` if all entities match.
    pub fn all<I>(&self, entities: I) -> bool
    where
        I: IntoIterator<Item = E>,
    {
        entities.into_iter().all(|e| self.matches(&e))
    }

    /// Returns the first matching entity in sequence order.
    pub fn first<I>(&self, entities: I) -> Option<E>
    where
        I: IntoIterator<Item = E>,
    {
        self.stream(entities).next()
    }

    fn compare(&self, a: &E, b: &E) -> std::cmp::Ordering {
        self.orderings
            .iter()
            .map(|c| c.compare(a, b))
            .find(|o| o.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    }

    // Every comparator is checked against each item before sorting, so a failure
    // leaves `items` in its original order.
    fn try_sort<T>(&self, items: &mut [T], entity: impl Fn(&T) -> &E) -> Result<()> {
        if self.orderings.is_empty() {
            return Ok(());
        }
        for item in items.iter() {
            compare_by(entity(item), entity(item), &self.orderings)?;
        }
        items.sort_by(|a, b| self.compare(entity(a), entity(b)));
        Ok(())
    }

    fn paginate<T>(&self, results: Vec<T>) -> Vec<T> {
        let offset = self.offset.unwrap_or(0);
        let limit = self.limit.unwrap_or(usize::MAX);
        results.into_iter().skip(offset).take(limit).collect()
    }
}

impl<E> Default for Query<E> {
    fn default() -> Self {
        Query::new()
    }
}

impl<E> Clone for Query<E> {
    fn clone(&self) -> Self {
        Query {
            and_predicates: self.and_predicates.clone(),
            or_predicates: self.or_predicates.clone(),
            not_predicates: self.not_predicates.clone(),
            orderings: self.orderings.clone(),
            limit: self.limit,
            offset: self.offset,
        }
    }
}

impl<E> fmt::Debug for Query<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("and_predicates", &self.and_predicates.len())
            .field("or_predicates", &self.or_predicates.len())
            .field("not_predicates", &self.not_predicates.len())
            .field("orderings", &self.orderings.len())
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .finish()
    }
}
