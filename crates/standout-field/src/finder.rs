//! Relationship traversal through foreign-key fields.
//!
//! A [`FindFrom`] goes from an entity to the entities its foreign key points
//! at; a [`BackwardFinder`] goes the other way, from a referenced entity to
//! everything that references it. Both pull candidates from a
//! [`CandidateSupplier`] that is invoked fresh on every call and filter them
//! lazily with an equality predicate on the shared value.
//!
//! A null key is never an error: it resolves to an empty stream and the
//! supplier is not invoked at all.

use std::fmt;
use std::sync::Arc;

use crate::error::{FieldError, Result};
use crate::field::{ComparableField, FieldRef};
use crate::identifier::TableIdentifier;
use crate::predicate::Predicate;

/// A lazy, single-pass sequence of entities.
pub type EntityStream<T> = Box<dyn Iterator<Item = T> + Send>;

/// Externally owned source of candidate entities.
///
/// Every call to [`supply`](CandidateSupplier::supply) produces a fresh
/// stream. Nothing is cached between calls.
pub struct CandidateSupplier<T> {
    supply: Arc<dyn Fn() -> EntityStream<T> + Send + Sync>,
}

impl<T: 'static> CandidateSupplier<T> {
    /// Wraps a function producing a fresh sequence on each invocation.
    pub fn new<F, I>(supply: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        CandidateSupplier {
            supply: Arc::new(move || Box::new(supply().into_iter()) as EntityStream<T>),
        }
    }

    /// Supplies clones of a shared, fixed collection.
    pub fn from_shared(items: Arc<[T]>) -> Self
    where
        T: Clone + Send + Sync,
    {
        CandidateSupplier::new(move || {
            let items = Arc::clone(&items);
            (0..items.len()).map(move |i| items[i].clone())
        })
    }

    pub fn from_vec(items: Vec<T>) -> Self
    where
        T: Clone + Send + Sync,
    {
        CandidateSupplier::from_shared(items.into())
    }

    /// Produces a fresh candidate stream.
    pub fn supply(&self) -> EntityStream<T> {
        (self.supply)()
    }
}

impl<T> Clone for CandidateSupplier<T> {
    fn clone(&self) -> Self {
        CandidateSupplier {
            supply: Arc::clone(&self.supply),
        }
    }
}

impl<T> fmt::Debug for CandidateSupplier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateSupplier").finish_non_exhaustive()
    }
}

/// Forward finder: from an entity to the entities its key references.
///
/// `source` is the foreign key on `E`, `target` the referenced field on `FK`.
pub struct FindFrom<E, FK, V> {
    source: FieldRef<E, V>,
    target: FieldRef<FK, V>,
    table: TableIdentifier,
    supplier: CandidateSupplier<FK>,
}

impl<E, FK, V> FindFrom<E, FK, V>
where
    FK: 'static,
    V: Ord + Send + 'static,
{
    pub fn new(
        source: FieldRef<E, V>,
        target: FieldRef<FK, V>,
        table: TableIdentifier,
        supplier: CandidateSupplier<FK>,
    ) -> Self {
        FindFrom {
            source,
            target,
            table,
            supplier,
        }
    }

    pub fn source_field(&self) -> &FieldRef<E, V> {
        &self.source
    }

    pub fn target_field(&self) -> &FieldRef<FK, V> {
        &self.target
    }

    /// The table candidates are drawn from.
    pub fn table_identifier(&self) -> &TableIdentifier {
        &self.table
    }

    /// Returns `true` if at most one entity can be found per key.
    ///
    /// Either the referenced field or the relationship itself (the foreign
    /// key field) may carry the unique flag.
    pub fn is_unique(&self) -> bool {
        self.target.is_unique() || self.source.is_unique()
    }

    /// Lazily resolves the entities `source` references.
    pub fn find(&self, source: &E) -> EntityStream<FK> {
        let key = self.source.get(source);
        tracing::trace!(
            column = %self.source.identifier(),
            table = %self.table,
            null_key = key.is_none(),
            "resolving forward finder"
        );
        match key {
            Some(key) => filter_candidates(self.supplier.supply(), self.target.equal(key)),
            None => Box::new(std::iter::empty()),
        }
    }

    /// Resolves the single entity `source` references.
    ///
    /// Stops at the first match. Returns [`FieldError::NotUnique`] if neither
    /// the referenced field nor the relationship is unique.
    pub fn find_one(&self, source: &E) -> Result<Option<FK>> {
        if !self.is_unique() {
            return Err(FieldError::NotUnique {
                column: self.target.identifier().clone(),
            });
        }
        Ok(self.find(source).next())
    }
}

impl<E, FK, V> Clone for FindFrom<E, FK, V> {
    fn clone(&self) -> Self {
        FindFrom {
            source: self.source.clone(),
            target: self.target.clone(),
            table: self.table.clone(),
            supplier: self.supplier.clone(),
        }
    }
}

impl<E, FK, V> fmt::Debug for FindFrom<E, FK, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FindFrom")
            .field("source", self.source.identifier())
            .field("target", self.target.identifier())
            .field("table", &self.table)
            .finish()
    }
}

/// Backward finder: from a referenced entity to the entities referencing it.
///
/// No uniqueness is assumed; one target may be referenced many times.
pub struct BackwardFinder<FK, E, V> {
    referencing: FieldRef<E, V>,
    referenced: FieldRef<FK, V>,
    table: TableIdentifier,
    supplier: CandidateSupplier<E>,
}

impl<FK, E, V> BackwardFinder<FK, E, V>
where
    E: 'static,
    V: Ord + Send + 'static,
{
    pub fn new(
        referencing: FieldRef<E, V>,
        referenced: FieldRef<FK, V>,
        table: TableIdentifier,
        supplier: CandidateSupplier<E>,
    ) -> Self {
        BackwardFinder {
            referencing,
            referenced,
            table,
            supplier,
        }
    }

    /// The foreign key on the referencing entity.
    pub fn referencing_field(&self) -> &FieldRef<E, V> {
        &self.referencing
    }

    /// The field the foreign key points at.
    pub fn referenced_field(&self) -> &FieldRef<FK, V> {
        &self.referenced
    }

    pub fn table_identifier(&self) -> &TableIdentifier {
        &self.table
    }

    /// Lazily resolves every entity referencing `target`.
    pub fn find(&self, target: &FK) -> EntityStream<E> {
        let key = self.referenced.get(target);
        tracing::trace!(
            column = %self.referencing.identifier(),
            table = %self.table,
            null_key = key.is_none(),
            "resolving backward finder"
        );
        match key {
            Some(key) => filter_candidates(self.supplier.supply(), self.referencing.equal(key)),
            None => Box::new(std::iter::empty()),
        }
    }
}

impl<FK, E, V> Clone for BackwardFinder<FK, E, V> {
    fn clone(&self) -> Self {
        BackwardFinder {
            referencing: self.referencing.clone(),
            referenced: self.referenced.clone(),
            table: self.table.clone(),
            supplier: self.supplier.clone(),
        }
    }
}

impl<FK, E, V> fmt::Debug for BackwardFinder<FK, E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackwardFinder")
            .field("referencing", self.referencing.identifier())
            .field("referenced", self.referenced.identifier())
            .field("table", &self.table)
            .finish()
    }
}

fn filter_candidates<T, P>(candidates: EntityStream<T>, predicate: P) -> EntityStream<T>
where
    T: 'static,
    P: Predicate<T> + Send + 'static,
{
    Box::new(candidates.filter(move |candidate| predicate.test(candidate)))
}
