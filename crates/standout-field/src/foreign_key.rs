//! Foreign-key fields.
//!
//! A [`ForeignKeyField`] is a [`Field`] on `E` that also knows which field
//! of `FK` it points at. The value type `V` is shared by both sides, so a
//! relationship can only be built between columns of the same domain type.

use std::fmt;

use crate::error::Result;
use crate::field::{require, ComparableField, Field, FieldBuilder, FieldRef, Getter};
use crate::finder::{BackwardFinder, CandidateSupplier, FindFrom};
use crate::identifier::{ColumnIdentifier, TableIdentifier};
use crate::mapper::TypeMapper;

/// A typed relationship edge from `E` to `FK` through values of type `V`.
pub struct ForeignKeyField<E, D, V, FK> {
    field: Field<E, D, V>,
    referenced: FieldRef<FK, V>,
}

impl<E, D, V, FK> ForeignKeyField<E, D, V, FK> {
    /// Starts building a foreign key. The referenced field is required in
    /// addition to everything a plain [`Field`] needs.
    pub fn builder() -> ForeignKeyFieldBuilder<E, D, V, FK> {
        ForeignKeyFieldBuilder::new()
    }

    /// The underlying field on `E`.
    pub fn field(&self) -> &Field<E, D, V> {
        &self.field
    }

    /// The field on `FK` this key points at.
    pub fn referenced(&self) -> &FieldRef<FK, V> {
        &self.referenced
    }

    pub fn get(&self, entity: &E) -> Option<V> {
        self.field.get(entity)
    }

    pub fn set(&self, entity: &mut E, value: V) {
        self.field.set(entity, value)
    }

    pub fn with(&self, entity: E, value: V) -> E {
        self.field.with(entity, value)
    }
}

impl<E, D, V, FK> ForeignKeyField<E, D, V, FK>
where
    E: 'static,
    FK: 'static,
    V: Ord + Send + 'static,
{
    /// Forward finder resolving the `FK` entities an `E` points at.
    ///
    /// `table` names where the candidates live.
    pub fn finder(
        &self,
        table: TableIdentifier,
        supplier: CandidateSupplier<FK>,
    ) -> FindFrom<E, FK, V> {
        FindFrom::new(
            self.field.field_ref(),
            self.referenced.clone(),
            table,
            supplier,
        )
    }

    /// Backward finder resolving the `E` entities pointing at an `FK`.
    pub fn backward_finder(
        &self,
        table: TableIdentifier,
        supplier: CandidateSupplier<E>,
    ) -> BackwardFinder<FK, E, V> {
        BackwardFinder::new(
            self.field.field_ref(),
            self.referenced.clone(),
            table,
            supplier,
        )
    }
}

impl<E, D, V: Ord, FK> ComparableField<E, V> for ForeignKeyField<E, D, V, FK> {
    fn identifier(&self) -> &ColumnIdentifier {
        self.field.identifier()
    }

    fn getter(&self) -> &Getter<E, V> {
        self.field.getter()
    }

    fn is_unique(&self) -> bool {
        self.field.is_unique()
    }
}

impl<E, D, V, FK> Clone for ForeignKeyField<E, D, V, FK> {
    fn clone(&self) -> Self {
        ForeignKeyField {
            field: self.field.clone(),
            referenced: self.referenced.clone(),
        }
    }
}

impl<E, D, V, FK> fmt::Debug for ForeignKeyField<E, D, V, FK> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignKeyField")
            .field("field", &self.field)
            .field("referenced", &self.referenced)
            .finish()
    }
}

/// Builder for [`ForeignKeyField`].
pub struct ForeignKeyFieldBuilder<E, D, V, FK> {
    field: FieldBuilder<E, D, V>,
    referenced: Option<FieldRef<FK, V>>,
}

impl<E, D, V, FK> ForeignKeyFieldBuilder<E, D, V, FK> {
    pub fn new() -> Self {
        ForeignKeyFieldBuilder {
            field: FieldBuilder::new(),
            referenced: None,
        }
    }

    pub fn identifier(mut self, identifier: ColumnIdentifier) -> Self {
        self.field = self.field.identifier(identifier);
        self
    }

    pub fn getter<F>(mut self, getter: F) -> Self
    where
        F: Fn(&E) -> Option<V> + Send + Sync + 'static,
    {
        self.field = self.field.getter(getter);
        self
    }

    pub fn setter<F>(mut self, setter: F) -> Self
    where
        F: Fn(&mut E, V) + Send + Sync + 'static,
    {
        self.field = self.field.setter(setter);
        self
    }

    pub fn type_mapper<M>(mut self, type_mapper: M) -> Self
    where
        M: TypeMapper<D, V> + 'static,
    {
        self.field = self.field.type_mapper(type_mapper);
        self
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.field = self.field.unique(unique);
        self
    }

    /// Sets the field this key points at. Any comparable field of `FK`
    /// with the same value type will do.
    pub fn referenced<R>(mut self, referenced: &R) -> Self
    where
        V: Ord,
        R: ComparableField<FK, V> + ?Sized,
    {
        self.referenced = Some(referenced.field_ref());
        self
    }

    pub fn build(self) -> Result<ForeignKeyField<E, D, V, FK>> {
        let field = self.field.build()?;
        let referenced = require(self.referenced, "referenced field")?;
        Ok(ForeignKeyField { field, referenced })
    }
}

impl<E, D, V, FK> Default for ForeignKeyFieldBuilder<E, D, V, FK> {
    fn default() -> Self {
        ForeignKeyFieldBuilder::new()
    }
}
