//! Table and column identifiers.
//!
//! Identifiers are opaque keys handed in by whatever owns the entity
//! metadata. They are compared and hashed, never ordered.

use std::fmt;

use crate::error::{FieldError, Result};

/// Identifies the table (entity collection) a column belongs to.
///
/// `dbms` and `schema` may be empty for purely in-memory collections.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawTableIdentifier"))]
pub struct TableIdentifier {
    dbms: String,
    schema: String,
    table: String,
}

impl TableIdentifier {
    /// Creates a fully qualified table identifier.
    ///
    /// Returns [`FieldError::EmptyIdentifier`] if `table` is empty.
    pub fn new(
        dbms: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Result<Self> {
        let table = table.into();
        if table.is_empty() {
            return Err(FieldError::EmptyIdentifier { part: "table" });
        }
        Ok(TableIdentifier {
            dbms: dbms.into(),
            schema: schema.into(),
            table,
        })
    }

    /// Creates a table identifier with no dbms or schema qualifier.
    pub fn named(table: impl Into<String>) -> Result<Self> {
        TableIdentifier::new("", "", table)
    }

    pub fn dbms(&self) -> &str {
        &self.dbms
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Creates an identifier for a column of this table.
    pub fn column(&self, column: impl Into<String>) -> Result<ColumnIdentifier> {
        ColumnIdentifier::new(self.clone(), column)
    }
}

impl fmt::Display for TableIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in [&self.dbms, &self.schema] {
            if !part.is_empty() {
                write!(f, "{}.", part)?;
            }
        }
        f.write_str(&self.table)
    }
}

/// Identifies a single column (entity property) within a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawColumnIdentifier"))]
pub struct ColumnIdentifier {
    table: TableIdentifier,
    column: String,
}

impl ColumnIdentifier {
    /// Creates a column identifier.
    ///
    /// Returns [`FieldError::EmptyIdentifier`] if `column` is empty.
    pub fn new(table: TableIdentifier, column: impl Into<String>) -> Result<Self> {
        let column = column.into();
        if column.is_empty() {
            return Err(FieldError::EmptyIdentifier { part: "column" });
        }
        Ok(ColumnIdentifier { table, column })
    }

    pub fn table(&self) -> &TableIdentifier {
        &self.table
    }

    pub fn column(&self) -> &str {
        &self.column
    }
}

impl fmt::Display for ColumnIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

// Deserialized identifiers go through the same checks as `new`.

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawTableIdentifier {
    dbms: String,
    schema: String,
    table: String,
}

#[cfg(feature = "serde")]
impl TryFrom<RawTableIdentifier> for TableIdentifier {
    type Error = FieldError;

    fn try_from(raw: RawTableIdentifier) -> Result<Self> {
        TableIdentifier::new(raw.dbms, raw.schema, raw.table)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawColumnIdentifier {
    table: TableIdentifier,
    column: String,
}

#[cfg(feature = "serde")]
impl TryFrom<RawColumnIdentifier> for ColumnIdentifier {
    type Error = FieldError;

    fn try_from(raw: RawColumnIdentifier) -> Result<Self> {
        ColumnIdentifier::new(raw.table, raw.column)
    }
}
