//! Validated schema descriptions.

use std::sync::Arc;

use crate::model::decl::FieldType;

/// Name of the identity field and column.
pub const ID_COLUMN: &str = "id";

/// How many objects a relation field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Single,
    Array,
    List,
}

impl Cardinality {
    pub fn is_sequence(self) -> bool {
        !matches!(self, Cardinality::Single)
    }
}

/// Storage kind of a column, one per supported scalar field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    Date,
    Bytes,
}

impl StorageKind {
    pub fn from_field_type(ty: &FieldType) -> Option<Self> {
        let kind = match ty {
            FieldType::Bool => StorageKind::Boolean,
            FieldType::Byte => StorageKind::Byte,
            FieldType::Short => StorageKind::Short,
            FieldType::Int => StorageKind::Int,
            FieldType::Long => StorageKind::Long,
            FieldType::Float => StorageKind::Float,
            FieldType::Double => StorageKind::Double,
            FieldType::String => StorageKind::String,
            FieldType::Date => StorageKind::Date,
            FieldType::Bytes => StorageKind::Bytes,
            FieldType::Other(_) => return None,
        };
        Some(kind)
    }

    /// SQLite column type. Dates are stored as epoch milliseconds.
    pub fn sql_type(self) -> &'static str {
        match self {
            StorageKind::Boolean
            | StorageKind::Byte
            | StorageKind::Short
            | StorageKind::Int
            | StorageKind::Long
            | StorageKind::Date => "INTEGER",
            StorageKind::Float | StorageKind::Double => "REAL",
            StorageKind::String => "TEXT",
            StorageKind::Bytes => "BLOB",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Field the column is read from and written to.
    pub field: String,
    /// Column name in the table.
    pub name: String,
    pub kind: StorageKind,
    pub not_null: bool,
    pub unique: bool,
    pub primary_key: bool,
    pub auto_increment: bool,
    /// Set only on the `id: i64` column produced by the catalog.
    pub identity: bool,
}

impl ColumnDescriptor {
    pub fn is_identity(&self) -> bool {
        self.identity
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDescriptor {
    pub field: String,
    pub target: Arc<EntitySchema>,
    pub cardinality: Cardinality,
}

/// Table layout of one class: its columns and its relation fields.
///
/// Relation targets are fully described themselves, so a schema is a tree
/// rooted at the class it was built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySchema {
    pub(crate) class_name: String,
    pub(crate) table: String,
    pub(crate) columns: Vec<ColumnDescriptor>,
    pub(crate) relations: Vec<RelationDescriptor>,
}

impl EntitySchema {
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Columns in declaration order, identity included.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn relations(&self) -> &[RelationDescriptor] {
        &self.relations
    }

    pub fn column(&self, field: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.field == field)
    }

    pub fn relation(&self, field: &str) -> Option<&RelationDescriptor> {
        self.relations.iter().find(|r| r.field == field)
    }

    /// Columns written on insert and update.
    pub fn value_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| !c.is_identity())
    }

    /// Distinct relation target tables, in order of first appearance.
    pub fn target_tables(&self) -> Vec<&str> {
        let mut tables: Vec<&str> = Vec::new();
        for relation in &self.relations {
            let table = relation.target.table();
            if !tables.contains(&table) {
                tables.push(table);
            }
        }
        tables
    }

    /// Relation fields pointing at `target_table`, in declaration order.
    pub fn relations_to<'a>(
        &'a self,
        target_table: &'a str,
    ) -> impl Iterator<Item = &'a RelationDescriptor> + 'a {
        self.relations
            .iter()
            .filter(move |r| r.target.table() == target_table)
    }
}
