//! Class declarations and the schema descriptions derived from them.

pub mod decl;
pub mod schema;

pub use decl::{
    sequence_ids, single_id, ClassDecl, ColumnAttrs, FieldDecl, FieldMapping, FieldType, Record,
    TypeRef,
};
pub use schema::{
    Cardinality, ColumnDescriptor, EntitySchema, RelationDescriptor, StorageKind, ID_COLUMN,
};
