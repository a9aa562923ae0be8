//! Schema Catalog
//!
//! Turns a [`ClassDecl`] into a validated [`EntitySchema`]. Derivation is
//! pure: no database is touched, and every structural problem is reported
//! here before any statement runs.

use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{RelboxError, Result};
use crate::model::decl::{ClassDecl, FieldMapping, FieldType, Record};
use crate::model::schema::{
    ColumnDescriptor, EntitySchema, RelationDescriptor, StorageKind, ID_COLUMN,
};

thread_local! {
    static SCHEMAS: RefCell<HashMap<TypeId, Arc<EntitySchema>>> = RefCell::new(HashMap::new());
}

/// Describe a declared class.
///
/// # Errors
///
/// Returns a schema error when the class has no table marker, no `id: i64`
/// field, only the identity column, a column of unsupported type, a relation
/// to an unmarked class, or a relation cycle.
pub fn describe(decl: &ClassDecl) -> Result<EntitySchema> {
    let mut visiting = Vec::new();
    describe_within(decl, &mut visiting)
}

/// Schema of `T`, derived once per thread and shared afterwards.
///
/// # Errors
///
/// Same as [`describe`]. Failures are not cached.
pub fn schema_of<T: Record>() -> Result<Arc<EntitySchema>> {
    let key = TypeId::of::<T>();
    if let Some(schema) = SCHEMAS.with(|cache| cache.borrow().get(&key).cloned()) {
        return Ok(schema);
    }

    let schema = Arc::new(describe(&T::declare())?);
    SCHEMAS.with(|cache| cache.borrow_mut().insert(key, Arc::clone(&schema)));
    tracing::debug!(table = schema.table(), "schema described");
    Ok(schema)
}

fn describe_within(decl: &ClassDecl, visiting: &mut Vec<String>) -> Result<EntitySchema> {
    let class = decl.class_name().to_string();
    let table = decl
        .table_name()
        .ok_or_else(|| RelboxError::MissingTableMarker {
            class: class.clone(),
        })?
        .to_string();

    visiting.push(class.clone());
    let described = describe_fields(decl, &class, visiting);
    visiting.pop();
    let (columns, relations) = described?;

    if !columns.iter().any(ColumnDescriptor::is_identity) {
        return Err(RelboxError::MissingIdentity { class });
    }
    if columns.len() == 1 {
        return Err(RelboxError::IdentityOnly { class });
    }

    Ok(EntitySchema {
        class_name: class,
        table,
        columns,
        relations,
    })
}

fn describe_fields(
    decl: &ClassDecl,
    class: &str,
    visiting: &mut Vec<String>,
) -> Result<(Vec<ColumnDescriptor>, Vec<RelationDescriptor>)> {
    let mut columns: Vec<ColumnDescriptor> = Vec::new();
    let mut relations = Vec::new();

    for field in decl.fields() {
        if field.name == ID_COLUMN && field.ty == FieldType::Long {
            push_column(&mut columns, class, identity_column())?;
            continue;
        }

        match &field.mapping {
            FieldMapping::Unmapped => {}
            FieldMapping::Column(attrs) => {
                let kind = StorageKind::from_field_type(&field.ty).ok_or_else(|| {
                    RelboxError::UnsupportedColumnType {
                        class: class.to_string(),
                        field: field.name.clone(),
                        type_name: field.ty.name().to_string(),
                    }
                })?;
                let name = attrs.name.clone().unwrap_or_else(|| field.name.clone());
                if name == ID_COLUMN {
                    return Err(RelboxError::ReservedColumnName {
                        class: class.to_string(),
                        field: field.name.clone(),
                    });
                }
                push_column(
                    &mut columns,
                    class,
                    ColumnDescriptor {
                        field: field.name.clone(),
                        name,
                        kind,
                        not_null: attrs.not_null,
                        unique: attrs.unique,
                        primary_key: attrs.primary_key,
                        auto_increment: attrs.auto_increment,
                        identity: false,
                    },
                )?;
            }
            FieldMapping::Relation {
                target,
                cardinality,
            } => {
                let target_decl = target.declare();
                if !target_decl.has_table_marker() {
                    return Err(RelboxError::RelationTargetNotMapped {
                        class: class.to_string(),
                        field: field.name.clone(),
                        target: target_decl.class_name().to_string(),
                    });
                }
                if visiting.iter().any(|c| c == target_decl.class_name()) {
                    return Err(RelboxError::CyclicRelation {
                        class: class.to_string(),
                        field: field.name.clone(),
                        target: target_decl.class_name().to_string(),
                    });
                }
                let target_schema = describe_within(&target_decl, visiting)?;
                relations.push(RelationDescriptor {
                    field: field.name.clone(),
                    target: Arc::new(target_schema),
                    cardinality: *cardinality,
                });
            }
        }
    }

    Ok((columns, relations))
}

fn push_column(
    columns: &mut Vec<ColumnDescriptor>,
    class: &str,
    column: ColumnDescriptor,
) -> Result<()> {
    if columns.iter().any(|c| c.name == column.name) {
        return Err(RelboxError::DuplicateColumn {
            class: class.to_string(),
            column: column.name,
        });
    }
    columns.push(column);
    Ok(())
}

fn identity_column() -> ColumnDescriptor {
    ColumnDescriptor {
        field: ID_COLUMN.to_string(),
        name: ID_COLUMN.to_string(),
        kind: StorageKind::Long,
        not_null: true,
        unique: true,
        primary_key: true,
        auto_increment: true,
        identity: true,
    }
}
