//! Object reconstruction from one logical row group.
//!
//! The joined query repeats an owner's columns on every row that carries one
//! of its mapping rows, and multiplies mapping rows of different target
//! tables against each other. Columns are therefore read from the first row
//! only, and relation entries are collected per field by position so that
//! duplicates from the cross product collapse.

#![allow(clippy::result_large_err)]

use std::collections::BTreeMap;
use std::ops::Range;

use relbox_core::model::{Cardinality, EntitySchema, RelationDescriptor, ID_COLUMN};
use relbox_core::sql::{
    mapping_index_column, mapping_owner_column, mapping_target_column, SINGLE_INDEX,
};

use crate::bind::{as_integer, from_sql};
use crate::entity::{Entity, Related};
use crate::errors::{hydration_error, Result};
use crate::results::cursor::RowCursor;
use crate::results::resolver::Resolver;

/// Rows `[start, end)` belonging to the owner on row `start`.
///
/// Leaves the cursor on `end`: the first row of the next group, or past the
/// last row.
pub(crate) fn group_bounds(cursor: &mut RowCursor) -> Option<(i64, Range<usize>)> {
    let start = usize::try_from(cursor.position()).ok()?;
    let Some(owner) = cursor.get(ID_COLUMN).and_then(as_integer) else {
        cursor.move_to_next();
        return None;
    };
    while cursor.move_to_next() {
        if cursor.get(ID_COLUMN).and_then(as_integer) != Some(owner) {
            break;
        }
    }
    let end = usize::try_from(cursor.position()).unwrap_or(start + 1);
    Some((owner, start..end))
}

/// Build one object from the rows of its group.
pub(crate) fn hydrate<T: Entity>(
    cursor: &RowCursor,
    rows: Range<usize>,
    owner: i64,
    schema: &EntitySchema,
    resolver: &mut Resolver<'_>,
    resolve_relations: bool,
) -> Result<T> {
    let table = schema.table();
    let mut item = T::default();

    for column in schema.columns() {
        if column.is_identity() {
            continue;
        }
        let raw = cursor
            .value_at(rows.start, &column.name)
            .ok_or_else(|| hydration_error(table, format!("missing column {}", column.name)))?;
        let value = from_sql(column.kind, raw)
            .map_err(|e| hydration_error(table, format!("column {}: {e}", column.name)))?;
        item.set_column(&column.field, value)
            .map_err(|e| hydration_error(table, format!("field {}: {e}", column.field)))?;
    }
    item.set_id(owner);

    if !resolve_relations {
        return Ok(item);
    }

    for relation in schema.relations() {
        let ids = relation_ids(cursor, rows.clone(), owner, table, relation);
        let call = match relation.cardinality {
            Cardinality::Single | Cardinality::Array => !ids.is_empty(),
            Cardinality::List => true,
        };
        if call {
            item.set_relation(&relation.field, Related::new(ids, resolver))
                .map_err(|e| {
                    e.with_table(table)
                        .with_field(relation.field.clone())
                        .with_entity_id(owner)
                })?;
        }
    }

    Ok(item)
}

/// Target identities of `relation` for `owner`, in position order.
fn relation_ids(
    cursor: &RowCursor,
    rows: Range<usize>,
    owner: i64,
    owner_table: &str,
    relation: &RelationDescriptor,
) -> Vec<i64> {
    let owner_column = mapping_owner_column(owner_table, &relation.field);
    let index_column = mapping_index_column(owner_table, &relation.field);
    let target_column = mapping_target_column(relation.target.table());

    let mut by_position: BTreeMap<i64, i64> = BTreeMap::new();
    for row in rows {
        let active = cursor.value_at(row, &owner_column).and_then(as_integer) == Some(owner);
        if !active {
            continue;
        }
        let Some(target) = cursor.value_at(row, &target_column).and_then(as_integer) else {
            continue;
        };
        let position = cursor
            .value_at(row, &index_column)
            .and_then(as_integer)
            .unwrap_or(SINGLE_INDEX);
        by_position.entry(position).or_insert(target);
    }

    match relation.cardinality {
        Cardinality::Single => by_position.into_values().take(1).collect(),
        Cardinality::Array | Cardinality::List => by_position.into_values().collect(),
    }
}
