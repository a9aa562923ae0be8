use crate::errors::{RelboxError, Result};
use crate::model::decl::Record;
use crate::model::schema::{EntitySchema, ID_COLUMN};
use crate::sql::{
    mapping_index_column, mapping_owner_column, mapping_table_name, mapping_target_column,
};
use crate::value::Value;

/// Column name to value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    entries: Vec<(String, Value)>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, replacing an earlier value for the same column.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }
}

/// Values of every non-identity column of `record`, keyed by column name.
///
/// # Errors
///
/// Returns [`RelboxError::Internal`] when the record does not expose one
/// value per non-identity column; that means the record's accessors and its
/// declaration disagree.
pub fn build_values<T: Record>(schema: &EntitySchema, record: &T) -> Result<ValueMap> {
    let mut values = ValueMap::new();
    for column in schema.value_columns() {
        if let Some(value) = record.column(&column.field) {
            values.insert(column.name.clone(), value);
        }
    }

    if values.len() != schema.columns().len() - 1 {
        return Err(RelboxError::Internal {
            reason: format!(
                "{} produced {} column value(s) for {} non-identity column(s)",
                schema.table(),
                values.len(),
                schema.columns().len() - 1
            ),
        });
    }
    Ok(values)
}

/// One mapping row: `owner_id` holds the target at `index` of `field`.
pub fn build_mapping_values(
    field: &str,
    owner_table: &str,
    owner_id: i64,
    index: i64,
    target_table: &str,
    target_id: i64,
) -> ValueMap {
    let mut values = ValueMap::new();
    values.insert(mapping_owner_column(owner_table, field), owner_id);
    values.insert(mapping_index_column(owner_table, field), index);
    values.insert(mapping_target_column(target_table), target_id);
    values
}

/// `INSERT INTO table (..) VALUES (?, ..)`, bound with `values.values()`.
pub fn insert_sql(table: &str, values: &ValueMap) -> String {
    let columns: Vec<&str> = values.columns().collect();
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        columns.join(", ")
    )
}

/// `UPDATE table SET .. WHERE id = ?`, bound with `values.values()` then
/// the identity.
pub fn update_by_id_sql(table: &str, values: &ValueMap) -> String {
    let assignments: Vec<String> = values.columns().map(|c| format!("{c} = ?")).collect();
    format!(
        "UPDATE {table} SET {} WHERE {ID_COLUMN} = ?",
        assignments.join(", ")
    )
}

pub fn delete_by_id_sql(table: &str) -> String {
    format!("DELETE FROM {table} WHERE {ID_COLUMN} = ?")
}

pub fn delete_all_sql(table: &str) -> String {
    format!("DELETE FROM {table}")
}

/// Delete every mapping row an owner holds in the mapping table towards
/// `target_table`, across all fields. Bound with the owner identity once.
pub fn delete_mappings_sql(schema: &EntitySchema, target_table: &str) -> String {
    let owner = schema.table();
    let tests: Vec<String> = schema
        .relations_to(target_table)
        .map(|r| format!("{} = ?1", mapping_owner_column(owner, &r.field)))
        .collect();
    format!(
        "DELETE FROM {} WHERE {}",
        mapping_table_name(owner, target_table),
        tests.join(" OR ")
    )
}
