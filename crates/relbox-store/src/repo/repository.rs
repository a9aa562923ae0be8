//! Repository: persistence of one entity type.
//!
//! Every write (`save`, `remove`, `clear`, `drop_tables`) is a single unit
//! of work inside one transaction. On failure the transaction rolls back and
//! the caller's object keeps its previous identity.

#![allow(clippy::result_large_err)]

use std::marker::PhantomData;
use std::sync::Arc;

use relbox_core::catalog::schema_of;
use relbox_core::errors::RelboxError;
use relbox_core::model::{Cardinality, EntitySchema};
use relbox_core::sql::{
    build_mapping_values, build_values, create_mapping_tables_sql, create_table_sql,
    delete_all_sql, delete_by_id_sql, delete_mappings_sql, drop_table_sql, insert_sql,
    mapping_table_name, update_by_id_sql, ValueMap, SINGLE_INDEX,
};
use relbox_core::{log_op_end, log_op_error, log_op_start, Condition, Value};
use rusqlite::{params_from_iter, Connection};

use crate::bind::{to_sql, to_sql_params};
use crate::config::HydrationOptions;
use crate::db::table_exists;
use crate::entity::Entity;
use crate::errors::{from_rusqlite, row_count_mismatch, Result};
use crate::query::Query;

/// One mapping row to write for a saved owner.
struct MappingRow {
    field: String,
    target_table: String,
    index: i64,
    target_id: i64,
}

pub struct Repository<'c, T: Entity> {
    conn: &'c Connection,
    schema: Arc<EntitySchema>,
    options: HydrationOptions,
    _marker: PhantomData<T>,
}

impl<'c, T: Entity> Repository<'c, T> {
    pub(crate) fn new(conn: &'c Connection, options: HydrationOptions) -> Result<Self> {
        let schema = schema_of::<T>()?;
        Ok(Self {
            conn,
            schema,
            options,
            _marker: PhantomData,
        })
    }

    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    /// Insert or update `item` together with its relation mappings.
    ///
    /// An object with identity 0 is inserted and receives its new identity.
    /// An object with an identity is updated in place; if its row no longer
    /// exists it is inserted again and receives a fresh identity.
    ///
    /// # Errors
    ///
    /// `UnsavedRelation` when a related object has no identity yet,
    /// `ConstraintViolation` when an update touches more than one row,
    /// `Persistence` for SQLite failures. Nothing is written on error.
    pub fn save(&self, item: &mut T) -> Result<()> {
        let start = std::time::Instant::now();
        let table = self.schema.table();
        log_op_start!("save", table = table, entity_id = item.id());

        match self.save_unit(item) {
            Ok(id) => {
                item.set_id(id);
                log_op_end!(
                    "save",
                    duration_ms = start.elapsed().as_millis() as u64,
                    table = table,
                    entity_id = id
                );
                Ok(())
            }
            Err(e) => {
                log_op_error!(
                    "save",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    table = table
                );
                Err(e)
            }
        }
    }

    fn save_unit(&self, item: &T) -> Result<i64> {
        let values = build_values(&self.schema, item)?;
        let mappings = self.mapping_rows(item)?;

        let tx = self.conn.unchecked_transaction().map_err(from_rusqlite)?;
        self.ensure_tables(&tx)?;

        let id = match item.id() {
            id if id > 0 => match self.update(&tx, id, &values)? {
                0 => {
                    tracing::debug!(
                        table = self.schema.table(),
                        stale_id = id,
                        "row gone, inserting instead"
                    );
                    self.insert(&tx, &values)?
                }
                1 => {
                    self.delete_mappings(&tx, id)?;
                    id
                }
                n => return Err(row_count_mismatch(self.schema.table(), "update", 1, n)),
            },
            _ => self.insert(&tx, &values)?,
        };

        for row in &mappings {
            let values = build_mapping_values(
                &row.field,
                self.schema.table(),
                id,
                row.index,
                &row.target_table,
                row.target_id,
            );
            let mapping = mapping_table_name(self.schema.table(), &row.target_table);
            self.insert_into(&tx, &mapping, &values)
                .map_err(|e| e.with_table(mapping.clone()).with_field(row.field.clone()))?;
        }

        tx.commit().map_err(from_rusqlite)?;
        Ok(id)
    }

    /// Delete `item`'s row and mappings, then reset its identity to 0.
    ///
    /// # Errors
    ///
    /// `NotPersisted` when `item` has no identity, `ConstraintViolation` when
    /// no row (or more than one) matches it.
    pub fn remove(&self, item: &mut T) -> Result<()> {
        let start = std::time::Instant::now();
        let table = self.schema.table();
        let id = item.id();
        log_op_start!("remove", table = table, entity_id = id);

        let result: Result<()> = if id == 0 {
            Err(RelboxError::NotPersisted {
                table: table.to_string(),
            }
            .into())
        } else {
            self.remove_unit(id)
        };

        match result {
            Ok(()) => {
                item.set_id(0);
                log_op_end!(
                    "remove",
                    duration_ms = start.elapsed().as_millis() as u64,
                    table = table,
                    entity_id = id
                );
                Ok(())
            }
            Err(e) => {
                let e = e.with_entity_id(id);
                log_op_error!(
                    "remove",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    table = table
                );
                Err(e)
            }
        }
    }

    fn remove_unit(&self, id: i64) -> Result<()> {
        let tx = self.conn.unchecked_transaction().map_err(from_rusqlite)?;
        let table = self.schema.table();

        if !table_exists(&tx, table)? {
            return Err(row_count_mismatch(table, "delete", 1, 0));
        }
        let deleted = tx
            .execute(&delete_by_id_sql(table), [id])
            .map_err(from_rusqlite)?;
        if deleted != 1 {
            return Err(row_count_mismatch(table, "delete", 1, deleted));
        }
        self.delete_mappings(&tx, id)?;

        tx.commit().map_err(from_rusqlite)
    }

    /// Delete every row of the table and of its mapping tables.
    ///
    /// Objects saved earlier keep their identity; saving them again inserts
    /// new rows.
    pub fn clear(&self) -> Result<()> {
        self.run_unit("clear", |tx, table| {
            if table_exists(tx, table)? {
                let n = tx
                    .execute(&delete_all_sql(table), [])
                    .map_err(from_rusqlite)?;
                tracing::debug!(table, row_count = n, "cleared");
            }
            Ok(())
        })
    }

    /// Drop the table and its mapping tables. The next `save` recreates
    /// them.
    pub fn drop_tables(&self) -> Result<()> {
        self.run_unit("drop", |tx, table| {
            tx.execute_batch(&drop_table_sql(table))
                .map_err(from_rusqlite)
        })
    }

    /// Query every object of this type.
    pub fn find_all(&self) -> Query<'c, T> {
        self.find(Condition::new())
    }

    /// Query the objects matching `condition`.
    pub fn find(&self, condition: Condition) -> Query<'c, T> {
        Query::new(
            self.conn,
            Arc::clone(&self.schema),
            condition,
            self.options.clone(),
            0,
        )
    }

    /// Apply `step` to the owner table and each mapping table in one
    /// transaction.
    fn run_unit<F>(&self, op: &str, step: F) -> Result<()>
    where
        F: Fn(&Connection, &str) -> Result<()>,
    {
        let start = std::time::Instant::now();
        let owner = self.schema.table();
        log_op_start!(op, table = owner);

        let result = (|| {
            let tx = self.conn.unchecked_transaction().map_err(from_rusqlite)?;
            step(&tx, owner)?;
            for target in self.schema.target_tables() {
                step(&tx, &mapping_table_name(owner, target))?;
            }
            tx.commit().map_err(from_rusqlite)
        })();

        match &result {
            Ok(()) => {
                log_op_end!(
                    op,
                    duration_ms = start.elapsed().as_millis() as u64,
                    table = owner
                );
            }
            Err(e) => {
                log_op_error!(
                    op,
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    table = owner
                );
            }
        }
        result
    }

    fn ensure_tables(&self, conn: &Connection) -> Result<()> {
        conn.execute_batch(&create_table_sql(&self.schema))
            .map_err(from_rusqlite)?;
        for sql in create_mapping_tables_sql(&self.schema) {
            conn.execute_batch(&sql).map_err(from_rusqlite)?;
        }
        Ok(())
    }

    /// Insert a row built from `values` and return its rowid.
    fn insert(&self, conn: &Connection, values: &ValueMap) -> Result<i64> {
        self.insert_into(conn, self.schema.table(), values)
    }

    fn insert_into(&self, conn: &Connection, table: &str, values: &ValueMap) -> Result<i64> {
        let sql = insert_sql(table, values);
        tracing::debug!(sql = sql.as_str(), arg_count = values.len(), "insert");
        conn.execute(&sql, params_from_iter(to_sql_params(values.values())))
            .map_err(from_rusqlite)?;
        Ok(conn.last_insert_rowid())
    }

    /// Update by identity; returns the affected row count.
    fn update(&self, conn: &Connection, id: i64, values: &ValueMap) -> Result<usize> {
        let sql = update_by_id_sql(self.schema.table(), values);
        let mut params = to_sql_params(values.values());
        params.push(to_sql(&Value::Long(id)));
        tracing::debug!(sql = sql.as_str(), arg_count = params.len(), "update");
        conn.execute(&sql, params_from_iter(params))
            .map_err(from_rusqlite)
    }

    fn delete_mappings(&self, conn: &Connection, id: i64) -> Result<()> {
        for target in self.schema.target_tables() {
            conn.execute(&delete_mappings_sql(&self.schema, target), [id])
                .map_err(from_rusqlite)?;
        }
        Ok(())
    }

    /// Mapping rows for every relation field of `item`.
    fn mapping_rows(&self, item: &T) -> Result<Vec<MappingRow>> {
        let mut rows = Vec::new();
        for relation in self.schema.relations() {
            let target_table = relation.target.table();
            let ids = item.relation_ids(&relation.field);
            for (position, target_id) in ids.into_iter().enumerate() {
                let Some(target_id) = target_id else {
                    continue;
                };
                if target_id <= 0 {
                    return Err(RelboxError::UnsavedRelation {
                        field: relation.field.clone(),
                        target: target_table.to_string(),
                    }
                    .into());
                }
                let index = match relation.cardinality {
                    Cardinality::Single => SINGLE_INDEX,
                    Cardinality::Array | Cardinality::List => position as i64,
                };
                rows.push(MappingRow {
                    field: relation.field.clone(),
                    target_table: target_table.to_string(),
                    index,
                    target_id,
                });
                if relation.cardinality == Cardinality::Single {
                    break;
                }
            }
        }
        Ok(rows)
    }
}
