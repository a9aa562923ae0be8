//! Query: a condition and an ordering bound to one entity schema.

#![allow(clippy::result_large_err)]

use std::marker::PhantomData;
use std::sync::Arc;

use relbox_core::model::EntitySchema;
use relbox_core::sql::{mapping_table_name, query_sql, OrderClause};
use relbox_core::{log_op_end, log_op_error, log_op_start, Condition};
use rusqlite::Connection;

use crate::bind::to_sql_params;
use crate::config::HydrationOptions;
use crate::db::table_exists;
use crate::entity::Entity;
use crate::errors::{from_rusqlite, Result};
use crate::results::cursor::RowCursor;
use crate::results::Results;

pub struct Query<'c, T: Entity> {
    conn: &'c Connection,
    schema: Arc<EntitySchema>,
    condition: Condition,
    order: Vec<OrderClause>,
    options: HydrationOptions,
    depth: usize,
    _marker: PhantomData<T>,
}

impl<'c, T: Entity> Query<'c, T> {
    pub(crate) fn new(
        conn: &'c Connection,
        schema: Arc<EntitySchema>,
        condition: Condition,
        options: HydrationOptions,
        depth: usize,
    ) -> Self {
        Self {
            conn,
            schema,
            condition,
            order: Vec::new(),
            options,
            depth,
            _marker: PhantomData,
        }
    }

    /// Order ascending by the given owner-table columns, after any earlier
    /// ordering.
    pub fn order_by(mut self, columns: &[&str]) -> Self {
        self.order
            .extend(columns.iter().map(|c| OrderClause::asc(*c)));
        self
    }

    /// Order descending by the given owner-table columns, after any earlier
    /// ordering.
    pub fn order_by_desc(mut self, columns: &[&str]) -> Self {
        self.order
            .extend(columns.iter().map(|c| OrderClause::desc(*c)));
        self
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Run the query and return a cursor over its results.
    ///
    /// Tables that were never created (or were dropped) yield empty results.
    ///
    /// # Errors
    ///
    /// Returns `UnbalancedGroup` for a malformed condition, `Persistence` when
    /// SQLite rejects the statement.
    pub fn execute(self) -> Result<Results<'c, T>> {
        let start = std::time::Instant::now();
        let table = self.schema.table().to_string();
        log_op_start!("query", table = table.as_str(), depth = self.depth);

        let cursor = self.load().map_err(|e| {
            log_op_error!(
                "query",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "query",
            duration_ms = start.elapsed().as_millis() as u64,
            table = table.as_str(),
            row_count = cursor.len()
        );
        Ok(Results::new(
            self.conn,
            self.schema,
            cursor,
            self.options,
            self.depth,
        ))
    }

    fn load(&self) -> Result<RowCursor> {
        let (sql, args) = query_sql(&self.schema, &self.condition, &self.order)?;

        if !self.tables_present()? {
            tracing::debug!(table = self.schema.table(), "table missing, empty results");
            return Ok(RowCursor::empty());
        }

        tracing::debug!(sql = sql.as_str(), arg_count = args.len(), "executing query");
        RowCursor::load(self.conn, &sql, to_sql_params(&args)).map_err(from_rusqlite)
    }

    fn tables_present(&self) -> Result<bool> {
        let owner = self.schema.table();
        if !table_exists(self.conn, owner)? {
            return Ok(false);
        }
        for target in self.schema.target_tables() {
            if !table_exists(self.conn, &mapping_table_name(owner, target))? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
