//! Buffered, bidirectional row cursor.

#![allow(clippy::result_large_err)]

use std::collections::HashMap;

use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};

/// Raw rows of one query with a movable position.
///
/// Positions run from `-1` (before the first row) to `len` (after the last
/// row), like a platform cursor.
#[derive(Debug, Default)]
pub struct RowCursor {
    columns: HashMap<String, usize>,
    rows: Vec<Vec<SqlValue>>,
    position: isize,
    closed: bool,
}

impl RowCursor {
    /// Run `sql` and buffer every row.
    ///
    /// The read is eager: all joined rows are held in memory from here on.
    /// Objects are still built only when an accessor asks for them.
    pub fn load(conn: &Connection, sql: &str, args: Vec<SqlValue>) -> rusqlite::Result<Self> {
        let mut stmt = conn.prepare(sql)?;
        let mut columns = HashMap::new();
        for (idx, name) in stmt.column_names().into_iter().enumerate() {
            // first occurrence wins, the owner table comes first in a join
            columns.entry(name.to_string()).or_insert(idx);
        }
        let width = stmt.column_count();

        let mut rows = Vec::new();
        let mut cursor = stmt.query(params_from_iter(args))?;
        while let Some(row) = cursor.next()? {
            let mut values = Vec::with_capacity(width);
            for idx in 0..width {
                values.push(row.get::<_, SqlValue>(idx)?);
            }
            rows.push(values);
        }

        Ok(Self {
            columns,
            rows,
            position: -1,
            closed: false,
        })
    }

    /// A cursor over no rows.
    pub fn empty() -> Self {
        Self {
            position: -1,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn position(&self) -> isize {
        self.position
    }

    pub fn is_after_last(&self) -> bool {
        self.is_empty() || self.position >= self.rows.len() as isize
    }

    pub fn move_to(&mut self, position: isize) -> bool {
        let len = self.rows.len() as isize;
        self.position = position.clamp(-1, len);
        (0..len).contains(&position)
    }

    pub fn move_to_first(&mut self) -> bool {
        self.move_to(0)
    }

    pub fn move_to_last(&mut self) -> bool {
        self.move_to(self.rows.len() as isize - 1)
    }

    pub fn move_to_next(&mut self) -> bool {
        self.move_to(self.position + 1)
    }

    pub fn move_to_previous(&mut self) -> bool {
        self.move_to(self.position - 1)
    }

    /// Value of `column` on row `row`.
    pub fn value_at(&self, row: usize, column: &str) -> Option<&SqlValue> {
        let idx = *self.columns.get(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Value of `column` on the current row.
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        let row = usize::try_from(self.position).ok()?;
        self.value_at(row, column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Release the buffered rows. Every later move fails.
    pub fn close(&mut self) {
        self.rows = Vec::new();
        self.position = -1;
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
