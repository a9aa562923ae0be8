//! Results of a query, one object per logical group of joined rows.
//!
//! Two accessor families:
//! - consuming (`first`, `last`, `one`, `some`, `some_matching`, `all`) take
//!   the results by value and release the cursor when done
//! - reusable (`get_*`) borrow the results and leave the cursor open until
//!   [`Results::close`] or drop
//!
//! A group that cannot be rebuilt is handled by the configured
//! [`FailurePolicy`]: skipped with a warning, or returned as an error.

#![allow(clippy::result_large_err)]

pub mod cursor;
pub(crate) mod hydrator;
pub(crate) mod resolver;

use std::marker::PhantomData;
use std::sync::Arc;

use relbox_core::model::{EntitySchema, ID_COLUMN};
use relbox_core::ExError;
use rusqlite::Connection;

use crate::bind::as_integer;
use crate::config::{FailurePolicy, HydrationOptions};
use crate::entity::Entity;
use crate::errors::{hydration_error, Result};
use cursor::RowCursor;
use resolver::Resolver;

/// Counters collected while hydrating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HydrationStats {
    /// Objects produced.
    pub groups: usize,
    /// Groups dropped under [`FailurePolicy::Skip`].
    pub skipped: usize,
    /// Nested queries issued for related objects, at every depth.
    pub related_fetches: usize,
    /// Related objects served from a per-group cache.
    pub cache_hits: usize,
}

impl HydrationStats {
    /// Add the counters of a nested read. Its `groups` are related objects,
    /// not results of this read, and are left out.
    pub(crate) fn absorb_nested(&mut self, nested: HydrationStats) {
        self.skipped += nested.skipped;
        self.related_fetches += nested.related_fetches;
        self.cache_hits += nested.cache_hits;
    }
}

pub struct Results<'c, T: Entity> {
    conn: &'c Connection,
    schema: Arc<EntitySchema>,
    cursor: RowCursor,
    options: HydrationOptions,
    depth: usize,
    stats: HydrationStats,
    _marker: PhantomData<T>,
}

impl<'c, T: Entity> Results<'c, T> {
    pub(crate) fn new(
        conn: &'c Connection,
        schema: Arc<EntitySchema>,
        mut cursor: RowCursor,
        options: HydrationOptions,
        depth: usize,
    ) -> Self {
        cursor.move_to_first();
        Self {
            conn,
            schema,
            cursor,
            options,
            depth,
            stats: HydrationStats::default(),
            _marker: PhantomData,
        }
    }

    /// Number of physical rows, not objects.
    pub fn row_count(&self) -> usize {
        self.cursor.len()
    }

    pub fn stats(&self) -> HydrationStats {
        self.stats
    }

    pub fn is_closed(&self) -> bool {
        self.cursor.is_closed()
    }

    /// Release the cursor. Later accessors find nothing.
    pub fn close(&mut self) {
        self.cursor.close();
    }

    // Consuming accessors

    pub fn first(mut self) -> Result<Option<T>> {
        self.get_first()
    }

    pub fn last(mut self) -> Result<Option<T>> {
        self.get_last()
    }

    pub fn one(mut self, index: usize) -> Result<Option<T>> {
        self.get_one(index)
    }

    pub fn some(mut self, start: usize, count: usize) -> Result<Vec<T>> {
        self.get_some(start, count)
    }

    pub fn some_matching<F>(mut self, filter: F) -> Result<Vec<T>>
    where
        F: FnMut(&T) -> bool,
    {
        self.get_some_matching(filter)
    }

    pub fn all(mut self) -> Result<Vec<T>> {
        self.get_all()
    }

    // Reusable accessors

    pub fn get_first(&mut self) -> Result<Option<T>> {
        if !self.move_to_first_group() {
            return Ok(None);
        }
        self.read_one()
    }

    pub fn get_last(&mut self) -> Result<Option<T>> {
        if !self.move_to_last_group() {
            return Ok(None);
        }
        self.read_one()
    }

    pub fn get_one(&mut self, index: usize) -> Result<Option<T>> {
        if !self.move_to_group(index) {
            return Ok(None);
        }
        self.read_one()
    }

    /// Up to `count` objects starting at group `start`. Skipped groups do
    /// not count.
    pub fn get_some(&mut self, start: usize, count: usize) -> Result<Vec<T>> {
        let mut items = Vec::new();
        if count == 0 || !self.move_to_group(start) {
            return Ok(items);
        }
        while items.len() < count {
            match self.next() {
                Some(item) => items.push(item?),
                None => break,
            }
        }
        Ok(items)
    }

    pub fn get_some_matching<F>(&mut self, mut filter: F) -> Result<Vec<T>>
    where
        F: FnMut(&T) -> bool,
    {
        let mut items = Vec::new();
        if !self.move_to_first_group() {
            return Ok(items);
        }
        for item in self.by_ref() {
            let item = item?;
            if filter(&item) {
                items.push(item);
            }
        }
        Ok(items)
    }

    pub fn get_all(&mut self) -> Result<Vec<T>> {
        self.get_some_matching(|_| true)
    }

    // Group navigation

    /// Position on the first row of the first group.
    pub fn move_to_first_group(&mut self) -> bool {
        self.cursor.move_to_first()
    }

    /// Position on the first row of the last group.
    pub fn move_to_last_group(&mut self) -> bool {
        if !self.cursor.move_to_last() {
            return false;
        }
        let last = self.current_owner();
        while self.cursor.move_to_previous() {
            if self.current_owner() != last {
                self.cursor.move_to_next();
                return true;
            }
        }
        self.cursor.move_to_first()
    }

    /// Position on the first row of group `index`.
    pub fn move_to_group(&mut self, index: usize) -> bool {
        if !self.cursor.move_to_first() {
            return false;
        }
        for _ in 0..index {
            let owner = self.current_owner();
            loop {
                if !self.cursor.move_to_next() {
                    return false;
                }
                if self.current_owner() != owner {
                    break;
                }
            }
        }
        true
    }

    fn current_owner(&self) -> Option<i64> {
        self.cursor.get(ID_COLUMN).and_then(as_integer)
    }

    /// Rebuild the group at the cursor and step past it.
    fn read_group(&mut self) -> Result<T> {
        let table = self.schema.table();
        let (owner, rows) = hydrator::group_bounds(&mut self.cursor)
            .ok_or_else(|| hydration_error(table, "row has no identity"))?;

        let mut resolver = Resolver::new(self.conn, self.options.clone(), self.depth);
        let resolve_relations = self.depth < self.options.max_depth;
        let result = hydrator::hydrate::<T>(
            &self.cursor,
            rows,
            owner,
            &self.schema,
            &mut resolver,
            resolve_relations,
        );
        self.stats.related_fetches += resolver.fetches;
        self.stats.cache_hits += resolver.cache_hits;
        self.stats.absorb_nested(resolver.nested);

        match &result {
            Ok(_) => self.stats.groups += 1,
            Err(_) => self.stats.skipped += 1,
        }
        result.map_err(|e| e.with_entity_id(owner))
    }

    /// One object under the failure policy, for the single-object accessors.
    fn read_one(&mut self) -> Result<Option<T>> {
        match self.read_group() {
            Ok(item) => Ok(Some(item)),
            Err(err) => self.on_failure(err).map(|()| None),
        }
    }

    fn on_failure(&mut self, err: ExError) -> Result<()> {
        match self.options.on_failure {
            FailurePolicy::Skip => {
                tracing::warn!(
                    table = self.schema.table(),
                    err.code = err.code(),
                    error = %err,
                    "skipping row group that cannot be hydrated"
                );
                Ok(())
            }
            FailurePolicy::Abort => Err(err),
        }
    }
}

/// Iterates objects from the current group onward.
impl<T: Entity> Iterator for Results<'_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.cursor.is_after_last() {
            if self.cursor.position() < 0 {
                self.cursor.move_to_first();
            }
            match self.read_group() {
                Ok(item) => return Some(Ok(item)),
                Err(err) => {
                    if let Err(err) = self.on_failure(err) {
                        return Some(Err(err));
                    }
                }
            }
        }
        None
    }
}
