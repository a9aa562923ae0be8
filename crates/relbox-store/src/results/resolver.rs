//! Related-object resolution for one owner group.

use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

use relbox_core::catalog::schema_of;
use relbox_core::model::ID_COLUMN;
use relbox_core::Condition;
use rusqlite::Connection;

use crate::config::HydrationOptions;
use crate::entity::Entity;
use crate::errors::Result;
use crate::query::Query;
use crate::results::HydrationStats;

/// Loads related objects by identity, one nested query per distinct
/// `(table, id)` unless deduplication is turned off.
pub struct Resolver<'c> {
    conn: &'c Connection,
    options: HydrationOptions,
    depth: usize,
    cache: HashMap<(String, i64), Rc<dyn Any>>,
    pub(crate) fetches: usize,
    pub(crate) cache_hits: usize,
    /// Counters of the nested results opened by this resolver.
    pub(crate) nested: HydrationStats,
}

impl<'c> Resolver<'c> {
    pub(crate) fn new(conn: &'c Connection, options: HydrationOptions, depth: usize) -> Self {
        Self {
            conn,
            options,
            depth,
            cache: HashMap::new(),
            fetches: 0,
            cache_hits: 0,
            nested: HydrationStats::default(),
        }
    }

    pub(crate) fn resolve<U: Entity>(&mut self, id: i64) -> Result<Option<U>> {
        let schema = schema_of::<U>()?;
        let key = (schema.table().to_string(), id);

        if self.options.dedup_related {
            if let Some(hit) = self.cache.get(&key).and_then(|v| v.downcast_ref::<U>()) {
                self.cache_hits += 1;
                return Ok(Some(hit.clone()));
            }
        }

        self.fetches += 1;
        let mut results = Query::<U>::new(
            self.conn,
            schema,
            Condition::new().equal_to(ID_COLUMN, id),
            self.options.clone(),
            self.depth + 1,
        )
        .execute()?;
        let found = results.get_first();
        self.nested.absorb_nested(results.stats());
        let found = found?;

        if self.options.dedup_related {
            if let Some(item) = &found {
                self.cache.insert(key, Rc::new(item.clone()));
            }
        }
        Ok(found)
    }
}
