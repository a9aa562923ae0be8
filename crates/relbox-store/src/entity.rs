//! Store-side record contract.

use relbox_core::Record;

use crate::errors::Result;
use crate::results::resolver::Resolver;

/// A record the store can save and rebuild.
///
/// Rebuilding starts from `Default`, fills columns through
/// [`Record::set_column`] and relation fields through
/// [`Entity::set_relation`].
pub trait Entity: Record + Default + Clone {
    /// Fill a relation field.
    ///
    /// Called at most once per field and object. Single fields are only
    /// called when a related row exists; array fields only when at least one
    /// element exists; list fields always, possibly with no elements.
    fn set_relation(&mut self, field: &str, related: Related<'_, '_>) -> Result<()>;
}

/// Identities of the objects a relation field held when it was saved, in
/// position order, with a way to load them.
pub struct Related<'r, 'c> {
    ids: Vec<i64>,
    resolver: &'r mut Resolver<'c>,
}

impl<'r, 'c> Related<'r, 'c> {
    pub(crate) fn new(ids: Vec<i64>, resolver: &'r mut Resolver<'c>) -> Self {
        Self { ids, resolver }
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Load the first related object. `None` when there is none or its row
    /// no longer exists.
    pub fn one<U: Entity>(self) -> Result<Option<U>> {
        match self.ids.first() {
            Some(id) => self.resolver.resolve::<U>(*id),
            None => Ok(None),
        }
    }

    /// Load all related objects in position order, skipping rows that no
    /// longer exist.
    pub fn many<U: Entity>(self) -> Result<Vec<U>> {
        let mut items = Vec::with_capacity(self.ids.len());
        for id in &self.ids {
            if let Some(item) = self.resolver.resolve::<U>(*id)? {
                items.push(item);
            }
        }
        Ok(items)
    }
}
