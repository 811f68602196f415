use chrono::{DateTime, Utc};
use log::debug;
use snafu::OptionExt;

use crate::error::{IdsExhaustedSnafu, Result, SrsError};
use crate::item::{Item, ItemId};
use crate::selection::select_due;

/// Source of truth for the item collection.
///
/// Implementations backed by durable storage must have written the item by
/// the time `save` returns. A failed write is reported as
/// [`SrsError::Persistence`] and is not retried by the engine.
pub trait Repository {
    /// Items due at `now`, in collection order.
    fn list_due(&self, now: DateTime<Utc>) -> Result<Vec<Item>>;

    fn save(&mut self, item: &Item) -> Result<()>;
}

/// Collection kept in memory, in insertion order.
#[derive(Debug, Clone)]
pub struct MemoryRepository {
    items: Vec<Item>,
    /// `None` once the id space is used up.
    next_id: Option<ItemId>,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_id: Some(0),
        }
    }
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<Item>) -> Self {
        let next_id = items
            .iter()
            .map(|item| item.id)
            .max()
            .map_or(Some(0), |max| max.checked_add(1));
        Self { items, next_id }
    }

    /// Creates a new item due at `now` and returns its id.
    pub fn add(&mut self, question: &str, answer: &str, now: DateTime<Utc>) -> Result<ItemId> {
        let id = self.next_id.context(IdsExhaustedSnafu)?;
        let item = Item::new(id, question, answer, now)?;
        self.items.push(item);
        self.next_id = id.checked_add(1);
        debug!("added item {id}");
        Ok(id)
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn due_count(&self, now: DateTime<Utc>) -> usize {
        self.items.iter().filter(|item| item.is_due(now)).count()
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }
}

impl Repository for MemoryRepository {
    fn list_due(&self, now: DateTime<Utc>) -> Result<Vec<Item>> {
        Ok(select_due(&self.items, now, usize::MAX)
            .into_iter()
            .cloned()
            .collect())
    }

    fn save(&mut self, item: &Item) -> Result<()> {
        let slot = self
            .items
            .iter_mut()
            .find(|existing| existing.id == item.id)
            .ok_or(SrsError::UnknownItem { id: item.id })?;
        *slot = item.clone();
        Ok(())
    }
}
