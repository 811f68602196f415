use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use itertools::Itertools;

use crate::item::Item;

/// Returns the first `limit` items due at `now`, in collection order.
pub fn select_due(items: &[Item], now: DateTime<Utc>, limit: usize) -> Vec<&Item> {
    items
        .iter()
        .filter(|item| item.is_due(now))
        .take(limit)
        .collect_vec()
}

/// Truncates an ordered due list into a session queue. No reordering, no
/// padding.
pub fn build_queue(due: Vec<Item>, limit: usize) -> VecDeque<Item> {
    due.into_iter().take(limit).collect()
}
