use serde::{Deserialize, Serialize};
use snafu::ensure;

use crate::error::{CollectionFullSnafu, InvalidSessionSizeSnafu, Result};

/// Settings handed to the engine by the external settings store.
///
/// Product policy (free/pro tiers and the like) is resolved by the caller into
/// these plain values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Maximum number of due items pulled into one session. Stored settings
    /// call it `sessionSize`.
    #[serde(alias = "sessionSize")]
    pub session_size_limit: i64,
    /// Maximum number of items the collection may hold, if any.
    pub item_limit: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_size_limit: 10,
            item_limit: None,
        }
    }
}

impl SessionConfig {
    pub fn session_size(&self) -> Result<usize> {
        let limit = self.session_size_limit;
        ensure!(limit >= 0, InvalidSessionSizeSnafu { limit });
        Ok(usize::try_from(limit).unwrap_or(usize::MAX))
    }

    /// Pre-check for item creation. Callers run this before adding to a
    /// collection that currently holds `current` items.
    pub fn ensure_capacity(&self, current: usize) -> Result<()> {
        if let Some(limit) = self.item_limit {
            ensure!(current < limit, CollectionFullSnafu { limit });
        }
        Ok(())
    }
}
