use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use snafu::ensure;

use crate::error::{EmptyContentSnafu, Result};
use crate::scheduler::INITIAL_EASE;

pub type ItemId = i64;

/// Deck assigned to items that were not filed anywhere else.
pub const DEFAULT_DECK: &str = "default";

fn default_deck() -> String {
    DEFAULT_DECK.to_string()
}

/// Stored records carry the id as a decimal string; integer ids are accepted
/// too.
mod id_string {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::ItemId;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(ItemId),
        Text(String),
    }

    pub fn serialize<S: Serializer>(id: &ItemId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ItemId, D::Error> {
        match RawId::deserialize(deserializer)? {
            RawId::Number(id) => Ok(id),
            RawId::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid item id `{text}`"))),
        }
    }
}

/// A single question/answer card and its scheduling fields.
///
/// Only [`Item::apply_rating`] changes `interval`, `ease`, `next_review` and
/// `last_review`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(with = "id_string")]
    pub id: ItemId,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_deck")]
    pub deck: String,
    /// Days until the next review. 0 until the first successful review.
    pub interval: u32,
    /// Interval growth multiplier, never below [`crate::MIN_EASE`].
    pub ease: f64,
    pub next_review: DateTime<Utc>,
    pub last_review: Option<DateTime<Utc>>,
}

impl Item {
    /// Creates an item that is due immediately.
    pub fn new(id: ItemId, question: &str, answer: &str, now: DateTime<Utc>) -> Result<Self> {
        let question = question.trim();
        let answer = answer.trim();
        ensure!(!question.is_empty() && !answer.is_empty(), EmptyContentSnafu);
        Ok(Self {
            id,
            question: question.to_string(),
            answer: answer.to_string(),
            tags: Vec::new(),
            deck: default_deck(),
            interval: 0,
            ease: INITIAL_EASE,
            next_review: now,
            last_review: None,
        })
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }

    pub fn is_new(&self) -> bool {
        self.last_review.is_none()
    }

    /// Calendar days from `now` to the due date, counted between local
    /// midnights in `now`'s time zone. Overdue items report 0.
    pub fn days_until_due<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> i64 {
        let due = self.next_review.with_timezone(&now.timezone()).date_naive();
        (due - now.date_naive()).num_days().max(0)
    }
}
