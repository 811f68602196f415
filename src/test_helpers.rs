use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::error::{Result, SrsError};
use crate::item::{DEFAULT_DECK, Item, ItemId};
use crate::repository::{MemoryRepository, Repository};
use crate::session::SessionObserver;

pub(crate) trait TestHelper {
    fn assert_approx_eq(self, expected: Self);
}

impl TestHelper for f64 {
    #[track_caller]
    fn assert_approx_eq(self, expected: f64) {
        assert!(
            (self - expected).abs() < 1e-9,
            "{self} is not approximately {expected}"
        );
    }
}

/// Midday of the `n`th day after a fixed epoch.
pub(crate) fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::days(n)
}

pub(crate) fn item_with(id: ItemId, interval: u32, ease: f64, next_review: DateTime<Utc>) -> Item {
    Item {
        id,
        question: format!("question {id}"),
        answer: format!("answer {id}"),
        tags: Vec::new(),
        deck: DEFAULT_DECK.to_string(),
        interval,
        ease,
        next_review,
        last_review: None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    Presenting(ItemId),
    Revealed(ItemId),
    Ended,
    NothingDue,
}

#[derive(Debug, Default)]
pub(crate) struct RecordingObserver {
    pub events: Vec<Event>,
}

impl SessionObserver for RecordingObserver {
    fn on_presenting(&mut self, item: &Item) {
        self.events.push(Event::Presenting(item.id));
    }

    fn on_revealed(&mut self, item: &Item) {
        self.events.push(Event::Revealed(item.id));
    }

    fn on_session_ended(&mut self) {
        self.events.push(Event::Ended);
    }

    fn on_nothing_due(&mut self) {
        self.events.push(Event::NothingDue);
    }
}

/// Reads like a [`MemoryRepository`] but every save fails.
#[derive(Debug)]
pub(crate) struct FailingRepository {
    pub inner: MemoryRepository,
}

impl FailingRepository {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            inner: MemoryRepository::from_items(items),
        }
    }
}

impl Repository for FailingRepository {
    fn list_due(&self, now: DateTime<Utc>) -> Result<Vec<Item>> {
        self.inner.list_due(now)
    }

    fn save(&mut self, item: &Item) -> Result<()> {
        Err(SrsError::Persistence {
            id: item.id,
            message: "disk full".to_string(),
        })
    }
}
