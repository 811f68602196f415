use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};

use crate::error::{Result, SrsError};
use crate::item::{Item, ItemId};
use crate::repository::Repository;
use crate::scheduler::Rating;
use crate::session::{Decision, SessionEngine, SessionState, StartOutcome};
use crate::test_helpers::{TestHelper, day, item_with};
use crate::{MIN_EASE, SessionConfig};

const SCHEMA: &str = "CREATE TABLE items (
    id INTEGER PRIMARY KEY,
    question TEXT NOT NULL,
    answer TEXT NOT NULL,
    tags TEXT NOT NULL,
    deck TEXT NOT NULL,
    interval_days INTEGER NOT NULL,
    ease REAL NOT NULL,
    next_review INTEGER NOT NULL,
    last_review INTEGER
)";

/// Durable collection: every save is committed before it returns.
struct SqliteRepository {
    db: Connection,
}

fn timestamp(col: usize, millis: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(col, millis))
}

fn tags(col: usize, json: String) -> rusqlite::Result<Vec<String>> {
    serde_json::from_str(&json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(col, Type::Text, Box::new(e)))
}

impl TryFrom<&Row<'_>> for Item {
    type Error = rusqlite::Error;
    fn try_from(row: &Row<'_>) -> rusqlite::Result<Self> {
        let last_review: Option<i64> = row.get(8)?;
        Ok(Item {
            id: row.get(0)?,
            question: row.get(1)?,
            answer: row.get(2)?,
            tags: tags(3, row.get(3)?)?,
            deck: row.get(4)?,
            interval: row.get(5)?,
            ease: row.get(6)?,
            next_review: timestamp(7, row.get(7)?)?,
            last_review: last_review.map(|ms| timestamp(8, ms)).transpose()?,
        })
    }
}

impl SqliteRepository {
    fn open_in_memory() -> rusqlite::Result<Self> {
        let db = Connection::open_in_memory()?;
        db.execute_batch(SCHEMA)?;
        Ok(Self { db })
    }

    fn insert(&self, item: &Item) -> rusqlite::Result<()> {
        let tags = serde_json::to_string(&item.tags)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        self.db.execute(
            "INSERT INTO items VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                item.id,
                item.question,
                item.answer,
                tags,
                item.deck,
                item.interval,
                item.ease,
                item.next_review.timestamp_millis(),
                item.last_review.map(|t| t.timestamp_millis()),
            ],
        )?;
        Ok(())
    }

    fn load(&self, id: ItemId) -> rusqlite::Result<Item> {
        self.db.query_row(
            "SELECT * FROM items WHERE id = ?1",
            [id],
            |row| Item::try_from(row),
        )
    }
}

impl Repository for SqliteRepository {
    fn list_due(&self, now: DateTime<Utc>) -> Result<Vec<Item>> {
        let read = || -> rusqlite::Result<Vec<Item>> {
            self.db
                .prepare_cached("SELECT * FROM items WHERE next_review <= ?1 ORDER BY rowid")?
                .query_and_then([now.timestamp_millis()], |row| Item::try_from(row))?
                .collect()
        };
        read().map_err(|e| SrsError::Storage {
            message: e.to_string(),
        })
    }

    fn save(&mut self, item: &Item) -> Result<()> {
        let updated = self
            .db
            .execute(
                "UPDATE items SET interval_days = ?2, ease = ?3, next_review = ?4, last_review = ?5
                 WHERE id = ?1",
                params![
                    item.id,
                    item.interval,
                    item.ease,
                    item.next_review.timestamp_millis(),
                    item.last_review.map(|t| t.timestamp_millis()),
                ],
            )
            .map_err(|e| SrsError::Persistence {
                id: item.id,
                message: e.to_string(),
            })?;
        if updated == 0 {
            return Err(SrsError::UnknownItem { id: item.id });
        }
        Ok(())
    }
}

fn seeded_repository(items: &[Item]) -> SqliteRepository {
    let repository = SqliteRepository::open_in_memory().unwrap();
    for item in items {
        repository.insert(item).unwrap();
    }
    repository
}

#[test]
fn ratings_are_written_through_to_storage() -> Result<()> {
    let mut tagged = item_with(0, 0, 2.5, day(0));
    tagged.tags = vec!["verbs".into(), "n5".into()];
    tagged.deck = "japanese".into();
    let items = [
        tagged,
        item_with(1, 0, 2.5, day(0)),
        item_with(2, 4, 1.4, day(-1)),
        item_with(3, 9, 2.5, day(9)),
    ];
    let mut engine = SessionEngine::new(seeded_repository(&items), SessionConfig::default());
    assert_eq!(engine.start(day(0))?, StartOutcome::Started { queued: 3 });

    engine.reveal()?;
    engine.rate(Rating::Hard, day(0))?;
    engine.decide(Decision::Continue)?;
    engine.reveal()?;
    engine.rate(Rating::Remembered, day(0))?;
    engine.decide(Decision::Continue)?;
    engine.reveal()?;
    engine.rate(Rating::Forgot, day(0))?;
    assert_eq!(engine.decide(Decision::Stop)?, SessionState::Idle);

    let db = engine.repository();
    let hard = db.load(0).unwrap();
    assert_eq!(hard.interval, 1);
    hard.ease.assert_approx_eq(2.35);
    assert_eq!(hard.next_review, day(1));
    assert_eq!(hard.last_review, Some(day(0)));
    assert_eq!(hard.tags, ["verbs", "n5"]);
    assert_eq!(hard.deck, "japanese");

    let remembered = db.load(1).unwrap();
    assert_eq!(remembered.interval, 1);
    remembered.ease.assert_approx_eq(2.65);

    let forgot = db.load(2).unwrap();
    assert_eq!(forgot.interval, 1);
    assert_eq!(forgot.ease, MIN_EASE);
    assert_eq!(forgot.next_review, day(1));

    assert_eq!(db.load(3).unwrap(), items[3]);

    // everything rated today is due tomorrow, the untouched item later
    assert!(db.list_due(day(0))?.is_empty());
    let due = db.list_due(day(1))?;
    assert_eq!(due.iter().map(|item| item.id).collect::<Vec<_>>(), [0, 1, 2]);
    Ok(())
}

#[test]
fn storage_failure_is_reported() -> Result<()> {
    let items = [item_with(0, 0, 2.5, day(0))];
    let mut engine = SessionEngine::new(seeded_repository(&items), SessionConfig::default());
    engine.start(day(0))?;
    engine.reveal()?;
    engine.repository().db.execute_batch("DROP TABLE items").unwrap();

    let err = engine.rate(Rating::Remembered, day(0)).unwrap_err();
    assert!(matches!(err, SrsError::Persistence { id: 0, .. }));
    assert_eq!(engine.state(), SessionState::AwaitingContinueDecision);
    engine.proceed()?;
    assert_eq!(engine.state(), SessionState::Idle);

    assert!(matches!(
        engine.start(day(0)).unwrap_err(),
        SrsError::Storage { .. }
    ));
    Ok(())
}
