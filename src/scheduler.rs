use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::error::{Result, SrsError};
use crate::item::Item;

pub const INITIAL_EASE: f64 = 2.5;
pub const MIN_EASE: f64 = 1.3;
/// Upper bound on intervals, in days.
pub const MAX_INTERVAL: u32 = 36500;

const REMEMBERED_EASE_BONUS: f64 = 0.15;
const HARD_EASE_PENALTY: f64 = 0.15;
const FORGOT_EASE_PENALTY: f64 = 0.2;
const HARD_INTERVAL_FACTOR: f64 = 1.2;
const FORGOT_DELAY_DAYS: i64 = 1;

/// The answer a user gives after seeing the back of an item.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Rating {
    Remembered,
    Hard,
    Forgot,
}

impl Rating {
    /// Parses the wire name of a rating. Unknown names are rejected before
    /// anything is scheduled.
    pub fn parse(value: &str) -> Result<Self> {
        value.parse().map_err(|_| SrsError::InvalidRating {
            value: value.to_string(),
        })
    }

    /// Where the item goes in the session queue after this rating.
    pub fn placement(self) -> Placement {
        match self {
            Rating::Remembered => Placement::Retire,
            Rating::Hard | Rating::Forgot => Placement::Requeue,
        }
    }
}

/// Queue placement decided by a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Leaves the session.
    Retire,
    /// Goes to the back of the session queue.
    Requeue,
}

/// Scheduling fields produced by a rating.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemState {
    pub interval: u32,
    pub ease: f64,
    pub next_review: DateTime<Utc>,
    pub placement: Placement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NextStates {
    pub remembered: ItemState,
    pub hard: ItemState,
    pub forgot: ItemState,
}

fn grow(interval: u32, factor: f64) -> u32 {
    if interval == 0 {
        1
    } else {
        (interval as f64 * factor)
            .round()
            .clamp(1.0, MAX_INTERVAL as f64) as u32
    }
}

fn days_from(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now + Duration::days(days)
}

/// Computes the state an item with `interval` and `ease` moves to when rated
/// at `now`.
///
/// `forgot` resets the interval to 1 and is always due again one day later.
/// The ease floor only applies to the two decrements.
pub fn next_state(interval: u32, ease: f64, rating: Rating, now: DateTime<Utc>) -> ItemState {
    let (interval, ease, next_review) = match rating {
        Rating::Remembered => {
            let interval = grow(interval, ease);
            (
                interval,
                ease + REMEMBERED_EASE_BONUS,
                days_from(now, interval as i64),
            )
        }
        Rating::Hard => {
            let interval = grow(interval, HARD_INTERVAL_FACTOR);
            (
                interval,
                (ease - HARD_EASE_PENALTY).max(MIN_EASE),
                days_from(now, interval as i64),
            )
        }
        Rating::Forgot => (
            1,
            (ease - FORGOT_EASE_PENALTY).max(MIN_EASE),
            days_from(now, FORGOT_DELAY_DAYS),
        ),
    };
    ItemState {
        interval,
        ease,
        next_review,
        placement: rating.placement(),
    }
}

impl Item {
    /// Previews the outcome of every rating without touching the item.
    pub fn next_states(&self, now: DateTime<Utc>) -> NextStates {
        let state = |rating| next_state(self.interval, self.ease, rating, now);
        NextStates {
            remembered: state(Rating::Remembered),
            hard: state(Rating::Hard),
            forgot: state(Rating::Forgot),
        }
    }

    /// Applies `rating` at `now` and stamps `last_review`.
    pub fn apply_rating(&mut self, rating: Rating, now: DateTime<Utc>) -> Placement {
        let ItemState {
            interval,
            ease,
            next_review,
            placement,
        } = next_state(self.interval, self.ease, rating, now);
        self.interval = interval;
        self.ease = ease;
        self.next_review = next_review;
        self.last_review = Some(now);
        placement
    }
}
