use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use itertools::Itertools;
use log::info;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use snafu::ensure;
use strum::IntoEnumIterator;

use crate::config::SessionConfig;
use crate::error::{InvalidDeckSizeSnafu, InvalidProbabilitiesSnafu, Result, SrsError};
use crate::item::Item;
use crate::repository::MemoryRepository;
use crate::scheduler::{Placement, Rating};
use crate::session::{Decision, SessionEngine, SessionState, StartOutcome};

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    pub deck_size: usize,
    pub days: usize,
    pub session_size_limit: i64,
    /// Weights for remembered, hard and forgot, in that order.
    pub rating_prob: [f32; 3],
    /// Ratings given per day before the reviewer stops early.
    pub max_reviews_per_day: usize,
    /// Chance of choosing to continue at each checkpoint.
    pub continue_prob: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            deck_size: 100,
            days: 30,
            session_size_limit: 10,
            rating_prob: [0.7, 0.2, 0.1],
            max_reviews_per_day: 50,
            continue_prob: 1.0,
        }
    }
}

#[derive(Debug)]
pub struct SimulationResult {
    pub review_cnt_per_day: Vec<usize>,
    /// Items rated `remembered`, which leave the session.
    pub retired_cnt_per_day: Vec<usize>,
    /// Items due when the day's session starts.
    pub due_cnt_per_day: Vec<usize>,
    pub rating_counts: HashMap<Rating, usize>,
    pub items: Vec<Item>,
}

/// Runs one session per day for `config.days` days over a fresh deck created
/// at `start`, answering with a seeded random reviewer.
pub fn simulate(
    config: &SimulatorConfig,
    start: DateTime<Utc>,
    seed: Option<u64>,
) -> Result<SimulationResult> {
    ensure!(config.deck_size > 0, InvalidDeckSizeSnafu);
    ensure!(
        (0.0..=1.0).contains(&config.continue_prob),
        InvalidProbabilitiesSnafu
    );
    let rating_dist =
        WeightedIndex::new(config.rating_prob).map_err(|_| SrsError::InvalidProbabilities)?;
    let ratings = Rating::iter().collect_vec();
    let mut rng = StdRng::seed_from_u64(seed.unwrap_or(42));

    let mut repository = MemoryRepository::new();
    for i in 0..config.deck_size {
        repository.add(&format!("question {i}"), &format!("answer {i}"), start)?;
    }
    let session_config = SessionConfig {
        session_size_limit: config.session_size_limit,
        ..Default::default()
    };
    let mut engine = SessionEngine::new(repository, session_config);

    let mut review_cnt_per_day = vec![0; config.days];
    let mut retired_cnt_per_day = vec![0; config.days];
    let mut due_cnt_per_day = vec![0; config.days];
    let mut given = Vec::new();

    for day in 0..config.days {
        let now = start + Duration::days(day as i64);
        due_cnt_per_day[day] = engine.repository().due_count(now);
        if engine.start(now)? == StartOutcome::NothingDue {
            continue;
        }
        while engine.state() != SessionState::Idle {
            if review_cnt_per_day[day] >= config.max_reviews_per_day {
                engine.stop()?;
                break;
            }
            engine.reveal()?;
            let rating = ratings[rating_dist.sample(&mut rng)];
            let review = engine.rate(rating, now)?;
            review_cnt_per_day[day] += 1;
            if review.placement == Placement::Retire {
                retired_cnt_per_day[day] += 1;
            }
            given.push(rating);
            let decision = if rng.random_bool(config.continue_prob) {
                Decision::Continue
            } else {
                Decision::Stop
            };
            engine.decide(decision)?;
        }
    }

    info!(
        "simulated {} days: {} reviews, {} retired",
        config.days,
        review_cnt_per_day.iter().sum::<usize>(),
        retired_cnt_per_day.iter().sum::<usize>()
    );
    let (repository, ()) = engine.into_parts();
    Ok(SimulationResult {
        review_cnt_per_day,
        retired_cnt_per_day,
        due_cnt_per_day,
        rating_counts: given.into_iter().counts(),
        items: repository.into_items(),
    })
}
