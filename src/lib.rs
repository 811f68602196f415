//! Spaced-repetition scheduling for question/answer items.
//!
//! [`SessionEngine`] pulls due items from a [`Repository`], presents them one
//! at a time and applies the interval/ease update of [`next_state`] to every
//! rating. `hard` and `forgot` send the item to the back of the session queue;
//! `remembered` retires it.

mod config;
mod error;
mod item;
mod repository;
mod scheduler;
mod selection;
mod session;
mod simulation;
#[cfg(test)]
mod sqlite_tests;
#[cfg(test)]
mod test_helpers;

pub use config::SessionConfig;
pub use error::{Result, SrsError};
pub use item::{DEFAULT_DECK, Item, ItemId};
pub use repository::{MemoryRepository, Repository};
pub use scheduler::{
    INITIAL_EASE, ItemState, MAX_INTERVAL, MIN_EASE, NextStates, Placement, Rating, next_state,
};
pub use selection::{build_queue, select_due};
pub use session::{
    Decision, Review, SessionEngine, SessionObserver, SessionState, StartOutcome,
};
pub use simulation::{SimulationResult, SimulatorConfig, simulate};
