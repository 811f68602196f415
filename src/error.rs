use snafu::Snafu;

use crate::item::ItemId;
use crate::session::SessionState;

#[derive(Snafu, Debug, PartialEq)]
#[snafu(visibility(pub(crate)))]
pub enum SrsError {
    #[snafu(display("unknown rating `{value}`, expected remembered, hard or forgot"))]
    InvalidRating { value: String },
    #[snafu(display("session size limit must not be negative, got {limit}"))]
    InvalidSessionSize { limit: i64 },
    #[snafu(display("question and answer must not be empty"))]
    EmptyContent,
    #[snafu(display("collection already holds the maximum of {limit} items"))]
    CollectionFull { limit: usize },
    #[snafu(display("a session is already in progress"))]
    AlreadyInSession,
    #[snafu(display("cannot {action} while {state}"))]
    InvalidTransition {
        action: &'static str,
        state: SessionState,
    },
    #[snafu(display("no more item ids are available"))]
    IdsExhausted,
    #[snafu(display("no item with id {id}"))]
    UnknownItem { id: ItemId },
    #[snafu(display("failed to read items: {message}"))]
    Storage { message: String },
    #[snafu(display("failed to persist item {id}: {message}"))]
    Persistence { id: ItemId, message: String },
    InvalidDeckSize,
    InvalidProbabilities,
}

pub type Result<T, E = SrsError> = std::result::Result<T, E>;
