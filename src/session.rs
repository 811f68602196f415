use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use snafu::ensure;
use strum::Display;

use crate::config::SessionConfig;
use crate::error::{AlreadyInSessionSnafu, InvalidTransitionSnafu, Result};
use crate::item::Item;
use crate::repository::Repository;
use crate::scheduler::{Placement, Rating};
use crate::selection::build_queue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SessionState {
    /// No session.
    Idle,
    /// Front item's question shown, answer hidden.
    Presenting,
    /// Front item's answer shown, waiting for a rating.
    Revealed,
    /// A rating was applied; the user chooses to continue or stop.
    AwaitingContinueDecision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Continue,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started { queued: usize },
    NothingDue,
}

/// Result of rating the front item.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    /// The item as written back to the repository.
    pub item: Item,
    pub rating: Rating,
    pub placement: Placement,
}

/// Presentation layer hooks, invoked on state entry.
pub trait SessionObserver {
    fn on_presenting(&mut self, _item: &Item) {}
    fn on_revealed(&mut self, _item: &Item) {}
    fn on_session_ended(&mut self) {}
    fn on_nothing_due(&mut self) {}
}

impl SessionObserver for () {}

/// Drives one practice session at a time over a [`Repository`].
///
/// The engine owns its working queue. Items in it are copies taken at session
/// start; every rating writes the updated copy back before the queue is
/// touched. Whatever is left in the queue when the session ends is dropped and
/// stays due in the repository.
#[derive(Debug)]
pub struct SessionEngine<R, O = ()> {
    repository: R,
    observer: O,
    config: SessionConfig,
    queue: VecDeque<Item>,
    state: SessionState,
}

impl<R: Repository> SessionEngine<R> {
    pub fn new(repository: R, config: SessionConfig) -> Self {
        Self::with_observer(repository, config, ())
    }
}

impl<R: Repository, O: SessionObserver> SessionEngine<R, O> {
    pub fn with_observer(repository: R, config: SessionConfig, observer: O) -> Self {
        Self {
            repository,
            observer,
            config,
            queue: VecDeque::new(),
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The item on screen, if a question or answer is being shown.
    pub fn current(&self) -> Option<&Item> {
        match self.state {
            SessionState::Presenting | SessionState::Revealed => self.queue.front(),
            _ => None,
        }
    }

    pub fn is_answer_shown(&self) -> bool {
        self.state == SessionState::Revealed
    }

    /// Items still queued in this session, including the one on screen.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Mutable access to the collection, only between sessions.
    pub fn repository_mut(&mut self) -> Result<&mut R> {
        ensure!(self.state == SessionState::Idle, AlreadyInSessionSnafu);
        Ok(&mut self.repository)
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_parts(self) -> (R, O) {
        (self.repository, self.observer)
    }

    /// Builds a queue from the items due at `now` and presents the first one.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<StartOutcome> {
        ensure!(self.state == SessionState::Idle, AlreadyInSessionSnafu);
        let limit = self.config.session_size()?;
        let queue = build_queue(self.repository.list_due(now)?, limit);
        if queue.is_empty() {
            info!("nothing due at {now}");
            self.observer.on_nothing_due();
            return Ok(StartOutcome::NothingDue);
        }
        let queued = queue.len();
        self.queue = queue;
        info!("session started with {queued} items (limit {limit})");
        self.present();
        Ok(StartOutcome::Started { queued })
    }

    /// Shows the answer of the current item. Revealing twice is a no-op.
    pub fn reveal(&mut self) -> Result<&Item> {
        let state = self.state;
        let item = match (state, self.queue.front()) {
            (SessionState::Presenting | SessionState::Revealed, Some(item)) => item,
            _ => {
                return InvalidTransitionSnafu {
                    action: "reveal",
                    state,
                }
                .fail();
            }
        };
        if state == SessionState::Presenting {
            self.state = SessionState::Revealed;
            debug!("revealed item {}", item.id);
            self.observer.on_revealed(item);
        }
        Ok(item)
    }

    /// Schedules the revealed item and retires or requeues it.
    ///
    /// If the write-back fails the update is kept in the session anyway and
    /// the engine still moves on; the error is returned for the caller to
    /// surface.
    pub fn rate(&mut self, rating: Rating, now: DateTime<Utc>) -> Result<Review> {
        let state = self.state;
        ensure!(
            state == SessionState::Revealed,
            InvalidTransitionSnafu {
                action: "rate",
                state
            }
        );
        let Some(mut item) = self.queue.pop_front() else {
            return InvalidTransitionSnafu {
                action: "rate",
                state,
            }
            .fail();
        };
        let placement = item.apply_rating(rating, now);
        debug!(
            "rated item {} {rating}: interval {} ease {:.2} next review {}",
            item.id, item.interval, item.ease, item.next_review
        );
        let saved = self.repository.save(&item);
        if let Err(err) = &saved {
            warn!("write-back failed: {err}");
        }
        if placement == Placement::Requeue {
            self.queue.push_back(item.clone());
        }
        self.state = SessionState::AwaitingContinueDecision;
        saved?;
        Ok(Review {
            item,
            rating,
            placement,
        })
    }

    /// Acts on the user's answer at the continue checkpoint and returns the
    /// resulting state.
    pub fn decide(&mut self, decision: Decision) -> Result<SessionState> {
        match decision {
            Decision::Continue => self.proceed()?,
            Decision::Stop => self.stop()?,
        }
        Ok(self.state)
    }

    /// Moves to the next queued item, or ends the session when none are left.
    pub fn proceed(&mut self) -> Result<()> {
        let state = self.state;
        ensure!(
            state == SessionState::AwaitingContinueDecision,
            InvalidTransitionSnafu {
                action: "continue",
                state
            }
        );
        if self.queue.is_empty() {
            self.finish();
        } else {
            self.present();
        }
        Ok(())
    }

    /// Ends the session early. The remaining queue is discarded.
    pub fn stop(&mut self) -> Result<()> {
        let state = self.state;
        ensure!(
            state != SessionState::Idle,
            InvalidTransitionSnafu {
                action: "stop",
                state
            }
        );
        self.finish();
        Ok(())
    }

    fn present(&mut self) {
        self.state = SessionState::Presenting;
        if let Some(item) = self.queue.front() {
            debug!("presenting item {} ({} left)", item.id, self.queue.len());
            self.observer.on_presenting(item);
        }
    }

    fn finish(&mut self) {
        let abandoned = self.queue.len();
        self.queue.clear();
        self.state = SessionState::Idle;
        info!("session ended, {abandoned} items left for a later session");
        self.observer.on_session_ended();
    }
}
