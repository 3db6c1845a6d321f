//! Per-node time budget.
//!
//! This is a cooperative check made between match callbacks, not a preemptive
//! timeout: a single slow match can overrun the budget before the next check.

use std::time::{Duration, Instant};
use thiserror::Error;

use crate::engine::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("substitution used {elapsed:?} of a {budget:?} budget")]
pub struct BudgetExceeded {
    pub elapsed: Duration,
    pub budget: Duration,
}

pub struct Deadline<'a> {
    clock: &'a dyn Clock,
    started: Instant,
    budget: Duration,
}

impl<'a> Deadline<'a> {
    pub fn start(clock: &'a dyn Clock, budget: Duration) -> Self {
        Self {
            started: clock.now(),
            clock,
            budget,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_duration_since(self.started)
    }

    /// Fails once more than the budget has elapsed since `start`.
    pub fn check(&self) -> Result<(), BudgetExceeded> {
        let elapsed = self.elapsed();
        if elapsed > self.budget {
            Err(BudgetExceeded {
                elapsed,
                budget: self.budget,
            })
        } else {
            Ok(())
        }
    }
}
