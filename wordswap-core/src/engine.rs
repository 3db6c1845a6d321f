// wordswap-core/src/engine.rs
//! Defines the engine state shared by the node processor and traversal.
//!
//! [`EngineState`] is the single owner of everything that gates matching: the
//! master switch, the compiled matcher state and the per-node time budget. The
//! change coordinator owns one instance per page and is its only writer; the
//! processing functions borrow it, which keeps them testable with hand-built
//! snapshots.
//!
//! License: MIT OR APACHE 2.0

use log::{error, info};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::EngineSettings;
use crate::errors::Result;
use crate::matchers::{compile, CompiledMatcherState};
use crate::rules::RuleSet;

/// Source of timestamps for the per-node time budget.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

pub struct EngineState {
    enabled: bool,
    compiled: Option<CompiledMatcherState>,
    time_budget: Duration,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineState")
            .field("enabled", &self.enabled)
            .field("compiled", &self.compiled)
            .field("time_budget", &self.time_budget)
            .finish_non_exhaustive()
    }
}

impl EngineState {
    /// A state with the switch off and nothing compiled, as before the first load.
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            enabled: false,
            compiled: None,
            time_budget: settings.time_budget(),
            clock: Arc::new(SystemClock),
        }
    }

    /// An enabled state compiled from `rule_set`, surfacing compile errors.
    pub fn from_rules(rule_set: &RuleSet, settings: &EngineSettings) -> Result<Self> {
        let mut state = Self::new(settings);
        state.compiled = Some(compile(rule_set)?);
        state.enabled = true;
        Ok(state)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn compiled(&self) -> Option<&CompiledMatcherState> {
        self.compiled.as_ref()
    }

    /// Switch on and at least one matcher compiled.
    pub fn is_active(&self) -> bool {
        self.enabled && self.compiled.as_ref().is_some_and(|c| c.has_matchers())
    }

    pub fn time_budget(&self) -> Duration {
        self.time_budget
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Replaces the compiled state with one built from `rule_set`.
    ///
    /// The previous state is dropped first, never merged. A snapshot that fails
    /// to compile leaves the engine with no matchers rather than stale ones.
    pub fn install_rules(&mut self, rule_set: &RuleSet) -> bool {
        self.compiled = None;
        match compile(rule_set) {
            Ok(compiled) => {
                info!("Installed {} active rule(s).", compiled.active_rule_count());
                self.compiled = Some(compiled);
                true
            }
            Err(e) => {
                error!("Rule set could not be compiled; replacement is inactive: {}", e);
                false
            }
        }
    }
}
