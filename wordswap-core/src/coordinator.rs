//! Keeps the engine consistent with the page and the rule store.
//!
//! The coordinator owns the single [`EngineState`] for a page and reacts to
//! three kinds of input: the initial snapshot, structural mutation batches,
//! and storage changes. Every handler runs to completion and tolerates being
//! called before the first snapshot arrives.
//!
//! License: MIT OR Apache-2.0

use log::{debug, info};
use std::sync::Arc;

use crate::config::EngineSettings;
use crate::dom::{DomSurface, MutationKind, MutationRecord};
use crate::engine::{Clock, EngineState};
use crate::engines::{scan_subtree, scan_whole_document, ScanReport};
use crate::rules::RuleSet;
use crate::storage::{
    enabled_from_value, rule_set_from_value, StorageChange, StoreSnapshot, ENABLED_KEY,
    RULE_SET_KEY,
};

#[derive(Debug)]
pub struct ChangeCoordinator {
    state: EngineState,
}

impl ChangeCoordinator {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            state: EngineState::new(settings),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.state = self.state.with_clock(clock);
        self
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Applies the initial snapshot and scans the page if the switch is on.
    ///
    /// Rules are compiled even with the switch off so a later switch-on can
    /// scan immediately.
    pub fn start<D: DomSurface + ?Sized>(
        &mut self,
        dom: &mut D,
        snapshot: StoreSnapshot,
    ) -> ScanReport {
        info!(
            "Starting with {} rule(s); master switch {}.",
            snapshot.rule_set.len(),
            if snapshot.enabled { "on" } else { "off" }
        );
        self.state.set_enabled(snapshot.enabled);
        self.state.install_rules(&snapshot.rule_set);
        if snapshot.enabled && !snapshot.rule_set.is_empty() {
            scan_whole_document(dom, &self.state)
        } else {
            ScanReport::default()
        }
    }

    /// Scans the nodes each child-list record added. Attribute records and
    /// removals are ignored.
    pub fn handle_mutations<D: DomSurface + ?Sized>(
        &mut self,
        dom: &mut D,
        records: &[MutationRecord],
    ) -> ScanReport {
        let mut report = ScanReport::default();
        if !self.state.is_enabled() {
            return report;
        }
        for record in records.iter().filter(|r| r.kind == MutationKind::ChildList) {
            for &added in &record.added_nodes {
                report.merge(scan_subtree(dom, added, &self.state));
            }
        }
        if report.text_nodes > 0 {
            debug!(
                "Mutation batch: {} text node(s), {} replacement(s).",
                report.text_nodes, report.replacements
            );
        }
        report
    }

    /// Reacts to one store change. Keys other than the rule set and the master
    /// switch are ignored.
    pub fn handle_storage_change<D: DomSurface + ?Sized>(
        &mut self,
        dom: &mut D,
        change: &StorageChange,
    ) -> ScanReport {
        let new_value = change.new_value.as_ref();
        match change.key.as_str() {
            RULE_SET_KEY => self.replace_rules(dom, &rule_set_from_value(new_value)),
            ENABLED_KEY => self.set_master_switch(dom, enabled_from_value(new_value)),
            other => {
                debug!("Ignoring change to unrelated key '{}'.", other);
                ScanReport::default()
            }
        }
    }

    /// Recompiles from a new snapshot, replacing the previous compiled state,
    /// and rescans if the switch is on.
    pub fn replace_rules<D: DomSurface + ?Sized>(
        &mut self,
        dom: &mut D,
        rule_set: &RuleSet,
    ) -> ScanReport {
        info!("Rule set changed; recompiling {} rule(s).", rule_set.len());
        self.state.install_rules(rule_set);
        if self.state.is_enabled() {
            scan_whole_document(dom, &self.state)
        } else {
            ScanReport::default()
        }
    }

    /// Updates the master switch. Only an off-to-on transition triggers a scan.
    pub fn set_master_switch<D: DomSurface + ?Sized>(
        &mut self,
        dom: &mut D,
        enabled: bool,
    ) -> ScanReport {
        let was_enabled = self.state.is_enabled();
        self.state.set_enabled(enabled);
        match (was_enabled, enabled) {
            (false, true) => {
                info!("Master switch turned on; scanning the page.");
                scan_whole_document(dom, &self.state)
            }
            (true, false) => {
                info!("Master switch turned off.");
                ScanReport::default()
            }
            _ => ScanReport::default(),
        }
    }

    /// Re-applies a full snapshot after change notifications were lost.
    pub fn resync<D: DomSurface + ?Sized>(
        &mut self,
        dom: &mut D,
        snapshot: StoreSnapshot,
    ) -> ScanReport {
        self.state.set_enabled(snapshot.enabled);
        self.replace_rules(dom, &snapshot.rule_set)
    }
}
