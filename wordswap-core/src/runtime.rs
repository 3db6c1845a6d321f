//! Async driver that hosts the engine over one page.
//!
//! The page is modeled as a queue of [`PageScript`]s, closures that mutate the
//! document the way page code would. The driver observes the document before
//! the snapshot load starts, so content inserted during the load race is still
//! seen, and after every script it hands the queued mutation records to the
//! coordinator. Store changes and page scripts are handled one at a time; store
//! changes go first when both are ready.

use log::{debug, info, warn};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};

use crate::config::EngineSettings;
use crate::coordinator::ChangeCoordinator;
use crate::dom::Document;
use crate::engines::ScanReport;
use crate::storage::{RuleStore, StorageChange, StoreSnapshot};

/// A unit of page work that may change the document.
pub type PageScript = Box<dyn FnOnce(&mut Document) + Send>;

#[derive(Debug)]
pub struct ContentScript {
    coordinator: ChangeCoordinator,
    document: Document,
    report: ScanReport,
}

impl ContentScript {
    pub fn new(document: Document, settings: &EngineSettings) -> Self {
        Self::with_coordinator(document, ChangeCoordinator::new(settings))
    }

    pub fn with_coordinator(document: Document, coordinator: ChangeCoordinator) -> Self {
        Self {
            coordinator,
            document,
            report: ScanReport::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn coordinator(&self) -> &ChangeCoordinator {
        &self.coordinator
    }

    /// Totals over every scan this driver has run.
    pub fn report(&self) -> &ScanReport {
        &self.report
    }

    fn run_page_script(&mut self, script: PageScript) {
        script(&mut self.document);
        let records = self.document.take_records();
        if records.is_empty() {
            return;
        }
        let report = self.coordinator.handle_mutations(&mut self.document, &records);
        self.report.merge(report);
    }

    /// Returns false once the change stream has closed.
    async fn on_change<S: RuleStore + ?Sized>(
        &mut self,
        change: Result<StorageChange, RecvError>,
        store: &S,
    ) -> bool {
        match change {
            Ok(change) => {
                let report = self.coordinator.handle_storage_change(&mut self.document, &change);
                self.report.merge(report);
                true
            }
            Err(RecvError::Lagged(missed)) => {
                warn!("Missed {} store change(s); reloading the full snapshot.", missed);
                let snapshot = load_or_default(store).await;
                let report = self.coordinator.resync(&mut self.document, snapshot);
                self.report.merge(report);
                true
            }
            Err(RecvError::Closed) => {
                debug!("Store change stream closed.");
                false
            }
        }
    }

    /// Runs until the page queue closes, then returns the driver for inspection.
    pub async fn run<S: RuleStore + ?Sized>(
        mut self,
        store: &S,
        mut page: mpsc::Receiver<PageScript>,
    ) -> Self {
        self.document.observe(true);
        let mut changes: broadcast::Receiver<StorageChange> = store.subscribe();
        let mut changes_open = true;
        let mut page_open = true;

        let load = load_or_default(store);
        tokio::pin!(load);
        let snapshot = loop {
            tokio::select! {
                biased;
                snapshot = &mut load => break snapshot,
                change = changes.recv(), if changes_open => {
                    changes_open = self.on_change(change, store).await;
                }
                script = page.recv(), if page_open => match script {
                    Some(script) => self.run_page_script(script),
                    None => page_open = false,
                },
            }
        };

        let report = self.coordinator.start(&mut self.document, snapshot);
        self.report.merge(report);

        while page_open {
            tokio::select! {
                biased;
                change = changes.recv(), if changes_open => {
                    changes_open = self.on_change(change, store).await;
                }
                script = page.recv() => match script {
                    Some(script) => self.run_page_script(script),
                    None => page_open = false,
                },
            }
        }

        self.document.observe(false);
        info!(
            "Page closed: {} text node(s) scanned, {} replacement(s), {} timed out.",
            self.report.text_nodes, self.report.replacements, self.report.timed_out
        );
        self
    }
}

/// Storage failures degrade to an empty snapshot with the switch on.
async fn load_or_default<S: RuleStore + ?Sized>(store: &S) -> StoreSnapshot {
    match store.load_snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("Could not load the rule store; continuing without rules: {}", e);
            StoreSnapshot::default()
        }
    }
}
