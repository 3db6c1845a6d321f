// wordswap-core/src/lib.rs
//! # Wordswap Core Library
//!
//! `wordswap-core` holds the text-replacement engine behind Wordswap: it
//! compiles a set of literal word/phrase rules into two combined matchers
//! (case-sensitive and case-insensitive), applies them to the text nodes of a
//! live document under a per-node time budget, and keeps the page consistent
//! as both the document and the rule set change.
//!
//! ## Modules
//!
//! * `rules`: `Rule` and `RuleSet`, plus the validating editors used by the settings surface.
//! * `config`: Engine settings and the quotas shared by editors and stores.
//! * `matchers`: The pattern compiler and the O(1) match resolver.
//! * `dom`: The `DomSurface` trait and the arena `Document` with mutation recording.
//! * `engine`: `EngineState` and the injectable `Clock`.
//! * `engines`: The node processor and the subtree traversal.
//! * `coordinator`: Reacts to snapshots, mutation batches and store changes.
//! * `storage`: The async `RuleStore` trait with memory and file-backed stores.
//! * `runtime`: The async `ContentScript` driver hosting the engine over one page.
//! * `headless`: One-shot replacement without a store or observer.
//!
//! ## Usage Example
//!
//! ```rust
//! use wordswap_core::{headless_apply, Document, DomSurface, EngineSettings, Rule, RuleSet};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut rules = RuleSet::new();
//!     rules.add("cat", Rule::new("dog"))?;
//!
//!     let mut doc = Document::with_body();
//!     let body = doc.body().expect("skeleton has a body");
//!     doc.append_text(body, "catch the cat");
//!
//!     headless_apply(&rules, &EngineSettings::default(), &mut doc)?;
//!     assert_eq!(doc.text_content(body), "catch the dog");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible library operations return [`WordswapError`]. The engine itself
//! never fails on bad input: unreadable storage means "no rules", a node that
//! runs over its time budget is skipped, and a span with no matching rule is
//! left as it was.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod coordinator;
pub mod diagnostics;
pub mod dom;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod headless;
pub mod matchers;
pub mod rules;
pub mod runtime;
pub mod storage;

pub use config::{EngineSettings, DEFAULT_TIME_BUDGET_MS, MAX_RULES, MAX_STORE_BYTES};
pub use coordinator::ChangeCoordinator;
pub use dom::{Document, DomSurface, MutationKind, MutationRecord, NodeId, NodeKind, NodeType};
pub use engine::{Clock, EngineState, SystemClock};
pub use engines::{
    process_text_node, scan_subtree, scan_whole_document, NodeOutcome, ScanReport, SkipReason,
};
pub use errors::WordswapError;
pub use headless::headless_apply;
pub use matchers::{compile, CompiledMatcherState};
pub use rules::{Rule, RuleSet};
pub use runtime::{ContentScript, PageScript};
pub use storage::{
    FileStore, MemoryStore, RuleStore, StorageChange, StoreSnapshot, ENABLED_KEY, RULE_SET_KEY,
};
