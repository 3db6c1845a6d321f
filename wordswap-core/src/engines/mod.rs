//! Applying compiled rules to a document.
//!
//! `processor` rewrites a single text node under a time budget; `traversal`
//! walks a subtree and feeds it text nodes, pruning regions that must never
//! be rewritten.

pub mod budget;
pub mod processor;
pub mod traversal;

pub use budget::{BudgetExceeded, Deadline};
pub use processor::{process_text_node, NodeOutcome, SkipReason};
pub use traversal::{scan_subtree, scan_whole_document, ScanReport};
