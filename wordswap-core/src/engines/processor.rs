//! Rewrites one text node.
//!
//! The case-sensitive matcher runs first and its output becomes the input of
//! the case-insensitive matcher. An insensitive key may therefore match inside
//! text a sensitive rule just wrote; that re-entrancy is accepted behavior.
//!
//! License: MIT OR APACHE 2.0

use log::{trace, warn};
use regex::Regex;

use super::budget::{BudgetExceeded, Deadline};
use crate::diagnostics::loggable;
use crate::dom::{is_excluded_tag, DomSurface, NodeId};
use crate::engine::EngineState;
use crate::matchers::CompiledMatcherState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Master switch is off.
    Disabled,
    /// Nothing compiled, or no enabled rules.
    NoMatchers,
    NotText,
    /// Parent is a script, style, noscript, textarea or input element.
    ExcludedParent,
    /// The text sits in a region the user can edit.
    Editable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOutcome {
    Skipped(SkipReason),
    /// Scanned, but the text came out identical.
    Unchanged,
    Replaced { replacements: usize },
    /// The budget ran out. A completed case-sensitive pass is kept.
    TimedOut { replacements_kept: usize },
}

struct PassResult {
    /// New text, present only when it differs from the original.
    changed: Option<String>,
    replacements: usize,
    timed_out: Option<BudgetExceeded>,
}

/// Replaces every match of `pattern` in `text`, checking the deadline before
/// each one. `Ok(None)` means nothing matched.
fn substitute(
    pattern: &Regex,
    text: &str,
    compiled: &CompiledMatcherState,
    deadline: &Deadline<'_>,
) -> Result<Option<(String, usize)>, BudgetExceeded> {
    let mut out = String::new();
    let mut last_end = 0;
    let mut count = 0;
    for m in pattern.find_iter(text) {
        deadline.check()?;
        out.push_str(&text[last_end..m.start()]);
        out.push_str(compiled.resolve(m.as_str()));
        last_end = m.end();
        count += 1;
    }
    if count == 0 {
        return Ok(None);
    }
    out.push_str(&text[last_end..]);
    Ok(Some((out, count)))
}

fn run_passes(text: &str, compiled: &CompiledMatcherState, deadline: &Deadline<'_>) -> PassResult {
    let mut current: Option<String> = None;
    let mut replacements = 0;

    if let Some(pattern) = compiled.sensitive_pattern() {
        match substitute(pattern, text, compiled, deadline) {
            Ok(Some((replaced, n))) => {
                current = Some(replaced);
                replacements += n;
            }
            Ok(None) => {}
            Err(e) => {
                return PassResult {
                    changed: None,
                    replacements: 0,
                    timed_out: Some(e),
                }
            }
        }
    }

    if let Some(pattern) = compiled.insensitive_pattern() {
        let base = current.as_deref().unwrap_or(text);
        match substitute(pattern, base, compiled, deadline) {
            Ok(Some((replaced, n))) => {
                current = Some(replaced);
                replacements += n;
            }
            Ok(None) => {}
            Err(e) => {
                return PassResult {
                    changed: current.filter(|t| t != text),
                    replacements,
                    timed_out: Some(e),
                }
            }
        }
    }

    PassResult {
        changed: current.filter(|t| t != text),
        replacements,
        timed_out: None,
    }
}

/// Whether `node`'s parent is an element whose text must never be rewritten.
pub fn has_excluded_parent<D: DomSurface + ?Sized>(dom: &D, node: NodeId) -> bool {
    dom.parent(node)
        .and_then(|p| dom.tag_name(p))
        .is_some_and(is_excluded_tag)
}

fn active_matchers(state: &EngineState) -> Result<&CompiledMatcherState, SkipReason> {
    if !state.is_enabled() {
        return Err(SkipReason::Disabled);
    }
    state
        .compiled()
        .filter(|c| c.has_matchers())
        .ok_or(SkipReason::NoMatchers)
}

/// Applies the compiled rules in `state` to one text node.
///
/// Text is written back only when a substitution actually changed it.
pub fn process_text_node<D: DomSurface + ?Sized>(
    dom: &mut D,
    node: NodeId,
    state: &EngineState,
) -> NodeOutcome {
    let compiled = match active_matchers(state) {
        Ok(compiled) => compiled,
        Err(reason) => return NodeOutcome::Skipped(reason),
    };
    if dom.text(node).is_none() {
        return NodeOutcome::Skipped(SkipReason::NotText);
    }
    if has_excluded_parent(dom, node) {
        return NodeOutcome::Skipped(SkipReason::ExcludedParent);
    }
    if dom.is_editable(node) {
        return NodeOutcome::Skipped(SkipReason::Editable);
    }
    rewrite(dom, node, compiled, state)
}

/// [`process_text_node`] for a text node reached by the traversal, which has
/// already pruned excluded elements and editable regions above it.
pub(crate) fn process_reached_text_node<D: DomSurface + ?Sized>(
    dom: &mut D,
    node: NodeId,
    state: &EngineState,
) -> NodeOutcome {
    let compiled = match active_matchers(state) {
        Ok(compiled) => compiled,
        Err(reason) => return NodeOutcome::Skipped(reason),
    };
    if dom.text(node).is_none() {
        return NodeOutcome::Skipped(SkipReason::NotText);
    }
    rewrite(dom, node, compiled, state)
}

fn rewrite<D: DomSurface + ?Sized>(
    dom: &mut D,
    node: NodeId,
    compiled: &CompiledMatcherState,
    state: &EngineState,
) -> NodeOutcome {
    let deadline = Deadline::start(state.clock(), state.time_budget());
    let pass = {
        let text = dom.text(node).unwrap_or_default();
        let pass = run_passes(text, compiled, &deadline);
        if let Some(e) = &pass.timed_out {
            warn!(
                "Replacement in text node {} ({}) stopped after {:?} (budget {:?}); \
                 leaving it partially processed.",
                node.index(),
                loggable(text),
                e.elapsed,
                e.budget
            );
        }
        pass
    };

    let kept = pass.changed.is_some();
    if let Some(new_text) = pass.changed {
        trace!(
            "Rewriting text node {} ({} replacement(s)).",
            node.index(),
            pass.replacements
        );
        dom.set_text(node, new_text);
    }

    match pass.timed_out {
        Some(_) => NodeOutcome::TimedOut {
            replacements_kept: if kept { pass.replacements } else { 0 },
        },
        None if kept => NodeOutcome::Replaced {
            replacements: pass.replacements,
        },
        None => NodeOutcome::Unchanged,
    }
}
