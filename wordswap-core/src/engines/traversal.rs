//! Walks a subtree and hands its text nodes to the node processor.
//!
//! Excluded elements and editable regions are pruned as a whole instead of
//! visiting and rejecting every text node inside them. The walk uses an
//! explicit stack, so deeply nested pages cannot overflow the call stack.
//!
//! Editability is resolved through the ancestors once, for the root. Below
//! it every visited element sits in a non-editable region, so only an
//! element's own `contenteditable` can make it editable.

use log::debug;
use serde::Serialize;

use super::processor::{process_reached_text_node, process_text_node, NodeOutcome};
use crate::dom::{is_excluded_tag, DomSurface, NodeId, NodeType};
use crate::engine::EngineState;

/// Counters collected over one or more scans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub text_nodes: usize,
    pub changed: usize,
    pub replacements: usize,
    pub timed_out: usize,
    pub skipped: usize,
    pub pruned: usize,
}

impl ScanReport {
    pub fn record(&mut self, outcome: NodeOutcome) {
        self.text_nodes += 1;
        match outcome {
            NodeOutcome::Skipped(_) => self.skipped += 1,
            NodeOutcome::Unchanged => {}
            NodeOutcome::Replaced { replacements } => {
                self.changed += 1;
                self.replacements += replacements;
            }
            NodeOutcome::TimedOut { replacements_kept } => {
                self.timed_out += 1;
                if replacements_kept > 0 {
                    self.changed += 1;
                    self.replacements += replacements_kept;
                }
            }
        }
    }

    pub fn merge(&mut self, other: ScanReport) {
        self.text_nodes += other.text_nodes;
        self.changed += other.changed;
        self.replacements += other.replacements;
        self.timed_out += other.timed_out;
        self.skipped += other.skipped;
        self.pruned += other.pruned;
    }
}

fn is_excluded_element<D: DomSurface + ?Sized>(dom: &D, element: NodeId) -> bool {
    dom.tag_name(element).is_some_and(is_excluded_tag)
}

enum Placement {
    InBody,
    /// Below an excluded element or outside the body.
    OutOfScope,
}

/// Locates `root` relative to the body so a subtree scan touches exactly the
/// nodes a whole-document scan would.
fn placement<D: DomSurface + ?Sized>(dom: &D, root: NodeId, body: NodeId) -> Placement {
    let mut cursor = Some(root);
    while let Some(node) = cursor {
        if node == body {
            return Placement::InBody;
        }
        if node != root && dom.tag_name(node).is_some_and(is_excluded_tag) {
            return Placement::OutOfScope;
        }
        cursor = dom.parent(node);
    }
    Placement::OutOfScope
}

fn walk<D: DomSurface + ?Sized>(dom: &mut D, root: NodeId, state: &EngineState) -> ScanReport {
    let mut report = ScanReport::default();
    if dom.node_type(root) == NodeType::Element
        && (is_excluded_element(dom, root) || dom.is_editable(root))
    {
        report.pruned += 1;
        return report;
    }

    let mut stack = dom.children(root);
    stack.reverse();
    while let Some(node) = stack.pop() {
        match dom.node_type(node) {
            NodeType::Text => report.record(process_reached_text_node(dom, node, state)),
            NodeType::Element
                if is_excluded_element(dom, node) || dom.editable_override(node) == Some(true) =>
            {
                report.pruned += 1
            }
            NodeType::Element | NodeType::Document => {
                let mut children = dom.children(node);
                children.reverse();
                stack.extend(children);
            }
            NodeType::Other => {}
        }
    }
    report
}

/// Scans every text node under the document body.
pub fn scan_whole_document<D: DomSurface + ?Sized>(
    dom: &mut D,
    state: &EngineState,
) -> ScanReport {
    if !state.is_active() {
        debug!("Whole-document scan skipped: engine inactive.");
        return ScanReport::default();
    }
    let Some(body) = dom.body() else {
        debug!("Whole-document scan skipped: no body yet.");
        return ScanReport::default();
    };
    let report = walk(dom, body, state);
    debug!(
        "Whole-document scan: {} text node(s), {} changed, {} replacement(s), {} timed out.",
        report.text_nodes, report.changed, report.replacements, report.timed_out
    );
    report
}

/// Scans a newly inserted node and its descendants.
pub fn scan_subtree<D: DomSurface + ?Sized>(
    dom: &mut D,
    root: NodeId,
    state: &EngineState,
) -> ScanReport {
    if !state.is_active() {
        return ScanReport::default();
    }
    let Some(body) = dom.body() else {
        return ScanReport::default();
    };
    match placement(dom, root, body) {
        Placement::InBody => {}
        Placement::OutOfScope => return ScanReport::default(),
    }
    if dom.node_type(root) == NodeType::Text {
        let mut report = ScanReport::default();
        report.record(process_text_node(dom, root, state));
        return report;
    }
    walk(dom, root, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineSettings;
    use crate::dom::Document;
    use crate::rules::{Rule, RuleSet};
    use std::cell::Cell;

    /// Counts full editability lookups made against the wrapped document.
    struct CountingDom {
        inner: Document,
        editable_lookups: Cell<usize>,
    }

    impl DomSurface for CountingDom {
        fn body(&self) -> Option<NodeId> {
            self.inner.body()
        }
        fn node_type(&self, node: NodeId) -> NodeType {
            self.inner.node_type(node)
        }
        fn tag_name(&self, node: NodeId) -> Option<&str> {
            self.inner.tag_name(node)
        }
        fn parent(&self, node: NodeId) -> Option<NodeId> {
            self.inner.parent(node)
        }
        fn first_child(&self, node: NodeId) -> Option<NodeId> {
            self.inner.first_child(node)
        }
        fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
            self.inner.next_sibling(node)
        }
        fn text(&self, node: NodeId) -> Option<&str> {
            self.inner.text(node)
        }
        fn set_text(&mut self, node: NodeId, value: String) {
            self.inner.set_text(node, value)
        }
        fn editable_override(&self, node: NodeId) -> Option<bool> {
            self.inner.editable_override(node)
        }
        fn design_mode(&self) -> bool {
            self.inner.design_mode()
        }
        fn is_editable(&self, node: NodeId) -> bool {
            self.editable_lookups.set(self.editable_lookups.get() + 1);
            self.inner.is_editable(node)
        }
    }

    fn state() -> EngineState {
        let mut set = RuleSet::new();
        set.add("cat", Rule::new("dog")).unwrap();
        EngineState::from_rules(&set, &EngineSettings::default()).unwrap()
    }

    #[test]
    fn prunes_excluded_and_editable_subtrees() {
        let mut doc = Document::with_body();
        let body = doc.body().unwrap();
        let p = doc.append_element(body, "p");
        let visible = doc.append_text(p, "a cat");
        let script = doc.append_element(body, "script");
        let code = doc.append_text(script, "var cat = 1;");
        let editor = doc.append_element(body, "div");
        doc.set_attribute(editor, "contenteditable", "");
        let nested = doc.append_element(editor, "b");
        let typed = doc.append_text(nested, "cat");

        let report = scan_whole_document(&mut doc, &state());
        assert_eq!(report.text_nodes, 1);
        assert_eq!(report.changed, 1);
        assert_eq!(report.pruned, 2);
        assert_eq!(doc.text(visible), Some("a dog"));
        assert_eq!(doc.text(code), Some("var cat = 1;"));
        assert_eq!(doc.text(typed), Some("cat"));
    }

    #[test]
    fn head_text_is_out_of_scope() {
        let mut doc = Document::with_body();
        let head = doc.elements_by_tag("head")[0];
        let title = doc.append_element(head, "title");
        let text = doc.append_text(title, "cat");

        scan_whole_document(&mut doc, &state());
        assert_eq!(scan_subtree(&mut doc, title, &state()), ScanReport::default());
        assert_eq!(doc.text(text), Some("cat"));
    }

    #[test]
    fn subtree_under_noscript_is_skipped() {
        let mut doc = Document::with_body();
        let body = doc.body().unwrap();
        let noscript = doc.append_element(body, "noscript");
        let inner = doc.append_element(noscript, "p");
        let text = doc.append_text(inner, "cat");
        assert_eq!(scan_subtree(&mut doc, inner, &state()), ScanReport::default());
        assert_eq!(doc.text(text), Some("cat"));
    }

    #[test]
    fn text_root_is_processed_directly() {
        let mut doc = Document::with_body();
        let body = doc.body().unwrap();
        let text = doc.append_text(body, "cat nap");
        let report = scan_subtree(&mut doc, text, &state());
        assert_eq!(report.replacements, 1);
        assert_eq!(doc.text(text), Some("dog nap"));
    }

    #[test]
    fn inactive_engine_scans_nothing() {
        let mut doc = Document::with_body();
        let body = doc.body().unwrap();
        let text = doc.append_text(body, "cat");
        let mut state = state();
        state.set_enabled(false);
        assert_eq!(scan_whole_document(&mut doc, &state), ScanReport::default());
        assert_eq!(doc.text(text), Some("cat"));
    }

    #[test]
    fn deep_pages_resolve_editability_once() {
        let mut doc = Document::with_body();
        let mut parent = doc.body().unwrap();
        for _ in 0..200 {
            parent = doc.append_element(parent, "div");
            doc.append_text(parent, "cat");
        }
        let mut dom = CountingDom {
            inner: doc,
            editable_lookups: Cell::new(0),
        };

        let report = scan_whole_document(&mut dom, &state());
        assert_eq!(report.text_nodes, 200);
        assert_eq!(report.changed, 200);
        assert_eq!(dom.editable_lookups.get(), 1);
    }

    #[test]
    fn locked_region_inside_an_editor_is_scanned_when_rooted_there() {
        let mut doc = Document::with_body();
        let body = doc.body().unwrap();
        let editor = doc.append_element(body, "div");
        doc.set_attribute(editor, "contenteditable", "true");
        let locked = doc.append_element(editor, "section");
        doc.set_attribute(locked, "contenteditable", "false");
        let inner = doc.append_element(locked, "p");
        let fixed = doc.append_text(inner, "cat");
        let nested_editor = doc.append_element(locked, "div");
        doc.set_attribute(nested_editor, "contenteditable", "plaintext-only");
        let typed = doc.append_text(nested_editor, "cat");

        let report = scan_subtree(&mut doc, locked, &state());
        assert_eq!(report.changed, 1);
        assert_eq!(report.pruned, 1);
        assert_eq!(doc.text(fixed), Some("dog"));
        assert_eq!(doc.text(typed), Some("cat"));

        // From the body, the outer editor hides everything below it.
        doc.set_text(fixed, "cat".to_string());
        let report = scan_whole_document(&mut doc, &state());
        assert_eq!(report.pruned, 1);
        assert_eq!(doc.text(fixed), Some("cat"));
    }

    #[test]
    fn design_mode_with_a_locked_body_only_prunes_editors() {
        let mut doc = Document::with_body();
        let body = doc.body().unwrap();
        doc.set_design_mode(true);
        doc.set_attribute(body, "contenteditable", "false");
        let p = doc.append_element(body, "p");
        let plain = doc.append_text(p, "cat");
        let editor = doc.append_element(body, "div");
        doc.set_attribute(editor, "contenteditable", "");
        let typed = doc.append_text(editor, "cat");

        scan_whole_document(&mut doc, &state());
        assert_eq!(doc.text(plain), Some("dog"));
        assert_eq!(doc.text(typed), Some("cat"));
    }
}
