//! HTML serialization for [`Document`] trees.
//!
//! Text inside raw-text elements is written verbatim; everywhere else `&`,
//! `<` and `>` are escaped. Void elements get no end tag.

use super::document::{Document, NodeKind};
use super::{DomSurface, NodeId};

const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr", "param",
];

const RAW_TEXT_ELEMENTS: [&str; 8] = [
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext", "noscript",
];

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

enum Step {
    Open(NodeId),
    Close(NodeId),
}

impl Document {
    /// Serializes the whole document.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in self.children(self.root()) {
            self.write_node(child, &mut out);
        }
        out
    }

    fn write_node(&self, node: NodeId, out: &mut String) {
        let mut stack = vec![Step::Open(node)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Open(current) => match self.kind(current) {
                    NodeKind::Document => {
                        for child in self.children(current).into_iter().rev() {
                            stack.push(Step::Open(child));
                        }
                    }
                    NodeKind::Doctype(name) => {
                        out.push_str("<!DOCTYPE ");
                        out.push_str(name);
                        out.push('>');
                    }
                    NodeKind::Comment(text) => {
                        out.push_str("<!--");
                        out.push_str(text);
                        out.push_str("-->");
                    }
                    NodeKind::Text(text) => {
                        let raw = self
                            .parent(current)
                            .and_then(|p| self.tag_name(p))
                            .is_some_and(|t| RAW_TEXT_ELEMENTS.contains(&t));
                        if raw {
                            out.push_str(text);
                        } else {
                            escape_text(text, out);
                        }
                    }
                    NodeKind::Element(element) => {
                        out.push('<');
                        out.push_str(&element.tag);
                        for (name, value) in &element.attrs {
                            out.push(' ');
                            out.push_str(name);
                            out.push_str("=\"");
                            escape_attr(value, out);
                            out.push('"');
                        }
                        out.push('>');
                        if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                            continue;
                        }
                        stack.push(Step::Close(current));
                        for child in self.children(current).into_iter().rev() {
                            stack.push(Step::Open(child));
                        }
                    }
                },
                Step::Close(current) => {
                    if let Some(tag) = self.tag_name(current) {
                        out.push_str("</");
                        out.push_str(tag);
                        out.push('>');
                    }
                }
            }
        }
    }
}
