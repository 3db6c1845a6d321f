//! Loads HTML text into the engine's arena `Document`.
//!
//! Parsing is delegated to `scraper` (html5ever), so the usual browser repairs
//! apply: a missing `<html>`, `<head>` or `<body>` is synthesized and stray
//! tags are re-parented. The parsed tree is then copied node by node.
//!
//! License: MIT OR Apache-2.0

use scraper::{Html, Node};
use wordswap_core::Document;

/// Parses `source` as a full HTML document.
pub fn parse_document(source: &str) -> Document {
    let html = Html::parse_document(source);
    let mut doc = Document::new();

    let mut stack: Vec<_> = html.tree.root().children().map(|c| (c, doc.root())).collect();
    stack.reverse();

    while let Some((node, parent)) = stack.pop() {
        let id = match node.value() {
            Node::Doctype(doctype) => doc.create_doctype(doctype.name()),
            Node::Comment(comment) => doc.create_comment(&**comment),
            Node::Text(text) => doc.create_text(&**text),
            Node::Element(element) => {
                let id = doc.create_element(element.name());
                for (name, value) in element.attrs() {
                    doc.set_attribute(id, name, value);
                }
                id
            }
            // Processing instructions and fragments carry no page text.
            _ => continue,
        };
        doc.append_child(parent, id);

        let mut children: Vec<_> = node.children().map(|c| (c, id)).collect();
        children.reverse();
        stack.extend(children);
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;
    use wordswap_core::{DomSurface, NodeKind};

    #[test]
    fn fragments_get_a_body() {
        let doc = parse_document("<p>hello <b>world</b></p>");
        let body = doc.body().expect("parser synthesizes a body");
        assert_eq!(doc.text_content(body), "hello world");
        assert_eq!(doc.elements_by_tag("b").len(), 1);
    }

    #[test]
    fn keeps_doctype_comments_and_attributes() {
        let doc = parse_document(
            "<!DOCTYPE html><html><body><!-- note -->\
             <div contenteditable=\"true\">x</div></body></html>",
        );
        let first = doc.first_child(doc.root()).unwrap();
        assert!(matches!(doc.kind(first), NodeKind::Doctype(name) if name == "html"));
        let div = doc.elements_by_tag("div")[0];
        assert_eq!(doc.attribute(div, "contenteditable"), Some("true"));
        assert!(doc.is_editable(div));
        assert!(doc.to_html().contains("<!-- note -->"));
    }

    #[test]
    fn children_keep_document_order() {
        let doc = parse_document("<ul><li>a</li><li>b</li><li>c</li></ul>");
        let ul = doc.elements_by_tag("ul")[0];
        assert_eq!(doc.text_content(ul), "abc");
    }
}
