//! Canonical single-line XML for projected trees.

use crate::node::{Node, NodeType};
use quick_xml::escape::escape;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0"?>"#;

/// Serializes `node` with no indentation.
///
/// A document gets the declaration followed by its top-level elements with no
/// wrapping root tag. An element is emitted as its own open and close tags,
/// and a text node as its escaped text.
pub fn output_xml(node: Node<'_>) -> String {
    let mut out = String::new();
    match node.node_type() {
        NodeType::Document => {
            out.push_str(XML_DECLARATION);
            for child in node.children() {
                write_node(&mut out, child);
            }
        }
        NodeType::Element | NodeType::Text => write_node(&mut out, node),
    }
    out
}

fn write_node(out: &mut String, node: Node<'_>) {
    match node.node_type() {
        NodeType::Text => out.push_str(&escape(node.value().unwrap_or_default())),
        NodeType::Element => {
            out.push('<');
            out.push_str(node.name());
            out.push('>');
            for child in node.children() {
                write_node(out, child);
            }
            out.push_str("</");
            out.push_str(node.name());
            out.push('>');
        }
        NodeType::Document => {
            for child in node.children() {
                write_node(out, child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Document;

    fn sample() -> Document {
        let mut doc = Document::new("test.Sample");
        let root = doc.root_id();
        let person = doc.append_element(root, "people");
        doc.append_leaf(person, "name", "Tom & \"Jerry\" <cat>".to_string());
        doc.append_element(person, "empty");
        let tags = doc.append_element(root, "tags");
        doc.append_leaf(tags, "element", "home".to_string());
        doc
    }

    #[test]
    fn test_document_has_declaration_and_no_root_tag() {
        let doc = sample();
        assert_eq!(
            doc.output_xml(),
            concat!(
                r#"<?xml version="1.0"?>"#,
                "<people><name>Tom &amp; &quot;Jerry&quot; &lt;cat&gt;</name><empty></empty></people>",
                "<tags><element>home</element></tags>"
            )
        );
    }

    #[test]
    fn test_element_has_no_declaration() {
        let doc = sample();
        assert_eq!(doc.child_nodes()[1].output_xml(), "<tags><element>home</element></tags>");
    }

    #[test]
    fn test_text_node_is_escaped_text() {
        let doc = sample();
        let text = doc.child_nodes()[0].first_child().and_then(|n| n.first_child()).unwrap();
        assert_eq!(output_xml(text), "Tom &amp; &quot;Jerry&quot; &lt;cat&gt;");
    }
}
