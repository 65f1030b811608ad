//! Serialize arena subtrees back to markup text.

use quick_xml::escape::{escape, partial_escape};

use super::arena::{ArenaDom, NodeData, NodeId, qualified};

/// Serialize the children of `id` (not the element's own tags).
///
/// Elements are written as XML: attributes double-quoted and escaped, text
/// escaped, childless elements self-closed as `<br />`. Comments are kept
/// verbatim so callers can decide whether to strip them.
pub fn inner_markup(dom: &ArenaDom, id: NodeId) -> String {
    let mut out = String::new();
    for child in dom.children(id) {
        write_node(dom, child, &mut out);
    }
    out
}

fn write_node(dom: &ArenaDom, id: NodeId, out: &mut String) {
    let Some(node) = dom.get(id) else {
        return;
    };

    match &node.data {
        NodeData::Document => {
            for child in dom.children(id) {
                write_node(dom, child, out);
            }
        }
        NodeData::Text(text) => out.push_str(&partial_escape(text.as_str())),
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeData::Element { name, attrs } => {
            let tag = qualified(name);
            out.push('<');
            out.push_str(&tag);
            for attr in attrs {
                out.push(' ');
                out.push_str(&qualified(&attr.name));
                out.push_str("=\"");
                out.push_str(&escape(attr.value.as_str()));
                out.push('"');
            }

            if node.first_child.is_none() {
                out.push_str(" />");
                return;
            }

            out.push('>');
            for child in dom.children(id) {
                write_node(dom, child, out);
            }
            out.push_str("</");
            out.push_str(&tag);
            out.push('>');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_xml;

    #[test]
    fn test_inner_markup_preserves_tags() {
        let dom = parse_xml(r#"<div class="x"><b>Hi</b> &amp; <a href="a?b=1&amp;c=2">link</a></div>"#)
            .unwrap();
        let div = dom.find_by_tag("div").unwrap();
        assert_eq!(
            inner_markup(&dom, div),
            r#"<b>Hi</b> &amp; <a href="a?b=1&amp;c=2">link</a>"#
        );
    }

    #[test]
    fn test_empty_elements_self_close() {
        let dom = parse_xml("<p>a<br/>b<img src=\"x.png\"></img></p>").unwrap();
        let p = dom.find_by_tag("p").unwrap();
        assert_eq!(inner_markup(&dom, p), r#"a<br />b<img src="x.png" />"#);
    }

    #[test]
    fn test_comments_are_kept() {
        let dom = parse_xml("<div><p>a<!-- note -->b</p></div>").unwrap();
        let p = dom.find_by_tag("p").unwrap();
        assert_eq!(inner_markup(&dom, p), "a<!-- note -->b");
        let div = dom.find_by_tag("div").unwrap();
        assert_eq!(inner_markup(&dom, div), "<p>a<!-- note -->b</p>");
    }

    #[test]
    fn test_prefixed_names() {
        let dom = parse_xml(r#"<root><x:item xml:lang="en">t</x:item></root>"#).unwrap();
        let root = dom.find_by_tag("root").unwrap();
        assert_eq!(
            inner_markup(&dom, root),
            r#"<x:item xml:lang="en">t</x:item>"#
        );
    }
}
