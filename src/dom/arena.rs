//! Arena-based DOM for parsed documentation pages.
//!
//! Both the strict XML builder and the lenient html5ever sink parse into this
//! tree. Nodes live in one vector and link to each other by index, which keeps
//! descendant scans cheap and lets selector matching borrow freely.

use html5ever::{LocalName, QualName};

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this is a valid node ID.
    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Check if this is the sentinel value.
    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Node type in the arena DOM.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root.
    Document,
    /// Element with name and attributes.
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
    },
    /// Text content, already unescaped.
    Text(String),
    /// Comment body (without the `<!--` `-->` delimiters).
    Comment(String),
}

/// Markup attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

/// A node in the arena DOM.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// Arena-based DOM tree.
#[derive(Debug)]
pub struct ArenaDom {
    nodes: Vec<Node>,
    document: NodeId,
}

impl ArenaDom {
    /// Create a new empty DOM with a document root.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: NodeId::NONE,
        };
        dom.document = dom.alloc(Node::new(NodeData::Document));
        dom
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the document root ID.
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Create a new, detached element node.
    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        self.alloc(Node::new(NodeData::Element { name, attrs }))
    }

    /// Create a new, detached text node.
    pub fn create_text(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Text(text)))
    }

    /// Create a new, detached comment node.
    pub fn create_comment(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(text)))
    }

    /// Append a child to a parent node.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
        }

        if last_child.is_some()
            && let Some(last_node) = self.get_mut(last_child)
        {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert a node before a sibling.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let (parent, prev) = self
            .get(sibling)
            .map(|n| (n.parent, n.prev_sibling))
            .unwrap_or((NodeId::NONE, NodeId::NONE));

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Unlink a node from its parent and siblings.
    pub fn detach(&mut self, target: NodeId) {
        let Some((parent, prev, next)) = self
            .get(target)
            .map(|n| (n.parent, n.prev_sibling, n.next_sibling))
        else {
            return;
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(target) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Append text to an existing text node, or create new if last child isn't text.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let NodeData::Text(ref mut existing) = last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text.to_string());
        self.append(parent, text_node);
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildrenIter<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(NodeId::NONE);
        ChildrenIter {
            dom: self,
            current: first,
        }
    }

    /// Iterate over all descendants of a node in document order.
    ///
    /// The node itself is not included.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let first = self
            .get(root)
            .map(|n| n.first_child)
            .unwrap_or(NodeId::NONE);
        Descendants {
            dom: self,
            root,
            next: first,
        }
    }

    /// Descendant elements of `root` whose local name matches `tag` case-insensitively.
    pub fn elements_named<'a>(
        &'a self,
        root: NodeId,
        tag: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.descendants(root).filter(move |&id| {
            self.element_name(id)
                .is_some_and(|name| name.as_ref().eq_ignore_ascii_case(tag))
        })
    }

    /// Find the first element with the given tag name in the document.
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.elements_named(self.document, tag).next()
    }
}

impl Default for ArenaDom {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    dom: &'a ArenaDom,
    current: NodeId,
}

impl Iterator for ChildrenIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}

/// Pre-order iterator over the descendants of a node.
pub struct Descendants<'a> {
    dom: &'a ArenaDom,
    root: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next;
        let node = self.dom.get(current)?;

        // Descend first, then move to the next sibling, climbing back up
        // until one exists or the subtree root is reached.
        self.next = if node.first_child.is_some() {
            node.first_child
        } else {
            let mut cursor = current;
            loop {
                if cursor == self.root {
                    break NodeId::NONE;
                }
                let Some(n) = self.dom.get(cursor) else {
                    break NodeId::NONE;
                };
                if n.next_sibling.is_some() {
                    break n.next_sibling;
                }
                cursor = n.parent;
            }
        };

        Some(current)
    }
}

/// Convenience methods for element nodes.
impl ArenaDom {
    /// Get element's local name (tag).
    pub fn element_name(&self, id: NodeId) -> Option<&LocalName> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        })
    }

    /// Get element's name as written, including any prefix.
    pub fn qualified_name(&self, id: NodeId) -> Option<String> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(qualified(name)),
            _ => None,
        })
    }

    /// Get an attribute value by local name.
    pub fn get_attr(&self, id: NodeId, attr_name: &str) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name.local.as_ref() == attr_name)
                .map(|a| a.value.as_str()),
            _ => None,
        })
    }

    /// Get the text of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|child| self.text(child))
            .collect()
    }
}

/// Render a qualified name as `prefix:local`.
pub(crate) fn qualified(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{}:{}", prefix.as_ref(), name.local.as_ref()),
        None => name.local.as_ref().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use html5ever::ns;

    use super::*;

    fn make_qname(local: &str) -> QualName {
        QualName::new(None, ns!(html), LocalName::from(local))
    }

    fn attr(name: &str, value: &str) -> Attribute {
        Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_create_elements() {
        let mut dom = ArenaDom::new();

        let div = dom.create_element(make_qname("div"), vec![attr("id", "main")]);
        dom.append(dom.document(), div);

        assert_eq!(dom.element_name(div).unwrap().as_ref(), "div");
        assert_eq!(dom.get_attr(div, "id"), Some("main"));
        assert_eq!(dom.get_attr(div, "class"), None);
    }

    #[test]
    fn test_append_children() {
        let mut dom = ArenaDom::new();

        let parent = dom.create_element(make_qname("div"), vec![]);
        let child1 = dom.create_element(make_qname("p"), vec![]);
        let child2 = dom.create_element(make_qname("p"), vec![]);

        dom.append(dom.document(), parent);
        dom.append(parent, child1);
        dom.append(parent, child2);

        let children: Vec<_> = dom.children(parent).collect();
        assert_eq!(children, vec![child1, child2]);
    }

    #[test]
    fn test_text_merging() {
        let mut dom = ArenaDom::new();

        let p = dom.create_element(make_qname("p"), vec![]);
        dom.append(dom.document(), p);

        dom.append_text(p, "Hello, ");
        dom.append_text(p, "World!");

        let children: Vec<_> = dom.children(p).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(dom.text(children[0]), Some("Hello, World!"));
    }

    #[test]
    fn test_descendants_document_order() {
        // <a><b><c/></b><d/></a><e/>
        let mut dom = ArenaDom::new();
        let a = dom.create_element(make_qname("a"), vec![]);
        let b = dom.create_element(make_qname("b"), vec![]);
        let c = dom.create_element(make_qname("c"), vec![]);
        let d = dom.create_element(make_qname("d"), vec![]);
        let e = dom.create_element(make_qname("e"), vec![]);
        dom.append(dom.document(), a);
        dom.append(a, b);
        dom.append(b, c);
        dom.append(a, d);
        dom.append(dom.document(), e);

        let all: Vec<_> = dom.descendants(dom.document()).collect();
        assert_eq!(all, vec![a, b, c, d, e]);

        // Scoped to a subtree, siblings of the root are not visited
        let under_a: Vec<_> = dom.descendants(a).collect();
        assert_eq!(under_a, vec![b, c, d]);
        assert_eq!(dom.descendants(c).count(), 0);
    }

    #[test]
    fn test_detach_and_insert_before() {
        let mut dom = ArenaDom::new();
        let parent = dom.create_element(make_qname("div"), vec![]);
        let first = dom.create_element(make_qname("p"), vec![]);
        let second = dom.create_element(make_qname("p"), vec![]);
        dom.append(dom.document(), parent);
        dom.append(parent, second);
        dom.insert_before(second, first);
        assert_eq!(dom.children(parent).collect::<Vec<_>>(), vec![first, second]);

        dom.detach(first);
        assert_eq!(dom.children(parent).collect::<Vec<_>>(), vec![second]);
    }

    #[test]
    fn test_text_content_and_find_by_tag() {
        let mut dom = ArenaDom::new();
        let title = dom.create_element(make_qname("TITLE"), vec![]);
        let b = dom.create_element(make_qname("b"), vec![]);
        dom.append(dom.document(), title);
        dom.append_text(title, "Hello ");
        dom.append(title, b);
        dom.append_text(b, "World");

        assert_eq!(dom.find_by_tag("title"), Some(title));
        assert_eq!(dom.text_content(title), "Hello World");
    }
}
