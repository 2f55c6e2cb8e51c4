//! Headless page model.
//!
//! A [`Shell`] is the crate's stand-in for a browser page: the element
//! tree of a rendered document plus the handful of page-level facts the
//! interaction layer needs — which element holds focus, the URL
//! fragment, whether scrolling is locked, a string-keyed storage map,
//! and the system color-scheme hint. The dialog and navigation
//! controllers mutate a shell the way their browser counterparts would
//! mutate the DOM, which makes the whole lifecycle testable in-process.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Detaching a
//! subtree (e.g. `set_inner_html`) leaves the old nodes allocated but
//! unreachable; shells live for one session, so the arena only grows.
//!
//! Focus can be staged: `defer_focus` records a target and [`settle`]
//! (the next-tick analogue) applies it. Controllers use that where a
//! browser would wait a tick for layout before focusing.
//!
//! [`settle`]: Shell::settle

use std::collections::HashMap;

use crate::markup::{self, Node};

/// Index into the shell's node arena.
pub type NodeId = usize;

#[derive(Debug, Clone)]
struct NodeData {
    parent: Option<NodeId>,
    kind: NodeKind,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<NodeId>,
    },
    Text(String),
}

#[derive(Debug, Default)]
pub struct Shell {
    nodes: Vec<NodeData>,
    roots: Vec<NodeId>,
    focused: Option<NodeId>,
    pending_focus: Option<NodeId>,
    fragment: String,
    scroll_locked: bool,
    prefers_dark: bool,
    storage: HashMap<String, String>,
}

impl Shell {
    /// Load a shell from rendered HTML.
    pub fn from_html(html: &str) -> Self {
        let mut shell = Self::default();
        for node in markup::parse(html) {
            let id = shell.adopt(node, None);
            shell.roots.push(id);
        }
        shell
    }

    fn adopt(&mut self, node: Node, parent: Option<NodeId>) -> NodeId {
        match node {
            Node::Text(text) => self.push(NodeData {
                parent,
                kind: NodeKind::Text(text),
            }),
            Node::Element(el) => {
                let id = self.push(NodeData {
                    parent,
                    kind: NodeKind::Element {
                        tag: el.tag,
                        attrs: el.attrs,
                        children: Vec::new(),
                    },
                });
                let children: Vec<NodeId> = el
                    .children
                    .into_iter()
                    .map(|child| self.adopt(child, Some(id)))
                    .collect();
                if let NodeKind::Element { children: slot, .. } = &mut self.nodes[id].kind {
                    *slot = children;
                }
                id
            }
        }
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(data);
        self.nodes.len() - 1
    }

    // ------------------------------------------------------------------
    // Tree queries
    // ------------------------------------------------------------------

    /// All reachable nodes in document (preorder) order.
    fn walk(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        for &root in &self.roots {
            self.walk_from(root, &mut out);
        }
        out
    }

    fn walk_from(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        if let NodeKind::Element { children, .. } = &self.nodes[id].kind {
            for &child in children {
                self.walk_from(child, out);
            }
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id].kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn element_by_id(&self, dom_id: &str) -> Option<NodeId> {
        self.walk()
            .into_iter()
            .find(|&id| self.attr(id, "id") == Some(dom_id))
    }

    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|&id| self.tag(id) == Some(tag))
            .collect()
    }

    /// Elements carrying `name`, in document order.
    pub fn elements_with_attr(&self, name: &str) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|&id| self.attr(id, name).is_some())
            .collect()
    }

    /// True when `id` is `ancestor` or sits somewhere below it.
    pub fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            if node == ancestor {
                return true;
            }
            cursor = self.nodes[node].parent;
        }
        false
    }

    /// Flattened text of the subtree.
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id].kind {
            NodeKind::Text(t) => out.push_str(t),
            NodeKind::Element { children, .. } => {
                for &child in children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Children of `id` serialized back to HTML.
    pub fn inner_html(&self, id: NodeId) -> String {
        let NodeKind::Element { children, .. } = &self.nodes[id].kind else {
            return String::new();
        };
        let forest: Vec<Node> = children.iter().map(|&c| self.export(c)).collect();
        markup::serialize(&forest)
    }

    fn export(&self, id: NodeId) -> Node {
        match &self.nodes[id].kind {
            NodeKind::Text(t) => Node::Text(t.clone()),
            NodeKind::Element { tag, attrs, children } => Node::Element(markup::Element {
                tag: tag.clone(),
                attrs: attrs.clone(),
                children: children.iter().map(|&c| self.export(c)).collect(),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Attributes and classes
    // ------------------------------------------------------------------

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id].kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[id].kind {
            match attrs.iter_mut().find(|(n, _)| n == name) {
                Some((_, v)) => *v = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[id].kind {
            attrs.retain(|(n, _)| n != name);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|v| v.split_whitespace().any(|c| c == class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        let current = self.attr(id, "class").unwrap_or("");
        let updated = if current.is_empty() {
            class.to_string()
        } else {
            format!("{current} {class}")
        };
        self.set_attr(id, "class", &updated);
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        let Some(current) = self.attr(id, "class") else {
            return;
        };
        let updated = current
            .split_whitespace()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr(id, "class", &updated);
    }

    // ------------------------------------------------------------------
    // Content replacement
    // ------------------------------------------------------------------

    /// Replace the subtree under `id` with a single text node.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        let child = self.push(NodeData {
            parent: Some(id),
            kind: NodeKind::Text(text.to_string()),
        });
        if let NodeKind::Element { children, .. } = &mut self.nodes[id].kind {
            *children = vec![child];
        }
    }

    /// Replace the subtree under `id` with parsed `html`.
    pub fn set_inner_html(&mut self, id: NodeId, html: &str) {
        let adopted: Vec<NodeId> = markup::parse(html)
            .into_iter()
            .map(|node| self.adopt(node, Some(id)))
            .collect();
        if let NodeKind::Element { children, .. } = &mut self.nodes[id].kind {
            *children = adopted;
        }
    }

    // ------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------

    /// Keyboard-reachable elements below `node`, in document order:
    /// buttons, form fields, anchors with an href, and anything with a
    /// non-negative tabindex.
    pub fn focusables_within(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk_from(node, &mut out);
        out.retain(|&id| self.is_focusable(id));
        out
    }

    fn is_focusable(&self, id: NodeId) -> bool {
        let Some(tag) = self.tag(id) else {
            return false;
        };
        if self.attr(id, "hidden").is_some() {
            return false;
        }
        if matches!(tag, "button" | "input" | "select" | "textarea") {
            return true;
        }
        if tag == "a" && self.attr(id, "href").is_some() {
            return true;
        }
        self.attr(id, "tabindex")
            .and_then(|t| t.trim().parse::<i32>().ok())
            .is_some_and(|t| t >= 0)
    }

    pub fn focus(&mut self, id: NodeId) {
        self.focused = Some(id);
    }

    pub fn active_element(&self) -> Option<NodeId> {
        self.focused
    }

    /// Stage focus to apply on the next [`settle`](Self::settle).
    pub fn defer_focus(&mut self, id: NodeId) {
        self.pending_focus = Some(id);
    }

    /// Run deferred work. The browser equivalent is letting the event
    /// loop turn over once.
    pub fn settle(&mut self) {
        if let Some(id) = self.pending_focus.take() {
            self.focused = Some(id);
        }
    }

    // ------------------------------------------------------------------
    // Page-level state
    // ------------------------------------------------------------------

    pub fn body(&self) -> Option<NodeId> {
        self.elements_by_tag("body").into_iter().next()
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn set_fragment(&mut self, fragment: &str) {
        self.fragment = fragment.to_string();
    }

    pub fn lock_scroll(&mut self) {
        self.scroll_locked = true;
    }

    pub fn unlock_scroll(&mut self) {
        self.scroll_locked = false;
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn prefers_dark(&self) -> bool {
        self.prefers_dark
    }

    pub fn set_prefers_dark(&mut self, dark: bool) {
        self.prefers_dark = dark;
    }

    pub fn storage_get(&self, key: &str) -> Option<&str> {
        self.storage.get(key).map(String::as_str)
    }

    pub fn storage_set(&mut self, key: &str, value: &str) {
        self.storage.insert(key.to_string(), value.to_string());
    }
}
