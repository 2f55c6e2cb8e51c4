//! Content sanitization.
//!
//! Every field of a loaded record passes through here before rendering:
//! - `strip_all` — the value is plain text; escape everything
//! - `allow_subset` — the value is trusted-ish HTML; keep a small
//!   formatting subset, reduce everything else to its text
//!
//! Both are total functions. Malformed markup degrades through the
//! permissive parser instead of erroring.

use std::fmt::Write as _;

use crate::markup::{self, Element, Node};

/// Tags that survive `allow_subset`. Everything else is replaced by its
/// flattened text content.
const ALLOWED_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "br", "b", "i", "strong", "em", "a", "pre", "code",
    "ul", "ol", "li",
];

/// Attributes that survive on an allowed tag. Only anchors keep any.
fn allowed_attrs(tag: &str) -> &'static [&'static str] {
    match tag {
        "a" => &["href", "title", "target"],
        _ => &[],
    }
}

/// Escape `input` so it renders as inert text. The output contains no
/// `<` or `>` regardless of input.
pub fn strip_all(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let _ = maud::Escaper::new(&mut out).write_str(input);
    out
}

/// Reduce `input` to the allowed formatting subset.
///
/// Allowed elements keep their allow-listed attributes and have their
/// children filtered recursively. A disallowed element is replaced by
/// its own text content, tags of all descendants stripped. An `href`
/// carrying a `javascript:` or `data:` scheme is dropped.
pub fn allow_subset(input: &str) -> String {
    let mut kept = Vec::new();
    for node in markup::parse(input) {
        filter_node(node, &mut kept);
    }
    markup::serialize(&kept)
}

fn filter_node(node: Node, out: &mut Vec<Node>) {
    match node {
        Node::Text(_) => out.push(node),
        Node::Element(el) if ALLOWED_TAGS.contains(&el.tag.as_str()) => {
            let keep = allowed_attrs(&el.tag);
            let attrs = el
                .attrs
                .into_iter()
                .filter(|(name, value)| {
                    keep.contains(&name.as_str()) && (name != "href" || href_allowed(value))
                })
                .collect();
            let mut children = Vec::new();
            for child in el.children {
                filter_node(child, &mut children);
            }
            out.push(Node::Element(Element {
                tag: el.tag,
                attrs,
                children,
            }));
        }
        Node::Element(el) => {
            let text = Node::Element(el).text_content();
            if !text.is_empty() {
                out.push(Node::Text(text));
            }
        }
    }
}

/// Scheme check on a candidate href. Comparison is on the trimmed,
/// lowercased value, so `" JavaScript:..."` does not slip through.
fn href_allowed(value: &str) -> bool {
    let v = value.trim().to_ascii_lowercase();
    !(v.starts_with("javascript:") || v.starts_with("data:"))
}
