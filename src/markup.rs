//! Minimal, permissive HTML parser producing an owned node tree.
//!
//! This is the markup facility the rest of the crate builds on:
//! - `parse` — forgiving single-pass tokenizer, never errors
//! - `serialize` — escaped round-trip back to HTML text
//! - `text_content` — flattened text of a subtree
//!
//! Supported surface: elements, attributes (quoted, single-quoted, bare),
//! text, comments (skipped), doctype/PI (skipped), void elements,
//! `&amp; &lt; &gt; &quot; &apos; &#N; &#xN;` entities. Malformed input
//! degrades: a `<` that opens no tag is literal text, stray close tags
//! are ignored, unclosed elements close at end of input.

/// One node of the parsed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element: lowercased tag, attributes in document order, children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl Node {
    /// Flattened text of this node, tags discarded.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(t) => out.push_str(t),
        Node::Element(el) => {
            for child in &el.children {
                collect_text(child, out);
            }
        }
    }
}

/// Flattened text of a whole forest.
pub fn text_content(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        collect_text(node, &mut out);
    }
    out
}

/// Elements that never have children and take no close tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub(crate) fn is_void(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse HTML text into a forest. Never fails; worst case is a lossy tree.
pub fn parse(input: &str) -> Vec<Node> {
    Parser {
        src: input,
        pos: 0,
    }
    .run()
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn run(mut self) -> Vec<Node> {
        let mut roots = Vec::new();
        // Stack of open elements; children accumulate on the top entry.
        let mut stack: Vec<Element> = Vec::new();
        let mut text = String::new();

        while let Some(rest) = self.remaining() {
            let Some(lt) = rest.find('<') else {
                text.push_str(rest);
                self.pos = self.src.len();
                break;
            };
            text.push_str(&rest[..lt]);
            self.pos += lt;

            if let Some(skip) = self.try_skip_comment_or_decl() {
                self.pos += skip;
                continue;
            }

            if let Some((name, len)) = self.try_close_tag() {
                self.pos += len;
                flush_text(&mut text, &mut stack, &mut roots);
                close_element(&name, &mut stack, &mut roots);
                continue;
            }

            if let Some((element, self_closing, len)) = self.try_open_tag() {
                self.pos += len;
                flush_text(&mut text, &mut stack, &mut roots);
                if self_closing || is_void(&element.tag) {
                    append(Node::Element(element), &mut stack, &mut roots);
                } else {
                    stack.push(element);
                }
                continue;
            }

            // A `<` that opens nothing is literal text.
            text.push('<');
            self.pos += 1;
        }

        flush_text(&mut text, &mut stack, &mut roots);
        // Unclosed elements close at end of input.
        while let Some(el) = stack.pop() {
            append(Node::Element(el), &mut stack, &mut roots);
        }
        roots
    }

    fn remaining(&self) -> Option<&'a str> {
        if self.pos < self.src.len() {
            Some(&self.src[self.pos..])
        } else {
            None
        }
    }

    /// `<!-- ... -->`, `<!doctype ...>`, `<? ... >`. Returns bytes to skip.
    fn try_skip_comment_or_decl(&self) -> Option<usize> {
        let rest = &self.src[self.pos..];
        if let Some(after) = rest.strip_prefix("<!--") {
            return match after.find("-->") {
                Some(end) => Some(4 + end + 3),
                None => Some(rest.len()),
            };
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            return match rest.find('>') {
                Some(end) => Some(end + 1),
                None => Some(rest.len()),
            };
        }
        None
    }

    /// `</name ... >` — returns (lowercased name, bytes consumed).
    fn try_close_tag(&self) -> Option<(String, usize)> {
        let rest = &self.src[self.pos..];
        let after = rest.strip_prefix("</")?;
        let name_len = tag_name_len(after)?;
        let name = after[..name_len].to_ascii_lowercase();
        // Anything between the name and `>` is discarded.
        match after[name_len..].find('>') {
            Some(end) => Some((name, 2 + name_len + end + 1)),
            None => Some((name, rest.len())),
        }
    }

    /// `<name attr=... >` — returns (element, self_closing, bytes consumed).
    fn try_open_tag(&self) -> Option<(Element, bool, usize)> {
        let rest = &self.src[self.pos..];
        let after = rest.strip_prefix('<')?;
        let name_len = tag_name_len(after)?;
        let tag = after[..name_len].to_ascii_lowercase();

        let mut element = Element {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        };
        let mut cursor = name_len;
        let bytes = after.as_bytes();

        loop {
            while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
                cursor += 1;
            }
            if cursor >= bytes.len() {
                // Tag never closes; consume the rest of the input.
                return Some((element, false, rest.len()));
            }
            match bytes[cursor] {
                b'>' => return Some((element, false, 1 + cursor + 1)),
                b'/' => {
                    cursor += 1;
                    while cursor < bytes.len() && bytes[cursor] != b'>' {
                        cursor += 1;
                    }
                    let consumed = 1 + (cursor + 1).min(bytes.len());
                    return Some((element, true, consumed));
                }
                _ => {
                    let (attr, next) = parse_attr(after, cursor);
                    cursor = next;
                    if let Some((name, value)) = attr {
                        // First occurrence wins on duplicate names.
                        if element.attr(&name).is_none() {
                            element.attrs.push((name, value));
                        }
                    }
                }
            }
        }
    }
}

/// Length of an ASCII tag name at the start of `s`, or None if `s` does
/// not start with one.
fn tag_name_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.is_empty() || !bytes[0].is_ascii_alphabetic() {
        return None;
    }
    let mut len = 1;
    while len < bytes.len()
        && (bytes[len].is_ascii_alphanumeric() || bytes[len] == b'-' || bytes[len] == b':')
    {
        len += 1;
    }
    Some(len)
}

/// One attribute at byte offset `start` of `s`. Returns the parsed pair
/// (None when the token is malformed) and the offset just past it.
fn parse_attr(s: &str, start: usize) -> (Option<(String, String)>, usize) {
    let bytes = s.as_bytes();
    let mut cursor = start;

    let name_start = cursor;
    while cursor < bytes.len()
        && !bytes[cursor].is_ascii_whitespace()
        && !matches!(bytes[cursor], b'=' | b'>' | b'/')
    {
        cursor += 1;
    }
    if cursor == name_start {
        // Stray `=` or similar; swallow one byte and move on.
        return (None, cursor + 1);
    }
    let name = s[name_start..cursor].to_ascii_lowercase();

    while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
        cursor += 1;
    }
    if cursor >= bytes.len() || bytes[cursor] != b'=' {
        // Bare attribute.
        return (Some((name, String::new())), cursor);
    }
    cursor += 1;
    while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
        cursor += 1;
    }
    if cursor >= bytes.len() {
        return (Some((name, String::new())), cursor);
    }

    let value = match bytes[cursor] {
        quote @ (b'"' | b'\'') => {
            cursor += 1;
            let val_start = cursor;
            while cursor < bytes.len() && bytes[cursor] != quote {
                cursor += 1;
            }
            let raw = &s[val_start..cursor];
            if cursor < bytes.len() {
                cursor += 1; // closing quote
            }
            raw
        }
        _ => {
            let val_start = cursor;
            while cursor < bytes.len()
                && !bytes[cursor].is_ascii_whitespace()
                && bytes[cursor] != b'>'
            {
                cursor += 1;
            }
            &s[val_start..cursor]
        }
    };
    (Some((name, decode_entities(value))), cursor)
}

fn flush_text(text: &mut String, stack: &mut Vec<Element>, roots: &mut Vec<Node>) {
    if text.is_empty() {
        return;
    }
    let node = Node::Text(decode_entities(text));
    text.clear();
    append(node, stack, roots);
}

fn append(node: Node, stack: &mut [Element], roots: &mut Vec<Node>) {
    match stack.last_mut() {
        Some(top) => top.children.push(node),
        None => roots.push(node),
    }
}

/// Close the innermost open element named `name`. Elements left open
/// above it close implicitly; with no match the close tag is ignored.
fn close_element(name: &str, stack: &mut Vec<Element>, roots: &mut Vec<Node>) {
    let Some(target) = stack.iter().rposition(|el| el.tag == name) else {
        return;
    };
    while stack.len() > target {
        let el = stack.pop().unwrap();
        append(Node::Element(el), stack, roots);
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// Decode the named entities serialization produces plus numeric
/// references. Unknown entities pass through verbatim.
fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match decode_one_entity(rest) {
            Some((ch, len)) => {
                out.push(ch);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode the entity at the start of `s` (which begins with `&`).
fn decode_one_entity(s: &str) -> Option<(char, usize)> {
    // Entity bodies are short ASCII; cap the scan so `&` deep in prose
    // stays cheap.
    let semi = s.find(';').filter(|&i| i <= 11)?;
    let body = &s[1..semi];
    let ch = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        _ => {
            let code = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            char::from_u32(code)?
        }
    };
    Some((ch, semi + 1))
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

/// Serialize a forest back to HTML text. All text and attribute values
/// come out escaped, so parse∘serialize is stable.
pub fn serialize(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        serialize_node(node, &mut out);
    }
    out
}

fn serialize_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(t) => escape_text(t, out),
        Node::Element(el) => {
            out.push('<');
            out.push_str(&el.tag);
            for (name, value) in &el.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_attr(value, out);
                out.push('"');
            }
            out.push('>');
            if is_void(&el.tag) {
                return;
            }
            for child in &el.children {
                serialize_node(child, out);
            }
            out.push_str("</");
            out.push_str(&el.tag);
            out.push('>');
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
