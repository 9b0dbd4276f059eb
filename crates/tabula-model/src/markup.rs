//! Opaque markup fragments.
//!
//! Cells and headings may carry a small tree of element/text nodes instead of
//! plain text. The engine never interprets the tree beyond
//! [`flatten_text`], which yields the text content used for searching,
//! sorting, and type inference.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MarkupNode {
    Element(ElementNode),
    Text { data: String },
    Comment { data: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MarkupNode>,
}

impl MarkupNode {
    pub fn text(data: impl Into<String>) -> Self {
        Self::Text { data: data.into() }
    }

    pub fn element(name: impl Into<String>) -> ElementNode {
        ElementNode {
            name: name.into(),
            ..ElementNode::default()
        }
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Self::Text { data } => out.push_str(data),
            Self::Element(element) => {
                for child in &element.children {
                    child.push_text(out);
                }
            }
            Self::Comment { .. } => {}
        }
    }
}

impl ElementNode {
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: MarkupNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(self, data: impl Into<String>) -> Self {
        self.with_child(MarkupNode::text(data))
    }
}

impl From<ElementNode> for MarkupNode {
    fn from(element: ElementNode) -> Self {
        Self::Element(element)
    }
}

/// Concatenated text content of a fragment, comments excluded.
pub fn flatten_text(nodes: &[MarkupNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.push_text(&mut out);
    }
    out
}

/// Lenient fragment parser for markup stored as strings.
///
/// Unknown or unbalanced closing tags are dropped, unclosed elements are
/// closed at the end of input. Common character entities are decoded in text.
pub fn parse_fragment(input: &str) -> Vec<MarkupNode> {
    let mut root = Vec::new();
    let mut stack: Vec<ElementNode> = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!--") {
            let (body, tail) = match after.find("-->") {
                Some(end) => (&after[..end], &after[end + 3..]),
                None => (after, ""),
            };
            attach(
                &mut root,
                &mut stack,
                MarkupNode::Comment {
                    data: body.to_string(),
                },
            );
            rest = tail;
            continue;
        }
        if let Some(after) = rest.strip_prefix("</")
            && let Some(end) = after.find('>')
        {
            let name = after[..end].trim().to_ascii_lowercase();
            close_element(&mut root, &mut stack, &name);
            rest = &after[end + 1..];
            continue;
        }
        if starts_open_tag(rest)
            && let Some(end) = find_tag_end(rest)
        {
            let inner = &rest[1..end];
            let self_closing = inner.trim_end().ends_with('/');
            let element = parse_open_tag(inner.trim_end().trim_end_matches('/'));
            rest = &rest[end + 1..];
            if self_closing || VOID_ELEMENTS.contains(&element.name.as_str()) {
                attach(&mut root, &mut stack, MarkupNode::Element(element));
            } else {
                stack.push(element);
            }
            continue;
        }
        // A '<' that starts nothing recognizable is literal text.
        let skip = usize::from(rest.starts_with('<'));
        let end = rest[skip..].find('<').map_or(rest.len(), |i| i + skip);
        attach(
            &mut root,
            &mut stack,
            MarkupNode::text(decode_entities(&rest[..end])),
        );
        rest = &rest[end..];
    }

    while let Some(element) = stack.pop() {
        attach(&mut root, &mut stack, MarkupNode::Element(element));
    }
    root
}

fn attach(root: &mut Vec<MarkupNode>, stack: &mut [ElementNode], node: MarkupNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => root.push(node),
    }
}

fn close_element(root: &mut Vec<MarkupNode>, stack: &mut Vec<ElementNode>, name: &str) {
    if !stack.iter().any(|element| element.name == name) {
        return;
    }
    while let Some(element) = stack.pop() {
        let done = element.name == name;
        attach(root, stack, MarkupNode::Element(element));
        if done {
            break;
        }
    }
}

fn starts_open_tag(input: &str) -> bool {
    let mut chars = input.chars();
    chars.next() == Some('<') && chars.next().is_some_and(|ch| ch.is_ascii_alphabetic())
}

/// Byte offset of the `>` closing the tag at the start of `input`, skipping
/// quoted attribute values.
fn find_tag_end(input: &str) -> Option<usize> {
    let mut quote = None;
    for (idx, ch) in input.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '>') => return Some(idx),
            _ => {}
        }
    }
    None
}

fn parse_open_tag(inner: &str) -> ElementNode {
    let inner = inner.trim();
    let name_end = inner
        .find(|ch: char| ch.is_whitespace())
        .unwrap_or(inner.len());
    let mut element = MarkupNode::element(inner[..name_end].to_ascii_lowercase());
    let mut rest = inner[name_end..].trim_start();

    while !rest.is_empty() {
        let key_end = rest
            .find(|ch: char| ch.is_whitespace() || ch == '=')
            .unwrap_or(rest.len());
        let key = rest[..key_end].to_ascii_lowercase();
        rest = rest[key_end..].trim_start();
        let mut value = String::new();
        if let Some(after) = rest.strip_prefix('=') {
            let after = after.trim_start();
            match after.chars().next() {
                Some(q @ ('"' | '\'')) => {
                    let body = &after[1..];
                    let end = body.find(q).unwrap_or(body.len());
                    value = decode_entities(&body[..end]);
                    rest = body.get(end + 1..).unwrap_or("");
                }
                _ => {
                    let end = after
                        .find(|ch: char| ch.is_whitespace())
                        .unwrap_or(after.len());
                    value = decode_entities(&after[..end]);
                    rest = &after[end..];
                }
            }
        }
        if !key.is_empty() {
            element.attributes.insert(key, value);
        }
        rest = rest.trim_start();
    }
    element
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        let decoded = candidate
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_entity(&candidate[1..end]).map(|ch| (ch, end)));
        match decoded {
            Some((ch, end)) => {
                out.push(ch);
                rest = &candidate[end + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "hellip" => Some('\u{2026}'),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_nested_text() {
        let nodes = vec![
            MarkupNode::element("b").with_text("Bold").into(),
            MarkupNode::text(" and "),
            MarkupNode::element("i")
                .with_child(MarkupNode::element("span").with_text("deep").into())
                .into(),
            MarkupNode::Comment {
                data: "hidden".to_string(),
            },
        ];
        assert_eq!(flatten_text(&nodes), "Bold and deep");
    }

    #[test]
    fn parses_elements_attributes_and_entities() {
        let nodes = parse_fragment(r#"<a href="/x?a=1&amp;b=2" class=link>Tom &amp; Jerry</a><br>!"#);
        assert_eq!(nodes.len(), 3);
        let MarkupNode::Element(anchor) = &nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(anchor.name, "a");
        assert_eq!(anchor.attributes["href"], "/x?a=1&b=2");
        assert_eq!(anchor.attributes["class"], "link");
        assert_eq!(flatten_text(&nodes), "Tom & Jerry!");
    }

    #[test]
    fn tolerates_unbalanced_markup() {
        let nodes = parse_fragment("<p>open <b>bold</p> tail</i> 1 < 2");
        assert_eq!(flatten_text(&nodes), "open bold tail 1 < 2");
    }

    #[test]
    fn plain_text_is_a_single_text_node() {
        assert_eq!(parse_fragment("plain"), vec![MarkupNode::text("plain")]);
    }
}
