//! Arena-backed HTML document.
//!
//! Input is parsed best-effort by `html5ever` into an `RcDom` and then copied
//! into a flat `Vec<Node>` where nodes refer to each other by index. The engine
//! mutates this arena (attributes, text content, inserted siblings) and
//! serializes it back with HTML5 fragment serialization rules.
//!
//! `<template>` contents are kept in a separate fragment node, as in the
//! browser DOM: they are serialized with their template but never show up in
//! [`Document::elements`] or [`Document::text_content`].

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, parse_fragment, LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// Elements that never have an end tag or children when serialized.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose text children are written without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext", "noscript",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Document,
    Doctype { name: String },
    Element { name: String, attrs: Vec<Attribute> },
    /// Contents of a `<template>` element.
    Fragment,
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub data: NodeData,
    /// Fragment node holding a `<template>` element's contents.
    pub template_contents: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    /// Parsed with [`Document::parse_fragment`].
    fragment: bool,
}

impl Document {
    /// Parses `html` as a full document. Malformed markup is repaired the way a
    /// browser would; this never fails.
    pub fn parse(html: &str) -> Document {
        let dom = parse_document(RcDom::default(), Default::default()).one(html);
        Document::from_rcdom(&dom, false)
    }

    /// Parses `html` as the contents of a `<body>`, without the document
    /// wrapper. [`Document::to_html`] gives back a fragment as well.
    pub fn parse_fragment(html: &str) -> Document {
        let context = QualName::new(
            None,
            Namespace::from("http://www.w3.org/1999/xhtml"),
            LocalName::from("body"),
        );
        let dom = parse_fragment(RcDom::default(), Default::default(), context, Vec::new()).one(html);
        Document::from_rcdom(&dom, true)
    }

    fn from_rcdom(dom: &RcDom, fragment: bool) -> Document {
        let mut doc = Document {
            nodes: Vec::new(),
            fragment,
        };
        let mut stack: Vec<(Handle, Option<NodeId>)> = vec![(dom.document.clone(), None)];

        while let Some((handle, parent)) = stack.pop() {
            let data = match &handle.data {
                RcNodeData::Document => NodeData::Document,
                RcNodeData::Doctype { name, .. } => NodeData::Doctype {
                    name: name.to_string(),
                },
                RcNodeData::Element { name, attrs, .. } => NodeData::Element {
                    name: name.local.to_string(),
                    attrs: attrs
                        .borrow()
                        .iter()
                        .map(|a| Attribute {
                            name: match &a.name.prefix {
                                Some(prefix) => format!("{}:{}", prefix, a.name.local),
                                None => a.name.local.to_string(),
                            },
                            value: a.value.to_string(),
                        })
                        .collect(),
                },
                RcNodeData::Text { contents } => NodeData::Text(contents.borrow().to_string()),
                RcNodeData::Comment { contents } => NodeData::Comment(contents.to_string()),
                RcNodeData::ProcessingInstruction { .. } => continue,
            };

            let id = doc.push(data);
            if let Some(parent) = parent {
                doc.append_child(parent, id);
            }

            if let RcNodeData::Element {
                template_contents, ..
            } = &handle.data
            {
                if let Some(contents) = template_contents.borrow().as_ref() {
                    let fragment = doc.push(NodeData::Fragment);
                    doc.nodes[id.0].template_contents = Some(fragment);
                    for child in contents.children.borrow().iter().rev() {
                        stack.push((child.clone(), Some(fragment)));
                    }
                }
            }
            for child in handle.children.borrow().iter().rev() {
                stack.push((child.clone(), Some(id)));
            }
        }

        doc
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
            template_contents: None,
        });
        NodeId(self.nodes.len() - 1)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Every element reachable from the root, in document (pre-order) order.
    pub fn elements(&self) -> Vec<NodeId> {
        self.descendant_elements(self.root())
    }

    /// Elements below `from` (inclusive when `from` is an element), in document order.
    pub fn descendant_elements(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if self.is_element(id) {
                out.push(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].data, NodeData::Element { .. })
    }

    /// Lower-case local name of an element, `None` for other node kinds.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.as_str()),
            _ => None,
        }
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    /// Sets (or adds) an attribute. No-op on non-element nodes.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeData::Element { attrs, .. } = &mut self.nodes[id.0].data {
            match attrs.iter_mut().find(|a| a.name == name) {
                Some(attr) => attr.value = value.to_string(),
                None => attrs.push(Attribute {
                    name: name.to_string(),
                    value: value.to_string(),
                }),
            }
        }
    }

    /// Sets one declaration of the inline `style` attribute, replacing any
    /// existing declaration of the same property and leaving the others as written.
    pub fn set_style_property(&mut self, id: NodeId, property: &str, value: &str) {
        let current = self.attr(id, "style").unwrap_or_default();
        let mut declarations: Vec<String> = split_declarations(current)
            .into_iter()
            .map(str::to_string)
            .collect();
        let replacement = format!("{}: {}", property, value);

        let existing = declarations.iter().position(|decl| {
            decl.split_once(':')
                .map(|(name, _)| name.trim().eq_ignore_ascii_case(property))
                .unwrap_or(false)
        });
        match existing {
            Some(idx) => declarations[idx] = replacement,
            None => declarations.push(replacement),
        }

        let style = format!("{};", declarations.join("; "));
        self.set_attr(id, "style", &style);
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let NodeData::Text(text) = &self.nodes[current.0].data {
                out.push_str(text);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Replaces all children of `id` with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        let old = std::mem::take(&mut self.nodes[id.0].children);
        for child in old {
            self.nodes[child.0].parent = None;
        }
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append_child(id, text_node);
        }
    }

    /// A new, detached element.
    pub fn create_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> NodeId {
        self.push(NodeData::Element {
            name: name.to_ascii_lowercase(),
            attrs: attrs
                .iter()
                .map(|(n, v)| Attribute {
                    name: n.to_string(),
                    value: v.to_string(),
                })
                .collect(),
        })
    }

    /// A new, detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Inserts `new` as the next sibling of `reference`. Returns `false` when
    /// `reference` has no parent.
    pub fn insert_after(&mut self, reference: NodeId, new: NodeId) -> bool {
        let Some(parent) = self.nodes[reference.0].parent else {
            return false;
        };
        self.detach(new);
        let siblings = &mut self.nodes[parent.0].children;
        let pos = siblings
            .iter()
            .position(|&c| c == reference)
            .map(|p| p + 1)
            .unwrap_or(siblings.len());
        siblings.insert(pos, new);
        self.nodes[new.0].parent = Some(parent);
        true
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// First element with the given tag name, in document order.
    pub fn find_first(&self, tag: &str) -> Option<NodeId> {
        self.elements()
            .into_iter()
            .find(|&id| self.tag_name(id) == Some(tag))
    }

    pub fn head(&self) -> Option<NodeId> {
        self.find_first("head")
    }

    pub fn body(&self) -> Option<NodeId> {
        self.find_first("body")
    }

    /// Serialized children of `id`.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.serialize_node(child, &mut out);
        }
        out
    }

    /// Serialized `id` itself, including its own tags.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.serialize_node(id, &mut out);
        out
    }

    /// Serializes the whole tree: the full document including its doctype, or
    /// the parsed nodes alone for a fragment.
    pub fn to_html(&self) -> String {
        if self.fragment {
            // html5ever roots fragments in a synthetic <html> element
            return self
                .find_first("html")
                .map(|html| self.inner_html(html))
                .unwrap_or_default();
        }
        self.outer_html(self.root())
    }

    /// Reassembles the document into the full-page wrapper handed to renderers.
    pub fn to_template_html(&self) -> String {
        let head = self.head().map(|h| self.inner_html(h)).unwrap_or_default();
        let body = self.body().map(|b| self.inner_html(b)).unwrap_or_default();
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n  {}\n</head>\n<body>\n  {}\n</body>\n</html>",
            head, body
        )
    }

    fn serialize_node(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].data {
            NodeData::Document | NodeData::Fragment => {
                for &child in self.children(id) {
                    self.serialize_node(child, out);
                }
            }
            NodeData::Doctype { name } => {
                out.push_str("<!DOCTYPE ");
                out.push_str(name);
                out.push('>');
            }
            NodeData::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeData::Text(text) => {
                let raw = self
                    .parent(id)
                    .and_then(|p| self.tag_name(p))
                    .map(|tag| RAW_TEXT_ELEMENTS.contains(&tag))
                    .unwrap_or(false);
                if raw {
                    out.push_str(text);
                } else {
                    out.push_str(&escape_text(text));
                }
            }
            NodeData::Element { name, attrs } => {
                out.push('<');
                out.push_str(name);
                for attr in attrs {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(&attr.value));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&name.as_str()) {
                    return;
                }
                for &child in self.children(id) {
                    self.serialize_node(child, out);
                }
                if let Some(contents) = self.nodes[id.0].template_contents {
                    self.serialize_node(contents, out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
        }
    }
}

/// Splits an inline style on `;`, ignoring separators inside parentheses or
/// quotes (`url(data:image/png;base64,...)`). Empty declarations are dropped.
fn split_declarations(style: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (idx, ch) in style.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&style[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&style[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('\u{00A0}', "&nbsp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('\u{00A0}', "&nbsp;")
        .replace('"', "&quot;")
}

/// Escapes special HTML characters in a string so it can be embedded as text
/// or as a quoted attribute value.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_head_and_body_inner_html() {
        let doc = Document::parse(
            "<html><head><title>T</title></head><body class=\"x\"><p>Hi</p></body></html>",
        );
        assert_eq!(
            doc.to_template_html(),
            "<!DOCTYPE html>\n<html>\n<head>\n  <title>T</title>\n</head>\n<body>\n  <p>Hi</p>\n</body>\n</html>"
        );
    }

    #[test]
    fn fragments_are_placed_in_body() {
        let doc = Document::parse("<p>Hello</p><span>there</span>");
        let body = doc.body().unwrap();
        assert_eq!(doc.inner_html(body), "<p>Hello</p><span>there</span>");
        assert_eq!(doc.inner_html(doc.head().unwrap()), "");
    }

    #[test]
    fn elements_are_listed_in_document_order() {
        let doc = Document::parse("<div><p>a</p><p>b<b>c</b></p></div><span></span>");
        let tags: Vec<&str> = doc
            .elements()
            .into_iter()
            .map(|id| doc.tag_name(id).unwrap())
            .collect();
        assert_eq!(tags, vec!["html", "head", "body", "div", "p", "p", "b", "span"]);
    }

    #[test]
    fn void_elements_and_escaping() {
        let doc = Document::parse(
            "<img src=\"a.png?x=1&amp;y=2\" alt='say \"hi\"'><br><p>1 &lt; 2 &amp; 3</p><style>a > b { color: red }</style>",
        );
        let body = doc.inner_html(doc.body().unwrap());
        assert_eq!(
            body,
            "<img src=\"a.png?x=1&amp;y=2\" alt=\"say &quot;hi&quot;\"><br><p>1 &lt; 2 &amp; 3</p><style>a > b { color: red }</style>"
        );
    }

    #[test]
    fn set_text_content_replaces_children() {
        let mut doc = Document::parse("<p id=\"x\">Hello <b>world</b></p>");
        let p = doc.find_first("p").unwrap();
        assert_eq!(doc.text_content(p), "Hello world");
        doc.set_text_content(p, "{{answer}}");
        assert_eq!(doc.outer_html(p), "<p id=\"x\">{{answer}}</p>");
        assert!(doc.find_first("b").is_none());
    }

    #[test]
    fn insert_after_places_the_new_sibling() {
        let mut doc = Document::parse("<div><img src=\"a.png\"><p>x</p></div>");
        let img = doc.find_first("img").unwrap();
        let span = doc.create_element("span", &[("data-marker", "true")]);
        let text = doc.create_text("marker");
        doc.append_child(span, text);
        assert!(doc.insert_after(img, span));
        let div = doc.find_first("div").unwrap();
        assert_eq!(
            doc.inner_html(div),
            "<img src=\"a.png\"><span data-marker=\"true\">marker</span><p>x</p>"
        );
    }

    #[test]
    fn style_properties_merge_into_existing_declarations() {
        let mut doc = Document::parse(
            "<p style=\"COLOR:red; background: url(data:image/png;base64,AAA)\">x</p>",
        );
        let p = doc.find_first("p").unwrap();
        doc.set_style_property(p, "color", "#ffffff");
        doc.set_style_property(p, "padding", "4px");
        assert_eq!(
            doc.attr(p, "style"),
            Some("color: #ffffff; background: url(data:image/png;base64,AAA); padding: 4px;")
        );
    }

    #[test]
    fn attributes_are_replaced_in_place_or_appended() {
        let mut doc = Document::parse("<img src=\"a.png\" alt=\"x\">");
        let img = doc.find_first("img").unwrap();
        doc.set_attr(img, "src", "/logo.svg");
        doc.set_attr(img, "data-placeholder", "{{logo}}");
        assert_eq!(doc.attr(img, "src"), Some("/logo.svg"));
        assert!(doc.has_attr(img, "data-placeholder"));
        assert_eq!(
            doc.inner_html(doc.body().unwrap()),
            "<img src=\"/logo.svg\" alt=\"x\" data-placeholder=\"{{logo}}\">"
        );
    }

    #[test]
    fn template_contents_are_serialized_but_not_walked() {
        let doc = Document::parse(
            "<body><div></div><template><p>hidden</p></template><span>shown</span></body>",
        );
        let tags: Vec<&str> = doc
            .elements()
            .into_iter()
            .map(|id| doc.tag_name(id).unwrap())
            .collect();
        assert_eq!(tags, vec!["html", "head", "body", "div", "template", "span"]);
        let body = doc.body().unwrap();
        assert_eq!(doc.text_content(body), "shown");
        assert_eq!(
            doc.inner_html(body),
            "<div></div><template><p>hidden</p></template><span>shown</span>"
        );
    }

    #[test]
    fn fragments_serialize_without_a_wrapper() {
        let html = "<style>p { color: red }</style><p title=\"a > b\">x</p>";
        let doc = Document::parse_fragment(html);
        assert_eq!(doc.to_html(), html);

        let full = Document::parse("<!DOCTYPE html><html><head></head><body><p>x</p></body></html>");
        assert_eq!(
            full.to_html(),
            "<!DOCTYPE html><html><head></head><body><p>x</p></body></html>"
        );
    }

    #[test]
    fn escape_html_covers_quotes() {
        assert_eq!(escape_html("<a href='x'>&\"</a>"), "&lt;a href=&#39;x&#39;&gt;&amp;&quot;&lt;/a&gt;");
    }
}
