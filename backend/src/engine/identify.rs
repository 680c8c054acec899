//! Stable `el-<n>` identifiers for the elements of a parsed document.
//!
//! Identifiers are kept out of band in [`ElementIds`]; the tree itself is only
//! touched by [`ElementIds::annotate`], for the inspection listing that has to
//! hand the ids to the editor.

use crate::engine::dom::{Document, NodeId};
use std::collections::HashMap;

/// Attribute carrying an element identifier in annotated HTML.
pub const ELEMENT_ID_ATTR: &str = "data-element-id";

#[derive(Debug, Clone, Default)]
pub struct ElementIds {
    by_node: HashMap<NodeId, String>,
    by_id: HashMap<String, NodeId>,
}

impl ElementIds {
    /// Identifies every element of `doc` in document order.
    pub fn assign(doc: &Document) -> Self {
        let mut ids = ElementIds::default();
        ids.assign_into(doc);
        ids
    }

    /// Identifies the elements that have no identifier yet. Entries that already
    /// exist are never renumbered.
    ///
    /// The n-th element of the pre-order walk gets `el-<n>`, unless it already
    /// carries a non-empty `data-element-id` attribute, which is honored as is.
    /// A generated id that is already taken moves on to the next free number.
    /// Two elements carrying the same attribute value share it, and
    /// [`lookup`](Self::lookup) returns the first one in document order.
    pub fn assign_into(&mut self, doc: &Document) {
        for (n, node) in doc.elements().into_iter().enumerate() {
            if self.by_node.contains_key(&node) {
                continue;
            }
            let id = match doc.attr(node, ELEMENT_ID_ATTR) {
                Some(existing) if !existing.is_empty() => existing.to_string(),
                _ => self.free_id(n),
            };
            if self.by_id.contains_key(&id) {
                log::debug!("Duplicate element id {}, keeping the first occurrence", id);
            } else {
                self.by_id.insert(id.clone(), node);
            }
            self.by_node.insert(node, id);
        }
    }

    fn free_id(&self, from: usize) -> String {
        (from..)
            .map(|k| format!("el-{}", k))
            .find(|id| !self.by_id.contains_key(id))
            .unwrap_or_default()
    }

    pub fn lookup(&self, id: &str) -> Option<NodeId> {
        self.by_id.get(id).copied()
    }

    pub fn id_of(&self, node: NodeId) -> Option<&str> {
        self.by_node.get(&node).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }

    /// Writes every identifier into the tree as a `data-element-id` attribute.
    pub fn annotate(&self, doc: &mut Document) {
        for (node, id) in &self.by_node {
            doc.set_attr(*node, ELEMENT_ID_ATTR, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_document_order() {
        let doc = Document::parse("<div><p>Hello</p><img src=\"a.png\"></div>");
        let ids = ElementIds::assign(&doc);
        let p = doc.find_first("p").unwrap();
        let img = doc.find_first("img").unwrap();
        // html, head, body, div come first
        assert_eq!(ids.id_of(p), Some("el-4"));
        assert_eq!(ids.id_of(img), Some("el-5"));
        assert_eq!(ids.lookup("el-4"), Some(p));
        assert_eq!(ids.lookup("el-99"), None);
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn assignment_is_idempotent() {
        let doc = Document::parse("<ul><li>a</li><li>b</li></ul><p>c</p>");
        let mut ids = ElementIds::assign(&doc);
        let before: Vec<_> = doc
            .elements()
            .into_iter()
            .map(|n| ids.id_of(n).map(str::to_string))
            .collect();
        ids.assign_into(&doc);
        let after: Vec<_> = doc
            .elements()
            .into_iter()
            .map(|n| ids.id_of(n).map(str::to_string))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn new_elements_do_not_renumber_existing_ones() {
        let mut doc = Document::parse("<p>a</p><p>b</p>");
        let mut ids = ElementIds::assign(&doc);
        let second = doc.elements()[4];
        assert_eq!(ids.id_of(second), Some("el-4"));

        let extra = doc.create_element("span", &[]);
        let first = doc.elements()[3];
        doc.insert_after(first, extra);
        ids.assign_into(&doc);

        assert_eq!(ids.id_of(second), Some("el-4"));
        assert_eq!(ids.id_of(extra), Some("el-5"));
        assert_eq!(ids.lookup("el-4"), Some(second));
        assert_eq!(ids.lookup("el-5"), Some(extra));
    }

    #[test]
    fn existing_attributes_are_honored() {
        let doc = Document::parse("<p data-element-id=\"el-7\">a</p><p>b</p>");
        let ids = ElementIds::assign(&doc);
        let first = doc.elements()[3];
        let second = doc.elements()[4];
        assert_eq!(ids.id_of(first), Some("el-7"));
        assert_eq!(ids.id_of(second), Some("el-4"));
        assert_eq!(ids.lookup("el-7"), Some(first));
        assert_eq!(ids.lookup("el-3"), None);
    }

    #[test]
    fn generated_ids_skip_values_taken_by_attributes() {
        let doc = Document::parse("<p data-element-id=\"el-4\">a</p><p>b</p>");
        let ids = ElementIds::assign(&doc);
        let second = doc.elements()[4];
        assert_eq!(ids.id_of(second), Some("el-5"));
        assert_eq!(ids.lookup("el-4"), Some(doc.elements()[3]));
    }

    #[test]
    fn annotate_round_trips_through_serialization() {
        let mut doc = Document::parse("<p>a</p><span>b</span>");
        let ids = ElementIds::assign(&doc);
        ids.annotate(&mut doc);
        let html = doc.to_template_html();
        assert!(html.contains("<p data-element-id=\"el-3\">a</p>"));
        assert!(html.contains("<span data-element-id=\"el-4\">b</span>"));

        let reparsed = Document::parse(&html);
        let again = ElementIds::assign(&reparsed);
        let span = reparsed.find_first("span").unwrap();
        assert_eq!(again.id_of(span), Some("el-4"));
    }
}
