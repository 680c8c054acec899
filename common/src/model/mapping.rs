// common/src/model/mapping.rs
use crate::model::field_path::FieldPath;
use crate::model::placeholder::Placeholder;
use serde::{Deserialize, Serialize};

/// Associates one element of an HTML document with one data field.
///
/// Mappings are produced by the editor when the user picks an element and a
/// field, and consumed by the backend materializer. `element_id` is the
/// synthetic `el-<n>` identifier the backend assigned to the element when the
/// document was inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementMapping {
    pub element_id: String,
    pub field_path: FieldPath,
    /// The element's literal content (or attribute value) when it was mapped.
    /// For the `accentColor` mapping this is the chosen color.
    #[serde(default)]
    pub content: String,
    /// Lower-case tag name of the element (`img`, `p`, `span`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    /// Token to substitute; defaults to the path's `{{path}}` token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_value: Option<String>,
    #[serde(default)]
    pub is_image_src: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_pattern: Option<String>,
}

impl ElementMapping {
    /// A plain text mapping with no overrides.
    pub fn text(element_id: impl Into<String>, field_path: FieldPath, content: impl Into<String>) -> Self {
        ElementMapping {
            element_id: element_id.into(),
            field_path,
            content: content.into(),
            element_type: None,
            placeholder_value: None,
            is_image_src: false,
            regex_pattern: None,
        }
    }

    /// An image-source mapping.
    pub fn image(element_id: impl Into<String>, field_path: FieldPath, current_src: impl Into<String>) -> Self {
        ElementMapping {
            element_type: Some("img".to_string()),
            is_image_src: true,
            ..ElementMapping::text(element_id, field_path, current_src)
        }
    }

    /// The token this mapping substitutes into the document.
    pub fn placeholder(&self) -> String {
        match self.placeholder_value.as_deref() {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => self.field_path.placeholder().into_string(),
        }
    }
}

/// Ordered set of mappings, unique by field path.
///
/// A mapping for a path that is already present replaces the earlier one in
/// place, so the most recent designation of a field always wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingSet(Vec<ElementMapping>);

impl MappingSet {
    pub fn new() -> Self {
        MappingSet(Vec::new())
    }

    pub fn from_mappings<I: IntoIterator<Item = ElementMapping>>(mappings: I) -> Self {
        let mut set = MappingSet::new();
        for mapping in mappings {
            set.upsert(mapping);
        }
        set
    }

    /// Inserts `mapping`, superseding any mapping for the same path.
    /// Returns `true` when an existing mapping was replaced.
    pub fn upsert(&mut self, mapping: ElementMapping) -> bool {
        match self.0.iter().position(|m| m.field_path == mapping.field_path) {
            Some(idx) => {
                self.0[idx] = mapping;
                true
            }
            None => {
                self.0.push(mapping);
                false
            }
        }
    }

    /// Content of the `accentColor` mapping, if one exists.
    pub fn accent_color(&self) -> Option<&str> {
        self.0
            .iter()
            .find(|m| m.field_path.is_accent_color())
            .map(|m| m.content.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ElementMapping> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<ElementMapping> {
        self.0
    }
}

impl<'a> IntoIterator for &'a MappingSet {
    type Item = &'a ElementMapping;
    type IntoIter = std::slice::Iter<'a, ElementMapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
