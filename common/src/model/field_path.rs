// common/src/model/field_path.rs
use crate::model::placeholder::Placeholder;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Canonical form of the field path that drives accent color propagation.
pub const ACCENT_COLOR_PATH: &str = "accentColor";

/// Reasons a sequence of segments cannot form a `FieldPath`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldPathError {
    #[error("field path must contain at least one segment")]
    Empty,
    #[error("field path segment {0} is empty")]
    EmptySegment(usize),
    #[error("field path segment '{0}' contains a reserved sequence ('.', '{{{{' or '}}}}')")]
    ReservedSequence(String),
}

/// Address of one leaf inside a nested JSON object, e.g. `["author", "name"]`.
///
/// Two paths are equal iff their segments are equal. The canonical string form
/// joins the segments with `.`, so a segment may never contain a dot, nor the
/// placeholder delimiters `{{` / `}}`. On the wire a path travels as a JSON array
/// of strings, which is how the editor sends `fieldPath`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Builds a path from its segments, validating each one.
    pub fn new<I, S>(segments: I) -> Result<Self, FieldPathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(FieldPathError::Empty);
        }
        for (idx, segment) in segments.iter().enumerate() {
            if segment.is_empty() {
                return Err(FieldPathError::EmptySegment(idx));
            }
            if segment.contains('.') || segment.contains("{{") || segment.contains("}}") {
                return Err(FieldPathError::ReservedSequence(segment.clone()));
            }
        }
        Ok(FieldPath(segments))
    }

    /// Parses the canonical dot-joined form (`author.name`).
    pub fn parse(canonical: &str) -> Result<Self, FieldPathError> {
        FieldPath::new(canonical.split('.'))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Dot-joined form, identical to the text between a placeholder's delimiters.
    pub fn canonical(&self) -> String {
        self.0.join(".")
    }

    /// The `{{path}}` token standing in for this path.
    pub fn placeholder(&self) -> Placeholder {
        Placeholder::for_path(self)
    }

    pub fn is_accent_color(&self) -> bool {
        self.0.len() == 1 && self.0[0] == ACCENT_COLOR_PATH
    }

    /// True when a segment names an image (`image`) or a URL (`...url`, `...Url`).
    pub fn looks_like_image(&self) -> bool {
        self.0
            .iter()
            .any(|s| s == "image" || s.contains("url") || s.contains("Url"))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl TryFrom<Vec<String>> for FieldPath {
    type Error = FieldPathError;

    fn try_from(segments: Vec<String>) -> Result<Self, Self::Error> {
        FieldPath::new(segments)
    }
}

impl From<FieldPath> for Vec<String> {
    fn from(path: FieldPath) -> Self {
        path.0
    }
}
