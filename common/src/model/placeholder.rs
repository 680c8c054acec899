// common/src/model/placeholder.rs
use crate::model::field_path::FieldPath;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const OPEN: &str = "{{";
pub const CLOSE: &str = "}}";

/// A `{{path}}` token embedded in template HTML in place of a data value.
///
/// The token for a given path is always the same literal string, which is what
/// lets the resolver look it up again after a single scan of the template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Placeholder(String);

impl Placeholder {
    pub fn for_path(path: &FieldPath) -> Self {
        Placeholder(format!("{}{}{}", OPEN, path.canonical(), CLOSE))
    }

    /// Builds the token for an already-joined path without validating it.
    ///
    /// The resolver uses this while walking arbitrary JSON keys, which are not
    /// guaranteed to be valid `FieldPath` segments.
    pub fn from_joined(joined: &str) -> Self {
        Placeholder(format!("{}{}{}", OPEN, joined, CLOSE))
    }

    /// Strips the `{{`/`}}` wrapper and splits the inner text on `.`.
    ///
    /// Returns `None` if the wrapper is missing or the inner path is invalid.
    pub fn parse(token: &str) -> Option<FieldPath> {
        let inner = token.strip_prefix(OPEN)?.strip_suffix(CLOSE)?;
        FieldPath::parse(inner).ok()
    }

    /// Every distinct, well-formed token in `text`, in order of first occurrence.
    pub fn scan(text: &str) -> Vec<FieldPath> {
        let mut found: Vec<FieldPath> = Vec::new();
        let mut pos = 0;

        while let Some(rel) = text[pos..].find(OPEN) {
            let start = pos + rel;
            let inner_start = start + OPEN.len();
            let Some(close_rel) = text[inner_start..].find(CLOSE) else {
                break;
            };
            let inner = &text[inner_start..inner_start + close_rel];
            if inner.contains(OPEN) {
                // `{{ {{a}}`: retry from the inner opening delimiter
                pos = inner_start;
                continue;
            }
            if let Ok(path) = FieldPath::parse(inner) {
                if !found.contains(&path) {
                    found.push(path);
                }
            }
            pos = inner_start + close_rel + CLOSE.len();
        }

        found
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Placeholder {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
