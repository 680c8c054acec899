//! Fills `{{path}}` tokens of a template with values from a JSON object.
//!
//! The JSON data is walked once into a token table, then the template is
//! scanned once and each token is looked up. Substituted values are never
//! scanned again, so data that itself contains `{{x}}` comes out verbatim.
//! Tokens without data stay in the output verbatim.

use crate::engine::dom::Document;
use common::model::placeholder::Placeholder;
use common::requests::ResolveMode;
use rayon::prelude::*;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("valid token pattern"));

static FULL_DOCUMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(!doctype|html[\s>])").expect("valid document pattern"));

const DATA_PLACEHOLDER: &str = "data-placeholder";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolver {
    skip_arrays: bool,
    restore_image_sources: bool,
}

impl Default for Resolver {
    fn default() -> Self {
        Resolver::render()
    }
}

impl Resolver {
    /// Walk used for previews and final renders: arrays are addressed by index
    /// and mapped images load their real source.
    pub fn render() -> Self {
        Resolver {
            skip_arrays: false,
            restore_image_sources: true,
        }
    }

    /// Walk used while editing: arrays are ignored and image stand-ins stay.
    pub fn live() -> Self {
        Resolver {
            skip_arrays: true,
            restore_image_sources: false,
        }
    }

    pub fn for_mode(mode: ResolveMode) -> Self {
        match mode {
            ResolveMode::Render => Resolver::render(),
            ResolveMode::Live => Resolver::live(),
        }
    }

    /// Replaces every token of `template_html` that has a value in `data`.
    pub fn resolve(&self, template_html: &str, data: &Value) -> String {
        let mut values: HashMap<String, String> = HashMap::new();
        for (token, value) in self.substitutions(data) {
            // `a.0` and `a[0]` can both come from one array; the first walk wins
            values.entry(token).or_insert(value);
        }

        let restored;
        let html = if self.restore_image_sources {
            restored = restore_image_sources(template_html, &values);
            restored.as_deref().unwrap_or(template_html)
        } else {
            template_html
        };

        TOKEN
            .replace_all(html, |caps: &Captures| match values.get(&caps[0]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Resolves many independent documents in parallel.
    pub fn resolve_batch(&self, documents: &[(String, Value)]) -> Vec<String> {
        documents
            .par_iter()
            .map(|(html, data)| self.resolve(html, data))
            .collect()
    }

    /// `({{path}}, value)` pairs for every addressable leaf of `data`, in walk
    /// order. Non-object roots have no addressable leaves.
    pub fn substitutions(&self, data: &Value) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if let Value::Object(map) = data {
            for (key, value) in map {
                self.walk(key.clone(), value, &mut out);
            }
        }
        out
    }

    fn walk(&self, path: String, value: &Value, out: &mut Vec<(String, String)>) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    self.walk(format!("{}.{}", path, key), child, out);
                }
            }
            Value::Array(items) => {
                if self.skip_arrays {
                    return;
                }
                if items.iter().all(is_scalar) {
                    let joined: Vec<String> = items.iter().map(stringify).collect();
                    out.push((Placeholder::from_joined(&path).into_string(), joined.join(",")));
                }
                for (idx, item) in items.iter().enumerate() {
                    self.walk(format!("{}.{}", path, idx), item, out);
                    self.walk(format!("{}[{}]", path, idx), item, out);
                }
            }
            scalar => out.push((Placeholder::from_joined(&path).into_string(), stringify(scalar))),
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

/// Text a scalar contributes to the output.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                // f64 Display prints integral floats without a fraction
                n.as_f64().map(|f| f.to_string()).unwrap_or_else(|| n.to_string())
            }
        }
        other => other.to_string(),
    }
}

/// Points each mapped image (`data-placeholder="{{P}}"`) back at its token when
/// the data has a value for `P`, so substitution loads the real image instead
/// of the stand-in.
///
/// Works on the parsed tree, so attribute values holding `>` or quotes are
/// safe. Returns `None` when no image needs restoring, leaving the template
/// untouched.
fn restore_image_sources(html: &str, values: &HashMap<String, String>) -> Option<String> {
    if !html.contains(DATA_PLACEHOLDER) {
        return None;
    }

    let mut doc = if FULL_DOCUMENT.is_match(html) {
        Document::parse(html)
    } else {
        Document::parse_fragment(html)
    };

    let targets: Vec<_> = doc
        .elements()
        .into_iter()
        .filter(|&id| doc.tag_name(id) == Some("img"))
        .filter_map(|id| {
            let token = doc.attr(id, DATA_PLACEHOLDER)?;
            values.contains_key(token).then(|| (id, token.to_string()))
        })
        .collect();
    if targets.is_empty() {
        return None;
    }

    for (id, token) in targets {
        doc.set_attr(id, "src", &token);
    }
    Some(doc.to_html())
}
