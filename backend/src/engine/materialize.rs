//! Turns `(html, mappings)` into placeholder-bearing template HTML.
//!
//! Every mapping targets one element by its `el-<n>` identifier. Text mappings
//! replace the element's content with the `{{path}}` token, image mappings swap
//! the `src` for a loadable stand-in and keep the token in `data-placeholder`,
//! and the `accentColor` mapping turns its element into a color preview and
//! triggers [`accent::propagate`] over the whole document.

use crate::engine::accent::{self, AccentReport};
use crate::engine::dom::{Document, NodeId};
use crate::engine::identify::ElementIds;
use common::model::field_path::FieldPath;
use common::model::mapping::{ElementMapping, MappingSet};
use serde::Serialize;

pub const DEFAULT_PLACEHOLDER_IMAGE_SRC: &str = "/logo.svg";
pub const DEFAULT_ACCENT_COLOR: &str = "#FF5722";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeOptions {
    /// Loadable image used in place of a mapped image's `src`.
    pub placeholder_image_src: String,
    /// Accent used when the `accentColor` mapping has no content.
    pub default_accent_color: String,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        MaterializeOptions {
            placeholder_image_src: DEFAULT_PLACEHOLDER_IMAGE_SRC.to_string(),
            default_accent_color: DEFAULT_ACCENT_COLOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedMapping {
    pub element_id: String,
    pub field_path: FieldPath,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Materialized {
    pub html: String,
    pub applied: Vec<FieldPath>,
    pub skipped: Vec<SkippedMapping>,
    /// Effective accent color, present when an `accentColor` mapping was given.
    pub accent_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<AccentReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectedElement {
    pub element_id: String,
    pub tag: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

/// Element picker listing: the annotated document plus one entry per element
/// of the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    pub html: String,
    pub elements: Vec<InspectedElement>,
}

#[derive(Debug, Clone, Default)]
pub struct Materializer {
    options: MaterializeOptions,
}

impl Materializer {
    pub fn new(options: MaterializeOptions) -> Self {
        Materializer { options }
    }

    pub fn options(&self) -> &MaterializeOptions {
        &self.options
    }

    /// Applies `mappings` to `html`.
    ///
    /// Mappings are first normalized by field path, so a later mapping for a
    /// path supersedes an earlier one. A mapping whose element cannot be found
    /// is skipped and reported; it never fails the call.
    pub fn materialize(&self, html: &str, mappings: &[ElementMapping]) -> Materialized {
        let mut doc = Document::parse(html);
        let ids = ElementIds::assign(&doc);
        let mappings = MappingSet::from_mappings(mappings.iter().cloned());

        let accent_color = mappings.accent_color().map(|content| {
            if content.is_empty() {
                self.options.default_accent_color.clone()
            } else {
                content.to_string()
            }
        });

        let mut applied = Vec::new();
        let mut skipped = Vec::new();

        for mapping in &mappings {
            let Some(node) = ids.lookup(&mapping.element_id) else {
                log::warn!(
                    "Element {} not found for field {}, skipping",
                    mapping.element_id,
                    mapping.field_path
                );
                skipped.push(SkippedMapping {
                    element_id: mapping.element_id.clone(),
                    field_path: mapping.field_path.clone(),
                });
                continue;
            };

            let placeholder = mapping.placeholder();
            if is_image_target(&doc, node, mapping) {
                self.apply_image(&mut doc, node, mapping, &placeholder);
            } else if mapping.field_path.is_accent_color() {
                let accent = accent_color
                    .as_deref()
                    .unwrap_or(&self.options.default_accent_color);
                apply_accent_preview(&mut doc, node, &placeholder, accent);
            } else {
                doc.set_text_content(node, &placeholder);
            }
            applied.push(mapping.field_path.clone());
        }

        let accent = accent_color
            .as_deref()
            .map(|color| accent::propagate(&mut doc, color));

        log::debug!(
            "Materialized {} mappings ({} skipped)",
            applied.len(),
            skipped.len()
        );

        Materialized {
            html: doc.to_template_html(),
            applied,
            skipped,
            accent_color,
            accent,
        }
    }

    fn apply_image(&self, doc: &mut Document, node: NodeId, mapping: &ElementMapping, placeholder: &str) {
        doc.set_attr(node, "src", &self.options.placeholder_image_src);
        doc.set_attr(node, "data-placeholder", placeholder);
        doc.set_attr(
            node,
            "alt",
            &format!("Image placeholder for: {}", mapping.field_path),
        );
        doc.set_style_property(node, "border", "2px dashed #3b82f6");
        doc.set_style_property(node, "padding", "4px");
        doc.set_style_property(node, "background-color", "rgba(59, 130, 246, 0.1)");

        let marker = doc.create_element(
            "span",
            &[("data-image-placeholder", "true"), ("style", "display: none;")],
        );
        let text = doc.create_text(placeholder);
        doc.append_child(marker, text);
        if !doc.insert_after(node, marker) {
            log::warn!("Image for {} has no parent, marker not inserted", mapping.field_path);
        }
    }
}

fn is_image_target(doc: &Document, node: NodeId, mapping: &ElementMapping) -> bool {
    doc.tag_name(node) == Some("img")
        && (mapping.is_image_src || mapping.field_path.looks_like_image())
}

fn apply_accent_preview(doc: &mut Document, node: NodeId, placeholder: &str, accent: &str) {
    doc.set_text_content(node, &format!("{} (Preview color: {})", placeholder, accent));
    doc.set_attr(node, "data-accent-color", "true");
    doc.set_style_property(node, "color", "#ffffff");
    doc.set_style_property(node, "background-color", accent);
    doc.set_style_property(node, "padding", "4px 8px");
    doc.set_style_property(node, "border-radius", "4px");
    doc.set_style_property(node, "display", "inline-block");
}

/// Annotates `html` with element identifiers and lists the body's elements.
pub fn inspect(html: &str) -> Inspection {
    let mut doc = Document::parse(html);
    let ids = ElementIds::assign(&doc);

    let elements = doc
        .body()
        .map(|body| doc.descendant_elements(body))
        .unwrap_or_default()
        .into_iter()
        .filter_map(|node| {
            Some(InspectedElement {
                element_id: ids.id_of(node)?.to_string(),
                tag: doc.tag_name(node)?.to_string(),
                text: doc.text_content(node).trim().to_string(),
                src: doc.attr(node, "src").map(str::to_string),
            })
        })
        .collect();

    ids.annotate(&mut doc);
    Inspection {
        html: doc.to_template_html(),
        elements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::accent::APPLIED_ATTR;

    fn path(canonical: &str) -> FieldPath {
        FieldPath::parse(canonical).unwrap()
    }

    fn materialize(html: &str, mappings: &[ElementMapping]) -> Materialized {
        Materializer::default().materialize(html, mappings)
    }

    #[test]
    fn text_mapping_replaces_content() {
        let out = materialize(
            "<p>Hello</p>",
            &[ElementMapping::text("el-3", path("answer"), "Hello")],
        );
        assert!(out.html.contains("<p>{{answer}}</p>"));
        assert!(!out.html.contains("Hello"));
        assert_eq!(out.applied, vec![path("answer")]);
        assert!(out.skipped.is_empty());
        assert_eq!(out.accent_color, None);
    }

    #[test]
    fn nested_path_and_placeholder_override() {
        let mut quote = ElementMapping::text("el-4", path("quote"), "Great");
        quote.placeholder_value = Some("{{testimonial.quote}}".to_string());
        let out = materialize(
            "<span>Jane</span><q>Great</q>",
            &[ElementMapping::text("el-3", path("author.name"), "Jane"), quote],
        );
        assert!(out.html.contains("<span>{{author.name}}</span>"));
        assert!(out.html.contains("<q>{{testimonial.quote}}</q>"));
    }

    #[test]
    fn image_mapping_keeps_src_loadable() {
        let out = materialize(
            "<div><img src=\"old.png\"></div>",
            &[ElementMapping::image("el-4", path("brandLogoUrl"), "old.png")],
        );
        let doc = Document::parse(&out.html);
        let img = doc.find_first("img").unwrap();
        assert_eq!(doc.attr(img, "src"), Some("/logo.svg"));
        assert_eq!(doc.attr(img, "data-placeholder"), Some("{{brandLogoUrl}}"));
        assert!(doc.attr(img, "alt").unwrap().contains("brandLogoUrl"));
        assert!(doc.attr(img, "style").unwrap().contains("2px dashed"));

        let marker = doc.find_first("span").unwrap();
        assert_eq!(doc.attr(marker, "data-image-placeholder"), Some("true"));
        assert_eq!(doc.text_content(marker), "{{brandLogoUrl}}");
        assert!(!out.html.contains("old.png"));
    }

    #[test]
    fn image_detection_by_path_and_missing_src() {
        let out = Materializer::new(MaterializeOptions {
            placeholder_image_src: "https://cdn.example.com/stand-in.png".to_string(),
            ..MaterializeOptions::default()
        })
        .materialize(
            "<img alt=\"x\">",
            &[ElementMapping::text("el-3", path("author.image"), "")],
        );
        let doc = Document::parse(&out.html);
        let img = doc.find_first("img").unwrap();
        assert_eq!(doc.attr(img, "src"), Some("https://cdn.example.com/stand-in.png"));
        assert_eq!(doc.attr(img, "data-placeholder"), Some("{{author.image}}"));
    }

    #[test]
    fn image_path_on_non_image_element_is_text() {
        let out = materialize(
            "<a>https://example.com</a>",
            &[ElementMapping::text("el-3", path("websiteUrl"), "https://example.com")],
        );
        assert!(out.html.contains("<a>{{websiteUrl}}</a>"));
    }

    #[test]
    fn accent_mapping_previews_and_propagates() {
        let out = materialize(
            "<h1 style=\"color:#3b82f6\">Title</h1><span>accent</span>",
            &[ElementMapping::text("el-4", path("accentColor"), "#112233")],
        );
        assert_eq!(out.accent_color.as_deref(), Some("#112233"));
        let doc = Document::parse(&out.html);

        let h1 = doc.find_first("h1").unwrap();
        assert_eq!(doc.attr(h1, "style"), Some("color:#112233"));
        assert_eq!(doc.attr(h1, APPLIED_ATTR), Some("true"));

        let span = doc.find_first("span").unwrap();
        assert_eq!(
            doc.text_content(span),
            "{{accentColor}} (Preview color: #112233)"
        );
        assert_eq!(doc.attr(span, "data-accent-color"), Some("true"));
        assert!(doc.attr(span, "style").unwrap().contains("background-color: #112233"));
    }

    #[test]
    fn empty_accent_content_falls_back_to_default() {
        let out = materialize(
            "<span></span><p style=\"background-color: #ef4444\">x</p>",
            &[ElementMapping::text("el-3", path("accentColor"), "")],
        );
        assert_eq!(out.accent_color.as_deref(), Some(DEFAULT_ACCENT_COLOR));
        assert!(out.html.contains("background-color: #FF5722"));
    }

    #[test]
    fn no_accent_mapping_means_no_propagation() {
        let out = materialize(
            "<p style=\"color:#3b82f6\">x</p>",
            &[ElementMapping::text("el-3", path("answer"), "x")],
        );
        assert!(out.html.contains("style=\"color:#3b82f6\""));
        assert!(out.accent.is_none());
    }

    #[test]
    fn later_mapping_for_same_path_wins() {
        let out = materialize(
            "<p>first</p><p>second</p>",
            &[
                ElementMapping::text("el-3", path("answer"), "first"),
                ElementMapping::text("el-4", path("answer"), "second"),
            ],
        );
        assert!(out.html.contains("<p>first</p><p>{{answer}}</p>"));
        assert_eq!(out.applied.len(), 1);
    }

    #[test]
    fn missing_elements_are_skipped() {
        let out = materialize(
            "<p>Hello</p>",
            &[
                ElementMapping::text("el-42", path("gone"), "x"),
                ElementMapping::text("el-3", path("answer"), "Hello"),
            ],
        );
        assert_eq!(
            out.skipped,
            vec![SkippedMapping {
                element_id: "el-42".to_string(),
                field_path: path("gone"),
            }]
        );
        assert!(out.html.contains("{{answer}}"));
    }

    #[test]
    fn output_keeps_head_and_body_wrapper() {
        let out = materialize(
            "<html><head><style>p { margin: 0 }</style></head><body><p>x</p></body></html>",
            &[],
        );
        assert_eq!(
            out.html,
            "<!DOCTYPE html>\n<html>\n<head>\n  <style>p { margin: 0 }</style>\n</head>\n<body>\n  <p>x</p>\n</body>\n</html>"
        );
        assert!(!out.html.contains("data-element-id"));
    }

    #[test]
    fn inspection_ids_match_materialization_ids() {
        let html = "<div><h2>Name</h2><img src=\"photo.jpg\"></div>";
        let inspection = inspect(html);
        let heading = inspection
            .elements
            .iter()
            .find(|e| e.tag == "h2")
            .unwrap();
        assert_eq!(heading.text, "Name");
        let img = inspection.elements.iter().find(|e| e.tag == "img").unwrap();
        assert_eq!(img.src.as_deref(), Some("photo.jpg"));
        assert_eq!(inspection.elements[0].tag, "body");

        // Both the raw and the annotated document resolve the same ids.
        for source in [html, inspection.html.as_str()] {
            let out = materialize(
                source,
                &[ElementMapping::text(heading.element_id.clone(), path("author.name"), "Name")],
            );
            assert!(out.html.contains("{{author.name}}"));
            assert!(out.skipped.is_empty());
        }
    }
}
