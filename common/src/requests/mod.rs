// common/src/requests/mod.rs
use crate::model::field_path::FieldPath;
use crate::model::mapping::ElementMapping;
use crate::model::template_type::TemplateType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload for `POST /api/templates/materialize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterializeRequest {
    pub html: String,
    #[serde(default)]
    pub mappings: Vec<ElementMapping>,
}

/// Payload for `POST /api/templates/inspect`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectRequest {
    pub html: String,
}

/// Which resolution walk to use.
///
/// `Render` recurses into arrays and restores image sources; `Live` is the
/// stricter walk used while editing, which ignores arrays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveMode {
    #[default]
    Render,
    Live,
}

/// Payload for `POST /api/templates/resolve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub template_html: String,
    #[serde(default)]
    pub json_data: Value,
    #[serde(default)]
    pub mode: ResolveMode,
}

/// Payload for `POST /api/templates/word-counts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordCountRequest {
    #[serde(default)]
    pub json_data: Value,
}

/// Payload for publishing a template (`POST /api/templates`).
///
/// When `mappings` is non-empty the backend materializes `html` itself;
/// otherwise `html` is taken to already be placeholder HTML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishTemplateRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub template_type: Option<TemplateType>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub mappings: Vec<ElementMapping>,
    #[serde(default)]
    pub json_data: Value,
    pub created_by: Option<String>,
    pub collection_id: Option<String>,
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishTemplateResponse {
    pub success: bool,
    pub template_id: String,
    pub version: u32,
    pub html_url: String,
}

/// Response of `GET /api/templates/{id}/placeholders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePlaceholders {
    pub template_id: String,
    /// Every token of the stored HTML, in order of first occurrence.
    pub placeholders: Vec<FieldPath>,
    /// The subset with no value in the stored `jsonData`.
    pub unresolved: Vec<FieldPath>,
}

/// Partial update of a template (`PATCH /api/templates/{id}`). Absent fields
/// keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub template_type: Option<TemplateType>,
    pub tags: Option<Vec<String>>,
    /// New source HTML; triggers re-materialization and a new upload.
    pub html: Option<String>,
    pub mappings: Option<Vec<ElementMapping>>,
    pub json_data: Option<Value>,
    pub is_visible: Option<bool>,
    pub production: Option<bool>,
    pub is_latest: Option<bool>,
    pub collection_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityRequest {
    pub is_visible: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    #[default]
    Jpeg,
    Pdf,
}

/// Payload for `POST /api/render/jpeg`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderHtmlRequest {
    #[serde(default)]
    pub html: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PdfResponseFormat {
    #[default]
    Base64,
    Binary,
}

/// Payload for `POST /api/render/pdf`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPdfRequest {
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub response_format: PdfResponseFormat,
    #[serde(default = "default_true")]
    pub upload_to_storage: bool,
}

/// Payload for `POST /api/templates/{id}/render`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderTemplateRequest {
    #[serde(default)]
    pub format: RenderFormat,
    /// Data to resolve with; the template's stored snapshot when absent.
    pub json_data: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRenderItem {
    pub template_id: String,
    pub json_data: Option<Value>,
}

/// Payload for `POST /api/render/combine-pdfs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinePdfsRequest {
    #[serde(default)]
    pub pdf_urls: Vec<String>,
}

/// Payload for `POST /api/render/batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRenderRequest {
    pub items: Vec<BatchRenderItem>,
    #[serde(default)]
    pub format: RenderFormat,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub placeholders: Value,
    #[serde(default)]
    pub template_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCollectionRequest {
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
    pub placeholders: Option<Value>,
    pub template_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudyRequest {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub template_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCaseStudyRequest {
    pub tags: Option<Vec<String>>,
    pub template_ids: Option<Vec<String>>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_request_defaults_match_the_render_route() {
        let req: RenderPdfRequest = serde_json::from_str(r#"{"html":"<p>x</p>"}"#).unwrap();
        assert_eq!(req.response_format, PdfResponseFormat::Base64);
        assert!(req.upload_to_storage);
    }

    #[test]
    fn resolve_request_defaults_to_render_mode() {
        let req: ResolveRequest =
            serde_json::from_str(r#"{"templateHtml":"{{a}}","jsonData":{"a":1}}"#).unwrap();
        assert_eq!(req.mode, ResolveMode::Render);
        let live: ResolveRequest =
            serde_json::from_str(r#"{"templateHtml":"","mode":"live"}"#).unwrap();
        assert_eq!(live.mode, ResolveMode::Live);
        assert!(live.json_data.is_null());
    }

    #[test]
    fn publish_request_reads_type_field() {
        let req: PublishTemplateRequest =
            serde_json::from_str(r#"{"type":"rating-summary","html":"<p></p>"}"#).unwrap();
        assert_eq!(req.template_type, Some(TemplateType::RatingSummary));
        assert!(req.mappings.is_empty());
    }
}
