// common/src/model/template.rs
use crate::model::mapping::ElementMapping;
use crate::model::template_type::TemplateType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A published asset template.
///
/// The placeholder HTML itself lives in object storage; the record keeps the
/// storage key (`html_ref`) and the public URL (`html_url`) together with the
/// JSON data snapshot and the element mappings it was materialized from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    pub html_ref: String,
    pub html_url: String,
    pub version: u32,
    pub is_latest: bool,
    pub is_visible: bool,
    pub production: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_by: String,
    pub tags: Vec<String>,
    pub json_data: Value,
    pub placeholders: Vec<ElementMapping>,
    pub collection_id: Option<String>,
    pub parent_id: Option<String>,
    pub child_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Template {
    /// Storage key for the HTML blob of a given template version.
    pub fn html_key(id: &str, version: u32) -> String {
        format!("html/{}_v{}.html", id, version)
    }
}
