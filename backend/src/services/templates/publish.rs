//! # Template Publishing Service
//!
//! Backend logic for `POST /api/templates`.
//!
//! ## Workflow
//!
//! 1.  **Validation**: the request must carry non-empty `html`.
//!
//! 2.  **Materialization**: when `mappings` are supplied, `html` is treated as the
//!     source document and materialized into placeholder HTML. Without mappings
//!     `html` is stored as is (it already is a template).
//!
//! 3.  **Data snapshot**: the request's `jsonData` becomes the template's data. When
//!     it is missing or empty, a snapshot is built from the literal contents
//!     captured with each mapping, so previews show the original values.
//!
//! 4.  **Upload**: the placeholder HTML is stored under `html/{id}_v1.html`.
//!
//! 5.  **Record**: the template is inserted as version 1, latest and visible.

use crate::engine::paths::data_from_mappings;
use crate::error::ServiceError;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use chrono::Utc;
use common::model::mapping::MappingSet;
use common::model::template::Template;
use common::requests::{PublishTemplateRequest, PublishTemplateResponse};
use serde_json::Value;
use uuid::Uuid;

pub(crate) async fn process(
    state: web::Data<AppState>,
    payload: web::Json<PublishTemplateRequest>,
) -> impl Responder {
    match publish_template(&state, payload.into_inner()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => e.error_response(),
    }
}

/// Materializes (when needed), uploads and records a new template.
///
/// # Returns
/// - `Ok(PublishTemplateResponse)` with the new id, version and HTML URL.
/// - `Err(ServiceError::BadRequest)` when `html` is missing.
/// - `Err(..)` from storage or the database otherwise.
pub async fn publish_template(
    state: &AppState,
    req: PublishTemplateRequest,
) -> Result<PublishTemplateResponse, ServiceError> {
    if req.html.trim().is_empty() {
        return Err(ServiceError::missing_field("html"));
    }

    let mappings = MappingSet::from_mappings(req.mappings);
    let template_html = if mappings.is_empty() {
        req.html
    } else {
        let materialized = state
            .materializer
            .materialize(&req.html, mappings.iter().as_slice());
        if !materialized.skipped.is_empty() {
            log::warn!(
                "{} mappings did not match an element and were skipped",
                materialized.skipped.len()
            );
        }
        materialized.html
    };

    let json_data = match req.json_data {
        Value::Object(map) if !map.is_empty() => Value::Object(map),
        _ => data_from_mappings(&mappings),
    };

    let id = Uuid::new_v4().to_string();
    let version = 1;
    let html_ref = Template::html_key(&id, version);
    let html_url = state
        .storage
        .put(&html_ref, template_html.into_bytes(), "text/html; charset=utf-8")
        .await?;

    let now = Utc::now();
    let template = Template {
        id: id.clone(),
        name: req.name.unwrap_or_else(|| "Untitled template".to_string()),
        template_type: req.template_type.unwrap_or_default(),
        html_ref,
        html_url: html_url.clone(),
        version,
        is_latest: true,
        is_visible: true,
        production: false,
        published_at: Some(now),
        created_by: req.created_by.unwrap_or_else(|| "anonymous".to_string()),
        tags: req.tags,
        json_data,
        placeholders: mappings.into_vec(),
        collection_id: req.collection_id,
        parent_id: req.parent_id,
        child_ids: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    state.store.insert_template(&template)?;
    log::info!("Published template {} ({})", template.id, template.template_type);

    Ok(PublishTemplateResponse {
        success: true,
        template_id: id,
        version,
        html_url,
    })
}
