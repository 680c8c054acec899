// backend/src/services/templates/update.rs
use crate::error::ServiceError;
use crate::services::templates::get::get_template;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use chrono::Utc;
use common::model::mapping::MappingSet;
use common::model::template::Template;
use common::requests::{UpdateTemplateRequest, VisibilityRequest};

/// `PATCH /api/templates/{template_id}`: partial update. Absent fields keep
/// their stored value.
pub(crate) async fn process(
    state: web::Data<AppState>,
    template_id: web::Path<String>,
    payload: web::Json<UpdateTemplateRequest>,
) -> impl Responder {
    match update_template(&state, &template_id, payload.into_inner()).await {
        Ok(template) => HttpResponse::Ok().json(template),
        Err(e) => e.error_response(),
    }
}

/// `PATCH /api/templates/{template_id}/visibility`
pub(crate) async fn visibility(
    state: web::Data<AppState>,
    template_id: web::Path<String>,
    payload: web::Json<VisibilityRequest>,
) -> impl Responder {
    let Some(is_visible) = payload.is_visible else {
        return ServiceError::missing_field("isVisible").error_response();
    };
    let result = state
        .store
        .set_template_visibility(&template_id, is_visible)
        .and_then(|_| get_template(&state, &template_id));
    match result {
        Ok(template) => {
            let message = if is_visible {
                "Template is now visible"
            } else {
                "Template is now hidden"
            };
            HttpResponse::Ok().json(serde_json::json!({
                "template": template,
                "message": message,
            }))
        }
        Err(e) => e.error_response(),
    }
}

/// Applies `req` to the stored template.
///
/// New `html` is materialized with the supplied mappings (or the stored ones)
/// and uploaded over the current version's blob, so `htmlUrl` stays valid.
/// Changing mappings without sending the source HTML is rejected, the stored
/// blob is already materialized and cannot be re-mapped.
async fn update_template(
    state: &AppState,
    template_id: &str,
    req: UpdateTemplateRequest,
) -> Result<Template, ServiceError> {
    let mut template = get_template(state, template_id)?;

    match (req.html, req.mappings) {
        (Some(html), mappings) => {
            if html.trim().is_empty() {
                return Err(ServiceError::missing_field("html"));
            }
            let mappings = MappingSet::from_mappings(
                mappings.unwrap_or_else(|| template.placeholders.clone()),
            );
            let template_html = if mappings.is_empty() {
                html
            } else {
                state
                    .materializer
                    .materialize(&html, mappings.iter().as_slice())
                    .html
            };
            template.html_url = state
                .storage
                .put(
                    &template.html_ref,
                    template_html.into_bytes(),
                    "text/html; charset=utf-8",
                )
                .await?;
            template.placeholders = mappings.into_vec();
        }
        (None, Some(_)) => {
            return Err(ServiceError::BadRequest(
                "html is required when mappings change".to_string(),
            ))
        }
        (None, None) => {}
    }

    if let Some(name) = req.name {
        template.name = name;
    }
    if let Some(template_type) = req.template_type {
        template.template_type = template_type;
    }
    if let Some(tags) = req.tags {
        template.tags = tags;
    }
    if let Some(json_data) = req.json_data {
        template.json_data = json_data;
    }
    if let Some(is_visible) = req.is_visible {
        template.is_visible = is_visible;
    }
    if let Some(production) = req.production {
        template.production = production;
    }
    if let Some(is_latest) = req.is_latest {
        template.is_latest = is_latest;
    }
    if req.collection_id.is_some() {
        template.collection_id = req.collection_id;
    }
    template.updated_at = Utc::now();

    if !state.store.update_template(&template)? {
        return Err(ServiceError::NotFound(format!("Template {}", template_id)));
    }
    log::info!("Updated template {}", template_id);
    Ok(template)
}
