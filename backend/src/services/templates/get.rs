//! # Template Retrieval Service
//!
//! Handlers for `GET /api/templates`, `GET /api/templates/type/{template_type}`
//! and `GET /api/templates/{template_id}`. Records are returned as stored; the
//! placeholder HTML itself stays in object storage and is referenced by
//! `htmlUrl`.

use crate::error::ServiceError;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::template::Template;
use common::model::template_type::TemplateType;

/// Actix web handler for `GET /api/templates/{template_id}`.
///
/// # Returns
/// - `200 OK` with the `Template` as JSON.
/// - `404 Not Found` when no template has this id.
pub async fn process(state: web::Data<AppState>, template_id: web::Path<String>) -> impl Responder {
    match get_template(&state, &template_id) {
        Ok(template) => HttpResponse::Ok().json(template),
        Err(e) => e.error_response(),
    }
}

pub async fn list(state: web::Data<AppState>) -> impl Responder {
    match state.store.list_templates() {
        Ok(templates) => HttpResponse::Ok().json(templates),
        Err(e) => e.error_response(),
    }
}

pub async fn list_by_type(state: web::Data<AppState>, template_type: web::Path<String>) -> impl Responder {
    let template_type: TemplateType = match template_type.parse() {
        Ok(t) => t,
        Err(e) => return ServiceError::BadRequest(e).error_response(),
    };
    match state.store.list_templates_by_type(template_type) {
        Ok(templates) => HttpResponse::Ok().json(templates),
        Err(e) => e.error_response(),
    }
}

/// Fetches a template or fails with `NotFound`.
pub(crate) fn get_template(state: &AppState, template_id: &str) -> Result<Template, ServiceError> {
    state
        .store
        .get_template(template_id)?
        .ok_or_else(|| ServiceError::NotFound(format!("Template {}", template_id)))
}
