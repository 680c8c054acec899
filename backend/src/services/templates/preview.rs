//! # Stored Template Preview & Render
//!
//! - `GET /api/templates/{template_id}/preview` resolves the stored placeholder
//!   HTML with the template's own data snapshot and returns it as `text/html`.
//! - `POST /api/templates/{template_id}/render` resolves it with the request's
//!   data (or the snapshot) and renders it to JPEG or PDF.
//!
//! When the stored HTML cannot be downloaded, a generated fallback page that
//! lists every field of the snapshot is used instead, so a preview is always
//! available.

use crate::clients::{fallback_document, Rendered};
use crate::engine::Resolver;
use crate::error::ServiceError;
use crate::services::templates::get::get_template;
use crate::state::AppState;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::template::Template;
use common::requests::RenderTemplateRequest;

pub(crate) async fn process(state: web::Data<AppState>, template_id: web::Path<String>) -> impl Responder {
    let template = match get_template(&state, &template_id) {
        Ok(template) => template,
        Err(e) => return e.error_response(),
    };
    let html = load_template_html(&state, &template).await;
    let resolved = Resolver::render().resolve(&html, &template.json_data);
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(resolved)
}

pub(crate) async fn render(
    state: web::Data<AppState>,
    template_id: web::Path<String>,
    payload: web::Json<RenderTemplateRequest>,
) -> impl Responder {
    let req = payload.into_inner();
    match render_template(&state, &template_id, &req).await {
        Ok(rendered) => {
            let filename = format!("{}.{}", template_id, Rendered::extension(req.format));
            HttpResponse::Ok()
                .content_type(rendered.content_type)
                .insert_header(ContentDisposition {
                    disposition: DispositionType::Attachment,
                    parameters: vec![DispositionParam::Filename(filename)],
                })
                .body(rendered.bytes)
        }
        Err(e) => e.error_response(),
    }
}

async fn render_template(
    state: &AppState,
    template_id: &str,
    req: &RenderTemplateRequest,
) -> Result<Rendered, ServiceError> {
    let template = get_template(state, template_id)?;
    let data = req.json_data.as_ref().unwrap_or(&template.json_data);
    let html = load_template_html(state, &template).await;
    let resolved = Resolver::render().resolve(&html, data);
    state
        .renderer
        .render(&resolved, req.format, &state.render_options)
        .await
}

/// Downloads a template's placeholder HTML, falling back to a generated page
/// when the download fails.
pub(crate) async fn load_template_html(state: &AppState, template: &Template) -> String {
    match state.fetcher.fetch(&template.html_url).await {
        Ok(html) => html,
        Err(e) => {
            log::warn!(
                "Could not load HTML of template {} from {}: {}",
                template.id,
                template.html_url,
                e
            );
            fallback_document(template)
        }
    }
}
